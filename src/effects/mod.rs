//! Transition execution against persisted records.
//!
//! This module is the imperative shell around the pure machine definition:
//! it saves records, runs handlers, notifies listeners and writes the audit
//! log. The guard it applies before committing lives in
//! [`core::guard`](crate::core::guard).

mod error;
mod executor;
mod handle;
mod listener;
mod record;

pub use error::TransitionError;
pub use executor::{StateInfo, TransitionExecutor};
pub use handle::StateMachineHandle;
pub use listener::{TransitionEvent, TransitionListener};
pub use record::StatefulRecord;
