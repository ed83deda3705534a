//! Core state machine types and logic.
//!
//! This module contains the declarative model and its query surface:
//! - State, transition and group definitions
//! - The `Actor` trait used for permission checks
//! - Pure guard evaluation
//! - The validated, read-only `StateMachine`
//!
//! Nothing in this module performs I/O; executing transitions against
//! records lives in [`effects`](crate::effects).

mod actor;
mod args;
mod error;
pub mod guard;
mod group;
mod machine;
mod state;
mod transition;

pub use actor::Actor;
pub use args::{ExtraArg, ExtraArgs};
pub use error::{CallbackError, LookupError};
pub use guard::GuardOutcome;
pub use group::{GroupMembership, GroupPolicy, StateGroup};
pub use machine::StateMachine;
pub use state::{StateDefinition, StateHandler};
pub use transition::{PermissionCheck, StateTransition, TransitionHandler};
