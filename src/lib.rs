//! Stately: declarative, guarded and audited state machines for persisted records
//!
//! A machine is declared once (with builders or a JSON declaration), validated
//! as a whole, and then shared read-only by every record that uses it.
//! Records change state only through the transition executor, which runs a
//! fixed protocol: check the guard, run the transition handler, save the new
//! state, then run the destination state's handler. Machines that log keep an
//! audit entry for every attempt, successful or not.
//!
//! # Core Concepts
//!
//! - **Machine**: validated states, transitions and groups for one kind of record
//! - **Guard**: source state, permission and validation checks, in that order
//! - **Executor**: applies transitions to records through the `StatefulRecord` contract
//! - **Audit log**: one entry per attempt, with its own fixed lifecycle
//!
//! # Example
//!
//! ```rust
//! use stately::builder::{GroupBuilder, MachineBuilder, StateBuilder, TransitionBuilder};
//! use stately::core::{Actor, CallbackError, ExtraArgs};
//! use stately::effects::{StatefulRecord, TransitionError, TransitionExecutor};
//!
//! struct Ticket {
//!     id: u32,
//!     state: String,
//!     assignee: Option<String>,
//! }
//!
//! impl StatefulRecord for Ticket {
//!     fn record_id(&self) -> String {
//!         self.id.to_string()
//!     }
//!     fn current_state(&self) -> &str {
//!         &self.state
//!     }
//!     fn set_current_state(&mut self, state: String) {
//!         self.state = state;
//!     }
//!     fn save(&mut self) -> Result<(), CallbackError> {
//!         Ok(())
//!     }
//! }
//!
//! struct Agent {
//!     admin: bool,
//! }
//!
//! impl Actor for Agent {
//!     fn id(&self) -> String {
//!         "agent".to_string()
//!     }
//!     fn is_privileged(&self) -> bool {
//!         self.admin
//!     }
//! }
//!
//! let machine = MachineBuilder::<Ticket>::new("ticket")
//!     .state(StateBuilder::new("open").description("Open").initial())
//!     .state(StateBuilder::new("assigned").description("Assigned"))
//!     .state(StateBuilder::new("closed").description("Closed"))
//!     .transition(
//!         TransitionBuilder::new("assign")
//!             .from("open")
//!             .to("assigned")
//!             .description("Assign")
//!             .require_pred(|t: &Ticket| t.assignee.is_some(), "ticket has no assignee"),
//!     )
//!     .transition(
//!         TransitionBuilder::new("close")
//!             .from_any(["open", "assigned"])
//!             .to("closed")
//!             .description("Close")
//!             .public(),
//!     )
//!     .group(GroupBuilder::new("active").exclude_states(["closed"]))
//!     .build()
//!     .unwrap();
//!
//! let executor = TransitionExecutor::new(machine);
//! let mut ticket = Ticket { id: 7, state: String::new(), assignee: None };
//! executor.initialize(&mut ticket).unwrap();
//!
//! let admin = Agent { admin: true };
//! let err = executor
//!     .make_transition(&mut ticket, "assign", Some(&admin), ExtraArgs::new())
//!     .unwrap_err();
//! assert!(matches!(err, TransitionError::NotValidated { .. }));
//!
//! executor
//!     .make_transition(&mut ticket, "close", Some(&admin), ExtraArgs::new())
//!     .unwrap();
//! assert_eq!(ticket.state, "closed");
//! assert!(!executor.state_info(&ticket).unwrap().groups.get("active"));
//! assert_eq!(executor.list_transitions(&ticket).unwrap().len(), 2);
//! assert_eq!(executor.public_transitions(&ticket).unwrap().len(), 1);
//! ```

pub mod audit;
pub mod builder;
pub mod config;
pub mod core;
pub mod effects;
pub mod validation;

// Re-export commonly used types
pub use builder::{DefinitionError, MachineBuilder, StateBuilder, TransitionBuilder};
pub use config::MachineConfig;
pub use core::{Actor, ExtraArgs, StateMachine};
pub use effects::{StatefulRecord, TransitionError, TransitionExecutor};
