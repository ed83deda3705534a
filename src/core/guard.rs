//! The guard evaluated before a transition may commit.
//!
//! Guards are pure: they inspect the record, the actor and the transition
//! definition and never change anything. Checks run in a fixed order and the
//! first failing check decides the outcome:
//!
//! 1. the current state must be one of the transition's source states,
//! 2. a supplied actor must pass the permission check,
//! 3. the validators must yield no errors (all of them are collected).

use super::actor::Actor;
use super::transition::StateTransition;
use crate::validation::ValidationError;

/// Tagged result of evaluating a guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Every check passed.
    Allowed,

    /// The record is not in one of the transition's source states.
    CannotStart { state: String },

    /// The actor failed the permission check.
    PermissionDenied { actor: String },

    /// Validators yielded errors; carries all of them.
    ValidationFailed(Vec<ValidationError>),
}

impl GuardOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Evaluate the guard of `transition` for a record currently in `current_state`.
///
/// An absent actor is a system-initiated transition and skips the
/// permission check.
///
/// # Example
///
/// ```rust
/// use stately::builder::{MachineBuilder, StateBuilder, TransitionBuilder};
/// use stately::core::{guard, GuardOutcome};
///
/// struct Lamp;
///
/// let machine = MachineBuilder::<Lamp>::new("lamp")
///     .state(StateBuilder::new("off").description("Off").initial())
///     .state(StateBuilder::new("on").description("On"))
///     .transition(
///         TransitionBuilder::new("switch_on")
///             .from("off")
///             .to("on")
///             .description("Switch on"),
///     )
///     .build()
///     .unwrap();
///
/// let switch_on = machine.get_transition("switch_on").unwrap();
/// assert!(guard::evaluate(switch_on, "off", &Lamp, None).is_allowed());
/// assert_eq!(
///     guard::evaluate(switch_on, "on", &Lamp, None),
///     GuardOutcome::CannotStart { state: "on".to_string() }
/// );
/// ```
pub fn evaluate<R>(
    transition: &StateTransition<R>,
    current_state: &str,
    record: &R,
    actor: Option<&dyn Actor>,
) -> GuardOutcome {
    if !transition.can_start_from(current_state) {
        return GuardOutcome::CannotStart {
            state: current_state.to_string(),
        };
    }

    if let Some(actor) = actor {
        if !transition.has_permission(record, actor) {
            return GuardOutcome::PermissionDenied {
                actor: actor.display_name(),
            };
        }
    }

    let errors = transition.validate(record);
    if !errors.is_empty() {
        return GuardOutcome::ValidationFailed(errors);
    }

    GuardOutcome::Allowed
}
