//! Notifications around state changes.

/// What a listener learns about a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionEvent {
    pub machine: String,
    pub record_id: String,
    pub transition: String,
    pub from_state: String,
    pub to_state: String,
    pub actor: Option<String>,
}

/// Receives notifications before and after a record changes state.
///
/// Notifications are fire-and-forget: listeners cannot veto or fail a
/// transition. Both methods default to doing nothing.
pub trait TransitionListener: Send + Sync {
    /// Called once the guard passed, before the transition handler runs.
    fn before_transition(&self, _event: &TransitionEvent) {}

    /// Called after the new state was saved.
    fn after_transition(&self, _event: &TransitionEvent) {}
}
