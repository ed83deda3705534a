//! State definitions.

use super::error::CallbackError;
use std::fmt;
use std::sync::Arc;

/// Callback invoked after a record arrives in a state.
pub type StateHandler<R> = Arc<dyn Fn(&mut R) -> Result<(), CallbackError> + Send + Sync>;

/// A named state of a machine.
///
/// Definitions are created by the builder and are immutable afterwards. The
/// handler runs strictly after a transition into this state has been
/// committed and logged as completed.
pub struct StateDefinition<R> {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) is_initial: bool,
    pub(crate) handler: Option<StateHandler<R>>,
}

impl<R> StateDefinition<R> {
    /// The lowercase identifier of this state.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Whether records start their life in this state.
    pub fn is_initial(&self) -> bool {
        self.is_initial
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Run the arrival handler, if any.
    pub(crate) fn run_handler(&self, record: &mut R) -> Result<(), CallbackError> {
        match &self.handler {
            Some(handler) => handler(record),
            None => Ok(()),
        }
    }
}

impl<R> Clone for StateDefinition<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            description: self.description.clone(),
            is_initial: self.is_initial,
            handler: self.handler.clone(),
        }
    }
}

impl<R> fmt::Debug for StateDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("is_initial", &self.is_initial)
            .field("has_handler", &self.handler.is_some())
            .finish()
    }
}
