//! Builder for state definitions.

use crate::builder::error::DefinitionError;
use crate::core::{CallbackError, StateDefinition, StateHandler};
use std::collections::HashMap;
use std::sync::Arc;

/// Builder for a single state.
///
/// Abstract states are templates: they are exempt from the naming and
/// description rules, are never registered as states of the machine, and
/// lend their description and handler to states that `extends` them.
pub struct StateBuilder<R> {
    pub(crate) name: String,
    description: Option<String>,
    pub(crate) initial: bool,
    pub(crate) is_abstract: bool,
    extends: Option<String>,
    handler: Option<StateHandler<R>>,
}

impl<R> StateBuilder<R> {
    /// Create a builder for the state called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            initial: false,
            is_abstract: false,
            extends: None,
            handler: None,
        }
    }

    /// Set the human readable description (required for concrete states).
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Mark this as the machine's initial state.
    pub fn initial(mut self) -> Self {
        self.initial = true;
        self
    }

    /// Turn this state into a template for other states.
    pub fn abstract_base(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Inherit description and handler from an abstract state.
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.extends = Some(base.into());
        self
    }

    /// Set the handler run after a record arrives in this state.
    pub fn on_enter<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut R) -> Result<(), CallbackError> + Send + Sync + 'static,
    {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub(crate) fn set_handler(&mut self, handler: StateHandler<R>) {
        self.handler = Some(handler);
    }

    /// Build the definition, resolving `extends` against `templates`.
    pub(crate) fn build(
        self,
        machine: &str,
        templates: &HashMap<String, StateBuilder<R>>,
    ) -> Result<StateDefinition<R>, DefinitionError> {
        if self.name.is_empty() || self.name != self.name.to_lowercase() {
            return Err(DefinitionError::InvalidStateName {
                machine: machine.to_string(),
                state: self.name,
            });
        }

        let base = match &self.extends {
            Some(base) => Some(templates.get(base).ok_or_else(|| {
                DefinitionError::UnknownStateReference {
                    machine: machine.to_string(),
                    owner: self.name.clone(),
                    state: base.clone(),
                }
            })?),
            None => None,
        };

        let description = self
            .description
            .or_else(|| base.and_then(|b| b.description.clone()))
            .ok_or_else(|| DefinitionError::MissingStateDescription {
                machine: machine.to_string(),
                state: self.name.clone(),
            })?;

        let handler = self.handler.or_else(|| base.and_then(|b| b.handler.clone()));

        Ok(StateDefinition {
            name: self.name,
            description,
            is_initial: self.initial,
            handler,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc {
        touched: bool,
    }

    fn no_templates() -> HashMap<String, StateBuilder<Doc>> {
        HashMap::new()
    }

    #[test]
    fn builder_validates_description() {
        let result = StateBuilder::<Doc>::new("draft").build("docs", &no_templates());

        assert!(matches!(
            result,
            Err(DefinitionError::MissingStateDescription { .. })
        ));
    }

    #[test]
    fn builder_rejects_uppercase_names() {
        let result = StateBuilder::<Doc>::new("Draft")
            .description("Draft")
            .build("docs", &no_templates());

        assert!(matches!(
            result,
            Err(DefinitionError::InvalidStateName { .. })
        ));
    }

    #[test]
    fn builder_rejects_empty_names() {
        let result = StateBuilder::<Doc>::new("")
            .description("Nothing")
            .build("docs", &no_templates());

        assert!(matches!(
            result,
            Err(DefinitionError::InvalidStateName { .. })
        ));
    }

    #[test]
    fn fluent_api_builds_state() {
        let state = StateBuilder::<Doc>::new("draft")
            .description("Draft")
            .initial()
            .build("docs", &no_templates())
            .unwrap();

        assert_eq!(state.name(), "draft");
        assert_eq!(state.description(), "Draft");
        assert!(state.is_initial());
        assert!(!state.has_handler());
    }

    #[test]
    fn extends_inherits_from_template() {
        let mut templates = HashMap::new();
        templates.insert(
            "archived_base".to_string(),
            StateBuilder::<Doc>::new("Archived_Base")
                .abstract_base()
                .description("Archived")
                .on_enter(|doc: &mut Doc| {
                    doc.touched = true;
                    Ok(())
                }),
        );

        let state = StateBuilder::new("archived")
            .extends("archived_base")
            .build("docs", &templates)
            .unwrap();

        assert_eq!(state.description(), "Archived");
        let mut doc = Doc { touched: false };
        state.run_handler(&mut doc).unwrap();
        assert!(doc.touched);
    }

    #[test]
    fn extends_requires_known_template() {
        let result = StateBuilder::<Doc>::new("archived")
            .extends("missing")
            .build("docs", &no_templates());

        assert!(matches!(
            result,
            Err(DefinitionError::UnknownStateReference { .. })
        ));
    }
}
