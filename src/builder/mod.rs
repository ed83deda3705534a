//! Builder API for state machine definitions.
//!
//! Machines are declared with fluent builders (or a JSON declaration) and
//! validated as a whole by [`MachineBuilder::build`]. A definition that
//! breaks any structural rule is rejected with a [`DefinitionError`].

pub mod declaration;
pub mod error;
pub mod group;
pub mod machine;
pub mod state;
pub mod transition;

pub use declaration::{
    GroupDeclaration, MachineDeclaration, StateDeclaration, StateList, TransitionDeclaration,
};
pub use error::DefinitionError;
pub use group::GroupBuilder;
pub use machine::MachineBuilder;
pub use state::StateBuilder;
pub use transition::TransitionBuilder;

/// Create a transition with a single source state.
///
/// # Example
///
/// ```
/// use stately::builder::simple_transition;
///
/// struct Door;
///
/// let open = simple_transition::<Door>("open", "closed", "opened", "Open the door");
/// ```
pub fn simple_transition<R>(
    name: &str,
    from: &str,
    to: &str,
    description: &str,
) -> TransitionBuilder<R> {
    TransitionBuilder::new(name)
        .from(from)
        .to(to)
        .description(description)
}
