//! Storage contract between the executor and persisted records.

use crate::core::CallbackError;

/// A persisted record with one state field driven by a machine.
///
/// The executor is the only writer of the state field. `save` persists the
/// record durably and is called right after the state changes.
///
/// # Example
///
/// ```rust
/// use stately::core::CallbackError;
/// use stately::effects::StatefulRecord;
///
/// struct Order {
///     id: u64,
///     state: String,
///     saves: usize,
/// }
///
/// impl StatefulRecord for Order {
///     fn record_id(&self) -> String {
///         self.id.to_string()
///     }
///
///     fn current_state(&self) -> &str {
///         &self.state
///     }
///
///     fn set_current_state(&mut self, state: String) {
///         self.state = state;
///     }
///
///     fn save(&mut self) -> Result<(), CallbackError> {
///         self.saves += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait StatefulRecord {
    /// Identifier used to link audit entries to this record.
    fn record_id(&self) -> String;

    fn current_state(&self) -> &str;

    fn set_current_state(&mut self, state: String);

    /// Persist the record.
    fn save(&mut self) -> Result<(), CallbackError>;
}
