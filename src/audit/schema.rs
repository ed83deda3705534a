//! Schema descriptor for persisting audit entries.
//!
//! The persistence layer asks for one schema per audited state field and
//! creates its own storage (table, collection, ...) from it. Nothing is
//! registered globally.

use crate::audit::machine::AuditState;
use crate::core::StateMachine;
use serde::Serialize;

/// Storage kind of an audit column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Uuid,
    /// Reference to the audited record.
    RecordRef,
    /// Reference to the acting user.
    ActorRef,
    /// One of the audited machine's states.
    OuterState,
    /// One of the audit lifecycle states.
    AuditState,
    Text,
    Timestamp,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
}

/// Everything the persistence layer needs to store audit entries of one field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuditLogSchema {
    pub entity_name: String,
    /// Name under which the audited record reaches its entries.
    pub related_name: String,
    pub columns: Vec<ColumnSpec>,
    pub audit_state_choices: Vec<(String, String)>,
    pub state_choices: Vec<(String, String)>,
}

const COLUMNS: [ColumnSpec; 9] = [
    column("id", ColumnKind::Uuid, false),
    column("on", ColumnKind::RecordRef, false),
    column("from_state", ColumnKind::OuterState, false),
    column("to_state", ColumnKind::OuterState, false),
    column("actor", ColumnKind::ActorRef, true),
    column("serialized_extra_args", ColumnKind::Text, true),
    column("start_time", ColumnKind::Timestamp, false),
    column("state", ColumnKind::AuditState, false),
    column("failure_reason", ColumnKind::Text, true),
];

const fn column(name: &'static str, kind: ColumnKind, nullable: bool) -> ColumnSpec {
    ColumnSpec {
        name,
        kind,
        nullable,
    }
}

/// Build the audit schema for `field_name` on records of `record_type_name`.
///
/// The entity name comes from the machine's `log_schema_name` template, with
/// `{model_name}` replaced by the record type and `{field_name}` by the
/// capitalized field name.
///
/// ```
/// use stately::audit::build_audit_log_schema;
/// use stately::builder::{MachineBuilder, StateBuilder};
///
/// struct Order;
///
/// let machine = MachineBuilder::<Order>::new("order")
///     .state(StateBuilder::new("new").description("New").initial())
///     .build()
///     .unwrap();
///
/// let schema = build_audit_log_schema(&machine, "Order", "state");
/// assert_eq!(schema.entity_name, "OrderStateLog");
/// assert_eq!(schema.related_name, "state_history");
/// ```
pub fn build_audit_log_schema<R>(
    machine: &StateMachine<R>,
    record_type_name: &str,
    field_name: &str,
) -> AuditLogSchema {
    let entity_name = machine
        .config()
        .log_schema_name
        .replace("{model_name}", record_type_name)
        .replace("{field_name}", &capitalize(field_name));

    AuditLogSchema {
        entity_name,
        related_name: format!("{field_name}_history"),
        columns: COLUMNS.to_vec(),
        audit_state_choices: AuditState::choices(),
        state_choices: machine.state_choices(),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
