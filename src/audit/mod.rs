//! Audit log of transition attempts.
//!
//! Each attempt on a logging machine produces one [`AuditLogEntry`] whose own
//! lifecycle is the fixed [`AuditState`] machine. Entries are handed to an
//! [`AuditStore`] supplied by the persistence layer and read back through
//! [`list_transitions`] and [`list_public_completed_transitions`].

pub mod entry;
pub mod error;
pub mod history;
pub mod machine;
pub mod schema;
pub mod store;

pub use entry::AuditLogEntry;
pub use error::AuditError;
pub use history::{list_public_completed_transitions, list_transitions, AuditEntryView};
pub use machine::{AuditState, AuditTransition};
pub use schema::{build_audit_log_schema, AuditLogSchema, ColumnKind, ColumnSpec};
pub use store::{AuditStore, InMemoryAuditStore};
