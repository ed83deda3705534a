//! Storage contract for audit entries.

use crate::audit::entry::AuditLogEntry;
use crate::audit::error::AuditError;
use std::sync::RwLock;
use uuid::Uuid;

/// Append-only storage for audit entries, supplied by the persistence layer.
///
/// Entries are never deleted. `update` replaces the stored copy of an entry
/// (matched by id) as its lifecycle advances.
pub trait AuditStore: Send + Sync {
    fn append(&self, entry: &AuditLogEntry) -> Result<(), AuditError>;

    fn update(&self, entry: &AuditLogEntry) -> Result<(), AuditError>;

    /// Entries for one record, oldest first.
    fn entries_for(&self, record_id: &str) -> Result<Vec<AuditLogEntry>, AuditError>;
}

/// Audit store kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryAuditStore {
    entries: RwLock<Vec<AuditLogEntry>>,
}

impl InMemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored entry, oldest first.
    pub fn all(&self) -> Result<Vec<AuditLogEntry>, AuditError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.clone())
    }

    pub fn len(&self) -> Result<usize, AuditError> {
        Ok(self.entries.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AuditError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> AuditError {
    AuditError::Store("audit store lock poisoned".to_string())
}

impl AuditStore for InMemoryAuditStore {
    fn append(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        if entries.iter().any(|e| e.id == entry.id) {
            return Err(AuditError::Store(format!(
                "audit entry {} already exists",
                entry.id
            )));
        }
        entries.push(entry.clone());
        Ok(())
    }

    fn update(&self, entry: &AuditLogEntry) -> Result<(), AuditError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        match entries.iter_mut().find(|e| e.id == entry.id) {
            Some(stored) => {
                *stored = entry.clone();
                Ok(())
            }
            None => Err(unknown_entry(entry.id)),
        }
    }

    fn entries_for(&self, record_id: &str) -> Result<Vec<AuditLogEntry>, AuditError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries
            .iter()
            .filter(|e| e.on == record_id)
            .cloned()
            .collect())
    }
}

fn unknown_entry(id: Uuid) -> AuditError {
    AuditError::Store(format!("audit entry {id} does not exist"))
}
