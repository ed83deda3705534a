//! One audit row per transition attempt.

use crate::audit::error::AuditError;
use crate::audit::machine::{AuditState, AuditTransition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Audit record of a single transition attempt.
///
/// `from_state` and `to_state` name states of the audited machine, while
/// `state` tracks the entry's own lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: Uuid,
    /// Identifier of the audited record.
    pub on: String,
    pub from_state: String,
    pub to_state: String,
    pub actor: Option<String>,
    /// JSON of the extra arguments; `None` when they were not serializable.
    pub serialized_extra_args: Option<String>,
    pub start_time: DateTime<Utc>,
    pub state: AuditState,
    pub failure_reason: Option<String>,
}

impl AuditLogEntry {
    /// Open a new entry in the `transition_initiated` state.
    pub fn initiate(
        on: impl Into<String>,
        from_state: impl Into<String>,
        to_state: impl Into<String>,
        actor: Option<String>,
        serialized_extra_args: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            on: on.into(),
            from_state: from_state.into(),
            to_state: to_state.into(),
            actor,
            serialized_extra_args,
            start_time: Utc::now(),
            state: AuditState::Initiated,
            failure_reason: None,
        }
    }

    /// Advance the entry's own lifecycle.
    pub fn advance(&mut self, transition: AuditTransition) -> Result<(), AuditError> {
        self.state = self.state.apply(transition)?;
        Ok(())
    }

    /// Mark the entry failed and remember why.
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), AuditError> {
        self.advance(AuditTransition::Fail)?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    pub fn completed(&self) -> bool {
        self.state == AuditState::Completed
    }

    pub fn failed(&self) -> bool {
        self.state == AuditState::Failed
    }

    /// Decoded extra arguments; empty when none were stored.
    pub fn extra_args(&self) -> Map<String, Value> {
        match self.serialized_extra_args.as_deref() {
            Some(json) => match serde_json::from_str::<Value>(json) {
                Ok(Value::Object(map)) => map,
                _ => Map::new(),
            },
            None => Map::new(),
        }
    }
}

impl fmt::Display for AuditLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<State transition on {} at {} from \"{}\" to \"{}\">",
            self.on,
            self.start_time.format("%Y-%m-%d %H:%M:%S"),
            self.from_state,
            self.to_state
        )
    }
}
