//! The fixed lifecycle of a single audit entry.
//!
//! Every logged transition attempt walks this small machine:
//!
//! ```text
//! initiated -> started -> completed
//!     \           \
//!      +-----------+---> failed
//! ```
//!
//! `completed` and `failed` are terminal. The lifecycle itself is never
//! audited.

use crate::audit::error::AuditError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of an audit entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditState {
    #[serde(rename = "transition_initiated")]
    Initiated,
    #[serde(rename = "transition_started")]
    Started,
    #[serde(rename = "transition_failed")]
    Failed,
    #[serde(rename = "transition_completed")]
    Completed,
}

impl AuditState {
    /// All states, in declaration order.
    pub const ALL: [AuditState; 4] = [
        AuditState::Initiated,
        AuditState::Started,
        AuditState::Failed,
        AuditState::Completed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Initiated => "transition_initiated",
            Self::Started => "transition_started",
            Self::Failed => "transition_failed",
            Self::Completed => "transition_completed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Initiated => "Transition initiated",
            Self::Started => "Transition started",
            Self::Failed => "Transition failed",
            Self::Completed => "Transition completed",
        }
    }

    pub fn is_initial(&self) -> bool {
        matches!(self, Self::Initiated)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failed | Self::Completed)
    }

    /// `(name, description)` pairs for every audit state.
    pub fn choices() -> Vec<(String, String)> {
        Self::ALL
            .iter()
            .map(|s| (s.name().to_string(), s.description().to_string()))
            .collect()
    }

    /// The state reached by applying `transition`, if it may start here.
    pub fn apply(self, transition: AuditTransition) -> Result<AuditState, AuditError> {
        if transition.from_states().contains(&self) {
            Ok(transition.to_state())
        } else {
            Err(AuditError::InvalidAuditTransition {
                transition: transition.name().to_string(),
                state: self.name().to_string(),
            })
        }
    }
}

impl fmt::Display for AuditState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Step in an audit entry's lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuditTransition {
    Start,
    Complete,
    Fail,
}

impl AuditTransition {
    pub const ALL: [AuditTransition; 3] = [
        AuditTransition::Start,
        AuditTransition::Complete,
        AuditTransition::Fail,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Complete => "complete",
            Self::Fail => "fail",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Start => "Transition started",
            Self::Complete => "Transition completed",
            Self::Fail => "Transition failed",
        }
    }

    pub fn from_states(&self) -> &'static [AuditState] {
        match self {
            Self::Start => &[AuditState::Initiated],
            Self::Complete => &[AuditState::Started],
            Self::Fail => &[AuditState::Initiated, AuditState::Started],
        }
    }

    pub fn to_state(&self) -> AuditState {
        match self {
            Self::Start => AuditState::Started,
            Self::Complete => AuditState::Completed,
            Self::Fail => AuditState::Failed,
        }
    }
}
