//! Extra arguments handed to transition handlers.

use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A single extra argument.
///
/// Plain values are JSON and end up in the audit log. Opaque values can be
/// anything the handler needs (a connection, a clock) but make the whole
/// argument set unserializable.
#[derive(Clone)]
pub enum ExtraArg {
    Value(Value),
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for ExtraArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

/// Named extra arguments for a transition handler.
///
/// # Example
///
/// ```rust
/// use stately::core::ExtraArgs;
///
/// let args = ExtraArgs::new()
///     .with_value("reason", "customer request")
///     .with_value("refund", 42);
///
/// assert_eq!(args.value("refund"), Some(&serde_json::json!(42)));
/// assert_eq!(
///     args.to_audit_json().as_deref(),
///     Some(r#"{"reason":"customer request","refund":42}"#)
/// );
/// ```
#[derive(Clone, Debug, Default)]
pub struct ExtraArgs {
    values: BTreeMap<String, ExtraArg>,
}

impl ExtraArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a JSON value.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values
            .insert(name.into(), ExtraArg::Value(value.into()));
        self
    }

    /// Add an opaque, non-serializable value.
    pub fn with_opaque<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        self.values
            .insert(name.into(), ExtraArg::Opaque(Arc::new(value)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&ExtraArg> {
        self.values.get(name)
    }

    /// Get a JSON value by name.
    pub fn value(&self, name: &str) -> Option<&Value> {
        match self.values.get(name) {
            Some(ExtraArg::Value(value)) => Some(value),
            _ => None,
        }
    }

    /// Get an opaque value by name, downcast to `T`.
    pub fn opaque<T: Any>(&self, name: &str) -> Option<&T> {
        match self.values.get(name) {
            Some(ExtraArg::Opaque(value)) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Best-effort JSON encoding for the audit log.
    ///
    /// Returns `None` when any argument is opaque. Never fails.
    pub fn to_audit_json(&self) -> Option<String> {
        match serde_json::to_string(self) {
            Ok(json) => Some(json),
            Err(err) => {
                tracing::warn!(error = %err, "extra arguments are not serializable, storing null");
                None
            }
        }
    }
}

impl Serialize for ExtraArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, arg) in &self.values {
            match arg {
                ExtraArg::Value(value) => map.serialize_entry(name, value)?,
                ExtraArg::Opaque(_) => {
                    return Err(S::Error::custom(format!(
                        "argument '{name}' is opaque and cannot be serialized"
                    )))
                }
            }
        }
        map.end()
    }
}
