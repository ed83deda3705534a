//! Validation of records before a transition may run.
//!
//! Validators use Stillwater's `Validation` type so that every error is
//! reported in a single pass instead of stopping at the first one. A
//! transition that fails validation carries the complete list.
//!
//! # Example
//!
//! ```rust
//! use stately::validation::{ValidationError, ValidationRules};
//!
//! struct Invoice {
//!     lines: usize,
//!     total: i64,
//! }
//!
//! let rules: ValidationRules<Invoice> = ValidationRules::new()
//!     .require_pred(|i: &Invoice| i.lines > 0, "invoice has no lines")
//!     .require_pred(|i: &Invoice| i.total >= 0, "total is negative");
//!
//! let errors = rules.errors(&Invoice { lines: 0, total: -5 });
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors[0], ValidationError::new("invoice has no lines"));
//! ```

pub mod error;
pub mod rules;

pub use error::ValidationError;
pub use rules::{ValidationCheck, ValidationRules};
