//! Validation rules attached to a transition.

use crate::validation::error::ValidationError;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Type alias for validation check functions
pub type ValidationCheck<R> =
    Box<dyn Fn(&R) -> Validation<(), NonEmptyVec<ValidationError>> + Send + Sync>;

/// Checks a record must pass before a transition commits.
/// Uses Validation to accumulate ALL errors.
pub struct ValidationRules<R> {
    pub(crate) checks: Vec<ValidationCheck<R>>,
}

impl<R> ValidationRules<R> {
    pub fn new() -> Self {
        Self { checks: Vec::new() }
    }

    /// Add a custom validation check
    pub fn require<F>(mut self, check: F) -> Self
    where
        F: Fn(&R) -> Validation<(), NonEmptyVec<ValidationError>> + Send + Sync + 'static,
    {
        self.checks.push(Box::new(check));
        self
    }

    /// Add a simple predicate check with error message
    pub fn require_pred<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        let message = message.into();
        let check = move |record: &R| {
            if predicate(record) {
                Validation::success(())
            } else {
                Validation::fail(ValidationError::new(message.clone()))
            }
        };
        self.checks.push(Box::new(check));
        self
    }

    /// Merge another rule set into this one.
    pub fn extend(mut self, other: ValidationRules<R>) -> Self {
        self.checks.extend(other.checks);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Run every check, accumulating ALL failures.
    pub fn enforce(&self, record: &R) -> Validation<(), NonEmptyVec<ValidationError>> {
        if self.checks.is_empty() {
            return Validation::success(());
        }

        let checks: Vec<Validation<(), NonEmptyVec<ValidationError>>> =
            self.checks.iter().map(|check| check(record)).collect();

        Validation::all_vec(checks).map(|_| ())
    }

    /// Run every check and flatten the failures into a list.
    /// An empty list means the record is valid.
    pub fn errors(&self, record: &R) -> Vec<ValidationError> {
        match self.enforce(record) {
            Validation::Success(_) => Vec::new(),
            Validation::Failure(errors) => errors.iter().cloned().collect(),
        }
    }
}

impl<R> Default for ValidationRules<R> {
    fn default() -> Self {
        Self::new()
    }
}
