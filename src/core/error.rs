//! Error types for TravelHub.
//!
//! Uses thiserror for structured errors with context. Errors are designed to:
//! - Be serializable for sending to a frontend
//! - Include actionable information (which field, what to fix)
//! - Keep field-level validation failures recoverable: the user corrects
//!   the field and retries, nothing is fatal to the process

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Per-field validation failures, in form field order.
///
/// One message per field: field rules short-circuit at the first failing
/// constraint, and a cross-field rule never overwrites a field's own error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FieldErrors(IndexMap<String, String>);

impl FieldErrors {
    /// Create an empty error map.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Record a failure for a field. The first message per field wins.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    /// Get the message for a field, if it failed.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether a field has a recorded failure.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Whether validation passed (no failures recorded).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Names of the failing fields, in field order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterate over (field, message) pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "no field errors");
        }
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Top-level error type for TravelHub.
///
/// This enum encompasses all error categories and enables automatic
/// conversion between specific error types.
#[derive(Error, Debug)]
pub enum TravelHubError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error("flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    #[error("submission error: {0}")]
    Submission(#[from] SubmissionError),

    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors constructing or shaping a multi-step flow.
///
/// These indicate a mis-declared form, not bad user input, and are caught
/// when the flow is built rather than when the user interacts with it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("form has no steps")]
    NoSteps,

    #[error("step {step} references unknown field '{field}'")]
    UnknownField { step: usize, field: String },

    #[error("required fields not covered by any step: {fields:?}")]
    UncoveredFields { fields: Vec<String> },
}

/// Errors assembling a draft into a submission record.
///
/// A missing field here means the step flow let an incomplete draft through,
/// so it is logged as an internal-invariant violation rather than shown to
/// the user as something they can fix.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("missing required field '{0}' in draft")]
    MissingField(String),

    #[error("field '{field}' has unexpected type: expected {expected}")]
    WrongType { field: String, expected: &'static str },

    #[error("list '{list}' contains an invalid entry '{item}': {reason}")]
    InvalidItem {
        list: String,
        item: String,
        reason: String,
    },
}

/// Errors from the submission backend.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("a submission is already in progress")]
    AlreadyInFlight,

    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission record could not be encoded: {0}")]
    Encode(String),
}

/// Errors from the mock authentication service.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email already in use")]
    EmailTaken,

    #[error("registration is invalid: {0}")]
    InvalidRegistration(FieldErrors),

    #[error("session state could not be stored: {0}")]
    SessionStore(String),
}

/// Everything that can block a submit attempt.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("form is invalid: {0}")]
    Invalid(FieldErrors),

    #[error("submit is only available on the final step (currently on step {0})")]
    NotAtFinalStep(usize),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Result type alias for TravelHub operations.
pub type TravelHubResult<T> = Result<T, TravelHubError>;

/// Result type alias for draft assembly.
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Result type alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_message_per_field_wins() {
        let mut errors = FieldErrors::new();
        errors.insert("password", "Password must be at least 8 characters");
        errors.insert("password", "Passwords do not match");

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters")
        );
    }

    #[test]
    fn test_field_errors_display() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.to_string(), "no field errors");

        errors.insert("title", "Title is required");
        errors.insert("price", "Price must be a positive number");
        assert_eq!(
            errors.to_string(),
            "title: Title is required; price: Price must be a positive number"
        );
    }

    #[test]
    fn test_fields_follow_insertion_order() {
        let mut errors = FieldErrors::new();
        errors.insert("city", "City is required");
        errors.insert("address", "Address is required");

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(fields, vec!["city", "address"]);
    }
}
