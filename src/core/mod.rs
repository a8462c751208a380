//! Core types and error handling.
//!
//! This module contains the fundamental building blocks:
//! - [`types`]: field values and ordered form records
//! - [`error`]: the error taxonomy shared across the crate

pub mod error;
pub mod types;

pub use error::{
    AssemblyError, AuthError, FieldErrors, FlowError, SubmissionError, SubmitError, TravelHubError,
};
pub use types::{FieldType, Record, Value};
