//! Concrete listing forms: schemas, step flows and draft assemblers.
//!
//! Each listing category declares its schema and steps here, together with
//! a pure `assemble` function that merges the validated fields and the
//! auxiliary lists into an immutable submission record. Assembly failures
//! mean the step flow let an incomplete draft through, so they are logged
//! as internal errors rather than shown for the user to fix.

pub mod accommodation;
pub mod experience;
pub mod filters;

use crate::core::error::AssemblyError;
use crate::core::types::Record;
use serde::{Deserialize, Serialize};
use time::Date;

pub use filters::{ListingCategory, SearchFilters};

/// Currencies offered in the listing forms.
pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "CAD", "AUD"];

/// Where a listing takes place.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    /// Street address or meeting point.
    pub address: String,
    /// City name.
    pub city: String,
    /// State or province, where applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// Country name.
    pub country: String,
}

// Typed access into a validated record. Missing or mistyped fields are
// controller bugs, logged at the call sites in the assemblers.

pub(crate) fn require_str(record: &Record, name: &str) -> Result<String, AssemblyError> {
    match record.get(name) {
        None | Some(crate::core::types::Value::None) => {
            Err(AssemblyError::MissingField(name.to_string()))
        }
        Some(value) => value
            .as_str()
            .map(str::to_string)
            .ok_or(AssemblyError::WrongType {
                field: name.to_string(),
                expected: "string",
            }),
    }
}

pub(crate) fn require_float(record: &Record, name: &str) -> Result<f64, AssemblyError> {
    match record.get(name) {
        None | Some(crate::core::types::Value::None) => {
            Err(AssemblyError::MissingField(name.to_string()))
        }
        Some(value) => value.as_float().ok_or(AssemblyError::WrongType {
            field: name.to_string(),
            expected: "number",
        }),
    }
}

pub(crate) fn require_u32(record: &Record, name: &str) -> Result<u32, AssemblyError> {
    let value = require_float(record, name)?;
    if value < 0.0 || value.fract() != 0.0 || value > u32::MAX as f64 {
        return Err(AssemblyError::WrongType {
            field: name.to_string(),
            expected: "whole number",
        });
    }
    Ok(value as u32)
}

pub(crate) fn require_list(record: &Record, name: &str) -> Result<Vec<String>, AssemblyError> {
    match record.get(name) {
        None | Some(crate::core::types::Value::None) => {
            Err(AssemblyError::MissingField(name.to_string()))
        }
        Some(value) => value
            .as_list()
            .map(<[String]>::to_vec)
            .ok_or(AssemblyError::WrongType {
                field: name.to_string(),
                expected: "list",
            }),
    }
}

pub(crate) fn optional_str(record: &Record, name: &str) -> Option<String> {
    record
        .str(name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

pub(crate) fn optional_date(record: &Record, name: &str) -> Option<Date> {
    record.date(name)
}
