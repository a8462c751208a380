//! Declarative constraints applied to form field values.
//!
//! Constraints are checked during validation before a step can advance.
//! This allows catching errors while the user is still on the screen
//! where the field lives.

use crate::core::types::Value;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};

/// Constraints that can be applied to field values.
///
/// Each check receives the field's display label so messages read the way
/// they would under the field in a form ("Title must be at least 5
/// characters"). A constraint that does not apply to the value's type
/// passes; type mismatches are reported by the field definition.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// String length must be >= min
    MinLength(usize),
    /// String length must be <= max
    MaxLength(usize),
    /// Numeric value must be >= min
    MinValue(f64),
    /// Numeric value must be <= max
    MaxValue(f64),
    /// Numeric value must be > 0
    Positive,
    /// Numeric value must be >= 0
    NonNegative,
    /// Numeric value must have no fractional part
    WholeNumber,
    /// String must not be empty or whitespace-only
    NotEmpty,
    /// List must contain at least min items
    MinItems(usize),
    /// String must look like an email address
    Email,
    /// String must match a regular expression
    Pattern {
        /// The regular expression source.
        pattern: String,
        /// Message fragment shown when the value does not match.
        message: String,
    },
    /// String must be one of the listed options
    OneOf(Vec<String>),
    /// Boolean must be true (terms-and-conditions style checkboxes)
    Accepted,
    /// Password must be at least 8 characters with an uppercase letter, a
    /// lowercase letter, a number and a special character. The message
    /// names every missing requirement at once.
    StrongPassword,

    /// Custom constraint with validation function
    /// Note: The closure is skipped during serialization
    #[serde(skip)]
    Custom {
        name: String,
        description: String,
        validator: Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>,
    },
}

impl std::fmt::Debug for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::MinLength(v) => f.debug_tuple("MinLength").field(v).finish(),
            Constraint::MaxLength(v) => f.debug_tuple("MaxLength").field(v).finish(),
            Constraint::MinValue(v) => f.debug_tuple("MinValue").field(v).finish(),
            Constraint::MaxValue(v) => f.debug_tuple("MaxValue").field(v).finish(),
            Constraint::Positive => write!(f, "Positive"),
            Constraint::NonNegative => write!(f, "NonNegative"),
            Constraint::WholeNumber => write!(f, "WholeNumber"),
            Constraint::NotEmpty => write!(f, "NotEmpty"),
            Constraint::MinItems(v) => f.debug_tuple("MinItems").field(v).finish(),
            Constraint::Email => write!(f, "Email"),
            Constraint::Pattern { pattern, message } => f
                .debug_struct("Pattern")
                .field("pattern", pattern)
                .field("message", message)
                .finish(),
            Constraint::OneOf(v) => f.debug_tuple("OneOf").field(v).finish(),
            Constraint::Accepted => write!(f, "Accepted"),
            Constraint::StrongPassword => write!(f, "StrongPassword"),
            Constraint::Custom {
                name, description, ..
            } => f
                .debug_struct("Custom")
                .field("name", name)
                .field("description", description)
                .field("validator", &"<closure>")
                .finish(),
        }
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"))
}

impl Constraint {
    /// Validate a value against this constraint.
    ///
    /// `label` is the field's display name; it is woven into the returned
    /// message so it can be shown inline without further formatting.
    pub fn validate(&self, label: &str, value: &Value) -> Result<(), String> {
        match self {
            Constraint::MinLength(min_len) => {
                if let Value::String(s) = value {
                    if s.chars().count() < *min_len {
                        return Err(format!(
                            "{} must be at least {} characters",
                            label, min_len
                        ));
                    }
                }
            }

            Constraint::MaxLength(max_len) => {
                if let Value::String(s) = value {
                    if s.chars().count() > *max_len {
                        return Err(format!(
                            "{} must be less than {} characters",
                            label, max_len
                        ));
                    }
                }
            }

            Constraint::MinValue(min) => {
                if let Some(num) = value.as_float() {
                    if num < *min {
                        return Err(format!("{} must be at least {}", label, min));
                    }
                }
            }

            Constraint::MaxValue(max) => {
                if let Some(num) = value.as_float() {
                    if num > *max {
                        return Err(format!("{} must be at most {}", label, max));
                    }
                }
            }

            Constraint::Positive => {
                if let Some(num) = value.as_float() {
                    if num <= 0.0 {
                        return Err(format!("{} must be a positive number", label));
                    }
                }
            }

            Constraint::NonNegative => {
                if let Some(num) = value.as_float() {
                    if num < 0.0 {
                        return Err(format!("{} must be a non-negative number", label));
                    }
                }
            }

            Constraint::WholeNumber => {
                if let Value::Float(num) = value {
                    if num.fract() != 0.0 {
                        return Err(format!("{} must be a whole number", label));
                    }
                }
            }

            Constraint::NotEmpty => {
                if let Value::String(s) = value {
                    if s.trim().is_empty() {
                        return Err(format!("{} is required", label));
                    }
                }
            }

            Constraint::MinItems(min) => {
                if let Value::List(items) = value {
                    if items.len() < *min {
                        let noun = if *min == 1 { "entry" } else { "entries" };
                        return Err(format!(
                            "{} must have at least {} {}",
                            label, min, noun
                        ));
                    }
                }
            }

            Constraint::Email => {
                if let Value::String(s) = value {
                    if !email_regex().is_match(s) {
                        return Err("Invalid email address".to_string());
                    }
                }
            }

            Constraint::Pattern { pattern, message } => {
                if let Value::String(s) = value {
                    match Regex::new(pattern) {
                        Ok(re) => {
                            if !re.is_match(s) {
                                return Err(format!("{} {}", label, message));
                            }
                        }
                        Err(err) => {
                            // A broken pattern is a schema-authoring bug;
                            // never blame the user's input for it.
                            log::warn!("unusable pattern '{}': {}", pattern, err);
                        }
                    }
                }
            }

            Constraint::OneOf(options) => {
                if let Value::String(s) = value {
                    if !options.iter().any(|opt| opt == s) {
                        return Err(format!("Please select a valid {}", label.to_lowercase()));
                    }
                }
            }

            Constraint::Accepted => {
                if value.as_boolean() != Some(true) {
                    return Err("You must accept the terms and conditions".to_string());
                }
            }

            Constraint::StrongPassword => {
                if let Value::String(s) = value {
                    let missing = missing_password_requirements(s);
                    if !missing.is_empty() {
                        return Err(format!(
                            "{} must contain {}",
                            label,
                            join_requirements(&missing)
                        ));
                    }
                }
            }

            Constraint::Custom {
                name, validator, ..
            } => {
                validator(value).map_err(|e| format!("{}: {}", name, e))?;
            }
        }

        Ok(())
    }

    /// Get a human-readable description of this constraint.
    pub fn description(&self) -> String {
        match self {
            Constraint::MinLength(len) => format!("Minimum length: {}", len),
            Constraint::MaxLength(len) => format!("Maximum length: {}", len),
            Constraint::MinValue(min) => format!("Must be at least {}", min),
            Constraint::MaxValue(max) => format!("Must be at most {}", max),
            Constraint::Positive => "Must be positive".to_string(),
            Constraint::NonNegative => "Must be non-negative".to_string(),
            Constraint::WholeNumber => "Must be a whole number".to_string(),
            Constraint::NotEmpty => "Cannot be empty".to_string(),
            Constraint::MinItems(min) => format!("Minimum entries: {}", min),
            Constraint::Email => "Must be a valid email address".to_string(),
            Constraint::Pattern { pattern, .. } => format!("Must match pattern: {}", pattern),
            Constraint::OneOf(options) => format!("One of {} options", options.len()),
            Constraint::Accepted => "Must be accepted".to_string(),
            Constraint::StrongPassword => {
                "At least 8 characters with upper case, lower case, number and special character"
                    .to_string()
            }
            Constraint::Custom { description, .. } => description.clone(),
        }
    }
}

/// Password requirements not met by the candidate, in display order.
fn missing_password_requirements(password: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if password.chars().count() < 8 {
        missing.push("at least 8 characters");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        missing.push("an uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        missing.push("a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        missing.push("a number");
    }
    if !password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        missing.push("a special character");
    }
    missing
}

fn join_requirements(parts: &[&str]) -> String {
    match parts {
        [] => String::new(),
        [only] => (*only).to_string(),
        [head @ .., last] => format!("{} and {}", head.join(", "), last),
    }
}

/// Score a password from 0 (empty) to 5 (meets every requirement).
///
/// One point each for: length >= 8, an uppercase letter, a lowercase
/// letter, a number, a special character. Used by registration screens to
/// drive a strength meter.
pub fn password_strength(password: &str) -> u8 {
    if password.is_empty() {
        return 0;
    }
    let mut strength = 0;
    if password.chars().count() >= 8 {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        strength += 1;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        strength += 1;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        strength += 1;
    }
    strength
}
