//! Field definitions: the named, typed, constrained slots of a form schema.

use crate::core::types::{FieldType, Value};
use crate::schema::constraint::Constraint;
use serde::{Deserialize, Serialize};

/// Definition of a single form field.
///
/// A field has a name (used in code), a display name (used in messages),
/// a type, a required flag and an ordered list of constraints. Validation
/// short-circuits at the first failing constraint so the user sees one
/// actionable message per field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Unique name within the schema (snake_case, used in code)
    pub name: String,
    /// Human-readable name (used in error messages)
    pub display_name: String,
    /// Type of value this field accepts
    pub field_type: FieldType,
    /// Whether a value must be provided
    pub required: bool,
    /// Constraints checked in order against provided values
    pub constraints: Vec<Constraint>,
}

impl FieldDefinition {
    /// Create a required field.
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            display_name: Self::name_to_display(&name),
            name,
            field_type,
            required: true,
            constraints: Vec::new(),
        }
    }

    /// Create an optional field. Absent values skip all constraints.
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            display_name: Self::name_to_display(&name),
            name,
            field_type,
            required: false,
            constraints: Vec::new(),
        }
    }

    /// Set the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Add a minimum-length constraint.
    pub fn with_min_length(self, min: usize) -> Self {
        self.with_constraint(Constraint::MinLength(min))
    }

    /// Add a maximum-length constraint.
    pub fn with_max_length(self, max: usize) -> Self {
        self.with_constraint(Constraint::MaxLength(max))
    }

    /// Add a minimum-items constraint (list fields).
    pub fn with_min_items(self, min: usize) -> Self {
        self.with_constraint(Constraint::MinItems(min))
    }

    /// Require a positive numeric value.
    pub fn positive(self) -> Self {
        self.with_constraint(Constraint::Positive)
    }

    /// Require a non-negative numeric value.
    pub fn non_negative(self) -> Self {
        self.with_constraint(Constraint::NonNegative)
    }

    /// Require a numeric value with no fractional part.
    pub fn whole(self) -> Self {
        self.with_constraint(Constraint::WholeNumber)
    }

    /// Restrict the value to a closed list of options.
    pub fn one_of<I, S>(self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_constraint(Constraint::OneOf(
            options.into_iter().map(Into::into).collect(),
        ))
    }

    /// Require an email-shaped value.
    pub fn email(self) -> Self {
        self.with_constraint(Constraint::Email)
    }

    /// Require a strong password (length plus character classes).
    pub fn strong_password(self) -> Self {
        self.with_constraint(Constraint::StrongPassword)
    }

    /// Require a checked checkbox.
    pub fn accepted(self) -> Self {
        self.with_constraint(Constraint::Accepted)
    }

    /// Require the value to match a regular expression.
    pub fn pattern(self, pattern: impl Into<String>, message: impl Into<String>) -> Self {
        self.with_constraint(Constraint::Pattern {
            pattern: pattern.into(),
            message: message.into(),
        })
    }

    /// Convert snake_case name to Title Case display name.
    fn name_to_display(name: &str) -> String {
        name.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Validate a candidate value for this field.
    ///
    /// `value` is `None` when the record has no entry for the field.
    /// Required fields with no value fail with a "required" message;
    /// optional fields with no value always pass. Constraints run in
    /// declaration order and stop at the first failure.
    pub fn validate(&self, value: Option<&Value>) -> Result<(), String> {
        let value = match value {
            None => return self.require_message(),
            Some(v) if v.is_unset() => return self.require_message(),
            Some(v) => v,
        };

        if !self.field_type.matches(value) {
            return Err(format!(
                "{} must be a {}",
                self.display_name, self.field_type
            ));
        }

        for constraint in &self.constraints {
            constraint.validate(&self.display_name, value)?;
        }

        Ok(())
    }

    fn require_message(&self) -> Result<(), String> {
        if self.required {
            Err(format!("{} is required", self.display_name))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_to_display() {
        assert_eq!(FieldDefinition::name_to_display("max_guests"), "Max Guests");
        assert_eq!(
            FieldDefinition::name_to_display("group_size_max"),
            "Group Size Max"
        );
        assert_eq!(FieldDefinition::name_to_display("title"), "Title");
    }

    #[test]
    fn test_required_field_rejects_missing_value() {
        let field = FieldDefinition::required("title", FieldType::String).with_min_length(5);

        assert_eq!(
            field.validate(None).unwrap_err(),
            "Title is required".to_string()
        );
        assert_eq!(
            field.validate(Some(&Value::None)).unwrap_err(),
            "Title is required".to_string()
        );
    }

    #[test]
    fn test_optional_field_skips_missing_value() {
        let field = FieldDefinition::optional("state", FieldType::String).with_min_length(2);
        assert!(field.validate(None).is_ok());
        assert!(field.validate(Some(&Value::None)).is_ok());
        // A provided value still has to satisfy the constraints.
        assert!(field.validate(Some(&Value::String("X".into()))).is_err());
    }

    #[test]
    fn test_type_mismatch_reported_before_constraints() {
        let field = FieldDefinition::required("price", FieldType::Float).positive();
        let err = field
            .validate(Some(&Value::String("free".into())))
            .unwrap_err();
        assert_eq!(err, "Price must be a float");
    }

    #[test]
    fn test_constraints_short_circuit_in_order() {
        let field = FieldDefinition::required("description", FieldType::String)
            .with_min_length(20)
            .with_max_length(500);

        let err = field
            .validate(Some(&Value::String("too short".into())))
            .unwrap_err();
        assert_eq!(err, "Description must be at least 20 characters");
    }
}
