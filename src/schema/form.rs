//! Form schemas: ordered field definitions plus cross-field refinements.

use crate::core::error::FieldErrors;
use crate::core::types::Record;
use crate::schema::field::FieldDefinition;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::sync::Arc;

/// A cross-field rule evaluated against the full record.
///
/// Refinements run only after every involved field has passed its own
/// single-field rules, and a failure is attached to one designated field
/// (e.g. the confirmation in a password/confirmation pair, or the max in
/// a min/max pair).
#[derive(Clone)]
pub struct Refinement {
    /// Short identifier, used in logs.
    pub name: String,
    /// Fields this rule reads. All must pass single-field validation first.
    pub fields: Vec<String>,
    /// The field the error message is attached to.
    pub attach_to: String,
    /// Message shown when the rule fails.
    pub message: String,
    check: Arc<dyn Fn(&Record) -> bool + Send + Sync>,
}

impl Refinement {
    /// Create a refinement. `check` returns true when the record passes.
    pub fn new<F>(
        name: impl Into<String>,
        fields: &[&str],
        attach_to: impl Into<String>,
        message: impl Into<String>,
        check: F,
    ) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
            attach_to: attach_to.into(),
            message: message.into(),
            check: Arc::new(check),
        }
    }

    /// Evaluate the rule against a record.
    pub fn passes(&self, record: &Record) -> bool {
        (self.check)(record)
    }
}

impl std::fmt::Debug for Refinement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Refinement")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("attach_to", &self.attach_to)
            .field("check", &"<closure>")
            .finish()
    }
}

/// A declarative form schema.
///
/// Holds field definitions in form order plus any cross-field refinements.
/// Validation can be restricted to a scope (the fields on one step) or run
/// over every field before submission.
#[derive(Debug, Clone, Default)]
pub struct FormSchema {
    fields: IndexMap<String, FieldDefinition>,
    refinements: Vec<Refinement>,
}

impl FormSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self {
            fields: IndexMap::new(),
            refinements: Vec::new(),
        }
    }

    /// Add a field definition.
    pub fn field(mut self, definition: FieldDefinition) -> Self {
        self.fields.insert(definition.name.clone(), definition);
        self
    }

    /// Add a cross-field refinement.
    pub fn refine(mut self, refinement: Refinement) -> Self {
        self.refinements.push(refinement);
        self
    }

    /// Get a field definition by name.
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    /// Whether the schema declares a field.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// All field names, in form order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Names of required fields, in form order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .values()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    /// Field definitions in form order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.values()
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate every field of the record.
    pub fn validate(&self, record: &Record) -> FieldErrors {
        let scope: Vec<&str> = self.fields.keys().map(String::as_str).collect();
        self.validate_scope(record, &scope)
    }

    /// Validate the fields named in `scope`, plus any refinement touching
    /// one of them.
    ///
    /// Each field is checked independently; failures do not stop other
    /// fields from being checked. A refinement runs only when every field
    /// it reads passed its single-field rules, and its message is attached
    /// to the designated field unless that field already failed.
    pub fn validate_scope(&self, record: &Record, scope: &[&str]) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let in_scope: HashSet<&str> = scope.iter().copied().collect();

        for name in scope {
            if let Some(definition) = self.fields.get(*name) {
                if let Err(message) = definition.validate(record.get(name)) {
                    errors.insert(*name, message);
                }
            }
        }

        for refinement in &self.refinements {
            let touches_scope = refinement
                .fields
                .iter()
                .any(|f| in_scope.contains(f.as_str()));
            if !touches_scope {
                continue;
            }

            // Single-field rules gate the refinement even for involved
            // fields outside the scope.
            let inputs_valid = refinement.fields.iter().all(|name| {
                if errors.contains(name) {
                    return false;
                }
                match self.fields.get(name) {
                    Some(definition) => definition.validate(record.get(name)).is_ok(),
                    None => false,
                }
            });
            if !inputs_valid {
                continue;
            }

            if !refinement.passes(record) {
                log::debug!("refinement '{}' failed", refinement.name);
                errors.insert(refinement.attach_to.clone(), refinement.message.clone());
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{FieldType, Value};

    fn size_schema() -> FormSchema {
        FormSchema::new()
            .field(
                FieldDefinition::required("group_size_min", FieldType::Integer)
                    .with_display_name("Minimum group size")
                    .non_negative(),
            )
            .field(
                FieldDefinition::required("group_size_max", FieldType::Integer)
                    .with_display_name("Maximum group size")
                    .positive(),
            )
            .refine(Refinement::new(
                "group_size_ordering",
                &["group_size_min", "group_size_max"],
                "group_size_max",
                "Maximum group size must be greater than or equal to minimum group size",
                |record| {
                    match (
                        record.integer("group_size_min"),
                        record.integer("group_size_max"),
                    ) {
                        (Some(min), Some(max)) => max >= min,
                        _ => true,
                    }
                },
            ))
    }

    #[test]
    fn test_fields_validated_independently() {
        let schema = FormSchema::new()
            .field(FieldDefinition::required("title", FieldType::String).with_min_length(5))
            .field(FieldDefinition::required("price", FieldType::Float).positive());

        let mut record = Record::new();
        record.set("title", Value::String("Hut".into()));
        record.set("price", Value::Float(-1.0));

        let errors = schema.validate(&record);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("title"));
        assert!(errors.contains("price"));
    }

    #[test]
    fn test_scope_restricts_reported_fields() {
        let schema = FormSchema::new()
            .field(FieldDefinition::required("title", FieldType::String).with_min_length(5))
            .field(FieldDefinition::required("price", FieldType::Float).positive());

        let record = Record::new(); // both fields missing

        let errors = schema.validate_scope(&record, &["title"]);
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("title"));
        assert!(!errors.contains("price"));
    }

    #[test]
    fn test_refinement_rejects_inverted_group_size() {
        let schema = size_schema();
        let mut record = Record::new();
        record.set("group_size_min", Value::Integer(5));
        record.set("group_size_max", Value::Integer(3));

        let errors = schema.validate(&record);
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("group_size_max"),
            Some("Maximum group size must be greater than or equal to minimum group size")
        );
        assert!(!errors.contains("group_size_min"));
    }

    #[test]
    fn test_refinement_accepts_ordered_group_size() {
        let schema = size_schema();
        let mut record = Record::new();
        record.set("group_size_min", Value::Integer(1));
        record.set("group_size_max", Value::Integer(10));

        assert!(schema.validate(&record).is_empty());
    }

    #[test]
    fn test_refinement_waits_for_single_field_rules() {
        let schema = size_schema();
        let mut record = Record::new();
        record.set("group_size_min", Value::Integer(5));
        record.set("group_size_max", Value::Integer(0)); // fails Positive

        let errors = schema.validate(&record);
        // Only the constraint failure is reported; the ordering rule does
        // not run on invalid inputs.
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("group_size_max"),
            Some("Maximum group size must be a positive number")
        );
    }

    #[test]
    fn test_refinement_runs_when_any_involved_field_in_scope() {
        let schema = size_schema();
        let mut record = Record::new();
        record.set("group_size_min", Value::Integer(5));
        record.set("group_size_max", Value::Integer(3));

        let errors = schema.validate_scope(&record, &["group_size_max"]);
        assert!(errors.contains("group_size_max"));
    }
}
