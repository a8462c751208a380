//! Core value types that flow through form records.
//!
//! The type system uses an enum-based approach for several reasons:
//! - Closed set of types: a listing form has a finite set of field types
//! - Zero-cost pattern matching: exhaustive matching catches missing cases
//! - Serialization: serde handles enums natively
//! - Records preserve field insertion order so error output follows the
//!   order fields appear on screen

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::Date;

/// Value types a form field can hold.
///
/// This enum represents all possible data types that can be stored in a
/// draft record. Using an enum provides compile-time type safety and
/// efficient pattern matching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// UTF-8 string
    String(String),
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Calendar date (no time component)
    Date(Date),
    /// Ordered list of strings (languages, amenities, image URLs)
    List(Vec<String>),
    /// Represents absence of value
    None,
}

/// Field types for declaring what a schema field accepts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string
    String,
    /// 64-bit signed integer
    Integer,
    /// 64-bit float (also accepts integers)
    Float,
    /// Boolean value
    Boolean,
    /// Calendar date
    Date,
    /// Ordered list of strings
    List,
}

impl Value {
    /// Get the field type of this value, if it has one.
    pub fn field_type(&self) -> Option<FieldType> {
        match self {
            Value::String(_) => Some(FieldType::String),
            Value::Integer(_) => Some(FieldType::Integer),
            Value::Float(_) => Some(FieldType::Float),
            Value::Boolean(_) => Some(FieldType::Boolean),
            Value::Date(_) => Some(FieldType::Date),
            Value::List(_) => Some(FieldType::List),
            Value::None => None,
        }
    }

    /// Whether this value counts as "not provided" for required checks.
    ///
    /// An empty string is provided (it will fail length constraints);
    /// only [`Value::None`] is unset.
    pub fn is_unset(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Try to get this value as a string slice.
    pub fn as_str(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float.
    ///
    /// Integers coerce to floats, matching how numeric form inputs are
    /// accepted in either representation.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_boolean(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as a calendar date.
    pub fn as_date(&self) -> Option<Date> {
        if let Value::Date(d) = self {
            Some(*d)
        } else {
            None
        }
    }

    /// Try to get this value as a string list.
    pub fn as_list(&self) -> Option<&[String]> {
        if let Value::List(items) = self {
            Some(items)
        } else {
            None
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::List => "list",
        };
        write!(f, "{}", name)
    }
}

impl FieldType {
    /// Check whether a value is acceptable for this field type.
    ///
    /// Floats accept integers (numeric inputs arrive in either form);
    /// unset values match any type and are handled by required checks.
    pub fn matches(&self, value: &Value) -> bool {
        match value.field_type() {
            None => true,
            Some(FieldType::Integer) if *self == FieldType::Float => true,
            Some(actual) => actual == *self,
        }
    }
}

// ============================================================================
// Record
// ============================================================================

/// An ordered field-name to value map holding one form's data.
///
/// Field order is preserved so validation errors can be reported in the
/// order the fields appear in the form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Record(IndexMap<String, Value>);

impl Record {
    /// Create a new empty record.
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Set a field value, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    /// Get a field value.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Whether the record contains a field (even if set to `Value::None`).
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Remove a field, returning its previous value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    /// Number of fields in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get a field as a string slice.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Get a field as an integer.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    /// Get a field as a float (integers coerce).
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Get a field as a boolean.
    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_boolean)
    }

    /// Get a field as a calendar date.
    pub fn date(&self, name: &str) -> Option<Date> {
        self.get(name).and_then(Value::as_date)
    }

    /// Get a field as a string list.
    pub fn list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_list)
    }
}

impl FromIterator<(String, Value)> for Record {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_float_coercion() {
        assert_eq!(Value::Integer(3).as_float(), Some(3.0));
        assert_eq!(Value::Float(2.5).as_float(), Some(2.5));
        assert_eq!(Value::String("3".into()).as_float(), None);
    }

    #[test]
    fn test_field_type_matches() {
        assert!(FieldType::Float.matches(&Value::Integer(1)));
        assert!(FieldType::Float.matches(&Value::Float(1.0)));
        assert!(!FieldType::Integer.matches(&Value::Float(1.0)));
        assert!(FieldType::String.matches(&Value::None));
    }

    #[test]
    fn test_record_preserves_order() {
        let mut record = Record::new();
        record.set("title", Value::String("Beach Villa".into()));
        record.set("price", Value::Float(120.0));
        record.set("city", Value::String("Lisbon".into()));

        let names: Vec<&str> = record.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["title", "price", "city"]);
    }

    #[test]
    fn test_typed_accessors() {
        let mut record = Record::new();
        record.set("check_in", Value::Date(date!(2025 - 07 - 01)));
        record.set("guests", Value::Integer(4));

        assert_eq!(record.date("check_in"), Some(date!(2025 - 07 - 01)));
        assert_eq!(record.integer("guests"), Some(4));
        assert_eq!(record.str("guests"), None);
        assert_eq!(record.date("check_out"), None);
    }
}
