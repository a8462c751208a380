//! Declarative schema validation.
//!
//! A [`FormSchema`] maps field names to constrained [`FieldDefinition`]s
//! and carries cross-field [`Refinement`]s. Validation produces a map of
//! field-level messages and can be restricted to the fields on one step.

pub mod constraint;
pub mod field;
pub mod form;

pub use constraint::{password_strength, Constraint};
pub use field::FieldDefinition;
pub use form::{FormSchema, Refinement};
