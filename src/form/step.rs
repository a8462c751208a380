//! The multi-step flow state machine.
//!
//! A flow is a linear cursor over an ordered list of steps. Moving forward
//! validates the fields in scope for the current step; moving backward is
//! always allowed and never validates. Submission is gated on being at the
//! final step with the whole record valid.

use crate::core::error::{FieldErrors, FlowError, SubmitError};
use crate::core::types::Record;
use crate::schema::form::FormSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One screen's worth of fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepDefinition {
    /// Heading shown for the step.
    pub title: String,
    /// Schema fields edited on this step. May be empty for steps that only
    /// collect auxiliary list items (amenities, photos).
    pub fields: Vec<String>,
}

impl StepDefinition {
    /// Create a step definition.
    pub fn new(title: impl Into<String>, fields: &[&str]) -> Self {
        Self {
            title: title.into(),
            fields: fields.iter().map(|f| (*f).to_string()).collect(),
        }
    }
}

/// Outcome of a forward transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Validation passed; now at the given 1-based step.
    Moved(usize),
    /// Validation failed; the cursor did not move.
    Stayed(FieldErrors),
    /// Already on the final step; forward is a no-op there.
    AtEnd,
}

/// Linear cursor over an ordered list of form steps.
///
/// States are `1..=N`; the flow starts at step 1. Construction checks that
/// every step references declared fields and that the steps jointly cover
/// every required field, so a complete walk through the flow cannot leave
/// a required field unvalidated.
#[derive(Debug, Clone)]
pub struct StepFlow {
    schema: FormSchema,
    steps: Vec<StepDefinition>,
    current: usize,
}

impl StepFlow {
    /// Create a flow over `steps`, validating its shape against `schema`.
    pub fn new(schema: FormSchema, steps: Vec<StepDefinition>) -> Result<Self, FlowError> {
        if steps.is_empty() {
            return Err(FlowError::NoSteps);
        }

        for (index, step) in steps.iter().enumerate() {
            for field in &step.fields {
                if !schema.contains(field) {
                    return Err(FlowError::UnknownField {
                        step: index + 1,
                        field: field.clone(),
                    });
                }
            }
        }

        let covered: HashSet<&str> = steps
            .iter()
            .flat_map(|s| s.fields.iter().map(String::as_str))
            .collect();
        let uncovered: Vec<String> = schema
            .required_fields()
            .filter(|f| !covered.contains(f))
            .map(str::to_string)
            .collect();
        if !uncovered.is_empty() {
            return Err(FlowError::UncoveredFields { fields: uncovered });
        }

        Ok(Self {
            schema,
            steps,
            current: 1,
        })
    }

    /// The schema this flow validates against.
    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Current step, 1-based.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Total number of steps.
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Definition of the current step.
    pub fn current_step(&self) -> &StepDefinition {
        &self.steps[self.current - 1]
    }

    /// All step definitions in order.
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Whether the cursor is on the first step.
    pub fn is_first(&self) -> bool {
        self.current == 1
    }

    /// Whether the cursor is on the final step.
    pub fn is_last(&self) -> bool {
        self.current == self.steps.len()
    }

    /// Try to move forward one step.
    ///
    /// Validates the current step's fields (plus refinements touching
    /// them) against `record`. The cursor moves only on a clean result;
    /// otherwise it stays and the errors are returned for inline display.
    pub fn advance(&mut self, record: &Record) -> Advance {
        if self.is_last() {
            return Advance::AtEnd;
        }

        let scope: Vec<&str> = self.current_step().fields.iter().map(String::as_str).collect();
        let errors = self.schema.validate_scope(record, &scope);
        if errors.is_empty() {
            self.current += 1;
            log::debug!(
                "step flow advanced to {}/{} ('{}')",
                self.current,
                self.steps.len(),
                self.current_step().title
            );
            Advance::Moved(self.current)
        } else {
            log::debug!(
                "step flow held at {}: {} invalid field(s)",
                self.current,
                errors.len()
            );
            Advance::Stayed(errors)
        }
    }

    /// Move backward one step, clamped at step 1. Never validates.
    pub fn back(&mut self) -> usize {
        if self.current > 1 {
            self.current -= 1;
        }
        self.current
    }

    /// Check whether the record may be submitted.
    ///
    /// Permitted only on the final step, and only when every field of the
    /// full record validates.
    pub fn check_submit(&self, record: &Record) -> Result<(), SubmitError> {
        if !self.is_last() {
            return Err(SubmitError::NotAtFinalStep(self.current));
        }
        let errors = self.schema.validate(record);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(SubmitError::Invalid(errors))
        }
    }
}
