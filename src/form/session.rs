//! A form session: draft, step flow and submission backend in one place.
//!
//! The session serializes all writes through one owner (the UI thread in
//! the original design), so no locking is needed. The only suspension
//! point is the backend call, guarded against double-submit.

use crate::core::error::{AssemblyError, SubmissionError, SubmitError};
use crate::form::draft::Draft;
use crate::form::step::{Advance, StepFlow};
use crate::submit::{SubmissionBackend, SubmissionReceipt};
use serde::Serialize;

/// Owns one form's state for its whole lifecycle: edit, step through,
/// assemble, submit.
///
/// On a rejected submission the draft — fields and auxiliary lists — is
/// left untouched so the user can retry; on success the caller decides
/// whether to [`reset`](Self::reset) for another entry.
pub struct FormSession<B: SubmissionBackend> {
    draft: Draft,
    flow: StepFlow,
    backend: B,
    in_flight: bool,
}

impl<B: SubmissionBackend> FormSession<B> {
    /// Create a session over a step flow and a submission backend.
    pub fn new(flow: StepFlow, backend: B) -> Self {
        Self {
            draft: Draft::new(),
            flow,
            backend,
            in_flight: false,
        }
    }

    /// The in-progress draft.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Mutable access to the draft for field edits and list items.
    pub fn draft_mut(&mut self) -> &mut Draft {
        &mut self.draft
    }

    /// The step flow (read-only; transitions go through the session).
    pub fn flow(&self) -> &StepFlow {
        &self.flow
    }

    /// Try to move to the next step, validating the current step's fields.
    pub fn advance(&mut self) -> Advance {
        self.flow.advance(self.draft.record())
    }

    /// Move to the previous step. Never validates, clamped at step 1.
    pub fn back(&mut self) -> usize {
        self.flow.back()
    }

    /// Whether a submission is currently in flight. UI uses this to
    /// disable the submit control and show a processing state.
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Assemble the draft and hand it to the backend.
    ///
    /// Gating, in order: no submission may already be in flight; the flow
    /// must be on its final step with the full record valid; assembly must
    /// produce a complete record. The in-flight flag is cleared on both
    /// success and failure, and a rejected submission leaves the draft
    /// exactly as it was.
    pub fn submit<T, F>(&mut self, assemble: F) -> Result<SubmissionReceipt, SubmitError>
    where
        T: Serialize,
        F: FnOnce(&Draft) -> Result<T, AssemblyError>,
    {
        if self.in_flight {
            return Err(SubmissionError::AlreadyInFlight.into());
        }
        self.flow.check_submit(self.draft.record())?;

        let submission = assemble(&self.draft)?;
        let payload = serde_json::to_value(&submission)
            .map_err(|e| SubmissionError::Encode(e.to_string()))?;

        self.in_flight = true;
        let result = self.backend.submit(&payload);
        self.in_flight = false;

        match result {
            Ok(receipt) => {
                log::info!("submission accepted: {}", receipt.id);
                Ok(receipt)
            }
            Err(err) => {
                log::warn!("submission failed, draft preserved: {}", err);
                Err(err.into())
            }
        }
    }

    /// Discard the draft and rewind to step 1, e.g. after a successful
    /// submission when the user wants to list another property.
    pub fn reset(&mut self) {
        self.draft.clear();
        while self.flow.back() > 1 {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AssemblyError;
    use crate::core::types::{FieldType, Value};
    use crate::form::step::StepDefinition;
    use crate::schema::field::FieldDefinition;
    use crate::schema::form::FormSchema;
    use crate::submit::MockBackend;
    use serde::Serialize;

    #[derive(Serialize)]
    struct TinySubmission {
        title: String,
        notes: Vec<String>,
    }

    fn tiny_flow() -> StepFlow {
        let schema = FormSchema::new()
            .field(FieldDefinition::required("title", FieldType::String).with_min_length(5));
        StepFlow::new(schema, vec![StepDefinition::new("Basic", &["title"])]).unwrap()
    }

    fn assemble(draft: &Draft) -> Result<TinySubmission, AssemblyError> {
        let title = draft
            .field("title")
            .and_then(Value::as_str)
            .ok_or_else(|| AssemblyError::MissingField("title".into()))?;
        Ok(TinySubmission {
            title: title.to_string(),
            notes: draft.items("notes").to_vec(),
        })
    }

    #[test]
    fn test_successful_submit_returns_receipt() {
        let mut session = FormSession::new(tiny_flow(), MockBackend::new());
        session.draft_mut().set("title", Value::String("Beach Villa".into()));
        session.draft_mut().push_item("notes", "Sea view");

        let receipt = session.submit(assemble).unwrap();
        assert!(receipt.id.to_string().starts_with("BK-"));
        assert!(!session.is_submitting());
    }

    #[test]
    fn test_submit_rejected_preserves_draft() {
        let backend = MockBackend::new().rejecting("service unavailable");
        let mut session = FormSession::new(tiny_flow(), backend);
        session.draft_mut().set("title", Value::String("Beach Villa".into()));
        session.draft_mut().push_item("notes", "Sea view");

        let err = session.submit(assemble).unwrap_err();
        assert!(matches!(
            err,
            SubmitError::Submission(SubmissionError::Rejected(_))
        ));

        // Draft fields and auxiliary lists survive, and the submit control
        // is available again.
        assert_eq!(
            session.draft().field("title"),
            Some(&Value::String("Beach Villa".into()))
        );
        assert_eq!(session.draft().items("notes"), &["Sea view"]);
        assert!(!session.is_submitting());

        // A retry would pass gating again.
        assert!(session.flow().check_submit(session.draft().record()).is_ok());
    }

    #[test]
    fn test_submit_blocked_when_record_invalid() {
        let mut session = FormSession::new(tiny_flow(), MockBackend::new());
        session.draft_mut().set("title", Value::String("Hut".into()));

        match session.submit(assemble) {
            Err(SubmitError::Invalid(errors)) => assert!(errors.contains("title")),
            other => panic!("expected Invalid, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_reset_clears_draft_and_rewinds() {
        let schema = FormSchema::new()
            .field(FieldDefinition::required("title", FieldType::String).with_min_length(5))
            .field(FieldDefinition::optional("state", FieldType::String));
        let flow = StepFlow::new(
            schema,
            vec![
                StepDefinition::new("Basic", &["title"]),
                StepDefinition::new("Extras", &["state"]),
            ],
        )
        .unwrap();

        let mut session = FormSession::new(flow, MockBackend::new());
        session.draft_mut().set("title", Value::String("Beach Villa".into()));
        assert!(matches!(session.advance(), Advance::Moved(2)));

        session.reset();
        assert!(session.draft().record().is_empty());
        assert_eq!(session.flow().current(), 1);
    }
}
