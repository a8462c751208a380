//! The submission backend seam and its mock implementation.
//!
//! Real deployments would put an HTTP client behind [`SubmissionBackend`];
//! here the only implementation is [`MockBackend`], which waits a
//! configurable delay and returns a synthetic booking-style identifier,
//! or a rejection when failure injection is enabled.

use crate::core::error::SubmissionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Synthetic identifier for an accepted submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

impl SubmissionId {
    /// Create a new random submission ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.0.simple().to_string();
        write!(f, "BK-{}", hex[..8].to_uppercase())
    }
}

/// What the backend returns for an accepted submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Identifier the confirmation view displays and routes on.
    pub id: SubmissionId,
}

/// The seam between the form core and whatever accepts listings.
pub trait SubmissionBackend {
    /// Accept an assembled submission record, returning a receipt or a
    /// rejection. Implementations may block; the caller treats the call
    /// as its single suspension point.
    fn submit(&self, record: &serde_json::Value) -> Result<SubmissionReceipt, SubmissionError>;
}

/// Stand-in for a real backend call.
///
/// Sleeps for the configured delay (zero by default, so tests stay fast),
/// then either returns a fresh receipt or the injected rejection.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    delay: Duration,
    reject_with: Option<String>,
}

impl MockBackend {
    /// Create a backend that accepts immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate network latency before responding.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every submission fail with the given message.
    pub fn rejecting(mut self, message: impl Into<String>) -> Self {
        self.reject_with = Some(message.into());
        self
    }
}

impl SubmissionBackend for MockBackend {
    fn submit(&self, record: &serde_json::Value) -> Result<SubmissionReceipt, SubmissionError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        if let Some(message) = &self.reject_with {
            return Err(SubmissionError::Rejected(message.clone()));
        }

        let receipt = SubmissionReceipt {
            id: SubmissionId::new(),
        };
        log::debug!(
            "mock backend accepted {} field(s) as {}",
            record.as_object().map(|o| o.len()).unwrap_or(0),
            receipt.id
        );
        Ok(receipt)
    }
}
