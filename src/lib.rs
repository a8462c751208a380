//! # TravelHub - Multi-step Listing Form Core
//!
//! TravelHub is the form core of a travel marketplace: schema-validated
//! multi-step listing forms for accommodations and experiences, with a
//! mock submission backend and a mock authentication service.
//!
//! ## Features
//!
//! - **Declarative Schemas**: Field constraints (length, numeric range,
//!   regex, closed option lists) plus cross-field refinements
//! - **Step Flow**: A linear cursor over form sections that advances only
//!   when the fields in scope validate, and goes back unconditionally
//! - **Draft Assembly**: Validated fields and free-text auxiliary lists
//!   merged into one immutable submission record
//! - **Mock Backend**: Simulated submission with configurable latency and
//!   failure injection, returning synthetic booking identifiers
//! - **Mock Auth**: A session service over a swappable key-value store
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use travelhub::prelude::*;
//! use travelhub::listing::accommodation;
//!
//! let flow = StepFlow::new(accommodation::schema(), accommodation::steps())?;
//! let mut session = FormSession::new(flow, MockBackend::new());
//!
//! session.draft_mut().set("title", Value::String("Seaside Villa".into()));
//! // ... fill the remaining fields, advancing step by step ...
//!
//! let receipt = session.submit(accommodation::assemble)?;
//! println!("submitted as {}", receipt.id);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Values, records and the error taxonomy
//! - [`schema`]: Field definitions, constraints and refinements
//! - [`form`]: Step flow, drafts and the form session
//! - [`listing`]: Concrete accommodation and experience forms
//! - [`pricing`]: Night counts and booking quotes
//! - [`submit`]: The submission backend seam and its mock
//! - [`auth`]: The mock authentication collaborator

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod core;
pub mod form;
pub mod listing;
pub mod pricing;
pub mod schema;
pub mod submit;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use travelhub::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{FieldType, Record, Value};

    // Errors
    pub use crate::core::error::{
        AssemblyError, AuthError, FieldErrors, FlowError, SubmissionError, SubmitError,
        TravelHubError, TravelHubResult,
    };

    // Schemas
    pub use crate::schema::constraint::{password_strength, Constraint};
    pub use crate::schema::field::FieldDefinition;
    pub use crate::schema::form::{FormSchema, Refinement};

    // Form flow
    pub use crate::form::draft::Draft;
    pub use crate::form::session::FormSession;
    pub use crate::form::step::{Advance, StepDefinition, StepFlow};

    // Listings
    pub use crate::listing::{ListingCategory, Location, SearchFilters};

    // Pricing
    pub use crate::pricing::BookingQuote;

    // Submission
    pub use crate::submit::{MockBackend, SubmissionBackend, SubmissionId, SubmissionReceipt};

    // Auth
    pub use crate::auth::{
        AuthService, Credentials, KeyValueStore, MemoryStore, Registration, Role, User,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use crate::listing::accommodation;

    #[test]
    fn test_version() {
        assert!(!super::VERSION.is_empty());
        assert_eq!(super::NAME, "travelhub");
    }

    #[test]
    fn test_listing_flows_construct() {
        assert!(StepFlow::new(accommodation::schema(), accommodation::steps()).is_ok());
        assert!(StepFlow::new(
            crate::listing::experience::schema(),
            crate::listing::experience::steps()
        )
        .is_ok());
    }

    #[test]
    fn test_session_over_the_accommodation_flow() {
        let flow = StepFlow::new(accommodation::schema(), accommodation::steps()).unwrap();
        let mut session = FormSession::new(flow, MockBackend::new());

        // An empty draft cannot leave step one.
        match session.advance() {
            Advance::Stayed(errors) => assert!(errors.contains("title")),
            other => panic!("expected Stayed, got {:?}", other),
        }
    }
}
