//! Multi-step form flow: draft state, step transitions and submission.

pub mod draft;
pub mod session;
pub mod step;

pub use draft::Draft;
pub use session::FormSession;
pub use step::{Advance, StepDefinition, StepFlow};
