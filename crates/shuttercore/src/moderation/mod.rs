//! Submission registry and the approve/reject flow

pub mod decision;
pub mod orchestrator;
pub mod registry;

pub use decision::{Decision, DecisionAction, DecisionControls};
pub use orchestrator::{DecisionOutcome, Orchestrator};
pub use registry::{Registry, SubmissionRecord, SubmissionToken};
