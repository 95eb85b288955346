//! Shuttercore - moderation flow for a photo-publishing relay
//!
//! Photos come in from submitters, wait in an in-memory registry until the
//! moderator decides, and approved ones are watermarked and posted to a
//! channel. Nothing here depends on a concrete bot client; see [`Transport`].
//!
//! # Module Structure
//!
//! - `core`: Configuration, errors, logging, metrics, shared types
//! - `moderation`: Submission registry, decision payloads, orchestrator
//! - `transport`: The messaging seam implemented by the bot crate
//! - `watermark`: Text stamping on in-memory images

pub mod core;
pub mod moderation;
pub mod transport;
pub mod watermark;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, Config};
pub use moderation::{DecisionOutcome, Orchestrator, Registry, SubmissionToken};
pub use transport::Transport;
pub use watermark::{ImageTransform, WatermarkSpec, Watermarker};
