//! Mock collaborators for exercising the moderation flow
//!
//! No Telegram, no fonts: the transport records every call and the image
//! transforms are deterministic.

pub mod recording_transport;
pub mod transforms;

pub use recording_transport::{Call, Operation, RecordingTransport};
pub use transforms::{FailingTransform, PanickingTransform, TaggingTransform};
