//! Core utilities, configuration, and common functionality

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod metrics_server;
pub mod types;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult, ConfigError, TransportError, TransportResult, WatermarkError};
pub use logging::{init_logger, log_configuration};
pub use types::{ChannelId, ChatRef, DecisionPressed, MessageRef, ModeratorId, PhotoRef, SubmittedPhoto, SubmitterId};
