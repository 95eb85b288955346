use thiserror::Error;

/// Configuration errors detected at startup.
///
/// Startup is refused on any of these; `Missing` lists every absent
/// variable at once so the operator can fix them in one go.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variables that are unset or empty
    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),

    /// A variable is present but cannot be parsed
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Failures reported by the transport collaborator (Telegram).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Bot API request failed
    #[error("Telegram request failed: {0}")]
    Request(String),

    /// File download from the Bot API failed
    #[error("File download failed: {0}")]
    Download(String),
}

#[cfg(feature = "telegram")]
impl From<teloxide::RequestError> for TransportError {
    fn from(err: teloxide::RequestError) -> Self {
        TransportError::Request(err.to_string())
    }
}

#[cfg(feature = "telegram")]
impl From<teloxide::DownloadError> for TransportError {
    fn from(err: teloxide::DownloadError) -> Self {
        TransportError::Download(err.to_string())
    }
}

/// Type alias for transport results
pub type TransportResult<T> = Result<T, TransportError>;

/// Why the watermark could not be applied.
///
/// All of these are handled the same way by the orchestrator (post the
/// original), the variants only matter for logs and metrics.
#[derive(Error, Debug)]
pub enum WatermarkError {
    /// Input bytes are not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// Decoded image has no pixels
    #[error("Image has zero width or height")]
    EmptyImage,

    /// The bundled font failed to parse
    #[error("No usable font: {0}")]
    Font(String),

    /// Re-encoding the stamped image failed
    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    /// The blocking transform task panicked or was cancelled
    #[error("Watermark task failed: {0}")]
    Task(String),
}

impl WatermarkError {
    /// Short label for metrics
    pub fn kind(&self) -> &'static str {
        match self {
            WatermarkError::Decode(_) => "decode",
            WatermarkError::EmptyImage => "decode",
            WatermarkError::Font(_) => "font",
            WatermarkError::Encode(_) => "encode",
            WatermarkError::Task(_) => "task",
        }
    }
}

/// Centralized error type for the application
///
/// Used where several concerns meet (CLI commands, startup); the
/// moderation flow itself works with the narrower enums above.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Watermark error: {0}")]
    Watermark(#[from] WatermarkError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Application error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
