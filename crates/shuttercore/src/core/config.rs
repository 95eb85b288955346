use secrecy::SecretString;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::core::error::ConfigError;
use crate::core::types::{ChannelId, ModeratorId};
use crate::watermark::WatermarkSpec;

/// Default log file path when LOG_FILE_PATH is unset
pub const DEFAULT_LOG_FILE_PATH: &str = "shutter.log";

/// Runtime configuration, loaded once at startup from the environment.
///
/// Required: `BOT_TOKEN` (or `TELOXIDE_TOKEN`), `CHANNEL_ID`, `ADMIN_ID`,
/// `WATERMARK_TEXT`. Everything else has a default.
#[derive(Debug)]
pub struct Config {
    /// Bot API token
    pub bot_token: SecretString,
    /// Channel approved photos are posted to
    pub channel: ChannelId,
    /// The single moderator who reviews submissions
    pub moderator: ModeratorId,
    /// Text and font stamped onto approved photos
    pub watermark: WatermarkSpec,
    /// Log file path (LOG_FILE_PATH)
    pub log_file_path: String,
    /// Custom Bot API server (BOT_API_URL), e.g. a local telegram-bot-api
    pub bot_api_url: Option<Url>,
    /// Pending submissions older than this are dropped (SUBMISSION_TTL_SECS).
    /// Unset means submissions wait forever.
    pub submission_ttl: Option<Duration>,
    /// Port for the /metrics endpoint (METRICS_PORT). Unset disables it.
    pub metrics_port: Option<u16>,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// All required variables are checked before any is parsed, so the
    /// error names every missing one.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = get("BOT_TOKEN").or_else(|| get("TELOXIDE_TOKEN"));
        let channel = get("CHANNEL_ID");
        let admin = get("ADMIN_ID");
        let watermark_text = get("WATERMARK_TEXT");

        let mut missing = Vec::new();
        if bot_token.is_none() {
            missing.push("BOT_TOKEN");
        }
        if channel.is_none() {
            missing.push("CHANNEL_ID");
        }
        if admin.is_none() {
            missing.push("ADMIN_ID");
        }
        if watermark_text.is_none() {
            missing.push("WATERMARK_TEXT");
        }

        let (Some(bot_token), Some(channel), Some(admin), Some(watermark_text)) =
            (bot_token, channel, admin, watermark_text)
        else {
            return Err(ConfigError::Missing(missing));
        };

        let channel = channel
            .parse::<ChannelId>()
            .map_err(|reason| ConfigError::Invalid { name: "CHANNEL_ID", reason })?;

        let moderator = admin.parse::<i64>().map(ModeratorId).map_err(|e| ConfigError::Invalid {
            name: "ADMIN_ID",
            reason: e.to_string(),
        })?;

        let bot_api_url = get("BOT_API_URL")
            .map(|raw| Url::parse(&raw))
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                name: "BOT_API_URL",
                reason: e.to_string(),
            })?;

        let submission_ttl = get("SUBMISSION_TTL_SECS")
            .map(|raw| raw.parse::<u64>())
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                name: "SUBMISSION_TTL_SECS",
                reason: e.to_string(),
            })?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        let metrics_port = get("METRICS_PORT")
            .map(|raw| raw.parse::<u16>())
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                name: "METRICS_PORT",
                reason: e.to_string(),
            })?;

        Ok(Self {
            bot_token: SecretString::from(bot_token),
            channel,
            moderator,
            watermark: WatermarkSpec {
                text: watermark_text,
                font_path: get("WATERMARK_FONT_PATH").map(PathBuf::from),
            },
            log_file_path: get("LOG_FILE_PATH").unwrap_or_else(|| DEFAULT_LOG_FILE_PATH.to_string()),
            bot_api_url,
            submission_ttl,
            metrics_port,
        })
    }
}

/// User-facing texts
pub mod captions {
    /// Caption attached to every photo posted to the channel
    pub const POST_CAPTION: &str = "hack kharidne ke liye contact @TPKINGOWNER";

    /// Reply to /start
    pub const START_GREETING: &str = "Hello! Please send me a photo to submit for review.";

    /// Reply to a submitter once their photo is queued for review
    pub const SUBMISSION_RECEIVED: &str = "Thanks! Your photo has been submitted for admin approval.";

    pub const APPROVE_BUTTON: &str = "✅ Approve";
    pub const REJECT_BUTTON: &str = "❌ Reject";

    pub const POSTING: &str = "✅ Approved. Posting to channel...";
    pub const POSTED: &str = "✅ Photo posted successfully with watermark!";
    pub const POSTED_UNWATERMARKED: &str = "⚠️ Error: Could not apply watermark. Posted original.";
    pub const REJECTED: &str = "❌ Rejected. The photo will not be posted.";
    pub const EXPIRED: &str = "⌛ This request has expired or is invalid.";
    pub const FETCH_FAILED: &str = "⚠️ Error: Could not download the original photo. Nothing was posted.";
    pub const POST_FAILED: &str = "⚠️ Error: Could not post the photo to the channel.";

    /// Callback answer for anyone but the moderator pressing a decision button
    pub const NOT_MODERATOR: &str = "Only the moderator can review submissions.";

    /// Caption of the review card sent to the moderator
    pub fn review_card(submitter: impl std::fmt::Display) -> String {
        format!("New photo from user {}. Approve to post in channel.", submitter)
    }
}

/// Network configuration
pub mod network {
    use std::time::Duration;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 120;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Retry configuration for the dispatcher loop
pub mod retry {
    use std::time::Duration;

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds)
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Dispatcher retry delay duration
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }

    /// Base for exponential backoff calculation
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;
}

/// Pending submission housekeeping
pub mod registry {
    use std::time::Duration;

    /// How often the TTL sweep runs when SUBMISSION_TTL_SECS is set
    pub const SWEEP_INTERVAL_SECS: u64 = 60;

    pub fn sweep_interval() -> Duration {
        Duration::from_secs(SWEEP_INTERVAL_SECS)
    }
}

/// Watermark styling. Fixed for the process lifetime.
pub mod watermark {
    /// Smallest font size in pixels
    pub const MIN_FONT_SIZE: f32 = 15.0;
    /// Font size is image height divided by this
    pub const FONT_HEIGHT_DIVISOR: f32 = 30.0;
    /// Gap between the text box and the bottom edge, as a share of height
    pub const BOTTOM_MARGIN_RATIO: f32 = 0.05;
    /// Padding around the text inside the dark box (pixels)
    pub const BOX_PADDING: i32 = 5;
    /// Semi-transparent black behind the text
    pub const BOX_COLOR: [u8; 4] = [0, 0, 0, 128];
    /// Near-opaque white text
    pub const TEXT_COLOR: [u8; 4] = [255, 255, 255, 220];
    /// JPEG quality of the re-encoded image
    pub const JPEG_QUALITY: u8 = 90;
}
