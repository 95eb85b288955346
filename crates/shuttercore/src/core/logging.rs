//! Logging initialization and startup diagnostics
//!
//! - Logger initialization (console + file)
//! - Configuration summary at startup (the bot token is never printed)

use anyhow::Result;
use simplelog::*;
use std::fs::File;

/// Initialize logger for both console and file output
///
/// # Arguments
/// * `log_file_path` - Path to the log file
///
/// # Returns
/// * `Ok(())` - Logger initialized successfully
/// * `Err(anyhow::Error)` - Failed to create the file or a logger is already set
pub fn init_logger(log_file_path: &str) -> Result<()> {
    let log_file = File::create(log_file_path).map_err(|e| anyhow::anyhow!("Failed to create log file: {}", e))?;

    CombinedLogger::init(vec![
        TermLogger::new(
            LevelFilter::Info,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ),
        WriteLogger::new(LevelFilter::Info, Config::default(), log_file),
    ])
    .map_err(|e| anyhow::anyhow!("Failed to initialize logger: {}", e))?;

    Ok(())
}

/// Human-readable configuration summary, one line per setting
pub fn config_summary(config: &crate::core::config::Config) -> Vec<String> {
    let mut lines = vec![
        format!("Channel:         {}", config.channel),
        format!("Moderator:       {}", config.moderator),
        format!("Watermark text:  {:?}", config.watermark.text),
        format!(
            "Watermark font:  {}",
            config
                .watermark
                .font_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "system fallback".to_string())
        ),
        format!("Log file:        {}", config.log_file_path),
    ];

    lines.push(match &config.bot_api_url {
        Some(url) => format!("Bot API:         {}", url),
        None => "Bot API:         api.telegram.org".to_string(),
    });
    lines.push(match config.submission_ttl {
        Some(ttl) => format!("Submission TTL:  {}s", ttl.as_secs()),
        None => "Submission TTL:  none (pending until decided)".to_string(),
    });
    lines.push(match config.metrics_port {
        Some(port) => format!("Metrics:         :{}", port),
        None => "Metrics:         disabled".to_string(),
    });

    lines
}

/// Logs the configuration at startup
pub fn log_configuration(config: &crate::core::config::Config) {
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    log::info!("📷 Shutter configuration");
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for line in config_summary(config) {
        log::info!("{}", line);
    }
    if config.submission_ttl.is_none() {
        log::warn!("SUBMISSION_TTL_SECS not set: undecided submissions stay in memory until restart");
    }
    log::info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use tempfile::NamedTempFile;

    use crate::core::types::{ChannelId, ModeratorId};
    use crate::watermark::WatermarkSpec;

    #[test]
    fn test_init_logger_creates_log_file() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        // A logger may already be installed by another test in this binary;
        // the file is created either way.
        let _ = init_logger(path);
        assert!(temp_file.path().exists());
    }

    #[test]
    fn test_init_logger_rejects_bad_path() {
        assert!(init_logger("/nonexistent-dir/shutter.log").is_err());
    }

    #[test]
    fn test_summary_never_contains_token() {
        let config = crate::core::config::Config {
            bot_token: SecretString::from("123456:SECRET-TOKEN".to_string()),
            channel: ChannelId::Username("@photos".to_string()),
            moderator: ModeratorId(42),
            watermark: WatermarkSpec {
                text: "@photos".to_string(),
                font_path: None,
            },
            log_file_path: "shutter.log".to_string(),
            bot_api_url: None,
            submission_ttl: None,
            metrics_port: Some(9090),
        };

        let summary = config_summary(&config).join("\n");
        assert!(!summary.contains("SECRET-TOKEN"));
        assert!(summary.contains("@photos"));
        assert!(summary.contains("42"));
        assert!(summary.contains(":9090"));
    }
}
