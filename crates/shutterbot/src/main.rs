use anyhow::Result;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use teloxide::prelude::*;
use tokio::time::sleep;

use shuttercore::config::{self, Config, DEFAULT_LOG_FILE_PATH};
use shuttercore::core::logging::{config_summary, init_logger, log_configuration};
use shuttercore::core::metrics::init_metrics;
use shuttercore::core::metrics_server::start_metrics_server;
use shuttercore::watermark::{watermark_file, WatermarkSpec, Watermarker};
use shuttercore::{Orchestrator, Registry};
use shutterbot::cli::{Cli, Commands};
use shutterbot::telegram::{create_bot, schema, setup_bot_commands, HandlerDeps, TelegramTransport};

/// Main entry point for the Telegram bot
///
/// # Errors
///
/// Returns an error if the configuration is incomplete or initialization
/// fails (logging, bot creation).
#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Log panics in handlers; the dispatcher task is restarted below
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    // Load environment variables from .env if present
    let _ = dotenv();

    match cli.command {
        Some(Commands::CheckConfig) => check_config(),
        Some(Commands::Watermark {
            input,
            output,
            text,
            font,
        }) => run_watermark(input, output, text, font),
        Some(Commands::Run) | None => {
            let config = Config::from_env()?;
            init_logger(&config.log_file_path)?;
            run_bot(config).await
        }
    }
}

/// Validates the environment and prints what the bot would run with
fn check_config() -> Result<()> {
    match Config::from_env() {
        Ok(config) => {
            println!("Configuration OK");
            for line in config_summary(&config) {
                println!("  {}", line);
            }
            match Watermarker::new(config.watermark.clone()).preload_font() {
                Ok(()) => println!("  Watermark font usable"),
                Err(e) => println!("  Warning: {} (photos will be posted without watermark)", e),
            }
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Invalid configuration: {}", e)),
    }
}

/// Stamps a local file for preview
fn run_watermark(input: PathBuf, output: PathBuf, text: Option<String>, font: Option<PathBuf>) -> Result<()> {
    let log_path = std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| DEFAULT_LOG_FILE_PATH.to_string());
    init_logger(&log_path)?;

    let text = text
        .or_else(|| std::env::var("WATERMARK_TEXT").ok())
        .ok_or_else(|| anyhow::anyhow!("No watermark text: pass --text or set WATERMARK_TEXT"))?;
    let font_path = font.or_else(|| std::env::var("WATERMARK_FONT_PATH").ok().map(PathBuf::from));

    watermark_file(&input, &output, &WatermarkSpec { text, font_path })?;
    println!("Wrote {}", output.display());
    Ok(())
}

/// Runs the bot until the dispatcher stops or gives up after repeated panics
async fn run_bot(config: Config) -> Result<()> {
    log::info!("Starting bot...");

    // Initialize metrics registry
    init_metrics();

    // Log configuration at startup
    log_configuration(&config);

    let bot = create_bot(&config)?;
    let registry = Registry::new();

    if let Some(port) = config.metrics_port {
        let registry = registry.clone();
        tokio::spawn(async move {
            if let Err(e) = start_metrics_server(port, registry).await {
                log::error!("Metrics server failed: {}", e);
            }
        });
    }

    if let Some(ttl) = config.submission_ttl {
        log::info!("Pending submissions expire after {}s", ttl.as_secs());
        registry
            .clone()
            .spawn_expiry_task(ttl, config::registry::sweep_interval());
    }

    let watermarker = Watermarker::new(config.watermark.clone());
    if let Err(e) = watermarker.preload_font() {
        log::warn!("{}. Approved photos will be posted without watermark.", e);
    }

    let orchestrator = Orchestrator::new(
        Arc::new(TelegramTransport::new(bot.clone())),
        registry,
        config.channel.clone(),
        config.moderator,
        Arc::new(watermarker),
    );

    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let handler = schema(HandlerDeps::new(orchestrator));

    let mut retry_count = 0;
    let max_retries = config::retry::MAX_DISPATCHER_RETRIES;

    // Run the dispatcher with retry logic
    loop {
        let bot_clone = bot.clone();
        let handler_clone = handler.clone();

        // Separate task so a panic in the dispatcher surfaces through the JoinHandle
        let handle = tokio::spawn(async move {
            use teloxide::update_listeners::Polling;

            let listener = Polling::builder(bot_clone.clone()).build();

            Dispatcher::builder(bot_clone, handler_clone)
                .dependencies(DependencyMap::new())
                .enable_ctrlc_handler()
                .build()
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the update listener"),
                )
                .await
        });

        match handle.await {
            Ok(()) => {
                log::info!("Dispatcher shutdown gracefully");
                break;
            }
            Err(join_err) => {
                if join_err.is_panic() {
                    log::error!("Dispatcher panicked: {}", join_err);

                    if retry_count < max_retries {
                        retry_count += 1;
                        log::info!(
                            "Retrying dispatcher after panic (attempt {}/{})...",
                            retry_count,
                            max_retries
                        );
                        exponential_backoff(retry_count).await;
                    } else {
                        log::error!("Max retries reached after panic. Exiting...");
                        break;
                    }
                } else {
                    log::warn!("Dispatcher task was cancelled: {}", join_err);
                    break;
                }
            }
        }

        // Add a delay between retries to avoid overwhelming the API
        if retry_count > 0 {
            sleep(config::retry::dispatcher_delay()).await;
        }
    }

    Ok(())
}

/// Exponential backoff delay for retries
async fn exponential_backoff(retry_count: u32) {
    let delay = Duration::from_secs(config::retry::EXPONENTIAL_BACKOFF_BASE.pow(retry_count));
    sleep(delay).await;
}
