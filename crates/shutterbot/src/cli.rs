use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "shutterbot")]
#[command(author, version, about = "Moderated photo-publishing Telegram bot", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default)
    Run,

    /// Validate the environment configuration and print a summary
    CheckConfig,

    /// Watermark a local image the same way approved photos are stamped
    Watermark {
        /// Input image (any format the bot accepts)
        input: PathBuf,

        /// Where to write the JPEG result
        output: PathBuf,

        /// Text to stamp; defaults to WATERMARK_TEXT
        #[arg(short, long)]
        text: Option<String>,

        /// Font file; defaults to WATERMARK_FONT_PATH, then the bundled font
        #[arg(short, long)]
        font: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
