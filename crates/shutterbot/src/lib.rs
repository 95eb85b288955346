//! Shutterbot - Telegram front end for the shutter moderation flow
//!
//! # Module Structure
//!
//! - `cli`: Command line interface
//! - `telegram`: Bot construction, the Bot API transport and the handler tree

pub mod cli;
pub mod telegram;

pub use telegram::{create_bot, schema, HandlerDeps, TelegramTransport};
