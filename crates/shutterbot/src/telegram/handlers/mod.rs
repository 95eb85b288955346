//! Telegram bot handler tree configuration
//!
//! The same schema runs in production and can be driven from tests.

mod schema;
mod types;

pub use schema::schema;
pub use types::{is_moderator, submission_from_message, HandlerDeps, HandlerError};
