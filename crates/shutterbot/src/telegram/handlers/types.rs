//! Handler types, dependencies, and update conversion helpers

use teloxide::types::{Message, PhotoSize, UserId};

use shuttercore::core::types::{ChatRef, ModeratorId, PhotoRef, SubmittedPhoto, SubmitterId};
use shuttercore::Orchestrator;

use crate::telegram::transport::TelegramTransport;

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub orchestrator: Orchestrator<TelegramTransport>,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(orchestrator: Orchestrator<TelegramTransport>) -> Self {
        Self { orchestrator }
    }

    pub fn moderator(&self) -> ModeratorId {
        self.orchestrator.moderator()
    }
}

/// Whether `user` is the configured moderator
pub fn is_moderator(user: UserId, moderator: ModeratorId) -> bool {
    i64::try_from(user.0).ok() == Some(moderator.0)
}

/// Highest resolution variant of a photo
fn largest(sizes: &[PhotoSize]) -> Option<&PhotoSize> {
    sizes.iter().max_by_key(|p| p.width * p.height)
}

/// Builds the submission event for a photo message.
///
/// The sender falls back to the chat id when Telegram omits `from`
/// (anonymous group admins, channel posts).
pub fn submission_from_message(msg: &Message) -> Option<SubmittedPhoto> {
    let photo = largest(msg.photo()?)?;
    let submitter = msg
        .from
        .as_ref()
        .and_then(|u| i64::try_from(u.id.0).ok())
        .unwrap_or(msg.chat.id.0);

    Some(SubmittedPhoto {
        submitter: SubmitterId(submitter),
        chat: ChatRef(msg.chat.id.0),
        photo_ref: PhotoRef(photo.file.id.0.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_moderator() {
        assert!(is_moderator(UserId(42), ModeratorId(42)));
        assert!(!is_moderator(UserId(43), ModeratorId(42)));
        assert!(!is_moderator(UserId(u64::MAX), ModeratorId(-1)));
    }
}
