//! Identifiers shared between the moderation core and the transport adapter.
//!
//! These are deliberately transport-agnostic: the Telegram adapter converts
//! `teloxide` ids into them at the boundary.

use std::fmt;
use std::str::FromStr;

/// Opaque reference to an uploaded photo that the transport can resolve
/// (a Telegram `file_id`). Can be far longer than a callback payload allows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoRef(pub String);

impl PhotoRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of the user who sent a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubmitterId(pub i64);

impl fmt::Display for SubmitterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of the single moderator allowed to approve or reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModeratorId(pub i64);

impl fmt::Display for ModeratorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chat a submission came from (where the acknowledgement goes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChatRef(pub i64);

/// A message that can later be edited: the moderator's review card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageRef {
    pub chat: i64,
    pub message_id: i32,
}

/// Public destination for approved photos.
///
/// Telegram accepts either a numeric chat id (`-100…`) or a public
/// `@username` for channels.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelId {
    Id(i64),
    Username(String),
}

impl FromStr for ChannelId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("channel id is empty".to_string());
        }
        if let Ok(id) = s.parse::<i64>() {
            return Ok(ChannelId::Id(id));
        }
        let name = s.strip_prefix('@').unwrap_or(s);
        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(format!("'{}' is neither a numeric chat id nor a channel @username", s));
        }
        Ok(ChannelId::Username(format!("@{}", name)))
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Id(id) => write!(f, "{}", id),
            ChannelId::Username(name) => f.write_str(name),
        }
    }
}

/// Inbound event: somebody sent the bot a photo.
#[derive(Debug, Clone)]
pub struct SubmittedPhoto {
    pub submitter: SubmitterId,
    pub chat: ChatRef,
    pub photo_ref: PhotoRef,
}

/// Inbound event: the moderator pressed one of the decision buttons.
///
/// `message` is the review card the button belongs to; Telegram may report
/// it as inaccessible (too old), in which case edits are skipped.
#[derive(Debug, Clone)]
pub struct DecisionPressed {
    pub payload: String,
    pub message: Option<MessageRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_numeric() {
        assert_eq!("-1001234567890".parse::<ChannelId>(), Ok(ChannelId::Id(-1001234567890)));
    }

    #[test]
    fn test_channel_id_username_normalized() {
        assert_eq!(
            "my_channel".parse::<ChannelId>(),
            Ok(ChannelId::Username("@my_channel".to_string()))
        );
        assert_eq!(
            "@my_channel".parse::<ChannelId>(),
            Ok(ChannelId::Username("@my_channel".to_string()))
        );
    }

    #[test]
    fn test_channel_id_rejects_garbage() {
        assert!("".parse::<ChannelId>().is_err());
        assert!("@".parse::<ChannelId>().is_err());
        assert!("not a channel".parse::<ChannelId>().is_err());
    }
}
