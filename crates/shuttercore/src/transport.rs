//! The messaging surface the moderation flow needs from a bot client.
//!
//! `shutterbot` implements this on `teloxide::Bot`; tests implement it with
//! a recorder. The core never talks to the network directly.

use async_trait::async_trait;
use bytes::Bytes;

use crate::core::error::TransportResult;
use crate::core::types::{ChannelId, ChatRef, MessageRef, ModeratorId, PhotoRef};
use crate::moderation::decision::DecisionControls;

#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the photo (by reference) to the moderator with the approve and
    /// reject buttons attached.
    async fn present_to_moderator(
        &self,
        moderator: ModeratorId,
        photo: &PhotoRef,
        caption: &str,
        controls: &DecisionControls,
    ) -> TransportResult<()>;

    /// Plain text reply to whoever submitted the photo.
    async fn acknowledge_submitter(&self, chat: ChatRef, text: &str) -> TransportResult<()>;

    /// Replaces the caption of the moderator's review card. Buttons are
    /// removed by the edit.
    async fn edit_caption(&self, message: &MessageRef, text: &str) -> TransportResult<()>;

    /// Uploads image bytes to the public channel.
    async fn post_to_channel(&self, channel: &ChannelId, image: Bytes, caption: &str) -> TransportResult<()>;

    /// Downloads the original photo.
    async fn fetch_bytes(&self, photo: &PhotoRef) -> TransportResult<Bytes>;
}
