//! Bot API implementation of the moderation `Transport`

use async_trait::async_trait;
use bytes::Bytes;
use teloxide::net::Download;
use teloxide::prelude::*;
use teloxide::types::{FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, MessageId, Recipient};

use shuttercore::config::captions;
use shuttercore::core::error::TransportResult;
use shuttercore::core::types::{ChannelId, ChatRef, MessageRef, ModeratorId, PhotoRef};
use shuttercore::moderation::DecisionControls;
use shuttercore::Transport;

/// Talks to Telegram through a teloxide `Bot`.
///
/// Timeouts come from the bot's HTTP client (see `create_bot`); nothing is
/// retried here.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Approve and reject buttons side by side
pub fn review_keyboard(controls: &DecisionControls) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback(captions::APPROVE_BUTTON, controls.approve_payload.clone()),
        InlineKeyboardButton::callback(captions::REJECT_BUTTON, controls.reject_payload.clone()),
    ]])
}

/// Where channel posts go
pub fn channel_recipient(channel: &ChannelId) -> Recipient {
    match channel {
        ChannelId::Id(id) => Recipient::Id(ChatId(*id)),
        ChannelId::Username(name) => Recipient::ChannelUsername(name.clone()),
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn present_to_moderator(
        &self,
        moderator: ModeratorId,
        photo: &PhotoRef,
        caption: &str,
        controls: &DecisionControls,
    ) -> TransportResult<()> {
        self.bot
            .send_photo(ChatId(moderator.0), InputFile::file_id(FileId(photo.as_str().to_string())))
            .caption(caption)
            .reply_markup(review_keyboard(controls))
            .await?;
        Ok(())
    }

    async fn acknowledge_submitter(&self, chat: ChatRef, text: &str) -> TransportResult<()> {
        self.bot.send_message(ChatId(chat.0), text).await?;
        Ok(())
    }

    async fn edit_caption(&self, message: &MessageRef, text: &str) -> TransportResult<()> {
        // No reply_markup: the edit drops the decision buttons
        self.bot
            .edit_message_caption(ChatId(message.chat), MessageId(message.message_id))
            .caption(text)
            .await?;
        Ok(())
    }

    async fn post_to_channel(&self, channel: &ChannelId, image: Bytes, caption: &str) -> TransportResult<()> {
        self.bot
            .send_photo(channel_recipient(channel), InputFile::memory(image.to_vec()))
            .caption(caption)
            .await?;
        Ok(())
    }

    async fn fetch_bytes(&self, photo: &PhotoRef) -> TransportResult<Bytes> {
        let file = self.bot.get_file(FileId(photo.as_str().to_string())).await?;
        let mut buffer = Vec::with_capacity(file.size as usize);
        self.bot.download_file(&file.path, &mut buffer).await?;
        log::debug!("Downloaded {} bytes for {}", buffer.len(), file.path);
        Ok(Bytes::from(buffer))
    }
}
