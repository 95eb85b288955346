//! Dispatcher schema and handler chain builders

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, Message};

use shuttercore::config::captions;
use shuttercore::core::types::{DecisionPressed, MessageRef};

use super::types::{is_moderator, submission_from_message, HandlerDeps, HandlerError};
use crate::telegram::bot::Command;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// # Arguments
/// * `deps` - Handler dependencies (the moderation orchestrator)
///
/// # Returns
/// The complete handler tree for the bot
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_photos = deps.clone();
    let deps_callback = deps;

    dptree::entry()
        .branch(command_handler())
        .branch(photo_handler(deps_photos))
        .branch(callback_handler(deps_callback))
}

fn command_handler() -> UpdateHandler<HandlerError> {
    Update::filter_message().branch(dptree::entry().filter_command::<Command>().endpoint(
        |bot: Bot, msg: Message, cmd: Command| async move {
            log::info!("Received command: {:?} from chat {}", cmd, msg.chat.id);
            match cmd {
                Command::Start => {
                    bot.send_message(msg.chat.id, captions::START_GREETING).await?;
                }
            }
            Ok(())
        },
    ))
}

/// Any photo from anyone becomes a submission
fn photo_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_message()
        .filter(|msg: Message| msg.photo().is_some())
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                match submission_from_message(&msg) {
                    Some(submission) => {
                        deps.orchestrator.submit(submission).await;
                    }
                    None => log::warn!("Photo message {} in chat {} had no sizes", msg.id.0, msg.chat.id),
                }
                Ok(())
            }
        })
}

/// Decision buttons on review cards
fn callback_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    Update::filter_callback_query().endpoint(move |bot: Bot, q: CallbackQuery| {
        let deps = deps.clone();
        async move {
            if !is_moderator(q.from.id, deps.moderator()) {
                log::warn!("User {} pressed a decision button but is not the moderator", q.from.id.0);
                bot.answer_callback_query(q.id.clone())
                    .text(captions::NOT_MODERATOR)
                    .await?;
                return Ok(());
            }

            // Stop the client spinner before the (possibly slow) approve path
            if let Err(e) = bot.answer_callback_query(q.id.clone()).await {
                log::warn!("Failed to answer callback query: {}", e);
            }

            let Some(payload) = q.data.clone() else {
                log::warn!("Callback query without data from {}", q.from.id.0);
                return Ok(());
            };

            let message = q.regular_message().map(|m| MessageRef {
                chat: m.chat.id.0,
                message_id: m.id.0,
            });

            deps.orchestrator.decide(DecisionPressed { payload, message }).await;
            Ok(())
        }
    })
}
