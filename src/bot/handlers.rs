use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::{ Me, MessageId };
use teloxide::utils::command::BotCommands;

use super::callbacks::CallbackAction;
use super::commands::Command;
use super::constants::notices;
use super::controller::{ ChatUser, ConversationController, Event, Reply };

pub type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Turns raw message text into a controller event.
pub fn message_event(text: &str, message_id: MessageId, bot_username: &str) -> Event {
    if !text.starts_with('/') {
        return Event::Text {
            text: text.to_string(),
            message_id,
        };
    }

    match Command::parse(text, bot_username) {
        Ok(command) => Event::Command { command, message_id },
        Err(_) => Event::UnknownCommand {
            text: text.to_string(),
            message_id,
        },
    }
}

pub async fn handle_message(
    bot: Bot,
    msg: Message,
    me: Me,
    controller: Arc<ConversationController>
) -> HandlerResult {
    let Some(from) = msg.from.as_ref() else {
        return Ok(());
    };

    // Stickers, photos and the like reach the active scene as empty input
    let event = message_event(msg.text().unwrap_or_default(), msg.id, me.username());
    let reply = match controller.handle(msg.chat.id, &ChatUser::from(from), event).await {
        Ok(reply) => reply,
        Err(e) => {
            tracing::error!("Failed to handle message in chat {}: {}", msg.chat.id, e);
            Reply::from(e)
        }
    };

    // Outside a callback there is nothing to attach a toast to
    if let Reply::Toast(text) = reply {
        bot.send_message(msg.chat.id, text).await?;
    }

    Ok(())
}

pub async fn handle_callback(
    bot: Bot,
    q: CallbackQuery,
    controller: Arc<ConversationController>
) -> HandlerResult {
    let action = q.data.as_deref().map(str::parse::<CallbackAction>);

    let reply = match (action, q.message.as_ref()) {
        (Some(Ok(action)), Some(message)) => {
            let event = Event::Callback {
                action,
                message_id: Some(message.id()),
            };
            match controller.handle(message.chat().id, &ChatUser::from(&q.from), event).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::error!("Failed to handle callback from {}: {}", q.from.id, e);
                    Reply::from(e)
                }
            }
        }
        (Some(Err(e)), _) => {
            tracing::warn!("{}", e);
            Reply::Toast(notices::BUTTON_EXPIRED.to_string())
        }
        _ => Reply::Silent,
    };

    // Always answer, so the client stops showing the loading state
    let answer = bot.answer_callback_query(q.id.clone());
    match reply {
        Reply::Toast(text) => answer.text(text).await?,
        Reply::Silent => answer.await?,
    };

    Ok(())
}
