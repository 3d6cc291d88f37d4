use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ InlineKeyboardMarkup, MessageId, ParseMode };

use crate::error::Result;

/// Outbound side of the chat: everything the conversation flow sends,
/// rewrites or removes. All texts are HTML.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>
    ) -> Result<MessageId>;

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>
    ) -> Result<()>;

    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<()>;
}

pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Messenger for TelegramMessenger {
    async fn send(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>
    ) -> Result<MessageId> {
        let mut request = self.bot.send_message(chat_id, text).parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }

        let message = request.await?;
        Ok(message.id)
    }

    async fn edit(
        &self,
        chat_id: ChatId,
        message_id: MessageId,
        text: String,
        keyboard: Option<InlineKeyboardMarkup>
    ) -> Result<()> {
        let mut request = self.bot
            .edit_message_text(chat_id, message_id, text)
            .parse_mode(ParseMode::Html);
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard);
        }

        request.await?;
        Ok(())
    }

    async fn delete(&self, chat_id: ChatId, message_id: MessageId) -> Result<()> {
        self.bot.delete_message(chat_id, message_id).await?;
        Ok(())
    }
}
