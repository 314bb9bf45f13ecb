//! Converters from teloxide types to the core message model.
//!
//! The replied-to message (id and text) arrives inside the update, so reply
//! context is read here rather than fetched; a reply to a message without
//! text carries no quoted content.

use bot_core::{Chat, Message, MessageDirection, ToCoreMessage, ToCoreUser, User};

/// Converts a teloxide user to a core [`User`].
pub struct TelegramUserWrapper<'a>(pub &'a teloxide::types::User);

impl<'a> ToCoreUser for TelegramUserWrapper<'a> {
    fn to_core(&self) -> User {
        User {
            id: self.0.id.0 as i64,
            username: self.0.username.clone(),
            first_name: Some(self.0.first_name.clone()),
            is_bot: self.0.is_bot,
        }
    }
}

/// Converts a teloxide message to a core [`Message`].
pub struct TelegramMessageWrapper<'a>(pub &'a teloxide::types::Message);

impl<'a> ToCoreMessage for TelegramMessageWrapper<'a> {
    fn to_core(&self) -> Message {
        Message {
            id: self.0.id.to_string(),
            user: self
                .0
                .from
                .as_ref()
                .map(|u| TelegramUserWrapper(u).to_core())
                .unwrap_or_else(|| User {
                    id: 0,
                    username: None,
                    first_name: None,
                    is_bot: false,
                }),
            chat: Chat {
                id: self.0.chat.id.0,
                title: self.0.chat.title().map(String::from),
            },
            content: self.0.text().unwrap_or("").to_string(),
            direction: MessageDirection::Incoming,
            created_at: chrono::Utc::now(),
            reply_to_message_id: self.0.reply_to_message().map(|m| m.id.to_string()),
            reply_to_message_content: self
                .0
                .reply_to_message()
                .and_then(|m| m.text())
                .map(String::from),
        }
    }
}
