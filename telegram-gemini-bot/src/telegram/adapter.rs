//! Teloxide-backed implementation of [`bot_core::Bot`].

use async_trait::async_trait;
use bot_core::{Bot as CoreBot, BotError, Chat, Result};
use teloxide::{prelude::*, types::ChatAction, types::ChatId};

/// Hard cap on outbound reply length (Telegram's message limit).
pub const MAX_REPLY_CHARS: usize = 4096;

/// Truncates `text` to at most [`MAX_REPLY_CHARS`] characters, respecting
/// char boundaries.
pub fn truncate_reply(text: &str) -> &str {
    match text.char_indices().nth(MAX_REPLY_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Thin wrapper around `teloxide::Bot` implementing the core `Bot` trait.
/// All outbound text passes through [`truncate_reply`].
pub struct TelegramBotAdapter {
    bot: teloxide::Bot,
}

impl TelegramBotAdapter {
    /// Creates an adapter from an existing teloxide bot.
    pub fn new(bot: teloxide::Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl CoreBot for TelegramBotAdapter {
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()> {
        self.bot
            .send_message(ChatId(chat.id), truncate_reply(text).to_string())
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }

    async fn send_typing(&self, chat: &Chat) -> Result<()> {
        self.bot
            .send_chat_action(ChatId(chat.id), ChatAction::Typing)
            .await
            .map_err(|e| BotError::Bot(e.to_string()))?;
        Ok(())
    }
}
