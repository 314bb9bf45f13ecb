//! Bot abstraction for sending messages and the typing indicator.
//!
//! [`Bot`] is transport-agnostic: production wires a Telegram-backed
//! implementation, tests substitute a recording fake.

use crate::error::Result;
use crate::types::{Chat, Message};
use async_trait::async_trait;

/// Abstraction over the outbound side of the chat platform.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<()>;

    /// Sends a reply to the given message (same chat).
    async fn reply_to(&self, message: &Message, text: &str) -> Result<()> {
        self.send_message(&message.chat, text).await
    }

    /// Shows the "typing…" indicator in the given chat. Implementations may
    /// treat this as best-effort.
    async fn send_typing(&self, chat: &Chat) -> Result<()>;
}
