//! Command handler: filters bot authors, nudges on empty mentions, and
//! answers the literal commands with canned replies.
//!
//! Runs before [`super::ChatHandler`] in the chain. Anything that is not a
//! literal command falls through as `Continue` so the conversational
//! handler can take it (including the `search`/`ask` prefix forms).

use std::sync::Arc;

use async_trait::async_trait;
use bot_core::{Bot, Handler, HandlerResponse, Message, Result};
use chat_memory::ConversationStore;
use tracing::{error, info, instrument};

use crate::commands::{Command, REPLY_APOLOGY, REPLY_NUDGE};
use crate::mention::{resolve_question, MentionOutcome};

/// Dispatches the fixed literal commands (`reset`, `help`, `ping`, `about`).
pub struct CommandHandler {
    bot: Arc<dyn Bot>,
    store: ConversationStore,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
}

impl CommandHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: ConversationStore,
        bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
    ) -> Self {
        Self {
            bot,
            store,
            bot_username,
        }
    }

    async fn send_reply(&self, message: &Message, text: &str) {
        if let Err(e) = self.bot.reply_to(message, text).await {
            error!(error = %e, user_id = message.user.id, "Failed to send command reply");
        }
    }

    /// Clears the user's history and persists, then confirms. A persistence
    /// failure is translated to the apology reply here, like any other
    /// failure on a user-visible path.
    async fn run_reset(&self, message: &Message) -> HandlerResponse {
        match self.store.reset(&message.user.id.to_string()).await {
            Ok(existed) => {
                info!(user_id = message.user.id, existed = existed, "History reset by command");
                self.send_reply(message, Command::Reset.reply()).await;
            }
            Err(e) => {
                super::log_error_chain(&e, "Failed to reset history");
                self.send_reply(message, REPLY_APOLOGY).await;
            }
        }
        HandlerResponse::Stop
    }
}

#[async_trait]
impl Handler for CommandHandler {
    /// Messages from bot accounts never enter the chain.
    async fn before(&self, message: &Message) -> Result<bool> {
        Ok(!message.user.is_bot)
    }

    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let bot_username = self.bot_username.read().await.clone();
        let question = match resolve_question(message, bot_username.as_deref()) {
            MentionOutcome::NotAddressed => return Ok(HandlerResponse::Continue),
            MentionOutcome::Empty => {
                info!(user_id = message.user.id, "Empty mention, sending nudge");
                self.send_reply(message, REPLY_NUDGE).await;
                return Ok(HandlerResponse::Stop);
            }
            MentionOutcome::Question(q) => q,
        };

        match Command::parse(&question) {
            Some(Command::Reset) => Ok(self.run_reset(message).await),
            Some(command) => {
                info!(user_id = message.user.id, command = ?command, "Literal command");
                self.send_reply(message, command.reply()).await;
                Ok(HandlerResponse::Stop)
            }
            None => Ok(HandlerResponse::Continue),
        }
    }
}
