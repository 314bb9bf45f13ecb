//! Conversational handler: typing indicator, search-prefix strip,
//! transcript, prompt assembly, generation call, memory update, reply.
//!
//! The whole path runs as one `Result`-returning function; the single
//! translation point at the bottom of [`Handler::handle`] logs the error
//! chain and answers with the fixed apology, so no fault drops a user's
//! message silently.

use std::sync::Arc;

use async_trait::async_trait;
use bot_core::{Bot, Handler, HandlerResponse, Message, Result};
use chat_memory::ConversationStore;
use gemini_client::GenerationClient;
use prompt::Turn;
use tracing::{info, instrument};

use crate::commands::{split_search_prefix, REPLY_APOLOGY};
use crate::mention::{resolve_question, MentionOutcome};
use crate::transcript::TranscriptLogger;

/// Handles conversational messages end to end and returns
/// `HandlerResponse::Reply(text)` on success.
pub struct ChatHandler {
    bot: Arc<dyn Bot>,
    store: ConversationStore,
    generation: Arc<dyn GenerationClient>,
    transcript: TranscriptLogger,
    persona: String,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
}

impl ChatHandler {
    pub fn new(
        bot: Arc<dyn Bot>,
        store: ConversationStore,
        generation: Arc<dyn GenerationClient>,
        transcript: TranscriptLogger,
        persona: String,
        bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
    ) -> Self {
        Self {
            bot,
            store,
            generation,
            transcript,
            persona,
            bot_username,
        }
    }

    /// The user turn text: the question as-is, or the composed reply-context
    /// block when the message replies to another message.
    fn user_turn_text(message: &Message, question: &str) -> String {
        if message.reply_to_message_id.is_some() {
            let quoted = message.reply_to_message_content.as_deref().unwrap_or("");
            prompt::compose_reply_context(quoted, question)
        } else {
            question.to_string()
        }
    }

    /// The conversational path. Every failure in here propagates to the
    /// translation point in `handle`.
    async fn converse(&self, message: &Message, question: &str) -> anyhow::Result<String> {
        self.bot.send_typing(&message.chat).await?;

        let (prompt_text, use_search) = split_search_prefix(question);
        if use_search {
            info!(user_id = message.user.id, query = %prompt_text, "Web search requested");
        }

        self.transcript.log_user(message)?;

        let user_text = Self::user_turn_text(message, prompt_text);
        let user_id = message.user.id.to_string();
        let history = self.store.history(&user_id).await;
        let turns = prompt::assemble(
            &self.persona,
            chrono::Local::now().date_naive(),
            history,
            &user_text,
        );

        info!(
            user_id = message.user.id,
            turn_count = turns.len(),
            use_search = use_search,
            "Submitting to generation backend"
        );
        let reply = self.generation.generate(turns, use_search).await?;

        self.store
            .append_exchange(&user_id, Turn::user(user_text), Turn::assistant(reply.clone()))
            .await?;

        self.bot.reply_to(message, &reply).await?;

        let bot_tag = self
            .bot_username
            .read()
            .await
            .clone()
            .unwrap_or_else(|| "bot".to_string());
        self.transcript.log_bot(&message.chat, &bot_tag, &reply)?;

        info!(user_id = message.user.id, reply_len = reply.len(), "Reply sent");
        Ok(reply)
    }
}

#[async_trait]
impl Handler for ChatHandler {
    #[instrument(skip(self, message))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        let bot_username = self.bot_username.read().await.clone();
        let question = match resolve_question(message, bot_username.as_deref()) {
            MentionOutcome::Question(q) => q,
            // Empty mentions were already answered by the command handler.
            _ => return Ok(HandlerResponse::Continue),
        };

        match self.converse(message, &question).await {
            Ok(reply) => Ok(HandlerResponse::Reply(reply)),
            Err(e) => {
                super::log_error_chain(&e, "Conversational path failed");
                if let Err(send_err) = self.bot.reply_to(message, REPLY_APOLOGY).await {
                    super::log_error_chain(
                        &anyhow::Error::from(send_err),
                        "Failed to send apology reply",
                    );
                }
                Ok(HandlerResponse::Stop)
            }
        }
    }
}
