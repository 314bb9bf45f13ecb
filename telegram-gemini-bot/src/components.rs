//! Component factory: builds the store, clients, and handler chain from
//! config. Isolates assembly from the runner so tests can wire fakes at the
//! same seams.

use std::sync::Arc;

use anyhow::{Context, Result};
use bot_core::{Bot, HandlerChain};
use chat_memory::ConversationStore;
use gemini_client::{GeminiClient, GenerationClient};
use teloxide::prelude::*;
use tracing::{error, info};

use crate::config::BotConfig;
use crate::handlers::{ChatHandler, CommandHandler};
use crate::telegram::TelegramBotAdapter;
use crate::transcript::TranscriptLogger;

/// Core dependencies for the running bot; produced by [`build_components`].
pub struct BotComponents {
    pub teloxide_bot: teloxide::Bot,
    pub bot: Arc<dyn Bot>,
    pub store: ConversationStore,
    pub generation: Arc<dyn GenerationClient>,
    pub transcript: TranscriptLogger,
    pub bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
}

/// Builds all components from config: conversation store (document read
/// here, at startup), Gemini client, teloxide bot + adapter, transcript.
pub fn build_components(config: &BotConfig) -> Result<BotComponents> {
    let store = ConversationStore::load(&config.memory_file, config.memory_max_turns)
        .context("Failed to open conversation store")?;

    let generation: Arc<dyn GenerationClient> = Arc::new(
        GeminiClient::new(config.gemini_api_key.clone()).with_model(config.gemini_model.clone()),
    );

    let teloxide_bot = {
        let bot = teloxide::Bot::new(config.bot_token.clone());
        if let Some(ref url_str) = config.telegram_api_url {
            match reqwest::Url::parse(url_str) {
                Ok(url) => bot.set_api_url(url),
                Err(e) => {
                    error!(error = %e, url = %url_str, "Invalid TELEGRAM_API_URL, using default");
                    bot
                }
            }
        } else {
            bot
        }
    };

    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let transcript = TranscriptLogger::new(&config.transcript_file);
    let bot_username = Arc::new(tokio::sync::RwLock::new(None));

    info!(
        model = %config.gemini_model,
        memory_file = %config.memory_file,
        max_turns = config.memory_max_turns,
        "Components built"
    );

    Ok(BotComponents {
        teloxide_bot,
        bot,
        store,
        generation,
        transcript,
        bot_username,
    })
}

/// Builds the handler chain: command dispatch first, then conversation.
pub fn build_chain(components: &BotComponents, config: &BotConfig) -> HandlerChain {
    let command_handler = Arc::new(CommandHandler::new(
        components.bot.clone(),
        components.store.clone(),
        components.bot_username.clone(),
    ));
    let chat_handler = Arc::new(ChatHandler::new(
        components.bot.clone(),
        components.store.clone(),
        components.generation.clone(),
        components.transcript.clone(),
        config.persona.clone(),
        components.bot_username.clone(),
    ));
    HandlerChain::new()
        .add_handler(command_handler)
        .add_handler(chat_handler)
}
