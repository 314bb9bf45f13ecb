//! # telegram-gemini-bot
//!
//! Mention-gated Telegram chat bot backed by Gemini, with bounded per-user
//! conversation memory, literal commands, and an append-only transcript.
//!
//! **Public API:** [`run_bot`] for the full bot; [`build_components`] /
//! [`build_chain`] plus the handler types for custom wiring and tests.

pub mod commands;
pub mod components;
pub mod config;
pub mod handlers;
pub mod mention;
pub mod telegram;
pub mod transcript;

use anyhow::Result;
use tracing::info;

pub use commands::{Command, REPLY_APOLOGY, REPLY_HELP, REPLY_NUDGE, REPLY_PING, REPLY_RESET};
pub use components::{build_chain, build_components, BotComponents};
pub use config::{BotConfig, DEFAULT_PERSONA};
pub use handlers::{ChatHandler, CommandHandler};
pub use mention::{resolve_question, MentionOutcome};
pub use transcript::TranscriptLogger;

/// Main entry: validate config, init logging, build components and chain,
/// then run the repl until the process stops.
pub async fn run_bot(config: BotConfig) -> Result<()> {
    config.validate()?;
    bot_core::init_tracing(&config.log_file)?;

    info!(
        model = %config.gemini_model,
        memory_file = %config.memory_file,
        "Starting telegram-gemini-bot"
    );

    let components = build_components(&config)?;
    let chain = build_chain(&components, &config);

    telegram::run_repl(
        components.teloxide_bot.clone(),
        chain,
        components.bot_username.clone(),
    )
    .await
}
