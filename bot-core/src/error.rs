//! Error types for the bot core.

use thiserror::Error;

/// Top-level error for the bot (transport and handler IO).
#[derive(Error, Debug)]
pub enum BotError {
    #[error("Bot transport error: {0}")]
    Bot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
