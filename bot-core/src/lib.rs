//! # bot-core
//!
//! Core types and traits for the chat bot: [`Bot`], [`Handler`],
//! [`HandlerChain`], message and user types, error types, and tracing
//! initialization. Transport-agnostic; the Telegram adapter and the
//! handlers live in the bot crate.

pub mod bot;
pub mod chain;
pub mod error;
pub mod logger;
pub mod types;

pub use bot::Bot;
pub use chain::HandlerChain;
pub use error::{BotError, Result};
pub use logger::init_tracing;
pub use types::{
    Chat, Handler, HandlerResponse, Message, MessageDirection, ToCoreMessage, ToCoreUser, User,
};
