//! Handlers for the bot chain: command dispatch, then conversation.

mod chat;
mod command;

pub use chat::ChatHandler;
pub use command::CommandHandler;

use tracing::error;

/// Logs an error and its cause chain. First item with `first_msg`, the rest
/// with "Caused by".
pub(crate) fn log_error_chain(e: &anyhow::Error, first_msg: &str) {
    for (i, cause) in e.chain().enumerate() {
        if i == 0 {
            error!(cause = %cause, "{}", first_msg);
        } else {
            error!(cause = %cause, "Caused by");
        }
    }
}
