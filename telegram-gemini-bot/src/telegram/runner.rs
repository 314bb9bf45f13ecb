//! Repl runner: converts teloxide updates to core messages and hands them
//! to the handler chain, one spawned task per update.

use std::sync::Arc;

use anyhow::Result;
use bot_core::{HandlerChain, ToCoreMessage};
use teloxide::prelude::*;
use tracing::{error, info, instrument};

use super::wrappers::TelegramMessageWrapper;

/// Starts the repl with the given teloxide bot and handler chain.
///
/// Resolves the bot's own username via `get_me` first and publishes it into
/// `bot_username` so the mention gate can work. Non-text updates are
/// skipped; each text message is converted to a core message and the chain
/// runs in a spawned task so the repl keeps draining updates.
#[instrument(skip(bot, handler_chain, bot_username))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_username: Arc<tokio::sync::RwLock<Option<String>>>,
) -> Result<()> {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            *bot_username.write().await = Some(username.clone());
            info!(username = %username, "Bot username resolved");
        }
    }

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            if msg.text().is_none() {
                return Ok(());
            }
            let core_msg = TelegramMessageWrapper(&msg).to_core();
            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                "Received message"
            );

            tokio::spawn(async move {
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(error = %e, user_id = core_msg.user.id, "Handler chain failed");
                }
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
