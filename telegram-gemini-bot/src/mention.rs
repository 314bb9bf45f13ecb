//! Pure functions for @-mention gating and question extraction.
//!
//! The bot only answers messages that @-mention it. Resolution distinguishes
//! "not addressed at all" (ignored silently) from "addressed but empty"
//! (answered with a nudge) so empty content never reaches the command
//! dispatcher or the generation call.

use bot_core::Message;

/// What the mention gate decided for an inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MentionOutcome {
    /// No @-mention of this bot (or the username is not known yet).
    NotAddressed,
    /// Mentioned, but nothing left after stripping the mention.
    Empty,
    /// Mentioned with content: the trimmed text with the mention removed.
    Question(String),
}

/// Returns true if `text` contains an @-mention of the given bot username.
#[inline]
pub fn is_bot_mentioned(text: &str, bot_username: &str) -> bool {
    text.contains(&format!("@{}", bot_username))
}

/// Strips the bot @-mention from `text` and returns the trimmed remainder.
#[inline]
pub fn strip_mention(text: &str, bot_username: &str) -> String {
    text.replace(&format!("@{}", bot_username), "")
        .trim()
        .to_string()
}

/// Resolves whether the message addresses the bot and with what content.
/// `bot_username` is `None` until the transport has resolved it; everything
/// is unaddressed until then.
pub fn resolve_question(message: &Message, bot_username: Option<&str>) -> MentionOutcome {
    let Some(username) = bot_username else {
        return MentionOutcome::NotAddressed;
    };
    if !is_bot_mentioned(&message.content, username) {
        return MentionOutcome::NotAddressed;
    }
    let question = strip_mention(&message.content, username);
    if question.is_empty() {
        MentionOutcome::Empty
    } else {
        MentionOutcome::Question(question)
    }
}
