//! Command dispatch: exact literal commands with canned replies, and the
//! search/ask prefixes that continue to generation with the search flag set.
//!
//! Matching is case-insensitive. Exact commands terminate the turn; only
//! `reset` touches state (it clears and persists the user's history before
//! the reply is sent).

/// Fixed reply when the user mentions the bot with no content.
pub const REPLY_NUDGE: &str = "You rang? Say something after the mention and I'll answer.";

/// Fixed confirmation for `reset`.
pub const REPLY_RESET: &str = "Memory wiped. We're starting fresh.";

/// Fixed reply for `help`.
pub const REPLY_HELP: &str = "Commands:\n\
`reset` - forget our conversation\n\
`help` - this list\n\
`ping` - check I'm alive\n\
`about` - who I am\n\
`ask <question>` - answer using web search\n\
`search <query>` - answer using web search\n\
Mention me and just talk for everything else.";

/// Fixed reply for `ping`.
pub const REPLY_PING: &str = "Pong! Alive and listening.";

/// Fixed reply for `about`.
pub const REPLY_ABOUT: &str =
    "I'm a chat companion with a short memory and a long attention span. Mention me to talk.";

/// Fixed apology sent when anything on the conversational path fails.
pub const REPLY_APOLOGY: &str = "Sorry, something went wrong on my side. Please try again.";

/// The fixed literal commands. Parsing is exact (not substring) and
/// case-insensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    Help,
    Ping,
    About,
}

impl Command {
    /// Parses the mention-stripped message text as a literal command.
    pub fn parse(text: &str) -> Option<Command> {
        match text.trim().to_lowercase().as_str() {
            "reset" => Some(Command::Reset),
            "help" => Some(Command::Help),
            "ping" => Some(Command::Ping),
            "about" => Some(Command::About),
            _ => None,
        }
    }

    /// The canned reply for this command. `reset` additionally clears the
    /// user's history before this is sent.
    pub fn reply(&self) -> &'static str {
        match self {
            Command::Reset => REPLY_RESET,
            Command::Help => REPLY_HELP,
            Command::Ping => REPLY_PING,
            Command::About => REPLY_ABOUT,
        }
    }
}

/// Splits an optional `search `/`ask ` prefix off the question.
///
/// Returns the prompt text (original casing, prefix keyword and the
/// whitespace run after it removed — exactly one occurrence) and whether
/// the generation call should request web-search augmentation.
pub fn split_search_prefix(text: &str) -> (&str, bool) {
    for keyword in ["search", "ask"] {
        let Some(head) = text.get(..keyword.len()) else {
            continue;
        };
        if head.eq_ignore_ascii_case(keyword) {
            let rest = &text[keyword.len()..];
            if rest.starts_with(char::is_whitespace) {
                let rest = rest.trim_start();
                if !rest.is_empty() {
                    return (rest, true);
                }
            }
        }
    }
    (text, false)
}
