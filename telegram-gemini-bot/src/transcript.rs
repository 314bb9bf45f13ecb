//! Append-only conversation transcript: one line per conversational user
//! message and one per bot reply.
//!
//! Line format: `[<RFC3339 timestamp>] [<chat label>] USER <tag>: <text>`
//! and `... BOT <tag>: <text>`. Writes are synchronous appends with no
//! retry; failures surface through the conversational error boundary.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use bot_core::{Chat, Message, User};
use chrono::Utc;

/// Display tag for a user: username, else first name, else the numeric id.
pub fn user_tag(user: &User) -> String {
    user.username
        .clone()
        .or_else(|| user.first_name.clone())
        .unwrap_or_else(|| user.id.to_string())
}

/// Transcript writer bound to one log file. Clone shares the path.
#[derive(Debug, Clone)]
pub struct TranscriptLogger {
    path: PathBuf,
}

impl TranscriptLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Appends the line for an inbound user message (raw content, before
    /// any prefix stripping).
    pub fn log_user(&self, message: &Message) -> std::io::Result<()> {
        self.append_line(&format!(
            "[{}] [{}] USER {}: {}",
            Utc::now().to_rfc3339(),
            message.chat.label(),
            user_tag(&message.user),
            message.content
        ))
    }

    /// Appends the line for an outbound bot reply.
    pub fn log_bot(&self, chat: &Chat, bot_tag: &str, text: &str) -> std::io::Result<()> {
        self.append_line(&format!(
            "[{}] [{}] BOT {}: {}",
            Utc::now().to_rfc3339(),
            chat.label(),
            bot_tag,
            text
        ))
    }

    fn append_line(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bot_core::MessageDirection;

    fn test_message(content: &str) -> Message {
        Message {
            id: "m1".to_string(),
            user: User {
                id: 7,
                username: Some("alice".to_string()),
                first_name: Some("Alice".to_string()),
                is_bot: false,
            },
            chat: Chat {
                id: 99,
                title: Some("rust chat".to_string()),
            },
            content: content.to_string(),
            direction: MessageDirection::Incoming,
            created_at: Utc::now(),
            reply_to_message_id: None,
            reply_to_message_content: None,
        }
    }

    /// **Test: user and bot lines append in order with actor tags and chat label.**
    #[test]
    fn appends_user_and_bot_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("transcript.log");
        let transcript = TranscriptLogger::new(&path);

        let message = test_message("hello bot");
        transcript.log_user(&message).unwrap();
        transcript.log_bot(&message.chat, "companion_bot", "hello human").unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[rust chat] USER alice: hello bot"));
        assert!(lines[1].contains("[rust chat] BOT companion_bot: hello human"));
    }

    /// **Test: user_tag falls back from username to first name to id.**
    #[test]
    fn user_tag_fallbacks() {
        let mut user = User {
            id: 7,
            username: Some("alice".to_string()),
            first_name: Some("Alice".to_string()),
            is_bot: false,
        };
        assert_eq!(user_tag(&user), "alice");
        user.username = None;
        assert_eq!(user_tag(&user), "Alice");
        user.first_name = None;
        assert_eq!(user_tag(&user), "7");
    }
}
