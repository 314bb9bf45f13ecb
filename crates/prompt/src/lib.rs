//! # Prompt
//!
//! Conversation turn types and prompt assembly for the generation backend.
//!
//! ## Wire shape
//!
//! A [`Turn`] serializes as `{"role": "...", "parts": [{"text": "..."}]}` —
//! the same shape is used for the persisted memory document and for the
//! request payload, so stored history can be spliced into a request without
//! conversion.
//!
//! ## Assembly order
//!
//! [`assemble`] produces: one system turn (persona + current date) →
//! all stored history turns in order → one user turn with the current text.
//!
//! ## External interactions
//!
//! - **Generation backend**: output of [`assemble`] is sent as the ordered
//!   turn list of a `generateContent` request.
//! - **Memory store**: `chat-memory` persists `Vec<Turn>` per user.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Role of a turn, one-to-one with the `role` strings of the persisted
/// document and the request payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// System instruction (persona + date).
    System,
    /// User message.
    User,
    /// Model reply.
    Assistant,
}

/// One text fragment of a turn. Every turn built here has exactly one part;
/// the `parts` array exists because the wire shape requires it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnPart {
    pub text: String,
}

/// A single role-tagged exchange unit. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub parts: Vec<TurnPart>,
}

impl Turn {
    fn new(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![TurnPart { text: text.into() }],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::new(TurnRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(TurnRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(TurnRole::Assistant, text)
    }

    /// Text of the first part, or "" for a turn with no parts.
    pub fn text(&self) -> &str {
        self.parts.first().map(|p| p.text.as_str()).unwrap_or("")
    }
}

/// Formats a calendar date for the system turn, e.g. "Monday, 12 January 2025".
pub fn format_today(date: NaiveDate) -> String {
    date.format("%A, %-d %B %Y").to_string()
}

/// Builds the system turn: persona text plus the current date, annotated so
/// the model only uses the date when asked about it.
pub fn system_turn(persona: &str, today: NaiveDate) -> Turn {
    Turn::system(format!(
        "{} IMPORTANT: Today's date is {}. Use this only if asked about the date or day.",
        persona,
        format_today(today)
    ))
}

/// Composes the user turn text for a message that replies to another message.
pub fn compose_reply_context(quoted: &str, current: &str) -> String {
    format!("User replied to:\n{}\n\nUser says:\n{}", quoted, current)
}

/// Builds the full turn sequence for a generation request:
/// system turn → stored history in order → current user turn.
pub fn assemble(persona: &str, today: NaiveDate, history: Vec<Turn>, user_text: &str) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(system_turn(persona, today));
    turns.extend(history);
    turns.push(Turn::user(user_text));
    turns
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Test: Turn serializes in the `{role, parts:[{text}]}` wire shape.**
    #[test]
    fn turn_wire_shape() {
        let json = serde_json::to_value(Turn::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["parts"][0]["text"], "hi");
        let back: Turn = serde_json::from_value(json).unwrap();
        assert_eq!(back.role, TurnRole::User);
        assert_eq!(back.text(), "hi");
    }

    /// **Test: format_today produces "Weekday, D Month YYYY" without day padding.**
    #[test]
    fn format_today_human_readable() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        assert_eq!(format_today(date), "Sunday, 12 January 2025");
        let date = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        assert_eq!(format_today(date), "Monday, 3 March 2025");
    }

    /// **Test: system_turn carries persona, the date, and the date-usage note.**
    #[test]
    fn system_turn_contains_persona_and_date() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let turn = system_turn("You are a helpful companion.", date);
        assert_eq!(turn.role, TurnRole::System);
        assert!(turn.text().starts_with("You are a helpful companion."));
        assert!(turn.text().contains("Sunday, 12 January 2025"));
        assert!(turn.text().contains("only if asked about the date or day"));
    }

    /// **Test: compose_reply_context uses the quoted/says block format.**
    #[test]
    fn compose_reply_context_format() {
        assert_eq!(
            compose_reply_context("earlier text", "current text"),
            "User replied to:\nearlier text\n\nUser says:\ncurrent text"
        );
    }

    /// **Test: assemble order is system → history → current user turn.**
    #[test]
    fn assemble_order() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let history = vec![Turn::user("first"), Turn::assistant("reply")];
        let turns = assemble("Persona.", date, history, "second");
        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, TurnRole::System);
        assert_eq!(turns[1].text(), "first");
        assert_eq!(turns[2].role, TurnRole::Assistant);
        assert_eq!(turns[3].role, TurnRole::User);
        assert_eq!(turns[3].text(), "second");
    }

    /// **Test: assemble with no history yields exactly [system, user].**
    #[test]
    fn assemble_empty_history() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let turns = assemble("Persona.", date, Vec::new(), "hello");
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, TurnRole::System);
        assert_eq!(turns[1].role, TurnRole::User);
        assert_eq!(turns[1].text(), "hello");
    }
}
