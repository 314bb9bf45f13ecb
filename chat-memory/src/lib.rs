//! # chat-memory
//!
//! Per-user conversation history behind a single persisted JSON document.
//!
//! [`ConversationStore`] owns a mapping from user id to an ordered turn
//! sequence. The document is read fully at startup and rewritten in full on
//! every mutating operation; there is no append persistence and no
//! transactional guarantee across a read-generate-append cycle (a crash
//! between mutation and save loses the most recent exchange).
//!
//! History length is capped at `2 × max_turns` turns (paired user+assistant
//! appends keep it even); the oldest turns are evicted from the front when a
//! push would exceed the cap.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use prompt::Turn;
use tokio::sync::RwLock;
use tracing::info;

/// Default number of stored exchanges per user (user+assistant pairs).
pub const DEFAULT_MAX_TURNS: usize = 10;

type MemoryTable = HashMap<String, Vec<Turn>>;

/// Conversation store: user id → bounded turn sequence, persisted as one
/// JSON document. Clone shares the underlying table.
///
/// The lock is held per operation only; concurrent messages from the same
/// user may interleave their read-generate-append cycles, and the last save
/// wins. That race is accepted, not guarded (see DESIGN.md).
#[derive(Clone)]
pub struct ConversationStore {
    path: PathBuf,
    max_turns: usize,
    table: Arc<RwLock<MemoryTable>>,
}

impl ConversationStore {
    /// Opens the store at `path`, reading the persisted document if it
    /// exists. A missing file yields an empty table; a present but
    /// unparsable file is an error.
    pub fn load(path: impl Into<PathBuf>, max_turns: usize) -> Result<Self> {
        let path = path.into();
        let table: MemoryTable = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read memory document {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse memory document {}", path.display()))?
        } else {
            MemoryTable::new()
        };

        info!(
            path = %path.display(),
            users = table.len(),
            max_turns = max_turns,
            "Conversation store loaded"
        );

        Ok(Self {
            path,
            max_turns,
            table: Arc::new(RwLock::new(table)),
        })
    }

    /// Snapshot of the user's stored turns, in order. Empty when the user
    /// has no history yet; no entry is installed by reading.
    pub async fn history(&self, user_id: &str) -> Vec<Turn> {
        let table = self.table.read().await;
        table.get(user_id).cloned().unwrap_or_default()
    }

    /// Appends one user+assistant exchange, evicting the oldest turns from
    /// the front until the cap holds, then rewrites the document. Installs
    /// a fresh history for a user seen for the first time.
    pub async fn append_exchange(
        &self,
        user_id: &str,
        user_turn: Turn,
        assistant_turn: Turn,
    ) -> Result<()> {
        let mut table = self.table.write().await;
        let history = table.entry(user_id.to_string()).or_default();
        history.push(user_turn);
        history.push(assistant_turn);

        let cap = self.max_turns * 2;
        if history.len() > cap {
            let excess = history.len() - cap;
            history.drain(..excess);
        }

        let len = history.len();
        self.save_table(&table)?;
        info!(user_id = %user_id, history_len = len, "Exchange appended to memory");
        Ok(())
    }

    /// Removes the user's entry entirely and rewrites the document. Returns
    /// whether an entry existed. A later message starts a fresh history.
    pub async fn reset(&self, user_id: &str) -> Result<bool> {
        let mut table = self.table.write().await;
        let existed = table.remove(user_id).is_some();
        self.save_table(&table)?;
        info!(user_id = %user_id, existed = existed, "Memory reset");
        Ok(existed)
    }

    /// Number of users with stored history.
    pub async fn user_count(&self) -> usize {
        self.table.read().await.len()
    }

    /// Serializes the full table and overwrites the document. Every save is
    /// a full rewrite; write errors propagate to the caller.
    fn save_table(&self, table: &MemoryTable) -> Result<()> {
        let raw = serde_json::to_string_pretty(table)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write memory document {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prompt::TurnRole;

    fn store(dir: &tempfile::TempDir, max_turns: usize) -> ConversationStore {
        ConversationStore::load(dir.path().join("memory.json"), max_turns).unwrap()
    }

    /// **Test: a missing document loads as an empty table.**
    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, DEFAULT_MAX_TURNS);
        assert_eq!(store.user_count().await, 0);
        assert!(store.history("42").await.is_empty());
    }

    /// **Test: append_exchange installs a fresh history and stores the pair in order.**
    #[tokio::test]
    async fn append_creates_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, DEFAULT_MAX_TURNS);
        store
            .append_exchange("42", Turn::user("hello"), Turn::assistant("hi there"))
            .await
            .unwrap();

        let history = store.history("42").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, TurnRole::User);
        assert_eq!(history[0].text(), "hello");
        assert_eq!(history[1].role, TurnRole::Assistant);
        assert_eq!(history[1].text(), "hi there");
    }

    /// **Test: history length is min(2N, 2×max_turns) and always even; eviction is FIFO.**
    #[tokio::test]
    async fn eviction_is_fifo_at_cap() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, 10);

        for i in 0..11 {
            store
                .append_exchange(
                    "42",
                    Turn::user(format!("question {}", i)),
                    Turn::assistant(format!("answer {}", i)),
                )
                .await
                .unwrap();
            let len = store.history("42").await.len();
            assert_eq!(len, usize::min(2 * (i + 1), 20));
            assert_eq!(len % 2, 0);
        }

        // The oldest pair (question 0 / answer 0) is gone; question 1 leads.
        let history = store.history("42").await;
        assert_eq!(history.len(), 20);
        assert_eq!(history[0].text(), "question 1");
        assert_eq!(history[19].text(), "answer 10");
    }

    /// **Test: reset removes the entry entirely; the next append starts fresh.**
    #[tokio::test]
    async fn reset_removes_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir, DEFAULT_MAX_TURNS);
        store
            .append_exchange("42", Turn::user("hello"), Turn::assistant("hi"))
            .await
            .unwrap();

        assert!(store.reset("42").await.unwrap());
        assert_eq!(store.user_count().await, 0);
        assert!(!store.reset("42").await.unwrap());

        store
            .append_exchange("42", Turn::user("again"), Turn::assistant("fresh"))
            .await
            .unwrap();
        let history = store.history("42").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text(), "again");
    }

    /// **Test: the document round-trips: a second store sees what the first saved.**
    #[tokio::test]
    async fn document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        {
            let store = ConversationStore::load(&path, DEFAULT_MAX_TURNS).unwrap();
            store
                .append_exchange("42", Turn::user("persist me"), Turn::assistant("done"))
                .await
                .unwrap();
        }

        let reloaded = ConversationStore::load(&path, DEFAULT_MAX_TURNS).unwrap();
        let history = reloaded.history("42").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text(), "persist me");
        assert_eq!(history[1].text(), "done");
    }

    /// **Test: the persisted document is a user-id map of {role, parts:[{text}]} arrays.**
    #[tokio::test]
    async fn document_wire_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        let store = ConversationStore::load(&path, DEFAULT_MAX_TURNS).unwrap();
        store
            .append_exchange("42", Turn::user("hello"), Turn::assistant("hi"))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["42"][0]["role"], "user");
        assert_eq!(doc["42"][0]["parts"][0]["text"], "hello");
        assert_eq!(doc["42"][1]["role"], "assistant");
    }

    /// **Test: a present but corrupt document is a load error, not an empty table.**
    #[tokio::test]
    async fn corrupt_document_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ConversationStore::load(&path, DEFAULT_MAX_TURNS).is_err());
    }
}
