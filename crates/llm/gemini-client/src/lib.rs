//! # Gemini API client
//!
//! [`GenerationClient`] trait and its Gemini `generateContent` implementation.
//! Transport-agnostic callers (handlers, tests) depend on the trait; the
//! implementation maps assembled turns onto the REST payload.
//!
//! A leading system turn becomes `systemInstruction`; remaining turns become
//! `contents` (the wire role for assistant turns is `model`). The optional
//! search flag adds the `googleSearch` tool. Transport and API errors
//! propagate; a well-formed response with no usable candidate text yields
//! [`FALLBACK_REPLY`] instead of an error, so a malformed backend response
//! never fails the message.

use anyhow::{bail, Result};
use async_trait::async_trait;
use prompt::{Turn, TurnRole};
use serde_json::{json, Value};
use tracing::info;

/// Reply used when the response carries no candidate text. Callers store it
/// as the assistant turn like any other reply.
pub const FALLBACK_REPLY: &str = "Sorry, I could not come up with a reply just now.";

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Masks an API key for safe logging: first 7 chars + "***" + last 4 chars.
/// Keys of 11 chars or fewer return "***" so no part of the key leaks.
pub fn mask_token(token: &str) -> String {
    let len = token.len();
    if len <= 11 {
        "***".to_string()
    } else {
        format!("{}***{}", &token[..7], &token[len - 4..])
    }
}

/// Generation backend interface: one ordered turn list in, one reply out.
/// Object-safe so handlers can hold `Arc<dyn GenerationClient>` and tests
/// can substitute a fake.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Requests a completion for the assembled turns. When `use_search` is
    /// set the backend is asked to augment the answer with live web search.
    async fn generate(&self, turns: Vec<Turn>, use_search: bool) -> Result<String>;
}

/// Gemini `generateContent` client over reqwest.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Builds a client for the given API key and the default API base URL.
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: "gemini-3-flash-preview".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Overrides the model identifier.
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    /// Overrides the API base URL (e.g. for proxies in tests).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

/// Builds the `generateContent` request body from the turn list.
///
/// The first turn, when it is a system turn, becomes `systemInstruction`;
/// everything else lands in `contents` with assistant mapped to the wire
/// role `model`. `use_search` adds the `googleSearch` tool.
pub fn build_request_body(turns: &[Turn], use_search: bool) -> Value {
    let mut body = json!({});
    let mut rest = turns;

    if let Some(first) = turns.first() {
        if first.role == TurnRole::System {
            body["systemInstruction"] = json!({ "parts": [{ "text": first.text() }] });
            rest = &turns[1..];
        }
    }

    let contents: Vec<Value> = rest
        .iter()
        .map(|turn| {
            let role = match turn.role {
                TurnRole::Assistant => "model",
                _ => "user",
            };
            json!({ "role": role, "parts": [{ "text": turn.text() }] })
        })
        .collect();
    body["contents"] = json!(contents);

    if use_search {
        body["tools"] = json!([{ "googleSearch": {} }]);
    }

    body
}

/// Extracts the first text part of the first candidate, if any.
pub fn extract_reply_text(response: &Value) -> Option<String> {
    response["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .filter(|text| !text.is_empty())
        .map(|text| text.to_string())
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, turns: Vec<Turn>, use_search: bool) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = build_request_body(&turns, use_search);

        info!(
            model = %self.model,
            turn_count = turns.len(),
            use_search = use_search,
            api_key = %mask_token(&self.api_key),
            "Gemini generateContent request"
        );

        let response = self.http.post(&url).json(&body).send().await?;
        let status = response.status();
        let payload: Value = response.json().await?;

        if !status.is_success() {
            let message = payload["error"]["message"]
                .as_str()
                .unwrap_or("unknown error");
            bail!("Gemini API error (HTTP {}): {}", status, message);
        }

        match extract_reply_text(&payload) {
            Some(text) => Ok(text),
            None => {
                info!("Gemini response had no candidate text; using fallback reply");
                Ok(FALLBACK_REPLY.to_string())
            }
        }
    }
}
