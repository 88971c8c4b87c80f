//! AI backend seam: one persona-conditioned round trip, no retries.
//!
//! The production implementation is [`GeminiBridge`], a thin REST client for
//! the `generateContent` endpoint. [`PlaceholderBackend`] returns a canned
//! reply so the engine can be exercised without a network.

use crate::error::{ResearchError, ResearchResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Single blocking round trip to the AI backend: system persona + user prompt
/// in, free text out. A transport or quota failure is terminal for the call;
/// retries and backoff are deliberately absent.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, model: &str, system: &str, user: &str) -> ResearchResult<String>;
}

// Gemini generateContent request/response

#[derive(Serialize)]
struct GenerateRequest {
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// REST bridge to the Gemini `generateContent` API.
pub struct GeminiBridge {
    api_key: String,
    client: reqwest::Client,
}

impl GeminiBridge {
    /// Build from environment: `NOTBORING_AI_KEY`, falling back to
    /// `GEMINI_API_KEY`. Returns `None` when no key is configured.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("NOTBORING_AI_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok()?;
        let key = api_key.trim().to_string();
        if key.is_empty() {
            return None;
        }
        Some(Self::new(key))
    }

    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.trim().to_string(),
            client,
        }
    }
}

#[async_trait]
impl ChatBackend for GeminiBridge {
    async fn complete(&self, model: &str, system: &str, user: &str) -> ResearchResult<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            GEMINI_API_BASE, model, self.api_key
        );
        let body = GenerateRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user.to_string(),
                }],
            }],
        };

        let res = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ResearchError::Transport(format!("Gemini request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ResearchError::Transport(format!(
                "Gemini API error {}: {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = res
            .json()
            .await
            .map_err(|e| ResearchError::Transport(format!("Gemini response parse failed: {}", e)))?;

        parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| ResearchError::Validation("Gemini reply had no candidates".to_string()))
    }
}

/// Canned backend: always returns the configured reply. Use in tests and
/// offline diagnostics to exercise the engine without a network.
#[derive(Debug, Clone)]
pub struct PlaceholderBackend {
    reply: String,
}

impl PlaceholderBackend {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
        }
    }
}

#[async_trait]
impl ChatBackend for PlaceholderBackend {
    async fn complete(&self, _model: &str, _system: &str, _user: &str) -> ResearchResult<String> {
        Ok(self.reply.clone())
    }
}
