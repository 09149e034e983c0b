//! Google Gemini `generateContent` client.
//!
//! Sends the whole conversation as `contents` and returns the concatenated
//! text parts of the first candidate. Authentication uses the
//! `x-goog-api-key` header.

use std::fmt;

use anaid_core::config::LlmConfig;
use anaid_core::credentials::Secret;
use anaid_core::types::Turn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::completion::CompletionModel;
use crate::error::ChatError;

/// Longest slice of an error body kept in error messages.
const MAX_ERROR_BODY: usize = 1024;

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest<'a> {
    pub contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Content<'a> {
    pub role: &'static str,
    pub parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
pub struct Part<'a> {
    pub text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl<'a> GenerateContentRequest<'a> {
    /// Map conversation turns onto Gemini `contents`, one entry per turn.
    pub fn from_turns(turns: &'a [Turn]) -> Self {
        let contents = turns
            .iter()
            .map(|turn| Content {
                role: turn.role().provider_name(),
                parts: vec![Part { text: turn.text() }],
            })
            .collect();
        Self { contents }
    }
}

impl GenerateContentResponse {
    /// Extract the reply text from the first candidate.
    pub fn reply_text(&self) -> Result<String, ChatError> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.as_deref())
                .unwrap_or("none");
            return Err(ChatError::Upstream(format!(
                "no candidates in response (block reason: {})",
                reason
            )));
        };

        let text: String = candidate
            .content
            .as_ref()
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ChatError::Upstream(format!(
                "no text in candidate (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }
        Ok(text)
    }
}

// =============================================================================
// Client
// =============================================================================

/// Completion model backed by the Gemini REST API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Secret,
}

impl fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"***")
            .finish()
    }
}

impl GeminiClient {
    /// Build a client from the `[llm]` config section.
    pub fn new(api_key: Secret, config: &LlmConfig) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
        })
    }

    /// Full URL of the `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl CompletionModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, context: &[Turn]) -> Result<String, ChatError> {
        let url = self.endpoint();
        let body = GenerateContentRequest::from_turns(context);

        tracing::debug!(model = %self.model, turns = context.len(), "Sending request to Gemini");
        let resp = self
            .http
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(ChatError::Upstream(format!(
                "Gemini API returned {}: {}",
                status,
                truncate(&text, MAX_ERROR_BODY)
            )));
        }

        let api_resp: GenerateContentResponse = resp.json().await?;
        api_resp.reply_text()
    }
}

/// Cut `text` to at most `max` bytes on a character boundary.
fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
