//! Natural-language questions about the stock, answered by a hosted model.
//!
//! The prompt carries the whole catalog and a window of the most recent transactions as JSON. Answers come back
//! as markdown-flavored text; [`render_emphasis`] turns its bold and italic markers into terminal styling.

use std::fmt::Debug;

use async_trait::async_trait;
use console::style;
use reqwest::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::instrument;

use crate::transaction::Transaction;
use crate::types::Item;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("missing API key, set {API_KEY_VAR} or pass --gemini-api-key")]
    MissingApiKey,

    #[error("the question is empty")]
    EmptyQuestion,

    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response parsing failed: {0}")]
    ResponseParseFailed(String),

    #[error("the model returned no answer")]
    EmptyResponse,
}

#[async_trait]
pub trait InsightGenerator: Debug + Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InsightError>;
}

/// Assemble the analyst prompt. Only the first `window` transactions of `transactions` (newest first) are
/// included.
pub fn build_prompt(items: &[Item], transactions: &[Transaction], window: usize, question: &str) -> String {
    let inventory = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
    let recent = serde_json::to_string_pretty(&transactions[..transactions.len().min(window)])
        .unwrap_or_else(|_| "[]".to_string());

    format!(
        "You are an expert inventory analyst for a company. Your task is to analyze the provided inventory data and \
         transaction logs to answer the user's question.\n\n\
         Current Inventory Data:\n{inventory}\n\n\
         Recent Transaction Log (most recent first):\n{recent}\n\n\
         User's Question:\n\"{question}\"\n\n\
         Based on the data, provide a concise, insightful, and easy-to-understand answer. Use markdown for \
         formatting if it helps clarity (e.g., lists, bold text).\n"
    )
}

/// Reject blank questions before anything is sent.
pub fn check_question(question: &str) -> Result<&str, InsightError> {
    let question = question.trim();
    if question.is_empty() {
        Err(InsightError::EmptyQuestion)
    }
    else {
        Ok(question)
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> Option<String> {
        let text = self
            .candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .filter_map(|p| p.text)
            .collect::<String>();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Client for the `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client:  Client,
    api_key: String,
    api_url: String,
    model:   String,
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new<K: ToString>(api_key: K) -> Result<Self, InsightError> {
        let api_key = api_key.to_string();
        if api_key.trim().is_empty() {
            return Err(InsightError::MissingApiKey);
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, InsightError> {
        Self::new(std::env::var(API_KEY_VAR).map_err(|_| InsightError::MissingApiKey)?)
    }

    pub fn with_model<M: ToString>(mut self, model: M) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn with_api_url<U: ToString>(mut self, api_url: U) -> Self {
        self.api_url = api_url.to_string().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl InsightGenerator for GeminiClient {
    #[instrument(level = "trace", skip(self, prompt), fields(model = %self.model, len = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, InsightError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.api_url, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| InsightError::RequestFailed(e.to_string()))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .json::<GenerateResponse>()
                    .await
                    .map_err(|e| InsightError::ResponseParseFailed(e.to_string()))?;
                debug!("received {} candidate(s)", body.candidates.len());
                body.text().ok_or(InsightError::EmptyResponse)
            }
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(InsightError::Api {
                    status: status.as_u16(),
                    message,
                })
            }
        }
    }
}

/// Replace `**bold**` and `*italic*` spans with terminal styling. Unbalanced markers are left as they are.
pub fn render_emphasis(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('*') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let (marker, bold) = if tail.starts_with("**") { ("**", true) } else { ("*", false) };
        let body = &tail[marker.len()..];

        match body.find(marker) {
            Some(end) if end > 0 => {
                let span = &body[..end];
                if bold {
                    out.push_str(&style(span).bold().to_string());
                }
                else {
                    out.push_str(&style(span).italic().to_string());
                }
                rest = &body[end + marker.len()..];
            }
            _ => {
                out.push_str(marker);
                rest = body;
            }
        }
    }

    out.push_str(rest);
    out
}
