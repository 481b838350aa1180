//! Minimal Gemini client: `models/{model}:generateContent` with a single user part.
//!
//! Calls log model name, latency, token usage and response size (not contents).
//! The API key is never logged.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::completion::{env_credential, http_client, status_error, CompletionBackend};
use crate::error::CompletionError;

#[derive(Clone)]
pub struct GeminiClient {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl GeminiClient {
  /// Construct the client if we find GEMINI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = env_credential("GEMINI_API_KEY")?;
    let base_url = std::env::var("GEMINI_BASE_URL")
      .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".into());
    let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into());
    let client = http_client()?;
    Some(Self { client, api_key, base_url, model })
  }
}

#[async_trait]
impl CompletionBackend for GeminiClient {
  fn name(&self) -> String {
    format!("gemini/{}", self.model)
  }

  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
    let url = format!("{}/models/{}:generateContent", self.base_url.trim_end_matches('/'), self.model);
    let req = GenerateContentRequest {
      contents: vec![Content { role: "user".into(), parts: vec![Part { text: prompt.into() }] }],
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "lessons-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header("x-goog-api-key", self.api_key.as_str())
      .json(&req).send().await?;

    if !res.status().is_success() {
      return Err(status_error(res).await);
    }

    let body: GenerateContentResponse = res.json().await.map_err(|e| CompletionError::Decode(e.to_string()))?;
    if let Some(usage) = &body.usage_metadata {
      info!(prompt_tokens = ?usage.prompt_token_count, completion_tokens = ?usage.candidates_token_count, total_tokens = ?usage.total_token_count, "Gemini usage");
    }
    let text = body.candidates.first()
      .and_then(|c| c.content.as_ref())
      .map(|c| c.parts.iter().filter_map(|p| p.text.as_deref()).collect::<String>())
      .unwrap_or_default();

    info!(elapsed = ?start.elapsed(), response_len = text.len(), "Gemini response received");
    if text.trim().is_empty() {
      return Err(CompletionError::Empty);
    }
    Ok(text)
  }
}

// --- generateContent DTOs ---

#[derive(Serialize)]
struct GenerateContentRequest { contents: Vec<Content> }
#[derive(Serialize)]
struct Content { role: String, parts: Vec<Part> }
#[derive(Serialize)]
struct Part { text: String }

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
  #[serde(default)] candidates: Vec<Candidate>,
  #[serde(default)] usage_metadata: Option<UsageMetadata>,
}
#[derive(Deserialize)]
struct Candidate { #[serde(default)] content: Option<CandidateContent> }
#[derive(Deserialize)]
struct CandidateContent { #[serde(default)] parts: Vec<CandidatePart> }
#[derive(Deserialize)]
struct CandidatePart { #[serde(default)] text: Option<String> }
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
  #[serde(default)] prompt_token_count: Option<u32>,
  #[serde(default)] candidates_token_count: Option<u32>,
  #[serde(default)] total_token_count: Option<u32>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn response_parts_are_concatenated() {
    let body: GenerateContentResponse = serde_json::from_str(
      r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"{\"a\":"},{"text":"1}"}]}}],
          "usageMetadata":{"promptTokenCount":10,"candidatesTokenCount":4,"totalTokenCount":14}}"#,
    )
    .unwrap();
    let text: String = body.candidates[0].content.as_ref().unwrap().parts.iter()
      .filter_map(|p| p.text.as_deref()).collect();
    assert_eq!(text, "{\"a\":1}");
    assert_eq!(body.usage_metadata.unwrap().total_token_count, Some(14));
  }

  #[test]
  fn blocked_response_without_content_decodes() {
    let body: GenerateContentResponse =
      serde_json::from_str(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#).unwrap();
    assert!(body.candidates[0].content.is_none());
  }
}
