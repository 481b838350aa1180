//! Text-completion seam between the lesson pipeline and the model providers.
//!
//! The backend is built once at startup and handed to `AppState`; tests swap
//! in a fake without touching process environment.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::CompletionError;
use crate::gemini::GeminiClient;
use crate::openai::OpenAiClient;

#[async_trait]
pub trait CompletionBackend: Send + Sync {
  /// Short provider/model label for logs and health output.
  fn name(&self) -> String;

  /// One prompt in, free text out. No retries.
  async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// Reads LLM_PROVIDER ("gemini" default, or "openai") and builds the matching
/// client. None when the provider's credential is absent.
pub fn backend_from_env() -> Option<Arc<dyn CompletionBackend>> {
  let provider = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".into());
  let backend: Option<Arc<dyn CompletionBackend>> = match provider.trim().to_ascii_lowercase().as_str() {
    "openai" => OpenAiClient::from_env().map(|c| Arc::new(c) as Arc<dyn CompletionBackend>),
    "gemini" => GeminiClient::from_env().map(|c| Arc::new(c) as Arc<dyn CompletionBackend>),
    other => {
      warn!(target: "lessons_backend", provider = %other, "Unknown LLM_PROVIDER; falling back to gemini");
      GeminiClient::from_env().map(|c| Arc::new(c) as Arc<dyn CompletionBackend>)
    }
  };
  if let Some(b) = &backend {
    info!(target: "lessons_backend", backend = %b.name(), "Completion backend enabled.");
  }
  backend
}

/// Non-empty value of an env var.
pub(crate) fn env_credential(key: &str) -> Option<String> {
  std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Shared HTTP client. LLM_TIMEOUT_SECS sets a request timeout; unset means none.
pub(crate) fn http_client() -> Option<reqwest::Client> {
  let mut builder = reqwest::Client::builder();
  if let Some(secs) = std::env::var("LLM_TIMEOUT_SECS").ok().and_then(|s| s.parse::<u64>().ok()) {
    builder = builder.timeout(Duration::from_secs(secs));
  }
  builder.build().ok()
}

/// Try to extract a clean error message from a provider error body
/// (`{ "error": { "message": ... } }`, shared by Gemini and OpenAI).
pub(crate) fn extract_provider_error(body: &str) -> Option<String> {
  #[derive(Deserialize)]
  struct EWrap { error: EObj }
  #[derive(Deserialize)]
  struct EObj { message: String }
  serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

/// Converts a non-success response into `CompletionError::Status`.
pub(crate) async fn status_error(res: reqwest::Response) -> CompletionError {
  let status = res.status().as_u16();
  let body = res.text().await.unwrap_or_default();
  let message = extract_provider_error(&body).unwrap_or(body);
  CompletionError::Status { status, message }
}
