//! Minimal OpenAI-compatible client. Only chat.completions with a single user
//! message and a plain-text answer.
//!
//! NOTE: We never log the API key and we keep payload previews short.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::completion::{env_credential, http_client, status_error, CompletionBackend};
use crate::error::CompletionError;

#[derive(Clone)]
pub struct OpenAiClient {
  pub client: reqwest::Client,
  pub api_key: String,
  pub base_url: String,
  pub model: String,
}

impl OpenAiClient {
  /// Construct the client if we find OPENAI_API_KEY; otherwise return None.
  pub fn from_env() -> Option<Self> {
    let api_key = env_credential("OPENAI_API_KEY")?;
    let base_url =
      std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".into());
    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());
    let client = http_client()?;
    Some(Self { client, api_key, base_url, model })
  }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
  fn name(&self) -> String {
    format!("openai/{}", self.model)
  }

  #[instrument(level = "info", skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
  async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
    let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
    let req = ChatCompletionRequest {
      model: self.model.clone(),
      messages: vec![ChatMessageReq { role: "user".into(), content: prompt.into() }],
    };

    let start = std::time::Instant::now();
    let res = self.client.post(&url)
      .header(USER_AGENT, "lessons-backend/0.1")
      .header(CONTENT_TYPE, "application/json")
      .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
      .json(&req).send().await?;

    if !res.status().is_success() {
      return Err(status_error(res).await);
    }

    let body: ChatCompletionResponse = res.json().await.map_err(|e| CompletionError::Decode(e.to_string()))?;
    if let Some(usage) = &body.usage {
      info!(prompt_tokens = ?usage.prompt_tokens, completion_tokens = ?usage.completion_tokens, total_tokens = ?usage.total_tokens, "OpenAI usage");
    }
    let text = body.choices.first()
      .and_then(|c| c.message.content.clone())
      .unwrap_or_default();

    info!(elapsed = ?start.elapsed(), response_len = text.len(), "OpenAI response received");
    if text.trim().is_empty() {
      return Err(CompletionError::Empty);
    }
    Ok(text)
  }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
  model: String,
  messages: Vec<ChatMessageReq>,
}
#[derive(Serialize)]
struct ChatMessageReq { role: String, content: String }

#[derive(Deserialize)]
struct ChatCompletionResponse {
  choices: Vec<ChatChoice>,
  #[serde(default)] usage: Option<Usage>,
}
#[derive(Deserialize)]
struct ChatChoice { message: ChatMessageResp }
#[derive(Deserialize)]
struct ChatMessageResp { content: Option<String> }
#[derive(Deserialize)]
struct Usage {
  #[serde(default)] prompt_tokens: Option<u32>,
  #[serde(default)] completion_tokens: Option<u32>,
  #[serde(default)] total_tokens: Option<u32>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn request_serializes_single_user_message() {
    let req = ChatCompletionRequest {
      model: "gpt-4o-mini".into(),
      messages: vec![ChatMessageReq { role: "user".into(), content: "Hallo".into() }],
    };
    let v = serde_json::to_value(&req).unwrap();
    assert_eq!(v["messages"][0]["role"], "user");
    assert_eq!(v["messages"][0]["content"], "Hallo");
  }

  #[test]
  fn null_content_decodes_as_none() {
    let body: ChatCompletionResponse =
      serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#).unwrap();
    assert!(body.choices[0].message.content.is_none());
    assert!(body.usage.is_none());
  }
}
