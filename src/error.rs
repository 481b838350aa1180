//! Error types for the completion backends and the lesson pipeline.
//!
//! `LessonError` is the only error that reaches HTTP handlers; it renders as
//! `{ "error": text }` with a client or server status.

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};

use crate::protocol::ErrorOut;

/// Failure of a single call to the external text-completion service.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
  #[error("transport error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("could not decode completion body: {0}")]
  Decode(String),

  #[error("model returned no text")]
  Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum LessonError {
  /// Missing or malformed caller input.
  #[error("{0}")]
  Validation(String),

  /// Service credential or backend not configured.
  #[error("{0}")]
  Configuration(String),

  /// Model output did not survive JSON extraction. Wrapped into `Generation`
  /// before leaving the generator.
  #[error("Failed to parse model output: {0}")]
  Parse(String),

  #[error("{0}")]
  Generation(String),

  #[error("{0}")]
  Feedback(String),
}

impl LessonError {
  pub fn status(&self) -> StatusCode {
    match self {
      LessonError::Validation(_) => StatusCode::BAD_REQUEST,
      LessonError::Configuration(_)
      | LessonError::Parse(_)
      | LessonError::Generation(_)
      | LessonError::Feedback(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl IntoResponse for LessonError {
  fn into_response(self) -> Response {
    (self.status(), Json(ErrorOut { error: self.to_string() })).into_response()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_validation_is_a_client_error() {
    assert_eq!(LessonError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
    for e in [
      LessonError::Configuration("x".into()),
      LessonError::Parse("x".into()),
      LessonError::Generation("x".into()),
      LessonError::Feedback("x".into()),
    ] {
      assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
  }

  #[test]
  fn status_error_message_includes_provider_text() {
    let e = CompletionError::Status { status: 429, message: "quota exceeded".into() };
    assert_eq!(e.to_string(), "HTTP 429: quota exceeded");
  }
}
