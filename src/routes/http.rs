//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Malformed JSON bodies are reported as validation errors in the usual `{ error }` shape.

use std::sync::Arc;
use axum::{extract::{rejection::JsonRejection, State}, Json, response::IntoResponse};
use tracing::{info, instrument, warn};

use crate::error::LessonError;
use crate::logic;
use crate::protocol::*;
use crate::state::AppState;

fn body_or_validation<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, LessonError> {
  payload.map(|Json(b)| b).map_err(|rej| {
    warn!(target: "lessons_backend", error = %rej.body_text(), "Rejected request body");
    LessonError::Validation(format!("Invalid request body: {}", rej.body_text()))
  })
}

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut { ok: true, provider: state.backend_name() })
}

#[instrument(level = "info")]
pub async fn http_get_options() -> impl IntoResponse {
  Json(options())
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_generate_lesson(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<GenerateLessonIn>, JsonRejection>,
) -> Result<Json<GenerateLessonOut>, LessonError> {
  let body = body_or_validation(payload)?;
  let lesson = logic::generate_lesson(&state, &body).await?;
  info!(target: "lesson", id = %lesson.id, level = %lesson.level, "HTTP lesson served");
  Ok(Json(GenerateLessonOut { lesson }))
}

#[instrument(level = "info", skip(state, payload))]
pub async fn http_post_feedback(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<FeedbackIn>, JsonRejection>,
) -> Result<Json<FeedbackOut>, LessonError> {
  let body = body_or_validation(payload)?;
  let feedback = logic::writing_feedback(&state, &body).await?;
  info!(target: "lesson", feedback_len = feedback.len(), "HTTP feedback served");
  Ok(Json(FeedbackOut { feedback }))
}
