//! Request handling shared by the HTTP endpoints.
//!
//! This includes:
//!   - Validating raw lesson/feedback payloads
//!   - Refusing early when no completion backend is configured
//!   - Delegating to the generator and attaching `id`/`createdAt`
//!
//! Every failure is logged here before it is turned into a response.

use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::completion::CompletionBackend;
use crate::domain::{GenerationRequest, Language, Lesson, Level};
use crate::error::LessonError;
use crate::generator;
use crate::protocol::{FeedbackIn, GenerateLessonIn};
use crate::state::AppState;
use crate::util::non_blank;

const MISSING_LESSON_FIELDS: &str = "Missing required fields: level, nativeLanguage";
const MISSING_FEEDBACK_FIELDS: &str = "Missing required fields: text, level, nativeLanguage";
const MISSING_CREDENTIAL: &str = "Server configuration error: API key missing";

fn parse_level(s: &str) -> Result<Level, LessonError> {
  s.parse::<Level>().map_err(|e| LessonError::Validation(format!("Invalid level: {}", e)))
}

fn parse_language(s: &str) -> Result<Language, LessonError> {
  s.parse::<Language>().map_err(|e| LessonError::Validation(format!("Invalid nativeLanguage: {}", e)))
}

/// Checks presence first, then that both enums are known values. A blank topic counts as absent.
pub fn validate_lesson_request(body: &GenerateLessonIn) -> Result<GenerationRequest, LessonError> {
  let (level, language) = match (non_blank(body.level.as_deref()), non_blank(body.native_language.as_deref())) {
    (Some(l), Some(n)) => (l, n),
    _ => return Err(LessonError::Validation(MISSING_LESSON_FIELDS.into())),
  };
  Ok(GenerationRequest {
    level: parse_level(level)?,
    native_language: parse_language(language)?,
    topic: non_blank(body.topic.as_deref()).map(str::to_string),
  })
}

/// Time-based id with a random suffix so back-to-back calls never collide.
pub fn lesson_id(now: DateTime<Utc>) -> String {
  let suffix = Uuid::new_v4().simple().to_string();
  format!("lesson_{}_{}", now.timestamp_millis(), &suffix[..8])
}

fn require_backend(state: &AppState) -> Result<&dyn CompletionBackend, LessonError> {
  match &state.backend {
    Some(b) => Ok(b.as_ref()),
    None => {
      error!(target: "lessons_backend", "Completion API key is not set in environment variables");
      Err(LessonError::Configuration(MISSING_CREDENTIAL.into()))
    }
  }
}

#[instrument(level = "info", skip(state, body))]
pub async fn generate_lesson(state: &AppState, body: &GenerateLessonIn) -> Result<Lesson, LessonError> {
  let req = validate_lesson_request(body).map_err(|e| {
    warn!(target: "lesson", error = %e, "Rejected lesson request");
    e
  })?;
  let backend = require_backend(state)?;

  info!(target: "lesson", level = %req.level, language = %req.native_language, topic = ?req.topic, "Generating lesson");
  let draft = generator::generate_lesson(backend, &state.prompts, &req).await.map_err(|e| {
    error!(target: "lesson", error = %e, "Error in generate-lesson handler");
    LessonError::Generation(format!("Failed to generate lesson: {}", e))
  })?;

  let created_at = Utc::now();
  let lesson = Lesson::from_draft(draft, req.level, lesson_id(created_at), created_at);
  info!(target: "lesson", id = %lesson.id, "Lesson served");
  Ok(lesson)
}

#[instrument(level = "info", skip(state, body))]
pub async fn writing_feedback(state: &AppState, body: &FeedbackIn) -> Result<String, LessonError> {
  let (text, level, language) = match (
    non_blank(body.text.as_deref()),
    non_blank(body.level.as_deref()),
    non_blank(body.native_language.as_deref()),
  ) {
    (Some(t), Some(l), Some(n)) => (t, parse_level(l)?, parse_language(n)?),
    _ => {
      warn!(target: "lesson", "Rejected feedback request: missing fields");
      return Err(LessonError::Validation(MISSING_FEEDBACK_FIELDS.into()));
    }
  };
  let backend = require_backend(state)?;
  generator::get_writing_feedback(backend, &state.prompts, text, level, language).await
}

#[cfg(test)]
mod tests {
  use std::{collections::HashSet, sync::Arc};

  use super::*;
  use crate::config::Prompts;
  use crate::generator::tests::{lesson_json, FakeBackend};

  fn body(level: Option<&str>, lang: Option<&str>, topic: Option<&str>) -> GenerateLessonIn {
    GenerateLessonIn {
      level: level.map(Into::into),
      native_language: lang.map(Into::into),
      topic: topic.map(Into::into),
    }
  }

  fn state_with(backend: Arc<FakeBackend>) -> AppState {
    AppState::new(Some(backend as Arc<dyn CompletionBackend>), Prompts::default())
  }

  #[test]
  fn validation_reports_missing_fields() {
    for b in [body(None, Some("en"), None), body(Some("beginner"), None, None), body(Some(""), Some(" "), None)] {
      match validate_lesson_request(&b) {
        Err(LessonError::Validation(msg)) => assert_eq!(msg, MISSING_LESSON_FIELDS),
        other => panic!("unexpected: {other:?}"),
      }
    }
  }

  #[test]
  fn validation_rejects_unknown_values_and_drops_blank_topic() {
    assert!(matches!(
      validate_lesson_request(&body(Some("expert"), Some("en"), None)),
      Err(LessonError::Validation(_))
    ));
    let req = validate_lesson_request(&body(Some("advanced"), Some("pt"), Some("  "))).unwrap();
    assert_eq!(req.level, Level::Advanced);
    assert_eq!(req.native_language, Language::Pt);
    assert_eq!(req.topic, None);
  }

  #[test]
  fn lesson_ids_are_distinct_for_the_same_instant() {
    let now = Utc::now();
    let ids: HashSet<String> = (0..50).map(|_| lesson_id(now)).collect();
    assert_eq!(ids.len(), 50);
    assert!(ids.iter().all(|id| id.starts_with(&format!("lesson_{}_", now.timestamp_millis()))));
  }

  #[tokio::test]
  async fn missing_fields_never_reach_the_generator() {
    let backend = Arc::new(FakeBackend::replying(&lesson_json()));
    let state = state_with(backend.clone());
    let err = generate_lesson(&state, &body(None, Some("en"), None)).await.unwrap_err();
    assert!(matches!(err, LessonError::Validation(_)));
    assert_eq!(backend.call_count(), 0);
  }

  #[tokio::test]
  async fn missing_backend_is_a_configuration_error() {
    let state = AppState::new(None, Prompts::default());
    let err = generate_lesson(&state, &body(Some("beginner"), Some("en"), None)).await.unwrap_err();
    assert!(matches!(err, LessonError::Configuration(_)));
  }

  #[tokio::test]
  async fn successful_generation_attaches_metadata() {
    let backend = Arc::new(FakeBackend::replying(&lesson_json()));
    let state = state_with(backend.clone());
    let b = body(Some("intermediate"), Some("hi"), Some("Markt"));

    let first = generate_lesson(&state, &b).await.unwrap();
    let second = generate_lesson(&state, &b).await.unwrap();

    assert!(!first.id.is_empty());
    assert_eq!(first.vocabulary.len(), 5);
    assert_eq!(first.level, Level::Intermediate);
    assert_ne!(first.id, second.id);
    assert!(second.created_at >= first.created_at);
    assert_eq!(backend.call_count(), 2);
  }

  #[tokio::test]
  async fn generator_failure_message_carries_cause() {
    let state = state_with(Arc::new(FakeBackend::replying("sorry, I can't help")));
    let err = generate_lesson(&state, &body(Some("beginner"), Some("en"), None)).await.unwrap_err();
    match err {
      LessonError::Generation(msg) => {
        assert_eq!(msg, format!("Failed to generate lesson: {}", generator::GENERATION_FAILED))
      }
      other => panic!("unexpected: {other:?}"),
    }
  }

  #[tokio::test]
  async fn feedback_requires_text() {
    let backend = Arc::new(FakeBackend::replying("Sehr gut!"));
    let state = state_with(backend.clone());
    let err = writing_feedback(
      &state,
      &FeedbackIn { text: Some("   ".into()), level: Some("beginner".into()), native_language: Some("en".into()) },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, LessonError::Validation(_)));
    assert_eq!(backend.call_count(), 0);

    let ok = writing_feedback(
      &state,
      &FeedbackIn { text: Some("Ich habe Hunger.".into()), level: Some("beginner".into()), native_language: Some("es".into()) },
    )
    .await
    .unwrap();
    assert_eq!(ok, "Sehr gut!");
  }
}
