//! Lesson generator: prompt construction, one completion call, and tolerant
//! decoding of the model's free-text answer into a `LessonDraft`.
//!
//! Decoding flow:
//! 1) Strip code-fence markers (``` with or without a language tag) anywhere.
//! 2) Trim.
//! 3) Keep the span from the first `{` to the last `}`; no such pair is a parse error.
//! 4) Parse that span as JSON, then as a lesson draft.
//!
//! Parse diagnostics stay in the logs; callers only see a generic generation error.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, error, info, instrument};

use crate::completion::CompletionBackend;
use crate::config::Prompts;
use crate::domain::{GenerationRequest, Language, LessonDraft, Level};
use crate::error::LessonError;
use crate::util::{fill_template, trunc_for_log};

const LOG_PREVIEW: usize = 200;

pub const GENERATION_FAILED: &str = "Failed to generate lesson content";
pub const FEEDBACK_FAILED: &str = "Failed to generate feedback";

/// Lesson prompt. Pure function of the prompts and the request.
pub fn build_lesson_prompt(prompts: &Prompts, req: &GenerationRequest) -> String {
  let topic_line = match req.topic.as_deref() {
    Some(t) => format!("Topic: {}", t),
    None => "Choose an interesting everyday topic.".to_string(),
  };
  fill_template(
    &prompts.lesson_template,
    &[
      ("level", req.level.as_str()),
      ("language", req.native_language.english_name()),
      ("topic_line", &topic_line),
    ],
  )
}

pub fn build_feedback_prompt(prompts: &Prompts, text: &str, level: Level, language: Language) -> String {
  fill_template(
    &prompts.feedback_template,
    &[("level", level.as_str()), ("language", language.english_name()), ("text", text)],
  )
}

fn fence_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  // A tag is only consumed when it ends its line, so "```{...}" keeps the brace.
  RE.get_or_init(|| Regex::new(r"```(?:[A-Za-z0-9_+-]*[ \t]*\r?\n)?").expect("static regex"))
}

/// Removes every code-fence marker, with its language tag and line break.
pub fn strip_code_fences(raw: &str) -> String {
  fence_re().replace_all(raw, "").into_owned()
}

/// Recovers a JSON value from free model text.
pub fn extract_json(raw: &str) -> Result<serde_json::Value, LessonError> {
  let cleaned = strip_code_fences(raw);
  let cleaned = cleaned.trim();

  let span = match (cleaned.find('{'), cleaned.rfind('}')) {
    (Some(start), Some(end)) if start < end => &cleaned[start..=end],
    _ => return Err(LessonError::Parse("no JSON object found in model output".into())),
  };
  debug!(target: "lesson", cleaned = %trunc_for_log(span, LOG_PREVIEW), "Cleaned JSON");

  serde_json::from_str(span).map_err(|e| LessonError::Parse(e.to_string()))
}

/// Decodes a lesson draft from model text and checks its shape.
pub fn parse_lesson(raw: &str) -> Result<LessonDraft, LessonError> {
  let value = extract_json(raw)?;
  let draft: LessonDraft = serde_json::from_value(value).map_err(|e| LessonError::Parse(e.to_string()))?;
  draft.check().map_err(LessonError::Parse)?;
  Ok(draft)
}

/// Builds the prompt, calls the model once and decodes the answer.
/// Every failure surfaces as `LessonError::Generation`.
#[instrument(level = "info", skip(backend, prompts, req), fields(level = %req.level, language = %req.native_language, has_topic = req.topic.is_some()))]
pub async fn generate_lesson(
  backend: &dyn CompletionBackend,
  prompts: &Prompts,
  req: &GenerationRequest,
) -> Result<LessonDraft, LessonError> {
  let prompt = build_lesson_prompt(prompts, req);
  let start = std::time::Instant::now();

  let raw = backend.complete(&prompt).await.map_err(|e| {
    error!(target: "lesson", elapsed = ?start.elapsed(), error = %e, "Model call failed during lesson generation");
    LessonError::Generation(GENERATION_FAILED.into())
  })?;
  debug!(target: "lesson", raw = %trunc_for_log(&raw, LOG_PREVIEW), "Raw model response");

  let draft = parse_lesson(&raw).map_err(|e| {
    error!(target: "lesson", error = %e, raw = %trunc_for_log(&raw, LOG_PREVIEW), "Failed to parse model response");
    LessonError::Generation(GENERATION_FAILED.into())
  })?;

  info!(
    target: "lesson",
    elapsed = ?start.elapsed(),
    title_german = %draft.title_german,
    story_preview = %draft.story_german.chars().take(40).collect::<String>(),
    "Lesson draft generated"
  );
  Ok(draft)
}

/// Free-form writing feedback. The model's answer is returned untouched.
#[instrument(level = "info", skip(backend, prompts, text), fields(text_len = text.len(), %level, %language))]
pub async fn get_writing_feedback(
  backend: &dyn CompletionBackend,
  prompts: &Prompts,
  text: &str,
  level: Level,
  language: Language,
) -> Result<String, LessonError> {
  let prompt = build_feedback_prompt(prompts, text, level, language);
  backend.complete(&prompt).await.map_err(|e| {
    error!(target: "lesson", error = %e, "Model call failed during writing feedback");
    LessonError::Feedback(FEEDBACK_FAILED.into())
  })
}
