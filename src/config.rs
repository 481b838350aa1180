//! Loading prompt configuration from TOML.
//!
//! Placeholders understood by the templates:
//!   lesson_template   : {level}, {language}, {topic_line}
//!   feedback_template : {level}, {language}, {text}

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct LessonConfig {
  #[serde(default)]
  pub prompts: Prompts,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub lesson_template: String,
  pub feedback_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      lesson_template: DEFAULT_LESSON_TEMPLATE.into(),
      feedback_template: DEFAULT_FEEDBACK_TEMPLATE.into(),
    }
  }
}

const DEFAULT_LESSON_TEMPLATE: &str = r#"You are a German language teacher. Create a lesson for {level} level students.

{topic_line}

Requirements:
1. Create a short story (3-4 sentences) in German appropriate for {level} level
2. Translate the story to {language}
3. Include exactly 5 vocabulary words from the story with:
   - German word
   - Translation to {language}
   - Example sentence in German
   - Translation of example to {language}
4. Create an engaging title in both German and {language}

Level guidelines:
- beginner: Use present tense, common words, simple sentences
- intermediate: Mix tenses, introduce compound sentences
- advanced: Use complex grammar, idioms, longer texts

Return ONLY valid JSON in this exact format (no markdown, no code blocks):
{
  "level": "{level}",
  "title": "Title in {language}",
  "titleGerman": "Titel auf Deutsch",
  "story": "Story in {language}",
  "storyGerman": "Geschichte auf Deutsch",
  "vocabulary": [
    {
      "german": "word",
      "translation": "translation",
      "example": "German example sentence",
      "exampleTranslation": "Example translation"
    }
  ]
}"#;

const DEFAULT_FEEDBACK_TEMPLATE: &str = r#"You are a German language teacher. Review this German text written by a {level} level student.

Student's text: "{text}"

Provide constructive feedback in {language} covering:
1. Grammar correctness
2. Vocabulary appropriateness for their level
3. Suggestions for improvement
4. Corrected version if needed

Be encouraging and specific."#;

/// Attempt to load `LessonConfig` from LESSON_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_lesson_config_from_env() -> Option<LessonConfig> {
  let path = std::env::var("LESSON_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_lesson_config(&s) {
      Ok(cfg) => {
        info!(target: "lessons_backend", %path, "Loaded lesson config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "lessons_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "lessons_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

pub fn parse_lesson_config(s: &str) -> Result<LessonConfig, toml::de::Error> {
  toml::from_str::<LessonConfig>(s)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn partial_override_keeps_other_defaults() {
    let cfg = parse_lesson_config(
      r#"
[prompts]
feedback_template = "Check {text} for a {level} learner, answer in {language}."
"#,
    )
    .unwrap();
    assert_eq!(cfg.prompts.feedback_template, "Check {text} for a {level} learner, answer in {language}.");
    assert_eq!(cfg.prompts.lesson_template, DEFAULT_LESSON_TEMPLATE);
  }

  #[test]
  fn empty_file_yields_defaults() {
    let cfg = parse_lesson_config("").unwrap();
    assert_eq!(cfg.prompts.lesson_template, DEFAULT_LESSON_TEMPLATE);
    assert_eq!(cfg.prompts.feedback_template, DEFAULT_FEEDBACK_TEMPLATE);
  }

  #[test]
  fn malformed_toml_is_an_error() {
    assert!(parse_lesson_config("[prompts\nlesson_template = 1").is_err());
  }
}
