//! Domain models: proficiency levels, native languages, vocabulary items and lessons.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pedagogical difficulty tier.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Level {
  Beginner,
  Intermediate,
  Advanced,
}

impl Level {
  pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

  pub fn as_str(&self) -> &'static str {
    match self {
      Level::Beginner => "beginner",
      Level::Intermediate => "intermediate",
      Level::Advanced => "advanced",
    }
  }

  pub fn german_name(&self) -> &'static str {
    match self {
      Level::Beginner => "Anfänger",
      Level::Intermediate => "Mittelstufe",
      Level::Advanced => "Fortgeschritten",
    }
  }

  pub fn english_name(&self) -> &'static str {
    match self {
      Level::Beginner => "Beginner",
      Level::Intermediate => "Intermediate",
      Level::Advanced => "Advanced",
    }
  }
}

impl fmt::Display for Level {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Level {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Level::ALL
      .into_iter()
      .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown level '{}'", s))
  }
}

/// Language that translations and feedback are rendered in.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Language {
  En,
  Hi,
  Es,
  Fr,
  Pt,
}

impl Language {
  pub const ALL: [Language; 5] = [Language::En, Language::Hi, Language::Es, Language::Fr, Language::Pt];

  pub fn code(&self) -> &'static str {
    match self {
      Language::En => "en",
      Language::Hi => "hi",
      Language::Es => "es",
      Language::Fr => "fr",
      Language::Pt => "pt",
    }
  }

  /// Name used inside prompts.
  pub fn english_name(&self) -> &'static str {
    match self {
      Language::En => "English",
      Language::Hi => "Hindi",
      Language::Es => "Spanish",
      Language::Fr => "French",
      Language::Pt => "Portuguese",
    }
  }

  /// Name shown to users in the language picker.
  pub fn display_name(&self) -> &'static str {
    match self {
      Language::En => "English",
      Language::Hi => "हिंदी (Hindi)",
      Language::Es => "Español (Spanish)",
      Language::Fr => "Français (French)",
      Language::Pt => "Português (Portuguese)",
    }
  }
}

impl fmt::Display for Language {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

impl FromStr for Language {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Language::ALL
      .into_iter()
      .find(|l| l.code().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| format!("unknown language '{}'", s))
  }
}

/// A validated generation request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
  pub level: Level,
  pub native_language: Language,
  /// `None` lets the model choose the topic.
  pub topic: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
  #[serde(alias = "german")]
  pub german_word: String,
  pub translation: String,
  #[serde(alias = "example")]
  pub example_sentence: String,
  pub example_translation: String,
}

impl VocabularyItem {
  fn is_complete(&self) -> bool {
    [&self.german_word, &self.translation, &self.example_sentence, &self.example_translation]
      .iter()
      .all(|s| !s.trim().is_empty())
  }
}

/// Number of vocabulary entries every lesson carries.
pub const VOCABULARY_SIZE: usize = 5;

/// Lesson body as produced by the model, before `id`/`createdAt` are attached.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LessonDraft {
  #[serde(alias = "title")]
  pub title_native: String,
  pub title_german: String,
  #[serde(alias = "story")]
  pub story_native: String,
  pub story_german: String,
  pub vocabulary: Vec<VocabularyItem>,
}

impl LessonDraft {
  /// Structural check: exactly five vocabulary entries and no empty text fields.
  pub fn check(&self) -> Result<(), String> {
    if self.vocabulary.len() != VOCABULARY_SIZE {
      return Err(format!(
        "expected {} vocabulary items, got {}",
        VOCABULARY_SIZE,
        self.vocabulary.len()
      ));
    }
    let titled = [&self.title_native, &self.title_german, &self.story_native, &self.story_german]
      .iter()
      .all(|s| !s.trim().is_empty());
    if !titled {
      return Err("empty title or story field".into());
    }
    if let Some(pos) = self.vocabulary.iter().position(|v| !v.is_complete()) {
      return Err(format!("vocabulary item {} has an empty field", pos));
    }
    Ok(())
  }
}

/// Completed lesson returned to the caller. Immutable once built.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
  pub id: String,
  pub level: Level,
  pub title_native: String,
  pub title_german: String,
  pub story_native: String,
  pub story_german: String,
  pub vocabulary: Vec<VocabularyItem>,
  pub created_at: DateTime<Utc>,
}

impl Lesson {
  pub fn from_draft(draft: LessonDraft, level: Level, id: String, created_at: DateTime<Utc>) -> Self {
    Self {
      id,
      level,
      title_native: draft.title_native,
      title_german: draft.title_german,
      story_native: draft.story_native,
      story_german: draft.story_german,
      vocabulary: draft.vocabulary,
      created_at,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(w: &str) -> VocabularyItem {
    VocabularyItem {
      german_word: w.into(),
      translation: "t".into(),
      example_sentence: "Das ist ein Satz.".into(),
      example_translation: "This is a sentence.".into(),
    }
  }

  fn draft(n: usize) -> LessonDraft {
    LessonDraft {
      title_native: "At the market".into(),
      title_german: "Auf dem Markt".into(),
      story_native: "Anna buys apples.".into(),
      story_german: "Anna kauft Äpfel.".into(),
      vocabulary: (0..n).map(|i| item(&format!("Wort{}", i))).collect(),
    }
  }

  #[test]
  fn level_and_language_parse_case_insensitively() {
    assert_eq!("Beginner".parse::<Level>(), Ok(Level::Beginner));
    assert_eq!(" advanced ".parse::<Level>(), Ok(Level::Advanced));
    assert!("expert".parse::<Level>().is_err());
    assert_eq!("FR".parse::<Language>(), Ok(Language::Fr));
    assert!("de".parse::<Language>().is_err());
  }

  #[test]
  fn draft_check_requires_exactly_five_items() {
    assert!(draft(5).check().is_ok());
    assert!(draft(4).check().is_err());
    assert!(draft(6).check().is_err());
  }

  #[test]
  fn draft_check_rejects_blank_fields() {
    let mut d = draft(5);
    d.vocabulary[2].translation = "  ".into();
    let err = d.check().unwrap_err();
    assert!(err.contains("item 2"));

    let mut d = draft(5);
    d.story_german = String::new();
    assert!(d.check().is_err());
  }

  #[test]
  fn vocabulary_accepts_prompt_keys_and_serializes_canonical_names() {
    let v: VocabularyItem = serde_json::from_str(
      r#"{"german":"der Apfel","translation":"apple","example":"Ich esse einen Apfel.","exampleTranslation":"I eat an apple."}"#,
    )
    .unwrap();
    assert_eq!(v.german_word, "der Apfel");
    let out = serde_json::to_value(&v).unwrap();
    assert_eq!(out["germanWord"], "der Apfel");
    assert_eq!(out["exampleSentence"], "Ich esse einen Apfel.");
  }

  #[test]
  fn lesson_serializes_camel_case() {
    let lesson = Lesson::from_draft(draft(5), Level::Intermediate, "lesson_1".into(), Utc::now());
    let v = serde_json::to_value(&lesson).unwrap();
    assert_eq!(v["level"], "intermediate");
    assert_eq!(v["titleGerman"], "Auf dem Markt");
    assert!(v["createdAt"].is_string());
    assert_eq!(v["vocabulary"].as_array().unwrap().len(), 5);
  }
}
