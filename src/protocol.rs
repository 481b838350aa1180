//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Language, Lesson, Level};

//
// HTTP request/response DTOs
//

/// Raw lesson request. Fields stay loose so missing or unknown values are
/// reported as validation errors instead of extractor rejections.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateLessonIn {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, rename = "nativeLanguage")]
    pub native_language: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateLessonOut {
    pub lesson: Lesson,
}

#[derive(Debug, Default, Deserialize)]
pub struct FeedbackIn {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default, rename = "nativeLanguage")]
    pub native_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackOut {
    pub feedback: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub provider: Option<String>,
}

#[derive(Serialize)]
pub struct LevelOption {
    pub id: Level,
    pub german: &'static str,
    pub english: &'static str,
}

#[derive(Serialize)]
pub struct LanguageOption {
    pub id: Language,
    pub name: &'static str,
}

#[derive(Serialize)]
pub struct OptionsOut {
    pub levels: Vec<LevelOption>,
    pub languages: Vec<LanguageOption>,
}

pub fn options() -> OptionsOut {
    OptionsOut {
        levels: Level::ALL
            .into_iter()
            .map(|l| LevelOption { id: l, german: l.german_name(), english: l.english_name() })
            .collect(),
        languages: Language::ALL
            .into_iter()
            .map(|l| LanguageOption { id: l, name: l.display_name() })
            .collect(),
    }
}
