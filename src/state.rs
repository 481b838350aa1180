//! Application state: prompts and the optional completion backend.
//!
//! Nothing here changes after startup; requests share it read-only.

use std::sync::Arc;

use tracing::{info, instrument};

use crate::completion::{backend_from_env, CompletionBackend};
use crate::config::{load_lesson_config_from_env, Prompts};

#[derive(Clone)]
pub struct AppState {
    /// `None` when no credential was configured.
    pub backend: Option<Arc<dyn CompletionBackend>>,
    pub prompts: Prompts,
}

impl AppState {
    pub fn new(backend: Option<Arc<dyn CompletionBackend>>, prompts: Prompts) -> Self {
        Self { backend, prompts }
    }

    /// Build state from env: load prompt config, init the completion backend.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let prompts = load_lesson_config_from_env()
            .map(|c| c.prompts)
            .unwrap_or_default();

        let backend = backend_from_env();
        if backend.is_none() {
            info!(target: "lessons_backend", "No completion credential configured; lesson and feedback requests will fail with a configuration error.");
        }

        Self::new(backend, prompts)
    }

    pub fn backend_name(&self) -> Option<String> {
        self.backend.as_ref().map(|b| b.name())
    }
}
