//! German story-lesson backend
//!
//! - Axum HTTP API
//! - Lessons and writing feedback generated by Gemini or an OpenAI-compatible model
//!
//! Important env variables:
//!   PORT               : u16 (default 3000)
//!   LLM_PROVIDER       : "gemini" (default) or "openai"
//!   GEMINI_API_KEY     : credential for the Gemini backend
//!   GEMINI_BASE_URL    : default "https://generativelanguage.googleapis.com/v1beta"
//!   GEMINI_MODEL       : default "gemini-2.5-flash"
//!   OPENAI_API_KEY     : credential for the OpenAI backend
//!   OPENAI_BASE_URL    : default "https://api.openai.com/v1"
//!   OPENAI_MODEL       : default "gpt-4o-mini"
//!   LLM_TIMEOUT_SECS   : optional request timeout for model calls
//!   LESSON_CONFIG_PATH : path to TOML config (prompt templates)
//!   LOG_LEVEL          : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT         : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod completion;
mod gemini;
mod openai;
mod generator;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  // A missing .env is fine; real deployments set the environment directly.
  dotenvy::dotenv().ok();
  telemetry::init_tracing();

  let state = Arc::new(AppState::from_env());
  let app = build_router(state);

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "lessons_backend", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "lessons_backend", error = %e, "Failed to listen for shutdown signal");
    return;
  }
  info!(target: "lessons_backend", "Shutdown signal received");
}
