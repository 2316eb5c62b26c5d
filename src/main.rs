//! SAATHI - a wellness companion chat for the terminal
//!
//! A mood-aware conversation state machine backed by Gemini, with a
//! private journal persisted across sessions.

mod config;
mod db;
mod llm;
mod prompt;
mod runtime;
mod session;
mod state_machine;
mod store;
mod ui;

use config::AppConfig;
use db::Database;
use runtime::ChatRuntime;
use session::Session;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};
use store::{KeyValueStore, MemoryStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env();

    for path in [&config.db_path, &config.log_path] {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
    }

    // Initialize logging; stdout belongs to the terminal UI
    init_logging(&config.log_path)?;

    tracing::info!(path = %config.db_path.display(), "Opening database");
    let store: Arc<dyn KeyValueStore> = match Database::open(&config.db_path) {
        Ok(db) => Arc::new(db),
        Err(e) => {
            // The journal still works for this run, it just won't persist
            tracing::error!(error = %e, "Failed to open database, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    if config.llm.is_configured() {
        tracing::info!(model = %config.llm.model, "Generation service configured");
    } else {
        tracing::warn!("No API key configured. Set GEMINI_API_KEY or LLM_GATEWAY.");
    }
    let llm_client = llm::create_service(&config.llm);

    let session = Session::new(store);
    let mut runtime = ChatRuntime::new(session, llm_client, config.llm.request_timeout);

    ui::run(&mut runtime).await?;
    tracing::info!("Session ended");

    Ok(())
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "saathi=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}
