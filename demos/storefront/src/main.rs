// demos/storefront/src/main.rs

//! A line-oriented storefront boundary over the cart engine: one JSON request
//! per stdin line, one JSON response per stdout line. Logs go to stderr.

mod catalog;
mod config;
mod errors;
mod handlers;
mod requests;
mod session;
mod state;

use crate::config::{AppConfig, LogFormat};
use crate::session::SessionIssuer;
use crate::state::AppState;

use anyhow::Context;
use cartflow::{CartEngine, InMemoryCartStore};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::builder()
    .with_default_directive(Level::INFO.into())
    .from_env_lossy(); // Allow RUST_LOG override
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_span_events(FmtSpan::CLOSE) // Log when spans close, showing duration
    .with_writer(std::io::stderr);
  match format {
    LogFormat::Pretty => builder.init(),
    LogFormat::Json => builder.json().init(),
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let app_config = Arc::new(AppConfig::from_env().context("Failed to load application configuration")?);
  init_tracing(app_config.log_format);
  tracing::info!(config = ?app_config, "Application configuration loaded successfully.");

  let catalog = catalog::load_catalog(app_config.catalog_path.as_deref()).await?;
  let engine = CartEngine::new(Arc::new(catalog), Arc::new(InMemoryCartStore::new()));

  let app_state = AppState {
    engine: Arc::new(engine),
    sessions: SessionIssuer::new(app_config.session_prefix.clone()),
    config: app_config.clone(),
  };

  tracing::info!("Storefront cart ready, reading requests from stdin.");
  let mut lines = BufReader::new(tokio::io::stdin()).lines();
  let mut stdout = tokio::io::stdout();

  while let Some(line) = lines.next_line().await? {
    if line.trim().is_empty() {
      continue;
    }
    let response = handlers::handle_line(&app_state, &line).await;
    stdout.write_all(response.to_string().as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
  }

  tracing::info!("Input closed, shutting down.");
  Ok(())
}
