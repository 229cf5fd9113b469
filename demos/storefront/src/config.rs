// demos/storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  /// JSON seed file for the catalog; the built-in demo catalog when unset.
  pub catalog_path: Option<PathBuf>,
  pub session_prefix: String,
  pub log_format: LogFormat,
  /// Largest quantity a single request may carry.
  pub max_line_quantity: u32,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  fn from_lookup(get_env: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let catalog_path = get_env("CATALOG_PATH").filter(|p| !p.trim().is_empty()).map(PathBuf::from);

    let session_prefix = get_env("SESSION_PREFIX").unwrap_or_else(|| "session".to_string());
    if session_prefix.is_empty() || !session_prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
      return Err(AppError::Config(format!(
        "Invalid SESSION_PREFIX '{}': use ASCII letters, digits or '-'",
        session_prefix
      )));
    }

    let log_format = match get_env("LOG_FORMAT").as_deref().map(str::to_ascii_lowercase).as_deref() {
      None | Some("pretty") => LogFormat::Pretty,
      Some("json") => LogFormat::Json,
      Some(other) => return Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected pretty or json", other))),
    };

    let max_line_quantity = get_env("MAX_LINE_QUANTITY")
      .unwrap_or_else(|| "99".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid MAX_LINE_QUANTITY: {}", e)))?;
    if max_line_quantity == 0 {
      return Err(AppError::Config("MAX_LINE_QUANTITY must be at least 1".to_string()));
    }

    Ok(Self {
      catalog_path,
      session_prefix,
      log_format,
      max_line_quantity,
    })
  }
}
