// demos/storefront/src/errors.rs

use std::collections::BTreeMap;

use cartflow::{CartError, Missing};
use serde_json::{json, Value};
use thiserror::Error;

/// Field name to message, in a stable order for responses.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {} field(s) invalid", .0.len())]
  Validation(FieldErrors),

  #[error("Malformed Request: {0}")]
  Malformed(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
  InsufficientStock {
    product_id: String,
    requested: u32,
    available: u32,
  },

  #[error("Conflict: {0}")]
  Conflict(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Cart Engine Error: {source}")]
  Engine {
    #[source]
    source: CartError,
  },
}

impl AppError {
  pub fn field(name: &str, message: impl Into<String>) -> Self {
    AppError::Validation(BTreeMap::from([(name.to_string(), message.into())]))
  }

  /// The HTTP-equivalent status reported to clients.
  pub fn status(&self) -> u16 {
    match self {
      AppError::Validation(_) | AppError::Malformed(_) => 400,
      AppError::NotFound(_) => 404,
      AppError::InsufficientStock { .. } | AppError::Conflict(_) => 409,
      AppError::Config(_) | AppError::Engine { .. } => 500,
    }
  }

  /// The `{"ok": false, ...}` line written back for this error.
  pub fn to_response(&self) -> Value {
    tracing::error!(application_error = %self, status = self.status(), "Responding with error");
    let (error, details) = match self {
      AppError::Validation(fields) => ("Validation failed".to_string(), json!(fields)),
      AppError::Malformed(m) => ("Malformed request".to_string(), json!(m)),
      AppError::NotFound(m) => (m.clone(), Value::Null),
      AppError::InsufficientStock {
        product_id,
        requested,
        available,
      } => (
        "Insufficient stock".to_string(),
        json!({"product_id": product_id, "requested": requested, "available": available}),
      ),
      AppError::Conflict(m) => (m.clone(), Value::Null),
      AppError::Config(m) => ("Configuration issue".to_string(), json!(m)),
      AppError::Engine { source } => {
        tracing::error!(engine_error_source = ?source, "Engine error details");
        ("Cart processing error".to_string(), json!(source.to_string()))
      }
    };
    json!({"ok": false, "status": self.status(), "error": error, "details": details})
  }
}

impl From<CartError> for AppError {
  fn from(err: CartError) -> Self {
    match err {
      CartError::Validation(m) => AppError::field("request", m),
      CartError::NotFound { what, id } => match what {
        Missing::LineItem => AppError::NotFound(format!("Product {} is not in the cart", id)),
        other => AppError::NotFound(format!("{} not found", other)),
      },
      CartError::InsufficientStock {
        product_id,
        requested,
        available,
      } => AppError::InsufficientStock {
        product_id,
        requested,
        available,
      },
      CartError::Conflict { .. } => AppError::Conflict("Cart was modified concurrently, retry the request".to_string()),
      other => AppError::Engine { source: other },
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
