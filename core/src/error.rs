// cartflow/src/error.rs

//! Error types for the step runtime, the collaborator stores and the cart engine.

use std::fmt;

use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::model::ids::SessionId;

/// Failures raised by the pipeline runtime itself, independent of cart semantics.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("No pipeline registered for context type {context_type}")]
  NotRegistered { context_type: String },

  #[error("Type mismatch during context dispatch (expected {expected_type})")]
  TypeMismatch { expected_type: String },

  #[error("Step '{step_name}' expected {what} in the context, found none")]
  MissingState { step_name: String, what: String },
}

/// Failures reported by `ProductLookup` and `CartStore` implementations.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Revision conflict for session {session_id}: expected stored revision {expected}, found {found}")]
  Conflict {
    session_id: SessionId,
    expected: u64,
    found: u64,
  },

  #[error("Store backend failure. Source: {source}")]
  Backend {
    #[source]
    source: AnyhowError,
  },
}

impl From<AnyhowError> for StoreError {
  fn from(err: AnyhowError) -> Self {
    StoreError::Backend { source: err }
  }
}

/// What a `CartError::NotFound` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Missing {
  Cart,
  LineItem,
  Product,
}

impl fmt::Display for Missing {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Missing::Cart => f.write_str("Cart"),
      Missing::LineItem => f.write_str("Cart line item"),
      Missing::Product => f.write_str("Product"),
    }
  }
}

/// The typed failure every engine operation returns.
///
/// A failed operation never leaves a partial write behind: whatever the store
/// held before the call is still authoritative.
#[derive(Debug, Error)]
pub enum CartError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("{what} not found: {id}")]
  NotFound { what: Missing, id: String },

  #[error("Insufficient stock for product {product_id}: requested {requested}, available {available}")]
  InsufficientStock {
    product_id: String,
    requested: u32,
    available: u32,
  },

  #[error("Cart for session {session_id} was modified concurrently")]
  Conflict { session_id: SessionId },

  #[error("Store Error: {source}")]
  Store {
    #[source]
    source: StoreError,
  },

  #[error("Pipeline Error: {source}")]
  Pipeline {
    #[from]
    source: PipelineError,
  },
}

impl CartError {
  pub fn not_found(what: Missing, id: impl fmt::Display) -> Self {
    CartError::NotFound {
      what,
      id: id.to_string(),
    }
  }

  /// Short machine-readable tag, stable across message wording changes.
  pub fn kind(&self) -> &'static str {
    match self {
      CartError::Validation(_) => "validation",
      CartError::NotFound { .. } => "not_found",
      CartError::InsufficientStock { .. } => "insufficient_stock",
      CartError::Conflict { .. } => "conflict",
      CartError::Store { .. } => "store",
      CartError::Pipeline { .. } => "pipeline",
    }
  }
}

impl From<StoreError> for CartError {
  fn from(err: StoreError) -> Self {
    match err {
      StoreError::Conflict { session_id, .. } => CartError::Conflict { session_id },
      other => CartError::Store { source: other },
    }
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
