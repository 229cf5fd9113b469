// cartflow/src/model/ids.rs

//! Opaque string identifiers for sessions and products.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct $name(String);

    impl $name {
      pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
      }

      pub fn as_str(&self) -> &str {
        &self.0
      }

      /// Blank (empty or whitespace-only) ids are rejected by the engine's input steps.
      pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
      }
    }

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
      }
    }

    impl From<&str> for $name {
      fn from(raw: &str) -> Self {
        Self(raw.to_string())
      }
    }

    impl From<String> for $name {
      fn from(raw: String) -> Self {
        Self(raw)
      }
    }
  };
}

string_id!(
  /// Correlates a client with its cart. Issued and validated by the calling boundary.
  SessionId
);

string_id!(
  /// Catalog identifier of a product.
  ProductId
);
