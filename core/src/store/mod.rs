// cartflow/src/store/mod.rs

//! Collaborator contracts the engine consumes, and in-memory implementations.

pub mod memory;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{Cart, Product, ProductId, SessionId};

pub use memory::{InMemoryCartStore, InMemoryCatalog};

/// Read access to the authoritative catalog.
#[async_trait]
pub trait ProductLookup: Send + Sync {
  /// Current price and stock for `product_id`, or `None` if it does not exist.
  async fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError>;
}

/// Cart persistence keyed by session.
#[async_trait]
pub trait CartStore: Send + Sync {
  async fn load_cart(&self, session_id: &SessionId) -> Result<Option<Cart>, StoreError>;

  /// Persists `cart` if the stored revision is `cart.revision() - 1` (or there is
  /// no stored cart and `cart.revision()` is 1). Anything else is a
  /// `StoreError::Conflict` and leaves the stored cart untouched.
  async fn save_cart(&self, cart: &Cart) -> Result<(), StoreError>;
}
