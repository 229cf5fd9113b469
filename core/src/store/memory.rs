// cartflow/src/store/memory.rs

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{event, Level};

use crate::error::StoreError;
use crate::model::{Cart, Product, ProductId, SessionId};
use crate::store::{CartStore, ProductLookup};

/// A catalog held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
  products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryCatalog {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
    let catalog = Self::new();
    for product in products {
      catalog.upsert(product);
    }
    catalog
  }

  /// Inserts or replaces a product.
  pub fn upsert(&self, product: Product) {
    self.products.write().insert(product.id.clone(), product);
  }

  /// Overwrites the stock count. Returns `false` if the product is unknown.
  pub fn set_stock(&self, product_id: &ProductId, quantity: u32) -> bool {
    match self.products.write().get_mut(product_id) {
      Some(product) => {
        product.quantity = quantity;
        true
      }
      None => false,
    }
  }

  pub fn remove(&self, product_id: &ProductId) -> Option<Product> {
    self.products.write().remove(product_id)
  }

  pub fn len(&self) -> usize {
    self.products.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.products.read().is_empty()
  }

  /// All products, sorted by id.
  pub fn list(&self) -> Vec<Product> {
    let mut products: Vec<Product> = self.products.read().values().cloned().collect();
    products.sort_by(|a, b| a.id.cmp(&b.id));
    products
  }
}

#[async_trait]
impl ProductLookup for InMemoryCatalog {
  async fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
    Ok(self.products.read().get(product_id).cloned())
  }
}

/// Carts held in process memory, with the same revision check a database-backed
/// store would do in a conditional update.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
  carts: RwLock<HashMap<SessionId, Cart>>,
}

impl InMemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn len(&self) -> usize {
    self.carts.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.carts.read().is_empty()
  }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
  async fn load_cart(&self, session_id: &SessionId) -> Result<Option<Cart>, StoreError> {
    Ok(self.carts.read().get(session_id).cloned())
  }

  async fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
    let mut carts = self.carts.write();
    let found = carts.get(cart.session_id()).map_or(0, Cart::revision);
    let expected = cart.revision().saturating_sub(1);
    if cart.revision() == 0 || found != expected {
      event!(
        Level::WARN,
        session_id = %cart.session_id(),
        expected,
        found,
        "Rejected cart save with a stale revision."
      );
      return Err(StoreError::Conflict {
        session_id: cart.session_id().clone(),
        expected,
        found,
      });
    }
    carts.insert(cart.session_id().clone(), cart.clone());
    Ok(())
  }
}
