// cartflow/examples/custom_store.rs

//! Plugging a different cart backend into the engine: this one keeps every
//! saved revision as a JSON document, like an append-only audit table would.

use async_trait::async_trait;
use cartflow::{Cart, CartEngine, CartStore, InMemoryCatalog, Product, ProductId, SessionId, StoreError};
use parking_lot::Mutex;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

#[derive(Default)]
struct JsonHistoryStore {
  history: Mutex<HashMap<SessionId, Vec<String>>>,
}

impl JsonHistoryStore {
  fn latest(&self, session_id: &SessionId) -> Result<Option<Cart>, StoreError> {
    let history = self.history.lock();
    match history.get(session_id).and_then(|docs| docs.last()) {
      Some(doc) => Ok(Some(serde_json::from_str(doc).map_err(anyhow::Error::from)?)),
      None => Ok(None),
    }
  }
}

#[async_trait]
impl CartStore for JsonHistoryStore {
  async fn load_cart(&self, session_id: &SessionId) -> Result<Option<Cart>, StoreError> {
    self.latest(session_id)
  }

  async fn save_cart(&self, cart: &Cart) -> Result<(), StoreError> {
    let found = self.latest(cart.session_id())?.map_or(0, |c| c.revision());
    if found + 1 != cart.revision() {
      return Err(StoreError::Conflict {
        session_id: cart.session_id().clone(),
        expected: cart.revision().saturating_sub(1),
        found,
      });
    }
    let doc = serde_json::to_string(cart).map_err(anyhow::Error::from)?;
    self.history.lock().entry(cart.session_id().clone()).or_default().push(doc);
    Ok(())
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let catalog = Arc::new(InMemoryCatalog::with_products([Product::new("pen", "Gel Pen", dec!(1.20), 50)?]));
  let store = Arc::new(JsonHistoryStore::default());
  let engine = CartEngine::new(catalog, store.clone());

  let session = SessionId::from("session_history");
  let pen = ProductId::from("pen");
  engine.add_item(&session, &pen, 3).await?;
  engine.set_item_quantity(&session, &pen, 10).await?;
  engine.remove_item(&session, &pen).await?;

  for (revision, doc) in store.history.lock()[&session].iter().enumerate() {
    info!(revision = revision + 1, %doc, "Stored revision.");
  }
  Ok(())
}
