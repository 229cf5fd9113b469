// tests/common/mod.rs
#![allow(dead_code)]

use cartflow::{CartEngine, InMemoryCartStore, InMemoryCatalog, PipelineError, Product, ProductId, SessionId};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::Level;

// --- Tracing Setup ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Engine Fixture ---
pub struct Shop {
  pub engine: CartEngine,
  pub catalog: Arc<InMemoryCatalog>,
  pub carts: Arc<InMemoryCartStore>,
}

/// An engine over in-memory collaborators seeded with `(id, price, stock)` products.
pub fn shop(products: &[(&str, Decimal, u32)]) -> Shop {
  setup_tracing();
  let catalog = Arc::new(InMemoryCatalog::with_products(products.iter().map(|(id, price, stock)| {
    Product::new(*id, format!("Product {}", id), *price, *stock).unwrap()
  })));
  let carts = Arc::new(InMemoryCartStore::new());
  let engine = CartEngine::new(catalog.clone(), carts.clone());
  Shop { engine, catalog, carts }
}

pub fn sid(raw: &str) -> SessionId {
  SessionId::from(raw)
}

pub fn pid(raw: &str) -> ProductId {
  ProductId::from(raw)
}

// --- Pipeline Runtime Fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TraceContext {
  pub steps_executed: Vec<String>,
  pub counter: i32,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Runtime error: {0}")]
  Runtime(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<PipelineError> for TestError {
  fn from(err: PipelineError) -> Self {
    TestError::Runtime(format!("{:?}", err))
  }
}

/// A handler that records `label` and stops if the context asks it to.
pub fn recording_handler(label: &'static str) -> cartflow::Handler<TraceContext, TestError> {
  Box::new(move |ctx| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.steps_executed.push(label.to_string());
      if guard.stop_at.as_deref() == Some(label) {
        return Ok(cartflow::PipelineControl::Stop);
      }
      Ok(cartflow::PipelineControl::Continue)
    })
  })
}
