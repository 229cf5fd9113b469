// cartflow/examples/cart_session.rs

use cartflow::{CartEngine, CartError, InMemoryCartStore, InMemoryCatalog, Product, ProductId, SessionId};
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), CartError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Cart Session Example ---");

  let catalog = Arc::new(InMemoryCatalog::with_products([
    Product::new("mug", "Enamel Mug", dec!(12.50), 4)?,
    Product::new("tee", "Logo Tee", dec!(20), 2)?,
  ]));
  let engine = CartEngine::new(catalog.clone(), Arc::new(InMemoryCartStore::new()));

  let session = SessionId::from("session_demo");
  let (mug, tee) = (ProductId::from("mug"), ProductId::from("tee"));

  engine.add_item(&session, &mug, 1).await?;
  engine.add_item(&session, &mug, 2).await?;
  let cart = engine.add_item(&session, &tee, 1).await?;
  info!(lines = cart.items().len(), items = cart.item_count(), total = %cart.total(), "Cart after three adds.");

  // Only four mugs in stock; three are already in the cart.
  match engine.add_item(&session, &mug, 2).await {
    Err(CartError::InsufficientStock { requested, available, .. }) => {
      warn!(requested, available, "Add rejected, cart unchanged.");
    }
    other => info!(?other, "Unexpected outcome."),
  }

  let cart = engine.set_item_quantity(&session, &tee, 0).await?;
  info!(total = %cart.total(), "Tee removed by setting its quantity to zero.");

  let cart = engine.clear_cart(&session).await?;
  info!(empty = cart.is_empty(), total = %cart.total(), revision = cart.revision(), "Cart cleared.");

  Ok(())
}
