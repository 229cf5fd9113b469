// demos/storefront/src/handlers.rs

use cartflow::{Cart, CartLineItem};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::errors::Result;
use crate::requests::{parse_line, Command};
use crate::state::AppState;

// --- Response DTOs ---

#[derive(Debug, Serialize)]
pub struct CartLineView {
  pub product_id: String,
  pub quantity: u32,
  pub price: Decimal,
  /// `null` only if the line's subtotal does not fit a decimal.
  pub subtotal: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct CartView {
  pub session_id: String,
  pub items: Vec<CartLineView>,
  pub total: Decimal,
  pub item_count: u64,
  pub revision: u64,
  pub updated_at: DateTime<Utc>,
}

impl From<&CartLineItem> for CartLineView {
  fn from(line: &CartLineItem) -> Self {
    Self {
      product_id: line.product_id.to_string(),
      quantity: line.quantity,
      price: line.price,
      subtotal: line.subtotal(),
    }
  }
}

impl From<&Cart> for CartView {
  fn from(cart: &Cart) -> Self {
    Self {
      session_id: cart.session_id().to_string(),
      items: cart.items().iter().map(CartLineView::from).collect(),
      total: cart.total(),
      item_count: cart.item_count(),
      revision: cart.revision(),
      updated_at: cart.updated_at(),
    }
  }
}

// --- Handler Implementation ---

/// Answers one request line; failures become `{"ok": false, ...}` responses.
pub async fn handle_line(app_state: &AppState, line: &str) -> Value {
  match respond(app_state, line).await {
    Ok(body) => body,
    Err(app_err) => app_err.to_response(),
  }
}

async fn respond(app_state: &AppState, line: &str) -> Result<Value> {
  let command = parse_line(line)?.validate(&app_state.sessions, app_state.config.max_line_quantity)?;
  execute(app_state, command).await
}

#[instrument(name = "handler::execute", skip_all, fields(op = command.name()), err(Display))]
async fn execute(app_state: &AppState, command: Command) -> Result<Value> {
  let engine = &app_state.engine;
  let cart = match command {
    Command::NewSession => {
      let session_id = app_state.sessions.issue();
      info!(%session_id, "Issued new session.");
      return Ok(json!({"ok": true, "session_id": session_id}));
    }
    Command::GetCart { session_id } => engine.get_cart(&session_id).await,
    Command::AddToCart {
      session_id,
      product_id,
      quantity,
    } => engine.add_item(&session_id, &product_id, quantity).await,
    Command::UpdateCartItem {
      session_id,
      product_id,
      quantity,
    } => engine.set_item_quantity(&session_id, &product_id, quantity).await,
    Command::RemoveFromCart { session_id, product_id } => engine.remove_item(&session_id, &product_id).await,
    Command::ClearCart { session_id } => engine.clear_cart(&session_id).await,
  }
  .map_err(|cart_err| {
    warn!(error = %cart_err, kind = cart_err.kind(), "Cart operation rejected.");
    cart_err
  })?;

  Ok(json!({"ok": true, "cart": CartView::from(&cart)}))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{AppConfig, LogFormat};
  use crate::session::SessionIssuer;
  use cartflow::{CartEngine, InMemoryCartStore, InMemoryCatalog, Product};
  use rust_decimal_macros::dec;
  use std::sync::Arc;

  fn app_state() -> AppState {
    let catalog = InMemoryCatalog::with_products([
      Product::new("p1", "Widget", dec!(10), 5).unwrap(),
      Product::new("p2", "Gadget", dec!(20), 1).unwrap(),
    ]);
    AppState {
      engine: Arc::new(CartEngine::new(Arc::new(catalog), Arc::new(InMemoryCartStore::new()))),
      sessions: SessionIssuer::new("session"),
      config: Arc::new(AppConfig {
        catalog_path: None,
        session_prefix: "session".to_string(),
        log_format: LogFormat::Pretty,
        max_line_quantity: 99,
      }),
    }
  }

  async fn new_session(state: &AppState) -> String {
    let body = handle_line(state, r#"{"op":"new_session"}"#).await;
    body["session_id"].as_str().unwrap().to_string()
  }

  async fn send(state: &AppState, op: &str, sid: &str, extra: &str) -> Value {
    let line = format!(r#"{{"op":"{}","session_id":"{}"{}}}"#, op, sid, extra);
    handle_line(state, &line).await
  }

  #[tokio::test]
  async fn add_and_read_back() {
    let state = app_state();
    let sid = new_session(&state).await;

    let body = send(&state, "add", &sid, r#","product_id":"p1","quantity":3"#).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["cart"]["total"], "30");
    assert_eq!(body["cart"]["item_count"], 3);

    let body = send(&state, "get", &sid, "").await;
    assert_eq!(body["cart"]["items"][0]["product_id"], "p1");
    assert_eq!(body["cart"]["items"][0]["subtotal"], "30");
  }

  #[tokio::test]
  async fn stock_failure_is_a_409_with_counts() {
    let state = app_state();
    let sid = new_session(&state).await;

    let body = send(&state, "add", &sid, r#","product_id":"p2","quantity":2"#).await;
    assert_eq!(body["ok"], false);
    assert_eq!(body["status"], 409);
    assert_eq!(body["details"]["requested"], 2);
    assert_eq!(body["details"]["available"], 1);
  }

  #[tokio::test]
  async fn missing_cart_and_product_are_404() {
    let state = app_state();
    let sid = new_session(&state).await;

    let body = send(&state, "clear", &sid, "").await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Cart not found");

    let body = send(&state, "add", &sid, r#","product_id":"nope","quantity":1"#).await;
    assert_eq!(body["status"], 404);
    assert_eq!(body["error"], "Product not found");
  }

  #[tokio::test]
  async fn update_to_zero_removes_the_line() {
    let state = app_state();
    let sid = new_session(&state).await;
    send(&state, "add", &sid, r#","product_id":"p1","quantity":2"#).await;
    send(&state, "add", &sid, r#","product_id":"p2","quantity":1"#).await;

    let body = send(&state, "update", &sid, r#","product_id":"p1","quantity":0"#).await;
    assert_eq!(body["cart"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["cart"]["total"], "20");
  }

  #[tokio::test]
  async fn invalid_requests_never_reach_the_engine() {
    let state = app_state();
    let body = handle_line(&state, r#"{"op":"add","session_id":"forged","product_id":"p1","quantity":1}"#).await;
    assert_eq!(body["status"], 400);
    assert_eq!(body["details"]["session_id"], "Session ID is malformed");
    assert_eq!(state.engine.active_sessions(), 0);
  }
}
