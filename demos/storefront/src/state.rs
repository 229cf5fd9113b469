// demos/storefront/src/state.rs
use crate::config::AppConfig;
use crate::session::SessionIssuer;
use cartflow::CartEngine;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub engine: Arc<CartEngine>,
  pub sessions: SessionIssuer,
  pub config: Arc<AppConfig>, // Share loaded config
}
