// cartflow/src/engine/mod.rs

//! The cart reconciliation engine.
//!
//! Every operation is a registered pipeline over its own context type. A run
//! works on a copy of the stored cart and writes it back once, in the final
//! `persist_cart` step, so a rejected operation never changes what the store
//! holds. Operations on one session are serialized by `SessionLocks`; the
//! store's revision check catches writers outside this process.

pub mod contexts;
pub mod locks;
pub(crate) mod steps;

mod add_item;
mod clear_cart;
mod get_cart;
mod remove_item;
mod set_quantity;

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::core::context_data::ContextData;
use crate::error::{CartError, CartResult};
use crate::model::{Cart, ProductId, SessionId};
use crate::registry::PipelineRegistry;
use crate::store::{CartStore, ProductLookup};

use contexts::{
  AddItemCtxData, CartCtx, ClearCartCtxData, Collaborators, GetCartCtxData, RemoveItemCtxData, SetQuantityCtxData,
};
use locks::SessionLocks;

pub struct CartEngine {
  deps: Collaborators,
  registry: PipelineRegistry<CartError>,
  locks: SessionLocks,
}

impl CartEngine {
  pub fn new(products: Arc<dyn ProductLookup>, carts: Arc<dyn CartStore>) -> Self {
    let registry = PipelineRegistry::new();
    registry.register_pipeline(add_item::add_item_pipeline());
    registry.register_pipeline(set_quantity::set_quantity_pipeline());
    registry.register_pipeline(remove_item::remove_item_pipeline());
    registry.register_pipeline(clear_cart::clear_cart_pipeline());
    registry.register_pipeline(get_cart::get_cart_pipeline());
    info!(pipelines = ?registry.pipeline_names(), "Cart engine pipelines registered.");

    Self {
      deps: Collaborators { products, carts },
      registry,
      locks: SessionLocks::new(),
    }
  }

  /// Adds `quantity` units of a product, merging into an existing line.
  ///
  /// Fails with `Validation` for a zero quantity, `NotFound` for an unknown
  /// product and `InsufficientStock` when the line's resulting quantity would
  /// exceed current stock. The cart is created on first use.
  #[instrument(name = "CartEngine::add_item", skip_all, fields(session_id = %session_id, product_id = %product_id, quantity = quantity), err(Display))]
  pub async fn add_item(&self, session_id: &SessionId, product_id: &ProductId, quantity: u32) -> CartResult<Cart> {
    self
      .execute(AddItemCtxData {
        deps: self.deps.clone(),
        session_id: session_id.clone(),
        product_id: product_id.clone(),
        quantity,
        product: None,
        cart: None,
      })
      .await
  }

  /// Sets a line's quantity; `0` removes the line.
  #[instrument(name = "CartEngine::set_item_quantity", skip_all, fields(session_id = %session_id, product_id = %product_id, quantity = quantity), err(Display))]
  pub async fn set_item_quantity(&self, session_id: &SessionId, product_id: &ProductId, quantity: u32) -> CartResult<Cart> {
    self
      .execute(SetQuantityCtxData {
        deps: self.deps.clone(),
        session_id: session_id.clone(),
        product_id: product_id.clone(),
        quantity,
        product: None,
        cart: None,
      })
      .await
  }

  #[instrument(name = "CartEngine::remove_item", skip_all, fields(session_id = %session_id, product_id = %product_id), err(Display))]
  pub async fn remove_item(&self, session_id: &SessionId, product_id: &ProductId) -> CartResult<Cart> {
    self
      .execute(RemoveItemCtxData {
        deps: self.deps.clone(),
        session_id: session_id.clone(),
        product_id: product_id.clone(),
        removed: false,
        cart: None,
      })
      .await
  }

  #[instrument(name = "CartEngine::clear_cart", skip_all, fields(session_id = %session_id), err(Display))]
  pub async fn clear_cart(&self, session_id: &SessionId) -> CartResult<Cart> {
    self
      .execute(ClearCartCtxData {
        deps: self.deps.clone(),
        session_id: session_id.clone(),
        cleared_lines: 0,
        cart: None,
      })
      .await
  }

  /// Returns the session's cart, creating an empty one on first access.
  #[instrument(name = "CartEngine::get_cart", skip_all, fields(session_id = %session_id), err(Display))]
  pub async fn get_cart(&self, session_id: &SessionId) -> CartResult<Cart> {
    self
      .execute(GetCartCtxData {
        deps: self.deps.clone(),
        session_id: session_id.clone(),
        cart: None,
      })
      .await
  }

  pub fn pipeline_names(&self) -> Vec<String> {
    self.registry.pipeline_names()
  }

  /// Sessions with an operation currently running or queued.
  pub fn active_sessions(&self) -> usize {
    self.locks.active_sessions()
  }

  async fn execute<T: CartCtx>(&self, data: T) -> CartResult<Cart> {
    let session_id = data.session_id().clone();
    let _session = self.locks.acquire(&session_id).await;

    let ctx = ContextData::new(data);
    let outcome = self.registry.run(ctx.clone()).await?;
    debug!(?outcome, "Cart pipeline finished.");

    ctx
      .with_mut(|d| d.cart_slot().take())
      .ok_or_else(|| steps::missing_state("result", "a cart"))
  }
}
