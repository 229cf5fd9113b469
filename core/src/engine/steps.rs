// cartflow/src/engine/steps.rs

//! Steps shared by several cart pipelines.

use tracing::{debug, info, instrument, warn};

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::engine::contexts::{CartCtx, StockCheckedCtx};
use crate::error::{CartError, CartResult, Missing, PipelineError};
use crate::model::{recompute_total, Cart};

pub(crate) const VALIDATE_INPUT: &str = "validate_cart_input";
pub(crate) const LOAD_CART: &str = "load_cart";
pub(crate) const LOAD_OR_CREATE_CART: &str = "load_or_create_cart";
pub(crate) const FETCH_PRODUCT: &str = "fetch_product_for_cart";
pub(crate) const CHECK_STOCK: &str = "check_product_stock_for_cart";
pub(crate) const RECOMPUTE_TOTAL: &str = "recompute_cart_total";
pub(crate) const PERSIST_CART: &str = "persist_cart";

pub(crate) fn missing_state(step_name: &str, what: &str) -> CartError {
  CartError::from(PipelineError::MissingState {
    step_name: step_name.to_string(),
    what: what.to_string(),
  })
}

/// Removes the working cart from the context, failing if an earlier step did not load one.
pub(crate) fn take_cart<T: CartCtx>(data: &mut T, step_name: &str) -> CartResult<Cart> {
  data.cart_slot().take().ok_or_else(|| missing_state(step_name, "a loaded cart"))
}

/// Rejects blank session and product ids.
pub(crate) async fn validate_identifiers<T: CartCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  let (session_blank, product_blank) = ctx.with(|d| {
    (
      d.session_id().is_blank(),
      d.product_id().is_some_and(|id| id.is_blank()),
    )
  });

  if session_blank {
    warn!("Cart input rejected: blank session id.");
    return Err(CartError::Validation("Session ID is required.".to_string()));
  }
  if product_blank {
    warn!("Cart input rejected: blank product id.");
    return Err(CartError::Validation("Product ID is required.".to_string()));
  }
  Ok(PipelineControl::Continue)
}

/// Loads the session's cart; a session without one is `NotFound`.
pub(crate) async fn load_existing_cart<T: CartCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  let (carts, session_id) = ctx.with(|d| (d.deps().carts.clone(), d.session_id().clone()));

  let cart = carts.load_cart(&session_id).await?.ok_or_else(|| {
    warn!(%session_id, "No cart stored for session.");
    CartError::not_found(Missing::Cart, &session_id)
  })?;

  debug!(%session_id, revision = cart.revision(), lines = cart.items().len(), "Cart loaded.");
  ctx.with_mut(|d| *d.cart_slot() = Some(cart));
  Ok(PipelineControl::Continue)
}

/// Loads the session's cart, or starts an empty one bound to the session.
pub(crate) async fn load_or_create_cart<T: CartCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  let (carts, session_id) = ctx.with(|d| (d.deps().carts.clone(), d.session_id().clone()));

  let cart = match carts.load_cart(&session_id).await? {
    Some(cart) => cart,
    None => {
      info!(%session_id, "No cart for session yet, starting an empty one.");
      Cart::new(session_id)
    }
  };

  ctx.with_mut(|d| *d.cart_slot() = Some(cart));
  Ok(PipelineControl::Continue)
}

/// Reads the target product's current price and stock from the catalog.
pub(crate) async fn fetch_product<T: StockCheckedCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  let (products, product_id) = ctx.with(|d| (d.deps().products.clone(), d.product_id().cloned()));
  let product_id = product_id.ok_or_else(|| missing_state(FETCH_PRODUCT, "a target product id"))?;

  let product = products.get_product(&product_id).await?.ok_or_else(|| {
    warn!(%product_id, "Product not found in catalog.");
    CartError::not_found(Missing::Product, &product_id)
  })?;

  debug!(%product_id, price = %product.price, stock = product.quantity, "Product fetched.");
  ctx.with_mut(|d| *d.product_slot() = Some(product));
  Ok(PipelineControl::Continue)
}

pub(crate) async fn recompute_cart_total<T: CartCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  ctx.with_mut(|d| {
    let cart = take_cart(d, RECOMPUTE_TOTAL)?;
    *d.cart_slot() = Some(recompute_total(cart)?);
    Ok(PipelineControl::Continue)
  })
}

/// Writes the working cart back with the next revision.
///
/// The store refuses the write if another writer got there first; the error
/// surfaces as `CartError::Conflict` and the working cart is dropped.
pub(crate) async fn persist_cart<T: CartCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  let (carts, mut cart) = ctx.with_mut(|d| -> CartResult<_> { Ok((d.deps().carts.clone(), take_cart(d, PERSIST_CART)?)) })?;

  let expected = cart.advance_revision();
  carts.save_cart(&cart).await?;
  debug!(session_id = %cart.session_id(), expected, revision = cart.revision(), "Cart saved.");

  ctx.with_mut(|d| *d.cart_slot() = Some(cart));
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart_step::persisted", skip_all)]
pub(crate) async fn log_persisted_cart<T: CartCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  ctx.with(|d| {
    if let Some(cart) = d.cart() {
      info!(
        session_id = %cart.session_id(),
        revision = cart.revision(),
        lines = cart.items().len(),
        total = %cart.total(),
        "Cart persisted."
      );
    }
  });
  Ok(PipelineControl::Continue)
}
