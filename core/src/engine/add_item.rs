// cartflow/src/engine/add_item.rs

use tracing::{info, warn};

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::engine::contexts::AddItemCtxData;
use crate::engine::steps::{self, missing_state, CHECK_STOCK, FETCH_PRODUCT, LOAD_OR_CREATE_CART, PERSIST_CART, RECOMPUTE_TOTAL, VALIDATE_INPUT};
use crate::error::{CartError, CartResult};
use crate::model::CartLineItem;
use crate::pipeline::Pipeline;

const MERGE_LINE: &str = "merge_cart_line";

/// AddItem: merge `quantity` units of a product into the session's cart.
pub(crate) fn add_item_pipeline() -> Pipeline<AddItemCtxData, CartError> {
  let mut p = Pipeline::<AddItemCtxData, CartError>::new(
    "add_item",
    &[
      (VALIDATE_INPUT, false, None),
      (LOAD_OR_CREATE_CART, false, None),
      (FETCH_PRODUCT, false, None),
      (CHECK_STOCK, false, None),
      (MERGE_LINE, false, None),
      (RECOMPUTE_TOTAL, false, None),
      (PERSIST_CART, false, None),
    ],
  );

  p.on_root(VALIDATE_INPUT, steps::validate_identifiers::<AddItemCtxData>);
  p.on_root(VALIDATE_INPUT, validate_add_quantity);
  p.on_root(LOAD_OR_CREATE_CART, steps::load_or_create_cart::<AddItemCtxData>);
  p.on_root(FETCH_PRODUCT, steps::fetch_product::<AddItemCtxData>);
  p.on_root(CHECK_STOCK, check_stock_for_merge);
  p.on_root(MERGE_LINE, merge_cart_line);
  p.on_root(RECOMPUTE_TOTAL, steps::recompute_cart_total::<AddItemCtxData>);
  p.on_root(PERSIST_CART, steps::persist_cart::<AddItemCtxData>);
  p.after_root(PERSIST_CART, steps::log_persisted_cart::<AddItemCtxData>);
  p
}

async fn validate_add_quantity(ctx: ContextData<AddItemCtxData>) -> CartResult<PipelineControl> {
  let quantity = ctx.with(|d| d.quantity);
  if quantity == 0 {
    warn!("Add to cart rejected: quantity must be positive.");
    return Err(CartError::Validation("Quantity must be at least 1.".to_string()));
  }
  Ok(PipelineControl::Continue)
}

/// The line's resulting quantity (existing + requested) must fit the current stock.
async fn check_stock_for_merge(ctx: ContextData<AddItemCtxData>) -> CartResult<PipelineControl> {
  ctx.with(|d| {
    let product = d.product.as_ref().ok_or_else(|| missing_state(CHECK_STOCK, "a fetched product"))?;
    let cart = d.cart.as_ref().ok_or_else(|| missing_state(CHECK_STOCK, "a loaded cart"))?;
    let existing = cart.line(&d.product_id).map_or(0, |line| line.quantity);
    let resulting = existing
      .checked_add(d.quantity)
      .ok_or_else(|| CartError::Validation("Quantity is out of range.".to_string()))?;

    if !product.has_stock_for(resulting) {
      warn!(
        product_id = %d.product_id,
        existing,
        requested = d.quantity,
        available = product.quantity,
        "Add to cart rejected: insufficient stock."
      );
      return Err(CartError::InsufficientStock {
        product_id: d.product_id.to_string(),
        requested: resulting,
        available: product.quantity,
      });
    }
    Ok(PipelineControl::Continue)
  })
}

/// Adds to the existing line, or appends a new one priced at the catalog's current price.
async fn merge_cart_line(ctx: ContextData<AddItemCtxData>) -> CartResult<PipelineControl> {
  ctx.with_mut(|d| {
    let price = d.product.as_ref().map(|p| p.price).ok_or_else(|| missing_state(MERGE_LINE, "a fetched product"))?;
    let (product_id, quantity) = (d.product_id.clone(), d.quantity);
    let cart = d.cart.as_mut().ok_or_else(|| missing_state(MERGE_LINE, "a loaded cart"))?;

    match cart.line_mut(&product_id) {
      Some(line) => {
        line.quantity += quantity;
        info!(%product_id, quantity = line.quantity, "Merged into existing cart line.");
      }
      None => {
        cart.push_line(CartLineItem {
          product_id: product_id.clone(),
          quantity,
          price,
        });
        info!(%product_id, quantity, %price, "Added new cart line.");
      }
    }
    Ok(PipelineControl::Continue)
  })
}
