// cartflow/src/engine/set_quantity.rs

use std::sync::Arc;
use tracing::{info, warn};

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::core::step::SkipCondition;
use crate::engine::contexts::SetQuantityCtxData;
use crate::engine::steps::{self, missing_state, CHECK_STOCK, FETCH_PRODUCT, LOAD_CART, PERSIST_CART, RECOMPUTE_TOTAL, VALIDATE_INPUT};
use crate::error::{CartError, CartResult, Missing};
use crate::pipeline::Pipeline;

const LOCATE_LINE: &str = "locate_cart_line";
const APPLY_QUANTITY: &str = "apply_line_quantity";

/// SetItemQuantity: overwrite a line's quantity, or drop the line when it is 0.
///
/// Setting 0 needs no catalog round-trip, so the fetch and stock steps are
/// skipped for it.
pub(crate) fn set_quantity_pipeline() -> Pipeline<SetQuantityCtxData, CartError> {
  let removing: SkipCondition<SetQuantityCtxData> = Arc::new(|ctx: ContextData<SetQuantityCtxData>| ctx.with(|d| d.quantity == 0));

  let mut p = Pipeline::<SetQuantityCtxData, CartError>::new(
    "set_item_quantity",
    &[
      (VALIDATE_INPUT, false, None),
      (LOAD_CART, false, None),
      (LOCATE_LINE, false, None),
      (FETCH_PRODUCT, false, Some(removing.clone())),
      (CHECK_STOCK, false, Some(removing)),
      (APPLY_QUANTITY, false, None),
      (RECOMPUTE_TOTAL, false, None),
      (PERSIST_CART, false, None),
    ],
  );

  p.on_root(VALIDATE_INPUT, steps::validate_identifiers::<SetQuantityCtxData>);
  p.on_root(LOAD_CART, steps::load_existing_cart::<SetQuantityCtxData>);
  p.on_root(LOCATE_LINE, locate_cart_line);
  p.on_root(FETCH_PRODUCT, steps::fetch_product::<SetQuantityCtxData>);
  p.on_root(CHECK_STOCK, check_stock_for_quantity);
  p.on_root(APPLY_QUANTITY, apply_line_quantity);
  p.on_root(RECOMPUTE_TOTAL, steps::recompute_cart_total::<SetQuantityCtxData>);
  p.on_root(PERSIST_CART, steps::persist_cart::<SetQuantityCtxData>);
  p.after_root(PERSIST_CART, steps::log_persisted_cart::<SetQuantityCtxData>);
  p
}

async fn locate_cart_line(ctx: ContextData<SetQuantityCtxData>) -> CartResult<PipelineControl> {
  ctx.with(|d| {
    let cart = d.cart.as_ref().ok_or_else(|| missing_state(LOCATE_LINE, "a loaded cart"))?;
    if cart.line(&d.product_id).is_none() {
      warn!(session_id = %d.session_id, product_id = %d.product_id, "Product is not in the cart.");
      return Err(CartError::not_found(Missing::LineItem, &d.product_id));
    }
    Ok(PipelineControl::Continue)
  })
}

async fn check_stock_for_quantity(ctx: ContextData<SetQuantityCtxData>) -> CartResult<PipelineControl> {
  ctx.with(|d| {
    let product = d.product.as_ref().ok_or_else(|| missing_state(CHECK_STOCK, "a fetched product"))?;
    if !product.has_stock_for(d.quantity) {
      warn!(
        product_id = %d.product_id,
        requested = d.quantity,
        available = product.quantity,
        "Quantity update rejected: insufficient stock."
      );
      return Err(CartError::InsufficientStock {
        product_id: d.product_id.to_string(),
        requested: d.quantity,
        available: product.quantity,
      });
    }
    Ok(PipelineControl::Continue)
  })
}

/// Sets the quantity in place; the line keeps the price it was added at.
async fn apply_line_quantity(ctx: ContextData<SetQuantityCtxData>) -> CartResult<PipelineControl> {
  ctx.with_mut(|d| {
    let (product_id, quantity) = (d.product_id.clone(), d.quantity);
    let cart = d.cart.as_mut().ok_or_else(|| missing_state(APPLY_QUANTITY, "a loaded cart"))?;

    if quantity == 0 {
      cart.remove_line(&product_id);
      info!(%product_id, "Cart line removed by zero quantity.");
      return Ok(PipelineControl::Continue);
    }

    let line = cart
      .line_mut(&product_id)
      .ok_or_else(|| CartError::not_found(Missing::LineItem, &product_id))?;
    line.quantity = quantity;
    info!(%product_id, quantity, "Cart line quantity set.");
    Ok(PipelineControl::Continue)
  })
}
