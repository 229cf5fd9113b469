// cartflow/src/engine/remove_item.rs

use tracing::{debug, info};

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::engine::contexts::RemoveItemCtxData;
use crate::engine::steps::{self, missing_state, LOAD_CART, PERSIST_CART, RECOMPUTE_TOTAL, VALIDATE_INPUT};
use crate::error::{CartError, CartResult};
use crate::pipeline::Pipeline;

const REMOVE_LINE: &str = "remove_cart_line";

/// RemoveItem: drop a product's line. A product that is not in the cart is a no-op.
pub(crate) fn remove_item_pipeline() -> Pipeline<RemoveItemCtxData, CartError> {
  let mut p = Pipeline::<RemoveItemCtxData, CartError>::new(
    "remove_item",
    &[
      (VALIDATE_INPUT, false, None),
      (LOAD_CART, false, None),
      (REMOVE_LINE, false, None),
      (RECOMPUTE_TOTAL, false, None),
      (PERSIST_CART, false, None),
    ],
  );

  p.on_root(VALIDATE_INPUT, steps::validate_identifiers::<RemoveItemCtxData>);
  p.on_root(LOAD_CART, steps::load_existing_cart::<RemoveItemCtxData>);
  p.on_root(REMOVE_LINE, remove_cart_line);
  p.on_root(RECOMPUTE_TOTAL, steps::recompute_cart_total::<RemoveItemCtxData>);
  p.on_root(PERSIST_CART, steps::persist_cart::<RemoveItemCtxData>);
  p.after_root(PERSIST_CART, steps::log_persisted_cart::<RemoveItemCtxData>);
  p
}

async fn remove_cart_line(ctx: ContextData<RemoveItemCtxData>) -> CartResult<PipelineControl> {
  ctx.with_mut(|d| {
    let product_id = d.product_id.clone();
    let cart = d.cart.as_mut().ok_or_else(|| missing_state(REMOVE_LINE, "a loaded cart"))?;
    d.removed = cart.remove_line(&product_id).is_some();

    if d.removed {
      info!(%product_id, "Cart line removed.");
    } else {
      debug!(%product_id, "Product not in cart, nothing to remove.");
    }
    Ok(PipelineControl::Continue)
  })
}
