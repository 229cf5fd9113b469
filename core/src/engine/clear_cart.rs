// cartflow/src/engine/clear_cart.rs

use tracing::info;

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::engine::contexts::ClearCartCtxData;
use crate::engine::steps::{self, missing_state, LOAD_CART, PERSIST_CART, RECOMPUTE_TOTAL, VALIDATE_INPUT};
use crate::error::{CartError, CartResult};
use crate::pipeline::Pipeline;

const CLEAR_LINES: &str = "clear_cart_lines";

/// ClearCart: empty the session's cart, leaving a zero total.
pub(crate) fn clear_cart_pipeline() -> Pipeline<ClearCartCtxData, CartError> {
  let mut p = Pipeline::<ClearCartCtxData, CartError>::new(
    "clear_cart",
    &[
      (VALIDATE_INPUT, false, None),
      (LOAD_CART, false, None),
      (CLEAR_LINES, false, None),
      (RECOMPUTE_TOTAL, false, None),
      (PERSIST_CART, false, None),
    ],
  );

  p.on_root(VALIDATE_INPUT, steps::validate_identifiers::<ClearCartCtxData>);
  p.on_root(LOAD_CART, steps::load_existing_cart::<ClearCartCtxData>);
  p.on_root(CLEAR_LINES, clear_cart_lines);
  p.on_root(RECOMPUTE_TOTAL, steps::recompute_cart_total::<ClearCartCtxData>);
  p.on_root(PERSIST_CART, steps::persist_cart::<ClearCartCtxData>);
  p.after_root(PERSIST_CART, steps::log_persisted_cart::<ClearCartCtxData>);
  p
}

async fn clear_cart_lines(ctx: ContextData<ClearCartCtxData>) -> CartResult<PipelineControl> {
  ctx.with_mut(|d| {
    let cart = d.cart.as_mut().ok_or_else(|| missing_state(CLEAR_LINES, "a loaded cart"))?;
    d.cleared_lines = cart.items().len();
    cart.clear_lines();
    info!(session_id = %d.session_id, cleared_lines = d.cleared_lines, "Cart emptied.");
    Ok(PipelineControl::Continue)
  })
}
