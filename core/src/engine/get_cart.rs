// cartflow/src/engine/get_cart.rs

use tracing::{debug, info, warn};

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::engine::contexts::GetCartCtxData;
use crate::engine::steps::{self, PERSIST_CART, VALIDATE_INPUT};
use crate::error::{CartError, CartResult};
use crate::model::{recompute_total, Cart};
use crate::pipeline::Pipeline;

const LOAD_OR_START: &str = "load_cart_or_start_empty";

/// GetCart: return the session's cart, persisting an empty one on first access.
///
/// A cart that already exists ends the run early: there is nothing to write.
/// Its total is still recomputed from the lines before it is returned.
pub(crate) fn get_cart_pipeline() -> Pipeline<GetCartCtxData, CartError> {
  let mut p = Pipeline::<GetCartCtxData, CartError>::new(
    "get_cart",
    &[
      (VALIDATE_INPUT, false, None),
      (LOAD_OR_START, false, None),
      (PERSIST_CART, false, None),
    ],
  );

  p.on_root(VALIDATE_INPUT, steps::validate_identifiers::<GetCartCtxData>);
  p.on_root(LOAD_OR_START, load_cart_or_start_empty);
  p.on_root(PERSIST_CART, steps::persist_cart::<GetCartCtxData>);
  p.after_root(PERSIST_CART, steps::log_persisted_cart::<GetCartCtxData>);
  p
}

async fn load_cart_or_start_empty(ctx: ContextData<GetCartCtxData>) -> CartResult<PipelineControl> {
  let (carts, session_id) = ctx.with(|d| (d.deps.carts.clone(), d.session_id.clone()));

  match carts.load_cart(&session_id).await? {
    Some(loaded) => {
      let stored_total = loaded.total();
      let cart = recompute_total(loaded)?;
      if cart.total() != stored_total {
        warn!(%session_id, %stored_total, total = %cart.total(), "Stored cart total did not match its lines.");
      }
      debug!(%session_id, revision = cart.revision(), "Existing cart returned.");
      ctx.with_mut(|d| d.cart = Some(cart));
      Ok(PipelineControl::Stop)
    }
    None => {
      info!(%session_id, "First access for session, creating an empty cart.");
      ctx.with_mut(|d| d.cart = Some(Cart::new(session_id)));
      Ok(PipelineControl::Continue)
    }
  }
}
