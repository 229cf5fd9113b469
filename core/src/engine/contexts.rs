// cartflow/src/engine/contexts.rs

//! Context data for each engine pipeline. The engine wraps these in
//! `ContextData` and runs the pipeline registered for the type.

use std::sync::Arc;

use crate::model::{Cart, Product, ProductId, SessionId};
use crate::store::{CartStore, ProductLookup};

/// The collaborators every pipeline step can reach through its context.
#[derive(Clone)]
pub struct Collaborators {
  pub products: Arc<dyn ProductLookup>,
  pub carts: Arc<dyn CartStore>,
}

/// Access shared by all cart pipeline contexts, so common steps can be written once.
pub trait CartCtx: Send + Sync + 'static {
  fn deps(&self) -> &Collaborators;
  fn session_id(&self) -> &SessionId;
  /// The product the operation targets, if it targets one.
  fn product_id(&self) -> Option<&ProductId>;
  fn cart(&self) -> Option<&Cart>;
  fn cart_slot(&mut self) -> &mut Option<Cart>;
}

/// Contexts of operations that consult the catalog before changing a line.
pub trait StockCheckedCtx: CartCtx {
  fn product(&self) -> Option<&Product>;
  fn product_slot(&mut self) -> &mut Option<Product>;
}

#[derive(Clone)]
pub struct AddItemCtxData {
  pub deps: Collaborators,
  pub session_id: SessionId,
  pub product_id: ProductId,
  pub quantity: u32,
  pub product: Option<Product>,
  pub cart: Option<Cart>,
}

#[derive(Clone)]
pub struct SetQuantityCtxData {
  pub deps: Collaborators,
  pub session_id: SessionId,
  pub product_id: ProductId,
  pub quantity: u32,
  pub product: Option<Product>,
  pub cart: Option<Cart>,
}

#[derive(Clone)]
pub struct RemoveItemCtxData {
  pub deps: Collaborators,
  pub session_id: SessionId,
  pub product_id: ProductId,
  pub removed: bool,
  pub cart: Option<Cart>,
}

#[derive(Clone)]
pub struct ClearCartCtxData {
  pub deps: Collaborators,
  pub session_id: SessionId,
  pub cleared_lines: usize,
  pub cart: Option<Cart>,
}

#[derive(Clone)]
pub struct GetCartCtxData {
  pub deps: Collaborators,
  pub session_id: SessionId,
  pub cart: Option<Cart>,
}

macro_rules! impl_cart_ctx {
  (@product_id $self:ident, true) => {
    Some(&$self.product_id)
  };
  (@product_id $self:ident, false) => {
    None
  };
  ($ty:ty, product: $has_product:tt) => {
    impl CartCtx for $ty {
      fn deps(&self) -> &Collaborators {
        &self.deps
      }

      fn session_id(&self) -> &SessionId {
        &self.session_id
      }

      fn product_id(&self) -> Option<&ProductId> {
        impl_cart_ctx!(@product_id self, $has_product)
      }

      fn cart(&self) -> Option<&Cart> {
        self.cart.as_ref()
      }

      fn cart_slot(&mut self) -> &mut Option<Cart> {
        &mut self.cart
      }
    }
  };
}

impl_cart_ctx!(AddItemCtxData, product: true);
impl_cart_ctx!(SetQuantityCtxData, product: true);
impl_cart_ctx!(RemoveItemCtxData, product: true);
impl_cart_ctx!(ClearCartCtxData, product: false);
impl_cart_ctx!(GetCartCtxData, product: false);

impl StockCheckedCtx for AddItemCtxData {
  fn product(&self) -> Option<&Product> {
    self.product.as_ref()
  }

  fn product_slot(&mut self) -> &mut Option<Product> {
    &mut self.product
  }
}

impl StockCheckedCtx for SetQuantityCtxData {
  fn product(&self) -> Option<&Product> {
    self.product.as_ref()
  }

  fn product_slot(&mut self) -> &mut Option<Product> {
    &mut self.product
  }
}
