// cartflow/src/model/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CartError, CartResult};
use crate::model::ids::ProductId;

/// What the cart needs to know about a catalog product: its current price and
/// the authoritative stock count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: ProductId,
  pub name: String,
  pub price: Decimal,
  /// Units available for purchase.
  pub quantity: u32,
}

impl Product {
  /// Builds a product, rejecting negative prices.
  pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal, quantity: u32) -> CartResult<Self> {
    let id = id.into();
    if price < Decimal::ZERO {
      return Err(CartError::Validation(format!(
        "Product {} has a negative price ({}).",
        id, price
      )));
    }
    Ok(Self {
      id,
      name: name.into(),
      price,
      quantity,
    })
  }

  pub fn has_stock_for(&self, requested: u32) -> bool {
    self.quantity >= requested
  }
}
