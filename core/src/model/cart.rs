// cartflow/src/model/cart.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CartError, CartResult};
use crate::model::ids::{ProductId, SessionId};

/// One product entry of a cart.
///
/// `price` is the unit price captured when the line was created. Later catalog
/// price changes do not touch it, and neither does a quantity change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
  pub product_id: ProductId,
  pub quantity: u32,
  pub price: Decimal,
}

impl CartLineItem {
  /// `price * quantity`, or `None` if it does not fit a `Decimal`.
  pub fn subtotal(&self) -> Option<Decimal> {
    self.price.checked_mul(Decimal::from(self.quantity))
  }
}

/// A session's cart.
///
/// Lines are kept in insertion order and never share a product id. `total` is
/// derived: engine operations finish with `recompute_total`, nothing else
/// writes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
  session_id: SessionId,
  items: Vec<CartLineItem>,
  total: Decimal,
  /// Number of persisted writes; 0 until the cart is first saved.
  revision: u64,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
}

impl Cart {
  /// An empty, not yet persisted cart bound to `session_id`.
  pub fn new(session_id: SessionId) -> Self {
    let now = Utc::now();
    Self {
      session_id,
      items: Vec::new(),
      total: Decimal::ZERO,
      revision: 0,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn session_id(&self) -> &SessionId {
    &self.session_id
  }

  pub fn items(&self) -> &[CartLineItem] {
    &self.items
  }

  pub fn total(&self) -> Decimal {
    self.total
  }

  pub fn revision(&self) -> u64 {
    self.revision
  }

  pub fn created_at(&self) -> DateTime<Utc> {
    self.created_at
  }

  pub fn updated_at(&self) -> DateTime<Utc> {
    self.updated_at
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  /// Total units across all lines.
  pub fn item_count(&self) -> u64 {
    self.items.iter().map(|item| u64::from(item.quantity)).sum()
  }

  pub fn line(&self, product_id: &ProductId) -> Option<&CartLineItem> {
    self.items.iter().find(|item| &item.product_id == product_id)
  }

  /// `Σ(price * quantity)` over the current lines, or `None` on overflow.
  pub fn sum_of_lines(&self) -> Option<Decimal> {
    self
      .items
      .iter()
      .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.subtotal()?))
  }

  pub(crate) fn line_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLineItem> {
    self.items.iter_mut().find(|item| &item.product_id == product_id)
  }

  /// Appends a line. Callers must have checked that no line exists for the product.
  pub(crate) fn push_line(&mut self, item: CartLineItem) {
    debug_assert!(self.line(&item.product_id).is_none());
    self.items.push(item);
  }

  pub(crate) fn remove_line(&mut self, product_id: &ProductId) -> Option<CartLineItem> {
    let idx = self.items.iter().position(|item| &item.product_id == product_id)?;
    Some(self.items.remove(idx))
  }

  pub(crate) fn clear_lines(&mut self) {
    self.items.clear();
  }

  /// Marks the cart as one write newer than the revision it was loaded at.
  /// Returns the revision the store is expected to still hold.
  pub(crate) fn advance_revision(&mut self) -> u64 {
    let expected = self.revision;
    self.revision += 1;
    self.updated_at = Utc::now();
    expected
  }
}

/// Returns `cart` with `total` set to the sum of its line subtotals.
///
/// Fails with `CartError::Validation` when the total is too large to represent.
pub fn recompute_total(mut cart: Cart) -> CartResult<Cart> {
  cart.total = cart
    .sum_of_lines()
    .ok_or_else(|| CartError::Validation("Cart total is out of range.".to_string()))?;
  Ok(cart)
}
