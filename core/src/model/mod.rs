// cartflow/src/model/mod.rs

//! Cart, line item and product types.

pub mod cart;
pub mod ids;
pub mod product;

pub use cart::{recompute_total, Cart, CartLineItem};
pub use ids::{ProductId, SessionId};
pub use product::Product;
