// cartflow/src/lib.rs

//! cartflow: session cart reconciliation for storefronts.
//!
//! A `CartEngine` applies add / set-quantity / remove / clear operations to a
//! session's cart and returns the new, internally consistent cart:
//!  - Adding a product already in the cart merges quantities into one line.
//!  - Every quantity change is checked against the catalog's current stock.
//!  - The total is recomputed from the lines at the end of every change.
//!  - A rejected operation leaves the stored cart exactly as it was.
//!
//! Each operation is a named-step `Pipeline` over its own context type,
//! dispatched through a `PipelineRegistry`. The catalog and the cart storage
//! are collaborators behind the `ProductLookup` and `CartStore` traits.

pub mod core;
pub mod engine;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod registry;
pub mod store;

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::Pipeline;
pub use crate::registry::PipelineRegistry;

pub use crate::engine::locks::{SessionGuard, SessionLocks};
pub use crate::engine::CartEngine;

pub use crate::error::{CartError, CartResult, Missing, PipelineError, StoreError};

pub use crate::model::{recompute_total, Cart, CartLineItem, Product, ProductId, SessionId};

pub use crate::store::{CartStore, InMemoryCartStore, InMemoryCatalog, ProductLookup};
