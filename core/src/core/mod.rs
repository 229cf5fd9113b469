// cartflow/src/core/mod.rs

//! Building blocks of the step runtime: shared context, flow control, step
//! definitions and the handler type.

pub mod context;
pub mod context_data;
pub mod control;
pub mod step;

pub use context_data::ContextData;
