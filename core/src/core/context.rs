// cartflow/src/core/context.rs

//! The boxed handler type stored by pipelines.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A type-erased async step handler over `ContextData<TData>`.
///
/// Handlers receive a clone of the run's context, must release any lock guard
/// before awaiting, and resolve to `PipelineControl` or the pipeline's error.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
