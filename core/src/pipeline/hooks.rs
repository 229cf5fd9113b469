// cartflow/src/pipeline/hooks.rs

//! Registration of `before`, `on` and `after` handlers.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use std::collections::HashMap;
use std::future::Future;

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Registers a handler that runs before the step's `on` handlers.
  ///
  /// The handler may fail with any error convertible into the pipeline's `Err`.
  pub fn before_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.before, step_name, box_handler(handler_fn));
  }

  /// Registers a step's main handler.
  pub fn on_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.on, step_name, box_handler(handler_fn));
  }

  /// Registers a handler that runs once the step's `on` handlers succeeded.
  pub fn after_root<F, UserErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.after, step_name, box_handler(handler_fn));
  }
}

fn box_handler<TData, Err, F, UserErr>(
  handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  F: Future<Output = Result<PipelineControl, UserErr>> + Send + 'static,
  UserErr: Into<Err> + Send + Sync + 'static,
  Err: 'static,
{
  Box::new(move |ctx_data| {
    let user_fut = handler_fn(ctx_data);
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  })
}

fn push_handler<TData: Send + Sync + 'static, Err>(
  phase: &mut HashMap<String, Vec<Handler<TData, Err>>>,
  step_name: &str,
  handler: Handler<TData, Err>,
) {
  phase.entry(step_name.to_string()).or_default().push(handler);
}
