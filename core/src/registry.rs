// cartflow/src/registry.rs

//! `PipelineRegistry<Err>`: one pipeline per context data type, dispatched by `TypeId`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{event, Level};

#[async_trait]
trait AnyPipelineRunner<Err>: Send + Sync
where
  Err: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` for the wrapped pipeline's `TData`.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, Err>;

  fn pipeline_name(&self) -> &str;
}

#[async_trait]
impl<TData, Err> AnyPipelineRunner<Err> for Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, Err> {
    let ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed) => *boxed,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>().to_string();
        event!(Level::ERROR, %expected_type, "Context object type mismatch.");
        return Err(Err::from(PipelineError::TypeMismatch { expected_type }));
      }
    };
    self.run(ctx_data).await
  }

  fn pipeline_name(&self) -> &str {
    self.name()
  }
}

/// Holds the pipelines of an engine, keyed by the context data type they run on.
pub struct PipelineRegistry<Err>
where
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pipelines: RwLock<HashMap<TypeId, Arc<dyn AnyPipelineRunner<Err>>>>,
}

impl<Err> PipelineRegistry<Err>
where
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for `TData`, replacing any earlier registration.
  pub fn register_pipeline<TData>(&self, pipeline: Pipeline<TData, Err>)
  where
    TData: 'static + Send + Sync,
  {
    event!(
      Level::DEBUG,
      pipeline = pipeline.name(),
      tdata_type = %std::any::type_name::<TData>(),
      "Registering pipeline."
    );
    self
      .pipelines
      .write()
      .insert(TypeId::of::<TData>(), Arc::new(pipeline));
  }

  pub fn is_registered<TData: 'static>(&self) -> bool {
    self.pipelines.read().contains_key(&TypeId::of::<TData>())
  }

  pub fn pipeline_names(&self) -> Vec<String> {
    let mut names: Vec<String> = self
      .pipelines
      .read()
      .values()
      .map(|p| p.pipeline_name().to_string())
      .collect();
    names.sort();
    names
  }

  /// Runs the pipeline registered for `TData` against `ctx_data`.
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self
      .pipelines
      .read()
      .get(&TypeId::of::<TData>())
      .cloned()
      .ok_or_else(|| {
        let context_type = std::any::type_name::<TData>().to_string();
        event!(Level::ERROR, %context_type, "No pipeline registered.");
        Err::from(PipelineError::NotRegistered { context_type })
      })?;

    runner.run_erased(Box::new(ctx_data)).await
  }
}

impl<Err> Default for PipelineRegistry<Err>
where
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
