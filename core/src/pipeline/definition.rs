// cartflow/src/pipeline/definition.rs

//! The `Pipeline<TData, Err>` struct and its construction.

use crate::core::context::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::PipelineError;
use std::collections::HashMap;

/// An ordered list of named steps, each with `before`/`on`/`after` handlers,
/// run against a shared `ContextData<TData>`.
///
/// `Err` is what handlers fail with. It must absorb `PipelineError` so runtime
/// misconfiguration (a required step with no handler) surfaces through the
/// same channel as handler failures.
pub struct Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  pub(crate) name: String,
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Creates a pipeline from `(step_name, optional, skip_if)` triples, in run order.
  pub fn new(name: &str, step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(step_name, optional, skip_if)| StepDef {
        name: (*step_name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      name: name.to_string(),
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// # Panics
  ///
  /// If `step_name` was never declared. This is a wiring mistake caught while
  /// pipelines are assembled, never at request time.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!(
        "Pipeline '{}' setup error: step '{}' is not declared.",
        self.name, step_name
      );
    }
  }

  pub fn set_skip_condition(&mut self, step_name: &str, skip_if: Option<SkipCondition<TData>>) {
    self.ensure_step_exists(step_name);
    if let Some(step) = self.steps.iter_mut().find(|s| s.name == step_name) {
      step.skip_if = skip_if;
    }
  }
}
