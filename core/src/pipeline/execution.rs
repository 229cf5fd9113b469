// cartflow/src/pipeline/execution.rs

//! `Pipeline::run()`: drives the steps in order against one shared context.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::step::StepDef;
use crate::error::PipelineError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, span, Instrument, Level};

/// What a single phase (before/on/after) of a step ended with.
enum PhaseOutcome {
  Continue,
  Stopped,
}

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<PipelineError> + Send + Sync + 'static,
{
  /// Executes every step against `ctx_data`.
  ///
  /// For each step: evaluate `skip_if`, then run `before`, `on` and `after`
  /// handlers in registration order. The first handler error aborts the run and
  /// is returned as is; a `Stop` ends the run with `PipelineResult::Stopped`.
  /// A non-optional step with no handlers at all yields
  /// `PipelineError::HandlerMissing`.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(pipeline = %self.name, num_steps = self.steps.len()),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::DEBUG,
        "pipeline_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx
      );
      if let PhaseOutcome::Stopped = self.run_step(step_def, &ctx_data).instrument(step_span).await? {
        return Ok(PipelineResult::Stopped);
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<PhaseOutcome, Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_cond) = &step_def.skip_if {
      if skip_cond(ctx_data.clone()) {
        event!(Level::DEBUG, "Step skipped by its condition.");
        return Ok(PhaseOutcome::Continue);
      }
    }

    let before = self.before.get(step_name).filter(|v| !v.is_empty());
    let on = self.on.get(step_name).filter(|v| !v.is_empty());
    let after = self.after.get(step_name).filter(|v| !v.is_empty());

    if before.is_none() && on.is_none() && after.is_none() {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(PhaseOutcome::Continue);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(PipelineError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase, handlers) in [("before", before), ("on", on), ("after", after)] {
      let Some(handlers) = handlers else { continue };
      if let PhaseOutcome::Stopped = run_phase(phase, handlers, ctx_data).await? {
        event!(Level::INFO, phase, "Pipeline stopped by a handler.");
        return Ok(PhaseOutcome::Stopped);
      }
    }
    Ok(PhaseOutcome::Continue)
  }
}

async fn run_phase<TData, Err>(
  phase: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PhaseOutcome, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + Send + Sync + 'static,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    event!(Level::TRACE, phase, handler_index = handler_idx, "Running handler.");
    match handler_fn(ctx_data.clone()).await {
      Ok(PipelineControl::Continue) => {}
      Ok(PipelineControl::Stop) => return Ok(PhaseOutcome::Stopped),
      Err(e) => {
        event!(Level::WARN, phase, handler_index = handler_idx, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PhaseOutcome::Continue)
}
