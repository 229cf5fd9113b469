// cartflow/src/core/control.rs

//! Flow signals returned by step handlers, and the outcome of a whole run.

/// Returned by a handler to keep going or to end the run early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// Halt immediately. Remaining handlers of this step and all later steps are skipped.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (or was skipped by its condition/optionality).
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
