// tests/pipeline_execution_tests.rs
mod common;

use cartflow::{ContextData, Pipeline, PipelineControl, PipelineResult, SkipCondition};
use common::*;
use serial_test::serial;
use std::sync::Arc;

fn three_steps() -> Pipeline<TraceContext, TestError> {
  Pipeline::new("trace", &[("step1", false, None), ("step2", false, None), ("step3", false, None)])
}

#[tokio::test]
#[serial]
async fn test_pipeline_runs_steps_in_order() {
  setup_tracing();
  let mut pipeline = three_steps();
  pipeline.on_root("step1", recording_handler("step1"));
  pipeline.on_root("step2", recording_handler("step2"));
  pipeline.on_root("step3", recording_handler("step3"));

  let ctx = ContextData::new(TraceContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Completed);
  let guard = ctx.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.steps_executed, vec!["step1", "step2", "step3"]);
  assert_eq!(pipeline.step_names(), vec!["step1", "step2", "step3"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_stops_on_pipeline_control_stop() {
  setup_tracing();
  let mut pipeline = three_steps();
  pipeline.on_root("step1", recording_handler("step1"));
  pipeline.on_root("step2", recording_handler("step2"));
  pipeline.on_root("step3", recording_handler("step3"));

  let ctx = ContextData::new(TraceContext {
    stop_at: Some("step2".to_string()),
    ..Default::default()
  });
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["step1", "step2"]);
}

#[tokio::test]
#[serial]
async fn test_stop_in_before_phase_skips_on_and_after() {
  setup_tracing();
  let mut pipeline = three_steps();
  pipeline.before_root("step1", recording_handler("before1"));
  pipeline.on_root("step1", recording_handler("on1"));
  pipeline.after_root("step1", recording_handler("after1"));
  pipeline.on_root("step2", recording_handler("on2"));
  pipeline.on_root("step3", recording_handler("on3"));

  let ctx = ContextData::new(TraceContext {
    stop_at: Some("before1".to_string()),
    ..Default::default()
  });
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.read().steps_executed, vec!["before1"]);
}

#[tokio::test]
#[serial]
async fn test_phases_run_before_on_after() {
  setup_tracing();
  let mut pipeline = Pipeline::<TraceContext, TestError>::new("phases", &[("only", false, None)]);
  // Registered out of order on purpose; the phase decides when a handler runs.
  pipeline.after_root("only", recording_handler("after"));
  pipeline.on_root("only", recording_handler("on_a"));
  pipeline.before_root("only", recording_handler("before"));
  pipeline.on_root("only", recording_handler("on_b"));

  let ctx = ContextData::new(TraceContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().steps_executed, vec!["before", "on_a", "on_b", "after"]);
}

#[tokio::test]
#[serial]
async fn test_pipeline_propagates_handler_error() {
  setup_tracing();
  let mut pipeline = three_steps();
  pipeline.on_root("step1", recording_handler("step1"));
  pipeline.on_root("step2", |_ctx: ContextData<TraceContext>| {
    Box::pin(async move { Err::<PipelineControl, _>(TestError::Handler("I am a bad step!".to_string())) })
  });
  pipeline.after_root("step2", recording_handler("after2"));
  pipeline.on_root("step3", recording_handler("step3"));

  let ctx = ContextData::new(TraceContext::default());
  let result = pipeline.run(ctx.clone()).await;

  assert_eq!(result.unwrap_err(), TestError::Handler("I am a bad step!".to_string()));
  assert_eq!(ctx.read().steps_executed, vec!["step1"]);
}

#[tokio::test]
#[serial]
async fn test_skip_condition_bypasses_step() {
  setup_tracing();
  let skip_when_counted: SkipCondition<TraceContext> = Arc::new(|ctx: ContextData<TraceContext>| ctx.read().counter > 0);
  let mut pipeline = Pipeline::<TraceContext, TestError>::new(
    "skips",
    &[("first", false, None), ("guarded", false, Some(skip_when_counted)), ("last", false, None)],
  );
  pipeline.on_root("first", recording_handler("first"));
  pipeline.on_root("guarded", recording_handler("guarded"));
  pipeline.on_root("last", recording_handler("last"));

  let ctx = ContextData::new(TraceContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().steps_executed, vec!["first", "last"]);

  pipeline.set_skip_condition("guarded", None);
  let ctx = ContextData::new(TraceContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().steps_executed, vec!["first", "guarded", "last"]);
}

#[tokio::test]
#[serial]
async fn test_optional_step_without_handlers_is_skipped() {
  setup_tracing();
  let mut pipeline =
    Pipeline::<TraceContext, TestError>::new("optional", &[("present", false, None), ("hook", true, None)]);
  pipeline.on_root("present", recording_handler("present"));

  let ctx = ContextData::new(TraceContext::default());
  assert_eq!(pipeline.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.read().counter, 1);
}

#[tokio::test]
#[serial]
async fn test_required_step_without_handlers_fails() {
  setup_tracing();
  let mut pipeline = three_steps();
  pipeline.on_root("step1", recording_handler("step1"));
  pipeline.on_root("step3", recording_handler("step3"));

  let ctx = ContextData::new(TraceContext::default());
  let err = pipeline.run(ctx.clone()).await.unwrap_err();

  match err {
    TestError::Runtime(msg) => assert!(msg.contains("HandlerMissing") && msg.contains("step2")),
    other => panic!("Expected a runtime error, got {:?}", other),
  }
  assert_eq!(ctx.read().steps_executed, vec!["step1"]);
}

#[test]
#[should_panic(expected = "is not declared")]
fn test_registering_on_unknown_step_panics() {
  let mut pipeline = three_steps();
  pipeline.on_root("step4", recording_handler("step4"));
}
