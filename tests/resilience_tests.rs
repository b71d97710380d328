// Resilience tests - per-call timeouts and bounded retries at every call site

mod common;

use common::{
    PIZZA_INSTRUCTIONS, PIZZA_ITEMS, RecordingSearch, ScriptedModel, Step, answer, orchestrator,
    search_request,
};
use landfill_core::{
    CallPolicy, ClassificationInput, ClassifyError, ModelError, RetryPolicy, SearchError,
    UpstreamError,
};
use std::time::Duration;

fn retrying(max_attempts: u32) -> CallPolicy {
    CallPolicy::new(
        Duration::from_secs(5),
        RetryPolicy {
            max_attempts,
            backoff: Duration::from_millis(200),
        },
    )
}

#[tokio::test(start_paused = true)]
async fn slow_model_times_out_as_upstream_unavailable() {
    let model = ScriptedModel::new(vec![Step::Slow(
        Duration::from_secs(120),
        answer(PIZZA_ITEMS),
    )]);
    let search = RecordingSearch::default();
    let policy = CallPolicy::new(Duration::from_secs(2), RetryPolicy::none());
    let engine = orchestrator(&model, &search, policy, 8);

    let err = engine
        .classify(ClassificationInput::from_text("pizza box"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "upstream_unavailable");
    match err {
        ClassifyError::UpstreamUnavailable(UpstreamError::Timeout { service, after }) => {
            assert_eq!(service, "scripted");
            assert_eq!(after, Duration::from_secs(2));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[tokio::test(start_paused = true)]
async fn transient_model_failure_is_retried() {
    let model = ScriptedModel::new(vec![
        Step::Fail(ModelError::invalid_response("scripted", "empty candidate")),
        Step::Turn(answer(PIZZA_ITEMS)),
        Step::Turn(answer(PIZZA_INSTRUCTIONS)),
    ]);
    let search = RecordingSearch::default();
    let engine = orchestrator(&model, &search, retrying(2), 8);

    let outcome = engine
        .classify(ClassificationInput::from_text("pizza box"))
        .await
        .expect("second attempt succeeds");

    assert_eq!(outcome.total_items, 1);
    assert_eq!(model.calls().await, 3);
}

#[tokio::test(start_paused = true)]
async fn retries_stop_at_the_attempt_limit() {
    let model = ScriptedModel::new(vec![
        Step::Fail(ModelError::invalid_response("scripted", "empty candidate")),
        Step::Fail(ModelError::invalid_response("scripted", "empty candidate")),
        Step::Turn(answer(PIZZA_ITEMS)),
    ]);
    let search = RecordingSearch::default();
    let engine = orchestrator(&model, &search, retrying(2), 8);

    let err = engine
        .classify(ClassificationInput::from_text("pizza box"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClassifyError::UpstreamUnavailable(UpstreamError::Model(ModelError::InvalidResponse { .. }))
    ));
    assert_eq!(model.calls().await, 2);
}

#[tokio::test(start_paused = true)]
async fn slow_attempt_is_retried_after_timeout() {
    let model = ScriptedModel::new(vec![
        Step::Slow(Duration::from_secs(60), answer(PIZZA_ITEMS)),
        Step::Turn(answer(PIZZA_ITEMS)),
        Step::Turn(answer(PIZZA_INSTRUCTIONS)),
    ]);
    let search = RecordingSearch::default();
    let engine = orchestrator(&model, &search, retrying(2), 8);

    let outcome = engine
        .classify(ClassificationInput::from_text("pizza box"))
        .await
        .expect("retry succeeds");

    assert_eq!(outcome.disposal_instructions.len(), 1);
    assert_eq!(model.calls().await, 3);
}

#[tokio::test]
async fn search_failure_propagates_unchanged() {
    let model = ScriptedModel::replies(vec![
        answer(PIZZA_ITEMS),
        search_request("call-1", "Marietta GA greasy pizza box recycling"),
    ]);
    let search = RecordingSearch::failing();
    let engine = orchestrator(&model, &search, retrying(3), 8);

    let err = engine
        .classify(ClassificationInput::from_text("pizza box"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClassifyError::UpstreamUnavailable(UpstreamError::Search(SearchError::MissingApiKey { .. }))
    ));
    // configuration errors are not transient
    assert_eq!(search.queries().await.len(), 1);
}

#[tokio::test]
async fn malformed_output_is_not_retried() {
    let model = ScriptedModel::replies(vec![answer("no JSON here"), answer(PIZZA_ITEMS)]);
    let search = RecordingSearch::default();
    let engine = orchestrator(&model, &search, retrying(3), 8);

    let err = engine
        .classify(ClassificationInput::from_text("pizza box"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClassifyError::MalformedOutput { .. }));
    assert_eq!(model.calls().await, 1);
}
