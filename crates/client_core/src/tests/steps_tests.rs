use super::*;
use shared::domain::QueryResult;

#[test]
fn cursor_saturates_on_last_stage() {
    let mut cursor = StepCursor::new(PIPELINE_STAGES.len());
    for _ in 0..4 {
        assert!(cursor.advance());
    }
    assert!(cursor.is_saturated());
    for _ in 0..10 {
        assert!(!cursor.advance());
    }
    assert_eq!(cursor.index(), 4);
    cursor.reset();
    assert_eq!(cursor.index(), 0);
}

#[test]
fn zero_length_cursor_behaves_as_single_stage() {
    let mut cursor = StepCursor::new(0);
    assert!(cursor.is_saturated());
    assert!(!cursor.advance());
}

#[test]
fn stage_lookup_clamps_out_of_range_indices() {
    assert_eq!(PipelineStage::at(0), PipelineStage::FilterExtraction);
    assert_eq!(PipelineStage::at(99), PipelineStage::AnswerGeneration);
}

#[tokio::test(start_paused = true)]
async fn simulator_saturates_while_pending_and_resets_afterwards() {
    let interval = Duration::from_millis(2200);
    let (state_tx, state_rx) = watch::channel(LifecycleState::Idle);
    let simulator = StepSimulator::spawn(state_rx, interval);

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(simulator.current_index(), 0, "idle must not advance");

    state_tx.send_replace(LifecycleState::Pending { epoch: 1 });
    tokio::time::sleep(interval + Duration::from_millis(100)).await;
    assert_eq!(simulator.current_index(), 1);

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(simulator.current_index(), 4);
    assert_eq!(simulator.current_stage(), PipelineStage::AnswerGeneration);

    state_tx.send_replace(LifecycleState::Succeeded(QueryResult::default()));
    tokio::time::sleep(Duration::from_millis(1)).await;
    assert_eq!(simulator.current_index(), 0);

    state_tx.send_replace(LifecycleState::Pending { epoch: 2 });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(simulator.current_index(), 0, "new pending period starts at 0");
    tokio::time::sleep(interval).await;
    assert_eq!(simulator.current_index(), 1);
}

#[tokio::test(start_paused = true)]
async fn simulator_publishes_each_stage_once() {
    let interval = Duration::from_millis(2200);
    let (state_tx, state_rx) = watch::channel(LifecycleState::Idle);
    let simulator = StepSimulator::spawn(state_rx, interval);
    let mut stages = simulator.subscribe();

    state_tx.send_replace(LifecycleState::Pending { epoch: 1 });
    let mut seen = Vec::new();
    while seen.len() < 4 {
        stages.changed().await.expect("simulator alive");
        let index = *stages.borrow_and_update();
        if index > 0 {
            seen.push(index);
        }
    }
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

/// Never settles, so the controller stays pending until told otherwise.
struct StalledService;

#[async_trait::async_trait]
impl crate::QueryService for StalledService {
    async fn query(
        &self,
        _query: &shared::domain::Query,
        _abort: crate::AbortHandle,
    ) -> Result<QueryResult, crate::ServiceError> {
        std::future::pending().await
    }
}

#[tokio::test(start_paused = true)]
async fn clear_then_submit_restarts_indicator_from_first_stage() {
    let interval = Duration::from_millis(2200);
    let controller = crate::RequestController::with_timeout(
        std::sync::Arc::new(StalledService),
        Duration::from_secs(90),
    );
    let simulator = StepSimulator::spawn(controller.subscribe(), interval);

    assert!(controller.submit("first question"));
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(simulator.current_index(), 4);

    // No yield between the two calls: the simulator only sees the latest value.
    controller.clear();
    assert!(controller.submit("second question"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(simulator.current_index(), 0, "new pending period starts at 0");

    tokio::time::sleep(interval).await;
    assert_eq!(simulator.current_index(), 1);
}

#[tokio::test(start_paused = true)]
async fn supersede_restarts_indicator_from_first_stage() {
    let interval = Duration::from_millis(2200);
    let controller = crate::RequestController::with_timeout(
        std::sync::Arc::new(StalledService),
        Duration::from_secs(90),
    );
    let simulator = StepSimulator::spawn(controller.subscribe(), interval);

    assert!(controller.submit("first question"));
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(simulator.current_index(), 4);

    assert!(controller.supersede("second question"));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(controller.state().is_pending());
    assert_eq!(simulator.current_index(), 0);
}

#[tokio::test(start_paused = true)]
async fn same_epoch_republish_does_not_reset_progress() {
    let interval = Duration::from_millis(2200);
    let (state_tx, state_rx) = watch::channel(LifecycleState::Idle);
    let simulator = StepSimulator::spawn(state_rx, interval);

    state_tx.send_replace(LifecycleState::Pending { epoch: 7 });
    tokio::time::sleep(interval * 2 + Duration::from_millis(100)).await;
    assert_eq!(simulator.current_index(), 2);

    state_tx.send_replace(LifecycleState::Pending { epoch: 7 });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(simulator.current_index(), 2);
}
