//! Cosmetic pipeline-stage indicator shown while a query is pending.
//!
//! The simulator runs on its own clock and only watches the lifecycle state.
//! It never hears from the backend, so the stage it reports is an estimate
//! for the user's benefit and says nothing about where the real pipeline is.
//! Replacing it with server-sent progress only requires a different producer
//! for the stage index; `RequestController` does not know this type exists.

use std::time::Duration;

use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::lifecycle::LifecycleState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    FilterExtraction,
    StructuredQuery,
    Embedding,
    VectorSearch,
    AnswerGeneration,
}

pub const PIPELINE_STAGES: [PipelineStage; 5] = [
    PipelineStage::FilterExtraction,
    PipelineStage::StructuredQuery,
    PipelineStage::Embedding,
    PipelineStage::VectorSearch,
    PipelineStage::AnswerGeneration,
];

impl PipelineStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::FilterExtraction => "Extracting filters from your question",
            Self::StructuredQuery => "Querying contract database",
            Self::Embedding => "Embedding query",
            Self::VectorSearch => "Searching similar clauses",
            Self::AnswerGeneration => "Generating answer",
        }
    }

    pub fn at(index: usize) -> Self {
        PIPELINE_STAGES[index.min(PIPELINE_STAGES.len() - 1)]
    }
}

/// Saturating index over a fixed number of stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepCursor {
    index: usize,
    len: usize,
}

impl StepCursor {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_saturated(&self) -> bool {
        self.index + 1 == self.len
    }

    /// Moves to the next stage. Returns `false` once on the last stage.
    pub fn advance(&mut self) -> bool {
        if self.is_saturated() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn reset(&mut self) {
        self.index = 0;
    }
}

pub struct StepSimulator {
    index_rx: watch::Receiver<usize>,
    task: JoinHandle<()>,
}

impl StepSimulator {
    pub fn spawn(lifecycle: watch::Receiver<LifecycleState>, interval: Duration) -> Self {
        let (index_tx, index_rx) = watch::channel(0);
        // tokio intervals reject a zero period.
        let interval = interval.max(Duration::from_millis(1));
        let task = tokio::spawn(run_simulator(lifecycle, index_tx, interval));
        Self { index_rx, task }
    }

    pub fn current_index(&self) -> usize {
        *self.index_rx.borrow()
    }

    pub fn current_stage(&self) -> PipelineStage {
        PipelineStage::at(self.current_index())
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.index_rx.clone()
    }
}

impl Drop for StepSimulator {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_simulator(
    mut lifecycle: watch::Receiver<LifecycleState>,
    index_tx: watch::Sender<usize>,
    interval: Duration,
) {
    let mut cursor = StepCursor::new(PIPELINE_STAGES.len());
    loop {
        let epoch = match lifecycle.wait_for(LifecycleState::is_pending).await {
            Ok(state) => state.pending_epoch(),
            Err(_) => return,
        };
        cursor.reset();
        index_tx.send_replace(cursor.index());

        let mut ticker = interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if cursor.advance() {
                        debug!(stage = cursor.index(), "steps: advanced");
                        index_tx.send_replace(cursor.index());
                    }
                }
                changed = lifecycle.changed() => {
                    if changed.is_err() {
                        index_tx.send_replace(0);
                        return;
                    }
                    // Idle then Pending may arrive as a single change, so a
                    // new epoch ends the period just like a non-pending state.
                    if lifecycle.borrow_and_update().pending_epoch() != epoch {
                        break;
                    }
                }
            }
        }

        cursor.reset();
        index_tx.send_replace(cursor.index());
    }
}

#[cfg(test)]
#[path = "tests/steps_tests.rs"]
mod tests;
