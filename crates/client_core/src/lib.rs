use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard,
    },
    time::Duration,
};

use async_trait::async_trait;
use shared::domain::{Query, QueryResult};
use tokio::{sync::watch, time::Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod score;
pub mod steps;
pub mod transport;

pub use config::{load_settings, ClientSettings};
pub use error::{ClassifiedError, ErrorKind, ServiceError};
pub use lifecycle::{LifecycleState, View};
pub use transport::HttpQueryService;

/// Cancellation token for one submitted query.
///
/// Clones share the same token. Cancelling is idempotent.
#[derive(Debug, Clone)]
pub struct AbortHandle {
    id: Uuid,
    token: CancellationToken,
}

impl AbortHandle {
    fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            token: CancellationToken::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the handle has been cancelled.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}

/// The remote retrieval-and-generation pipeline, seen as one operation.
///
/// Implementations should settle with `ServiceError::Cancelled` once `abort`
/// fires; the controller discards whatever they return after that anyway.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn query(&self, query: &Query, abort: AbortHandle) -> Result<QueryResult, ServiceError>;
}

struct InflightRequest {
    handle: AbortHandle,
    started_at: Instant,
}

enum Settlement {
    Completed(Result<QueryResult, ServiceError>),
    TimedOut,
    Cancelled,
}

/// Owns the single outstanding query and drives `LifecycleState`.
///
/// Every submission gets a fresh `AbortHandle` that is raced against the
/// service call and a deadline timer inside one task. Only the task whose
/// handle is still the current one may publish a terminal state.
pub struct RequestController {
    service: Arc<dyn QueryService>,
    timeout: Duration,
    state: watch::Sender<LifecycleState>,
    inflight: Mutex<Option<InflightRequest>>,
    epoch: AtomicU64,
}

impl RequestController {
    pub fn new(service: Arc<dyn QueryService>, settings: &ClientSettings) -> Arc<Self> {
        Self::with_timeout(service, settings.timeout)
    }

    pub fn with_timeout(service: Arc<dyn QueryService>, timeout: Duration) -> Arc<Self> {
        let (state, _) = watch::channel(LifecycleState::Idle);
        Arc::new(Self {
            service,
            timeout,
            state,
            inflight: Mutex::new(None),
            epoch: AtomicU64::new(0),
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LifecycleState> {
        self.state.subscribe()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether a handle and its deadline timer are currently live.
    pub fn is_in_flight(&self) -> bool {
        self.lock_inflight().is_some()
    }

    /// Starts a query. Ignored when the text is blank or one is already pending.
    pub fn submit(self: &Arc<Self>, raw: &str) -> bool {
        let Some(query) = Query::parse(raw) else {
            debug!("controller: ignoring blank query");
            return false;
        };

        let mut inflight = self.lock_inflight();
        if inflight.is_some() {
            debug!("controller: ignoring submit while a query is pending");
            return false;
        }
        self.start(&mut inflight, query);
        true
    }

    /// Starts a query, cancelling any pending one first.
    ///
    /// The previous handle is cancelled before the new one exists, so a late
    /// response for the old query can never reach the state.
    pub fn supersede(self: &Arc<Self>, raw: &str) -> bool {
        let Some(query) = Query::parse(raw) else {
            debug!("controller: ignoring blank query");
            return false;
        };

        let mut inflight = self.lock_inflight();
        if let Some(previous) = inflight.take() {
            info!(request_id = %previous.handle.id(), "controller: superseding pending query");
            previous.handle.cancel();
        }
        self.start(&mut inflight, query);
        true
    }

    /// User cancellation. The pending query settles as failed.
    pub fn cancel(&self) {
        if let Some(request) = self.lock_inflight().as_ref() {
            info!(request_id = %request.handle.id(), "controller: cancel requested");
            request.handle.cancel();
        }
    }

    /// Abandons any pending query without reporting it and returns to idle.
    pub fn clear(&self) {
        let mut inflight = self.lock_inflight();
        if let Some(previous) = inflight.take() {
            debug!(request_id = %previous.handle.id(), "controller: clearing pending query");
            previous.handle.cancel();
        }
        self.state.send_replace(LifecycleState::Idle);
    }

    fn start(self: &Arc<Self>, slot: &mut Option<InflightRequest>, query: Query) {
        let handle = AbortHandle::new();
        info!(request_id = %handle.id(), chars = query.as_str().len(), "controller: submitting query");

        *slot = Some(InflightRequest {
            handle: handle.clone(),
            started_at: Instant::now(),
        });
        let epoch = self.epoch.fetch_add(1, Ordering::Relaxed) + 1;
        self.state.send_replace(LifecycleState::Pending { epoch });

        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let settlement = controller.race(&query, handle.clone()).await;
            controller.settle(&handle, settlement);
        });
    }

    async fn race(&self, query: &Query, handle: AbortHandle) -> Settlement {
        let deadline = tokio::time::sleep(self.timeout);
        tokio::select! {
            biased;
            _ = handle.cancelled() => Settlement::Cancelled,
            _ = deadline => {
                handle.cancel();
                Settlement::TimedOut
            }
            outcome = self.service.query(query, handle.clone()) => Settlement::Completed(outcome),
        }
    }

    fn settle(&self, handle: &AbortHandle, settlement: Settlement) {
        let mut inflight = self.lock_inflight();
        let is_current = inflight
            .as_ref()
            .is_some_and(|request| request.handle.id() == handle.id());
        if !is_current {
            debug!(request_id = %handle.id(), "controller: discarding settlement of stale query");
            return;
        }
        let Some(request) = inflight.take() else {
            return;
        };
        let elapsed_ms = request.started_at.elapsed().as_millis() as u64;

        let next = match settlement {
            Settlement::Completed(Ok(result)) => {
                info!(
                    request_id = %handle.id(),
                    elapsed_ms,
                    chunks = result.chunks.len(),
                    records = result.records.len(),
                    "controller: query succeeded"
                );
                LifecycleState::Succeeded(result)
            }
            Settlement::Completed(Err(err)) => {
                warn!(request_id = %handle.id(), elapsed_ms, error = %err, "controller: query failed");
                LifecycleState::Failed(ClassifiedError::from(err))
            }
            Settlement::TimedOut => {
                warn!(request_id = %handle.id(), elapsed_ms, "controller: query timed out");
                LifecycleState::Failed(ClassifiedError::timeout())
            }
            Settlement::Cancelled => {
                info!(request_id = %handle.id(), elapsed_ms, "controller: query cancelled");
                LifecycleState::Failed(ClassifiedError::timeout())
            }
        };
        self.state.send_replace(next);
    }

    fn lock_inflight(&self) -> MutexGuard<'_, Option<InflightRequest>> {
        self.inflight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
