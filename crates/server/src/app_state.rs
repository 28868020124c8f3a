use std::time::Duration;

use shared::protocol::QueryResponse;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) fixture: QueryResponse,
    pub(crate) response_delay: Duration,
    pub(crate) failure_trigger: Option<String>,
}
