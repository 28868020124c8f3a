//! HTTP implementation of the query service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use shared::{
    domain::{Query, QueryResult},
    error::extract_error_detail,
    protocol::{HealthResponse, QueryRequest, QueryResponse, HEALTH_PATH, QUERY_PATH},
};
use tracing::debug;

use crate::{error::ServiceError, AbortHandle, QueryService};

const BODY_EXCERPT_CHARS: usize = 200;

/// Upper bound on a liveness check, connect through body.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpQueryService {
    http: Client,
    base_url: String,
    health_timeout: Duration,
}

impl HttpQueryService {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            health_timeout: HEALTH_TIMEOUT,
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Liveness probe. Not routed through the lifecycle controller, and
    /// bounded by the health timeout since nothing else can cancel it.
    pub async fn health(&self) -> Result<HealthResponse, ServiceError> {
        let response = self
            .http
            .get(self.url(HEALTH_PATH))
            .timeout(self.health_timeout)
            .send()
            .await
            .map_err(network_error)?;
        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        let value = interpret_body(status, &body)?;
        serde_json::from_value(value).map_err(|_| ServiceError::NonJson {
            status: status.as_u16(),
            excerpt: excerpt(&body),
        })
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn query(&self, query: &Query, abort: AbortHandle) -> Result<QueryResult, ServiceError> {
        let send = self
            .http
            .post(self.url(QUERY_PATH))
            .json(&QueryRequest::new(query.as_str()))
            .send();

        let response = tokio::select! {
            biased;
            _ = abort.cancelled() => return Err(ServiceError::Cancelled),
            response = send => response.map_err(network_error)?,
        };
        let status = response.status();
        debug!(request_id = %abort.id(), status = status.as_u16(), "transport: response headers received");

        let body = tokio::select! {
            biased;
            _ = abort.cancelled() => return Err(ServiceError::Cancelled),
            body = response.text() => body.map_err(network_error)?,
        };

        interpret_query_response(status, &body)
    }
}

/// Turns a raw query response into a result or a classified service error.
pub fn interpret_query_response(
    status: StatusCode,
    body: &str,
) -> Result<QueryResult, ServiceError> {
    let value = interpret_body(status, body)?;
    let response: QueryResponse = serde_json::from_value(value).map_err(|err| {
        debug!(error = %err, "transport: response shape mismatch");
        ServiceError::NonJson {
            status: status.as_u16(),
            excerpt: excerpt(body),
        }
    })?;
    Ok(response.into())
}

fn interpret_body(status: StatusCode, body: &str) -> Result<serde_json::Value, ServiceError> {
    if body.trim().is_empty() {
        if status.is_success() {
            return Err(ServiceError::EmptyBody {
                status: status.as_u16(),
            });
        }
        return Err(ServiceError::Http {
            status: status.as_u16(),
            detail: status_text(status),
        });
    }

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|_| ServiceError::NonJson {
            status: status.as_u16(),
            excerpt: excerpt(body),
        })?;

    if !status.is_success() {
        return Err(ServiceError::Http {
            status: status.as_u16(),
            detail: extract_error_detail(&value).unwrap_or_else(|| status_text(status)),
        });
    }

    Ok(value)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
}

/// Trimmed body, cut to a bounded number of characters.
pub fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    let mut chars = trimmed.char_indices();
    match chars.nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

fn network_error(err: reqwest::Error) -> ServiceError {
    let mut reason = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(inner) = source {
        reason = format!("{reason}: {inner}");
        source = std::error::Error::source(inner);
    }
    ServiceError::Network(reason)
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
