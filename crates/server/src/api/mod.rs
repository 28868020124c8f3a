use std::{sync::Arc, time::Instant};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::{
    error::{ErrorDetailBody, ValidationErrorBody, ValidationIssue},
    protocol::{HealthResponse, QueryRequest, QueryResponse, RetrievedChunk, StructuredRecord},
};
use tracing::{info, warn};

use crate::app_state::AppState;

pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Query service stub is running".to_string(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Comp-Check query stub is running".to_string(),
    })
}

pub(crate) async fn query(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> Response {
    let started = Instant::now();
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(%rejection, "query: rejected malformed body");
            return unprocessable(ValidationErrorBody {
                detail: vec![ValidationIssue {
                    loc: vec!["body".to_string()],
                    msg: rejection.body_text(),
                    kind: "json_invalid".to_string(),
                }],
            });
        }
    };

    if let Err(err) = request.validate() {
        warn!(error = %err, "query: validation failed");
        return unprocessable(ValidationErrorBody::for_query_field(&err));
    }

    let preview: String = request.query.chars().take(80).collect();
    info!(query = %preview, "query: received");

    if !state.response_delay.is_zero() {
        tokio::time::sleep(state.response_delay).await;
    }

    if let Some(trigger) = state.failure_trigger.as_deref() {
        if request.query.contains(trigger) {
            warn!(%trigger, "query: simulating pipeline failure");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorDetailBody::new(
                    "Internal server error: simulated pipeline failure",
                )),
            )
                .into_response();
        }
    }

    info!(
        chunks = state.fixture.retrieved_chunks.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "query: responding"
    );
    Json(state.fixture.clone()).into_response()
}

fn unprocessable(body: ValidationErrorBody) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

/// Canned answer for the TransContinental Corp walkthrough.
pub fn default_fixture() -> QueryResponse {
    QueryResponse {
        answer: "## TransContinental Corp\n\n\
            TransContinental Corp holds a **Vendor Agreement** (contract 1042) governed \
            by the *Information Security Policy*. The contract runs for 36 months from \
            2022-11-01 under Singapore jurisdiction.\n\n\
            - Compliance score: **73/100**\n\
            - Latest audit: **Pending**\n\n\
            The retrieved clauses require annual third-party security audits and \
            72-hour breach notification."
            .to_string(),
        retrieved_chunks: vec![
            RetrievedChunk {
                chunk_text: "The Vendor shall undergo an independent security audit at least once \
                    every twelve (12) months and share the resulting report with the Client."
                    .to_string(),
                similarity_score: 0.91,
                contract_id: 1042,
                contract_type: Some("Vendor Agreement".to_string()),
            },
            RetrievedChunk {
                chunk_text: "Any personal data breach must be reported to the Client within \
                    seventy-two (72) hours of discovery."
                    .to_string(),
                similarity_score: 0.78,
                contract_id: 1042,
                contract_type: None,
            },
        ],
        structured_records: vec![StructuredRecord {
            contract_id: 1042,
            vendor_name: "TransContinental Corp".to_string(),
            contract_type: "Vendor Agreement".to_string(),
            region: "APAC".to_string(),
            jurisdiction: "Singapore".to_string(),
            policy_name: "Information Security Policy".to_string(),
            compliance_score: 73,
            audit_status: "Pending".to_string(),
            duration_months: 36,
            contract_date: "2022-11-01".to_string(),
        }],
    }
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
