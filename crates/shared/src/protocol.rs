use serde::{Deserialize, Serialize};

use crate::{
    domain::{AuditStatus, Chunk, ContractId, QueryResult, Record},
    error::QueryValidationError,
};

pub const QUERY_PATH: &str = "/api/v1/query";
pub const HEALTH_PATH: &str = "/api/v1/health";

pub const MIN_QUERY_CHARS: usize = 3;
pub const MAX_QUERY_CHARS: usize = 2000;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
}

impl QueryRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    /// Length bounds the backend enforces before running its pipeline.
    pub fn validate(&self) -> Result<(), QueryValidationError> {
        let chars = self.query.trim().chars().count();
        if chars < MIN_QUERY_CHARS {
            return Err(QueryValidationError::TooShort {
                min: MIN_QUERY_CHARS,
                actual: chars,
            });
        }
        if chars > MAX_QUERY_CHARS {
            return Err(QueryValidationError::TooLong {
                max: MAX_QUERY_CHARS,
                actual: chars,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedChunk {
    pub chunk_text: String,
    pub similarity_score: f64,
    pub contract_id: i64,
    #[serde(default)]
    pub contract_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StructuredRecord {
    pub contract_id: i64,
    pub vendor_name: String,
    pub contract_type: String,
    pub region: String,
    pub jurisdiction: String,
    pub policy_name: String,
    pub compliance_score: i64,
    pub audit_status: String,
    pub duration_months: i64,
    pub contract_date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryResponse {
    pub answer: String,
    pub retrieved_chunks: Vec<RetrievedChunk>,
    pub structured_records: Vec<StructuredRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

impl From<RetrievedChunk> for Chunk {
    fn from(value: RetrievedChunk) -> Self {
        Self {
            text: value.chunk_text,
            similarity_score: value.similarity_score,
            contract_id: ContractId(value.contract_id),
            contract_type: value.contract_type.filter(|t| !t.trim().is_empty()),
        }
    }
}

impl From<StructuredRecord> for Record {
    fn from(value: StructuredRecord) -> Self {
        Self {
            contract_id: ContractId(value.contract_id),
            vendor_name: value.vendor_name,
            contract_type: value.contract_type,
            region: value.region,
            jurisdiction: value.jurisdiction,
            policy_name: value.policy_name,
            compliance_score: value.compliance_score,
            audit_status: AuditStatus::from_wire(&value.audit_status),
            duration_months: value.duration_months,
            contract_date: value.contract_date,
        }
    }
}

impl From<QueryResponse> for QueryResult {
    fn from(value: QueryResponse) -> Self {
        Self {
            answer: value.answer,
            chunks: value.retrieved_chunks.into_iter().map(Chunk::from).collect(),
            records: value
                .structured_records
                .into_iter()
                .map(Record::from)
                .collect(),
        }
    }
}

#[cfg(test)]
#[path = "tests/protocol_tests.rs"]
mod tests;
