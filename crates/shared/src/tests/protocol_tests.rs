use super::*;
use crate::domain::Query;

fn sample_response_json() -> serde_json::Value {
    serde_json::json!({
        "answer": "**TransContinental Corp** holds a Vendor Agreement.",
        "retrieved_chunks": [
            {
                "chunk_text": "Vendor shall comply with GDPR data handling.",
                "similarity_score": 0.91,
                "contract_id": 42,
                "contract_type": null
            }
        ],
        "structured_records": [
            {
                "contract_id": 42,
                "vendor_name": "TransContinental Corp",
                "contract_type": "Vendor Agreement",
                "region": "EU",
                "jurisdiction": "Germany",
                "policy_name": "Data Protection Policy",
                "compliance_score": 73,
                "audit_status": "pending",
                "duration_months": 24,
                "contract_date": "2023-05-14"
            }
        ]
    })
}

#[test]
fn query_response_converts_into_domain_result() {
    let response: QueryResponse =
        serde_json::from_value(sample_response_json()).expect("response");
    let result = QueryResult::from(response);

    assert_eq!(result.chunks.len(), 1);
    assert_eq!(result.chunks[0].contract_id, ContractId(42));
    assert_eq!(result.chunks[0].contract_type, None);
    assert_eq!(result.records.len(), 1);
    assert_eq!(result.records[0].compliance_score, 73);
    assert_eq!(
        result.records[0].audit_status,
        AuditStatus::Other("pending".to_string())
    );
}

#[test]
fn missing_chunk_contract_type_defaults_to_none() {
    let chunk: RetrievedChunk = serde_json::from_value(serde_json::json!({
        "chunk_text": "text",
        "similarity_score": 0.5,
        "contract_id": 1
    }))
    .expect("chunk");
    assert_eq!(chunk.contract_type, None);
}

#[test]
fn blank_chunk_contract_type_is_dropped() {
    let chunk = Chunk::from(RetrievedChunk {
        chunk_text: "text".to_string(),
        similarity_score: 0.5,
        contract_id: 1,
        contract_type: Some("  ".to_string()),
    });
    assert_eq!(chunk.contract_type, None);
}

#[test]
fn audit_status_parsing_is_case_insensitive() {
    assert_eq!(AuditStatus::from_wire("PASSED"), AuditStatus::Passed);
    assert_eq!(AuditStatus::from_wire(" failed "), AuditStatus::Failed);
    assert_eq!(AuditStatus::from_wire("Pending").label(), "Pending");
    assert_eq!(AuditStatus::from_wire("").label(), "Pending");
}

#[test]
fn query_request_enforces_backend_length_bounds() {
    assert!(QueryRequest::new("ok?").validate().is_ok());
    assert_eq!(
        QueryRequest::new("  hi  ").validate(),
        Err(QueryValidationError::TooShort { min: 3, actual: 2 })
    );
    let long = "x".repeat(MAX_QUERY_CHARS + 1);
    assert!(matches!(
        QueryRequest::new(long).validate(),
        Err(QueryValidationError::TooLong { .. })
    ));
}

#[test]
fn query_parse_trims_and_rejects_blank_input() {
    assert_eq!(Query::parse("   \t\n"), None);
    let query = Query::parse("  Show summary  ").expect("query");
    assert_eq!(query.as_str(), "Show summary");
    assert_eq!(
        serde_json::to_value(QueryRequest::new(query.as_str())).expect("json"),
        serde_json::json!({ "query": "Show summary" })
    );
}

#[test]
fn health_response_status_check_ignores_case() {
    let health = HealthResponse {
        status: "OK".to_string(),
        message: "running".to_string(),
    };
    assert!(health.is_ok());
}
