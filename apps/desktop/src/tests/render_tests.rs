use super::*;
use client_core::{error::ServiceError, ClassifiedError};
use shared::domain::ContractId;

fn scenario_result() -> QueryResult {
    QueryResult {
        answer: "## Summary\nTransContinental Corp is mid-term.\n".to_string(),
        chunks: vec![Chunk {
            text: "Vendor shall notify breaches within 72 hours.".to_string(),
            similarity_score: 0.91,
            contract_id: ContractId(1042),
            contract_type: None,
        }],
        records: vec![Record {
            contract_id: ContractId(1042),
            vendor_name: "TransContinental Corp".to_string(),
            contract_type: "Vendor Agreement".to_string(),
            region: "APAC".to_string(),
            jurisdiction: "Singapore".to_string(),
            policy_name: "Information Security Policy".to_string(),
            compliance_score: 73,
            audit_status: AuditStatus::Other("Pending".to_string()),
            duration_months: 36,
            contract_date: "2022-11-01".to_string(),
        }],
    }
}

#[test]
fn idle_renders_welcome_with_example() {
    let text = render_state(&LifecycleState::Idle);
    assert!(text.contains(EXAMPLE_QUESTION));
}

#[test]
fn success_renders_answer_evidence_and_records() {
    let text = render_state(&LifecycleState::Succeeded(scenario_result()));
    assert!(text.starts_with("## Summary"));
    assert!(text.contains("[91% match, High relevance] contract 1042"));
    assert!(text.contains("compliance: 73/100 (Medium, amber), audit: Pending"));
    assert!(text.contains("term: 36 months from 2022-11-01"));
}

#[test]
fn failure_renders_only_the_error() {
    let err = ClassifiedError::from(ServiceError::EmptyBody { status: 200 });
    let text = render_state(&LifecycleState::Failed(err.clone()));
    assert!(text.starts_with("Error: "));
    assert!(text.contains(err.message()));
    assert!(!text.contains("Evidence"));
}

#[test]
fn empty_result_still_renders_placeholder() {
    let text = render_result(&QueryResult::default());
    assert_eq!(text, "(no answer text returned)");
}

#[test]
fn failed_audit_is_emphasised() {
    let mut record = scenario_result().records.remove(0);
    record.audit_status = AuditStatus::Failed;
    record.compliance_score = 41;
    let text = render_record(&record);
    assert!(text.contains("audit: FAILED"));
    assert!(text.contains("(Low, red)"));
}

#[test]
fn stage_line_is_one_based_and_saturates() {
    assert_eq!(
        render_stage(0),
        "[1/5] Extracting filters from your question..."
    );
    assert_eq!(render_stage(9), "[5/5] Generating answer...");
}

#[test]
fn health_rendering_reflects_status() {
    let ok = HealthResponse {
        status: "ok".to_string(),
        message: "running".to_string(),
    };
    assert_eq!(render_health(&ok), "Query service is up: running");
    let degraded = HealthResponse {
        status: "degraded".to_string(),
        message: "milvus down".to_string(),
    };
    assert!(render_health(&degraded).contains("'degraded'"));
}
