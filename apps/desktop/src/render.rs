//! Plain-text presentation of the lifecycle state.

use std::fmt::Write as _;

use client_core::{
    score::{compliance_band, similarity_band, similarity_percent},
    steps::{PipelineStage, PIPELINE_STAGES},
    LifecycleState, View,
};
use shared::{
    domain::{AuditStatus, Chunk, QueryResult, Record},
    protocol::HealthResponse,
};

pub const EXAMPLE_QUESTION: &str = "Show summary about contract with TransContinental Corp";

pub fn render_state(state: &LifecycleState) -> String {
    match state.view() {
        View::Welcome => render_welcome(),
        View::Loading => "Working on it... (:cancel to stop)".to_string(),
        View::Error { message } => format!("Error: {message}\nSubmit the question again to retry."),
        View::Answer(result) => render_result(result),
    }
}

pub fn render_welcome() -> String {
    format!(
        "Ask a question about your contracts and compliance records.\n\
         For example: {EXAMPLE_QUESTION}\n\
         Type :help for commands."
    )
}

pub fn render_stage(index: usize) -> String {
    let stage = PipelineStage::at(index);
    let position = index.min(PIPELINE_STAGES.len() - 1) + 1;
    format!("[{position}/{}] {}...", PIPELINE_STAGES.len(), stage.label())
}

pub fn render_result(result: &QueryResult) -> String {
    let mut out = String::new();
    let answer = result.answer.trim();
    if answer.is_empty() {
        out.push_str("(no answer text returned)\n");
    } else {
        let _ = writeln!(out, "{answer}");
    }

    if !result.chunks.is_empty() {
        let _ = writeln!(out, "\nEvidence ({})", result.chunks.len());
        for (index, chunk) in result.chunks.iter().enumerate() {
            out.push_str(&render_chunk(index + 1, chunk));
        }
    }

    if !result.records.is_empty() {
        let _ = writeln!(out, "\nContract records ({})", result.records.len());
        for record in &result.records {
            out.push_str(&render_record(record));
        }
    }

    out.trim_end().to_string()
}

pub fn render_chunk(position: usize, chunk: &Chunk) -> String {
    let band = similarity_band(chunk.similarity_score);
    let mut line = format!(
        "  #{position} [{}% match, {} relevance] contract {}",
        similarity_percent(chunk.similarity_score),
        band.label(),
        chunk.contract_id.0
    );
    if let Some(contract_type) = &chunk.contract_type {
        let _ = write!(line, " ({contract_type})");
    }
    let _ = writeln!(line);
    for text_line in chunk.text.trim().lines() {
        let _ = writeln!(line, "      {}", text_line.trim());
    }
    line
}

pub fn render_record(record: &Record) -> String {
    let band = compliance_band(record.compliance_score);
    let audit = match &record.audit_status {
        AuditStatus::Passed => "Passed".to_string(),
        AuditStatus::Failed => "FAILED".to_string(),
        other => other.label().to_string(),
    };
    format!(
        "  - {} [contract {}] {}, {} / {}\n      policy: {}\n      compliance: {}/100 ({}, {}), audit: {audit}\n      term: {} months from {}\n",
        record.vendor_name,
        record.contract_id.0,
        record.contract_type,
        record.region,
        record.jurisdiction,
        record.policy_name,
        record.compliance_score,
        band.label(),
        band.tone().label(),
        record.duration_months,
        record.contract_date,
    )
}

pub fn render_health(health: &HealthResponse) -> String {
    if health.is_ok() {
        format!("Query service is up: {}", health.message)
    } else {
        format!("Query service reported '{}': {}", health.status, health.message)
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
