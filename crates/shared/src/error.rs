use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryValidationError {
    #[error("query must be at least {min} characters (got {actual})")]
    TooShort { min: usize, actual: usize },
    #[error("query must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// One entry of a validation-failure `detail` array, e.g.
/// `{"loc": ["body", "query"], "msg": "...", "type": "string_too_short"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub loc: Vec<String>,
    pub msg: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationErrorBody {
    pub detail: Vec<ValidationIssue>,
}

impl ValidationErrorBody {
    pub fn for_query_field(err: &QueryValidationError) -> Self {
        let kind = match err {
            QueryValidationError::TooShort { .. } => "string_too_short",
            QueryValidationError::TooLong { .. } => "string_too_long",
        };
        Self {
            detail: vec![ValidationIssue {
                loc: vec!["body".to_string(), "query".to_string()],
                msg: err.to_string(),
                kind: kind.to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorDetailBody {
    pub detail: String,
}

impl ErrorDetailBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Pulls a human-readable error description out of a JSON error body.
///
/// Looks at `detail` first (a string, or a validation array whose first
/// `msg` is used), then `message`. Returns `None` when neither yields text.
pub fn extract_error_detail(body: &Value) -> Option<String> {
    let non_empty = |text: &str| {
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    };

    match body.get("detail") {
        Some(Value::String(text)) => {
            if let Some(detail) = non_empty(text.as_str()) {
                return Some(detail);
            }
        }
        Some(Value::Array(items)) => {
            let first_msg = items
                .iter()
                .find_map(|item| item.get("msg").and_then(Value::as_str))
                .and_then(non_empty);
            if first_msg.is_some() {
                return first_msg;
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => return Some(other.to_string()),
    }

    body.get("message")
        .and_then(Value::as_str)
        .and_then(non_empty)
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
