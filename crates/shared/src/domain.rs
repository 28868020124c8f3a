use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);
    };
}

id_newtype!(ContractId);

/// A user question, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditStatus {
    Passed,
    Failed,
    /// `Pending` or any status the backend reports that we do not recognise.
    Other(String),
}

impl AuditStatus {
    pub fn from_wire(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Other(raw) if raw.is_empty() => "Pending",
            Self::Other(raw) => raw,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub text: String,
    pub similarity_score: f64,
    pub contract_id: ContractId,
    pub contract_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub contract_id: ContractId,
    pub vendor_name: String,
    pub contract_type: String,
    pub region: String,
    pub jurisdiction: String,
    pub policy_name: String,
    pub compliance_score: i64,
    pub audit_status: AuditStatus,
    pub duration_months: i64,
    pub contract_date: String,
}

/// Everything the backend returned for one successful query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QueryResult {
    pub answer: String,
    pub chunks: Vec<Chunk>,
    pub records: Vec<Record>,
}
