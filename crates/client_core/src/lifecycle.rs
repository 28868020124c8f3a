//! Aggregate query state and the presentation view derived from it.

use shared::domain::QueryResult;

use crate::error::ClassifiedError;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    /// `epoch` is unique per submission, so back-to-back pending periods
    /// stay distinguishable to observers that only see the latest value.
    Pending {
        epoch: u64,
    },
    Succeeded(QueryResult),
    Failed(ClassifiedError),
}

/// What presentation should draw for a given state. Exactly one per state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View<'a> {
    Welcome,
    Loading,
    Error { message: &'a str },
    Answer(&'a QueryResult),
}

impl LifecycleState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    pub fn pending_epoch(&self) -> Option<u64> {
        match self {
            Self::Pending { epoch } => Some(*epoch),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending { .. } => "pending",
            Self::Succeeded(_) => "succeeded",
            Self::Failed(_) => "failed",
        }
    }

    pub fn view(&self) -> View<'_> {
        match self {
            Self::Idle => View::Welcome,
            Self::Pending { .. } => View::Loading,
            Self::Failed(err) => View::Error {
                message: err.message(),
            },
            Self::Succeeded(result) => View::Answer(result),
        }
    }
}

#[cfg(test)]
#[path = "tests/lifecycle_tests.rs"]
mod tests;
