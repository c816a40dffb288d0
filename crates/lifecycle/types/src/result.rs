//! The accumulating outcome of one orchestration run

use crate::{EmployeeId, LifecycleStage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The lifecycle state of a run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    #[default]
    InProgress,
    Completed,
    Failed,
    Cancelled,
    Paused,
}

impl RunStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Paused => "paused",
        };
        write!(f, "{}", s)
    }
}

/// Result of one lifecycle run, mutated incrementally by stage handlers.
///
/// `completed_steps` is append-only, reflects true execution order, and
/// never contains duplicates: recording an already-present label is a no-op,
/// which is what makes step re-execution idempotent on resume.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LifecycleResult {
    pub employee_id: EmployeeId,
    pub stage: LifecycleStage,
    pub operation: String,
    pub status: RunStatus,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub completed_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Operation-specific result payload
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<serde_json::Value>,
}

impl LifecycleResult {
    pub fn new(
        employee_id: EmployeeId,
        stage: LifecycleStage,
        operation: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            employee_id,
            stage,
            operation: operation.into(),
            status: RunStatus::InProgress,
            started_at,
            completed_at: None,
            completed_steps: Vec::new(),
            error: None,
            outcome: None,
        }
    }

    /// Whether a step label has already been recorded
    pub fn has_step(&self, label: &str) -> bool {
        self.completed_steps.iter().any(|s| s == label)
    }

    /// Append a step label. Returns `false` (and leaves the list untouched)
    /// if the label is already present.
    pub fn record_step(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if self.has_step(&label) {
            return false;
        }
        self.completed_steps.push(label);
        true
    }

    pub fn complete(&mut self, at: DateTime<Utc>) {
        self.status = RunStatus::Completed;
        self.completed_at = Some(at);
    }

    pub fn fail(&mut self, error: impl Into<String>, at: DateTime<Utc>) {
        self.status = RunStatus::Failed;
        self.error = Some(error.into());
        self.completed_at = Some(at);
    }

    pub fn cancel(&mut self, reason: impl Into<String>, at: DateTime<Utc>) {
        self.status = RunStatus::Cancelled;
        self.error = Some(reason.into());
        self.completed_at = Some(at);
    }

    /// Attach the operation-specific outcome payload
    pub fn set_outcome<T: Serialize>(&mut self, outcome: &T) {
        // Serialization of our own result types cannot fail
        self.outcome = serde_json::to_value(outcome).ok();
    }
}
