//! Query-facing projection of a running lifecycle run

use crate::{LifecycleStage, RunStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot served to status queries.
///
/// Always reflects the latest committed state of the run; queries never wait
/// on in-flight activity calls. Progress is clamped so it can only move
/// forward within a run, and reaches 1.0 exactly when the run completes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowStatus {
    pub stage: LifecycleStage,
    pub operation: String,
    pub status: RunStatus,
    pub current_step: String,
    /// Fraction of the run completed, in `[0.0, 1.0]`, non-decreasing
    pub progress: f64,
    pub started_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl WorkflowStatus {
    pub fn new(stage: LifecycleStage, operation: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            stage,
            operation: operation.into(),
            status: RunStatus::InProgress,
            current_step: "validation".into(),
            progress: 0.0,
            started_at: at,
            last_updated: at,
        }
    }

    /// Move to a new step, advancing progress monotonically.
    ///
    /// A progress value lower than the current one is ignored (the step
    /// label still updates), so replayed checkpoints can never move the
    /// indicator backwards.
    pub fn advance(&mut self, step: impl Into<String>, progress: f64, at: DateTime<Utc>) {
        self.current_step = step.into();
        if progress > self.progress {
            self.progress = progress.min(1.0);
        }
        self.last_updated = at;
    }

    pub fn mark(&mut self, status: RunStatus, at: DateTime<Utc>) {
        self.status = status;
        self.last_updated = at;
        if status == RunStatus::Completed {
            self.progress = 1.0;
            self.current_step = "completed".into();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_is_monotonic() {
        let mut status = WorkflowStatus::new(LifecycleStage::Onboarding, "START_ONBOARDING", Utc::now());
        status.advance("initialization", 0.2, Utc::now());
        assert_eq!(status.progress, 0.2);

        // Lower value is ignored, step still updates
        status.advance("employee_creation", 0.1, Utc::now());
        assert_eq!(status.progress, 0.2);
        assert_eq!(status.current_step, "employee_creation");

        status.advance("finalizing", 0.9, Utc::now());
        assert_eq!(status.progress, 0.9);
    }

    #[test]
    fn test_progress_capped_at_one() {
        let mut status = WorkflowStatus::new(LifecycleStage::Active, "LEAVE_REQUEST", Utc::now());
        status.advance("done", 1.5, Utc::now());
        assert_eq!(status.progress, 1.0);
    }

    #[test]
    fn test_completion_snaps_progress_to_one() {
        let mut status = WorkflowStatus::new(LifecycleStage::Active, "UPDATE_INFORMATION", Utc::now());
        status.advance("information_update", 0.5, Utc::now());
        status.mark(RunStatus::Completed, Utc::now());
        assert_eq!(status.progress, 1.0);
        assert_eq!(status.current_step, "completed");
    }
}
