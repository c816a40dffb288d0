//! Error taxonomy for lifecycle orchestration

use crate::LifecycleStage;
use thiserror::Error;

/// Failure of a single activity call.
///
/// The transient/permanent split drives retry: the engine retries transient
/// failures under its retry policy and gives up immediately on permanent
/// ones.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActivityError {
    /// Recoverable failure (timeouts, unavailable dependencies)
    #[error("transient: {0}")]
    Transient(String),

    /// Non-recoverable failure (invalid input, missing entity, rule violation)
    #[error("permanent: {0}")]
    Permanent(String),
}

impl ActivityError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

/// Top-level failure of a lifecycle run
#[derive(Error, Debug)]
pub enum LifecycleError {
    /// The operation is not part of the requested stage
    #[error("operation {operation} is not valid in stage {stage}")]
    UnsupportedOperation {
        stage: LifecycleStage,
        operation: String,
    },

    /// The request failed a business validation gate
    #[error("validation failed: {0}")]
    Validation(String),

    /// A required activity failed after retries were exhausted
    #[error("activity {name} failed: {source}")]
    Activity {
        name: &'static str,
        #[source]
        source: ActivityError,
    },

    /// A sub-orchestration failed
    #[error("sub-process failed: {0}")]
    SubProcess(String),

    /// The run was cancelled by an operator
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// A required approval step timed out without a decision
    #[error("approval step {step_id} ({role}) timed out")]
    ApprovalTimeout { step_id: String, role: String },
}

impl LifecycleError {
    pub fn activity(name: &'static str, source: ActivityError) -> Self {
        Self::Activity { name, source }
    }
}

/// Shorthand result for orchestration code paths
pub type OrchestrationResult<T> = Result<T, LifecycleError>;
