//! Approval chain vocabulary
//!
//! A chain is an ordered list of steps. Each step names a role, an optional
//! concrete approver, a decision timeout, and whether the step is required.
//! The executor walks steps strictly in order; a rejection anywhere ends the
//! chain immediately.

use crate::{ActorId, Decision};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Organizational role expected to decide a step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApproverRole {
    DirectManager,
    HrManager,
    HrDirector,
    ChiefExecutive,
}

impl ApproverRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectManager => "direct-manager",
            Self::HrManager => "hr-manager",
            Self::HrDirector => "hr-director",
            Self::ChiefExecutive => "chief-executive",
        }
    }
}

impl std::fmt::Display for ApproverRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One step of an approval chain
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalStep {
    /// Stable identifier decisions are addressed to. Defaults to the role
    /// name; a run never awaits the same role twice, so role names are
    /// unambiguous within a run.
    pub step_id: String,
    pub role: ApproverRole,
    /// Concrete approver, when resolvable ahead of execution.
    /// Role-only steps (e.g. direct manager) are resolved at run time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver_id: Option<ActorId>,
    /// How long the executor waits for a decision on this step
    pub timeout: Duration,
    /// Required steps fail the chain on timeout; optional steps are skipped
    pub required: bool,
}

impl ApprovalStep {
    pub fn required(role: ApproverRole, timeout: Duration) -> Self {
        Self {
            step_id: role.as_str().to_string(),
            role,
            approver_id: None,
            timeout,
            required: true,
        }
    }

    /// Override the default step id, for steps addressed outside a chain
    pub fn with_step_id(mut self, step_id: impl Into<String>) -> Self {
        self.step_id = step_id.into();
        self
    }

    pub fn with_approver(mut self, approver: ActorId) -> Self {
        self.approver_id = Some(approver);
        self
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// What happened to one step during chain execution
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalAction {
    Approved,
    Rejected,
    SkippedTimeout,
}

impl From<Decision> for ApprovalAction {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approved => Self::Approved,
            Decision::Rejected => Self::Rejected,
        }
    }
}

/// Audit record of one decided (or skipped) step
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalEvent {
    pub step_id: String,
    pub role: ApproverRole,
    pub action: ApprovalAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approver: Option<ActorId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
