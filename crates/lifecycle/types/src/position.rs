//! Position model: snapshots, change requests, and change outcomes

use crate::{ActorId, EmployeeId, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Job levels ───────────────────────────────────────────────────────

/// Organizational job tiers, ordered from junior to most senior.
///
/// The derived ordering is load-bearing: risk scoring compares tiers, and
/// the top two tiers (VP and above) drive the CRITICAL classification.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobLevel {
    Individual,
    Senior,
    Manager,
    Director,
    SeniorDirector,
    Vp,
    Svp,
    CLevel,
}

impl JobLevel {
    /// Top two organizational tiers (VP and above)
    pub fn is_executive_tier(&self) -> bool {
        matches!(self, Self::Vp | Self::Svp | Self::CLevel)
    }

    /// The tier directly below the executive tiers
    pub fn is_director_tier(&self) -> bool {
        matches!(self, Self::Director | Self::SeniorDirector)
    }
}

/// Employment arrangement carried on a position snapshot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmploymentType {
    FullTime,
    PartTime,
    Contractor,
}

// ── Position snapshot ────────────────────────────────────────────────

/// A point-in-time description of a position.
///
/// Used both as the proposed state of a position change and as the recorded
/// state returned from position history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub title: String,
    pub department: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_level: Option<JobLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub employment_type: EmploymentType,
    /// Reporting line, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reports_to: Option<EmployeeId>,
    /// Salary band lower bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_salary: Option<f64>,
    /// Salary band upper bound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl PositionSnapshot {
    pub fn new(
        title: impl Into<String>,
        department: impl Into<String>,
        employment_type: EmploymentType,
    ) -> Self {
        Self {
            title: title.into(),
            department: department.into(),
            job_level: None,
            location: None,
            employment_type,
            reports_to: None,
            min_salary: None,
            max_salary: None,
            currency: None,
        }
    }

    pub fn with_job_level(mut self, level: JobLevel) -> Self {
        self.job_level = Some(level);
        self
    }

    pub fn with_salary_band(mut self, min: f64, max: f64, currency: impl Into<String>) -> Self {
        self.min_salary = Some(min);
        self.max_salary = Some(max);
        self.currency = Some(currency.into());
        self
    }

    pub fn with_reports_to(mut self, manager: EmployeeId) -> Self {
        self.reports_to = Some(manager);
        self
    }
}

// ── Position change request / result ─────────────────────────────────

/// Input to the position change orchestrator
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionChangeRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub new_position: PositionSnapshot,
    pub effective_date: DateTime<Utc>,
    pub change_reason: String,
    pub requested_by: ActorId,
}

/// Approval outcome attached to a position change
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    NotRequired,
    Approved,
    Rejected,
}

/// Final outcome of a position change orchestration.
///
/// A rejected approval chain yields `success = false` and no history record;
/// that is a business outcome, not an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionChangeResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_history_id: Option<Uuid>,
    pub effective_date: DateTime<Utc>,
    pub is_retroactive: bool,
    pub processed_at: DateTime<Utc>,
    pub approval_status: ApprovalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
