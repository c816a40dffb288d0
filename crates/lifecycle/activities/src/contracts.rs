//! Typed request/response contracts for every activity
//!
//! Requests carry the tenant and subject explicitly so an implementation can
//! enforce scoping without reaching back into the run. Responses carry only
//! what the orchestration logic consumes.

use chrono::{DateTime, Utc};
use lifecycle_types::{
    ActorId, ArchiveKind, CandidateProfile, EmployeeId, InformationUpdate, LeaveRequestDetails,
    OffboardingKickoff, OnboardingKickoff, PositionSnapshot, RetentionKind, ReviewCycle,
    StepCompletion, TenantId, UpdateKind,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ── Pre-hire ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateCandidateRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub profile: CandidateProfile,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub candidate_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// ── Information updates ──────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateInformationRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub update: InformationUpdate,
}

/// Outcome of an information update.
///
/// `requires_approval` is always true for emergency-contact and banking
/// updates; the caller records it, it does not gate the write.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InformationUpdateOutcome {
    pub updated_fields: Vec<String>,
    pub requires_approval: bool,
}

impl InformationUpdateOutcome {
    /// Whether this kind of update always needs follow-up approval
    pub fn approval_required_for(kind: UpdateKind) -> bool {
        matches!(kind, UpdateKind::EmergencyContact | UpdateKind::Banking)
    }
}

// ── Onboarding ───────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitializeOnboardingRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub kickoff: OnboardingKickoff,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OnboardingPlan {
    pub plan_id: Uuid,
    /// Step identifiers in completion order
    pub steps: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompleteStepRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub step: StepCompletion,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalizeOnboardingRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub start_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateAccountRequest {
    pub employee_id: EmployeeId,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account_id: Uuid,
    pub email: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignEquipmentRequest {
    pub employee_id: EmployeeId,
    pub department: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SendWelcomeEmailRequest {
    pub employee_id: EmployeeId,
    pub email: String,
    pub first_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotifyManagerRequest {
    pub manager_id: EmployeeId,
    pub employee_id: EmployeeId,
    pub message: String,
}

// ── Performance reviews ──────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PerformanceReviewRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub cycle: ReviewCycle,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review_id: Uuid,
    pub recorded_at: DateTime<Utc>,
}

// ── Leave ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ValidateLeaveRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub details: LeaveRequestDetails,
}

/// Business validation of a leave request. An invalid request is a business
/// rejection, not an activity failure.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaveValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaveDecisionNotice {
    pub employee_id: EmployeeId,
    pub manager_id: EmployeeId,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

// ── Offboarding / terminated ─────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitializeOffboardingRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub kickoff: OffboardingKickoff,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OffboardingPlan {
    pub plan_id: Uuid,
    pub steps: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FinalizeTerminationRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub termination_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EndCurrentPositionRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub end_date: DateTime<Utc>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveRecordsRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub archive_type: ArchiveKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveReceipt {
    pub archive_id: Uuid,
    pub location: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataRetentionRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub retention_type: RetentionKind,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetentionOutcome {
    pub policy_applied: String,
}

// ── Position changes ─────────────────────────────────────────────────

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemporalValidationRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub effective_date: DateTime<Utc>,
}

/// Whether an effective date collides with existing position history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TemporalValidation {
    pub valid: bool,
    /// Human-readable descriptions of any overlapping records
    pub conflicts: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionContextRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
}

/// Everything risk assessment needs about the employee's current state
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_position: Option<PositionSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_salary: Option<f64>,
    /// Position changes recorded in the last six months
    pub recent_change_count: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePositionHistoryRequest {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub position: PositionSnapshot,
    pub effective_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub change_reason: String,
    /// Whether the effective date lies before processing time
    pub is_retroactive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<ActorId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionHistoryRecord {
    pub history_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    /// The record this write superseded; none for a first-ever assignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_position: Option<PositionSnapshot>,
}

// ── Events and notifications ─────────────────────────────────────────

/// A domain event handed to the event bus.
///
/// `event_type` is a dotted name (`employee.position.changed`,
/// `payroll.recalculation`, ...); the payload is whatever the producing
/// stage recorded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub tenant_id: TenantId,
    pub employee_id: EmployeeId,
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub payload: serde_json::Value,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NotificationBatch {
    pub tenant_id: TenantId,
    pub recipients: Vec<ActorId>,
    pub subject: String,
    pub body: String,
    /// History record the notification refers to, when one was written
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_id: Option<Uuid>,
    /// Wire name of the operation that produced the notification
    pub change_type: String,
    pub is_retroactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_required_update_kinds() {
        assert!(InformationUpdateOutcome::approval_required_for(
            UpdateKind::EmergencyContact
        ));
        assert!(InformationUpdateOutcome::approval_required_for(
            UpdateKind::Banking
        ));
        assert!(!InformationUpdateOutcome::approval_required_for(
            UpdateKind::Personal
        ));
        assert!(!InformationUpdateOutcome::approval_required_for(
            UpdateKind::CandidateInfo
        ));
    }

    #[test]
    fn test_event_envelope_round_trips() {
        let envelope = EventEnvelope {
            tenant_id: TenantId::generate(),
            employee_id: EmployeeId::generate(),
            event_type: "employee.position.changed".into(),
            occurred_at: Utc::now(),
            payload: serde_json::json!({ "new_title": "Staff Engineer" }),
        };
        let json = serde_json::to_string(&envelope).unwrap();
        let back: EventEnvelope = serde_json::from_str(&json).unwrap();
        assert_eq!(back.event_type, envelope.event_type);
        assert_eq!(back.payload["new_title"], "Staff Engineer");
    }
}
