//! Operations: the tagged union of everything a lifecycle run can do
//!
//! One payload type per (stage, operation) pair. The dispatcher decodes the
//! payload exactly once, at entry; handlers receive the typed variant and
//! never inspect untyped maps.

use crate::{ActorId, EmployeeId, LifecycleStage, PositionSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Operation payloads ───────────────────────────────────────────────

/// Candidate data captured before hire
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// The hire put before the approval chain
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HireProposal {
    pub position_title: String,
    pub department: String,
    pub proposed_start_date: DateTime<Utc>,
}

/// Everything needed to kick off onboarding for a confirmed hire
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OnboardingKickoff {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub position_title: String,
    pub start_date: DateTime<Utc>,
    /// Manager to notify, when already assigned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<EmployeeId>,
}

/// Marks one step of an onboarding or offboarding plan as done
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepCompletion {
    pub step_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Closes out onboarding and seeds the first position history record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OnboardingFinalization {
    pub initial_position: PositionSnapshot,
    pub start_date: DateTime<Utc>,
}

/// Proposed position change (subject and requestor come from the request)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PositionChangeProposal {
    pub new_position: PositionSnapshot,
    pub effective_date: DateTime<Utc>,
    pub change_reason: String,
}

/// What kind of employee information an update touches.
///
/// Emergency-contact and banking updates always require approval downstream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateKind {
    Personal,
    Contact,
    EmergencyContact,
    Banking,
    CandidateInfo,
}

impl UpdateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Personal => "PERSONAL",
            Self::Contact => "CONTACT",
            Self::EmergencyContact => "EMERGENCY_CONTACT",
            Self::Banking => "BANKING",
            Self::CandidateInfo => "CANDIDATE_INFO",
        }
    }
}

/// Field-level update to employee (or candidate) information
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InformationUpdate {
    pub update_type: UpdateKind,
    /// Field name → new value; ordering is deterministic for hashing and logs
    pub fields: BTreeMap<String, String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewKind {
    Annual,
    Quarterly,
    Probation,
}

/// A performance review cycle to record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReviewCycle {
    pub review_type: ReviewKind,
    pub period_start: DateTime<Utc>,
    pub period_end: DateTime<Utc>,
    pub reviewer_id: ActorId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveKind {
    Annual,
    Sick,
    Parental,
    Unpaid,
}

/// A leave request routed through manager approval
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeaveRequestDetails {
    pub leave_type: LeaveKind,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub reason: String,
    /// The manager whose decision the run waits on
    pub manager_id: EmployeeId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TerminationKind {
    Voluntary,
    Involuntary,
    Retirement,
}

/// Starts the offboarding process
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OffboardingKickoff {
    pub termination_type: TerminationKind,
    pub termination_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Final termination close-out
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TerminationFinalization {
    pub termination_date: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArchiveKind {
    ColdStorage,
    SecureArchive,
    ComplianceArchive,
}

/// Post-termination record archival
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchivalDirective {
    pub archive_type: ArchiveKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RetentionKind {
    LegalHold,
    NormalRetention,
    Purge,
}

/// Post-termination data retention processing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetentionDirective {
    pub retention_type: RetentionKind,
}

// ── The operation union ──────────────────────────────────────────────

/// One operation of one lifecycle stage, with its typed payload.
///
/// Each variant is valid in exactly one stage (see [`Self::stage`]); the
/// dispatcher rejects requests whose stage does not own the operation.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "operation", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleOperation {
    // Pre-hire
    CreateCandidate(CandidateProfile),
    UpdateCandidate(InformationUpdate),
    ApproveHire(HireProposal),
    // Onboarding
    StartOnboarding(OnboardingKickoff),
    CompleteOnboardingStep(StepCompletion),
    FinalizeOnboarding(OnboardingFinalization),
    // Active
    PositionChange(PositionChangeProposal),
    UpdateInformation(InformationUpdate),
    PerformanceReview(ReviewCycle),
    LeaveRequest(LeaveRequestDetails),
    // Offboarding
    StartOffboarding(OffboardingKickoff),
    CompleteOffboardingStep(StepCompletion),
    FinalizeTermination(TerminationFinalization),
    // Terminated
    ArchiveRecords(ArchivalDirective),
    DataRetention(RetentionDirective),
}

impl LifecycleOperation {
    /// The single stage this operation is valid in
    pub fn stage(&self) -> LifecycleStage {
        match self {
            Self::CreateCandidate(_) | Self::UpdateCandidate(_) | Self::ApproveHire(_) => {
                LifecycleStage::PreHire
            }
            Self::StartOnboarding(_)
            | Self::CompleteOnboardingStep(_)
            | Self::FinalizeOnboarding(_) => LifecycleStage::Onboarding,
            Self::PositionChange(_)
            | Self::UpdateInformation(_)
            | Self::PerformanceReview(_)
            | Self::LeaveRequest(_) => LifecycleStage::Active,
            Self::StartOffboarding(_)
            | Self::CompleteOffboardingStep(_)
            | Self::FinalizeTermination(_) => LifecycleStage::Offboarding,
            Self::ArchiveRecords(_) | Self::DataRetention(_) => LifecycleStage::Terminated,
        }
    }

    /// Wire name of the operation
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateCandidate(_) => "CREATE_CANDIDATE",
            Self::UpdateCandidate(_) => "UPDATE_CANDIDATE",
            Self::ApproveHire(_) => "APPROVE_HIRE",
            Self::StartOnboarding(_) => "START_ONBOARDING",
            Self::CompleteOnboardingStep(_) => "COMPLETE_ONBOARDING_STEP",
            Self::FinalizeOnboarding(_) => "FINALIZE_ONBOARDING",
            Self::PositionChange(_) => "POSITION_CHANGE",
            Self::UpdateInformation(_) => "UPDATE_INFORMATION",
            Self::PerformanceReview(_) => "PERFORMANCE_REVIEW",
            Self::LeaveRequest(_) => "LEAVE_REQUEST",
            Self::StartOffboarding(_) => "START_OFFBOARDING",
            Self::CompleteOffboardingStep(_) => "COMPLETE_OFFBOARDING_STEP",
            Self::FinalizeTermination(_) => "FINALIZE_TERMINATION",
            Self::ArchiveRecords(_) => "ARCHIVE_RECORDS",
            Self::DataRetention(_) => "DATA_RETENTION",
        }
    }
}

impl std::fmt::Display for LifecycleOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
