//! The `LifecycleActivities` trait: where orchestration meets side effects

use crate::contracts::*;
use async_trait::async_trait;
use lifecycle_types::ActivityError;

/// Shorthand result for activity calls
pub type ActivityResult<T> = Result<T, ActivityError>;

/// All side effects a lifecycle run can request.
///
/// Implementations own idempotency: the engine may call any method more than
/// once for the same logical step after a resume. Methods returning `()` are
/// acknowledged writes; the engine decides per call site whether a failure
/// is fatal or merely logged (best-effort steps).
#[async_trait]
pub trait LifecycleActivities: Send + Sync {
    // ── Pre-hire ─────────────────────────────────────────────────────

    async fn create_candidate(&self, req: CreateCandidateRequest)
        -> ActivityResult<CandidateRecord>;

    /// Candidate-scoped variant of an information update
    async fn update_candidate(
        &self,
        req: UpdateInformationRequest,
    ) -> ActivityResult<InformationUpdateOutcome>;

    // ── Employee information ─────────────────────────────────────────

    async fn update_employee_information(
        &self,
        req: UpdateInformationRequest,
    ) -> ActivityResult<InformationUpdateOutcome>;

    // ── Onboarding ───────────────────────────────────────────────────

    async fn initialize_onboarding(
        &self,
        req: InitializeOnboardingRequest,
    ) -> ActivityResult<OnboardingPlan>;

    async fn complete_onboarding_step(&self, req: CompleteStepRequest) -> ActivityResult<()>;

    async fn finalize_onboarding(&self, req: FinalizeOnboardingRequest) -> ActivityResult<()>;

    async fn create_account(&self, req: CreateAccountRequest) -> ActivityResult<AccountRecord>;

    async fn assign_equipment(&self, req: AssignEquipmentRequest) -> ActivityResult<()>;

    async fn send_welcome_email(&self, req: SendWelcomeEmailRequest) -> ActivityResult<()>;

    async fn notify_manager(&self, req: NotifyManagerRequest) -> ActivityResult<()>;

    // ── Performance reviews ──────────────────────────────────────────

    async fn process_performance_review(
        &self,
        req: PerformanceReviewRequest,
    ) -> ActivityResult<ReviewRecord>;

    // ── Leave ────────────────────────────────────────────────────────

    async fn validate_leave_request(
        &self,
        req: ValidateLeaveRequest,
    ) -> ActivityResult<LeaveValidation>;

    async fn notify_manager_for_approval(&self, req: NotifyManagerRequest) -> ActivityResult<()>;

    async fn send_leave_decision_notification(
        &self,
        notice: LeaveDecisionNotice,
    ) -> ActivityResult<()>;

    // ── Offboarding / terminated ─────────────────────────────────────

    async fn initialize_offboarding(
        &self,
        req: InitializeOffboardingRequest,
    ) -> ActivityResult<OffboardingPlan>;

    async fn complete_offboarding_step(&self, req: CompleteStepRequest) -> ActivityResult<()>;

    async fn finalize_termination(&self, req: FinalizeTerminationRequest) -> ActivityResult<()>;

    /// Close the open-ended current position history record
    async fn end_current_position(&self, req: EndCurrentPositionRequest) -> ActivityResult<()>;

    async fn archive_records(&self, req: ArchiveRecordsRequest) -> ActivityResult<ArchiveReceipt>;

    async fn process_data_retention(
        &self,
        req: DataRetentionRequest,
    ) -> ActivityResult<RetentionOutcome>;

    // ── Position changes ─────────────────────────────────────────────

    async fn validate_temporal_consistency(
        &self,
        req: TemporalValidationRequest,
    ) -> ActivityResult<TemporalValidation>;

    async fn fetch_position_context(
        &self,
        req: PositionContextRequest,
    ) -> ActivityResult<PositionContext>;

    async fn create_position_history(
        &self,
        req: CreatePositionHistoryRequest,
    ) -> ActivityResult<PositionHistoryRecord>;

    // ── Events and notifications ─────────────────────────────────────

    async fn publish_event(&self, event: EventEnvelope) -> ActivityResult<()>;

    async fn send_notifications(&self, batch: NotificationBatch) -> ActivityResult<()>;
}
