//! Scriptable in-memory activity implementation for engine tests

// Not every test binary uses every scripting hook
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use lifecycle_activities::*;
use lifecycle_types::ActivityError;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

/// Records every call, and can be scripted to fail, block, or return
/// specific validation/context payloads.
#[derive(Default)]
pub struct ScriptedActivities {
    calls: Mutex<Vec<String>>,
    fail_once: Mutex<HashMap<String, VecDeque<ActivityError>>>,
    fail_always: Mutex<HashSet<String>>,
    holds: Mutex<HashMap<String, Arc<Notify>>>,
    temporal: Mutex<Option<TemporalValidation>>,
    context: Mutex<Option<PositionContext>>,
    leave: Mutex<Option<LeaveValidation>>,
}

impl ScriptedActivities {
    pub fn new() -> Arc<Self> {
        // Engine logs show up under --nocapture when RUST_LOG is set
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
        Arc::new(Self::default())
    }

    // ── Scripting ────────────────────────────────────────────────────

    pub fn fail_next(&self, name: &str, err: ActivityError) {
        self.fail_once
            .lock()
            .unwrap()
            .entry(name.to_string())
            .or_default()
            .push_back(err);
    }

    pub fn fail_always(&self, name: &str) {
        self.fail_always.lock().unwrap().insert(name.to_string());
    }

    pub fn clear_failures(&self) {
        self.fail_once.lock().unwrap().clear();
        self.fail_always.lock().unwrap().clear();
    }

    /// Block the named activity until [`Self::release`] is called
    pub fn hold(&self, name: &str) {
        self.holds
            .lock()
            .unwrap()
            .insert(name.to_string(), Arc::new(Notify::new()));
    }

    pub fn release(&self, name: &str) {
        if let Some(notify) = self.holds.lock().unwrap().remove(name) {
            notify.notify_one();
        }
    }

    pub fn set_temporal(&self, validation: TemporalValidation) {
        *self.temporal.lock().unwrap() = Some(validation);
    }

    pub fn set_context(&self, context: PositionContext) {
        *self.context.lock().unwrap() = Some(context);
    }

    pub fn set_leave_validation(&self, validation: LeaveValidation) {
        *self.leave.lock().unwrap() = Some(validation);
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == name).count()
    }

    pub fn was_called(&self, name: &str) -> bool {
        self.call_count(name) > 0
    }

    /// Wait (under virtual time) until an activity has been invoked
    pub async fn wait_for_call(&self, name: &str) {
        while !self.was_called(name) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    // ── Gate ─────────────────────────────────────────────────────────

    async fn gate(&self, name: &str) -> Result<(), ActivityError> {
        self.calls.lock().unwrap().push(name.to_string());

        let hold = self.holds.lock().unwrap().get(name).cloned();
        if let Some(notify) = hold {
            notify.notified().await;
        }

        if self.fail_always.lock().unwrap().contains(name) {
            return Err(ActivityError::Permanent(format!("{name} scripted to fail")));
        }
        if let Some(err) = self
            .fail_once
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(|q| q.pop_front())
        {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl LifecycleActivities for ScriptedActivities {
    async fn create_candidate(
        &self,
        _req: CreateCandidateRequest,
    ) -> ActivityResult<CandidateRecord> {
        self.gate("create_candidate").await?;
        Ok(CandidateRecord {
            candidate_id: Uuid::new_v4(),
            created_at: Utc::now(),
        })
    }

    async fn update_candidate(
        &self,
        req: UpdateInformationRequest,
    ) -> ActivityResult<InformationUpdateOutcome> {
        self.gate("update_candidate").await?;
        Ok(InformationUpdateOutcome {
            updated_fields: req.update.fields.keys().cloned().collect(),
            requires_approval: InformationUpdateOutcome::approval_required_for(
                req.update.update_type,
            ),
        })
    }

    async fn update_employee_information(
        &self,
        req: UpdateInformationRequest,
    ) -> ActivityResult<InformationUpdateOutcome> {
        self.gate("update_employee_information").await?;
        Ok(InformationUpdateOutcome {
            updated_fields: req.update.fields.keys().cloned().collect(),
            requires_approval: InformationUpdateOutcome::approval_required_for(
                req.update.update_type,
            ),
        })
    }

    async fn initialize_onboarding(
        &self,
        _req: InitializeOnboardingRequest,
    ) -> ActivityResult<OnboardingPlan> {
        self.gate("initialize_onboarding").await?;
        Ok(OnboardingPlan {
            plan_id: Uuid::new_v4(),
            steps: vec!["paperwork".into(), "laptop".into(), "orientation".into()],
        })
    }

    async fn complete_onboarding_step(&self, _req: CompleteStepRequest) -> ActivityResult<()> {
        self.gate("complete_onboarding_step").await
    }

    async fn finalize_onboarding(&self, _req: FinalizeOnboardingRequest) -> ActivityResult<()> {
        self.gate("finalize_onboarding").await
    }

    async fn create_account(&self, req: CreateAccountRequest) -> ActivityResult<AccountRecord> {
        self.gate("create_account").await?;
        Ok(AccountRecord {
            account_id: Uuid::new_v4(),
            email: req.email,
        })
    }

    async fn assign_equipment(&self, _req: AssignEquipmentRequest) -> ActivityResult<()> {
        self.gate("assign_equipment").await
    }

    async fn send_welcome_email(&self, _req: SendWelcomeEmailRequest) -> ActivityResult<()> {
        self.gate("send_welcome_email").await
    }

    async fn notify_manager(&self, _req: NotifyManagerRequest) -> ActivityResult<()> {
        self.gate("notify_manager").await
    }

    async fn process_performance_review(
        &self,
        _req: PerformanceReviewRequest,
    ) -> ActivityResult<ReviewRecord> {
        self.gate("process_performance_review").await?;
        Ok(ReviewRecord {
            review_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
        })
    }

    async fn validate_leave_request(
        &self,
        _req: ValidateLeaveRequest,
    ) -> ActivityResult<LeaveValidation> {
        self.gate("validate_leave_request").await?;
        Ok(self.leave.lock().unwrap().clone().unwrap_or(LeaveValidation {
            valid: true,
            rejection_reason: None,
        }))
    }

    async fn notify_manager_for_approval(&self, _req: NotifyManagerRequest) -> ActivityResult<()> {
        self.gate("notify_manager_for_approval").await
    }

    async fn send_leave_decision_notification(
        &self,
        _notice: LeaveDecisionNotice,
    ) -> ActivityResult<()> {
        self.gate("send_leave_decision_notification").await
    }

    async fn initialize_offboarding(
        &self,
        _req: InitializeOffboardingRequest,
    ) -> ActivityResult<OffboardingPlan> {
        self.gate("initialize_offboarding").await?;
        Ok(OffboardingPlan {
            plan_id: Uuid::new_v4(),
            steps: vec!["handover".into(), "equipment_return".into()],
        })
    }

    async fn complete_offboarding_step(&self, _req: CompleteStepRequest) -> ActivityResult<()> {
        self.gate("complete_offboarding_step").await
    }

    async fn finalize_termination(&self, _req: FinalizeTerminationRequest) -> ActivityResult<()> {
        self.gate("finalize_termination").await
    }

    async fn end_current_position(&self, _req: EndCurrentPositionRequest) -> ActivityResult<()> {
        self.gate("end_current_position").await
    }

    async fn archive_records(
        &self,
        _req: ArchiveRecordsRequest,
    ) -> ActivityResult<ArchiveReceipt> {
        self.gate("archive_records").await?;
        Ok(ArchiveReceipt {
            archive_id: Uuid::new_v4(),
            location: "cold://hr-records".into(),
        })
    }

    async fn process_data_retention(
        &self,
        req: DataRetentionRequest,
    ) -> ActivityResult<RetentionOutcome> {
        self.gate("process_data_retention").await?;
        Ok(RetentionOutcome {
            policy_applied: format!("{:?}", req.retention_type),
        })
    }

    async fn validate_temporal_consistency(
        &self,
        _req: TemporalValidationRequest,
    ) -> ActivityResult<TemporalValidation> {
        self.gate("validate_temporal_consistency").await?;
        Ok(self
            .temporal
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(TemporalValidation {
                valid: true,
                conflicts: Vec::new(),
            }))
    }

    async fn fetch_position_context(
        &self,
        _req: PositionContextRequest,
    ) -> ActivityResult<PositionContext> {
        self.gate("fetch_position_context").await?;
        Ok(self
            .context
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(PositionContext {
                current_position: None,
                current_salary: None,
                recent_change_count: 0,
            }))
    }

    async fn create_position_history(
        &self,
        _req: CreatePositionHistoryRequest,
    ) -> ActivityResult<PositionHistoryRecord> {
        self.gate("create_position_history").await?;
        Ok(PositionHistoryRecord {
            history_id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            previous_position: self
                .context
                .lock()
                .unwrap()
                .as_ref()
                .and_then(|c| c.current_position.clone()),
        })
    }

    async fn publish_event(&self, event: EventEnvelope) -> ActivityResult<()> {
        // Record the typed variant too so tests can assert on event kinds
        self.calls
            .lock()
            .unwrap()
            .push(format!("publish_event:{}", event.event_type));
        self.gate("publish_event").await
    }

    async fn send_notifications(&self, _batch: NotificationBatch) -> ActivityResult<()> {
        self.gate("send_notifications").await
    }
}
