//! The per-run execution context
//!
//! One `Run` drives one lifecycle operation from dispatch to a terminal
//! status. All helpers enforce the run's invariants: suspension only between
//! steps, cancel dominating pause, steps recorded at most once, and the
//! status snapshot always committed before the next await.

use crate::control::{read_cancel_reason, ControlNotes};
use crate::{leave, onboarding, position, stages};
use lifecycle_activities::{call_with_retry, LifecycleActivities, RetryPolicy};
use lifecycle_types::{
    ActivityError, ApprovalDecisionSignal, Clock, ControlFlags, LifecycleError, LifecycleOperation,
    LifecycleRequest, LifecycleResult, OrchestrationResult, RunId, WorkflowStatus,
};
use std::future::Future;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, watch};

pub(crate) struct Run {
    pub run_id: RunId,
    pub activities: Arc<dyn LifecycleActivities>,
    pub clock: Arc<dyn Clock>,
    pub retry: RetryPolicy,
    pub request: LifecycleRequest,
    pub result: LifecycleResult,
    pub status_tx: watch::Sender<WorkflowStatus>,
    pub flags: watch::Receiver<ControlFlags>,
    pub decisions: mpsc::Receiver<ApprovalDecisionSignal>,
    pub notes: Arc<Mutex<ControlNotes>>,
}

impl Run {
    /// Drive the run to a terminal status. Never panics the task: every
    /// failure path folds into the returned result.
    pub async fn execute(mut self) -> LifecycleResult {
        tracing::info!(
            run_id = %self.run_id.short(),
            employee_id = %self.request.employee_id,
            stage = %self.request.stage,
            operation = %self.request.operation,
            "lifecycle run started"
        );

        if !self.request.is_stage_consistent() {
            let err = LifecycleError::UnsupportedOperation {
                stage: self.request.stage,
                operation: self.request.operation.name().to_string(),
            };
            tracing::warn!(run_id = %self.run_id.short(), error = %err, "dispatch rejected");
            self.result.fail(err.to_string(), self.clock.now());
            self.commit_terminal();
            return self.result;
        }

        let outcome = match self.wait_for_scheduled_start().await {
            Ok(()) => self.dispatch().await,
            Err(err) => Err(err),
        };

        let now = self.clock.now();
        match outcome {
            Ok(()) => {
                self.result.complete(now);
                tracing::info!(
                    run_id = %self.run_id.short(),
                    steps = self.result.completed_steps.len(),
                    "lifecycle run completed"
                );
            }
            Err(LifecycleError::Cancelled(reason)) => {
                self.result.cancel(reason.clone(), now);
                tracing::info!(
                    run_id = %self.run_id.short(),
                    reason = %reason,
                    "lifecycle run cancelled"
                );
            }
            Err(err) => {
                tracing::error!(run_id = %self.run_id.short(), error = %err, "lifecycle run failed");
                self.result.fail(err.to_string(), now);
            }
        }
        self.commit_terminal();
        self.result
    }

    async fn dispatch(&mut self) -> OrchestrationResult<()> {
        let operation = self.request.operation.clone();
        match operation {
            LifecycleOperation::CreateCandidate(profile) => {
                stages::create_candidate(self, profile).await
            }
            LifecycleOperation::UpdateCandidate(update) => {
                stages::update_candidate(self, update).await
            }
            LifecycleOperation::ApproveHire(proposal) => stages::approve_hire(self, proposal).await,
            LifecycleOperation::StartOnboarding(kickoff) => onboarding::run(self, kickoff).await,
            LifecycleOperation::CompleteOnboardingStep(step) => {
                stages::complete_onboarding_step(self, step).await
            }
            LifecycleOperation::FinalizeOnboarding(finalization) => {
                stages::finalize_onboarding(self, finalization).await
            }
            LifecycleOperation::PositionChange(proposal) => position::run(self, proposal).await,
            LifecycleOperation::UpdateInformation(update) => {
                stages::update_information(self, update).await
            }
            LifecycleOperation::PerformanceReview(cycle) => {
                stages::performance_review(self, cycle).await
            }
            LifecycleOperation::LeaveRequest(details) => leave::run(self, details).await,
            LifecycleOperation::StartOffboarding(kickoff) => {
                stages::start_offboarding(self, kickoff).await
            }
            LifecycleOperation::CompleteOffboardingStep(step) => {
                stages::complete_offboarding_step(self, step).await
            }
            LifecycleOperation::FinalizeTermination(finalization) => {
                stages::finalize_termination(self, finalization).await
            }
            LifecycleOperation::ArchiveRecords(directive) => {
                stages::archive_records(self, directive).await
            }
            LifecycleOperation::DataRetention(directive) => {
                stages::data_retention(self, directive).await
            }
        }
    }

    // ── Status ───────────────────────────────────────────────────────

    /// Commit a new current step and progress to the status snapshot
    pub fn checkpoint(&mut self, step: &str, progress: f64) {
        let now = self.clock.now();
        self.status_tx
            .send_modify(|s| s.advance(step, progress, now));
    }

    fn commit_terminal(&mut self) {
        let status = self.result.status;
        let now = self.clock.now();
        self.status_tx.send_modify(|s| s.mark(status, now));
    }

    // ── Suspension ───────────────────────────────────────────────────

    /// Suspension point between steps. Returns immediately unless a pause
    /// is in force; wakes on resume or cancel. Cancel wins over pause.
    pub async fn wait_if_paused(&mut self) -> OrchestrationResult<()> {
        loop {
            let flags = *self.flags.borrow_and_update();
            if flags.cancel_requested {
                return Err(LifecycleError::Cancelled(read_cancel_reason(&self.notes)));
            }
            if !flags.paused {
                return Ok(());
            }
            tracing::info!(run_id = %self.run_id.short(), "run paused, waiting for resume");
            if self.flags.changed().await.is_err() {
                // Listener gone; nothing can lift the pause, keep going
                return Ok(());
            }
        }
    }

    async fn wait_for_scheduled_start(&mut self) -> OrchestrationResult<()> {
        let Some(at) = self.request.scheduled_time else {
            return Ok(());
        };
        let now = self.clock.now();
        if at <= now {
            return Ok(());
        }
        let delay = (at - now).to_std().unwrap_or_default();
        tracing::info!(
            run_id = %self.run_id.short(),
            scheduled = %at,
            "run deferred until scheduled time"
        );

        let timer = tokio::time::sleep(delay);
        tokio::pin!(timer);
        loop {
            tokio::select! {
                _ = &mut timer => return Ok(()),
                changed = self.flags.changed() => {
                    if changed.is_ok() && self.flags.borrow().cancel_requested {
                        return Err(LifecycleError::Cancelled(read_cancel_reason(&self.notes)));
                    }
                    if changed.is_err() {
                        // No more signals can arrive; just wait out the timer
                        timer.as_mut().await;
                        return Ok(());
                    }
                    // A pause during deferral changes nothing; the timer governs
                }
            }
        }
    }

    // ── Activity calls ───────────────────────────────────────────────

    /// Required activity call: retried per policy, a final failure aborts
    /// the run.
    pub async fn activity<T, F, Fut>(&self, name: &'static str, make: F) -> OrchestrationResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ActivityError>>,
    {
        call_with_retry(&self.retry, name, make)
            .await
            .map_err(|e| LifecycleError::activity(name, e))
    }

    /// Best-effort activity call: retried per policy, a final failure is
    /// logged and swallowed.
    pub async fn best_effort<T, F, Fut>(&self, name: &'static str, make: F) -> Option<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ActivityError>>,
    {
        match call_with_retry(&self.retry, name, make).await {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(
                    run_id = %self.run_id.short(),
                    activity = name,
                    error = %err,
                    "best-effort step failed, continuing"
                );
                None
            }
        }
    }

    // ── Step bookkeeping ─────────────────────────────────────────────

    /// Whether a step still has to run (false once recorded)
    pub fn needs(&self, label: &str) -> bool {
        !self.result.has_step(label)
    }

    /// Record a completed step; a duplicate label is a no-op
    pub fn done(&mut self, label: &str) {
        if self.result.record_step(label) {
            tracing::debug!(run_id = %self.run_id.short(), step = label, "step completed");
        }
    }

    /// Fresh status snapshot for a new run
    pub fn initial_status(request: &LifecycleRequest, clock: &dyn Clock) -> WorkflowStatus {
        WorkflowStatus::new(request.stage, request.operation.name(), clock.now())
    }
}
