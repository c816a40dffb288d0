//! Signal/query control surface
//!
//! Each run gets a dedicated signal listener task. The listener is the only
//! writer of the control flags; the run logic and status queries only read
//! them. Approval decisions are forwarded to the run's decision inbox
//! without interpretation.

use lifecycle_types::{
    ActorId, ApprovalDecisionSignal, Clock, ControlFlags, ControlSignal, LifecycleError,
    LifecycleResult, OrchestrationResult, PauseSignal, ResumeSignal, RunId, RunStatus,
    WorkflowStatus,
};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// A signal could not be delivered, usually because the run already finished
#[derive(Error, Debug)]
#[error("run {run_id} is not accepting signals")]
pub struct SignalRejected {
    pub run_id: RunId,
}

/// Reasons attached to the most recent pause/cancel, written by the
/// listener and read by the run when it acts on a flag
#[derive(Debug, Default)]
pub(crate) struct ControlNotes {
    pub pause_reason: Option<String>,
    pub cancel_reason: Option<String>,
}

impl ControlNotes {
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }
}

pub(crate) fn read_cancel_reason(notes: &Arc<Mutex<ControlNotes>>) -> String {
    notes
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .cancel_reason
        .clone()
        .unwrap_or_else(|| "cancelled".to_string())
}

/// Spawn the signal listener for one run.
///
/// Exits when every signal sender is dropped. Rules enforced here:
/// cancellation is sticky and dominates pause; a pause arriving after a
/// cancel is ignored; resume only clears the pause flag.
pub(crate) fn spawn_listener(
    run_id: RunId,
    mut signals: mpsc::Receiver<ControlSignal>,
    flags_tx: watch::Sender<ControlFlags>,
    decisions_tx: mpsc::Sender<ApprovalDecisionSignal>,
    notes: Arc<Mutex<ControlNotes>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(signal) = signals.recv().await {
            match signal {
                ControlSignal::Pause(PauseSignal {
                    reason,
                    requested_by,
                    ..
                }) => {
                    if flags_tx.borrow().cancel_requested {
                        tracing::warn!(
                            run_id = %run_id.short(),
                            "ignoring pause, cancellation already requested"
                        );
                        continue;
                    }
                    tracing::info!(
                        run_id = %run_id.short(),
                        actor = %requested_by,
                        reason = %reason,
                        "pause requested"
                    );
                    notes.lock().unwrap_or_else(|e| e.into_inner()).pause_reason = Some(reason);
                    flags_tx.send_modify(|f| f.paused = true);
                }
                ControlSignal::Resume(ResumeSignal { requested_by, .. }) => {
                    tracing::info!(
                        run_id = %run_id.short(),
                        actor = %requested_by,
                        "resume requested"
                    );
                    flags_tx.send_modify(|f| f.paused = false);
                }
                ControlSignal::Cancel(cancel) => {
                    tracing::info!(
                        run_id = %run_id.short(),
                        actor = %cancel.requested_by,
                        reason = %cancel.reason,
                        "cancellation requested"
                    );
                    notes.lock().unwrap_or_else(|e| e.into_inner()).cancel_reason =
                        Some(cancel.reason);
                    flags_tx.send_modify(|f| f.cancel_requested = true);
                }
                ControlSignal::ApprovalDecision(decision) => {
                    if decisions_tx.try_send(decision).is_err() {
                        tracing::warn!(
                            run_id = %run_id.short(),
                            "decision inbox unavailable, dropping approval decision"
                        );
                    }
                }
            }
        }
    })
}

/// The caller's grip on a launched run
pub struct RunHandle {
    run_id: RunId,
    clock: Arc<dyn Clock>,
    signals: mpsc::Sender<ControlSignal>,
    status_rx: watch::Receiver<WorkflowStatus>,
    flags_rx: watch::Receiver<ControlFlags>,
    run_task: JoinHandle<LifecycleResult>,
    listener_task: JoinHandle<()>,
}

impl RunHandle {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        run_id: RunId,
        clock: Arc<dyn Clock>,
        signals: mpsc::Sender<ControlSignal>,
        status_rx: watch::Receiver<WorkflowStatus>,
        flags_rx: watch::Receiver<ControlFlags>,
        run_task: JoinHandle<LifecycleResult>,
        listener_task: JoinHandle<()>,
    ) -> Self {
        Self {
            run_id,
            clock,
            signals,
            status_rx,
            flags_rx,
            run_task,
            listener_task,
        }
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    // ── Signals ──────────────────────────────────────────────────────

    pub async fn pause(
        &self,
        reason: impl Into<String>,
        actor: ActorId,
    ) -> Result<(), SignalRejected> {
        self.send(ControlSignal::Pause(PauseSignal {
            reason: reason.into(),
            requested_by: actor,
            requested_at: self.clock.now(),
        }))
        .await
    }

    pub async fn resume(&self, actor: ActorId) -> Result<(), SignalRejected> {
        self.send(ControlSignal::Resume(ResumeSignal {
            requested_by: actor,
            requested_at: self.clock.now(),
        }))
        .await
    }

    pub async fn cancel(
        &self,
        reason: impl Into<String>,
        actor: ActorId,
    ) -> Result<(), SignalRejected> {
        self.send(ControlSignal::Cancel(lifecycle_types::CancelSignal {
            reason: reason.into(),
            requested_by: actor,
            requested_at: self.clock.now(),
        }))
        .await
    }

    /// Deliver an approval decision to whatever step is currently awaited
    pub async fn decide(&self, decision: ApprovalDecisionSignal) -> Result<(), SignalRejected> {
        self.send(ControlSignal::ApprovalDecision(decision)).await
    }

    async fn send(&self, signal: ControlSignal) -> Result<(), SignalRejected> {
        self.signals.send(signal).await.map_err(|_| SignalRejected {
            run_id: self.run_id,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Latest committed status snapshot, overlaid with the control flags.
    ///
    /// A non-terminal run with the pause flag set reports `Paused`; a
    /// pending cancellation reports the run as still in progress until it
    /// actually terminates. Never waits on the run.
    pub fn status(&self) -> WorkflowStatus {
        let mut snapshot = self.status_rx.borrow().clone();
        let flags = *self.flags_rx.borrow();
        if !snapshot.status.is_terminal() && flags.should_hold() {
            snapshot.status = RunStatus::Paused;
        }
        snapshot
    }

    pub fn is_finished(&self) -> bool {
        self.run_task.is_finished()
    }

    /// Wait for the run to finish and take its result
    pub async fn join(self) -> OrchestrationResult<LifecycleResult> {
        let result = self
            .run_task
            .await
            .map_err(|e| LifecycleError::SubProcess(format!("run task failed: {e}")))?;
        // The listener drains on its own once the handle's sender drops
        self.listener_task.abort();
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lifecycle_types::Decision;

    fn wiring() -> (
        mpsc::Sender<ControlSignal>,
        watch::Receiver<ControlFlags>,
        mpsc::Receiver<ApprovalDecisionSignal>,
        Arc<Mutex<ControlNotes>>,
        JoinHandle<()>,
    ) {
        let (signal_tx, signal_rx) = mpsc::channel(16);
        let (flags_tx, flags_rx) = watch::channel(ControlFlags::default());
        let (decision_tx, decision_rx) = mpsc::channel(16);
        let notes = ControlNotes::shared();
        let listener = spawn_listener(
            RunId::generate(),
            signal_rx,
            flags_tx,
            decision_tx,
            notes.clone(),
        );
        (signal_tx, flags_rx, decision_rx, notes, listener)
    }

    #[tokio::test]
    async fn test_pause_and_resume_flip_the_flag() {
        let (tx, mut flags, _decisions, notes, _listener) = wiring();

        tx.send(ControlSignal::Pause(PauseSignal {
            reason: "audit".into(),
            requested_by: ActorId::generate(),
            requested_at: Utc::now(),
        }))
        .await
        .unwrap();
        flags.changed().await.unwrap();
        assert!(flags.borrow().paused);
        assert_eq!(
            notes
                .lock()
                .unwrap()
                .pause_reason
                .as_deref(),
            Some("audit")
        );

        tx.send(ControlSignal::Resume(ResumeSignal {
            requested_by: ActorId::generate(),
            requested_at: Utc::now(),
        }))
        .await
        .unwrap();
        flags.changed().await.unwrap();
        assert!(!flags.borrow().paused);
    }

    #[tokio::test]
    async fn test_pause_after_cancel_is_ignored() {
        let (tx, mut flags, mut decisions, notes, _listener) = wiring();

        tx.send(ControlSignal::Cancel(lifecycle_types::CancelSignal {
            reason: "shutting down".into(),
            requested_by: ActorId::generate(),
            requested_at: Utc::now(),
        }))
        .await
        .unwrap();
        flags.changed().await.unwrap();
        assert!(flags.borrow().cancel_requested);
        assert_eq!(read_cancel_reason(&notes), "shutting down");

        tx.send(ControlSignal::Pause(PauseSignal {
            reason: "too late".into(),
            requested_by: ActorId::generate(),
            requested_at: Utc::now(),
        }))
        .await
        .unwrap();

        // Deliver a decision afterwards to prove the pause was processed
        tx.send(ControlSignal::ApprovalDecision(ApprovalDecisionSignal {
            step_id: "hr-manager".into(),
            decision: Decision::Approved,
            approver: ActorId::generate(),
            comments: None,
            decided_at: Utc::now(),
        }))
        .await
        .unwrap();

        let decision = decisions.recv().await.unwrap();
        assert_eq!(decision.step_id, "hr-manager");
        assert!(!flags.borrow_and_update().paused);
        assert!(flags.borrow().cancel_requested);
    }

    #[tokio::test]
    async fn test_decisions_are_forwarded_untouched() {
        let (tx, _flags, mut decisions, _notes, _listener) = wiring();

        let approver = ActorId::generate();
        tx.send(ControlSignal::ApprovalDecision(ApprovalDecisionSignal {
            step_id: "hr-director".into(),
            decision: Decision::Rejected,
            approver,
            comments: Some("insufficient budget".into()),
            decided_at: Utc::now(),
        }))
        .await
        .unwrap();

        let decision = decisions.recv().await.unwrap();
        assert_eq!(decision.step_id, "hr-director");
        assert_eq!(decision.decision, Decision::Rejected);
        assert_eq!(decision.approver, approver);
    }
}
