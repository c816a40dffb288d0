//! The sequential chain executor

use lifecycle_types::{
    ApprovalAction, ApprovalDecisionSignal, ApprovalEvent, ApprovalStep, Clock, ControlFlags,
    Decision,
};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};

/// How a chain ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChainOutcome {
    /// Every required step approved (optional steps may have been skipped)
    Approved,
    /// An approver rejected; no later step was offered
    Rejected {
        step_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        comments: Option<String>,
    },
    /// A required step received no decision within its timeout
    TimedOut { step_id: String, role: String },
    /// The run was cancelled while the chain was waiting
    Cancelled,
}

impl ChainOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Outcome plus the per-step audit trail
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainResult {
    pub outcome: ChainOutcome,
    pub events: Vec<ApprovalEvent>,
}

/// Executes one approval chain against a decision inbox.
///
/// Borrows the run's decision receiver and control-flag watch for the
/// duration of the chain; the run logic gets them back once the chain
/// resolves.
pub struct ApprovalChainExecutor<'a> {
    decisions: &'a mut mpsc::Receiver<ApprovalDecisionSignal>,
    flags: &'a mut watch::Receiver<ControlFlags>,
    clock: &'a dyn Clock,
}

impl<'a> ApprovalChainExecutor<'a> {
    pub fn new(
        decisions: &'a mut mpsc::Receiver<ApprovalDecisionSignal>,
        flags: &'a mut watch::Receiver<ControlFlags>,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            decisions,
            flags,
            clock,
        }
    }

    /// Walk the chain in order. An empty chain is trivially approved.
    pub async fn execute(&mut self, steps: &[ApprovalStep]) -> ChainResult {
        let mut events = Vec::new();
        // Decisions that arrived ahead of their step; drained when the
        // chain reaches them, dropped with the chain otherwise.
        let mut held: Vec<ApprovalDecisionSignal> = Vec::new();

        for step in steps {
            if self.flags.borrow().cancel_requested {
                return ChainResult {
                    outcome: ChainOutcome::Cancelled,
                    events,
                };
            }

            tracing::info!(
                step_id = %step.step_id,
                role = %step.role,
                timeout_secs = step.timeout.as_secs(),
                "awaiting approval decision"
            );

            match self.await_step(step, &mut held).await {
                StepResolution::Decided(signal) => {
                    let action = ApprovalAction::from(signal.decision);
                    events.push(ApprovalEvent {
                        step_id: step.step_id.clone(),
                        role: step.role,
                        action,
                        approver: Some(signal.approver),
                        comments: signal.comments.clone(),
                        recorded_at: signal.decided_at,
                    });
                    if signal.decision == Decision::Rejected {
                        return ChainResult {
                            outcome: ChainOutcome::Rejected {
                                step_id: step.step_id.clone(),
                                comments: signal.comments,
                            },
                            events,
                        };
                    }
                }
                StepResolution::TimedOut => {
                    if step.required {
                        return ChainResult {
                            outcome: ChainOutcome::TimedOut {
                                step_id: step.step_id.clone(),
                                role: step.role.to_string(),
                            },
                            events,
                        };
                    }
                    tracing::warn!(
                        step_id = %step.step_id,
                        role = %step.role,
                        "optional approval step timed out, skipping"
                    );
                    events.push(ApprovalEvent {
                        step_id: step.step_id.clone(),
                        role: step.role,
                        action: ApprovalAction::SkippedTimeout,
                        approver: None,
                        comments: None,
                        recorded_at: self.clock.now(),
                    });
                }
                StepResolution::Cancelled => {
                    return ChainResult {
                        outcome: ChainOutcome::Cancelled,
                        events,
                    };
                }
            }
        }

        ChainResult {
            outcome: ChainOutcome::Approved,
            events,
        }
    }

    /// Wait for this step's decision, its timeout, or cancellation,
    /// whichever comes first. A decision addressed to another step is held
    /// for that step instead of being dropped.
    async fn await_step(
        &mut self,
        step: &ApprovalStep,
        held: &mut Vec<ApprovalDecisionSignal>,
    ) -> StepResolution {
        if let Some(pos) = held.iter().position(|s| s.step_id == step.step_id) {
            return StepResolution::Decided(held.remove(pos));
        }

        let deadline = tokio::time::sleep(step.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                maybe_signal = self.decisions.recv() => {
                    match maybe_signal {
                        Some(signal) if signal.step_id == step.step_id => {
                            return StepResolution::Decided(signal);
                        }
                        Some(signal) => {
                            tracing::debug!(
                                awaited = %step.step_id,
                                received = %signal.step_id,
                                "holding decision for a step not currently awaited"
                            );
                            held.push(signal);
                        }
                        // Signal source is gone; the run is shutting down
                        None => return StepResolution::Cancelled,
                    }
                }
                changed = self.flags.changed() => {
                    if changed.is_err() || self.flags.borrow().cancel_requested {
                        return StepResolution::Cancelled;
                    }
                }
                _ = &mut deadline => return StepResolution::TimedOut,
            }
        }
    }
}

enum StepResolution {
    Decided(ApprovalDecisionSignal),
    TimedOut,
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lifecycle_types::{ActorId, ApproverRole, SystemClock};
    use std::time::Duration;

    fn channels() -> (
        mpsc::Sender<ApprovalDecisionSignal>,
        mpsc::Receiver<ApprovalDecisionSignal>,
        watch::Sender<ControlFlags>,
        watch::Receiver<ControlFlags>,
    ) {
        let (decision_tx, decision_rx) = mpsc::channel(16);
        let (flag_tx, flag_rx) = watch::channel(ControlFlags::default());
        (decision_tx, decision_rx, flag_tx, flag_rx)
    }

    fn approve(step_id: &str) -> ApprovalDecisionSignal {
        ApprovalDecisionSignal {
            step_id: step_id.into(),
            decision: Decision::Approved,
            approver: ActorId::generate(),
            comments: None,
            decided_at: Utc::now(),
        }
    }

    fn reject(step_id: &str, comments: &str) -> ApprovalDecisionSignal {
        ApprovalDecisionSignal {
            step_id: step_id.into(),
            decision: Decision::Rejected,
            approver: ActorId::generate(),
            comments: Some(comments.into()),
            decided_at: Utc::now(),
        }
    }

    fn two_step_chain() -> Vec<ApprovalStep> {
        vec![
            ApprovalStep::required(ApproverRole::HrManager, Duration::from_secs(3600)),
            ApprovalStep::required(ApproverRole::HrDirector, Duration::from_secs(3600)),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_approved_in_order() {
        let (tx, mut rx, _flag_tx, mut flag_rx) = channels();
        let steps = two_step_chain();

        tx.send(approve(&steps[0].step_id)).await.unwrap();
        tx.send(approve(&steps[1].step_id)).await.unwrap();

        let clock = SystemClock;
        let mut executor = ApprovalChainExecutor::new(&mut rx, &mut flag_rx, &clock);
        let result = executor.execute(&steps).await;

        assert_eq!(result.outcome, ChainOutcome::Approved);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].step_id, steps[0].step_id);
        assert_eq!(result.events[1].step_id, steps[1].step_id);
        assert!(result
            .events
            .iter()
            .all(|e| e.action == ApprovalAction::Approved));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejection_short_circuits() {
        let (tx, mut rx, _flag_tx, mut flag_rx) = channels();
        let steps = two_step_chain();

        tx.send(reject(&steps[0].step_id, "not justified"))
            .await
            .unwrap();

        let clock = SystemClock;
        let mut executor = ApprovalChainExecutor::new(&mut rx, &mut flag_rx, &clock);
        let result = executor.execute(&steps).await;

        match result.outcome {
            ChainOutcome::Rejected { step_id, comments } => {
                assert_eq!(step_id, steps[0].step_id);
                assert_eq!(comments.as_deref(), Some("not justified"));
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        // The second step was never offered
        assert_eq!(result.events.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_mismatched_step_id_does_not_resolve_the_step() {
        let (tx, mut rx, _flag_tx, mut flag_rx) = channels();
        let steps = vec![ApprovalStep::required(
            ApproverRole::HrManager,
            Duration::from_secs(3600),
        )];

        // A stray rejection for some other step must not end the chain
        tx.send(reject("some-other-step", "wrong chain")).await.unwrap();
        tx.send(approve(&steps[0].step_id)).await.unwrap();

        let clock = SystemClock;
        let mut executor = ApprovalChainExecutor::new(&mut rx, &mut flag_rx, &clock);
        let result = executor.execute(&steps).await;

        assert_eq!(result.outcome, ChainOutcome::Approved);
        assert_eq!(result.events.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_decision_for_a_later_step_is_held() {
        let (tx, mut rx, _flag_tx, mut flag_rx) = channels();
        let steps = two_step_chain();

        // The second approver answers before the first step is even offered
        tx.send(approve(&steps[1].step_id)).await.unwrap();
        tx.send(approve(&steps[0].step_id)).await.unwrap();

        let clock = SystemClock;
        let mut executor = ApprovalChainExecutor::new(&mut rx, &mut flag_rx, &clock);
        let result = executor.execute(&steps).await;

        assert_eq!(result.outcome, ChainOutcome::Approved);
        assert_eq!(result.events.len(), 2);
        // Events follow chain order, not arrival order
        assert_eq!(result.events[0].step_id, steps[0].step_id);
        assert_eq!(result.events[1].step_id, steps[1].step_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_required_step_timeout_fails_chain() {
        let (_tx, mut rx, _flag_tx, mut flag_rx) = channels();
        let steps = vec![ApprovalStep::required(
            ApproverRole::HrDirector,
            Duration::from_secs(72 * 3600),
        )];

        let clock = SystemClock;
        let mut executor = ApprovalChainExecutor::new(&mut rx, &mut flag_rx, &clock);
        let result = executor.execute(&steps).await;

        match result.outcome {
            ChainOutcome::TimedOut { role, .. } => assert_eq!(role, "hr-director"),
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(result.events.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_optional_step_timeout_is_skipped() {
        let (tx, mut rx, _flag_tx, mut flag_rx) = channels();
        let steps = vec![
            ApprovalStep::required(ApproverRole::DirectManager, Duration::from_secs(60)).optional(),
            ApprovalStep::required(ApproverRole::HrManager, Duration::from_secs(3600)),
        ];

        // Only the second step ever gets a decision
        tx.send(approve(&steps[1].step_id)).await.unwrap();

        let clock = SystemClock;
        let mut executor = ApprovalChainExecutor::new(&mut rx, &mut flag_rx, &clock);
        let result = executor.execute(&steps).await;

        assert_eq!(result.outcome, ChainOutcome::Approved);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.events[0].action, ApprovalAction::SkippedTimeout);
        assert_eq!(result.events[1].action, ApprovalAction::Approved);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_ends_chain_mid_wait() {
        let (_tx, mut rx, flag_tx, mut flag_rx) = channels();
        let steps = vec![ApprovalStep::required(
            ApproverRole::HrManager,
            Duration::from_secs(48 * 3600),
        )];

        flag_tx
            .send(ControlFlags {
                paused: false,
                cancel_requested: true,
            })
            .unwrap();

        let clock = SystemClock;
        let mut executor = ApprovalChainExecutor::new(&mut rx, &mut flag_rx, &clock);
        let result = executor.execute(&steps).await;

        assert_eq!(result.outcome, ChainOutcome::Cancelled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_chain_is_trivially_approved() {
        let (_tx, mut rx, _flag_tx, mut flag_rx) = channels();
        let clock = SystemClock;
        let mut executor = ApprovalChainExecutor::new(&mut rx, &mut flag_rx, &clock);
        let result = executor.execute(&[]).await;
        assert_eq!(result.outcome, ChainOutcome::Approved);
        assert!(result.events.is_empty());
    }
}
