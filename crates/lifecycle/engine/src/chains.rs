//! Running approval chains inside a lifecycle run

use crate::control::read_cancel_reason;
use crate::run::Run;
use lifecycle_approvals::{ApprovalChainExecutor, ChainOutcome};
use lifecycle_types::{ApprovalEvent, ApprovalStep, LifecycleError, OrchestrationResult};
use std::sync::Arc;

/// Business-level resolution of a chain. Timeouts and cancellation are
/// errors; rejection is not.
pub(crate) enum ChainVerdict {
    Approved(Vec<ApprovalEvent>),
    Rejected { comments: Option<String> },
}

/// Execute a chain against the run's decision inbox and control flags.
pub(crate) async fn resolve_chain(
    run: &mut Run,
    steps: &[ApprovalStep],
) -> OrchestrationResult<ChainVerdict> {
    let clock = Arc::clone(&run.clock);
    let mut executor =
        ApprovalChainExecutor::new(&mut run.decisions, &mut run.flags, clock.as_ref());
    let result = executor.execute(steps).await;

    match result.outcome {
        ChainOutcome::Approved => Ok(ChainVerdict::Approved(result.events)),
        ChainOutcome::Rejected { comments, .. } => Ok(ChainVerdict::Rejected { comments }),
        ChainOutcome::TimedOut { step_id, role } => {
            Err(LifecycleError::ApprovalTimeout { step_id, role })
        }
        ChainOutcome::Cancelled => Err(LifecycleError::Cancelled(read_cancel_reason(&run.notes))),
    }
}
