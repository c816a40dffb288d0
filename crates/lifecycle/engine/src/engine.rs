//! The engine: launches and resumes lifecycle runs

use crate::control::{spawn_listener, ControlNotes};
use crate::run::Run;
use crate::RunHandle;
use lifecycle_activities::{LifecycleActivities, RetryPolicy};
use lifecycle_types::{
    Clock, ControlFlags, LifecycleRequest, LifecycleResult, RunId, RunStatus, SystemClock,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

const SIGNAL_BUFFER: usize = 32;
const DECISION_BUFFER: usize = 32;

/// Launches lifecycle runs.
///
/// Cheap to clone; clones share the activity implementation, clock, and
/// retry policy.
#[derive(Clone)]
pub struct LifecycleEngine {
    activities: Arc<dyn LifecycleActivities>,
    clock: Arc<dyn Clock>,
    retry: RetryPolicy,
}

impl LifecycleEngine {
    pub fn new(activities: Arc<dyn LifecycleActivities>) -> Self {
        Self {
            activities,
            clock: Arc::new(SystemClock),
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the clock, usually with a pinned one in tests
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Start a fresh run for the request
    pub fn launch(&self, request: LifecycleRequest) -> RunHandle {
        let result = LifecycleResult::new(
            request.employee_id,
            request.stage,
            request.operation.name(),
            self.clock.now(),
        );
        self.launch_inner(request, result)
    }

    /// Re-launch a run from a prior result.
    ///
    /// The prior result's completed steps are honored: handlers skip any
    /// step already recorded, re-executing only what never finished. The
    /// prior terminal status and error are cleared.
    pub fn launch_resumed(&self, request: LifecycleRequest, prior: LifecycleResult) -> RunHandle {
        let mut result = prior;
        result.status = RunStatus::InProgress;
        result.completed_at = None;
        result.error = None;
        self.launch_inner(request, result)
    }

    fn launch_inner(&self, request: LifecycleRequest, result: LifecycleResult) -> RunHandle {
        let run_id = RunId::generate();
        let (signal_tx, signal_rx) = mpsc::channel(SIGNAL_BUFFER);
        let (decision_tx, decision_rx) = mpsc::channel(DECISION_BUFFER);
        let (flags_tx, flags_rx) = watch::channel(ControlFlags::default());
        let (status_tx, status_rx) =
            watch::channel(Run::initial_status(&request, self.clock.as_ref()));
        let notes = ControlNotes::shared();

        let listener_task = spawn_listener(
            run_id,
            signal_rx,
            flags_tx,
            decision_tx,
            Arc::clone(&notes),
        );

        let run = Run {
            run_id,
            activities: Arc::clone(&self.activities),
            clock: Arc::clone(&self.clock),
            retry: self.retry,
            request,
            result,
            status_tx,
            flags: flags_rx.clone(),
            decisions: decision_rx,
            notes,
        };
        let run_task = tokio::spawn(run.execute());

        RunHandle::new(
            run_id,
            Arc::clone(&self.clock),
            signal_tx,
            status_rx,
            flags_rx,
            run_task,
            listener_task,
        )
    }
}
