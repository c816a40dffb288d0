//! Control signals delivered to a running lifecycle run
//!
//! Signals are fire-and-forget requests; whether they take effect depends on
//! the run's state when they arrive. Cancellation always dominates pause: a
//! paused run that receives a cancel wakes and terminates.

use crate::ActorId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to suspend a run at its next suspension point
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PauseSignal {
    pub reason: String,
    pub requested_by: ActorId,
    pub requested_at: DateTime<Utc>,
}

/// Request to lift a previously requested pause
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResumeSignal {
    pub requested_by: ActorId,
    pub requested_at: DateTime<Utc>,
}

/// Request to terminate a run cooperatively
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CancelSignal {
    pub reason: String,
    pub requested_by: ActorId,
    pub requested_at: DateTime<Utc>,
}

/// An approver's verdict on one approval step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approved,
    Rejected,
}

/// Decision signal addressed to a specific approval step.
///
/// `step_id` scopes the decision: it only ever resolves the step it names.
/// A decision arriving before its step is reached is held until then.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApprovalDecisionSignal {
    pub step_id: String,
    pub decision: Decision,
    pub approver: ActorId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    pub decided_at: DateTime<Utc>,
}

/// The union of control signals a run listens for
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "signal", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ControlSignal {
    Pause(PauseSignal),
    Resume(ResumeSignal),
    Cancel(CancelSignal),
    ApprovalDecision(ApprovalDecisionSignal),
}

/// The run's current control posture, published over a watch channel.
///
/// Written only by the signal listener; the run logic only reads it. Once
/// `cancel_requested` is set it never clears, and it takes precedence over
/// `paused` everywhere the flags are consulted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlFlags {
    pub paused: bool,
    pub cancel_requested: bool,
}

impl ControlFlags {
    /// Whether the run should actually hold at a suspension point
    pub fn should_hold(&self) -> bool {
        self.paused && !self.cancel_requested
    }
}
