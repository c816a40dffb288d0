//! Lifecycle orchestration engine
//!
//! The engine runs one lifecycle operation per launch as a durable,
//! cooperative state machine. A run:
//!
//! 1. Validates that the operation belongs to the requested stage and
//!    dispatches to that stage's handler.
//! 2. Performs side effects only through the [`LifecycleActivities`] trait,
//!    retrying transient failures under the configured retry policy.
//! 3. Records every completed step exactly once, so a resumed run skips
//!    work it already did.
//! 4. Honors pause/resume/cancel signals at suspension points between
//!    steps, never mid-activity. Cancel always dominates pause.
//! 5. Answers status queries from the latest committed snapshot without
//!    touching the run itself.
//!
//! # Key Concepts
//!
//! - **[`LifecycleEngine`]**: launches runs; owns the activity
//!   implementation, clock, and retry policy.
//! - **[`RunHandle`]**: the caller's grip on a running instance — signals
//!   in, status snapshots out, final result on join.
//! - **Signal listener**: a dedicated task that is the only writer of the
//!   control flags; the run logic only reads them.
//!
//! [`LifecycleActivities`]: lifecycle_activities::LifecycleActivities

#![deny(unsafe_code)]

mod chains;
mod control;
mod engine;
mod leave;
mod onboarding;
mod position;
mod retro;
mod run;
mod stages;

pub use control::{RunHandle, SignalRejected};
pub use engine::LifecycleEngine;
pub use retro::{assess_impact, RetroactiveImpact};

pub use lifecycle_types::{Clock, FixedClock, SystemClock};
