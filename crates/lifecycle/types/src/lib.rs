//! Domain types for employee lifecycle orchestration
//!
//! A lifecycle run is a durable, cooperative state machine that carries an
//! employee through one operation of one lifecycle stage (pre-hire →
//! onboarding → active → offboarding → terminated). These types are the
//! shared vocabulary between the dispatcher, the activity boundary, the risk
//! engine, and the approval executor.
//!
//! # Key Concepts
//!
//! - **LifecycleRequest**: the immutable input to one run — stage, operation
//!   (a tagged union carrying its typed payload), subject, and requestor.
//! - **LifecycleResult**: the run's accumulating outcome — status, an
//!   append-only, duplicate-free list of completed step labels, and an opaque
//!   result payload.
//! - **WorkflowStatus**: the externally queryable projection of a run —
//!   current step and a monotonically non-decreasing progress value.
//! - **Control signals**: pause/resume/cancel requests plus per-step approval
//!   decisions. Cancel always dominates pause.
//! - **Position model**: position snapshots, change requests, and the
//!   approval chain types used by the position change orchestrator.
//!
//! # Design Principles
//!
//! 1. Operation payloads are typed variants, decoded once at entry. No
//!    opaque maps, no runtime downcasts.
//! 2. Completed-step lists are append-only and never contain duplicates;
//!    recording an already-present step is a no-op.
//! 3. Progress only moves forward within a run and reaches 1.0 exactly when
//!    the run completes.

#![deny(unsafe_code)]

mod approval;
mod clock;
mod errors;
mod ids;
mod operation;
mod position;
mod request;
mod result;
mod signals;
mod stage;
mod status;

pub use approval::*;
pub use clock::*;
pub use errors::*;
pub use ids::*;
pub use operation::*;
pub use position::*;
pub use request::*;
pub use result::*;
pub use signals::*;
pub use stage::*;
pub use status::*;
