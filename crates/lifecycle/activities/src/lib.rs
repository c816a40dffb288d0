//! Activity boundary for lifecycle orchestration
//!
//! Every side effect of a lifecycle run goes through [`LifecycleActivities`]:
//! HR record writes, onboarding provisioning, position history, event
//! publication, notifications. The engine never performs side effects
//! directly; it calls this trait and interprets failures through the
//! transient/permanent split of `ActivityError`.
//!
//! # Key Concepts
//!
//! - **Contracts**: each activity has a typed request and response struct.
//!   Nothing crosses this boundary as an untyped map.
//! - **Idempotency**: the engine may re-invoke any activity after a resume;
//!   implementations are expected to tolerate duplicate calls.
//! - **Retry**: [`RetryPolicy`] bounds retries of transient failures with
//!   exponential backoff. Permanent failures are never retried.

#![deny(unsafe_code)]

mod boundary;
mod contracts;
mod retry;

pub use boundary::*;
pub use contracts::*;
pub use retry::*;
