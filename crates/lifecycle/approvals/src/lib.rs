//! Approval chain execution
//!
//! Walks an ordered list of approval steps, waiting on each for a decision
//! signal addressed to that step. The executor enforces:
//!
//! - **Strict order**: step N+1 is not offered until step N resolves.
//! - **Step scoping**: a decision only ever resolves the step it is
//!   addressed to. Decisions arriving ahead of their step are held until
//!   the chain reaches it; decisions for steps the chain never reaches are
//!   dropped when the chain ends.
//! - **Rejection short-circuit**: any rejection ends the chain immediately.
//! - **Timeouts**: a required step that times out fails the chain; an
//!   optional step that times out is skipped and recorded as such.
//! - **Cancellation**: a cancel request observed on the control flags ends
//!   the chain without consuming further decisions.

#![deny(unsafe_code)]

mod executor;

pub use executor::*;
