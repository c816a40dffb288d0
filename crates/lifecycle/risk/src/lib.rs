//! Risk assessment for position changes
//!
//! A pure, deterministic engine: given the current position context, the
//! proposed position, the effective date, and a reference time, it produces
//! a risk classification and the approval chain that classification demands.
//! Same inputs, same output — there is no clock access and no I/O here.
//!
//! # Key Concepts
//!
//! - **RiskLevel**: ordered LOW < MEDIUM < HIGH < CRITICAL. Factors combine
//!   by maximum severity, never additively.
//! - **RiskFactor**: one observed condition with its own severity, kept for
//!   audit.
//! - **Approval chains**: a fixed, ordered list of approval steps per risk
//!   level. LOW requires no approval.

#![deny(unsafe_code)]

mod assessment;
mod chain;
pub mod policy;

pub use assessment::*;
pub use chain::*;
