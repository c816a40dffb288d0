//! Named policy constants for risk scoring and approval routing
//!
//! Kept in one module so a tenant-level policy source can replace it without
//! touching the scoring logic.

use std::time::Duration;
use uuid::Uuid;

/// A salary increase above this fraction is HIGH risk
pub const SALARY_HIGH_THRESHOLD: f64 = 0.20;

/// A salary increase above this fraction is MEDIUM risk
pub const SALARY_MEDIUM_THRESHOLD: f64 = 0.10;

/// Effective dates more than this many days in the past are MEDIUM risk
pub const RETROACTIVE_RISK_DAYS: i64 = 30;

/// Window over which recent position changes are counted
pub const RECENT_CHANGE_WINDOW_MONTHS: u32 = 6;

/// More than this many changes inside the window is MEDIUM risk
pub const RECENT_CHANGE_LIMIT: u32 = 2;

// ── Step decision timeouts ───────────────────────────────────────────

pub const DIRECT_MANAGER_TIMEOUT: Duration = Duration::from_secs(24 * 3600);
pub const HR_MANAGER_TIMEOUT: Duration = Duration::from_secs(48 * 3600);
pub const HR_DIRECTOR_TIMEOUT: Duration = Duration::from_secs(72 * 3600);
pub const CHIEF_EXECUTIVE_TIMEOUT: Duration = Duration::from_secs(168 * 3600);

// ── Well-known approver accounts ─────────────────────────────────────
// Role inboxes, not people. The direct manager has no fixed account; that
// step is resolved against the employee's reporting line at run time.

pub const HR_MANAGER_APPROVER: Uuid = Uuid::from_u128(1);
pub const HR_DIRECTOR_APPROVER: Uuid = Uuid::from_u128(2);
pub const CHIEF_EXECUTIVE_APPROVER: Uuid = Uuid::from_u128(3);
