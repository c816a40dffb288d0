//! Retroactive impact computation
//!
//! A pure function over the effective date and the reference time. The
//! output is advisory: it names the payroll periods a retroactive change
//! touches and whether recalculation should be triggered. It never performs
//! the recalculation.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Periods are listed oldest first as `YYYY-MM`, capped at this many months
pub const MAX_AFFECTED_PERIODS: usize = 12;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetroactiveImpact {
    /// Monthly payroll periods from the effective date through the current
    /// month, oldest first
    pub affected_periods: Vec<String>,
    pub requires_recalculation: bool,
}

impl RetroactiveImpact {
    pub fn none() -> Self {
        Self {
            affected_periods: Vec::new(),
            requires_recalculation: false,
        }
    }
}

/// Compute the payroll impact of an effective date relative to `now`.
///
/// Effective dates at or after `now` have no impact. The period list walks
/// calendar months from the effective month through the current month and
/// is capped at [`MAX_AFFECTED_PERIODS`], keeping the oldest.
pub fn assess_impact(effective_date: DateTime<Utc>, now: DateTime<Utc>) -> RetroactiveImpact {
    if effective_date >= now {
        return RetroactiveImpact::none();
    }

    let mut periods = Vec::new();
    let (mut year, mut month) = (effective_date.year(), effective_date.month());
    let (end_year, end_month) = (now.year(), now.month());

    while (year, month) <= (end_year, end_month) && periods.len() < MAX_AFFECTED_PERIODS {
        periods.push(format!("{:04}-{:02}", year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    RetroactiveImpact {
        requires_recalculation: !periods.is_empty(),
        affected_periods: periods,
    }
}
