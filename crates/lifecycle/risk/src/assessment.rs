//! Risk scoring for a proposed position change

use crate::policy;
use chrono::{DateTime, Utc};
use lifecycle_types::PositionSnapshot;
use serde::{Deserialize, Serialize};

/// Risk classification, ordered by severity.
///
/// The derived ordering is load-bearing: factors combine by taking the
/// maximum severity observed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One observed risk condition, kept for the audit trail
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskFactor {
    pub level: RiskLevel,
    pub description: String,
}

impl RiskFactor {
    fn new(level: RiskLevel, description: impl Into<String>) -> Self {
        Self {
            level,
            description: description.into(),
        }
    }
}

/// The outcome of scoring one proposed change
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub factors: Vec<RiskFactor>,
    pub requires_approval: bool,
}

/// Everything the scorer knows about the employee's current state.
///
/// Fetched once before scoring; absent fields simply contribute no factors.
#[derive(Clone, Debug, Default)]
pub struct CurrentState<'a> {
    pub position: Option<&'a PositionSnapshot>,
    pub salary: Option<f64>,
    /// Position changes recorded within the recent-change window
    pub recent_change_count: u32,
}

/// Score a proposed position change.
///
/// Pure and deterministic: `now` is the only notion of time, passed in by
/// the caller. Factors combine by maximum severity; an empty factor list is
/// LOW and requires no approval.
pub fn assess(
    current: &CurrentState<'_>,
    proposed: &PositionSnapshot,
    effective_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> RiskAssessment {
    let mut factors = Vec::new();

    // Salary increase against the proposed band ceiling. Decreases carry
    // no salary factor.
    if let (Some(current_salary), Some(new_salary)) = (current.salary, proposed.max_salary) {
        if current_salary > 0.0 {
            let increase = (new_salary - current_salary) / current_salary;
            if increase > policy::SALARY_HIGH_THRESHOLD {
                factors.push(RiskFactor::new(
                    RiskLevel::High,
                    format!("salary increase of {:.0}% exceeds 20%", increase * 100.0),
                ));
            } else if increase > policy::SALARY_MEDIUM_THRESHOLD {
                factors.push(RiskFactor::new(
                    RiskLevel::Medium,
                    format!("salary increase of {:.0}% exceeds 10%", increase * 100.0),
                ));
            }
        }
    }

    // Department move
    if let Some(current_position) = current.position {
        if current_position.department != proposed.department {
            factors.push(RiskFactor::new(
                RiskLevel::Medium,
                format!(
                    "department change from {} to {}",
                    current_position.department, proposed.department
                ),
            ));
        }
    }

    // Seniority of the target position
    if let Some(level) = proposed.job_level {
        if level.is_executive_tier() {
            factors.push(RiskFactor::new(
                RiskLevel::Critical,
                format!("target level {:?} is executive tier", level),
            ));
        } else if level.is_director_tier() {
            factors.push(RiskFactor::new(
                RiskLevel::High,
                format!("target level {:?} is director tier", level),
            ));
        }
    }

    // Deep retroactivity
    let days_past = (now - effective_date).num_days();
    if days_past > policy::RETROACTIVE_RISK_DAYS {
        factors.push(RiskFactor::new(
            RiskLevel::Medium,
            format!("effective date is {} days in the past", days_past),
        ));
    }

    // Change churn
    if current.recent_change_count > policy::RECENT_CHANGE_LIMIT {
        factors.push(RiskFactor::new(
            RiskLevel::Medium,
            format!(
                "{} position changes in the last {} months",
                current.recent_change_count,
                policy::RECENT_CHANGE_WINDOW_MONTHS
            ),
        ));
    }

    let level = factors
        .iter()
        .map(|f| f.level)
        .max()
        .unwrap_or(RiskLevel::Low);

    RiskAssessment {
        level,
        factors,
        requires_approval: level >= RiskLevel::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use lifecycle_types::{EmploymentType, JobLevel};

    fn position(department: &str) -> PositionSnapshot {
        PositionSnapshot::new("Engineer", department, EmploymentType::FullTime)
    }

    fn now() -> DateTime<Utc> {
        "2026-08-01T00:00:00Z".parse().unwrap()
    }

    #[test]
    fn test_no_factors_is_low_and_unapproved() {
        let current_position = position("Platform");
        let current = CurrentState {
            position: Some(&current_position),
            salary: Some(100_000.0),
            recent_change_count: 0,
        };
        let proposed = position("Platform").with_salary_band(95_000.0, 105_000.0, "USD");
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(!assessment.requires_approval);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn test_salary_thresholds_are_strict() {
        let current = CurrentState {
            salary: Some(100_000.0),
            ..Default::default()
        };

        // Exactly 20% is MEDIUM, not HIGH
        let proposed = position("Platform").with_salary_band(100_000.0, 120_000.0, "USD");
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::Medium);

        // Just over 20% is HIGH
        let proposed = position("Platform").with_salary_band(100_000.0, 121_000.0, "USD");
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::High);

        // Exactly 10% carries no salary factor
        let proposed = position("Platform").with_salary_band(100_000.0, 110_000.0, "USD");
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_salary_decrease_carries_no_salary_factor() {
        let current = CurrentState {
            salary: Some(100_000.0),
            ..Default::default()
        };
        // A 25% cut would clear the HIGH threshold if the delta were unsigned
        let proposed = position("Platform").with_salary_band(60_000.0, 75_000.0, "USD");
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::Low);
        assert!(!assessment.requires_approval);
        assert!(assessment.factors.is_empty());
    }

    #[test]
    fn test_department_change_is_medium() {
        let current_position = position("Platform");
        let current = CurrentState {
            position: Some(&current_position),
            ..Default::default()
        };
        let assessment = assess(&current, &position("Sales"), now(), now());
        assert_eq!(assessment.level, RiskLevel::Medium);
        assert!(assessment.requires_approval);
    }

    #[test]
    fn test_executive_target_is_critical() {
        let current = CurrentState::default();
        let proposed = position("Platform").with_job_level(JobLevel::Vp);
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::Critical);

        let proposed = position("Platform").with_job_level(JobLevel::SeniorDirector);
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::High);

        let proposed = position("Platform").with_job_level(JobLevel::Manager);
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_retroactivity_boundary() {
        let current = CurrentState::default();
        let proposed = position("Platform");

        // Exactly 30 days back carries no factor
        let assessment = assess(&current, &proposed, now() - Duration::days(30), now());
        assert_eq!(assessment.level, RiskLevel::Low);

        let assessment = assess(&current, &proposed, now() - Duration::days(31), now());
        assert_eq!(assessment.level, RiskLevel::Medium);

        // Future effective dates never score as retroactive
        let assessment = assess(&current, &proposed, now() + Duration::days(90), now());
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_change_churn() {
        let current = CurrentState {
            recent_change_count: 3,
            ..Default::default()
        };
        let assessment = assess(&current, &position("Platform"), now(), now());
        assert_eq!(assessment.level, RiskLevel::Medium);

        let current = CurrentState {
            recent_change_count: 2,
            ..Default::default()
        };
        let assessment = assess(&current, &position("Platform"), now(), now());
        assert_eq!(assessment.level, RiskLevel::Low);
    }

    #[test]
    fn test_factors_combine_by_max_severity() {
        let current_position = position("Platform");
        let current = CurrentState {
            position: Some(&current_position),
            salary: Some(100_000.0),
            recent_change_count: 5,
        };
        // Department change (MEDIUM) + churn (MEDIUM) + executive (CRITICAL)
        let proposed = position("Sales").with_job_level(JobLevel::CLevel);
        let assessment = assess(&current, &proposed, now(), now());
        assert_eq!(assessment.level, RiskLevel::Critical);
        assert_eq!(assessment.factors.len(), 3);
    }

    #[test]
    fn test_determinism() {
        let current = CurrentState {
            salary: Some(80_000.0),
            recent_change_count: 1,
            ..Default::default()
        };
        let proposed = position("Finance").with_salary_band(90_000.0, 99_000.0, "USD");
        let a = assess(&current, &proposed, now(), now());
        let b = assess(&current, &proposed, now(), now());
        assert_eq!(a.level, b.level);
        assert_eq!(a.factors.len(), b.factors.len());
        assert_eq!(a.requires_approval, b.requires_approval);
    }
}
