//! Lifecycle stages: the closed set of coarse phases an employee moves through

use serde::{Deserialize, Serialize};

/// A coarse phase of the employee lifecycle.
///
/// Stages form a closed enumeration; operations are scoped per stage (see
/// [`crate::LifecycleOperation::stage`]). A request whose operation does not
/// belong to its stage is a non-retryable validation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleStage {
    PreHire,
    Onboarding,
    Active,
    Offboarding,
    Terminated,
}

impl LifecycleStage {
    /// Wire/display name, matching the operation naming convention
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PreHire => "PRE_HIRE",
            Self::Onboarding => "ONBOARDING",
            Self::Active => "ACTIVE",
            Self::Offboarding => "OFFBOARDING",
            Self::Terminated => "TERMINATED",
        }
    }
}

impl std::fmt::Display for LifecycleStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_names() {
        assert_eq!(LifecycleStage::PreHire.as_str(), "PRE_HIRE");
        assert_eq!(LifecycleStage::Terminated.to_string(), "TERMINATED");
    }

    #[test]
    fn test_stage_serde() {
        let json = serde_json::to_string(&LifecycleStage::Offboarding).unwrap();
        assert_eq!(json, "\"OFFBOARDING\"");
        let back: LifecycleStage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, LifecycleStage::Offboarding);
    }
}
