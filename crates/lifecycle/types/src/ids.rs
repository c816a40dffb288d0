//! Identifier newtypes shared across the orchestration crates

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn new(id: Uuid) -> Self {
                Self(id)
            }

            pub fn as_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_id!(
    /// The tenant owning the subject and all records touched by a run
    TenantId
);

uuid_id!(
    /// The employee (or candidate) a lifecycle run operates on
    EmployeeId
);

uuid_id!(
    /// An actor issuing requests, signals, or approval decisions
    ActorId
);

uuid_id!(
    /// Unique identifier for one orchestration run
    RunId
);

impl RunId {
    /// Shortened form for log lines
    pub fn short(&self) -> String {
        self.0.to_string()[..8].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        assert_ne!(RunId::generate(), RunId::generate());
    }

    #[test]
    fn test_short_run_id() {
        let id = RunId::generate();
        assert_eq!(id.short().len(), 8);
    }

    #[test]
    fn test_display_round_trip() {
        let raw = Uuid::new_v4();
        let id = EmployeeId::new(raw);
        assert_eq!(id.to_string(), raw.to_string());
        assert_eq!(id.as_uuid(), raw);
    }
}
