//! Session status lifecycle.
//!
//! A session starts in `provisioning` and advances to `active` once its
//! runner is up and capability configuration has run. `closed` and `error`
//! exist for administrative transitions; nothing in this subsystem sets
//! them on its own.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Provisioning,
    Active,
    Closed,
    Error,
}

impl SessionStatus {
    /// Whether a transition from `self` to `next` is allowed.
    pub fn can_transition(self, next: SessionStatus) -> bool {
        use SessionStatus::*;
        matches!(
            (self, next),
            (Provisioning, Active)
                | (Provisioning, Error)
                | (Active, Closed)
                | (Active, Error)
        )
    }

    /// Terminal statuses accept no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Closed | SessionStatus::Error)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SessionStatus::Provisioning => "provisioning",
            SessionStatus::Active => "active",
            SessionStatus::Closed => "closed",
            SessionStatus::Error => "error",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::SessionStatus::*;

    #[test]
    fn provisioning_advances_to_active_or_error() {
        assert!(Provisioning.can_transition(Active));
        assert!(Provisioning.can_transition(Error));
        assert!(!Provisioning.can_transition(Closed));
    }

    #[test]
    fn active_can_only_close_or_fail() {
        assert!(Active.can_transition(Closed));
        assert!(Active.can_transition(Error));
        assert!(!Active.can_transition(Provisioning));
    }

    #[test]
    fn terminal_statuses_are_final() {
        for from in [Closed, Error] {
            assert!(from.is_terminal());
            for to in [Provisioning, Active, Closed, Error] {
                assert!(!from.can_transition(to));
            }
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Active).unwrap(), "\"active\"");
        assert_eq!(
            serde_json::to_string(&Provisioning).unwrap(),
            "\"provisioning\""
        );
    }
}
