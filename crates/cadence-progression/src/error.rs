//! Error types for the cadence-progression crate.
//!
//! Every subsystem operation returns [`ProgressionError`] when it declines.
//! The store maps each error onto a [`RejectionReason`] for the command
//! outcome; the working copy of the aggregate is discarded.

use core::fmt::Display;

use cadence_types::RejectionReason;

/// Why a subsystem operation declined.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
    /// An ordinary rule rejection.
    #[error("{reason:?}: {detail}")]
    Rejected {
        /// Machine-readable reason.
        reason: RejectionReason,
        /// Human-readable detail.
        detail: String,
    },

    /// The action is on cooldown.
    #[error("cooldown active for {remaining_secs}s: {detail}")]
    Cooldown {
        /// Seconds until the action is available again.
        remaining_secs: i64,
        /// Which action.
        detail: String,
    },

    /// A catalog lookup failed (integrity fault).
    #[error("missing {kind} definition: {id}")]
    MissingDefinition {
        /// Definition kind.
        kind: &'static str,
        /// Missing id.
        id: String,
    },
}

impl ProgressionError {
    /// Build an ordinary rejection.
    pub fn rejected(reason: RejectionReason, detail: impl Into<String>) -> Self {
        Self::Rejected {
            reason,
            detail: detail.into(),
        }
    }

    /// Build a `PreconditionNotMet` rejection.
    pub fn precondition(detail: impl Into<String>) -> Self {
        Self::rejected(RejectionReason::PreconditionNotMet, detail)
    }

    /// Build an `InvalidStateTransition` rejection.
    pub fn invalid_transition(detail: impl Into<String>) -> Self {
        Self::rejected(RejectionReason::InvalidStateTransition, detail)
    }

    /// Build a cooldown rejection.
    pub fn cooldown(remaining_secs: i64, detail: impl Into<String>) -> Self {
        Self::Cooldown {
            remaining_secs: remaining_secs.max(0),
            detail: detail.into(),
        }
    }

    /// Build a catalog miss.
    pub fn missing(kind: &'static str, id: impl Display) -> Self {
        Self::MissingDefinition {
            kind,
            id: id.to_string(),
        }
    }

    /// The rejection reason reported to the UI.
    pub const fn reason(&self) -> RejectionReason {
        match self {
            Self::Rejected { reason, .. } => *reason,
            Self::Cooldown { .. } => RejectionReason::CooldownActive,
            Self::MissingDefinition { .. } => RejectionReason::MissingDefinition,
        }
    }

    /// Seconds until retry, for cooldowns.
    pub const fn retry_after_secs(&self) -> Option<i64> {
        match self {
            Self::Cooldown { remaining_secs, .. } => Some(*remaining_secs),
            _ => None,
        }
    }

    /// Whether this is an integrity fault rather than a rule rejection.
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::MissingDefinition { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_map_to_rejections() {
        assert_eq!(
            ProgressionError::cooldown(12, "play").reason(),
            RejectionReason::CooldownActive
        );
        assert_eq!(
            ProgressionError::missing("pet", "ghost").reason(),
            RejectionReason::MissingDefinition
        );
        assert_eq!(
            ProgressionError::precondition("no ring").reason(),
            RejectionReason::PreconditionNotMet
        );
    }

    #[test]
    fn negative_cooldowns_clamp_to_zero() {
        assert_eq!(ProgressionError::cooldown(-5, "x").retry_after_secs(), Some(0));
        assert!(ProgressionError::missing("npc", "x").is_fault());
        assert!(!ProgressionError::precondition("x").is_fault());
    }
}
