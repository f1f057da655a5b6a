//! Subscription status state machine.
//!
//! ```text
//! pending ──► authorized ◄──► paused
//!    │             │             │
//!    └────────► cancelled ◄──────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, StateMachine, ValidationError};

/// Lifecycle status of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    /// Charged on every cycle.
    Authorized,

    /// Temporarily not charged. Can be resumed.
    Paused,

    /// Ended for good.
    Cancelled,

    /// Waiting for the customer to authorize payment.
    Pending,
}

impl SubscriptionStatus {
    pub const ALL: [SubscriptionStatus; 4] = [
        SubscriptionStatus::Authorized,
        SubscriptionStatus::Paused,
        SubscriptionStatus::Cancelled,
        SubscriptionStatus::Pending,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Authorized => "authorized",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Pending => "pending",
        }
    }

    /// Lenient read of a persisted value. Anything unrecognized is `Authorized`.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or(SubscriptionStatus::Authorized)
    }

    /// Target of the pause/resume toggle.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` for pending and cancelled subscriptions.
    pub fn toggled(&self) -> Result<Self, DomainError> {
        let target = match self {
            SubscriptionStatus::Authorized => SubscriptionStatus::Paused,
            SubscriptionStatus::Paused => SubscriptionStatus::Authorized,
            other => {
                return Err(DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    format!("A {} subscription cannot be paused or resumed", other),
                )
                .with_detail("from", other.as_str()))
            }
        };
        self.transition_to(target)
    }

    /// Whether the subscription contributes to MRR.
    pub fn is_billable(&self) -> bool {
        matches!(self, SubscriptionStatus::Authorized)
    }
}

impl StateMachine for SubscriptionStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Pending => vec![Authorized, Cancelled],
            Authorized => vec![Paused, Cancelled],
            Paused => vec![Authorized, Cancelled],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubscriptionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "authorized" => Ok(SubscriptionStatus::Authorized),
            "paused" => Ok(SubscriptionStatus::Paused),
            "cancelled" => Ok(SubscriptionStatus::Cancelled),
            "pending" => Ok(SubscriptionStatus::Pending),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

/// Status filter for subscription listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(SubscriptionStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: SubscriptionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    /// `all` (or blank) selects everything, otherwise a status name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubscriptionStatus::*;

    #[test]
    fn pending_can_be_authorized_or_cancelled() {
        assert_eq!(Pending.transition_to(Authorized), Ok(Authorized));
        assert_eq!(Pending.transition_to(Cancelled), Ok(Cancelled));
        assert!(Pending.transition_to(Paused).is_err());
    }

    #[test]
    fn authorized_can_pause_or_cancel() {
        assert!(Authorized.can_transition_to(&Paused));
        assert!(Authorized.can_transition_to(&Cancelled));
        assert!(!Authorized.can_transition_to(&Pending));
    }

    #[test]
    fn cancelled_is_terminal() {
        assert!(Cancelled.is_terminal());
        for target in SubscriptionStatus::ALL {
            assert!(Cancelled.transition_to(target).is_err());
        }
    }

    #[test]
    fn toggle_flips_authorized_and_paused() {
        assert_eq!(Authorized.toggled(), Ok(Paused));
        assert_eq!(Paused.toggled(), Ok(Authorized));
    }

    #[test]
    fn toggle_rejects_pending_and_cancelled() {
        for status in [Pending, Cancelled] {
            let err = status.toggled().unwrap_err();
            assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        }
    }

    #[test]
    fn unknown_stored_status_reads_as_authorized() {
        assert_eq!(SubscriptionStatus::from_stored("paused"), Paused);
        assert_eq!(SubscriptionStatus::from_stored("active"), Authorized);
        assert_eq!(SubscriptionStatus::from_stored(""), Authorized);
    }

    #[test]
    fn strict_parse_rejects_unknown() {
        assert!("active".parse::<SubscriptionStatus>().is_err());
        assert_eq!("CANCELLED".parse::<SubscriptionStatus>().unwrap(), Cancelled);
    }

    #[test]
    fn filter_parses_all_and_statuses() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!("".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "paused".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Paused)
        );
        assert!("bogus".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn filter_selects_matching_statuses() {
        let statuses = [Authorized, Paused, Authorized, Cancelled, Pending];
        let count = |f: StatusFilter| statuses.iter().filter(|s| f.matches(**s)).count();
        assert_eq!(count(StatusFilter::All), 5);
        assert_eq!(count(StatusFilter::Only(Authorized)), 2);
        assert_eq!(count(StatusFilter::Only(Paused)), 1);
        assert_eq!(count(StatusFilter::Only(Cancelled)), 1);
        assert_eq!(count(StatusFilter::Only(Pending)), 1);
    }

    #[test]
    fn only_authorized_is_billable() {
        assert!(Authorized.is_billable());
        assert!(!Paused.is_billable());
        assert!(!Pending.is_billable());
    }
}
