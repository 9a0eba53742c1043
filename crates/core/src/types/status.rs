//! Order fulfillment status state machine.
//!
//! Orders move through a fixed set of states:
//!
//! ```text
//! Preparing ──> Ready ──> Completed
//!     │           │  └──> Received
//!     └──> Cancelled <───┘
//! ```
//!
//! `Completed`, `Received`, and `Cancelled` are terminal. Any transition
//! not listed above is rejected with [`TransitionError::NotAllowed`].

use serde::{Deserialize, Serialize};

/// Fulfillment status of a placed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// The order has been placed and the kitchen is working on it.
    #[default]
    Preparing,
    /// The order is ready for pickup at the counter.
    Ready,
    /// The order was handed out and closed by staff.
    Completed,
    /// The customer confirmed receiving the order.
    Received,
    /// The order was cancelled by staff.
    Cancelled,
}

/// Error returned by [`OrderStatus::transition_to`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// The requested transition is not in the allowed table.
    #[error("cannot change order status from '{from}' to '{to}'")]
    NotAllowed {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },
}

/// Error returned when parsing an [`OrderStatus`] from a string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct StatusParseError(pub String);

impl OrderStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Preparing,
        Self::Ready,
        Self::Completed,
        Self::Received,
        Self::Cancelled,
    ];

    /// Statuses a staff member may move an order to from `self`.
    ///
    /// This is the single source of truth for the transition table; terminal
    /// states return an empty slice.
    #[must_use]
    pub const fn allowed_transitions(self) -> &'static [Self] {
        match self {
            Self::Preparing => &[Self::Ready, Self::Cancelled],
            Self::Ready => &[Self::Completed, Self::Received, Self::Cancelled],
            Self::Completed | Self::Received | Self::Cancelled => &[],
        }
    }

    /// Whether this status permits no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Validate a transition from `self` to `to`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::NotAllowed`] (naming both statuses) if the
    /// pair is not in the transition table.
    pub fn transition_to(self, to: Self) -> Result<Self, TransitionError> {
        if self.allowed_transitions().contains(&to) {
            Ok(to)
        } else {
            Err(TransitionError::NotAllowed { from: self, to })
        }
    }

    /// Database/JSON string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preparing => "Preparing",
            Self::Ready => "Ready",
            Self::Completed => "Completed",
            Self::Received => "Received",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Preparing" => Ok(Self::Preparing),
            "Ready" => Ok(Self::Ready),
            "Completed" => Ok(Self::Completed),
            "Received" => Ok(Self::Received),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(StatusParseError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preparing_transitions() {
        assert_eq!(
            OrderStatus::Preparing.transition_to(OrderStatus::Ready),
            Ok(OrderStatus::Ready)
        );
        assert_eq!(
            OrderStatus::Preparing.transition_to(OrderStatus::Cancelled),
            Ok(OrderStatus::Cancelled)
        );
    }

    #[test]
    fn test_ready_transitions() {
        for to in [
            OrderStatus::Completed,
            OrderStatus::Received,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(OrderStatus::Ready.transition_to(to), Ok(to));
        }
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for from in [
            OrderStatus::Completed,
            OrderStatus::Received,
            OrderStatus::Cancelled,
        ] {
            assert!(from.is_terminal());
            for to in OrderStatus::ALL {
                assert!(from.transition_to(to).is_err());
            }
        }
    }

    // Exhaustive check: exactly the pairs in the table succeed.
    #[test]
    fn test_transition_table_is_exhaustive() {
        let allowed = [
            (OrderStatus::Preparing, OrderStatus::Ready),
            (OrderStatus::Preparing, OrderStatus::Cancelled),
            (OrderStatus::Ready, OrderStatus::Completed),
            (OrderStatus::Ready, OrderStatus::Received),
            (OrderStatus::Ready, OrderStatus::Cancelled),
        ];

        for from in OrderStatus::ALL {
            for to in OrderStatus::ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(
                    from.transition_to(to).is_ok(),
                    expected,
                    "transition {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_rejection_names_both_statuses() {
        let err = OrderStatus::Ready
            .transition_to(OrderStatus::Preparing)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Ready"));
        assert!(msg.contains("Preparing"));
    }

    #[test]
    fn test_str_roundtrip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("Shipped".parse::<OrderStatus>().is_err());
    }
}
