//! Order status state machine.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an order is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created at checkout.
    Placed,

    /// Accepted by the seller or paid for.
    Confirmed,

    /// Being prepared.
    Processing,

    /// Packed and awaiting pickup.
    ReadyToShip,

    /// Handed to the carrier.
    Shipped,

    /// With the courier for the last mile.
    OutForDelivery,

    /// Received by the buyer.
    Delivered,

    /// Cancelled by buyer or seller before shipping.
    Cancelled,

    /// Sent back after delivery.
    Returned,
}

/// Who is acting on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actor {
    /// The user who placed the order.
    Buyer,

    /// The user whose products the order holds.
    Seller,
}

/// Edges allowed outside of cancellation. Anything not listed is rejected.
const FORWARD_TRANSITIONS: &[(OrderStatus, OrderStatus)] = &[
    (OrderStatus::Placed, OrderStatus::Confirmed),
    (OrderStatus::Confirmed, OrderStatus::Processing),
    (OrderStatus::Processing, OrderStatus::ReadyToShip),
    (OrderStatus::ReadyToShip, OrderStatus::Shipped),
    (OrderStatus::Shipped, OrderStatus::OutForDelivery),
    (OrderStatus::OutForDelivery, OrderStatus::Delivered),
    (OrderStatus::Delivered, OrderStatus::Returned),
];

/// A transition that was refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    /// The actor may not move an order to this status.
    #[error("{actor} may not set an order to {to}")]
    NotPermitted {
        /// Who attempted the transition.
        actor: Actor,

        /// Requested status.
        to: OrderStatus,
    },

    /// The transition is not in the allowed table.
    #[error("cannot move an order from {from} to {to}")]
    Illegal {
        /// Current status.
        from: OrderStatus,

        /// Requested status.
        to: OrderStatus,
    },
}

/// Unknown status name.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown order status \"{0}\"")]
pub struct ParseOrderStatusError(pub String);

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Placed,
        Self::Confirmed,
        Self::Processing,
        Self::ReadyToShip,
        Self::Shipped,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Cancelled,
        Self::Returned,
    ];

    /// Stored and wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Placed => "placed",
            Self::Confirmed => "confirmed",
            Self::Processing => "processing",
            Self::ReadyToShip => "ready_to_ship",
            Self::Shipped => "shipped",
            Self::OutForDelivery => "out_for_delivery",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }

    /// Orders can be cancelled until they leave the seller.
    pub fn is_cancellable(self) -> bool {
        matches!(
            self,
            Self::Placed | Self::Confirmed | Self::Processing | Self::ReadyToShip
        )
    }

    /// Whether the table allows `self -> to`, ignoring who is acting.
    pub fn can_transition_to(self, to: Self) -> bool {
        if to == Self::Cancelled {
            return self.is_cancellable();
        }

        FORWARD_TRANSITIONS.contains(&(self, to))
    }

    /// Validate a transition requested by `actor`.
    ///
    /// Buyers may only cancel. Sellers may cancel or follow the forward table.
    ///
    /// # Errors
    ///
    /// - [`TransitionError::NotPermitted`] when a buyer requests anything but cancellation.
    /// - [`TransitionError::Illegal`] when the table has no such edge.
    pub fn transition(self, to: Self, actor: Actor) -> Result<Self, TransitionError> {
        if to != Self::Cancelled && actor != Actor::Seller {
            return Err(TransitionError::NotPermitted { actor, to });
        }

        if !self.can_transition_to(to) {
            return Err(TransitionError::Illegal { from: self, to });
        }

        Ok(to)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| ParseOrderStatusError(value.to_string()))
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Buyer => "buyer",
            Self::Seller => "seller",
        })
    }
}
