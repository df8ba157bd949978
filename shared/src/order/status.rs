//! Order status and its transition graph

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lifecycle status of an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(
    feature = "db",
    sqlx(type_name = "order_status", rename_all = "SCREAMING_SNAKE_CASE")
)]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    OutForDelivery,
    Delivered,
    Canceled,
}

/// Rejected status change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot change order status from {from} to {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::OutForDelivery,
        Self::Delivered,
        Self::Canceled,
    ];

    /// Statuses reachable in one step from `self`
    pub const fn allowed_transitions(self) -> &'static [OrderStatus] {
        match self {
            Self::Pending => &[Self::Confirmed, Self::Canceled],
            Self::Confirmed => &[Self::Preparing, Self::Canceled],
            Self::Preparing => &[Self::OutForDelivery, Self::Canceled],
            Self::OutForDelivery => &[Self::Delivered],
            Self::Delivered | Self::Canceled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }

    /// Validate a status change, returning the new status on success
    pub fn transition_to(self, next: OrderStatus) -> Result<OrderStatus, InvalidTransition> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub const fn is_terminal(self) -> bool {
        self.allowed_transitions().is_empty()
    }

    /// Wire name, identical to the serialized form
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::OutForDelivery => "OUT_FOR_DELIVERY",
            Self::Delivered => "DELIVERED",
            Self::Canceled => "CANCELED",
        }
    }

    /// Human-readable label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Preparing => "Preparing",
            Self::OutForDelivery => "Out for delivery",
            Self::Delivered => "Delivered",
            Self::Canceled => "Canceled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
