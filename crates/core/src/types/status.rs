//! Status enums for orders.
//!
//! The API reports an order's state as two booleans (`isPaid`,
//! `isDelivered`) plus a payment method string. These enums give those
//! values names and display labels.

use core::fmt;

use serde::{Deserialize, Serialize};

/// How an order is paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    /// Card payment through the hosted checkout session.
    ///
    /// The checkout form names this option `online`.
    #[serde(alias = "online")]
    Card,
}

impl PaymentMethod {
    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cash => "Cash on Delivery",
            Self::Card => "Online Payment",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an order has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
}

impl PaymentStatus {
    /// Status from the API's `isPaid` flag.
    #[must_use]
    pub const fn from_flag(is_paid: bool) -> Self {
        if is_paid { Self::Paid } else { Self::Unpaid }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Unpaid => "Unpaid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether an order has been delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DeliveryStatus {
    #[default]
    Processing,
    Delivered,
}

impl DeliveryStatus {
    /// Status from the API's `isDelivered` flag.
    #[must_use]
    pub const fn from_flag(is_delivered: bool) -> Self {
        if is_delivered {
            Self::Delivered
        } else {
            Self::Processing
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Delivered => "Delivered",
            Self::Processing => "Processing",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_serde() {
        let method: PaymentMethod = serde_json::from_str("\"card\"").unwrap();
        assert_eq!(method, PaymentMethod::Card);
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");

        let method: PaymentMethod = serde_json::from_str("\"online\"").unwrap();
        assert_eq!(method, PaymentMethod::Card);
    }

    #[test]
    fn test_status_from_flags() {
        assert_eq!(PaymentStatus::from_flag(true).label(), "Paid");
        assert_eq!(PaymentStatus::from_flag(false).label(), "Unpaid");
        assert_eq!(DeliveryStatus::from_flag(true).to_string(), "Delivered");
        assert_eq!(DeliveryStatus::from_flag(false).to_string(), "Processing");
    }
}
