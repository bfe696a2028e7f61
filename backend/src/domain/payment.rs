//! Payments, refunds and gateway signatures.
//!
//! Money moves through a Razorpay-compatible gateway. The service stores an
//! order per booking, marks it captured when the client callback or the
//! webhook proves payment, and records refunds issued on cancellation.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::domain::money::Money;
use crate::domain::{BookingId, PaymentId, RefundId};

type HmacSha256 = Hmac<Sha256>;

/// State of the payment attached to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Order created, not paid.
    Created,
    /// Funds captured.
    Captured,
    /// Payment attempt failed.
    Failed,
    /// Fully refunded.
    Refunded,
    /// Part of the amount refunded.
    PartiallyRefunded,
}

impl PaymentStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Captured => "captured",
            Self::Failed => "failed",
            Self::Refunded => "refunded",
            Self::PartiallyRefunded => "partially_refunded",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "created" => Some(Self::Created),
            "captured" => Some(Self::Captured),
            "failed" => Some(Self::Failed),
            "refunded" => Some(Self::Refunded),
            "partially_refunded" => Some(Self::PartiallyRefunded),
            _ => None,
        }
    }
}

/// Gateway order stored against a booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    /// Identifier.
    pub id: PaymentId,
    /// Booking paid for.
    pub booking_id: BookingId,
    /// Gateway order id.
    pub gateway_order_id: String,
    /// Gateway payment id once known.
    pub gateway_payment_id: Option<String>,
    /// Amount charged.
    pub amount: Money,
    /// ISO currency code.
    pub currency: String,
    /// Payment state.
    pub status: PaymentStatus,
    /// Gateway error text for failed payments.
    pub failure_reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Status after refunding `refunded` in total.
    #[must_use]
    pub fn status_after_refund(&self, refunded: Money) -> PaymentStatus {
        if refunded >= self.amount {
            PaymentStatus::Refunded
        } else {
            PaymentStatus::PartiallyRefunded
        }
    }
}

/// State of a refund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    /// Requested, waiting for the gateway.
    Pending,
    /// Settled.
    Processed,
    /// Rejected by the gateway.
    Failed,
}

impl RefundStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processed => "processed",
            Self::Failed => "failed",
        }
    }

    /// Parse storage or gateway text.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" | "created" => Some(Self::Pending),
            "processed" => Some(Self::Processed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Refund against a captured payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Refund {
    /// Identifier.
    pub id: RefundId,
    /// Payment refunded.
    pub payment_id: PaymentId,
    /// Gateway refund id once issued.
    pub gateway_refund_id: Option<String>,
    /// Amount returned.
    pub amount: Money,
    /// Refund state.
    pub status: RefundStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Order returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    /// Gateway order id.
    pub order_id: String,
    /// Amount in minor units.
    pub amount: Money,
    /// Currency.
    pub currency: String,
}

/// Refund returned by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRefund {
    /// Gateway refund id.
    pub refund_id: String,
    /// Amount refunded.
    pub amount: Money,
    /// Gateway status.
    pub status: RefundStatus,
}

/// Data the client needs to open the gateway checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    /// Gateway order id.
    pub order_id: String,
    /// Amount in minor units.
    pub amount: Money,
    /// Currency.
    pub currency: String,
    /// Public key id.
    pub key_id: String,
}

/// Client callback after checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfirmation {
    /// Gateway order id.
    pub order_id: String,
    /// Gateway payment id.
    pub payment_id: String,
    /// Hex HMAC of `order_id|payment_id`.
    pub signature: String,
}

impl CheckoutConfirmation {
    /// Message signed by the gateway.
    #[must_use]
    pub fn signed_message(&self) -> String {
        format!("{}|{}", self.order_id, self.payment_id)
    }
}

/// Decoded webhook notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// Funds captured for an order.
    PaymentCaptured {
        /// Gateway order id.
        order_id: String,
        /// Gateway payment id.
        payment_id: String,
    },
    /// Payment attempt failed.
    PaymentFailed {
        /// Gateway order id.
        order_id: String,
        /// Gateway payment id.
        payment_id: String,
        /// Gateway error description.
        reason: Option<String>,
    },
    /// Refund settled.
    RefundProcessed {
        /// Gateway refund id.
        refund_id: String,
    },
    /// Refund rejected.
    RefundFailed {
        /// Gateway refund id.
        refund_id: String,
    },
    /// Event the service does not act on.
    Ignored {
        /// Event name.
        event: String,
    },
}

/// Hex HMAC-SHA256 of `message`.
///
/// # Examples
/// ```
/// use courtside::domain::{hmac_sha256_hex, verify_hmac_sha256_hex};
///
/// let signature = hmac_sha256_hex(b"secret", b"order_1|pay_1");
/// assert!(verify_hmac_sha256_hex(b"secret", b"order_1|pay_1", &signature));
/// assert!(!verify_hmac_sha256_hex(b"other", b"order_1|pay_1", &signature));
/// ```
#[must_use]
pub fn hmac_sha256_hex(secret: &[u8], message: &[u8]) -> String {
    HmacSha256::new_from_slice(secret)
        .map(|mut mac| {
            mac.update(message);
            hex::encode(mac.finalize().into_bytes())
        })
        .unwrap_or_default()
}

/// Constant-time check of a hex HMAC-SHA256 signature.
#[must_use]
pub fn verify_hmac_sha256_hex(secret: &[u8], message: &[u8], signature_hex: &str) -> bool {
    let Ok(expected) = hex::decode(signature_hex.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret) else {
        return false;
    };
    mac.update(message);
    mac.verify_slice(&expected).is_ok()
}
