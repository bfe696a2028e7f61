//! Port abstraction for the third-party payment gateway.
//!
//! Amounts are exchanged in minor units. Signature checks are part of the
//! port because only the adapter holds the gateway secrets.

use async_trait::async_trait;

use crate::domain::{CheckoutConfirmation, Error, GatewayEvent, GatewayOrder, GatewayRefund, Money};

use super::define_port_error;

define_port_error! {
    /// Errors raised by payment gateway adapters.
    pub enum PaymentGatewayError {
        /// The gateway could not be reached or answered with a server error.
        Unavailable { message: String } => "payment gateway unavailable: {message}",
        /// The gateway refused the request.
        Rejected { message: String } => "payment gateway rejected the request: {message}",
        /// A gateway payload could not be decoded.
        InvalidPayload { message: String } => "payment gateway payload invalid: {message}",
        /// A webhook signature did not match.
        InvalidSignature => "payment gateway signature mismatch",
    }
}

impl From<PaymentGatewayError> for Error {
    fn from(value: PaymentGatewayError) -> Self {
        match value {
            PaymentGatewayError::Unavailable { message } => {
                Error::service_unavailable(format!("payment gateway unavailable: {message}"))
            }
            PaymentGatewayError::Rejected { message } => {
                Error::service_unavailable(format!(
                    "payment gateway rejected the request: {message}"
                ))
            }
            PaymentGatewayError::InvalidPayload { message } => {
                Error::invalid_request(format!("invalid gateway payload: {message}"))
            }
            PaymentGatewayError::InvalidSignature => {
                Error::unauthorized("invalid webhook signature")
            }
        }
    }
}

/// Razorpay-style order, refund and signature contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id handed to checkout clients.
    fn key_id(&self) -> String;

    /// Create an order for `amount`; `receipt` is the booking id.
    async fn create_order(
        &self,
        amount: Money,
        currency: &str,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentGatewayError>;

    /// Refund `amount` of a captured payment.
    async fn refund(
        &self,
        payment_id: &str,
        amount: Money,
    ) -> Result<GatewayRefund, PaymentGatewayError>;

    /// Check the checkout callback signature.
    fn verify_checkout(&self, confirmation: &CheckoutConfirmation) -> bool;

    /// Check a webhook signature and decode its event.
    fn parse_webhook(&self, body: &[u8], signature: &str)
    -> Result<GatewayEvent, PaymentGatewayError>;
}
