//! Driving port for booking and payment use-cases.

use async_trait::async_trait;

use crate::domain::{
    BookingId, BookingRequest, Checkout, CheckoutConfirmation, Error, Principal, Refund,
};

use super::BookingView;

/// A reserved booking with the data the client needs to pay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingCheckout {
    /// The pending booking.
    pub booking: BookingView,
    /// Gateway checkout parameters.
    pub checkout: Checkout,
}

/// A cancelled booking and the refund it triggered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    /// The cancelled booking.
    pub booking: BookingView,
    /// Refund issued for a captured payment.
    pub refund: Option<Refund>,
}

/// What a webhook delivery did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// State changed.
    Applied,
    /// Nothing to do: unknown event, order or refund, or a replay.
    Ignored,
}

/// Booking use-cases that change state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Reserve a slot and open a gateway order.
    async fn create(
        &self,
        principal: &Principal,
        request: BookingRequest,
    ) -> Result<BookingCheckout, Error>;

    /// Apply the client's checkout callback.
    async fn confirm_payment(
        &self,
        principal: &Principal,
        confirmation: CheckoutConfirmation,
    ) -> Result<BookingView, Error>;

    /// Apply a signed gateway webhook.
    async fn handle_webhook(&self, body: &[u8], signature: &str) -> Result<WebhookOutcome, Error>;

    /// Cancel a booking, refunding any captured payment.
    async fn cancel(
        &self,
        principal: &Principal,
        id: &BookingId,
        reason: Option<String>,
    ) -> Result<Cancellation, Error>;

    /// Mark a played booking completed.
    async fn complete(&self, principal: &Principal, id: &BookingId) -> Result<BookingView, Error>;
}
