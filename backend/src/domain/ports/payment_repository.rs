//! Port abstraction for payments and refunds.

use async_trait::async_trait;

use crate::domain::{BookingId, Error, Payment, PaymentId, Refund};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by payment adapters.
    pub enum PaymentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "payment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "payment repository query failed: {message}",
    }
}

impl From<PaymentRepositoryError> for Error {
    fn from(value: PaymentRepositoryError) -> Self {
        match value {
            PaymentRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("payment repository unavailable: {message}"))
            }
            PaymentRepositoryError::Query { message } => {
                Error::internal(format!("payment repository error: {message}"))
            }
        }
    }
}

/// Payment and refund storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Insert a payment.
    async fn create(&self, payment: &Payment) -> Result<(), PaymentRepositoryError>;

    /// Persist every mutable field of a payment.
    async fn update(&self, payment: &Payment) -> Result<(), PaymentRepositoryError>;

    /// Fetch a payment by id.
    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// Payment attached to a booking.
    async fn find_by_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// Payment for a gateway order id.
    async fn find_by_order(&self, order_id: &str)
    -> Result<Option<Payment>, PaymentRepositoryError>;

    /// Insert a refund.
    async fn create_refund(&self, refund: &Refund) -> Result<(), PaymentRepositoryError>;

    /// Persist every mutable field of a refund.
    async fn update_refund(&self, refund: &Refund) -> Result<(), PaymentRepositoryError>;

    /// Refund for a gateway refund id.
    async fn find_refund_by_gateway_id(
        &self,
        refund_id: &str,
    ) -> Result<Option<Refund>, PaymentRepositoryError>;
}
