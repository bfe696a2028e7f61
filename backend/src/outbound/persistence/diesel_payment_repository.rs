//! PostgreSQL-backed `PaymentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{BookingId, Payment, PaymentId, Refund};

use super::diesel_helpers::{CorruptRow, map_diesel_error, map_pool_error};
use super::models::{PaymentRow, RefundRow};
use super::pool::{DbPool, PoolError};
use super::schema::{payments, refunds};

/// Diesel-backed implementation of the `PaymentRepository` port.
#[derive(Clone)]
pub struct DieselPaymentRepository {
    pool: DbPool,
}

impl DieselPaymentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> PaymentRepositoryError {
    map_pool_error(error, PaymentRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> PaymentRepositoryError {
    map_diesel_error(error, PaymentRepositoryError::query, PaymentRepositoryError::connection)
}

fn corrupt(error: CorruptRow) -> PaymentRepositoryError {
    PaymentRepositoryError::query(error.to_string())
}

fn require_row(updated: usize, what: &str) -> Result<(), PaymentRepositoryError> {
    if updated == 0 {
        return Err(PaymentRepositoryError::query(format!("{what} not found for update")));
    }
    Ok(())
}

#[async_trait]
impl PaymentRepository for DieselPaymentRepository {
    async fn create(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(payments::table)
            .values(PaymentRow::from(payment))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(payments::table.find(payment.id.as_uuid()))
            .set(PaymentRow::from(payment))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        require_row(updated, "payment")
    }

    async fn find_by_id(&self, id: &PaymentId) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<PaymentRow> = payments::table
            .find(id.as_uuid())
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Payment::try_from).transpose().map_err(corrupt)
    }

    async fn find_by_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<PaymentRow> = payments::table
            .filter(payments::booking_id.eq(booking_id.as_uuid()))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Payment::try_from).transpose().map_err(corrupt)
    }

    async fn find_by_order(
        &self,
        order_id: &str,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<PaymentRow> = payments::table
            .filter(payments::gateway_order_id.eq(order_id))
            .select(PaymentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Payment::try_from).transpose().map_err(corrupt)
    }

    async fn create_refund(&self, refund: &Refund) -> Result<(), PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(refunds::table)
            .values(RefundRow::from(refund))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update_refund(&self, refund: &Refund) -> Result<(), PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(refunds::table.find(refund.id.as_uuid()))
            .set(RefundRow::from(refund))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        require_row(updated, "refund")
    }

    async fn find_refund_by_gateway_id(
        &self,
        refund_id: &str,
    ) -> Result<Option<Refund>, PaymentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<RefundRow> = refunds::table
            .filter(refunds::gateway_refund_id.eq(refund_id))
            .select(RefundRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Refund::try_from).transpose().map_err(corrupt)
    }
}
