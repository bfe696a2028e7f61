//! PostgreSQL-backed `OtpRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OtpRepository, OtpRepositoryError};
use crate::domain::{OtpChallenge, OtpChallengeId, OtpPurpose, UserId};

use super::diesel_helpers::{map_diesel_error, map_pool_error};
use super::models::OtpChallengeRow;
use super::pool::{DbPool, PoolError};
use super::schema::otp_challenges;

/// Diesel-backed implementation of the `OtpRepository` port.
#[derive(Clone)]
pub struct DieselOtpRepository {
    pool: DbPool,
}

impl DieselOtpRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> OtpRepositoryError {
    map_pool_error(error, OtpRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> OtpRepositoryError {
    map_diesel_error(error, OtpRepositoryError::query, OtpRepositoryError::connection)
}

#[async_trait]
impl OtpRepository for DieselOtpRepository {
    async fn latest(
        &self,
        user_id: &UserId,
        purpose: OtpPurpose,
    ) -> Result<Option<OtpChallenge>, OtpRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<OtpChallengeRow> = otp_challenges::table
            .filter(otp_challenges::user_id.eq(user_id.as_uuid()))
            .filter(otp_challenges::purpose.eq(purpose.as_str()))
            .order(otp_challenges::created_at.desc())
            .select(OtpChallengeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(OtpChallenge::try_from)
            .transpose()
            .map_err(|err| OtpRepositoryError::query(err.to_string()))
    }

    async fn insert(&self, challenge: &OtpChallenge) -> Result<(), OtpRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(otp_challenges::table)
            .values(OtpChallengeRow::from(challenge))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn record_failed_attempt(&self, id: &OtpChallengeId) -> Result<(), OtpRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(otp_challenges::table.find(id.as_uuid()))
            .set(otp_challenges::attempts.eq(otp_challenges::attempts + 1))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn consume(
        &self,
        id: &OtpChallengeId,
        at: DateTime<Utc>,
    ) -> Result<bool, OtpRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(
            otp_challenges::table
                .find(id.as_uuid())
                .filter(otp_challenges::consumed_at.is_null()),
        )
        .set(otp_challenges::consumed_at.eq(at))
        .execute(&mut conn)
        .await
        .map_err(diesel_error)?;
        Ok(updated == 1)
    }
}
