//! PostgreSQL-backed `CourtRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{BlockOutcome, CourtRepository, CourtRepositoryError};
use crate::domain::{BlockedSlot, BlockedSlotId, Court, CourtId, VenueId};

use super::diesel_helpers::{CorruptRow, map_diesel_error, map_pool_error};
use super::models::{BlockedSlotRow, CourtRecord, CourtRow};
use super::pool::{DbPool, PoolError};
use super::schema::{blocked_slots, courts};
use super::slot_queries::{lock_court, overlapping_bookings};

/// Diesel-backed implementation of the `CourtRepository` port.
#[derive(Clone)]
pub struct DieselCourtRepository {
    pool: DbPool,
}

impl DieselCourtRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CourtRepositoryError {
    map_pool_error(error, CourtRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CourtRepositoryError {
    map_diesel_error(error, CourtRepositoryError::query, CourtRepositoryError::connection)
}

fn corrupt(error: CorruptRow) -> CourtRepositoryError {
    CourtRepositoryError::query(error.to_string())
}

#[async_trait]
impl CourtRepository for DieselCourtRepository {
    async fn create(&self, court: &Court) -> Result<(), CourtRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(courts::table)
            .values(CourtRecord::from(court))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(&self, court: &Court) -> Result<(), CourtRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(courts::table.find(court.id.as_uuid()))
            .set(CourtRecord::from(court))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        if updated == 0 {
            return Err(CourtRepositoryError::query("court not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &CourtId) -> Result<Option<Court>, CourtRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<CourtRow> = courts::table
            .find(id.as_uuid())
            .select(CourtRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Court::try_from).transpose().map_err(corrupt)
    }

    async fn list_by_venue(
        &self,
        venue_id: &VenueId,
        include_inactive: bool,
    ) -> Result<Vec<Court>, CourtRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = courts::table
            .filter(courts::venue_id.eq(venue_id.as_uuid()))
            .into_boxed();
        if !include_inactive {
            query = query.filter(courts::active.eq(true));
        }
        let rows: Vec<CourtRow> = query
            .order((courts::name, courts::id))
            .select(CourtRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(Court::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)
    }

    async fn insert_block_if_free(
        &self,
        block: &BlockedSlot,
        hold_cutoff: DateTime<Utc>,
    ) -> Result<BlockOutcome, CourtRepositoryError> {
        let row = BlockedSlotRow::from(block);
        let window = block.window;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction(|conn| {
            async move {
                if !lock_court(conn, row.court_id).await? {
                    return Err(diesel::result::Error::NotFound);
                }
                let clashes =
                    overlapping_bookings(conn, row.court_id, &window, hold_cutoff, None).await?;
                if clashes > 0 {
                    return Ok(BlockOutcome::Conflict);
                }
                diesel::insert_into(blocked_slots::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(BlockOutcome::Inserted)
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn find_block(
        &self,
        id: &BlockedSlotId,
    ) -> Result<Option<BlockedSlot>, CourtRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<BlockedSlotRow> = blocked_slots::table
            .find(id.as_uuid())
            .select(BlockedSlotRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(BlockedSlot::try_from).transpose().map_err(corrupt)
    }

    async fn delete_block(&self, id: &BlockedSlotId) -> Result<bool, CourtRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(blocked_slots::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn blocks_on(
        &self,
        court_id: &CourtId,
        date: NaiveDate,
    ) -> Result<Vec<BlockedSlot>, CourtRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<BlockedSlotRow> = blocked_slots::table
            .filter(blocked_slots::court_id.eq(court_id.as_uuid()))
            .filter(blocked_slots::slot_date.eq(date))
            .order(blocked_slots::start_hour)
            .select(BlockedSlotRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(BlockedSlot::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)
    }
}
