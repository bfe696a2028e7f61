//! PostgreSQL-backed `BookingRepository` implementation using Diesel ORM.
//!
//! `reserve` and `confirm` lock the court row before checking for overlaps,
//! so two requests for the same court run one after the other and the
//! second sees the first one's booking.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{
    BookingRepository, BookingRepositoryError, BookingTarget, BookingView, ConfirmOutcome,
    ReserveOutcome,
};
use crate::domain::{
    Booking, BookingFilter, BookingId, BookingStatus, CourtId, SlotWindow, Sport, UserId,
    VenueId,
};

use super::diesel_helpers::{
    CorruptRow, TxError, count_to_u64, map_diesel_error, map_pool_error, map_tx_error,
    page_bounds,
};
use super::models::BookingRow;
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, courts, venues};
use super::slot_queries::{active_booking, lock_court, window_is_free};

/// Reason stored on a pending booking whose slot was taken before payment
/// was confirmed.
const SLOT_TAKEN_REASON: &str = "slot no longer available";

/// Diesel-backed implementation of the `BookingRepository` port.
#[derive(Clone)]
pub struct DieselBookingRepository {
    pool: DbPool,
}

impl DieselBookingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> BookingRepositoryError {
    map_pool_error(error, BookingRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> BookingRepositoryError {
    map_diesel_error(error, BookingRepositoryError::query, BookingRepositoryError::connection)
}

fn tx_error(error: TxError) -> BookingRepositoryError {
    map_tx_error(error, BookingRepositoryError::query, BookingRepositoryError::connection)
}

fn corrupt(error: CorruptRow) -> BookingRepositoryError {
    BookingRepositoryError::query(error.to_string())
}

type ViewRow = (BookingRow, String, String, String, Uuid);

fn into_view(
    (row, venue_name, court_name, sport, owner_id): ViewRow,
) -> Result<BookingView, CorruptRow> {
    Ok(BookingView {
        booking: Booking::try_from(row)?,
        sport: sport
            .parse::<Sport>()
            .map_err(|_| CorruptRow::new("sport", &sport))?,
        venue_name,
        court_name,
        venue_owner_id: UserId::from_uuid(owner_id),
    })
}

macro_rules! booking_views {
    () => {
        bookings::table
            .inner_join(courts::table)
            .inner_join(venues::table)
    };
}

macro_rules! filtered_bookings {
    ($filter:expr) => {{
        let filter: &BookingFilter = $filter;
        let mut query = booking_views!().into_boxed();
        if let Some(user_id) = filter.user_id {
            query = query.filter(bookings::user_id.eq(*user_id.as_uuid()));
        }
        if let Some(owner_id) = filter.venue_owner_id {
            query = query.filter(venues::owner_id.eq(*owner_id.as_uuid()));
        }
        if let Some(venue_id) = filter.venue_id {
            query = query.filter(bookings::venue_id.eq(*venue_id.as_uuid()));
        }
        if let Some(status) = filter.status {
            query = query.filter(bookings::status.eq(status.as_str()));
        }
        if let Some(from) = filter.from_date {
            query = query.filter(bookings::slot_date.ge(from));
        }
        if let Some(before) = filter.before_date {
            query = query.filter(bookings::slot_date.lt(before));
        }
        query
    }};
}

#[async_trait]
impl BookingRepository for DieselBookingRepository {
    async fn reserve(
        &self,
        booking: &Booking,
        hold_cutoff: DateTime<Utc>,
    ) -> Result<ReserveOutcome, BookingRepositoryError> {
        let row = BookingRow::from(booking);
        let window = booking.window;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction(|conn| {
            async move {
                if !lock_court(conn, row.court_id).await? {
                    return Err(diesel::result::Error::NotFound);
                }
                if !window_is_free(conn, row.court_id, &window, hold_cutoff, None).await? {
                    return Ok(ReserveOutcome::SlotTaken);
                }
                diesel::insert_into(bookings::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(ReserveOutcome::Reserved)
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn confirm(
        &self,
        id: &BookingId,
        hold_cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<ConfirmOutcome, BookingRepositoryError> {
        let booking_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction(|conn| {
            async move {
                let court_id: Option<Uuid> = bookings::table
                    .find(booking_id)
                    .select(bookings::court_id)
                    .first(conn)
                    .await
                    .optional()?;
                let Some(court_id) = court_id else {
                    return Ok(ConfirmOutcome::Missing);
                };
                lock_court(conn, court_id).await?;
                let row: BookingRow = bookings::table
                    .find(booking_id)
                    .select(BookingRow::as_select())
                    .for_update()
                    .first(conn)
                    .await?;

                match row.status()? {
                    BookingStatus::Confirmed => {
                        return Ok(ConfirmOutcome::AlreadyConfirmed(Booking::try_from(row)?));
                    }
                    BookingStatus::Cancelled | BookingStatus::Completed => {
                        return Ok(ConfirmOutcome::NotPending(Booking::try_from(row)?));
                    }
                    BookingStatus::Pending => {}
                }

                let window = row.window()?;
                let free =
                    window_is_free(conn, court_id, &window, hold_cutoff, Some(booking_id)).await?;
                let (status, reason) = if free {
                    (BookingStatus::Confirmed, None)
                } else {
                    (BookingStatus::Cancelled, Some(SLOT_TAKEN_REASON))
                };
                let updated: BookingRow = diesel::update(bookings::table.find(booking_id))
                    .set((
                        bookings::status.eq(status.as_str()),
                        bookings::cancellation_reason.eq(reason),
                        bookings::updated_at.eq(now),
                    ))
                    .returning(BookingRow::as_returning())
                    .get_result(conn)
                    .await?;
                let booking = Booking::try_from(updated)?;
                Ok(if free {
                    ConfirmOutcome::Confirmed(booking)
                } else {
                    ConfirmOutcome::SlotTaken(booking)
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(tx_error)
    }

    async fn find(&self, id: &BookingId) -> Result<Option<BookingView>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ViewRow> = booking_views!()
            .filter(bookings::id.eq(id.as_uuid()))
            .select((
                BookingRow::as_select(),
                venues::name,
                courts::name,
                courts::sport,
                venues::owner_id,
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(into_view).transpose().map_err(corrupt)
    }

    async fn transition(
        &self,
        id: &BookingId,
        from: BookingStatus,
        to: BookingStatus,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<BookingRow> = diesel::update(
            bookings::table
                .find(id.as_uuid())
                .filter(bookings::status.eq(from.as_str())),
        )
        .set((
            bookings::status.eq(to.as_str()),
            bookings::cancellation_reason.eq(reason),
            bookings::updated_at.eq(now),
        ))
        .returning(BookingRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(diesel_error)?;
        row.map(Booking::try_from).transpose().map_err(corrupt)
    }

    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<(Vec<BookingView>, u64), BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = filtered_bookings!(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let (limit, offset) = page_bounds(page);
        let rows: Vec<ViewRow> = filtered_bookings!(filter)
            .order((
                bookings::slot_date.asc(),
                bookings::start_hour.asc(),
                bookings::id,
            ))
            .limit(limit)
            .offset(offset)
            .select((
                BookingRow::as_select(),
                venues::name,
                courts::name,
                courts::sport,
                venues::owner_id,
            ))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let views = rows
            .into_iter()
            .map(into_view)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;
        Ok((views, count_to_u64(total)))
    }

    async fn active_windows(
        &self,
        court_id: &CourtId,
        date: NaiveDate,
        hold_cutoff: DateTime<Utc>,
    ) -> Result<Vec<SlotWindow>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::court_id.eq(court_id.as_uuid()))
            .filter(bookings::slot_date.eq(date))
            .filter(active_booking!(hold_cutoff))
            .order(bookings::start_hour)
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.iter()
            .map(BookingRow::window)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)
    }

    async fn count_upcoming_active(
        &self,
        target: BookingTarget,
        from_date: NaiveDate,
        hold_cutoff: DateTime<Utc>,
    ) -> Result<u64, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = bookings::table
            .filter(bookings::slot_date.ge(from_date))
            .filter(active_booking!(hold_cutoff))
            .into_boxed();
        query = match target {
            BookingTarget::Venue(venue_id) => {
                query.filter(bookings::venue_id.eq(*venue_id.as_uuid()))
            }
            BookingTarget::Court(court_id) => {
                query.filter(bookings::court_id.eq(*court_id.as_uuid()))
            }
        };
        let count: i64 = query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(count_to_u64(count))
    }

    async fn find_by_user_and_venue(
        &self,
        user_id: &UserId,
        venue_id: &VenueId,
    ) -> Result<Vec<Booking>, BookingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<BookingRow> = bookings::table
            .filter(bookings::user_id.eq(user_id.as_uuid()))
            .filter(bookings::venue_id.eq(venue_id.as_uuid()))
            .order((bookings::slot_date.desc(), bookings::start_hour.desc()))
            .select(BookingRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        rows.into_iter()
            .map(Booking::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn booking_row() -> BookingRow {
        let stamp = Utc
            .with_ymd_and_hms(2026, 4, 10, 8, 0, 0)
            .single()
            .expect("timestamp");
        BookingRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            court_id: Uuid::new_v4(),
            venue_id: Uuid::new_v4(),
            slot_date: NaiveDate::from_ymd_opt(2026, 4, 12).expect("date"),
            start_hour: 6,
            end_hour: 8,
            total_minor: 120_000,
            status: "pending".into(),
            cancellation_reason: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    #[rstest]
    fn views_carry_display_names() {
        let owner = Uuid::new_v4();
        let view = into_view((
            booking_row(),
            "Baseline Arena".into(),
            "Court 2".into(),
            "badminton".into(),
            owner,
        ))
        .expect("view");
        assert_eq!(view.sport, Sport::Badminton);
        assert_eq!(view.venue_owner_id, UserId::from_uuid(owner));
        assert_eq!(view.facts().court_name, "Court 2");
    }

    #[rstest]
    fn views_reject_unknown_sports() {
        let row = (
            booking_row(),
            "Baseline Arena".into(),
            "Court 2".into(),
            "curling".into(),
            Uuid::new_v4(),
        );
        assert!(into_view(row).is_err());
    }

    #[rstest]
    fn corrupt_rows_inside_transactions_surface_as_query_errors() {
        let error = tx_error(TxError::Corrupt(CorruptRow::new("status", "on_hold")));
        assert!(matches!(error, BookingRepositoryError::Query { .. }));
    }
}
