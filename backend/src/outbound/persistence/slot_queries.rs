//! Court locking and overlap checks shared by booking and block writes.
//!
//! Callers run these inside a transaction: [`lock_court`] takes a row lock
//! on the court so concurrent writers for the same court queue behind it,
//! and the overlap counts then see every committed competitor.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::SlotWindow;

use super::diesel_helpers::hour_to_db;
use super::schema::{blocked_slots, bookings, courts};

/// Filter expression for bookings holding their slot.
///
/// Confirmed bookings always do; pending ones only while their hold, which
/// started after the given cutoff, is still running.
macro_rules! active_booking {
    ($hold_cutoff:expr) => {
        $crate::outbound::persistence::schema::bookings::status
            .eq($crate::domain::BookingStatus::Confirmed.as_str())
            .or($crate::outbound::persistence::schema::bookings::status
                .eq($crate::domain::BookingStatus::Pending.as_str())
                .and($crate::outbound::persistence::schema::bookings::created_at.gt($hold_cutoff)))
    };
}
pub(crate) use active_booking;

/// Lock the court row for the rest of the transaction.
///
/// Returns `false` when the court does not exist.
pub(crate) async fn lock_court(
    conn: &mut AsyncPgConnection,
    court_id: Uuid,
) -> Result<bool, DieselError> {
    let locked: Option<Uuid> = courts::table
        .find(court_id)
        .select(courts::id)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    Ok(locked.is_some())
}

/// Active bookings on `court_id` overlapping `window`.
pub(crate) async fn overlapping_bookings(
    conn: &mut AsyncPgConnection,
    court_id: Uuid,
    window: &SlotWindow,
    hold_cutoff: DateTime<Utc>,
    excluding: Option<Uuid>,
) -> Result<i64, DieselError> {
    let mut query = bookings::table
        .filter(bookings::court_id.eq(court_id))
        .filter(bookings::slot_date.eq(window.date))
        .filter(bookings::start_hour.lt(hour_to_db(window.end)))
        .filter(bookings::end_hour.gt(hour_to_db(window.start)))
        .filter(active_booking!(hold_cutoff))
        .into_boxed();
    if let Some(id) = excluding {
        query = query.filter(bookings::id.ne(id));
    }
    query.count().get_result(conn).await
}

/// Blocks on `court_id` overlapping `window`.
pub(crate) async fn overlapping_blocks(
    conn: &mut AsyncPgConnection,
    court_id: Uuid,
    window: &SlotWindow,
) -> Result<i64, DieselError> {
    blocked_slots::table
        .filter(blocked_slots::court_id.eq(court_id))
        .filter(blocked_slots::slot_date.eq(window.date))
        .filter(blocked_slots::start_hour.lt(hour_to_db(window.end)))
        .filter(blocked_slots::end_hour.gt(hour_to_db(window.start)))
        .count()
        .get_result(conn)
        .await
}

/// Whether `window` is free of active bookings and blocks.
pub(crate) async fn window_is_free(
    conn: &mut AsyncPgConnection,
    court_id: Uuid,
    window: &SlotWindow,
    hold_cutoff: DateTime<Utc>,
    excluding: Option<Uuid>,
) -> Result<bool, DieselError> {
    let bookings = overlapping_bookings(conn, court_id, window, hold_cutoff, excluding).await?;
    if bookings > 0 {
        return Ok(false);
    }
    Ok(overlapping_blocks(conn, court_id, window).await? == 0)
}
