//! Port abstraction for booking persistence.
//!
//! Adapters must run [`BookingRepository::reserve`] and
//! [`BookingRepository::confirm`] in a single transaction that locks the
//! court row first, so concurrent requests for the same court serialise and
//! the overlap check cannot race with the insert.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use pagination::PageRequest;

use crate::domain::{
    Booking, BookingFacts, BookingFilter, BookingId, BookingStatus, CourtId, Error, SlotWindow,
    Sport, UserId, VenueId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by booking adapters.
    pub enum BookingRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "booking repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "booking repository query failed: {message}",
    }
}

impl From<BookingRepositoryError> for Error {
    fn from(value: BookingRepositoryError) -> Self {
        match value {
            BookingRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("booking repository unavailable: {message}"))
            }
            BookingRepositoryError::Query { message } => {
                Error::internal(format!("booking repository error: {message}"))
            }
        }
    }
}

/// Result of [`BookingRepository::reserve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReserveOutcome {
    /// The pending booking was inserted.
    Reserved,
    /// An active booking or a block overlaps the window.
    SlotTaken,
}

/// Result of [`BookingRepository::confirm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The pending booking is now confirmed.
    Confirmed(Booking),
    /// The booking was confirmed by an earlier call.
    AlreadyConfirmed(Booking),
    /// Another booking took the slot while this one waited for payment; the
    /// returned booking is now cancelled.
    SlotTaken(Booking),
    /// The booking is cancelled or completed.
    NotPending(Booking),
    /// No booking with that id.
    Missing,
}

/// Which bookings [`BookingRepository::count_upcoming_active`] counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingTarget {
    /// Every court of a venue.
    Venue(VenueId),
    /// A single court.
    Court(CourtId),
}

/// Booking joined with the names shown to people.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingView {
    /// The booking row.
    pub booking: Booking,
    /// Venue display name.
    pub venue_name: String,
    /// Court display name.
    pub court_name: String,
    /// Court sport.
    pub sport: Sport,
    /// Owner of the venue.
    pub venue_owner_id: UserId,
}

impl BookingView {
    /// Names and slot used when rendering notifications.
    #[must_use]
    pub fn facts(&self) -> BookingFacts {
        BookingFacts {
            venue_name: self.venue_name.clone(),
            court_name: self.court_name.clone(),
            slot: self.booking.window.to_string(),
        }
    }
}

/// Booking storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Lock the court, check `booking.window` against active bookings and
    /// blocks, and insert the pending booking when free.
    async fn reserve(
        &self,
        booking: &Booking,
        hold_cutoff: DateTime<Utc>,
    ) -> Result<ReserveOutcome, BookingRepositoryError>;

    /// Lock the court, re-check the window excluding the booking itself and
    /// move a pending booking to confirmed when still free. A pending
    /// booking whose window was taken meanwhile is cancelled in the same
    /// transaction.
    async fn confirm(
        &self,
        id: &BookingId,
        hold_cutoff: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<ConfirmOutcome, BookingRepositoryError>;

    /// Fetch a booking with display names.
    async fn find(&self, id: &BookingId) -> Result<Option<BookingView>, BookingRepositoryError>;

    /// Compare-and-set the status. Returns `None` when the booking is not in
    /// `from` any more.
    async fn transition(
        &self,
        id: &BookingId,
        from: BookingStatus,
        to: BookingStatus,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, BookingRepositoryError>;

    /// Page through bookings matching `filter`, soonest slot first.
    async fn list(
        &self,
        filter: &BookingFilter,
        page: PageRequest,
    ) -> Result<(Vec<BookingView>, u64), BookingRepositoryError>;

    /// Windows of active bookings on `court_id` for `date`.
    async fn active_windows(
        &self,
        court_id: &CourtId,
        date: NaiveDate,
        hold_cutoff: DateTime<Utc>,
    ) -> Result<Vec<SlotWindow>, BookingRepositoryError>;

    /// Active bookings for `target` on or after `from_date`.
    async fn count_upcoming_active(
        &self,
        target: BookingTarget,
        from_date: NaiveDate,
        hold_cutoff: DateTime<Utc>,
    ) -> Result<u64, BookingRepositoryError>;

    /// Every booking `user_id` made at `venue_id`.
    async fn find_by_user_and_venue(
        &self,
        user_id: &UserId,
        venue_id: &VenueId,
    ) -> Result<Vec<Booking>, BookingRepositoryError>;
}
