//! Bookings and their lifecycle.
//!
//! ```text
//! pending ──▶ confirmed ──▶ completed
//!    │            │
//!    └────────────┴──────▶ cancelled
//! ```
//!
//! `cancelled` and `completed` are terminal.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::schedule::{BookingPolicy, OperatingHours, SlotWindow};
use crate::domain::validation::FieldError;
use crate::domain::{BookingId, CourtId, Error, UserId, VenueId};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting payment.
    Pending,
    /// Paid.
    Confirmed,
    /// Cancelled by the booker, an admin or a failed payment.
    Cancelled,
    /// Played.
    Completed,
}

impl BookingStatus {
    /// Every status.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
    ];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Whether the state machine allows `self -> next`.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Cancelled)
                | (Self::Confirmed, Self::Completed | Self::Cancelled)
        )
    }

    /// No further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(FieldError::new(
                "status",
                "invalid_status",
                "status must be pending, confirmed, cancelled or completed",
            )),
        }
    }
}

/// Reservation of a court window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// Identifier.
    pub id: BookingId,
    /// Booker.
    pub user_id: UserId,
    /// Court reserved.
    pub court_id: CourtId,
    /// Venue of the court.
    pub venue_id: VenueId,
    /// Reserved window.
    pub window: SlotWindow,
    /// Price at booking time.
    pub total: Money,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Note supplied on cancellation.
    pub cancellation_reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Whether the booking currently holds its slot.
    ///
    /// Confirmed bookings always do; pending ones only inside the payment
    /// hold window.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>, policy: &BookingPolicy) -> bool {
        match self.status {
            BookingStatus::Confirmed => true,
            BookingStatus::Pending => self.created_at > policy.hold_cutoff(now),
            BookingStatus::Cancelled | BookingStatus::Completed => false,
        }
    }

    /// Start of the slot in UTC.
    #[must_use]
    pub fn starts_at(&self, policy: &BookingPolicy) -> DateTime<Utc> {
        self.window.starts_at(&policy.utc_offset)
    }

    /// End of the slot in UTC.
    #[must_use]
    pub fn ends_at(&self, policy: &BookingPolicy) -> DateTime<Utc> {
        self.window.ends_at(&policy.utc_offset)
    }

    /// Whether the slot has finished.
    #[must_use]
    pub fn has_ended(&self, now: DateTime<Utc>, policy: &BookingPolicy) -> bool {
        self.ends_at(policy) <= now
    }

    /// Whether the booker has played: completed, or confirmed and over.
    #[must_use]
    pub fn counts_as_played(&self, now: DateTime<Utc>, policy: &BookingPolicy) -> bool {
        match self.status {
            BookingStatus::Completed => true,
            BookingStatus::Confirmed => self.has_ended(now, policy),
            BookingStatus::Pending | BookingStatus::Cancelled => false,
        }
    }

    /// Check that a cancellation is allowed now.
    ///
    /// # Errors
    /// Returns `409 conflict` for terminal bookings or slots already started.
    pub fn ensure_cancellable(
        &self,
        now: DateTime<Utc>,
        policy: &BookingPolicy,
    ) -> Result<(), Error> {
        if !self.status.can_transition_to(BookingStatus::Cancelled) {
            return Err(Error::conflict(format!(
                "a {} booking cannot be cancelled",
                self.status
            )));
        }
        if self.starts_at(policy) <= now {
            return Err(Error::conflict("the slot has already started"));
        }
        Ok(())
    }

    /// Check that completion is allowed now.
    ///
    /// # Errors
    /// Returns `409 conflict` unless confirmed and the slot has ended.
    pub fn ensure_completable(
        &self,
        now: DateTime<Utc>,
        policy: &BookingPolicy,
    ) -> Result<(), Error> {
        if self.status != BookingStatus::Confirmed {
            return Err(Error::conflict(format!(
                "a {} booking cannot be completed",
                self.status
            )));
        }
        if !self.has_ended(now, policy) {
            return Err(Error::conflict("the slot has not ended yet"));
        }
        Ok(())
    }
}

/// Upcoming or past bookings in the booker's listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingScope {
    /// Slot date today or later.
    #[default]
    Upcoming,
    /// Slot date before today.
    Past,
    /// No date restriction.
    All,
}

impl std::str::FromStr for BookingScope {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Ok(Self::Upcoming),
            "past" => Ok(Self::Past),
            "all" => Ok(Self::All),
            _ => Err(FieldError::new(
                "scope",
                "invalid_scope",
                "scope must be upcoming, past or all",
            )),
        }
    }
}

/// Filters for booking listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    /// Booker.
    pub user_id: Option<UserId>,
    /// Venues owned by this account.
    pub venue_owner_id: Option<UserId>,
    /// One venue.
    pub venue_id: Option<VenueId>,
    /// One status.
    pub status: Option<BookingStatus>,
    /// Slot dates on or after.
    pub from_date: Option<NaiveDate>,
    /// Slot dates strictly before.
    pub before_date: Option<NaiveDate>,
}

/// Validated request to book a window on a court.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingRequest {
    /// Court to book.
    pub court_id: CourtId,
    /// Requested window.
    pub window: SlotWindow,
}

impl BookingRequest {
    /// Check the window against court hours and the booking policy.
    ///
    /// # Errors
    /// Returns `400 invalid_request` with field details when the window is
    /// too long, outside opening hours, in the past or too far ahead.
    pub fn check_window(
        &self,
        hours: &OperatingHours,
        now: DateTime<Utc>,
        policy: &BookingPolicy,
    ) -> Result<(), FieldError> {
        let length = self.window.hours();
        if length == 0 || length > policy.max_hours {
            return Err(FieldError::new(
                "endTime",
                "invalid_duration",
                format!("bookings must last between 1 and {} hours", policy.max_hours),
            ));
        }
        if !hours.contains(&self.window) {
            return Err(FieldError::new(
                "startTime",
                "outside_operating_hours",
                format!(
                    "the court is open from {} to {}",
                    hours.open(),
                    hours.close()
                ),
            ));
        }
        let starts_at = self.window.starts_at(&policy.utc_offset);
        if starts_at <= now {
            return Err(FieldError::new(
                "startTime",
                "in_past",
                "the slot must start in the future",
            ));
        }
        if starts_at > now + policy.advance_window {
            return Err(FieldError::new(
                "date",
                "too_far_ahead",
                format!(
                    "bookings open {} days ahead",
                    policy.advance_window.num_days()
                ),
            ));
        }
        Ok(())
    }

    /// Price for the window at `price_per_hour`.
    ///
    /// # Errors
    /// Returns `500 internal` on arithmetic overflow.
    pub fn total(&self, price_per_hour: Money) -> Result<Money, Error> {
        price_per_hour
            .times(self.window.hours())
            .ok_or_else(|| Error::internal("booking total overflowed"))
    }
}

/// Amount refunded for a cancellation.
#[must_use]
pub fn refund_due(
    paid: Money,
    now: DateTime<Utc>,
    starts_at: DateTime<Utc>,
    policy: &BookingPolicy,
) -> Money {
    paid.percent(policy.refund_percent(now, starts_at))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::{Duration, TimeZone};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::schedule::HourOfDay;

    fn h(hour: u8) -> HourOfDay {
        HourOfDay::from_trusted(hour)
    }

    #[fixture]
    fn policy() -> BookingPolicy {
        BookingPolicy::default()
    }

    /// 2026-06-01 09:00 IST.
    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 3, 30, 0).single().expect("valid time")
    }

    #[fixture]
    fn hours() -> OperatingHours {
        OperatingHours::new(h(6), h(23)).expect("valid hours")
    }

    fn day(offset: u64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1)
            .and_then(|date| date.checked_add_days(chrono::Days::new(offset)))
            .expect("valid date")
    }

    fn request(date: NaiveDate, start: u8, end: u8) -> BookingRequest {
        BookingRequest {
            court_id: CourtId::random(),
            window: SlotWindow::new(date, h(start), h(end)).expect("window"),
        }
    }

    fn booking(status: BookingStatus, created_at: DateTime<Utc>, window: SlotWindow) -> Booking {
        Booking {
            id: BookingId::random(),
            user_id: UserId::random(),
            court_id: CourtId::random(),
            venue_id: VenueId::random(),
            window,
            total: Money::from_minor(100_000).expect("money"),
            status,
            cancellation_reason: None,
            created_at,
            updated_at: created_at,
        }
    }

    #[rstest]
    #[case(BookingStatus::Pending, BookingStatus::Confirmed, true)]
    #[case(BookingStatus::Pending, BookingStatus::Cancelled, true)]
    #[case(BookingStatus::Pending, BookingStatus::Completed, false)]
    #[case(BookingStatus::Confirmed, BookingStatus::Completed, true)]
    #[case(BookingStatus::Confirmed, BookingStatus::Cancelled, true)]
    #[case(BookingStatus::Cancelled, BookingStatus::Confirmed, false)]
    #[case(BookingStatus::Completed, BookingStatus::Cancelled, false)]
    fn transitions(#[case] from: BookingStatus, #[case] to: BookingStatus, #[case] allowed: bool) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    #[case(10, 11)]
    #[case(10, 16)]
    fn accepts_one_to_six_hours(
        #[case] start: u8,
        #[case] end: u8,
        hours: OperatingHours,
        now: DateTime<Utc>,
        policy: BookingPolicy,
    ) {
        assert!(request(day(1), start, end).check_window(&hours, now, &policy).is_ok());
    }

    #[rstest]
    fn rejects_seven_hours(hours: OperatingHours, now: DateTime<Utc>, policy: BookingPolicy) {
        let err = request(day(1), 10, 17)
            .check_window(&hours, now, &policy)
            .expect_err("too long");
        assert_eq!(err.code(), "invalid_duration");
    }

    #[rstest]
    fn rejects_outside_hours(hours: OperatingHours, now: DateTime<Utc>, policy: BookingPolicy) {
        let err = request(day(1), 22, 24)
            .check_window(&hours, now, &policy)
            .expect_err("after close");
        assert_eq!(err.code(), "outside_operating_hours");
    }

    #[rstest]
    fn rejects_started_slots(hours: OperatingHours, now: DateTime<Utc>, policy: BookingPolicy) {
        let err = request(day(0), 9, 10)
            .check_window(&hours, now, &policy)
            .expect_err("already started");
        assert_eq!(err.code(), "in_past");
        assert!(request(day(0), 10, 11).check_window(&hours, now, &policy).is_ok());
    }

    #[rstest]
    fn advance_window_boundary(hours: OperatingHours, now: DateTime<Utc>, policy: BookingPolicy) {
        assert!(request(day(30), 9, 10).check_window(&hours, now, &policy).is_ok());
        let err = request(day(30), 10, 11)
            .check_window(&hours, now, &policy)
            .expect_err("too far");
        assert_eq!(err.code(), "too_far_ahead");
    }

    #[rstest]
    fn pending_holds_expire(now: DateTime<Utc>, policy: BookingPolicy) {
        let window = SlotWindow::new(day(1), h(10), h(11)).expect("window");
        let fresh = booking(BookingStatus::Pending, now - Duration::minutes(14), window);
        let stale = booking(BookingStatus::Pending, now - Duration::minutes(15), window);
        assert!(fresh.is_active(now, &policy));
        assert!(!stale.is_active(now, &policy));
        let confirmed = booking(BookingStatus::Confirmed, now - Duration::days(3), window);
        assert!(confirmed.is_active(now, &policy));
    }

    #[rstest]
    fn adjacent_windows_do_not_clash() {
        let wanted = SlotWindow::new(day(1), h(18), h(20)).expect("window");
        let adjacent = SlotWindow::new(day(1), h(20), h(21)).expect("window");
        let clash = SlotWindow::new(day(1), h(19), h(20)).expect("window");
        assert!(!wanted.overlaps(&adjacent));
        assert!(wanted.overlaps(&clash));
        assert!(clash.overlaps(&wanted));
    }

    #[rstest]
    fn refund_boundary(policy: BookingPolicy) {
        let start = Utc.with_ymd_and_hms(2026, 6, 3, 12, 30, 0).single().expect("time");
        let paid = Money::from_minor(80_000).expect("money");
        assert_eq!(refund_due(paid, start - Duration::hours(24), start, &policy).minor(), 80_000);
        assert_eq!(
            refund_due(paid, start - Duration::hours(24) + Duration::seconds(1), start, &policy)
                .minor(),
            40_000
        );
    }

    #[rstest]
    fn cancellation_rules(now: DateTime<Utc>, policy: BookingPolicy) {
        let cancellable =
            |status, slot| booking(status, now, slot).ensure_cancellable(now, &policy);
        let later = SlotWindow::new(day(1), h(10), h(11)).expect("window");
        assert!(cancellable(BookingStatus::Confirmed, later).is_ok());
        assert!(cancellable(BookingStatus::Completed, later).is_err());
        let started = SlotWindow::new(day(0), h(9), h(10)).expect("window");
        assert!(cancellable(BookingStatus::Confirmed, started).is_err());
    }

    #[rstest]
    fn completion_requires_ended_confirmed(now: DateTime<Utc>, policy: BookingPolicy) {
        let completable =
            |status, slot| booking(status, now, slot).ensure_completable(now, &policy);
        let ended = SlotWindow::new(day(0), h(7), h(9)).expect("window");
        assert!(completable(BookingStatus::Confirmed, ended).is_ok());
        assert!(completable(BookingStatus::Pending, ended).is_err());
        let future = SlotWindow::new(day(1), h(7), h(9)).expect("window");
        assert!(completable(BookingStatus::Confirmed, future).is_err());
    }

    #[rstest]
    fn played_means_completed_or_confirmed_and_over(now: DateTime<Utc>, policy: BookingPolicy) {
        let ended = SlotWindow::new(day(0), h(7), h(8)).expect("window");
        assert!(booking(BookingStatus::Confirmed, now, ended).counts_as_played(now, &policy));
        assert!(booking(BookingStatus::Completed, now, ended).counts_as_played(now, &policy));
        assert!(!booking(BookingStatus::Cancelled, now, ended).counts_as_played(now, &policy));
    }
}
