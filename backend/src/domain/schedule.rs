//! Hour-aligned time slots and the booking calendar rules.
//!
//! Courts are booked in whole hours on a calendar date in the venue's local
//! time. A window `[start, end)` is half-open, so `18:00-19:00` and
//! `19:00-20:00` do not overlap. `24:00` is accepted as an end hour so courts
//! can stay open until midnight.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::validation::FieldError;

/// Whole hour of the day, `0..=24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HourOfDay(u8);

impl HourOfDay {
    /// Midnight at the start of the day.
    pub const START_OF_DAY: Self = Self(0);
    /// Midnight at the end of the day.
    pub const END_OF_DAY: Self = Self(24);

    /// Validate an hour number.
    ///
    /// # Errors
    /// Returns an `out_of_range` [`FieldError`] above 24.
    pub fn new(field: &'static str, hour: i64) -> Result<Self, FieldError> {
        u8::try_from(hour)
            .ok()
            .filter(|value| *value <= 24)
            .map(Self)
            .ok_or_else(|| {
                FieldError::new(
                    field,
                    "out_of_range",
                    format!("{field} must be between 0 and 24"),
                )
            })
    }

    /// Parse `HH:00` (minutes must be zero).
    ///
    /// # Errors
    /// Returns `invalid_time` for malformed text and `not_hour_aligned` when
    /// minutes are present.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, FieldError> {
        let invalid = || FieldError::new(field, "invalid_time", format!("{field} must use HH:MM"));
        let (hours, minutes) = raw.trim().split_once(':').ok_or_else(invalid)?;
        if hours.len() != 2 || minutes.len() != 2 {
            return Err(invalid());
        }
        let hours: i64 = hours.parse().map_err(|_| invalid())?;
        let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
        if minutes >= 60 {
            return Err(invalid());
        }
        if minutes != 0 {
            return Err(FieldError::new(
                field,
                "not_hour_aligned",
                format!("{field} must be on the hour"),
            ));
        }
        Self::new(field, hours)
    }

    /// Rehydrate a stored hour.
    #[must_use]
    pub const fn from_trusted(hour: u8) -> Self {
        Self(hour)
    }

    /// Hour number.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// `HH:00` text.
    #[must_use]
    pub fn label(self) -> String {
        format!("{:02}:00", self.0)
    }

    fn offset_from_midnight(self) -> Duration {
        Duration::hours(i64::from(self.0))
    }
}

impl std::fmt::Display for HourOfDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

/// Daily opening hours of a court, `open < close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    open: HourOfDay,
    close: HourOfDay,
}

impl OperatingHours {
    /// Validate opening and closing hours.
    ///
    /// # Errors
    /// Returns an `invalid_hours` [`FieldError`] unless `open < close` and
    /// `open < 24`.
    pub fn new(open: HourOfDay, close: HourOfDay) -> Result<Self, FieldError> {
        if open >= close || open == HourOfDay::END_OF_DAY {
            return Err(FieldError::new(
                "closeHour",
                "invalid_hours",
                "closeHour must be after openHour",
            ));
        }
        Ok(Self { open, close })
    }

    /// Opening hour.
    #[must_use]
    pub const fn open(&self) -> HourOfDay {
        self.open
    }

    /// Closing hour.
    #[must_use]
    pub const fn close(&self) -> HourOfDay {
        self.close
    }

    /// Whether `window` lies entirely inside opening hours.
    #[must_use]
    pub fn contains(&self, window: &SlotWindow) -> bool {
        window.start >= self.open && window.end <= self.close
    }

    /// One-hour windows from open to close on `date`.
    #[must_use]
    pub fn hourly_windows(&self, date: NaiveDate) -> Vec<SlotWindow> {
        (self.open.0..self.close.0)
            .map(|hour| SlotWindow {
                date,
                start: HourOfDay(hour),
                end: HourOfDay(hour.saturating_add(1)),
            })
            .collect()
    }
}

/// Half-open window `[start, end)` on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotWindow {
    /// Calendar date in venue local time.
    pub date: NaiveDate,
    /// First hour.
    pub start: HourOfDay,
    /// Hour after the last booked hour.
    pub end: HourOfDay,
}

impl SlotWindow {
    /// Validate `start < end`.
    ///
    /// # Errors
    /// Returns an `invalid_window` [`FieldError`] for empty or reversed
    /// windows.
    pub fn new(date: NaiveDate, start: HourOfDay, end: HourOfDay) -> Result<Self, FieldError> {
        if start >= end {
            return Err(FieldError::new(
                "endTime",
                "invalid_window",
                "endTime must be after startTime",
            ));
        }
        Ok(Self { date, start, end })
    }

    /// Number of booked hours.
    #[must_use]
    pub fn hours(&self) -> u32 {
        u32::from(self.end.0.saturating_sub(self.start.0))
    }

    /// Half-open overlap test on the same date.
    ///
    /// # Examples
    /// ```
    /// use chrono::NaiveDate;
    /// use courtside::domain::{HourOfDay, SlotWindow};
    ///
    /// let date = NaiveDate::from_ymd_opt(2026, 6, 1).expect("date");
    /// let h = |n| HourOfDay::from_trusted(n);
    /// let evening = SlotWindow::new(date, h(18), h(20)).expect("window");
    /// let next = SlotWindow::new(date, h(20), h(21)).expect("window");
    /// let clash = SlotWindow::new(date, h(19), h(21)).expect("window");
    /// assert!(!evening.overlaps(&next));
    /// assert!(evening.overlaps(&clash));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.date == other.date && self.start < other.end && other.start < self.end
    }

    /// Start instant in UTC for a venue at `offset`.
    #[must_use]
    pub fn starts_at(&self, offset: &FixedOffset) -> DateTime<Utc> {
        local_instant(self.date, self.start, offset)
    }

    /// End instant in UTC for a venue at `offset`.
    #[must_use]
    pub fn ends_at(&self, offset: &FixedOffset) -> DateTime<Utc> {
        local_instant(self.date, self.end, offset)
    }
}

impl std::fmt::Display for SlotWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}-{}", self.date, self.start, self.end)
    }
}

fn local_instant(date: NaiveDate, hour: HourOfDay, offset: &FixedOffset) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN) + hour.offset_from_midnight();
    match offset.from_local_datetime(&naive).single() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}

/// Rules for creating, holding and refunding bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingPolicy {
    /// Venue timezone used to interpret dates and hours.
    pub utc_offset: FixedOffset,
    /// How long an unpaid booking blocks its slot.
    pub hold: Duration,
    /// Longest single booking in hours.
    pub max_hours: u32,
    /// How far ahead bookings may start.
    pub advance_window: Duration,
    /// Minimum notice for a full refund.
    pub full_refund_notice: Duration,
    /// Refund percentage inside the notice period.
    pub late_refund_percent: u8,
}

impl BookingPolicy {
    /// Policy for venues in a given timezone with default limits.
    #[must_use]
    pub fn with_offset(utc_offset: FixedOffset) -> Self {
        Self {
            utc_offset,
            ..Self::default()
        }
    }

    /// Pending bookings created before this instant no longer hold a slot.
    #[must_use]
    pub fn hold_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.hold
    }

    /// Refund percentage for a cancellation at `now` of a slot starting at
    /// `starts_at`.
    ///
    /// # Examples
    /// ```
    /// use chrono::{Duration, TimeZone, Utc};
    /// use courtside::domain::BookingPolicy;
    ///
    /// let policy = BookingPolicy::default();
    /// let start = Utc.with_ymd_and_hms(2026, 6, 2, 18, 0, 0).single().expect("time");
    /// assert_eq!(policy.refund_percent(start - Duration::hours(24), start), 100);
    /// assert_eq!(policy.refund_percent(start - Duration::hours(23), start), 50);
    /// ```
    #[must_use]
    pub fn refund_percent(&self, now: DateTime<Utc>, starts_at: DateTime<Utc>) -> u8 {
        if starts_at - now >= self.full_refund_notice {
            100
        } else {
            self.late_refund_percent
        }
    }

    /// Today's date in the venue timezone.
    #[must_use]
    pub fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.utc_offset).date_naive()
    }
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            utc_offset: FixedOffset::east_opt(5 * 3600 + 30 * 60).unwrap_or_else(|| Utc.fix()),
            hold: Duration::minutes(15),
            max_hours: 6,
            advance_window: Duration::days(30),
            full_refund_notice: Duration::hours(24),
            late_refund_percent: 50,
        }
    }
}

/// Display state of one hour on the availability grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotState {
    /// Free to book.
    Available,
    /// Held by a pending or confirmed booking.
    Booked,
    /// Closed by the owner.
    Blocked,
    /// Already started.
    Past,
}

impl SlotState {
    /// Stable lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Booked => "booked",
            Self::Blocked => "blocked",
            Self::Past => "past",
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::{fixture, rstest};

    use super::*;

    fn h(hour: u8) -> HourOfDay {
        HourOfDay::from_trusted(hour)
    }

    #[fixture]
    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date")
    }

    #[rstest]
    #[case("07:00", 7)]
    #[case("24:00", 24)]
    #[case(" 00:00 ", 0)]
    fn parses_hour_aligned_times(#[case] raw: &str, #[case] expected: u8) {
        assert_eq!(HourOfDay::parse("startTime", raw).expect("valid").get(), expected);
    }

    #[rstest]
    #[case("7:00", "invalid_time")]
    #[case("07:30", "not_hour_aligned")]
    #[case("25:00", "out_of_range")]
    #[case("07:60", "invalid_time")]
    #[case("seven", "invalid_time")]
    fn rejects_bad_times(#[case] raw: &str, #[case] code: &str) {
        assert_eq!(HourOfDay::parse("startTime", raw).expect_err("invalid").code(), code);
    }

    #[rstest]
    #[case(18, 19, 19, 20, false)]
    #[case(18, 20, 19, 21, true)]
    #[case(18, 22, 19, 20, true)]
    #[case(19, 20, 18, 19, false)]
    #[case(10, 11, 10, 11, true)]
    fn half_open_overlap(
        date: NaiveDate,
        #[case] a_start: u8,
        #[case] a_end: u8,
        #[case] b_start: u8,
        #[case] b_end: u8,
        #[case] expected: bool,
    ) {
        let a = SlotWindow::new(date, h(a_start), h(a_end)).expect("window");
        let b = SlotWindow::new(date, h(b_start), h(b_end)).expect("window");
        assert_eq!(a.overlaps(&b), expected);
        assert_eq!(b.overlaps(&a), expected);
    }

    #[rstest]
    fn different_dates_never_overlap(date: NaiveDate) {
        let a = SlotWindow::new(date, h(10), h(12)).expect("window");
        let next_day = date.succ_opt().expect("next day");
        let b = SlotWindow::new(next_day, h(10), h(12)).expect("window");
        assert!(!a.overlaps(&b));
    }

    #[rstest]
    fn rejects_empty_windows(date: NaiveDate) {
        assert!(SlotWindow::new(date, h(10), h(10)).is_err());
        assert!(SlotWindow::new(date, h(11), h(10)).is_err());
    }

    #[rstest]
    fn operating_hours_bound_windows(date: NaiveDate) {
        let hours = OperatingHours::new(h(6), h(24)).expect("valid hours");
        assert!(hours.contains(&SlotWindow::new(date, h(22), h(24)).expect("window")));
        assert!(!hours.contains(&SlotWindow::new(date, h(5), h(7)).expect("window")));
        assert_eq!(hours.hourly_windows(date).len(), 18);
    }

    #[rstest]
    fn rejects_inverted_operating_hours() {
        assert!(OperatingHours::new(h(22), h(6)).is_err());
        assert!(OperatingHours::new(h(24), h(24)).is_err());
    }

    #[rstest]
    fn converts_local_hours_to_utc(date: NaiveDate) {
        let policy = BookingPolicy::default();
        let window = SlotWindow::new(date, h(6), h(24)).expect("window");
        let start = window.starts_at(&policy.utc_offset);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 6, 1, 0, 30, 0).single().expect("time"));
        let end = window.ends_at(&policy.utc_offset);
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 6, 1, 18, 30, 0).single().expect("time"));
    }

    #[rstest]
    fn local_date_follows_offset() {
        let policy = BookingPolicy::default();
        let late_utc = Utc.with_ymd_and_hms(2026, 6, 1, 20, 0, 0).single().expect("time");
        assert_eq!(
            policy.local_date(late_utc),
            NaiveDate::from_ymd_opt(2026, 6, 2).expect("date")
        );
    }
}
