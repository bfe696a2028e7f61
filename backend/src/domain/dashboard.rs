//! Aggregates for the owner and admin dashboards.

use chrono::{Datelike, Months, NaiveDate};

use crate::domain::booking::BookingStatus;
use crate::domain::money::Money;
use crate::domain::report::ReportStatus;
use crate::domain::user::UserRole;
use crate::domain::venue::VenueStatus;

/// Count keyed by an enum value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally<K> {
    entries: Vec<(K, u64)>,
}

impl<K: Copy + PartialEq> Tally<K> {
    /// Start with zero for every key.
    #[must_use]
    pub fn zeroed(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            entries: keys.into_iter().map(|key| (key, 0)).collect(),
        }
    }

    /// Add `count` to `key`, appending unknown keys.
    pub fn add(&mut self, key: K, count: u64) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, total)) => *total = total.saturating_add(count),
            None => self.entries.push((key, count)),
        }
    }

    /// Count for `key`.
    #[must_use]
    pub fn get(&self, key: K) -> u64 {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map_or(0, |(_, count)| *count)
    }

    /// Sum of every count.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| *count).sum()
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[(K, u64)] {
        &self.entries
    }
}

impl<K: Copy + PartialEq> FromIterator<(K, u64)> for Tally<K> {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        let mut tally = Self { entries: Vec::new() };
        for (key, count) in iter {
            tally.add(key, count);
        }
        tally
    }
}

/// Calendar dates the owner dashboard is computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardPeriod {
    /// Today in the venue timezone.
    pub today: NaiveDate,
    /// First day of the current month.
    pub month_start: NaiveDate,
    /// First day of the next month.
    pub next_month_start: NaiveDate,
}

impl DashboardPeriod {
    /// Period for the month containing `today`.
    #[must_use]
    pub fn containing(today: NaiveDate) -> Self {
        let month_start = today.with_day(1).unwrap_or(today);
        let next_month_start = month_start
            .checked_add_months(Months::new(1))
            .unwrap_or(NaiveDate::MAX);
        Self {
            today,
            month_start,
            next_month_start,
        }
    }
}

/// Facility owner overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerDashboard {
    /// Venues by moderation state.
    pub venues: Tally<VenueStatus>,
    /// Active courts across all venues.
    pub active_courts: u64,
    /// Bookings with a slot this calendar month.
    pub bookings_this_month: u64,
    /// Confirmed bookings still to be played.
    pub upcoming_confirmed: u64,
    /// Captured revenue this calendar month.
    pub earnings_this_month: Money,
    /// Captured revenue overall.
    pub earnings_all_time: Money,
}

/// Platform overview for admins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDashboard {
    /// Non-deleted accounts by role.
    pub users: Tally<UserRole>,
    /// Banned accounts.
    pub banned_users: u64,
    /// Non-deleted venues by state.
    pub venues: Tally<VenueStatus>,
    /// Bookings by state.
    pub bookings: Tally<BookingStatus>,
    /// Captured revenue overall.
    pub revenue: Money,
    /// Reports by state.
    pub reports: Tally<ReportStatus>,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn zeroed_tally_reports_missing_keys() {
        let mut tally = Tally::zeroed(VenueStatus::ALL);
        tally.add(VenueStatus::Approved, 3);
        tally.add(VenueStatus::Approved, 2);
        assert_eq!(tally.get(VenueStatus::Approved), 5);
        assert_eq!(tally.get(VenueStatus::Rejected), 0);
        assert_eq!(tally.total(), 5);
        assert_eq!(tally.entries().len(), 3);
    }

    #[rstest]
    #[case(NaiveDate::from_ymd_opt(2026, 12, 31), (2026, 12, 1), (2027, 1, 1))]
    #[case(NaiveDate::from_ymd_opt(2026, 2, 1), (2026, 2, 1), (2026, 3, 1))]
    fn period_spans_calendar_month(
        #[case] today: Option<NaiveDate>,
        #[case] start: (i32, u32, u32),
        #[case] next: (i32, u32, u32),
    ) {
        let period = DashboardPeriod::containing(today.expect("date"));
        assert_eq!(
            period.month_start,
            NaiveDate::from_ymd_opt(start.0, start.1, start.2).expect("date")
        );
        assert_eq!(
            period.next_month_start,
            NaiveDate::from_ymd_opt(next.0, next.1, next.2).expect("date")
        );
    }

    #[rstest]
    fn collects_from_rows() {
        let tally: Tally<BookingStatus> = [(BookingStatus::Pending, 1), (BookingStatus::Pending, 4)]
            .into_iter()
            .collect();
        assert_eq!(tally.get(BookingStatus::Pending), 5);
    }
}
