//! Driving port for reading bookings.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{BookingId, BookingScope, BookingStatus, Error, Principal, VenueId};

use super::BookingView;

/// Filters for the caller's own bookings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MyBookingsQuery {
    /// Only this status.
    pub status: Option<BookingStatus>,
    /// Upcoming, past or all.
    pub scope: BookingScope,
}

/// Filters for bookings at the caller's venues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnerBookingsQuery {
    /// Only this venue.
    pub venue_id: Option<VenueId>,
    /// Only this status.
    pub status: Option<BookingStatus>,
}

/// Booking reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// A booking visible to its booker, the venue owner or an admin.
    async fn get(&self, principal: &Principal, id: &BookingId) -> Result<BookingView, Error>;

    /// The caller's bookings.
    async fn list_mine(
        &self,
        principal: &Principal,
        query: MyBookingsQuery,
        page: PageRequest,
    ) -> Result<Page<BookingView>, Error>;

    /// Bookings at venues the caller owns.
    async fn list_for_owner(
        &self,
        principal: &Principal,
        query: OwnerBookingsQuery,
        page: PageRequest,
    ) -> Result<Page<BookingView>, Error>;
}
