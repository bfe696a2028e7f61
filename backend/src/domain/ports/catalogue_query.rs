//! Driving port for public venue discovery.

use async_trait::async_trait;
use chrono::NaiveDate;
use pagination::{Page, PageRequest};

use crate::domain::{
    Amenity, Court, CourtId, Error, Money, Principal, SlotState, SlotWindow, VenueDetail, VenueId,
    VenueSearch, VenueSummary,
};

/// One hourly slot of a court.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotAvailability {
    /// The hour.
    pub window: SlotWindow,
    /// Whether it can be booked.
    pub state: SlotState,
    /// Price for the hour.
    pub price: Money,
}

/// Availability grid for one court and date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourtAvailability {
    /// The court.
    pub court: Court,
    /// Requested date.
    pub date: NaiveDate,
    /// Hourly slots from opening to closing.
    pub slots: Vec<SlotAvailability>,
}

/// Catalogue reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Filter, rank and page approved venues.
    async fn search(
        &self,
        search: VenueSearch,
        page: PageRequest,
    ) -> Result<Page<VenueSummary>, Error>;

    /// Venue detail as seen by `viewer`.
    async fn venue_detail(
        &self,
        id: &VenueId,
        viewer: Option<Principal>,
    ) -> Result<VenueDetail, Error>;

    /// Every amenity.
    async fn list_amenities(&self) -> Result<Vec<Amenity>, Error>;

    /// Hourly availability of a bookable court.
    async fn court_availability(
        &self,
        court_id: &CourtId,
        date: NaiveDate,
    ) -> Result<CourtAvailability, Error>;
}
