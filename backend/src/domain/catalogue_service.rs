//! Public catalogue reads: search, venue detail and court availability.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use pagination::{Page, PageRequest};

use crate::domain::ports::{
    AmenityRepository, BookingRepository, CatalogueQuery, CourtAvailability, CourtRepository,
    ReviewRepository, SlotAvailability, VenueRepository,
};
use crate::domain::{
    Amenity, BookingPolicy, CourtId, DrivenPorts, Error, Principal, SlotState, VenueDetail,
    VenueId, VenueSearch, VenueSummary, rank_candidates,
};

/// Catalogue service implementing [`CatalogueQuery`].
#[derive(Clone)]
pub struct CatalogueService {
    venues: Arc<dyn VenueRepository>,
    courts: Arc<dyn CourtRepository>,
    amenities: Arc<dyn AmenityRepository>,
    reviews: Arc<dyn ReviewRepository>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl CatalogueService {
    /// Create the service from the shared port bundle.
    pub fn new(ports: &DrivenPorts, policy: BookingPolicy) -> Self {
        Self {
            venues: Arc::clone(&ports.venues),
            courts: Arc::clone(&ports.courts),
            amenities: Arc::clone(&ports.amenities),
            reviews: Arc::clone(&ports.reviews),
            bookings: Arc::clone(&ports.bookings),
            clock: Arc::clone(&ports.clock),
            policy,
        }
    }
}

#[async_trait]
impl CatalogueQuery for CatalogueService {
    async fn search(
        &self,
        search: VenueSearch,
        page: PageRequest,
    ) -> Result<Page<VenueSummary>, Error> {
        let search = search.validate()?;
        let candidates = self.venues.search_candidates(&search.text_filter).await?;
        let ranked = rank_candidates(candidates, &search);
        Ok(Page::from_slice(ranked, page))
    }

    async fn venue_detail(
        &self,
        id: &VenueId,
        viewer: Option<Principal>,
    ) -> Result<VenueDetail, Error> {
        let venue = self
            .venues
            .find_by_id(id)
            .await?
            .filter(|venue| venue.is_visible_to(viewer.as_ref()))
            .ok_or_else(|| Error::not_found("venue not found"))?;
        let courts = self.courts.list_by_venue(id, false).await?;
        let amenities = self.amenities.find_many(&venue.amenity_ids).await?;
        let rating = self.reviews.summary(id).await?;
        Ok(VenueDetail {
            venue,
            courts,
            amenities,
            rating,
        })
    }

    async fn list_amenities(&self) -> Result<Vec<Amenity>, Error> {
        Ok(self.amenities.list().await?)
    }

    async fn court_availability(
        &self,
        court_id: &CourtId,
        date: NaiveDate,
    ) -> Result<CourtAvailability, Error> {
        let not_bookable = || Error::not_found("court not found");
        let court = self
            .courts
            .find_by_id(court_id)
            .await?
            .filter(|court| court.active)
            .ok_or_else(not_bookable)?;
        self.venues
            .find_by_id(&court.venue_id)
            .await?
            .filter(|venue| venue.is_public())
            .ok_or_else(not_bookable)?;

        let now = self.clock.utc();
        let booked = self
            .bookings
            .active_windows(court_id, date, self.policy.hold_cutoff(now))
            .await?;
        let blocked: Vec<_> = self
            .courts
            .blocks_on(court_id, date)
            .await?
            .into_iter()
            .map(|block| block.window)
            .collect();

        let slots = court
            .hours
            .hourly_windows(date)
            .into_iter()
            .map(|window| {
                let state = if window.starts_at(&self.policy.utc_offset) <= now {
                    SlotState::Past
                } else if booked.iter().any(|taken| taken.overlaps(&window)) {
                    SlotState::Booked
                } else if blocked.iter().any(|block| block.overlaps(&window)) {
                    SlotState::Blocked
                } else {
                    SlotState::Available
                };
                SlotAvailability {
                    window,
                    state,
                    price: court.price_per_hour,
                }
            })
            .collect();
        Ok(CourtAvailability { court, date, slots })
    }
}

#[cfg(test)]
#[path = "catalogue_service_tests.rs"]
mod tests;
