//! Facility owner use-cases: venues, courts and blocked windows.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AmenityRepository, BlockOutcome, BookingRepository, BookingTarget, CourtRepository,
    DashboardRepository, VenueCommand, VenueRepository,
};
use crate::domain::validation::FieldError;
use crate::domain::{
    AmenityId, BlockedSlot, BlockedSlotId, BookingPolicy, Court, CourtDraft, CourtId, CourtPatch,
    DashboardPeriod, DrivenPorts, Error, OwnerDashboard, Principal, SlotWindow, UserRole, Venue,
    VenueDraft, VenueId, VenuePatch, VenueStatus,
};

/// Venue service implementing [`VenueCommand`].
#[derive(Clone)]
pub struct VenueService {
    venues: Arc<dyn VenueRepository>,
    courts: Arc<dyn CourtRepository>,
    amenities: Arc<dyn AmenityRepository>,
    bookings: Arc<dyn BookingRepository>,
    dashboards: Arc<dyn DashboardRepository>,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl VenueService {
    /// Create the service from the shared port bundle.
    pub fn new(ports: &DrivenPorts, policy: BookingPolicy) -> Self {
        Self {
            venues: Arc::clone(&ports.venues),
            courts: Arc::clone(&ports.courts),
            amenities: Arc::clone(&ports.amenities),
            bookings: Arc::clone(&ports.bookings),
            dashboards: Arc::clone(&ports.dashboards),
            clock: Arc::clone(&ports.clock),
            policy,
        }
    }

    async fn owned_venue(&self, principal: &Principal, id: &VenueId) -> Result<Venue, Error> {
        let venue = self
            .venues
            .find_by_id(id)
            .await?
            .filter(|venue| venue.deleted_at.is_none())
            .ok_or_else(|| Error::not_found("venue not found"))?;
        if !venue.is_owned_by(&principal.user_id) {
            return Err(Error::forbidden("only the venue owner can do this"));
        }
        Ok(venue)
    }

    async fn owned_court(&self, principal: &Principal, id: &CourtId) -> Result<Court, Error> {
        let court = self
            .courts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("court not found"))?;
        self.owned_venue(principal, &court.venue_id).await?;
        Ok(court)
    }

    async fn ensure_amenities_exist(&self, ids: &[AmenityId]) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }
        let found = self.amenities.find_many(ids).await?;
        if found.len() == ids.len() {
            Ok(())
        } else {
            Err(FieldError::new(
                "amenityIds",
                "unknown_amenity",
                "one or more amenities do not exist",
            )
            .into())
        }
    }

    async fn ensure_no_upcoming(&self, target: BookingTarget) -> Result<(), Error> {
        let now = self.clock.utc();
        let upcoming = self
            .bookings
            .count_upcoming_active(
                target,
                self.policy.local_date(now),
                self.policy.hold_cutoff(now),
            )
            .await?;
        if upcoming == 0 {
            Ok(())
        } else {
            Err(Error::conflict(format!(
                "there are {upcoming} upcoming bookings; cancel them first"
            )))
        }
    }
}

#[async_trait]
impl VenueCommand for VenueService {
    async fn create_venue(&self, principal: &Principal, draft: VenueDraft) -> Result<Venue, Error> {
        principal.require_role(&[UserRole::FacilityOwner])?;
        let amenity_ids = VenueDraft::dedup_amenities(draft.amenity_ids);
        self.ensure_amenities_exist(&amenity_ids).await?;
        let now = self.clock.utc();
        let venue = Venue {
            id: VenueId::random(),
            owner_id: principal.user_id,
            name: draft.name,
            description: draft.description,
            address: draft.address,
            city: draft.city,
            location: draft.location,
            photos: draft.photos,
            amenity_ids,
            status: VenueStatus::Pending,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.venues.create(&venue).await?;
        info!(venue_id = %venue.id, owner_id = %principal.user_id, "venue submitted");
        Ok(venue)
    }

    async fn update_venue(
        &self,
        principal: &Principal,
        id: &VenueId,
        mut patch: VenuePatch,
    ) -> Result<Venue, Error> {
        let mut venue = self.owned_venue(principal, id).await?;
        if patch.is_empty() {
            return Ok(venue);
        }
        if let Some(ids) = patch.amenity_ids.take() {
            let ids = VenueDraft::dedup_amenities(ids);
            self.ensure_amenities_exist(&ids).await?;
            patch.amenity_ids = Some(ids);
        }
        if venue.apply(patch, self.clock.utc()) {
            info!(venue_id = %venue.id, "venue edits sent back to moderation");
        }
        self.venues.update(&venue).await?;
        Ok(venue)
    }

    async fn delete_venue(&self, principal: &Principal, id: &VenueId) -> Result<(), Error> {
        let venue = self.owned_venue(principal, id).await?;
        self.ensure_no_upcoming(BookingTarget::Venue(venue.id)).await?;
        self.venues.soft_delete(&venue.id, self.clock.utc()).await?;
        info!(venue_id = %venue.id, "venue deleted");
        Ok(())
    }

    async fn list_owner_venues(&self, principal: &Principal) -> Result<Vec<Venue>, Error> {
        principal.require_role(&[UserRole::FacilityOwner])?;
        Ok(self.venues.list_by_owner(&principal.user_id).await?)
    }

    async fn list_courts(
        &self,
        principal: &Principal,
        venue_id: &VenueId,
    ) -> Result<Vec<Court>, Error> {
        let venue = self
            .venues
            .find_by_id(venue_id)
            .await?
            .filter(|venue| venue.is_managed_by(principal))
            .ok_or_else(|| Error::not_found("venue not found"))?;
        Ok(self.courts.list_by_venue(&venue.id, true).await?)
    }

    async fn add_court(
        &self,
        principal: &Principal,
        venue_id: &VenueId,
        draft: CourtDraft,
    ) -> Result<Court, Error> {
        let venue = self.owned_venue(principal, venue_id).await?;
        let now = self.clock.utc();
        let court = Court {
            id: CourtId::random(),
            venue_id: venue.id,
            name: draft.name,
            sport: draft.sport,
            price_per_hour: draft.price_per_hour,
            hours: draft.hours,
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.courts.create(&court).await?;
        info!(court_id = %court.id, venue_id = %venue.id, "court added");
        Ok(court)
    }

    async fn update_court(
        &self,
        principal: &Principal,
        id: &CourtId,
        patch: CourtPatch,
    ) -> Result<Court, Error> {
        let mut court = self.owned_court(principal, id).await?;
        if court.active && patch.active == Some(false) {
            self.ensure_no_upcoming(BookingTarget::Court(court.id)).await?;
        }
        court.apply(patch, self.clock.utc())?;
        self.courts.update(&court).await?;
        Ok(court)
    }

    async fn deactivate_court(&self, principal: &Principal, id: &CourtId) -> Result<Court, Error> {
        let mut court = self.owned_court(principal, id).await?;
        if !court.active {
            return Ok(court);
        }
        self.ensure_no_upcoming(BookingTarget::Court(court.id)).await?;
        court.active = false;
        court.updated_at = self.clock.utc();
        self.courts.update(&court).await?;
        info!(court_id = %court.id, "court deactivated");
        Ok(court)
    }

    async fn block_slot(
        &self,
        principal: &Principal,
        court_id: &CourtId,
        window: SlotWindow,
        reason: Option<String>,
    ) -> Result<BlockedSlot, Error> {
        let court = self.owned_court(principal, court_id).await?;
        if !court.hours.contains(&window) {
            return Err(FieldError::new(
                "startTime",
                "outside_operating_hours",
                format!(
                    "the court is open from {} to {}",
                    court.hours.open().label(),
                    court.hours.close().label()
                ),
            )
            .into());
        }
        let now = self.clock.utc();
        let block = BlockedSlot {
            id: BlockedSlotId::random(),
            court_id: court.id,
            window,
            reason,
            created_at: now,
        };
        match self
            .courts
            .insert_block_if_free(&block, self.policy.hold_cutoff(now))
            .await?
        {
            BlockOutcome::Inserted => Ok(block),
            BlockOutcome::Conflict => Err(Error::conflict(
                "an active booking overlaps this window",
            )),
        }
    }

    async fn unblock_slot(&self, principal: &Principal, id: &BlockedSlotId) -> Result<(), Error> {
        let block = self
            .courts
            .find_block(id)
            .await?
            .ok_or_else(|| Error::not_found("blocked slot not found"))?;
        self.owned_court(principal, &block.court_id).await?;
        if !self.courts.delete_block(id).await? {
            return Err(Error::not_found("blocked slot not found"));
        }
        Ok(())
    }

    async fn owner_dashboard(&self, principal: &Principal) -> Result<OwnerDashboard, Error> {
        principal.require_role(&[UserRole::FacilityOwner])?;
        let period = DashboardPeriod::containing(self.policy.local_date(self.clock.utc()));
        Ok(self
            .dashboards
            .owner_dashboard(&principal.user_id, period)
            .await?)
    }
}

#[cfg(test)]
#[path = "venue_service_tests.rs"]
mod tests;
