//! Driving port for facility owners managing venues and courts.

use async_trait::async_trait;

use crate::domain::{
    BlockedSlot, BlockedSlotId, Court, CourtDraft, CourtId, CourtPatch, Error, OwnerDashboard,
    Principal, SlotWindow, Venue, VenueDraft, VenueId, VenuePatch,
};

/// Owner use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueCommand: Send + Sync {
    /// Create a pending venue.
    async fn create_venue(&self, principal: &Principal, draft: VenueDraft) -> Result<Venue, Error>;

    /// Edit a venue; public edits send it back to moderation.
    async fn update_venue(
        &self,
        principal: &Principal,
        id: &VenueId,
        patch: VenuePatch,
    ) -> Result<Venue, Error>;

    /// Soft-delete a venue without upcoming bookings.
    async fn delete_venue(&self, principal: &Principal, id: &VenueId) -> Result<(), Error>;

    /// The caller's venues.
    async fn list_owner_venues(&self, principal: &Principal) -> Result<Vec<Venue>, Error>;

    /// Every court of one of the caller's venues, inactive ones included.
    async fn list_courts(&self, principal: &Principal, venue_id: &VenueId)
    -> Result<Vec<Court>, Error>;

    /// Add a court to one of the caller's venues.
    async fn add_court(
        &self,
        principal: &Principal,
        venue_id: &VenueId,
        draft: CourtDraft,
    ) -> Result<Court, Error>;

    /// Edit a court.
    async fn update_court(
        &self,
        principal: &Principal,
        id: &CourtId,
        patch: CourtPatch,
    ) -> Result<Court, Error>;

    /// Stop taking bookings on a court without upcoming bookings.
    async fn deactivate_court(&self, principal: &Principal, id: &CourtId) -> Result<Court, Error>;

    /// Block a window for maintenance.
    async fn block_slot(
        &self,
        principal: &Principal,
        court_id: &CourtId,
        window: SlotWindow,
        reason: Option<String>,
    ) -> Result<BlockedSlot, Error>;

    /// Remove a block.
    async fn unblock_slot(&self, principal: &Principal, id: &BlockedSlotId) -> Result<(), Error>;

    /// Totals across the caller's venues.
    async fn owner_dashboard(&self, principal: &Principal) -> Result<OwnerDashboard, Error>;
}
