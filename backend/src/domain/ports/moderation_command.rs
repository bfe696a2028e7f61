//! Driving port for admin moderation actions.

use async_trait::async_trait;

use crate::domain::{
    Account, Amenity, AmenityId, Error, Principal, Report, ReportId, ReportStatus, UserId, Venue,
    VenueId,
};

/// Admin use-cases that change state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationCommand: Send + Sync {
    /// Ban a non-admin account other than the caller.
    async fn ban_user(
        &self,
        principal: &Principal,
        id: &UserId,
        reason: String,
    ) -> Result<Account, Error>;

    /// Lift a ban.
    async fn unban_user(&self, principal: &Principal, id: &UserId) -> Result<Account, Error>;

    /// Publish a venue.
    async fn approve_venue(&self, principal: &Principal, id: &VenueId) -> Result<Venue, Error>;

    /// Refuse a venue with a reason shown to its owner.
    async fn reject_venue(
        &self,
        principal: &Principal,
        id: &VenueId,
        reason: String,
    ) -> Result<Venue, Error>;

    /// Close an open report.
    async fn resolve_report(
        &self,
        principal: &Principal,
        id: &ReportId,
        outcome: ReportStatus,
        note: Option<String>,
    ) -> Result<Report, Error>;

    /// Add an amenity.
    async fn create_amenity(
        &self,
        principal: &Principal,
        name: String,
        icon: Option<String>,
    ) -> Result<Amenity, Error>;

    /// Remove an amenity.
    async fn delete_amenity(&self, principal: &Principal, id: &AmenityId) -> Result<(), Error>;
}
