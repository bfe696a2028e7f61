//! Driving port for admin listings and the platform dashboard.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{
    Account, AccountFilter, AdminDashboard, Error, Principal, Report, ReportStatus, Venue,
    VenueStatus,
};

/// Admin reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModerationQuery: Send + Sync {
    /// Platform totals.
    async fn dashboard(&self, principal: &Principal) -> Result<AdminDashboard, Error>;

    /// Accounts matching `filter`.
    async fn list_users(
        &self,
        principal: &Principal,
        filter: AccountFilter,
        page: PageRequest,
    ) -> Result<Page<Account>, Error>;

    /// Venues awaiting or past moderation.
    async fn list_venues(
        &self,
        principal: &Principal,
        status: Option<VenueStatus>,
        page: PageRequest,
    ) -> Result<Page<Venue>, Error>;

    /// Reports by status.
    async fn list_reports(
        &self,
        principal: &Principal,
        status: Option<ReportStatus>,
        page: PageRequest,
    ) -> Result<Page<Report>, Error>;
}
