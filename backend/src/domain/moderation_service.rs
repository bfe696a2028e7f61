//! Admin moderation and user reports.
//!
//! Every admin operation checks the caller's stored role first; reports are
//! the one entry point open to any signed-in account.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::driven_ports::Notifier;
use crate::domain::ports::{
    AmenityRepository, DashboardRepository, ModerationCommand, ModerationQuery, NewReport,
    ReportCommand, ReportRepository, UserRepository, VenueRepository,
};
use crate::domain::validation::{FieldError, bounded_text, optional_text};
use crate::domain::{
    Account, AccountFilter, AdminDashboard, Amenity, AmenityId, BanRecord, DrivenPorts, Error,
    NewNotification, Principal, Report, ReportId, ReportStatus, ReportTargetKind, UserId,
    UserRole, Venue, VenueId, VenueStatus,
};

/// Moderation service implementing [`ModerationCommand`],
/// [`ModerationQuery`] and [`ReportCommand`].
#[derive(Clone)]
pub struct ModerationService {
    users: Arc<dyn UserRepository>,
    venues: Arc<dyn VenueRepository>,
    amenities: Arc<dyn AmenityRepository>,
    reports: Arc<dyn ReportRepository>,
    dashboards: Arc<dyn DashboardRepository>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
}

impl ModerationService {
    /// Create the service from the shared port bundle.
    pub fn new(ports: &DrivenPorts) -> Self {
        Self {
            users: Arc::clone(&ports.users),
            venues: Arc::clone(&ports.venues),
            amenities: Arc::clone(&ports.amenities),
            reports: Arc::clone(&ports.reports),
            dashboards: Arc::clone(&ports.dashboards),
            notifier: Notifier::new(ports),
            clock: Arc::clone(&ports.clock),
        }
    }

    async fn live_account(&self, id: &UserId) -> Result<Account, Error> {
        self.users
            .find_by_id(id)
            .await?
            .filter(|account| !account.is_deleted())
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn live_venue(&self, id: &VenueId) -> Result<Venue, Error> {
        self.venues
            .find_by_id(id)
            .await?
            .filter(|venue| venue.deleted_at.is_none())
            .ok_or_else(|| Error::not_found("venue not found"))
    }

    async fn set_venue_status(
        &self,
        id: &VenueId,
        status: VenueStatus,
        reason: Option<String>,
    ) -> Result<Venue, Error> {
        let mut venue = self.live_venue(id).await?;
        venue.status = status;
        venue.rejection_reason = reason;
        venue.updated_at = self.clock.utc();
        self.venues.update(&venue).await?;
        info!(venue_id = %venue.id, status = status.as_str(), "venue moderated");
        Ok(venue)
    }
}

#[async_trait]
impl ModerationCommand for ModerationService {
    async fn ban_user(
        &self,
        principal: &Principal,
        id: &UserId,
        reason: String,
    ) -> Result<Account, Error> {
        principal.require_admin()?;
        let reason = bounded_text("reason", &reason, 1, 500)?;
        if *id == principal.user_id {
            return Err(Error::invalid_request("you cannot ban yourself"));
        }
        let mut account = self.live_account(id).await?;
        if account.role == UserRole::Admin {
            return Err(Error::forbidden("admins cannot be banned"));
        }
        let now = self.clock.utc();
        account.ban = Some(BanRecord {
            reason,
            banned_at: now,
        });
        account.updated_at = now;
        self.users.update(&account).await?;
        info!(user_id = %account.id, admin_id = %principal.user_id, "user banned");
        Ok(account)
    }

    async fn unban_user(&self, principal: &Principal, id: &UserId) -> Result<Account, Error> {
        principal.require_admin()?;
        let mut account = self.live_account(id).await?;
        if account.ban.take().is_some() {
            account.updated_at = self.clock.utc();
            self.users.update(&account).await?;
            info!(user_id = %account.id, admin_id = %principal.user_id, "user unbanned");
        }
        Ok(account)
    }

    async fn approve_venue(&self, principal: &Principal, id: &VenueId) -> Result<Venue, Error> {
        principal.require_admin()?;
        let venue = self
            .set_venue_status(id, VenueStatus::Approved, None)
            .await?;
        self.notifier
            .send(vec![NewNotification::venue_approved(
                venue.owner_id,
                &venue.name,
            )])
            .await;
        Ok(venue)
    }

    async fn reject_venue(
        &self,
        principal: &Principal,
        id: &VenueId,
        reason: String,
    ) -> Result<Venue, Error> {
        principal.require_admin()?;
        let reason = bounded_text("reason", &reason, 1, 500)?;
        let venue = self
            .set_venue_status(id, VenueStatus::Rejected, Some(reason.clone()))
            .await?;
        self.notifier
            .send(vec![NewNotification::venue_rejected(
                venue.owner_id,
                &venue.name,
                &reason,
            )])
            .await;
        Ok(venue)
    }

    async fn resolve_report(
        &self,
        principal: &Principal,
        id: &ReportId,
        outcome: ReportStatus,
        note: Option<String>,
    ) -> Result<Report, Error> {
        principal.require_admin()?;
        let mut report = self
            .reports
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("report not found"))?;
        if report.status != ReportStatus::Open {
            return Err(Error::conflict("report has already been closed"));
        }
        report.close(outcome, note, principal.user_id, self.clock.utc())?;
        self.reports.update(&report).await?;
        self.notifier
            .send(vec![NewNotification::report_resolved(
                report.reporter_id,
                report.status.as_str(),
            )])
            .await;
        Ok(report)
    }

    async fn create_amenity(
        &self,
        principal: &Principal,
        name: String,
        icon: Option<String>,
    ) -> Result<Amenity, Error> {
        principal.require_admin()?;
        let amenity = Amenity {
            id: AmenityId::random(),
            name: Amenity::validate_name(&name)?,
            icon: optional_text("icon", icon.as_deref(), 1, 50)?,
        };
        self.amenities.create(&amenity).await?;
        Ok(amenity)
    }

    async fn delete_amenity(&self, principal: &Principal, id: &AmenityId) -> Result<(), Error> {
        principal.require_admin()?;
        if self.amenities.delete(id).await? {
            Ok(())
        } else {
            Err(Error::not_found("amenity not found"))
        }
    }
}

#[async_trait]
impl ModerationQuery for ModerationService {
    async fn dashboard(&self, principal: &Principal) -> Result<AdminDashboard, Error> {
        principal.require_admin()?;
        Ok(self.dashboards.admin_dashboard().await?)
    }

    async fn list_users(
        &self,
        principal: &Principal,
        filter: AccountFilter,
        page: PageRequest,
    ) -> Result<Page<Account>, Error> {
        principal.require_admin()?;
        let (rows, total) = self.users.list(&filter, page).await?;
        Ok(Page::new(rows, page, total))
    }

    async fn list_venues(
        &self,
        principal: &Principal,
        status: Option<VenueStatus>,
        page: PageRequest,
    ) -> Result<Page<Venue>, Error> {
        principal.require_admin()?;
        let (rows, total) = self.venues.list_by_status(status, page).await?;
        Ok(Page::new(rows, page, total))
    }

    async fn list_reports(
        &self,
        principal: &Principal,
        status: Option<ReportStatus>,
        page: PageRequest,
    ) -> Result<Page<Report>, Error> {
        principal.require_admin()?;
        let (rows, total) = self.reports.list(status, page).await?;
        Ok(Page::new(rows, page, total))
    }
}

#[async_trait]
impl ReportCommand for ModerationService {
    async fn submit(&self, principal: &Principal, report: NewReport) -> Result<Report, Error> {
        let description = Report::validate_description(&report.description)?;
        match report.target_kind {
            ReportTargetKind::User => {
                let target = UserId::from_uuid(report.target_id);
                if target == principal.user_id {
                    return Err(FieldError::new(
                        "targetId",
                        "self_report",
                        "you cannot report yourself",
                    )
                    .into());
                }
                self.live_account(&target).await?;
            }
            ReportTargetKind::Venue => {
                self.live_venue(&VenueId::from_uuid(report.target_id))
                    .await?;
            }
        }

        let stored = Report {
            id: ReportId::random(),
            reporter_id: principal.user_id,
            target_kind: report.target_kind,
            target_id: report.target_id,
            reason: report.reason,
            description,
            status: ReportStatus::Open,
            resolution_note: None,
            resolved_by: None,
            created_at: self.clock.utc(),
            resolved_at: None,
        };
        self.reports.create(&stored).await?;
        info!(report_id = %stored.id, target = report.target_kind.as_str(), "report submitted");
        Ok(stored)
    }
}

#[cfg(test)]
#[path = "moderation_service_tests.rs"]
mod tests;
