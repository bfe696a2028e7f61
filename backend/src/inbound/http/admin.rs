//! Admin moderation handlers: dashboard, user bans, venue approval,
//! report triage and the amenity catalogue.
//!
//! Every route requires an admin token; the services enforce the role so
//! these handlers only parse and render.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    AccountFilter, AmenityId, ReportId, ReportStatus, UserId, UserRole, VenueId, VenueStatus,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{AccountDto, AdminDashboardDto, AmenityDto, ReportDto, VenueDto};
use crate::inbound::http::envelope::{Envelope, PageDto, PageQuery, created, list_policy, ok};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_optional, require};

/// Platform totals.
#[utoipa::path(
    get,
    path = "/api/v1/admin/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = Envelope<AdminDashboardDto>),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDashboard"
)]
#[get("/admin/dashboard")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let dashboard = state.moderation_query.dashboard(&caller.0).await?;
    Ok(ok(AdminDashboardDto::from(dashboard)))
}

/// Filters for the moderation account list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListParams {
    /// `user`, `facility_owner` or `admin`.
    pub role: Option<String>,
    pub banned: Option<bool>,
    /// Substring of the email or full name.
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    params(UserListParams),
    responses(
        (status = 200, description = "Accounts", body = Envelope<PageDto<AccountDto>>),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<UserListParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let filter = AccountFilter {
        role: parse_optional::<UserRole>(params.role.as_deref())?,
        banned: params.banned,
        query: params
            .q
            .map(|q| q.trim().to_owned())
            .filter(|q| !q.is_empty()),
    };
    let page = PageQuery {
        page: params.page,
        limit: params.limit,
    }
    .to_request(list_policy())?;
    let users = state
        .moderation_query
        .list_users(&caller.0, filter, page)
        .await?;
    Ok(ok(PageDto::map(users, AccountDto::from)))
}

/// Body for actions that must explain themselves to the affected party.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ReasonBody {
    pub reason: Option<String>,
}

/// Ban an account; its tokens stop working immediately.
#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/ban",
    params(("id" = Uuid, Path, description = "User id")),
    request_body = ReasonBody,
    responses(
        (status = 200, description = "Banned account", body = Envelope<AccountDto>),
        (status = 400, description = "Missing reason or self-ban", body = ErrorSchema),
        (status = 403, description = "Admins cannot be banned", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminBanUser"
)]
#[post("/admin/users/{id}/ban")]
pub async fn ban_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<ReasonBody>,
) -> ApiResult<HttpResponse> {
    let reason = require(payload.into_inner().reason, "reason")?;
    let id = UserId::from_uuid(path.into_inner());
    let account = state.moderation.ban_user(&caller.0, &id, reason).await?;
    Ok(ok(AccountDto::from(account)))
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/users/{id}/unban",
    params(("id" = Uuid, Path, description = "User id")),
    responses(
        (status = 200, description = "Reinstated account", body = Envelope<AccountDto>),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminUnbanUser"
)]
#[post("/admin/users/{id}/unban")]
pub async fn unban_user(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = UserId::from_uuid(path.into_inner());
    let account = state.moderation.unban_user(&caller.0, &id).await?;
    Ok(ok(AccountDto::from(account)))
}

/// Moderation-state filter with paging.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusListParams {
    /// Restrict to one moderation state.
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl StatusListParams {
    fn page(&self) -> Result<pagination::PageRequest, crate::domain::Error> {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
        .to_request(list_policy())
    }
}

/// Venues by moderation state, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/admin/venues",
    params(StatusListParams),
    responses(
        (status = 200, description = "Venues", body = Envelope<PageDto<VenueDto>>),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListVenues"
)]
#[get("/admin/venues")]
pub async fn list_venues(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<StatusListParams>,
) -> ApiResult<HttpResponse> {
    let status = parse_optional::<VenueStatus>(params.status.as_deref())?;
    let page = params.page()?;
    let venues = state
        .moderation_query
        .list_venues(&caller.0, status, page)
        .await?;
    Ok(ok(PageDto::map(venues, VenueDto::from)))
}

/// Publish a venue and notify its owner.
#[utoipa::path(
    post,
    path = "/api/v1/admin/venues/{id}/approve",
    params(("id" = Uuid, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Approved venue", body = Envelope<VenueDto>),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminApproveVenue"
)]
#[post("/admin/venues/{id}/approve")]
pub async fn approve_venue(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = VenueId::from_uuid(path.into_inner());
    let venue = state.moderation.approve_venue(&caller.0, &id).await?;
    Ok(ok(VenueDto::from(venue)))
}

/// Refuse a venue; the reason is shown to the owner.
#[utoipa::path(
    post,
    path = "/api/v1/admin/venues/{id}/reject",
    params(("id" = Uuid, Path, description = "Venue id")),
    request_body = ReasonBody,
    responses(
        (status = 200, description = "Rejected venue", body = Envelope<VenueDto>),
        (status = 400, description = "Missing reason", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminRejectVenue"
)]
#[post("/admin/venues/{id}/reject")]
pub async fn reject_venue(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<ReasonBody>,
) -> ApiResult<HttpResponse> {
    let reason = require(payload.into_inner().reason, "reason")?;
    let id = VenueId::from_uuid(path.into_inner());
    let venue = state
        .moderation
        .reject_venue(&caller.0, &id, reason)
        .await?;
    Ok(ok(VenueDto::from(venue)))
}

#[utoipa::path(
    get,
    path = "/api/v1/admin/reports",
    params(StatusListParams),
    responses(
        (status = 200, description = "Reports", body = Envelope<PageDto<ReportDto>>),
        (status = 403, description = "Not an admin", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminListReports"
)]
#[get("/admin/reports")]
pub async fn list_reports(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<StatusListParams>,
) -> ApiResult<HttpResponse> {
    let status = parse_optional::<ReportStatus>(params.status.as_deref())?;
    let page = params.page()?;
    let reports = state
        .moderation_query
        .list_reports(&caller.0, status, page)
        .await?;
    Ok(ok(PageDto::map(reports, ReportDto::from)))
}

/// Outcome recorded when closing a report.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ResolveReportBody {
    /// `resolved` or `dismissed`.
    #[schema(example = "resolved")]
    pub status: Option<String>,
    pub note: Option<String>,
}

/// Close an open report; the reporter is notified.
#[utoipa::path(
    post,
    path = "/api/v1/admin/reports/{id}/resolve",
    params(("id" = Uuid, Path, description = "Report id")),
    request_body = ResolveReportBody,
    responses(
        (status = 200, description = "Closed report", body = Envelope<ReportDto>),
        (status = 400, description = "Invalid outcome", body = ErrorSchema),
        (status = 404, description = "Unknown report", body = ErrorSchema),
        (status = 409, description = "Already closed", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminResolveReport"
)]
#[post("/admin/reports/{id}/resolve")]
pub async fn resolve_report(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<ResolveReportBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let outcome = require(body.status, "status")?.parse::<ReportStatus>()?;
    let note = body
        .note
        .map(|note| note.trim().to_owned())
        .filter(|note| !note.is_empty());
    let id = ReportId::from_uuid(path.into_inner());
    let report = state
        .moderation
        .resolve_report(&caller.0, &id, outcome, note)
        .await?;
    Ok(ok(ReportDto::from(report)))
}

/// New catalogue amenity.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AmenityBody {
    #[schema(example = "Parking")]
    pub name: Option<String>,
    #[schema(example = "car")]
    pub icon: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/amenities",
    request_body = AmenityBody,
    responses(
        (status = 201, description = "Amenity added", body = Envelope<AmenityDto>),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 409, description = "Name taken", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminCreateAmenity"
)]
#[post("/admin/amenities")]
pub async fn create_amenity(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<AmenityBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let name = require(body.name, "name")?;
    let amenity = state
        .moderation
        .create_amenity(&caller.0, name, body.icon)
        .await?;
    Ok(created(AmenityDto::from(amenity)))
}

/// Remove an amenity from the catalogue.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/amenities/{id}",
    params(("id" = Uuid, Path, description = "Amenity id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 404, description = "Unknown amenity", body = ErrorSchema)
    ),
    tags = ["admin"],
    operation_id = "adminDeleteAmenity"
)]
#[delete("/admin/amenities/{id}")]
pub async fn delete_amenity(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = AmenityId::from_uuid(path.into_inner());
    state.moderation.delete_amenity(&caller.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount the admin routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard)
        .service(list_users)
        .service(ban_user)
        .service(unban_user)
        .service(list_venues)
        .service(approve_venue)
        .service(reject_venue)
        .service(list_reports)
        .service(resolve_report)
        .service(create_amenity)
        .service(delete_amenity);
}

#[cfg(test)]
#[path = "admin_tests.rs"]
mod tests;
