//! Facility-owner handlers: venues, courts, slot blocks and the dashboard.
//!
//! Every route requires a `facility_owner` token; ownership of the target
//! venue or court is enforced by the venue service.
//!
//! ```text
//! POST /api/v1/owner/venues
//!      {"name":"Smash Arena","address":"12 MG Road","city":"Bengaluru",
//!       "latitude":12.97,"longitude":77.59}
//! POST /api/v1/owner/venues/{id}/courts
//!      {"name":"Court 1","sport":"badminton","pricePerHour":50000,"openHour":6,"closeHour":22}
//! POST /api/v1/owner/courts/{id}/blocks
//!      {"date":"2026-06-01","startTime":"18:00","endTime":"20:00"}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{
    AmenityId, BlockedSlotId, Coordinates, Court, CourtDraft, CourtId, CourtPatch, Error,
    HourOfDay, OperatingHours, Sport, VenueDraft, VenueId, VenuePatch,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{BlockedSlotDto, CourtDto, OwnerDashboardDto, VenueDto};
use crate::inbound::http::envelope::{Envelope, created, ok};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_window, require};

fn amenity_ids(raw: Vec<Uuid>) -> Vec<AmenityId> {
    VenueDraft::dedup_amenities(raw.into_iter().map(AmenityId::from_uuid).collect())
}

fn location(latitude: Option<f64>, longitude: Option<f64>) -> Result<Option<Coordinates>, Error> {
    match (latitude, longitude) {
        (Some(lat), Some(lng)) => Ok(Some(Coordinates::new(lat, lng)?)),
        (None, None) => Ok(None),
        (None, Some(_)) => Err(missing_field_error("latitude")),
        (Some(_), None) => Err(missing_field_error("longitude")),
    }
}

fn hour(field: &'static str, raw: Option<i64>) -> Result<Option<HourOfDay>, Error> {
    Ok(raw.map(|value| HourOfDay::new(field, value)).transpose()?)
}

/// Venue draft; on update, absent fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueBody {
    /// 3 to 100 characters.
    pub name: Option<String>,
    /// Up to 2000 characters.
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Up to 10 http(s) URLs; the first is the cover photo.
    pub photos: Option<Vec<String>>,
    pub amenity_ids: Option<Vec<Uuid>>,
}

impl TryFrom<VenueBody> for VenueDraft {
    type Error = Error;

    fn try_from(value: VenueBody) -> Result<Self, Self::Error> {
        let name = VenueDraft::validate_name(require(value.name.as_deref(), "name")?)?;
        let description =
            VenueDraft::validate_description(value.description.as_deref().unwrap_or_default())?;
        let address = VenueDraft::validate_address(require(value.address.as_deref(), "address")?)?;
        let city = VenueDraft::validate_city(require(value.city.as_deref(), "city")?)?;
        let location = Coordinates::new(
            require(value.latitude, "latitude")?,
            require(value.longitude, "longitude")?,
        )?;
        let photos = VenueDraft::validate_photos(&value.photos.unwrap_or_default())?;
        Ok(Self {
            name,
            description,
            address,
            city,
            location,
            photos,
            amenity_ids: amenity_ids(value.amenity_ids.unwrap_or_default()),
        })
    }
}

impl TryFrom<VenueBody> for VenuePatch {
    type Error = Error;

    fn try_from(value: VenueBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value
                .name
                .as_deref()
                .map(VenueDraft::validate_name)
                .transpose()?,
            description: value
                .description
                .as_deref()
                .map(VenueDraft::validate_description)
                .transpose()?,
            address: value
                .address
                .as_deref()
                .map(VenueDraft::validate_address)
                .transpose()?,
            city: value
                .city
                .as_deref()
                .map(VenueDraft::validate_city)
                .transpose()?,
            location: location(value.latitude, value.longitude)?,
            photos: value
                .photos
                .as_deref()
                .map(VenueDraft::validate_photos)
                .transpose()?,
            amenity_ids: value.amenity_ids.map(amenity_ids),
        })
    }
}

/// Venues owned by the caller, in any status.
#[utoipa::path(
    get,
    path = "/api/v1/owner/venues",
    responses(
        (status = 200, description = "Owned venues", body = Envelope<Vec<VenueDto>>),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a facility owner", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "listOwnerVenues"
)]
#[get("/owner/venues")]
pub async fn list_owner_venues(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let venues = state.venues.list_owner_venues(&caller.0).await?;
    Ok(ok(venues.into_iter().map(VenueDto::from).collect::<Vec<_>>()))
}

/// Submit a venue for approval.
#[utoipa::path(
    post,
    path = "/api/v1/owner/venues",
    request_body = VenueBody,
    responses(
        (status = 201, description = "Venue pending approval", body = Envelope<VenueDto>),
        (status = 400, description = "Invalid request or unknown amenity", body = ErrorSchema),
        (status = 403, description = "Not a facility owner", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "createVenue"
)]
#[post("/owner/venues")]
pub async fn create_venue(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<VenueBody>,
) -> ApiResult<HttpResponse> {
    let draft = VenueDraft::try_from(payload.into_inner())?;
    let venue = state.venues.create_venue(&caller.0, draft).await?;
    Ok(created(VenueDto::from(venue)))
}

/// Edit a venue; public edits send approved venues back to review.
#[utoipa::path(
    patch,
    path = "/api/v1/owner/venues/{id}",
    params(("id" = Uuid, Path, description = "Venue id")),
    request_body = VenueBody,
    responses(
        (status = 200, description = "Updated venue", body = Envelope<VenueDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "updateVenue"
)]
#[patch("/owner/venues/{id}")]
pub async fn update_venue(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<VenueBody>,
) -> ApiResult<HttpResponse> {
    let patch = VenuePatch::try_from(payload.into_inner())?;
    let id = VenueId::from_uuid(path.into_inner());
    let venue = state.venues.update_venue(&caller.0, &id, patch).await?;
    Ok(ok(VenueDto::from(venue)))
}

/// Soft-delete a venue without upcoming bookings.
#[utoipa::path(
    delete,
    path = "/api/v1/owner/venues/{id}",
    params(("id" = Uuid, Path, description = "Venue id")),
    responses(
        (status = 204, description = "Venue deleted"),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema),
        (status = 409, description = "Venue has upcoming bookings", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "deleteVenue"
)]
#[delete("/owner/venues/{id}")]
pub async fn delete_venue(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = VenueId::from_uuid(path.into_inner());
    state.venues.delete_venue(&caller.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// All courts of an owned venue, including inactive ones.
#[utoipa::path(
    get,
    path = "/api/v1/owner/venues/{id}/courts",
    params(("id" = Uuid, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Courts", body = Envelope<Vec<CourtDto>>),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "listCourts"
)]
#[get("/owner/venues/{id}/courts")]
pub async fn list_courts(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let venue_id = VenueId::from_uuid(path.into_inner());
    let courts = state.venues.list_courts(&caller.0, &venue_id).await?;
    Ok(ok(courts.into_iter().map(CourtDto::from).collect::<Vec<_>>()))
}

/// Court draft; on update, absent fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtBody {
    /// 1 to 60 characters.
    pub name: Option<String>,
    /// One of the values from `GET /api/v1/sports`.
    pub sport: Option<String>,
    /// Minor units, greater than zero.
    pub price_per_hour: Option<i64>,
    /// 0 to 23.
    pub open_hour: Option<i64>,
    /// 1 to 24, after `openHour`.
    pub close_hour: Option<i64>,
    /// Only honoured on update.
    pub active: Option<bool>,
}

impl TryFrom<CourtBody> for CourtDraft {
    type Error = Error;

    fn try_from(value: CourtBody) -> Result<Self, Self::Error> {
        let name = Court::validate_name(require(value.name.as_deref(), "name")?)?;
        let sport: Sport = require(value.sport.as_deref(), "sport")?.parse()?;
        let price_per_hour =
            Court::validate_price(require(value.price_per_hour, "pricePerHour")?)?;
        let open = require(hour("openHour", value.open_hour)?, "openHour")?;
        let close = require(hour("closeHour", value.close_hour)?, "closeHour")?;
        Ok(Self {
            name,
            sport,
            price_per_hour,
            hours: OperatingHours::new(open, close)?,
        })
    }
}

impl TryFrom<CourtBody> for CourtPatch {
    type Error = Error;

    fn try_from(value: CourtBody) -> Result<Self, Self::Error> {
        Ok(Self {
            name: value
                .name
                .as_deref()
                .map(Court::validate_name)
                .transpose()?,
            sport: value
                .sport
                .as_deref()
                .map(str::parse::<Sport>)
                .transpose()?,
            price_per_hour: value
                .price_per_hour
                .map(Court::validate_price)
                .transpose()?,
            open_hour: hour("openHour", value.open_hour)?,
            close_hour: hour("closeHour", value.close_hour)?,
            active: value.active,
        })
    }
}

/// Add a court to an owned venue.
#[utoipa::path(
    post,
    path = "/api/v1/owner/venues/{id}/courts",
    params(("id" = Uuid, Path, description = "Venue id")),
    request_body = CourtBody,
    responses(
        (status = 201, description = "Court created", body = Envelope<CourtDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "addCourt"
)]
#[post("/owner/venues/{id}/courts")]
pub async fn add_court(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<CourtBody>,
) -> ApiResult<HttpResponse> {
    let draft = CourtDraft::try_from(payload.into_inner())?;
    let venue_id = VenueId::from_uuid(path.into_inner());
    let court = state.venues.add_court(&caller.0, &venue_id, draft).await?;
    Ok(created(CourtDto::from(court)))
}

/// Edit a court.
#[utoipa::path(
    patch,
    path = "/api/v1/owner/courts/{id}",
    params(("id" = Uuid, Path, description = "Court id")),
    request_body = CourtBody,
    responses(
        (status = 200, description = "Updated court", body = Envelope<CourtDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown court", body = ErrorSchema),
        (status = 409, description = "Deactivation with upcoming bookings", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "updateCourt"
)]
#[patch("/owner/courts/{id}")]
pub async fn update_court(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<CourtBody>,
) -> ApiResult<HttpResponse> {
    let patch = CourtPatch::try_from(payload.into_inner())?;
    let id = CourtId::from_uuid(path.into_inner());
    let court = state.venues.update_court(&caller.0, &id, patch).await?;
    Ok(ok(CourtDto::from(court)))
}

/// Take a court off sale.
#[utoipa::path(
    post,
    path = "/api/v1/owner/courts/{id}/deactivate",
    params(("id" = Uuid, Path, description = "Court id")),
    responses(
        (status = 200, description = "Deactivated court", body = Envelope<CourtDto>),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown court", body = ErrorSchema),
        (status = 409, description = "Court has upcoming bookings", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "deactivateCourt"
)]
#[post("/owner/courts/{id}/deactivate")]
pub async fn deactivate_court(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = CourtId::from_uuid(path.into_inner());
    let court = state.venues.deactivate_court(&caller.0, &id).await?;
    Ok(ok(CourtDto::from(court)))
}

/// Window to close for maintenance or private use.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockBody {
    #[schema(example = "2026-06-01")]
    pub date: Option<String>,
    #[schema(example = "18:00")]
    pub start_time: Option<String>,
    #[schema(example = "20:00")]
    pub end_time: Option<String>,
    pub reason: Option<String>,
}

/// Close a window on a court.
#[utoipa::path(
    post,
    path = "/api/v1/owner/courts/{id}/blocks",
    params(("id" = Uuid, Path, description = "Court id")),
    request_body = BlockBody,
    responses(
        (status = 201, description = "Window blocked", body = Envelope<BlockedSlotDto>),
        (status = 400, description = "Invalid window", body = ErrorSchema),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 409, description = "Window overlaps an active booking", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "blockSlot"
)]
#[post("/owner/courts/{id}/blocks")]
pub async fn block_slot(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<BlockBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let window = parse_window(
        body.date.as_deref(),
        body.start_time.as_deref(),
        body.end_time.as_deref(),
    )?;
    let reason = body
        .reason
        .map(|reason| reason.trim().to_owned())
        .filter(|reason| !reason.is_empty());
    let court_id = CourtId::from_uuid(path.into_inner());
    let blocked = state
        .venues
        .block_slot(&caller.0, &court_id, window, reason)
        .await?;
    Ok(created(BlockedSlotDto::from(blocked)))
}

/// Reopen a blocked window.
#[utoipa::path(
    delete,
    path = "/api/v1/owner/blocks/{id}",
    params(("id" = Uuid, Path, description = "Block id")),
    responses(
        (status = 204, description = "Block removed"),
        (status = 403, description = "Not the owner", body = ErrorSchema),
        (status = 404, description = "Unknown block", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "unblockSlot"
)]
#[delete("/owner/blocks/{id}")]
pub async fn unblock_slot(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = BlockedSlotId::from_uuid(path.into_inner());
    state.venues.unblock_slot(&caller.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Counts and earnings across the caller's venues.
#[utoipa::path(
    get,
    path = "/api/v1/owner/dashboard",
    responses(
        (status = 200, description = "Dashboard", body = Envelope<OwnerDashboardDto>),
        (status = 403, description = "Not a facility owner", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "ownerDashboard"
)]
#[get("/owner/dashboard")]
pub async fn owner_dashboard(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let dashboard = state.venues.owner_dashboard(&caller.0).await?;
    Ok(ok(OwnerDashboardDto::from(dashboard)))
}

/// Mount the owner routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_owner_venues)
        .service(create_venue)
        .service(update_venue)
        .service(delete_venue)
        .service(list_courts)
        .service(add_court)
        .service(update_court)
        .service(deactivate_court)
        .service(block_slot)
        .service(unblock_slot)
        .service(owner_dashboard);
}

#[cfg(test)]
#[path = "owner_tests.rs"]
mod tests;
