//! Public catalogue handlers: venue search, venue detail, amenities, sports
//! and per-court availability.
//!
//! ```text
//! GET /api/v1/venues?city=Bengaluru&sport=badminton&sort=rating
//! GET /api/v1/venues/{id}
//! GET /api/v1/courts/{id}/availability?date=2026-06-01
//! ```

use actix_web::{HttpResponse, get, web};
use pagination::PagePolicy;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::{
    Coordinates, CourtId, Error, SearchRadius, Sport, VenueId, VenueSearch, VenueSort,
    VenueTextFilter,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MaybeAuthenticated;
use crate::inbound::http::dto::{AmenityDto, AvailabilityDto, VenueDetailDto, VenueSummaryDto};
use crate::inbound::http::envelope::{Envelope, PageDto, PageQuery, ok};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    missing_field_error, parse_date, parse_money, parse_optional, require,
};

/// Search results: 12 per page, at most 50.
fn search_policy() -> PagePolicy {
    PagePolicy::new(12, 50)
}

/// Venue search filters.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring of name, description or address.
    pub q: Option<String>,
    /// Case-insensitive city name.
    pub city: Option<String>,
    /// Only venues with an active court for this sport.
    pub sport: Option<String>,
    /// Lower bound on the cheapest hourly price, minor units.
    pub min_price: Option<i64>,
    /// Upper bound on the cheapest hourly price, minor units.
    pub max_price: Option<i64>,
    /// Minimum average rating, 1 to 5.
    pub min_rating: Option<f64>,
    /// Latitude of the search centre; requires `lng`.
    pub lat: Option<f64>,
    /// Longitude of the search centre; requires `lat`.
    pub lng: Option<f64>,
    /// Search radius in km (default 10, at most 100).
    pub radius_km: Option<f64>,
    /// `relevance`, `rating`, `price_asc`, `price_desc`, `distance` or `newest`.
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|raw| !raw.is_empty())
}

impl TryFrom<SearchParams> for VenueSearch {
    type Error = Error;

    fn try_from(value: SearchParams) -> Result<Self, Self::Error> {
        let radius = match (value.lat, value.lng) {
            (Some(lat), Some(lng)) => Some(SearchRadius::new(
                Coordinates::new(lat, lng)?,
                value.radius_km,
            )?),
            (None, None) if value.radius_km.is_none() => None,
            (None, _) => return Err(missing_field_error("lat")),
            (Some(_), None) => return Err(missing_field_error("lng")),
        };
        let search = Self {
            text_filter: VenueTextFilter {
                text: non_blank(value.q),
                city: non_blank(value.city),
            },
            sport: parse_optional::<Sport>(value.sport.as_deref())?,
            min_price: value
                .min_price
                .map(|minor| parse_money(minor, "minPrice"))
                .transpose()?,
            max_price: value
                .max_price
                .map(|minor| parse_money(minor, "maxPrice"))
                .transpose()?,
            min_rating: value.min_rating,
            radius,
            sort: parse_optional::<VenueSort>(value.sort.as_deref())?.unwrap_or_default(),
        };
        Ok(search.validate()?)
    }
}

/// Search approved venues.
#[utoipa::path(
    get,
    path = "/api/v1/venues",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching venues", body = Envelope<PageDto<VenueSummaryDto>>),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "searchVenues",
    security([])
)]
#[get("/venues")]
pub async fn search_venues(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let page = PageQuery {
        page: params.page,
        limit: params.limit,
    }
    .to_request(search_policy())?;
    let search = VenueSearch::try_from(params)?;
    let results = state.catalogue.search(search, page).await?;
    Ok(ok(PageDto::map(results, VenueSummaryDto::from)))
}

/// Venue with courts, amenities and rating summary.
///
/// Pending and rejected venues are visible to their owner and to admins
/// only; everyone else gets `404`.
#[utoipa::path(
    get,
    path = "/api/v1/venues/{id}",
    params(("id" = Uuid, Path, description = "Venue id")),
    responses(
        (status = 200, description = "Venue detail", body = Envelope<VenueDetailDto>),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown or hidden venue", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getVenue"
)]
#[get("/venues/{id}")]
pub async fn venue_detail(
    state: web::Data<HttpState>,
    viewer: MaybeAuthenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = VenueId::from_uuid(path.into_inner());
    let detail = state.catalogue.venue_detail(&id, viewer.0).await?;
    Ok(ok(VenueDetailDto::from(detail)))
}

/// Amenities venues may link.
#[utoipa::path(
    get,
    path = "/api/v1/amenities",
    responses(
        (status = 200, description = "Amenities by name", body = Envelope<Vec<AmenityDto>>),
        (status = 503, description = "Catalogue unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listAmenities",
    security([])
)]
#[get("/amenities")]
pub async fn list_amenities(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let amenities = state.catalogue.list_amenities().await?;
    Ok(ok(amenities
        .into_iter()
        .map(AmenityDto::from)
        .collect::<Vec<_>>()))
}

/// Supported sport.
#[derive(Debug, Serialize, ToSchema)]
pub struct SportDto {
    /// Wire value used in filters and court forms.
    #[schema(example = "table_tennis")]
    pub id: &'static str,
}

/// Sports a court can be configured for.
#[utoipa::path(
    get,
    path = "/api/v1/sports",
    responses((status = 200, description = "Supported sports", body = Envelope<Vec<SportDto>>)),
    tags = ["catalogue"],
    operation_id = "listSports",
    security([])
)]
#[get("/sports")]
pub async fn list_sports() -> HttpResponse {
    ok(Sport::ALL
        .iter()
        .map(|sport| SportDto { id: sport.as_str() })
        .collect::<Vec<_>>())
}

/// Day to render the slot grid for.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AvailabilityParams {
    /// Calendar date in the venue's timezone, `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// Hourly slot states for one court and date.
#[utoipa::path(
    get,
    path = "/api/v1/courts/{id}/availability",
    params(("id" = Uuid, Path, description = "Court id"), AvailabilityParams),
    responses(
        (status = 200, description = "Slot grid", body = Envelope<AvailabilityDto>),
        (status = 400, description = "Missing or malformed date", body = ErrorSchema),
        (status = 404, description = "Court not bookable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "courtAvailability",
    security([])
)]
#[get("/courts/{id}/availability")]
pub async fn court_availability(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    params: web::Query<AvailabilityParams>,
) -> ApiResult<HttpResponse> {
    let court_id = CourtId::from_uuid(path.into_inner());
    let date = parse_date(require(params.date.as_deref(), "date")?, "date")?;
    let availability = state.catalogue.court_availability(&court_id, date).await?;
    Ok(ok(AvailabilityDto::from(availability)))
}

/// Mount the catalogue routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(search_venues)
        .service(venue_detail)
        .service(list_amenities)
        .service(list_sports)
        .service(court_availability);
}

#[cfg(test)]
#[path = "catalogue_tests.rs"]
mod tests;
