//! Review handlers.
//!
//! ```text
//! GET /api/v1/venues/{id}/reviews?sort=highest
//! POST /api/v1/venues/{id}/reviews {"rating":5,"comment":"Great lighting"}
//! PATCH /api/v1/reviews/{id} {"comment":"Great lighting, cold showers"}
//! ```

use actix_web::{HttpResponse, delete, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::VenueReviews;
use crate::domain::{Rating, ReviewId, ReviewSort, VenueId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{RatingSummaryDto, ReviewDto};
use crate::inbound::http::envelope::{Envelope, PageDto, PageQuery, created, list_policy, ok};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_optional, require};

/// Ordering and paging for venue reviews.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewListParams {
    /// `newest` (default), `highest` or `lowest`.
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Rating summary with one page of reviews.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueReviewsDto {
    pub summary: RatingSummaryDto,
    pub reviews: PageDto<ReviewDto>,
}

impl From<VenueReviews> for VenueReviewsDto {
    fn from(value: VenueReviews) -> Self {
        Self {
            summary: value.summary.into(),
            reviews: PageDto::map(value.reviews, ReviewDto::from),
        }
    }
}

/// Public reviews of a venue.
#[utoipa::path(
    get,
    path = "/api/v1/venues/{id}/reviews",
    params(("id" = Uuid, Path, description = "Venue id"), ReviewListParams),
    responses(
        (status = 200, description = "Reviews", body = Envelope<VenueReviewsDto>),
        (status = 400, description = "Invalid sort or paging", body = ErrorSchema),
        (status = 404, description = "Unknown venue", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "listReviews",
    security([])
)]
#[get("/venues/{id}/reviews")]
pub async fn list_reviews(
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    params: web::Query<ReviewListParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let sort = parse_optional::<ReviewSort>(params.sort.as_deref())?.unwrap_or_default();
    let page = PageQuery {
        page: params.page,
        limit: params.limit,
    }
    .to_request(list_policy())?;
    let venue_id = VenueId::from_uuid(path.into_inner());
    let reviews = state.reviews_query.list(&venue_id, sort, page).await?;
    Ok(ok(VenueReviewsDto::from(reviews)))
}

/// Rating and comment for a played venue.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewBody {
    /// Whole stars, 1 to 5.
    pub rating: Option<i64>,
    /// Up to 1000 characters.
    pub comment: Option<String>,
}

/// Review a venue the caller has played at.
#[utoipa::path(
    post,
    path = "/api/v1/venues/{id}/reviews",
    params(("id" = Uuid, Path, description = "Venue id")),
    request_body = CreateReviewBody,
    responses(
        (status = 201, description = "Review created", body = Envelope<ReviewDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "No completed booking at this venue", body = ErrorSchema),
        (status = 409, description = "Already reviewed", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "createReview"
)]
#[post("/venues/{id}/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<CreateReviewBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let rating = Rating::new(require(body.rating, "rating")?)?;
    let venue_id = VenueId::from_uuid(path.into_inner());
    let review = state
        .reviews
        .create(&caller.0, &venue_id, rating, body.comment.unwrap_or_default())
        .await?;
    Ok(created(ReviewDto::from(review)))
}

/// Replacement rating and comment; absent fields keep their value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewBody {
    pub rating: Option<i64>,
    pub comment: Option<String>,
}

/// Edit the caller's own review.
#[utoipa::path(
    patch,
    path = "/api/v1/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    request_body = UpdateReviewBody,
    responses(
        (status = 200, description = "Review updated", body = Envelope<ReviewDto>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown review", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "updateReview"
)]
#[patch("/reviews/{id}")]
pub async fn update_review(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: web::Json<UpdateReviewBody>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let rating = body.rating.map(Rating::new).transpose()?;
    let id = ReviewId::from_uuid(path.into_inner());
    let review = state
        .reviews
        .update(&caller.0, &id, rating, body.comment)
        .await?;
    Ok(ok(ReviewDto::from(review)))
}

/// Delete a review; authors and admins only.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown review", body = ErrorSchema)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview"
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = ReviewId::from_uuid(path.into_inner());
    state.reviews.delete(&caller.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount the review routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_reviews)
        .service(create_review)
        .service(update_review)
        .service(delete_review);
}
