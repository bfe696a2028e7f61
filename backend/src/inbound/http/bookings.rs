//! Booking and payment handlers.
//!
//! ```text
//! POST /api/v1/bookings
//!      {"courtId":"…","date":"2026-06-01","startTime":"18:00","endTime":"20:00"}
//! POST /api/v1/payments/confirm {"orderId":"order_1","paymentId":"pay_1","signature":"…"}
//! POST /api/v1/payments/webhook   (raw body, X-Razorpay-Signature header)
//! ```

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::{MyBookingsQuery, OwnerBookingsQuery, WebhookOutcome};
use crate::domain::{
    BookingId, BookingRequest, BookingScope, BookingStatus, CheckoutConfirmation, CourtId, Error,
    VenueId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::{BookingCheckoutDto, BookingDto, CancellationDto};
use crate::inbound::http::envelope::{Envelope, PageDto, PageQuery, created, list_policy, ok};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_optional, parse_window, require};

/// Header carrying the hex HMAC of the webhook body.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";

/// Court and window to hold.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingBody {
    /// Active court at an approved venue.
    pub court_id: Option<Uuid>,
    #[schema(example = "2026-06-01")]
    pub date: Option<String>,
    #[schema(example = "18:00")]
    pub start_time: Option<String>,
    #[schema(example = "20:00")]
    pub end_time: Option<String>,
}

impl TryFrom<CreateBookingBody> for BookingRequest {
    type Error = Error;

    fn try_from(value: CreateBookingBody) -> Result<Self, Self::Error> {
        let court_id = CourtId::from_uuid(require(value.court_id, "courtId")?);
        let window = parse_window(
            value.date.as_deref(),
            value.start_time.as_deref(),
            value.end_time.as_deref(),
        )?;
        Ok(Self { court_id, window })
    }
}

/// Hold a slot and open a gateway order for it.
///
/// The booking stays `pending` until the payment is confirmed; unpaid
/// holds stop blocking the slot after the hold window.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = CreateBookingBody,
    responses(
        (
            status = 201,
            description = "Pending booking with checkout data",
            body = Envelope<BookingCheckoutDto>
        ),
        (status = 400, description = "Invalid window", body = ErrorSchema),
        (status = 404, description = "Court not bookable", body = ErrorSchema),
        (status = 409, description = "Slot already taken", body = ErrorSchema),
        (status = 503, description = "Payment gateway unavailable", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "createBooking"
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<CreateBookingBody>,
) -> ApiResult<HttpResponse> {
    let request = BookingRequest::try_from(payload.into_inner())?;
    let checkout = state.bookings.create(&caller.0, request).await?;
    Ok(created(BookingCheckoutDto::from(checkout)))
}

/// Filters for the caller's booking list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MyBookingsParams {
    /// `pending`, `confirmed`, `cancelled` or `completed`.
    pub status: Option<String>,
    /// `upcoming` (default), `past` or `all`.
    pub scope: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// The caller's bookings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    params(MyBookingsParams),
    responses(
        (status = 200, description = "Bookings", body = Envelope<PageDto<BookingDto>>),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "listMyBookings"
)]
#[get("/bookings")]
pub async fn list_my_bookings(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<MyBookingsParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let query = MyBookingsQuery {
        status: parse_optional::<BookingStatus>(params.status.as_deref())?,
        scope: parse_optional::<BookingScope>(params.scope.as_deref())?.unwrap_or_default(),
    };
    let page = PageQuery {
        page: params.page,
        limit: params.limit,
    }
    .to_request(list_policy())?;
    let bookings = state.bookings_query.list_mine(&caller.0, query, page).await?;
    Ok(ok(PageDto::map(bookings, BookingDto::from)))
}

/// One booking; visible to the booker, the venue owner and admins.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = Envelope<BookingDto>),
        (status = 403, description = "Not a party to the booking", body = ErrorSchema),
        (status = 404, description = "Unknown booking", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "getBooking"
)]
#[get("/bookings/{id}")]
pub async fn get_booking(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = BookingId::from_uuid(path.into_inner());
    let booking = state.bookings_query.get(&caller.0, &id).await?;
    Ok(ok(BookingDto::from(booking)))
}

/// Optional reason stored with a cancellation.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelBookingBody {
    pub reason: Option<String>,
}

/// Cancel before the slot starts; captured payments are refunded in full
/// at least 24 hours ahead and by half after that.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    params(("id" = Uuid, Path, description = "Booking id")),
    request_body(content = CancelBookingBody, description = "Optional reason"),
    responses(
        (
            status = 200,
            description = "Cancelled booking and refund",
            body = Envelope<CancellationDto>
        ),
        (status = 403, description = "Not the booker", body = ErrorSchema),
        (status = 404, description = "Unknown booking", body = ErrorSchema),
        (status = 409, description = "Booking can no longer be cancelled", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[post("/bookings/{id}/cancel")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
    payload: Option<web::Json<CancelBookingBody>>,
) -> ApiResult<HttpResponse> {
    let reason = payload
        .and_then(|body| body.into_inner().reason)
        .map(|reason| reason.trim().to_owned())
        .filter(|reason| !reason.is_empty());
    let id = BookingId::from_uuid(path.into_inner());
    let cancellation = state.bookings.cancel(&caller.0, &id, reason).await?;
    Ok(ok(CancellationDto::from(cancellation)))
}

/// Mark a played booking as completed; venue owner or admin.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/complete",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Completed booking", body = Envelope<BookingDto>),
        (status = 403, description = "Not the venue owner", body = ErrorSchema),
        (status = 404, description = "Unknown booking", body = ErrorSchema),
        (status = 409, description = "Not confirmed or slot not over", body = ErrorSchema)
    ),
    tags = ["bookings"],
    operation_id = "completeBooking"
)]
#[post("/bookings/{id}/complete")]
pub async fn complete_booking(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = BookingId::from_uuid(path.into_inner());
    let booking = state.bookings.complete(&caller.0, &id).await?;
    Ok(ok(BookingDto::from(booking)))
}

/// Filters for bookings across owned venues.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OwnerBookingsParams {
    /// Restrict to one owned venue.
    pub venue_id: Option<Uuid>,
    pub status: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Bookings across the caller's venues.
#[utoipa::path(
    get,
    path = "/api/v1/owner/bookings",
    params(OwnerBookingsParams),
    responses(
        (status = 200, description = "Bookings", body = Envelope<PageDto<BookingDto>>),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 403, description = "Not a facility owner", body = ErrorSchema)
    ),
    tags = ["owner"],
    operation_id = "listOwnerBookings"
)]
#[get("/owner/bookings")]
pub async fn list_owner_bookings(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<OwnerBookingsParams>,
) -> ApiResult<HttpResponse> {
    let params = params.into_inner();
    let query = OwnerBookingsQuery {
        venue_id: params.venue_id.map(VenueId::from_uuid),
        status: parse_optional::<BookingStatus>(params.status.as_deref())?,
    };
    let page = PageQuery {
        page: params.page,
        limit: params.limit,
    }
    .to_request(list_policy())?;
    let bookings = state
        .bookings_query
        .list_for_owner(&caller.0, query, page)
        .await?;
    Ok(ok(PageDto::map(bookings, BookingDto::from)))
}

/// Values returned by the gateway's checkout widget.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentBody {
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    /// Hex HMAC-SHA256 of `"{orderId}|{paymentId}"`.
    pub signature: Option<String>,
}

impl TryFrom<ConfirmPaymentBody> for CheckoutConfirmation {
    type Error = Error;

    fn try_from(value: ConfirmPaymentBody) -> Result<Self, Self::Error> {
        let field = |raw: Option<String>, name: &'static str| {
            require(
                raw.map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()),
                name,
            )
        };
        Ok(Self {
            order_id: field(value.order_id, "orderId")?,
            payment_id: field(value.payment_id, "paymentId")?,
            signature: field(value.signature, "signature")?,
        })
    }
}

/// Client-side payment callback.
#[utoipa::path(
    post,
    path = "/api/v1/payments/confirm",
    request_body = ConfirmPaymentBody,
    responses(
        (status = 200, description = "Booking confirmed", body = Envelope<BookingDto>),
        (status = 400, description = "Bad signature", body = ErrorSchema),
        (status = 404, description = "Unknown order", body = ErrorSchema),
        (status = 409, description = "Slot taken meanwhile; payment refunded", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "confirmPayment"
)]
#[post("/payments/confirm")]
pub async fn confirm_payment(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<ConfirmPaymentBody>,
) -> ApiResult<HttpResponse> {
    let confirmation = CheckoutConfirmation::try_from(payload.into_inner())?;
    let booking = state
        .bookings
        .confirm_payment(&caller.0, confirmation)
        .await?;
    Ok(ok(BookingDto::from(booking)))
}

/// Webhook acknowledgement.
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAckDto {
    /// `applied` or `ignored`.
    pub status: &'static str,
}

/// Gateway webhook; authenticated by the body signature, not a token.
#[utoipa::path(
    post,
    path = "/api/v1/payments/webhook",
    request_body(
        content = String,
        content_type = "application/json",
        description = "Raw gateway event"
    ),
    params(("X-Razorpay-Signature" = String, Header, description = "Hex HMAC-SHA256 of the body")),
    responses(
        (status = 200, description = "Event acknowledged", body = Envelope<WebhookAckDto>),
        (status = 400, description = "Malformed event", body = ErrorSchema),
        (status = 401, description = "Bad signature", body = ErrorSchema)
    ),
    tags = ["payments"],
    operation_id = "paymentWebhook",
    security([])
)]
#[post("/payments/webhook")]
pub async fn payment_webhook(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let signature = req
        .headers()
        .get(WEBHOOK_SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::unauthorized("missing webhook signature"))?;
    let outcome = state.bookings.handle_webhook(&body, signature).await?;
    let status = match outcome {
        WebhookOutcome::Applied => "applied",
        WebhookOutcome::Ignored => "ignored",
    };
    info!(outcome = status, "gateway webhook handled");
    Ok(ok(WebhookAckDto { status }))
}

/// Mount the booking and payment routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_booking)
        .service(list_my_bookings)
        .service(get_booking)
        .service(cancel_booking)
        .service(complete_booking)
        .service(list_owner_bookings)
        .service(confirm_payment)
        .service(payment_webhook);
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
