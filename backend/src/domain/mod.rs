//! Domain primitives, aggregates and services.
//!
//! Purpose: define the marketplace's strongly typed entities and the
//! use-case services that operate on them. Types here are framework
//! agnostic; HTTP DTOs and database rows live in the adapters.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.
//! - Value types such as [`Email`], [`Money`], [`SlotWindow`] and
//!   [`Coordinates`] that validate on construction.
//! - Aggregates: [`Account`], [`Venue`], [`Court`], [`Booking`],
//!   [`Payment`], [`Review`], [`Notification`] and [`Report`].
//! - Services implementing the driving ports in [`ports`].

pub mod auth;
pub mod booking;
pub mod dashboard;
pub mod error;
pub mod geo;
pub mod ids;
pub mod money;
pub mod notification;
pub mod otp;
pub mod payment;
pub mod ports;
pub mod rating;
pub mod report;
pub mod review;
pub mod schedule;
pub mod search;
pub mod trace_id;
pub mod user;
pub mod validation;
pub mod venue;

mod account_service;
mod booking_service;
mod catalogue_service;
mod driven_ports;
mod moderation_service;
mod notification_service;
mod review_service;
#[cfg(test)]
pub(crate) mod test_fixtures;
mod venue_service;

pub use self::account_service::AccountService;
pub use self::auth::{AccessToken, LoginCredentials, Password, PasswordHash, Principal, RawPassword};
pub use self::booking::{
    Booking, BookingFilter, BookingRequest, BookingScope, BookingStatus, refund_due,
};
pub use self::booking_service::BookingService;
pub use self::catalogue_service::CatalogueService;
pub use self::dashboard::{AdminDashboard, DashboardPeriod, OwnerDashboard, Tally};
pub use self::driven_ports::DrivenPorts;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::geo::{Coordinates, EARTH_RADIUS_KM, SearchRadius, haversine_km};
pub use self::ids::{
    AmenityId, BlockedSlotId, BookingId, CourtId, NotificationId, OtpChallengeId, PaymentId,
    RefundId, ReportId, ReviewId, UserId, VenueId,
};
pub use self::moderation_service::ModerationService;
pub use self::money::{CURRENCY, Money};
pub use self::notification::{
    BookingFacts, NewNotification, Notification, NotificationCursor, NotificationKind,
    PushSubscription,
};
pub use self::notification_service::{MAX_FEED_LIMIT, NotificationService};
pub use self::otp::{OtpChallenge, OtpCode, OtpPolicy, OtpPurpose, OtpVerdict};
pub use self::payment::{
    Checkout, CheckoutConfirmation, GatewayEvent, GatewayOrder, GatewayRefund, Payment,
    PaymentStatus, Refund, RefundStatus, hmac_sha256_hex, verify_hmac_sha256_hex,
};
pub use self::rating::{Rating, RatingSummary, WILSON_Z, wilson_lower_bound};
pub use self::report::{Report, ReportReason, ReportStatus, ReportTargetKind};
pub use self::review::{Review, ReviewSort, ReviewView};
pub use self::review_service::ReviewService;
pub use self::schedule::{BookingPolicy, HourOfDay, OperatingHours, SlotState, SlotWindow};
pub use self::search::{
    SearchCandidate, VenueSearch, VenueSort, VenueSummary, VenueTextFilter, rank_candidates,
};
pub use self::trace_id::TraceId;
pub use self::user::{Account, AccountFilter, BanRecord, Email, FullName, PhoneNumber, UserRole};
pub use self::validation::{FieldError, WebUrl};
pub use self::venue::{
    Amenity, BlockedSlot, Court, CourtDraft, CourtPatch, MAX_PHOTOS, Sport, Venue, VenueDetail,
    VenueDraft, VenuePatch, VenueStatus,
};
pub use self::venue_service::VenueService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use courtside::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
