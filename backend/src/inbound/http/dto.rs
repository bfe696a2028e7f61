//! Response DTOs shared by the HTTP handlers.
//!
//! Domain types stay free of serde and utoipa concerns; each DTO here is a
//! flat camelCase projection built with a `From` impl. Amounts are integer
//! minor units (paise) next to an explicit currency.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::{
    AuthSession, BookingCheckout, BookingView, Cancellation, CourtAvailability, SlotAvailability,
};
use crate::domain::{
    Account, AdminDashboard, Amenity, BlockedSlot, CURRENCY, Checkout, Court, Notification,
    OwnerDashboard, RatingSummary, Refund, Report, Review, ReviewView, SlotWindow, Tally, Venue,
    VenueDetail, VenueSummary,
};

/// Account as shown to its owner and to admins.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountDto {
    pub id: Uuid,
    #[schema(example = "player@example.com")]
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// `user`, `facility_owner` or `admin`.
    pub role: String,
    pub email_verified: bool,
    pub banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Account> for AccountDto {
    fn from(value: Account) -> Self {
        Self {
            id: *value.id.as_uuid(),
            email: value.email.as_str().to_owned(),
            full_name: value.full_name.as_str().to_owned(),
            phone: value.phone.map(|phone| phone.as_str().to_owned()),
            avatar_url: value.avatar_url.map(|url| url.as_str().to_owned()),
            role: value.role.as_str().to_owned(),
            email_verified: value.email_verified,
            banned: value.ban.is_some(),
            ban_reason: value.ban.map(|ban| ban.reason),
            created_at: value.created_at,
        }
    }
}

/// Issued bearer token with the signed-in account.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthSessionDto {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AccountDto,
}

impl From<AuthSession> for AuthSessionDto {
    fn from(value: AuthSession) -> Self {
        Self {
            token: value.token.token,
            expires_at: value.token.expires_at,
            user: value.account.into(),
        }
    }
}

/// Catalogue amenity.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AmenityDto {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl From<Amenity> for AmenityDto {
    fn from(value: Amenity) -> Self {
        Self {
            id: *value.id.as_uuid(),
            name: value.name,
            icon: value.icon,
        }
    }
}

/// Venue as stored, for owners and moderators.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueDto {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photos: Vec<String>,
    pub amenity_ids: Vec<Uuid>,
    /// `pending`, `approved` or `rejected`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Venue> for VenueDto {
    fn from(value: Venue) -> Self {
        Self {
            id: *value.id.as_uuid(),
            owner_id: *value.owner_id.as_uuid(),
            name: value.name,
            description: value.description,
            address: value.address,
            city: value.city,
            latitude: value.location.latitude(),
            longitude: value.location.longitude(),
            photos: value
                .photos
                .iter()
                .map(|photo| photo.as_str().to_owned())
                .collect(),
            amenity_ids: value.amenity_ids.iter().map(|id| *id.as_uuid()).collect(),
            status: value.status.as_str().to_owned(),
            rejection_reason: value.rejection_reason,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

/// Bookable court.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourtDto {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub name: String,
    pub sport: String,
    /// Hourly price in minor units.
    pub price_per_hour: i64,
    pub currency: String,
    /// First bookable hour, 0 to 23.
    #[schema(example = 6)]
    pub open_hour: u8,
    /// Hour the last slot ends, 1 to 24.
    #[schema(example = 22)]
    pub close_hour: u8,
    pub active: bool,
}

impl From<Court> for CourtDto {
    fn from(value: Court) -> Self {
        Self {
            id: *value.id.as_uuid(),
            venue_id: *value.venue_id.as_uuid(),
            name: value.name,
            sport: value.sport.as_str().to_owned(),
            price_per_hour: value.price_per_hour.minor(),
            currency: CURRENCY.to_owned(),
            open_hour: value.hours.open().get(),
            close_hour: value.hours.close().get(),
            active: value.active,
        }
    }
}

/// Aggregate of a venue's reviews.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingSummaryDto {
    /// Mean star rating rounded to one decimal; `0` without reviews.
    pub average: f64,
    pub count: u32,
    /// Lower bound of the 95% Wilson interval, used for ranking.
    pub wilson_score: f64,
    /// Review counts for one through five stars.
    pub histogram: Vec<u32>,
}

impl From<RatingSummary> for RatingSummaryDto {
    fn from(value: RatingSummary) -> Self {
        Self {
            average: value.display_average(),
            count: value.count,
            wilson_score: value.wilson_score(),
            histogram: value.histogram.to_vec(),
        }
    }
}

/// Public venue page with courts and rating.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueDetailDto {
    pub venue: VenueDto,
    pub courts: Vec<CourtDto>,
    pub amenities: Vec<AmenityDto>,
    pub rating: RatingSummaryDto,
}

impl From<VenueDetail> for VenueDetailDto {
    fn from(value: VenueDetail) -> Self {
        Self {
            venue: value.venue.into(),
            courts: value.courts.into_iter().map(Into::into).collect(),
            amenities: value.amenities.into_iter().map(Into::into).collect(),
            rating: value.rating.into(),
        }
    }
}

/// Search result card.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VenueSummaryDto {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub address: String,
    pub sports: Vec<String>,
    /// Cheapest hourly price across active courts, in minor units.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    pub average_rating: f64,
    pub review_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
}

impl From<VenueSummary> for VenueSummaryDto {
    fn from(value: VenueSummary) -> Self {
        Self {
            id: *value.id.as_uuid(),
            name: value.name,
            city: value.city,
            address: value.address,
            sports: value
                .sports
                .iter()
                .map(|sport| sport.as_str().to_owned())
                .collect(),
            min_price: value.min_price.map(|price| price.minor()),
            average_rating: value.average_rating,
            review_count: value.review_count,
            distance_km: value.distance_km,
            cover_photo: value.cover_photo,
        }
    }
}

/// One hour on the availability grid.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotDto {
    pub start_time: String,
    pub end_time: String,
    /// `available`, `booked`, `blocked` or `past`.
    pub state: String,
    pub price: i64,
}

impl From<SlotAvailability> for SlotDto {
    fn from(value: SlotAvailability) -> Self {
        Self {
            start_time: value.window.start.label(),
            end_time: value.window.end.label(),
            state: value.state.as_str().to_owned(),
            price: value.price.minor(),
        }
    }
}

/// Hourly slot grid for one court and day.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityDto {
    pub court: CourtDto,
    pub date: NaiveDate,
    pub currency: String,
    pub slots: Vec<SlotDto>,
}

impl From<CourtAvailability> for AvailabilityDto {
    fn from(value: CourtAvailability) -> Self {
        Self {
            court: value.court.into(),
            date: value.date,
            currency: CURRENCY.to_owned(),
            slots: value.slots.into_iter().map(Into::into).collect(),
        }
    }
}

/// Owner-blocked window.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockedSlotDto {
    pub id: Uuid,
    pub court_id: Uuid,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BlockedSlot> for BlockedSlotDto {
    fn from(value: BlockedSlot) -> Self {
        let SlotWindow { date, start, end } = value.window;
        Self {
            id: *value.id.as_uuid(),
            court_id: *value.court_id.as_uuid(),
            date,
            start_time: start.label(),
            end_time: end.label(),
            reason: value.reason,
            created_at: value.created_at,
        }
    }
}

/// Booking with venue and court names.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub venue_name: String,
    pub court_id: Uuid,
    pub court_name: String,
    pub sport: String,
    pub date: NaiveDate,
    #[schema(example = "18:00")]
    pub start_time: String,
    #[schema(example = "20:00")]
    pub end_time: String,
    pub hours: u32,
    /// Price of the whole slot in minor units.
    pub total_amount: i64,
    pub currency: String,
    /// `pending`, `confirmed`, `cancelled` or `completed`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<BookingView> for BookingDto {
    fn from(value: BookingView) -> Self {
        let booking = value.booking;
        Self {
            id: *booking.id.as_uuid(),
            user_id: *booking.user_id.as_uuid(),
            venue_id: *booking.venue_id.as_uuid(),
            venue_name: value.venue_name,
            court_id: *booking.court_id.as_uuid(),
            court_name: value.court_name,
            sport: value.sport.as_str().to_owned(),
            date: booking.window.date,
            start_time: booking.window.start.label(),
            end_time: booking.window.end.label(),
            hours: booking.window.hours(),
            total_amount: booking.total.minor(),
            currency: CURRENCY.to_owned(),
            status: booking.status.as_str().to_owned(),
            cancellation_reason: booking.cancellation_reason,
            created_at: booking.created_at,
        }
    }
}

/// Parameters the client hands to the gateway's checkout widget.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDto {
    pub order_id: String,
    pub amount: i64,
    pub currency: String,
    pub key_id: String,
}

impl From<Checkout> for CheckoutDto {
    fn from(value: Checkout) -> Self {
        Self {
            order_id: value.order_id,
            amount: value.amount.minor(),
            currency: value.currency,
            key_id: value.key_id,
        }
    }
}

/// Pending booking plus the data the checkout widget needs.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCheckoutDto {
    pub booking: BookingDto,
    pub checkout: CheckoutDto,
}

impl From<BookingCheckout> for BookingCheckoutDto {
    fn from(value: BookingCheckout) -> Self {
        Self {
            booking: value.booking.into(),
            checkout: value.checkout.into(),
        }
    }
}

/// Refund issued for a cancellation.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefundDto {
    pub id: Uuid,
    pub amount: i64,
    pub currency: String,
    /// `pending`, `processed` or `failed`.
    pub status: String,
}

impl From<Refund> for RefundDto {
    fn from(value: Refund) -> Self {
        Self {
            id: *value.id.as_uuid(),
            amount: value.amount.minor(),
            currency: CURRENCY.to_owned(),
            status: value.status.as_str().to_owned(),
        }
    }
}

/// Cancelled booking and any refund.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancellationDto {
    pub booking: BookingDto,
    /// Present when a captured payment was refunded in part or in full.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund: Option<RefundDto>,
}

impl From<Cancellation> for CancellationDto {
    fn from(value: Cancellation) -> Self {
        Self {
            booking: value.booking.into(),
            refund: value.refund.map(Into::into),
        }
    }
}

/// Published review.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    pub rating: u8,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Review> for ReviewDto {
    fn from(value: Review) -> Self {
        Self {
            id: *value.id.as_uuid(),
            venue_id: *value.venue_id.as_uuid(),
            user_id: *value.user_id.as_uuid(),
            author_name: None,
            rating: value.rating.stars(),
            comment: value.comment,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<ReviewView> for ReviewDto {
    fn from(value: ReviewView) -> Self {
        Self {
            author_name: Some(value.author_name),
            ..value.review.into()
        }
    }
}

/// In-app notification.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationDto {
    pub id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationDto {
    fn from(value: Notification) -> Self {
        Self {
            id: *value.id.as_uuid(),
            kind: value.kind.as_str().to_owned(),
            title: value.title,
            message: value.message,
            read: value.read_at.is_some(),
            read_at: value.read_at,
            created_at: value.created_at,
        }
    }
}

/// Moderation report.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportDto {
    pub id: Uuid,
    pub reporter_id: Uuid,
    /// `venue` or `user`.
    pub target_kind: String,
    pub target_id: Uuid,
    pub reason: String,
    pub description: String,
    /// `open`, `resolved` or `dismissed`.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Report> for ReportDto {
    fn from(value: Report) -> Self {
        Self {
            id: *value.id.as_uuid(),
            reporter_id: *value.reporter_id.as_uuid(),
            target_kind: value.target_kind.as_str().to_owned(),
            target_id: value.target_id,
            reason: value.reason.as_str().to_owned(),
            description: value.description,
            status: value.status.as_str().to_owned(),
            resolution_note: value.resolution_note,
            resolved_at: value.resolved_at,
            created_at: value.created_at,
        }
    }
}

fn tally<K: Copy + PartialEq>(
    tally: &Tally<K>,
    label: fn(K) -> &'static str,
) -> BTreeMap<String, u64> {
    tally
        .entries()
        .iter()
        .map(|(key, count)| (label(*key).to_owned(), *count))
        .collect()
}

/// Facility-owner dashboard figures.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OwnerDashboardDto {
    /// Venue counts keyed by status.
    pub venues: BTreeMap<String, u64>,
    pub active_courts: u64,
    pub bookings_this_month: u64,
    pub upcoming_confirmed: u64,
    /// Captured revenue this calendar month, net of processed refunds.
    pub earnings_this_month: i64,
    pub earnings_all_time: i64,
    pub currency: String,
}

impl From<OwnerDashboard> for OwnerDashboardDto {
    fn from(value: OwnerDashboard) -> Self {
        Self {
            venues: tally(&value.venues, |status| status.as_str()),
            active_courts: value.active_courts,
            bookings_this_month: value.bookings_this_month,
            upcoming_confirmed: value.upcoming_confirmed,
            earnings_this_month: value.earnings_this_month.minor(),
            earnings_all_time: value.earnings_all_time.minor(),
            currency: CURRENCY.to_owned(),
        }
    }
}

/// Platform-wide dashboard figures.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardDto {
    /// Account counts keyed by role.
    pub users: BTreeMap<String, u64>,
    pub banned_users: u64,
    pub venues: BTreeMap<String, u64>,
    pub bookings: BTreeMap<String, u64>,
    pub revenue: i64,
    pub currency: String,
    pub reports: BTreeMap<String, u64>,
}

impl From<AdminDashboard> for AdminDashboardDto {
    fn from(value: AdminDashboard) -> Self {
        Self {
            users: tally(&value.users, |role| role.as_str()),
            banned_users: value.banned_users,
            venues: tally(&value.venues, |status| status.as_str()),
            bookings: tally(&value.bookings, |status| status.as_str()),
            revenue: value.revenue.minor(),
            currency: CURRENCY.to_owned(),
            reports: tally(&value.reports, |status| status.as_str()),
        }
    }
}
