//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Reading goes through `TryFrom` so a row
//! that violates a domain rule surfaces as [`CorruptRow`] instead of a panic.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Account, Amenity, AmenityId, BanRecord, BlockedSlot, BlockedSlotId, Booking, BookingId,
    BookingStatus, Coordinates, Court, CourtId, Email, FullName, Notification, NotificationId,
    NotificationKind, OperatingHours, OtpChallenge, OtpChallengeId, OtpPurpose, PasswordHash,
    Payment, PaymentId, PaymentStatus, PhoneNumber, Rating, Refund, RefundId, RefundStatus,
    Report, ReportId, ReportReason, ReportStatus, ReportTargetKind, Review, ReviewId,
    SlotWindow, Sport, UserId, UserRole, Venue, VenueId, VenueStatus, WebUrl,
};

use super::diesel_helpers::{CorruptRow, hour_from_db, hour_to_db, money_from_db};
use super::schema::{
    amenities, blocked_slots, bookings, courts, notifications, otp_challenges, payments,
    push_subscriptions, refunds, reports, reviews, users, venue_amenities, venues,
};

fn parse_column<T: std::str::FromStr>(column: &'static str, raw: &str) -> Result<T, CorruptRow> {
    raw.parse().map_err(|_| CorruptRow::new(column, raw))
}

fn slot_window(
    date: NaiveDate,
    start_hour: i16,
    end_hour: i16,
) -> Result<SlotWindow, CorruptRow> {
    let start = hour_from_db("start_hour", start_hour)?;
    let end = hour_from_db("end_hour", end_hour)?;
    SlotWindow::new(date, start, end).map_err(|_| CorruptRow::new("end_hour", end_hour))
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub role: String,
    pub email_verified: bool,
    pub banned_at: Option<DateTime<Utc>>,
    pub ban_reason: Option<String>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for Account {
    type Error = CorruptRow;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let ban = row.banned_at.map(|banned_at| BanRecord {
            reason: row.ban_reason.clone().unwrap_or_default(),
            banned_at,
        });
        Ok(Self {
            id: UserId::from_uuid(row.id),
            email: Email::from_trusted(row.email),
            full_name: FullName::from_trusted(row.full_name),
            phone: row.phone.map(PhoneNumber::from_trusted),
            avatar_url: row.avatar_url.map(WebUrl::from_trusted),
            role: parse_column::<UserRole>("role", &row.role)?,
            email_verified: row.email_verified,
            password_hash: PasswordHash::new(row.password_hash),
            ban,
            deleted_at: row.deleted_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Insertable and changeset form of an account.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserRecord<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: &'a str,
    pub phone: Option<&'a str>,
    pub avatar_url: Option<&'a str>,
    pub role: &'a str,
    pub email_verified: bool,
    pub banned_at: Option<DateTime<Utc>>,
    pub ban_reason: Option<&'a str>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Account> for UserRecord<'a> {
    fn from(account: &'a Account) -> Self {
        Self {
            id: *account.id.as_uuid(),
            email: account.email.as_str(),
            password_hash: account.password_hash.as_str(),
            full_name: account.full_name.as_str(),
            phone: account.phone.as_ref().map(PhoneNumber::as_str),
            avatar_url: account.avatar_url.as_ref().map(WebUrl::as_str),
            role: account.role.as_str(),
            email_verified: account.email_verified,
            banned_at: account.ban.as_ref().map(|ban| ban.banned_at),
            ban_reason: account.ban.as_ref().map(|ban| ban.reason.as_str()),
            deleted_at: account.deleted_at,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = otp_challenges)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OtpChallengeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub purpose: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub attempts: i32,
    pub consumed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<OtpChallengeRow> for OtpChallenge {
    type Error = CorruptRow;

    fn try_from(row: OtpChallengeRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: OtpChallengeId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            purpose: parse_column::<OtpPurpose>("purpose", &row.purpose)?,
            code_digest: row.code_hash,
            expires_at: row.expires_at,
            attempts: u32::try_from(row.attempts)
                .map_err(|_| CorruptRow::new("attempts", row.attempts))?,
            consumed_at: row.consumed_at,
            created_at: row.created_at,
        })
    }
}

impl From<&OtpChallenge> for OtpChallengeRow {
    fn from(challenge: &OtpChallenge) -> Self {
        Self {
            id: *challenge.id.as_uuid(),
            user_id: *challenge.user_id.as_uuid(),
            purpose: challenge.purpose.as_str().to_owned(),
            code_hash: challenge.code_digest.clone(),
            expires_at: challenge.expires_at,
            attempts: i32::try_from(challenge.attempts).unwrap_or(i32::MAX),
            consumed_at: challenge.consumed_at,
            created_at: challenge.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Venues, courts and blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = amenities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AmenityRow {
    pub id: Uuid,
    pub name: String,
    pub icon: Option<String>,
}

impl From<AmenityRow> for Amenity {
    fn from(row: AmenityRow) -> Self {
        Self {
            id: AmenityId::from_uuid(row.id),
            name: row.name,
            icon: row.icon,
        }
    }
}

impl From<&Amenity> for AmenityRow {
    fn from(amenity: &Amenity) -> Self {
        Self {
            id: *amenity.id.as_uuid(),
            name: amenity.name.clone(),
            icon: amenity.icon.clone(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = venues)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VenueRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub photos: Vec<String>,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl VenueRow {
    /// Combine the row with its amenity links.
    pub(crate) fn into_venue(self, amenity_ids: Vec<AmenityId>) -> Result<Venue, CorruptRow> {
        Ok(Venue {
            id: VenueId::from_uuid(self.id),
            owner_id: UserId::from_uuid(self.owner_id),
            location: Coordinates::new(self.latitude, self.longitude)
                .map_err(|_| CorruptRow::new("latitude", self.latitude))?,
            name: self.name,
            description: self.description,
            address: self.address,
            city: self.city,
            photos: self.photos.into_iter().map(WebUrl::from_trusted).collect(),
            amenity_ids,
            status: parse_column::<VenueStatus>("status", &self.status)?,
            rejection_reason: self.rejection_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = venues)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct VenueRecord<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub description: &'a str,
    pub address: &'a str,
    pub city: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub photos: Vec<&'a str>,
    pub status: &'a str,
    pub rejection_reason: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a Venue> for VenueRecord<'a> {
    fn from(venue: &'a Venue) -> Self {
        Self {
            id: *venue.id.as_uuid(),
            owner_id: *venue.owner_id.as_uuid(),
            name: &venue.name,
            description: &venue.description,
            address: &venue.address,
            city: &venue.city,
            latitude: venue.location.latitude(),
            longitude: venue.location.longitude(),
            photos: venue.photos.iter().map(WebUrl::as_str).collect(),
            status: venue.status.as_str(),
            rejection_reason: venue.rejection_reason.as_deref(),
            created_at: venue.created_at,
            updated_at: venue.updated_at,
            deleted_at: venue.deleted_at,
        }
    }
}

#[derive(Debug, Clone, Copy, Queryable, Selectable, Insertable)]
#[diesel(table_name = venue_amenities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VenueAmenityRow {
    pub venue_id: Uuid,
    pub amenity_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourtRow {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub name: String,
    pub sport: String,
    pub price_per_hour_minor: i64,
    pub open_hour: i16,
    pub close_hour: i16,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CourtRow> for Court {
    type Error = CorruptRow;

    fn try_from(row: CourtRow) -> Result<Self, Self::Error> {
        let open = hour_from_db("open_hour", row.open_hour)?;
        let close = hour_from_db("close_hour", row.close_hour)?;
        Ok(Self {
            id: CourtId::from_uuid(row.id),
            venue_id: VenueId::from_uuid(row.venue_id),
            sport: parse_column::<Sport>("sport", &row.sport)?,
            price_per_hour: money_from_db("price_per_hour_minor", row.price_per_hour_minor)?,
            hours: OperatingHours::new(open, close)
                .map_err(|_| CorruptRow::new("close_hour", row.close_hour))?,
            name: row.name,
            active: row.active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = courts)]
pub(crate) struct CourtRecord<'a> {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub name: &'a str,
    pub sport: &'a str,
    pub price_per_hour_minor: i64,
    pub open_hour: i16,
    pub close_hour: i16,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Court> for CourtRecord<'a> {
    fn from(court: &'a Court) -> Self {
        Self {
            id: *court.id.as_uuid(),
            venue_id: *court.venue_id.as_uuid(),
            name: &court.name,
            sport: court.sport.as_str(),
            price_per_hour_minor: court.price_per_hour.minor(),
            open_hour: hour_to_db(court.hours.open()),
            close_hour: hour_to_db(court.hours.close()),
            active: court.active,
            created_at: court.created_at,
            updated_at: court.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = blocked_slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BlockedSlotRow {
    pub id: Uuid,
    pub court_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_hour: i16,
    pub end_hour: i16,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<BlockedSlotRow> for BlockedSlot {
    type Error = CorruptRow;

    fn try_from(row: BlockedSlotRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BlockedSlotId::from_uuid(row.id),
            court_id: CourtId::from_uuid(row.court_id),
            window: slot_window(row.slot_date, row.start_hour, row.end_hour)?,
            reason: row.reason,
            created_at: row.created_at,
        })
    }
}

impl From<&BlockedSlot> for BlockedSlotRow {
    fn from(block: &BlockedSlot) -> Self {
        Self {
            id: *block.id.as_uuid(),
            court_id: *block.court_id.as_uuid(),
            slot_date: block.window.date,
            start_hour: hour_to_db(block.window.start),
            end_hour: hour_to_db(block.window.end),
            reason: block.reason.clone(),
            created_at: block.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Bookings and payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = bookings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BookingRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub court_id: Uuid,
    pub venue_id: Uuid,
    pub slot_date: NaiveDate,
    pub start_hour: i16,
    pub end_hour: i16,
    pub total_minor: i64,
    pub status: String,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingRow {
    /// Stored status without decoding the whole row.
    pub(crate) fn status(&self) -> Result<BookingStatus, CorruptRow> {
        parse_column("status", &self.status)
    }

    /// Stored window without decoding the whole row.
    pub(crate) fn window(&self) -> Result<SlotWindow, CorruptRow> {
        slot_window(self.slot_date, self.start_hour, self.end_hour)
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = CorruptRow;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Self {
            window: row.window()?,
            status: row.status()?,
            id: BookingId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            court_id: CourtId::from_uuid(row.court_id),
            venue_id: VenueId::from_uuid(row.venue_id),
            total: money_from_db("total_minor", row.total_minor)?,
            cancellation_reason: row.cancellation_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        Self {
            id: *booking.id.as_uuid(),
            user_id: *booking.user_id.as_uuid(),
            court_id: *booking.court_id.as_uuid(),
            venue_id: *booking.venue_id.as_uuid(),
            slot_date: booking.window.date,
            start_hour: hour_to_db(booking.window.start),
            end_hour: hour_to_db(booking.window.end),
            total_minor: booking.total.minor(),
            status: booking.status.as_str().to_owned(),
            cancellation_reason: booking.cancellation_reason.clone(),
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub gateway_order_id: String,
    pub gateway_payment_id: Option<String>,
    pub amount_minor: i64,
    pub currency: String,
    pub status: String,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = CorruptRow;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: PaymentId::from_uuid(row.id),
            booking_id: BookingId::from_uuid(row.booking_id),
            amount: money_from_db("amount_minor", row.amount_minor)?,
            status: PaymentStatus::parse(&row.status)
                .ok_or_else(|| CorruptRow::new("status", &row.status))?,
            gateway_order_id: row.gateway_order_id,
            gateway_payment_id: row.gateway_payment_id,
            currency: row.currency,
            failure_reason: row.failure_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<&Payment> for PaymentRow {
    fn from(payment: &Payment) -> Self {
        Self {
            id: *payment.id.as_uuid(),
            booking_id: *payment.booking_id.as_uuid(),
            gateway_order_id: payment.gateway_order_id.clone(),
            gateway_payment_id: payment.gateway_payment_id.clone(),
            amount_minor: payment.amount.minor(),
            currency: payment.currency.clone(),
            status: payment.status.as_str().to_owned(),
            failure_reason: payment.failure_reason.clone(),
            created_at: payment.created_at,
            updated_at: payment.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = refunds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct RefundRow {
    pub id: Uuid,
    pub payment_id: Uuid,
    pub gateway_refund_id: Option<String>,
    pub amount_minor: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<RefundRow> for Refund {
    type Error = CorruptRow;

    fn try_from(row: RefundRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RefundId::from_uuid(row.id),
            payment_id: PaymentId::from_uuid(row.payment_id),
            amount: money_from_db("amount_minor", row.amount_minor)?,
            status: RefundStatus::parse(&row.status)
                .ok_or_else(|| CorruptRow::new("status", &row.status))?,
            gateway_refund_id: row.gateway_refund_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<&Refund> for RefundRow {
    fn from(refund: &Refund) -> Self {
        Self {
            id: *refund.id.as_uuid(),
            payment_id: *refund.payment_id.as_uuid(),
            gateway_refund_id: refund.gateway_refund_id.clone(),
            amount_minor: refund.amount.minor(),
            status: refund.status.as_str().to_owned(),
            created_at: refund.created_at,
            updated_at: refund.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Reviews, notifications and reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ReviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub venue_id: Uuid,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Decode a stored star rating.
pub(crate) fn rating_from_db(value: i16) -> Result<Rating, CorruptRow> {
    Rating::new(i64::from(value)).map_err(|_| CorruptRow::new("rating", value))
}

impl TryFrom<ReviewRow> for Review {
    type Error = CorruptRow;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReviewId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            venue_id: VenueId::from_uuid(row.venue_id),
            rating: rating_from_db(row.rating)?,
            comment: row.comment,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl From<&Review> for ReviewRow {
    fn from(review: &Review) -> Self {
        Self {
            id: *review.id.as_uuid(),
            user_id: *review.user_id.as_uuid(),
            venue_id: *review.venue_id.as_uuid(),
            rating: i16::from(review.rating.stars()),
            comment: review.comment.clone(),
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = CorruptRow;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: NotificationId::from_uuid(row.id),
            user_id: UserId::from_uuid(row.user_id),
            kind: NotificationKind::parse(&row.kind)
                .ok_or_else(|| CorruptRow::new("kind", &row.kind))?,
            title: row.title,
            message: row.message,
            read_at: row.read_at,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = push_subscriptions)]
pub(crate) struct NewPushSubscriptionRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint: &'a str,
    pub p256dh: &'a str,
    pub auth: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = reports)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ReportRow {
    pub id: Uuid,
    pub reporter_id: Uuid,
    pub target_kind: String,
    pub target_id: Uuid,
    pub reason: String,
    pub description: String,
    pub status: String,
    pub resolution_note: Option<String>,
    pub resolved_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReportRow> for Report {
    type Error = CorruptRow;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReportId::from_uuid(row.id),
            reporter_id: UserId::from_uuid(row.reporter_id),
            target_kind: parse_column::<ReportTargetKind>("target_kind", &row.target_kind)?,
            target_id: row.target_id,
            reason: parse_column::<ReportReason>("reason", &row.reason)?,
            status: parse_column::<ReportStatus>("status", &row.status)?,
            description: row.description,
            resolution_note: row.resolution_note,
            resolved_by: row.resolved_by.map(UserId::from_uuid),
            created_at: row.created_at,
            resolved_at: row.resolved_at,
        })
    }
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        Self {
            id: *report.id.as_uuid(),
            reporter_id: *report.reporter_id.as_uuid(),
            target_kind: report.target_kind.as_str().to_owned(),
            target_id: report.target_id,
            reason: report.reason.as_str().to_owned(),
            description: report.description.clone(),
            status: report.status.as_str().to_owned(),
            resolution_note: report.resolution_note.clone(),
            resolved_by: report.resolved_by.map(|id| *id.as_uuid()),
            created_at: report.created_at,
            resolved_at: report.resolved_at,
        }
    }
}
