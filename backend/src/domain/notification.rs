//! In-app notifications and browser push subscriptions.
//!
//! Notification text is rendered from templates when the triggering event
//! happens, so later edits to a venue do not rewrite history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::money::Money;
use crate::domain::validation::{FieldError, WebUrl};
use crate::domain::{NotificationId, UserId};

/// Event that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Payment captured, booking confirmed.
    BookingConfirmed,
    /// Booking cancelled.
    BookingCancelled,
    /// Booking marked as played.
    BookingCompleted,
    /// Payment attempt failed.
    PaymentFailed,
    /// Refund settled.
    RefundProcessed,
    /// Owner: a court was booked.
    NewBooking,
    /// Owner: a venue was reviewed.
    NewReview,
    /// Owner: venue approved.
    VenueApproved,
    /// Owner: venue rejected.
    VenueRejected,
    /// Reporter: report closed.
    ReportResolved,
}

impl NotificationKind {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BookingConfirmed => "booking_confirmed",
            Self::BookingCancelled => "booking_cancelled",
            Self::BookingCompleted => "booking_completed",
            Self::PaymentFailed => "payment_failed",
            Self::RefundProcessed => "refund_processed",
            Self::NewBooking => "new_booking",
            Self::NewReview => "new_review",
            Self::VenueApproved => "venue_approved",
            Self::VenueRejected => "venue_rejected",
            Self::ReportResolved => "report_resolved",
        }
    }

    /// Parse the storage representation.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        [
            Self::BookingConfirmed,
            Self::BookingCancelled,
            Self::BookingCompleted,
            Self::PaymentFailed,
            Self::RefundProcessed,
            Self::NewBooking,
            Self::NewReview,
            Self::VenueApproved,
            Self::VenueRejected,
            Self::ReportResolved,
        ]
        .into_iter()
        .find(|kind| kind.as_str() == raw)
    }
}

/// Stored notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifier.
    pub id: NotificationId,
    /// Recipient.
    pub user_id: UserId,
    /// Triggering event.
    pub kind: NotificationKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
    /// When the recipient read it.
    pub read_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Notification ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotification {
    /// Recipient.
    pub user_id: UserId,
    /// Triggering event.
    pub kind: NotificationKind,
    /// Short heading.
    pub title: String,
    /// Body text.
    pub message: String,
}

/// Facts used to render booking notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingFacts {
    /// Venue name.
    pub venue_name: String,
    /// Court name.
    pub court_name: String,
    /// Human-readable slot, e.g. `2026-06-01 18:00-20:00`.
    pub slot: String,
}

impl NewNotification {
    fn new(user_id: UserId, kind: NotificationKind, title: &str, message: String) -> Self {
        Self {
            user_id,
            kind,
            title: title.to_owned(),
            message,
        }
    }

    /// Booker: booking confirmed.
    #[must_use]
    pub fn booking_confirmed(user_id: UserId, facts: &BookingFacts) -> Self {
        Self::new(
            user_id,
            NotificationKind::BookingConfirmed,
            "Booking confirmed",
            format!(
                "Your booking for {} at {} on {} is confirmed.",
                facts.court_name, facts.venue_name, facts.slot
            ),
        )
    }

    /// Booker: booking cancelled, with the refund if any.
    #[must_use]
    pub fn booking_cancelled(user_id: UserId, facts: &BookingFacts, refund: Option<Money>) -> Self {
        let refund_note = refund
            .filter(|amount| *amount > Money::ZERO)
            .map(|amount| format!(" A refund of {amount} has been initiated."))
            .unwrap_or_default();
        Self::new(
            user_id,
            NotificationKind::BookingCancelled,
            "Booking cancelled",
            format!(
                "Your booking for {} at {} on {} was cancelled.{refund_note}",
                facts.court_name, facts.venue_name, facts.slot
            ),
        )
    }

    /// Booker: booking completed.
    #[must_use]
    pub fn booking_completed(user_id: UserId, facts: &BookingFacts) -> Self {
        Self::new(
            user_id,
            NotificationKind::BookingCompleted,
            "Thanks for playing",
            format!(
                "Your game at {} on {} is complete. Leave a review to help other players.",
                facts.venue_name, facts.slot
            ),
        )
    }

    /// Booker: payment failed.
    #[must_use]
    pub fn payment_failed(user_id: UserId, facts: &BookingFacts) -> Self {
        Self::new(
            user_id,
            NotificationKind::PaymentFailed,
            "Payment failed",
            format!(
                "Payment for {} at {} on {} failed and the slot was released.",
                facts.court_name, facts.venue_name, facts.slot
            ),
        )
    }

    /// Booker: refund settled.
    #[must_use]
    pub fn refund_processed(user_id: UserId, amount: Money) -> Self {
        Self::new(
            user_id,
            NotificationKind::RefundProcessed,
            "Refund processed",
            format!("Your refund of {amount} has been processed."),
        )
    }

    /// Owner: new confirmed booking.
    #[must_use]
    pub fn new_booking(owner_id: UserId, facts: &BookingFacts) -> Self {
        Self::new(
            owner_id,
            NotificationKind::NewBooking,
            "New booking",
            format!(
                "{} at {} was booked for {}.",
                facts.court_name, facts.venue_name, facts.slot
            ),
        )
    }

    /// Owner: new review.
    #[must_use]
    pub fn new_review(owner_id: UserId, venue_name: &str, stars: u8) -> Self {
        Self::new(
            owner_id,
            NotificationKind::NewReview,
            "New review",
            format!("{venue_name} received a {stars}-star review."),
        )
    }

    /// Owner: venue approved.
    #[must_use]
    pub fn venue_approved(owner_id: UserId, venue_name: &str) -> Self {
        Self::new(
            owner_id,
            NotificationKind::VenueApproved,
            "Venue approved",
            format!("{venue_name} is now live and accepting bookings."),
        )
    }

    /// Owner: venue rejected.
    #[must_use]
    pub fn venue_rejected(owner_id: UserId, venue_name: &str, reason: &str) -> Self {
        Self::new(
            owner_id,
            NotificationKind::VenueRejected,
            "Venue rejected",
            format!("{venue_name} was not approved: {reason}"),
        )
    }

    /// Reporter: report closed.
    #[must_use]
    pub fn report_resolved(reporter_id: UserId, outcome: &str) -> Self {
        Self::new(
            reporter_id,
            NotificationKind::ReportResolved,
            "Report reviewed",
            format!("Your report has been reviewed and {outcome}."),
        )
    }
}

/// Keyset position for notification paging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationCursor {
    /// Creation time of the last item seen.
    pub created_at: DateTime<Utc>,
    /// Identifier of the last item seen.
    pub id: NotificationId,
}

impl From<&Notification> for NotificationCursor {
    fn from(value: &Notification) -> Self {
        Self {
            created_at: value.created_at,
            id: value.id,
        }
    }
}

/// Browser push endpoint registered by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushSubscription {
    /// Owner.
    pub user_id: UserId,
    /// HTTPS push endpoint.
    pub endpoint: WebUrl,
    /// Client public key.
    pub p256dh: String,
    /// Client auth secret.
    pub auth: String,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl PushSubscription {
    /// Validate a push endpoint; only `https` is accepted.
    ///
    /// # Errors
    /// Returns `invalid_url` for non-https or malformed endpoints.
    pub fn validate_endpoint(raw: &str) -> Result<WebUrl, FieldError> {
        let url = WebUrl::parse("endpoint", raw)?;
        if !url.as_str().starts_with("https://") {
            return Err(FieldError::new(
                "endpoint",
                "invalid_url",
                "endpoint must use https",
            ));
        }
        Ok(url)
    }

    /// Validate a base64url key field.
    ///
    /// # Errors
    /// Returns `invalid_key` for empty or non-base64url text.
    pub fn validate_key(field: &'static str, raw: &str) -> Result<String, FieldError> {
        let trimmed = raw.trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= 512
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '=' | '+' | '/'));
        if valid {
            Ok(trimmed.to_owned())
        } else {
            Err(FieldError::new(field, "invalid_key", format!("{field} must be base64url text")))
        }
    }
}
