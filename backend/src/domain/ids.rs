//! Strongly typed identifiers for marketplace entities.
//!
//! Every aggregate is keyed by a UUID v4. Wrapping each in its own newtype
//! stops a court id from being passed where a venue id is expected.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            #[must_use]
            pub fn random() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Borrow the UUID.
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }
    };
}

define_id!(
    /// Identifier of a registered account.
    UserId
);
define_id!(
    /// Identifier of a one-time password challenge.
    OtpChallengeId
);
define_id!(
    /// Identifier of a venue (facility).
    VenueId
);
define_id!(
    /// Identifier of a bookable court inside a venue.
    CourtId
);
define_id!(
    /// Identifier of an amenity offered by venues.
    AmenityId
);
define_id!(
    /// Identifier of an owner-declared unavailable window.
    BlockedSlotId
);
define_id!(
    /// Identifier of a booking.
    BookingId
);
define_id!(
    /// Identifier of a payment attempt.
    PaymentId
);
define_id!(
    /// Identifier of a refund.
    RefundId
);
define_id!(
    /// Identifier of a venue review.
    ReviewId
);
define_id!(
    /// Identifier of a notification row.
    NotificationId
);
define_id!(
    /// Identifier of a moderation report.
    ReportId
);

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn parses_surrounding_whitespace() {
        let id: VenueId = " 5f0c7a52-6a0e-4c58-8b8f-0f5d0b7f0e11 ".parse().expect("uuid");
        assert_eq!(id.to_string(), "5f0c7a52-6a0e-4c58-8b8f-0f5d0b7f0e11");
    }

    #[rstest]
    fn rejects_non_uuid_text() {
        assert!("court-1".parse::<CourtId>().is_err());
    }

    #[rstest]
    fn serialises_as_bare_string() {
        let id = BookingId::from_uuid(Uuid::nil());
        let value = serde_json::to_value(id).expect("serialise");
        assert_eq!(value, serde_json::json!("00000000-0000-0000-0000-000000000000"));
    }
}
