//! Venues, their courts and owner-declared blocked windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::auth::Principal;
use crate::domain::geo::Coordinates;
use crate::domain::money::Money;
use crate::domain::rating::RatingSummary;
use crate::domain::schedule::{OperatingHours, SlotWindow};
use crate::domain::validation::{FieldError, WebUrl, bounded_text};
use crate::domain::{AmenityId, BlockedSlotId, CourtId, UserId, VenueId};

/// Most photos a venue may list.
pub const MAX_PHOTOS: usize = 10;

/// Moderation state of a venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueStatus {
    /// Waiting for an admin.
    Pending,
    /// Publicly listed.
    Approved,
    /// Refused by an admin.
    Rejected,
}

impl VenueStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Approved, Self::Rejected];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for VenueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VenueStatus {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(FieldError::new(
                "status",
                "invalid_status",
                "status must be pending, approved or rejected",
            )),
        }
    }
}

/// Sports a court can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    /// Badminton.
    Badminton,
    /// Tennis.
    Tennis,
    /// Football.
    Football,
    /// Cricket.
    Cricket,
    /// Basketball.
    Basketball,
    /// Table tennis.
    TableTennis,
    /// Squash.
    Squash,
    /// Volleyball.
    Volleyball,
    /// Pickleball.
    Pickleball,
}

impl Sport {
    /// Every supported sport.
    pub const ALL: [Self; 9] = [
        Self::Badminton,
        Self::Tennis,
        Self::Football,
        Self::Cricket,
        Self::Basketball,
        Self::TableTennis,
        Self::Squash,
        Self::Volleyball,
        Self::Pickleball,
    ];

    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Badminton => "badminton",
            Self::Tennis => "tennis",
            Self::Football => "football",
            Self::Cricket => "cricket",
            Self::Basketball => "basketball",
            Self::TableTennis => "table_tennis",
            Self::Squash => "squash",
            Self::Volleyball => "volleyball",
            Self::Pickleball => "pickleball",
        }
    }
}

impl std::fmt::Display for Sport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Sport {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|sport| sport.as_str() == normalised)
            .ok_or_else(|| FieldError::new("sport", "invalid_sport", "sport is not supported"))
    }
}

/// Facility feature such as parking or showers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amenity {
    /// Identifier.
    pub id: AmenityId,
    /// Unique display name.
    pub name: String,
    /// Optional icon key for clients.
    pub icon: Option<String>,
}

impl Amenity {
    /// Validate an amenity name (1..=50 characters).
    ///
    /// # Errors
    /// Returns a [`FieldError`] for `name`.
    pub fn validate_name(raw: &str) -> Result<String, FieldError> {
        bounded_text("name", raw, 1, 50)
    }
}

/// Physical location with one or more courts.
#[derive(Debug, Clone, PartialEq)]
pub struct Venue {
    /// Identifier.
    pub id: VenueId,
    /// Facility owner account.
    pub owner_id: UserId,
    /// Public name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// City used by the city filter.
    pub city: String,
    /// Map position.
    pub location: Coordinates,
    /// Photo URLs, first one used as the cover.
    pub photos: Vec<WebUrl>,
    /// Linked amenities.
    pub amenity_ids: Vec<AmenityId>,
    /// Moderation state.
    pub status: VenueStatus,
    /// Admin note for rejected venues.
    pub rejection_reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Soft-deletion timestamp.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Venue {
    /// Whether `user` owns the venue.
    #[must_use]
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        self.owner_id == *user
    }

    /// Approved and not deleted.
    #[must_use]
    pub fn is_public(&self) -> bool {
        self.status == VenueStatus::Approved && self.deleted_at.is_none()
    }

    /// Approved venues are visible to everyone; other states only to the
    /// owner and admins.
    #[must_use]
    pub fn is_visible_to(&self, viewer: Option<&Principal>) -> bool {
        if self.deleted_at.is_some() {
            return viewer.is_some_and(Principal::is_admin);
        }
        self.is_public()
            || viewer.is_some_and(|principal| {
                principal.is_admin() || self.is_owned_by(&principal.user_id)
            })
    }

    /// Whether `principal` may manage the venue.
    #[must_use]
    pub fn is_managed_by(&self, principal: &Principal) -> bool {
        principal.is_admin() || self.is_owned_by(&principal.user_id)
    }

    /// Apply an owner edit. Returns `true` when public fields changed, in
    /// which case the venue goes back to moderation.
    pub fn apply(&mut self, patch: VenuePatch, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        if let Some(name) = patch.name {
            changed |= name != self.name;
            self.name = name;
        }
        if let Some(description) = patch.description {
            changed |= description != self.description;
            self.description = description;
        }
        if let Some(address) = patch.address {
            changed |= address != self.address;
            self.address = address;
        }
        if let Some(city) = patch.city {
            changed |= city != self.city;
            self.city = city;
        }
        if let Some(location) = patch.location {
            changed |= location != self.location;
            self.location = location;
        }
        if let Some(photos) = patch.photos {
            changed |= photos != self.photos;
            self.photos = photos;
        }
        if let Some(amenity_ids) = patch.amenity_ids {
            self.amenity_ids = amenity_ids;
        }
        if changed && self.status != VenueStatus::Pending {
            self.status = VenueStatus::Pending;
            self.rejection_reason = None;
        }
        self.updated_at = now;
        changed
    }
}

/// Validated venue fields.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueDraft {
    /// Public name.
    pub name: String,
    /// Description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// Map position.
    pub location: Coordinates,
    /// Photo URLs.
    pub photos: Vec<WebUrl>,
    /// Linked amenities.
    pub amenity_ids: Vec<AmenityId>,
}

impl VenueDraft {
    /// Validate a venue name (3..=100 characters).
    ///
    /// # Errors
    /// Returns a [`FieldError`] for `name`.
    pub fn validate_name(raw: &str) -> Result<String, FieldError> {
        bounded_text("name", raw, 3, 100)
    }

    /// Validate a description (at most 2000 characters, may be empty).
    ///
    /// # Errors
    /// Returns a [`FieldError`] for `description`.
    pub fn validate_description(raw: &str) -> Result<String, FieldError> {
        bounded_text("description", raw, 0, 2000)
    }

    /// Validate a street address.
    ///
    /// # Errors
    /// Returns a [`FieldError`] for `address`.
    pub fn validate_address(raw: &str) -> Result<String, FieldError> {
        bounded_text("address", raw, 1, 300)
    }

    /// Validate a city name.
    ///
    /// # Errors
    /// Returns a [`FieldError`] for `city`.
    pub fn validate_city(raw: &str) -> Result<String, FieldError> {
        bounded_text("city", raw, 1, 100)
    }

    /// Validate photo URLs.
    ///
    /// # Errors
    /// Returns `too_many` above [`MAX_PHOTOS`] or the first bad URL's error.
    pub fn validate_photos(raw: &[String]) -> Result<Vec<WebUrl>, FieldError> {
        if raw.len() > MAX_PHOTOS {
            return Err(FieldError::new(
                "photos",
                "too_many",
                format!("at most {MAX_PHOTOS} photos are allowed"),
            ));
        }
        raw.iter().map(|url| WebUrl::parse("photos", url)).collect()
    }

    /// Deduplicate amenity ids preserving first occurrence.
    #[must_use]
    pub fn dedup_amenities(ids: Vec<AmenityId>) -> Vec<AmenityId> {
        let mut seen = Vec::with_capacity(ids.len());
        for id in ids {
            if !seen.contains(&id) {
                seen.push(id);
            }
        }
        seen
    }
}

/// Partial owner edit; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenuePatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New position.
    pub location: Option<Coordinates>,
    /// Replacement photo list.
    pub photos: Option<Vec<WebUrl>>,
    /// Replacement amenity list.
    pub amenity_ids: Option<Vec<AmenityId>>,
}

impl VenuePatch {
    /// Whether nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.address.is_none()
            && self.city.is_none()
            && self.location.is_none()
            && self.photos.is_none()
            && self.amenity_ids.is_none()
    }
}

/// Bookable unit inside a venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Court {
    /// Identifier.
    pub id: CourtId,
    /// Parent venue.
    pub venue_id: VenueId,
    /// Name shown within the venue.
    pub name: String,
    /// Configured sport.
    pub sport: Sport,
    /// Price of one hour.
    pub price_per_hour: Money,
    /// Daily opening hours.
    pub hours: OperatingHours,
    /// Deactivated courts are hidden and cannot be booked.
    pub active: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Court {
    /// Validate a court name (1..=60 characters).
    ///
    /// # Errors
    /// Returns a [`FieldError`] for `name`.
    pub fn validate_name(raw: &str) -> Result<String, FieldError> {
        bounded_text("name", raw, 1, 60)
    }

    /// Validate an hourly price in minor units (must be positive).
    ///
    /// # Errors
    /// Returns an `out_of_range` [`FieldError`] for `pricePerHour`.
    pub fn validate_price(minor: i64) -> Result<Money, FieldError> {
        Money::from_minor(minor)
            .filter(|price| *price > Money::ZERO)
            .ok_or_else(|| {
                FieldError::new(
                    "pricePerHour",
                    "out_of_range",
                    "pricePerHour must be greater than zero",
                )
            })
    }

    /// Apply an owner edit.
    ///
    /// # Errors
    /// Returns `invalid_hours` when the merged opening hours are inverted.
    pub fn apply(&mut self, patch: CourtPatch, now: DateTime<Utc>) -> Result<(), FieldError> {
        let open = patch.open_hour.unwrap_or(self.hours.open());
        let close = patch.close_hour.unwrap_or(self.hours.close());
        self.hours = OperatingHours::new(open, close)?;
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(sport) = patch.sport {
            self.sport = sport;
        }
        if let Some(price) = patch.price_per_hour {
            self.price_per_hour = price;
        }
        if let Some(active) = patch.active {
            self.active = active;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// Validated fields for a new court.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourtDraft {
    /// Name.
    pub name: String,
    /// Sport.
    pub sport: Sport,
    /// Price of one hour.
    pub price_per_hour: Money,
    /// Opening hours.
    pub hours: OperatingHours,
}

/// Partial court edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourtPatch {
    /// New name.
    pub name: Option<String>,
    /// New sport.
    pub sport: Option<Sport>,
    /// New price.
    pub price_per_hour: Option<Money>,
    /// New opening hour.
    pub open_hour: Option<crate::domain::schedule::HourOfDay>,
    /// New closing hour.
    pub close_hour: Option<crate::domain::schedule::HourOfDay>,
    /// Reactivate or deactivate.
    pub active: Option<bool>,
}

/// Window an owner closed for maintenance or private use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedSlot {
    /// Identifier.
    pub id: BlockedSlotId,
    /// Court affected.
    pub court_id: CourtId,
    /// Closed window.
    pub window: SlotWindow,
    /// Optional note.
    pub reason: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Venue with everything the detail page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueDetail {
    /// The venue.
    pub venue: Venue,
    /// Active courts.
    pub courts: Vec<Court>,
    /// Linked amenities.
    pub amenities: Vec<Amenity>,
    /// Aggregate of reviews.
    pub rating: RatingSummary,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::UserRole;
    use crate::domain::schedule::HourOfDay;

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).single().expect("valid time")
    }

    #[fixture]
    fn venue(now: DateTime<Utc>) -> Venue {
        Venue {
            id: VenueId::random(),
            owner_id: UserId::random(),
            name: "Smash Arena".into(),
            description: "Four wooden courts".into(),
            address: "12 Link Road".into(),
            city: "Pune".into(),
            location: Coordinates::new(18.52, 73.85).expect("valid coordinates"),
            photos: Vec::new(),
            amenity_ids: Vec::new(),
            status: VenueStatus::Approved,
            rejection_reason: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    fn principal(role: UserRole) -> Principal {
        Principal {
            user_id: UserId::random(),
            role,
        }
    }

    #[rstest]
    #[case("badminton", Sport::Badminton)]
    #[case("Table Tennis", Sport::TableTennis)]
    #[case("table-tennis", Sport::TableTennis)]
    fn parses_sports(#[case] raw: &str, #[case] expected: Sport) {
        assert_eq!(raw.parse::<Sport>().expect("known sport"), expected);
    }

    #[rstest]
    fn rejects_unknown_sport() {
        assert_eq!("curling".parse::<Sport>().expect_err("unknown").code(), "invalid_sport");
    }

    #[rstest]
    fn editing_public_fields_returns_to_moderation(mut venue: Venue, now: DateTime<Utc>) {
        let changed = venue.apply(
            VenuePatch {
                name: Some("Smash Arena Plus".into()),
                ..VenuePatch::default()
            },
            now,
        );
        assert!(changed);
        assert_eq!(venue.status, VenueStatus::Pending);
    }

    #[rstest]
    fn amenity_only_edit_keeps_approval(mut venue: Venue, now: DateTime<Utc>) {
        let changed = venue.apply(
            VenuePatch {
                amenity_ids: Some(vec![AmenityId::random()]),
                ..VenuePatch::default()
            },
            now,
        );
        assert!(!changed);
        assert_eq!(venue.status, VenueStatus::Approved);
    }

    #[rstest]
    fn pending_venues_hidden_from_public(mut venue: Venue) {
        venue.status = VenueStatus::Pending;
        assert!(!venue.is_visible_to(None));
        assert!(!venue.is_visible_to(Some(&principal(UserRole::User))));
        assert!(venue.is_visible_to(Some(&principal(UserRole::Admin))));
        let owner = Principal {
            user_id: venue.owner_id,
            role: UserRole::FacilityOwner,
        };
        assert!(venue.is_visible_to(Some(&owner)));
    }

    #[rstest]
    fn deleted_venues_only_visible_to_admins(mut venue: Venue, now: DateTime<Utc>) {
        venue.deleted_at = Some(now);
        let owner = Principal {
            user_id: venue.owner_id,
            role: UserRole::FacilityOwner,
        };
        assert!(!venue.is_visible_to(Some(&owner)));
        assert!(venue.is_visible_to(Some(&principal(UserRole::Admin))));
    }

    #[rstest]
    fn rejects_too_many_photos() {
        let photos = vec!["https://img.example/a.jpg".to_owned(); MAX_PHOTOS + 1];
        assert_eq!(
            VenueDraft::validate_photos(&photos).expect_err("too many").code(),
            "too_many"
        );
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn rejects_non_positive_prices(#[case] minor: i64) {
        assert!(Court::validate_price(minor).is_err());
    }

    #[rstest]
    fn court_patch_revalidates_hours(now: DateTime<Utc>) {
        let mut court = Court {
            id: CourtId::random(),
            venue_id: VenueId::random(),
            name: "Court 1".into(),
            sport: Sport::Badminton,
            price_per_hour: Money::from_minor(50_000).expect("price"),
            hours: OperatingHours::new(HourOfDay::from_trusted(6), HourOfDay::from_trusted(22))
                .expect("hours"),
            active: true,
            created_at: now,
            updated_at: now,
        };
        let patch = CourtPatch {
            open_hour: Some(HourOfDay::from_trusted(23)),
            ..CourtPatch::default()
        };
        assert!(court.apply(patch, now).is_err());
        assert_eq!(court.hours.open().get(), 6);
    }

    #[rstest]
    fn dedups_amenities() {
        let id = AmenityId::random();
        assert_eq!(VenueDraft::dedup_amenities(vec![id, id]), vec![id]);
    }
}
