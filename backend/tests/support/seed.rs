//! Rows seeded straight through the driven ports.
//!
//! Repository suites use these instead of the HTTP surface so each test
//! controls timestamps and statuses exactly.

use chrono::{DateTime, NaiveDate, Utc};

use courtside::domain::{
    Account, Booking, BookingId, BookingStatus, Coordinates, Court, CourtId, DrivenPorts, Email,
    FullName, HourOfDay, Money, OperatingHours, PasswordHash, Principal, SlotWindow, Sport,
    UserId, UserRole, Venue, VenueId, VenueStatus,
};

use super::{start_of_suite, unique_email};

/// Insert a verified account with `role`.
pub async fn account(ports: &DrivenPorts, role: UserRole) -> Account {
    let now = start_of_suite();
    let account = Account {
        id: UserId::random(),
        email: Email::parse(&unique_email("seeded")).expect("email"),
        full_name: FullName::parse("Seeded Player").expect("name"),
        phone: None,
        avatar_url: None,
        role,
        email_verified: true,
        password_hash: PasswordHash::new("pbkdf2_sha256$1$c2FsdA$aGFzaA"),
        ban: None,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    };
    ports.users.create(&account).await.expect("insert account");
    account
}

/// Principal acting as `account`.
pub fn principal(account: &Account) -> Principal {
    Principal {
        user_id: account.id,
        role: account.role,
    }
}

/// Approved venue owned by `owner` with one badminton court open 06-22.
pub async fn court(ports: &DrivenPorts, owner: &Account) -> Court {
    let now = start_of_suite();
    let venue = Venue {
        id: VenueId::random(),
        owner_id: owner.id,
        name: "Seeded Arena".into(),
        description: "Courts seeded for repository tests".into(),
        address: "1 Test Lane".into(),
        city: "Pune".into(),
        location: Coordinates::new(18.52, 73.85).expect("coordinates"),
        photos: Vec::new(),
        amenity_ids: Vec::new(),
        status: VenueStatus::Approved,
        rejection_reason: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    };
    ports.venues.create(&venue).await.expect("insert venue");
    let court = Court {
        id: CourtId::random(),
        venue_id: venue.id,
        name: "Court 1".into(),
        sport: Sport::Badminton,
        price_per_hour: Money::from_minor(50_000).expect("price"),
        hours: OperatingHours::new(HourOfDay::from_trusted(6), HourOfDay::from_trusted(22))
            .expect("hours"),
        active: true,
        created_at: now,
        updated_at: now,
    };
    ports.courts.create(&court).await.expect("insert court");
    court
}

/// 2026-06-02, the day after [`start_of_suite`].
pub fn match_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 2).expect("date")
}

/// `[start, end)` on [`match_day`].
pub fn window(start: u8, end: u8) -> SlotWindow {
    SlotWindow::new(
        match_day(),
        HourOfDay::from_trusted(start),
        HourOfDay::from_trusted(end),
    )
    .expect("window")
}

/// Unsaved booking of `court` by `user`.
pub fn booking(
    user: &Account,
    court: &Court,
    slot: SlotWindow,
    status: BookingStatus,
    created_at: DateTime<Utc>,
) -> Booking {
    Booking {
        id: BookingId::random(),
        user_id: user.id,
        court_id: court.id,
        venue_id: court.venue_id,
        window: slot,
        total: court.price_per_hour.times(slot.hours()).expect("total"),
        status,
        cancellation_reason: None,
        created_at,
        updated_at: created_at,
    }
}
