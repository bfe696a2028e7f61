//! Shared builders for domain service tests.

use chrono::{DateTime, NaiveDate, Utc};

pub(crate) use crate::domain::driven_ports::test_ports::fixture_now;
use crate::domain::ports::BookingView;
use crate::domain::{
    Account, Booking, BookingId, BookingStatus, Coordinates, Court, CourtId, Email, FullName,
    HourOfDay, Money, OperatingHours, PasswordHash, Principal, SlotWindow, Sport, UserId, UserRole,
    Venue, VenueId, VenueStatus,
};

pub(crate) fn principal(role: UserRole) -> Principal {
    Principal {
        user_id: UserId::random(),
        role,
    }
}

pub(crate) fn account(role: UserRole) -> Account {
    let now = fixture_now();
    Account {
        id: UserId::random(),
        email: Email::parse("player@example.com").expect("email"),
        full_name: FullName::parse("Kiran Das").expect("name"),
        phone: None,
        avatar_url: None,
        role,
        email_verified: true,
        password_hash: PasswordHash::new("pbkdf2_sha256$1$salt$hash"),
        ban: None,
        deleted_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(crate) fn window(day: NaiveDate, start: u8, end: u8) -> SlotWindow {
    SlotWindow::new(day, HourOfDay::from_trusted(start), HourOfDay::from_trusted(end))
        .expect("valid window")
}

pub(crate) fn venue(owner_id: UserId, status: VenueStatus) -> Venue {
    let now = fixture_now();
    Venue {
        id: VenueId::random(),
        owner_id,
        name: "Smash Arena".into(),
        description: "Indoor courts with sprung floors".into(),
        address: "12 MG Road".into(),
        city: "Bengaluru".into(),
        location: Coordinates::new(12.9716, 77.5946).expect("coordinates"),
        photos: Vec::new(),
        amenity_ids: Vec::new(),
        status,
        rejection_reason: None,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub(crate) fn court(venue_id: VenueId) -> Court {
    let now = fixture_now();
    Court {
        id: CourtId::random(),
        venue_id,
        name: "Court 1".into(),
        sport: Sport::Badminton,
        price_per_hour: Money::from_minor(50_000).expect("price"),
        hours: OperatingHours::new(HourOfDay::from_trusted(6), HourOfDay::from_trusted(22))
            .expect("hours"),
        active: true,
        created_at: now,
        updated_at: now,
    }
}

pub(crate) fn booking(
    user_id: UserId,
    court: &Court,
    slot: SlotWindow,
    status: BookingStatus,
    created_at: DateTime<Utc>,
) -> Booking {
    Booking {
        id: BookingId::random(),
        user_id,
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

pub(crate) fn view(booking: Booking, owner_id: UserId) -> BookingView {
    BookingView {
        booking,
        venue_name: "Smash Arena".into(),
        court_name: "Court 1".into(),
        sport: Sport::Badminton,
        venue_owner_id: owner_id,
    }
}
