//! Tests for facility-owner HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::test_fixtures::{court, date, fixture_now, principal, venue, window};
use crate::domain::{
    BlockedSlot, Money, OwnerDashboard, Tally, UserRole, VenueStatus,
};
use crate::inbound::http::test_utils::{StateMocks, TEST_TOKEN, bearer};

async fn send(mocks: StateMocks, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(mocks.into_app(configure)).await;
    let response = actix_test::call_service(
        &app,
        request.insert_header(bearer(TEST_TOKEN)).to_request(),
    )
    .await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).expect("json"))
}

fn owner_mocks() -> (StateMocks, crate::domain::Principal) {
    let owner = principal(UserRole::FacilityOwner);
    (StateMocks::signed_in(owner), owner)
}

#[rstest]
#[actix_web::test]
async fn venue_creation_builds_a_validated_draft() {
    let (mut mocks, owner) = owner_mocks();
    let amenity = uuid::Uuid::new_v4();
    mocks
        .venues
        .expect_create_venue()
        .withf(move |_, draft| {
            draft.name == "Smash Arena"
                && draft.description.is_empty()
                && draft.amenity_ids == vec![AmenityId::from_uuid(amenity)]
                && draft.photos.len() == 1
        })
        .times(1)
        .returning(move |_, _| Ok(venue(owner.user_id, VenueStatus::Pending)));

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri("/api/v1/owner/venues")
            .set_json(json!({
                "name": "Smash Arena",
                "address": "12 MG Road",
                "city": "Bengaluru",
                "latitude": 12.97,
                "longitude": 77.59,
                "photos": ["https://cdn.example.com/a.jpg"],
                "amenityIds": [amenity, amenity]
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], "pending");
}

#[rstest]
#[case::missing_longitude(
    json!({"name": "Smash Arena", "address": "a", "city": "b", "latitude": 1.0}),
    "longitude"
)]
#[case::latitude_out_of_range(
    json!({"name": "Smash Arena", "address": "a", "city": "b", "latitude": 91.0, "longitude": 0.0}),
    "latitude"
)]
#[case::short_name(
    json!({"name": "ab", "address": "a", "city": "b", "latitude": 1.0, "longitude": 1.0}),
    "name"
)]
#[case::bad_photo(
    json!({"name": "Smash Arena", "address": "a", "city": "b", "latitude": 1.0, "longitude": 1.0,
           "photos": ["ftp://example.com/a.jpg"]}),
    "photos"
)]
#[actix_web::test]
async fn venue_creation_rejects_invalid_drafts(#[case] payload: Value, #[case] field: &str) {
    let (mocks, _) = owner_mocks();
    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri("/api/v1/owner/venues")
            .set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn venue_patches_require_both_coordinates() {
    let (mocks, _) = owner_mocks();
    let (status, body) = send(
        mocks,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/owner/venues/{}", VenueId::random()))
            .set_json(json!({"latitude": 12.0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "longitude");
}

#[rstest]
#[actix_web::test]
async fn venue_deletion_forwards_conflicts() {
    let (mut mocks, _) = owner_mocks();
    mocks
        .venues
        .expect_delete_venue()
        .returning(|_, _| Err(Error::conflict("venue has upcoming bookings")));
    let (status, body) = send(
        mocks,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/owner/venues/{}", VenueId::random())),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[actix_web::test]
async fn court_creation_parses_sport_price_and_hours() {
    let (mut mocks, _) = owner_mocks();
    let venue_id = VenueId::random();
    mocks
        .venues
        .expect_add_court()
        .withf(move |_, id, draft| {
            *id == venue_id
                && draft.sport == Sport::TableTennis
                && draft.price_per_hour == Money::from_minor(40_000).expect("price")
                && draft.hours.open().get() == 7
                && draft.hours.close().get() == 23
        })
        .times(1)
        .returning(|_, id, _| Ok(court(*id)));

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/owner/venues/{venue_id}/courts"))
            .set_json(json!({
                "name": "Table 1",
                "sport": "table_tennis",
                "pricePerHour": 40000,
                "openHour": 7,
                "closeHour": 23
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["venueId"], venue_id.to_string());
}

#[rstest]
#[case::zero_price(
    json!({"name": "C", "sport": "tennis", "pricePerHour": 0, "openHour": 6, "closeHour": 22}),
    "pricePerHour"
)]
#[case::inverted_hours(
    json!({"name": "C", "sport": "tennis", "pricePerHour": 100, "openHour": 22, "closeHour": 6}),
    "closeHour"
)]
#[case::hour_out_of_range(
    json!({"name": "C", "sport": "tennis", "pricePerHour": 100, "openHour": 6, "closeHour": 25}),
    "closeHour"
)]
#[case::unknown_sport(
    json!({"name": "C", "sport": "polo", "pricePerHour": 100, "openHour": 6, "closeHour": 22}),
    "sport"
)]
#[actix_web::test]
async fn court_creation_rejects_invalid_drafts(#[case] payload: Value, #[case] field: &str) {
    let (mocks, _) = owner_mocks();
    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/owner/venues/{}/courts", VenueId::random()))
            .set_json(payload),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn blocks_parse_hour_aligned_windows() {
    let (mut mocks, _) = owner_mocks();
    let court_id = CourtId::random();
    mocks
        .venues
        .expect_block_slot()
        .withf(move |_, id, slot, reason| {
            *id == court_id
                && *slot == window(date(2026, 6, 1), 18, 20)
                && reason.as_deref() == Some("league night")
        })
        .times(1)
        .returning(|_, id, slot, reason| {
            Ok(BlockedSlot {
                id: BlockedSlotId::random(),
                court_id: *id,
                window: slot,
                reason,
                created_at: fixture_now(),
            })
        });

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/owner/courts/{court_id}/blocks"))
            .set_json(json!({
                "date": "2026-06-01",
                "startTime": "18:00",
                "endTime": "20:00",
                "reason": " league night "
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["startTime"], "18:00");
    assert_eq!(body["data"]["endTime"], "20:00");
}

#[rstest]
#[case::half_hour("18:30", "20:00", "startTime")]
#[case::inverted("20:00", "18:00", "endTime")]
#[actix_web::test]
async fn blocks_reject_bad_windows(#[case] start: &str, #[case] end: &str, #[case] field: &str) {
    let (mocks, _) = owner_mocks();
    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/owner/courts/{}/blocks", CourtId::random()))
            .set_json(json!({"date": "2026-06-01", "startTime": start, "endTime": end})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn dashboard_reports_minor_unit_earnings() {
    let (mut mocks, _) = owner_mocks();
    mocks.venues.expect_owner_dashboard().returning(|_| {
        Ok(OwnerDashboard {
            venues: Tally::from_iter([(VenueStatus::Approved, 2), (VenueStatus::Pending, 1)]),
            active_courts: 5,
            bookings_this_month: 12,
            upcoming_confirmed: 3,
            earnings_this_month: Money::from_minor(600_000).expect("money"),
            earnings_all_time: Money::from_minor(2_400_000).expect("money"),
        })
    });

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::get().uri("/api/v1/owner/dashboard"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["venues"]["approved"], 2);
    assert_eq!(body["data"]["earningsThisMonth"], 600_000);
    assert_eq!(body["data"]["currency"], "INR");
}
