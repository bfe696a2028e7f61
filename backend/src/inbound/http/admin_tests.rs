//! Tests for admin moderation HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use pagination::Page;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::test_fixtures::{account, fixture_now, principal, venue};
use crate::domain::{
    AdminDashboard, Amenity, BanRecord, BookingStatus, Error, Money, Tally,
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

fn admin() -> StateMocks {
    StateMocks::signed_in(principal(UserRole::Admin))
}

#[rstest]
#[actix_web::test]
async fn dashboard_renders_zeroed_tallies() {
    let mut mocks = admin();
    mocks.moderation_query.expect_dashboard().returning(|_| {
        let mut users = Tally::zeroed(UserRole::ALL);
        users.add(UserRole::User, 12);
        Ok(AdminDashboard {
            users,
            banned_users: 1,
            venues: Tally::zeroed(VenueStatus::ALL),
            bookings: Tally::zeroed(BookingStatus::ALL),
            revenue: Money::from_minor(250_000).expect("revenue"),
            reports: Tally::zeroed(ReportStatus::ALL),
        })
    });

    let (status, body) =
        send(mocks, actix_test::TestRequest::get().uri("/api/v1/admin/dashboard")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["users"]["user"], 12);
    assert_eq!(body["data"]["users"]["admin"], 0);
    assert_eq!(body["data"]["venues"]["pending"], 0);
    assert_eq!(body["data"]["revenue"], 250_000);
    assert_eq!(body["data"]["bannedUsers"], 1);
}

#[rstest]
#[actix_web::test]
async fn non_admins_see_the_forbidden_envelope() {
    let mut mocks = StateMocks::signed_in(principal(UserRole::User));
    mocks
        .moderation_query
        .expect_dashboard()
        .returning(|_| Err(Error::forbidden("admin role required")));
    let (status, body) =
        send(mocks, actix_test::TestRequest::get().uri("/api/v1/admin/dashboard")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[rstest]
#[actix_web::test]
async fn user_listing_parses_the_filter() {
    let mut mocks = admin();
    mocks
        .moderation_query
        .expect_list_users()
        .withf(|_, filter, page| {
            filter.role == Some(UserRole::FacilityOwner)
                && filter.banned == Some(true)
                && filter.query.as_deref() == Some("kiran")
                && page.limit() == 10
        })
        .times(1)
        .returning(|_, _, page| Ok(Page::new(vec![account(UserRole::FacilityOwner)], page, 1)));

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::get()
            .uri("/api/v1/admin/users?role=facility_owner&banned=true&q=%20kiran%20&limit=10"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["role"], "facility_owner");
    assert_eq!(body["data"]["limit"], 10);
}

#[rstest]
#[actix_web::test]
async fn bans_require_a_reason() {
    let (status, body) = send(
        admin(),
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/admin/users/{}/ban", UserId::random()))
            .set_json(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "reason");
}

#[rstest]
#[actix_web::test]
async fn bans_return_the_banned_account() {
    let mut mocks = admin();
    let target = UserId::random();
    mocks
        .moderation
        .expect_ban_user()
        .withf(move |_, id, reason| *id == target && reason == "spam bookings")
        .times(1)
        .returning(|_, _, reason| {
            let mut banned = account(UserRole::User);
            banned.ban = Some(BanRecord {
                reason,
                banned_at: fixture_now(),
            });
            Ok(banned)
        });
    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/admin/users/{}/ban", target.as_uuid()))
            .set_json(json!({"reason": "spam bookings"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["banned"], true);
    assert_eq!(body["data"]["banReason"], "spam bookings");
}

#[rstest]
#[actix_web::test]
async fn pending_venues_are_listed_by_status() {
    let mut mocks = admin();
    mocks
        .moderation_query
        .expect_list_venues()
        .withf(|_, status, _| *status == Some(VenueStatus::Pending))
        .times(1)
        .returning(|_, _, page| {
            Ok(Page::new(
                vec![venue(UserId::random(), VenueStatus::Pending)],
                page,
                1,
            ))
        });
    let (status, body) = send(
        mocks,
        actix_test::TestRequest::get().uri("/api/v1/admin/venues?status=pending"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"][0]["status"], "pending");
}

#[rstest]
#[actix_web::test]
async fn rejections_forward_the_reason() {
    let mut mocks = admin();
    mocks
        .moderation
        .expect_reject_venue()
        .withf(|_, _, reason| reason == "photos missing")
        .times(1)
        .returning(|_, _, reason| {
            let mut rejected = venue(UserId::random(), VenueStatus::Rejected);
            rejected.rejection_reason = Some(reason);
            Ok(rejected)
        });
    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/admin/venues/{}/reject", VenueId::random()))
            .set_json(json!({"reason": "photos missing"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["rejectionReason"], "photos missing");
}

#[rstest]
#[case::unknown("/api/v1/admin/reports?status=closed")]
#[case::zero_page("/api/v1/admin/reports?page=0")]
#[actix_web::test]
async fn report_listing_rejects_bad_queries(#[case] uri: &str) {
    let (status, body) = send(admin(), actix_test::TestRequest::get().uri(uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn resolving_parses_the_outcome_and_drops_blank_notes() {
    let mut mocks = admin();
    mocks
        .moderation
        .expect_resolve_report()
        .withf(|_, _, outcome, note| *outcome == ReportStatus::Dismissed && note.is_none())
        .times(1)
        .returning(|_, _, _, _| Err(Error::conflict("report has already been closed")));
    let (status, _) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/admin/reports/{}/resolve", ReportId::random()))
            .set_json(json!({"status": "dismissed", "note": "  "})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[rstest]
#[actix_web::test]
async fn amenities_are_created_and_deleted() {
    let mut mocks = admin();
    mocks
        .moderation
        .expect_create_amenity()
        .withf(|_, name, icon| name == "Parking" && icon.as_deref() == Some("car"))
        .times(1)
        .returning(|_, name, icon| {
            Ok(Amenity {
                id: AmenityId::random(),
                name,
                icon,
            })
        });
    mocks
        .moderation
        .expect_delete_amenity()
        .times(1)
        .returning(|_, _| Ok(()));
    let app = actix_test::init_service(mocks.into_app(configure)).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/admin/amenities")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({"name": "Parking", "icon": "car"}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["data"]["name"], "Parking");

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/admin/amenities/{}", AmenityId::random()))
            .insert_header(bearer(TEST_TOKEN))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}
