//! Tests for account HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::{TimeZone, Utc};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::AuthSession;
use crate::domain::test_fixtures::account;
use crate::domain::{AccessToken, UserId};
use crate::inbound::http::test_utils::{StateMocks, TEST_TOKEN, bearer, principal};

async fn send(mocks: StateMocks, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(mocks.into_app(configure)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json body")
    };
    (status, json)
}

#[rstest]
#[actix_web::test]
async fn register_defaults_to_the_player_role() {
    let user_id = UserId::random();
    let mut mocks = StateMocks::default();
    mocks
        .accounts
        .expect_register()
        .withf(|request| {
            request.role == UserRole::User
                && request.email.as_str() == "asha@example.com"
                && request.phone.is_none()
        })
        .times(1)
        .returning(move |_| Ok(user_id));

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({
                "email": " Asha@Example.com ",
                "password": "courtside42",
                "fullName": "Asha Rao"
            })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["userId"], user_id.to_string());
}

#[rstest]
#[case::missing_name(json!({"email": "a@b.in", "password": "courtside42"}), "fullName")]
#[case::weak_password(
    json!({"email": "a@b.in", "password": "short", "fullName": "Asha Rao"}),
    "password"
)]
#[case::bad_email(
    json!({"email": "nope", "password": "courtside42", "fullName": "Asha Rao"}),
    "email"
)]
#[case::unknown_role(
    json!({"email": "a@b.in", "password": "courtside42", "fullName": "Asha Rao", "role": "root"}),
    "role"
)]
#[actix_web::test]
async fn register_rejects_invalid_fields_before_the_service(
    #[case] payload: Value,
    #[case] field: &str,
) {
    let (status, body) = send(
        StateMocks::default(),
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn login_returns_the_token_and_account() {
    let signed_in = account(UserRole::FacilityOwner);
    let expires_at = Utc
        .with_ymd_and_hms(2026, 6, 8, 10, 0, 0)
        .single()
        .expect("timestamp");
    let mut mocks = StateMocks::default();
    let returned = signed_in.clone();
    mocks
        .accounts
        .expect_login()
        .withf(|credentials| credentials.password.expose() == "courtside42")
        .returning(move |_| {
            Ok(AuthSession {
                token: AccessToken {
                    token: "jwt".into(),
                    expires_at,
                },
                account: returned.clone(),
            })
        });

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "player@example.com", "password": "courtside42"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["token"], "jwt");
    assert_eq!(body["data"]["user"]["role"], "facility_owner");
    assert_eq!(body["data"]["user"]["id"], signed_in.id.to_string());
    assert!(body["data"]["user"].get("passwordHash").is_none());
}

#[rstest]
#[actix_web::test]
async fn login_surfaces_the_refusal_reason() {
    let mut mocks = StateMocks::default();
    mocks.accounts.expect_login().returning(|_| {
        Err(Error::forbidden("account is banned").with_details(json!({"reason": "banned"})))
    });

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": "player@example.com", "password": "courtside42"})),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["details"]["reason"], "banned");
}

#[rstest]
#[actix_web::test]
async fn resend_defaults_to_email_verification() {
    let mut mocks = StateMocks::default();
    mocks
        .accounts
        .expect_resend_otp()
        .withf(|_, purpose| *purpose == OtpPurpose::EmailVerification)
        .times(1)
        .returning(|_, _| Ok(()));

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::post()
            .uri("/api/v1/auth/resend-otp")
            .set_json(json!({"email": "player@example.com"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["message"].is_string());
}

#[rstest]
#[actix_web::test]
async fn profile_requires_a_bearer_token() {
    let (status, body) = send(
        StateMocks::default(),
        actix_test::TestRequest::get().uri("/api/v1/users/me"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn profile_patch_distinguishes_null_from_absent() {
    let caller = principal(UserRole::User);
    let mut mocks = StateMocks::signed_in(caller);
    mocks
        .accounts
        .expect_update_profile()
        .withf(|_, patch| {
            patch.phone == Some(None) && patch.avatar_url.is_none() && patch.full_name.is_some()
        })
        .times(1)
        .returning(|_, _| Ok(account(UserRole::User)));

    let (status, _) = send(
        mocks,
        actix_test::TestRequest::patch()
            .uri("/api/v1/users/me")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({"fullName": "Kiran Das", "phone": null})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn account_deletion_answers_no_content() {
    let caller = principal(UserRole::User);
    let mut mocks = StateMocks::signed_in(caller);
    mocks
        .accounts
        .expect_delete_account()
        .withf(|_, password| password.expose() == "courtside42")
        .times(1)
        .returning(|_, _| Ok(()));

    let (status, body) = send(
        mocks,
        actix_test::TestRequest::delete()
            .uri("/api/v1/users/me")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({"password": "courtside42"})),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[rstest]
#[actix_web::test]
async fn change_password_validates_the_new_password() {
    let caller = principal(UserRole::User);
    let (status, body) = send(
        StateMocks::signed_in(caller),
        actix_test::TestRequest::post()
            .uri("/api/v1/users/me/password")
            .insert_header(bearer(TEST_TOKEN))
            .set_json(json!({"currentPassword": "courtside42", "newPassword": "letters"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "newPassword");
}
