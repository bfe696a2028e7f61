//! Shared harness for database-backed HTTP tests.
//!
//! Suites run only when `COURTSIDE_TEST_DATABASE_URL` points at a disposable
//! PostgreSQL database; otherwise each test logs a skip notice and passes.

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use courtside::Trace;
use courtside::domain::{BookingPolicy, DrivenPorts, OtpPolicy};
use courtside::inbound::http::api_routes;
use courtside::inbound::http::error::{json_config, path_config, query_config};
use courtside::inbound::http::state::HttpState;
use courtside::outbound::persistence::{DbPool, PoolConfig, run_migrations};
use courtside::test_support::{Doubles, ports_with_doubles};

pub mod seed;

pub const DATABASE_URL_ENV: &str = "COURTSIDE_TEST_DATABASE_URL";

/// 2026-06-01 10:00 UTC.
pub fn start_of_suite() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 10, 0, 0)
        .single()
        .expect("timestamp")
}

/// Migrated pool, or `None` when no test database is configured.
pub async fn test_pool() -> Option<DbPool> {
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("skipping: {DATABASE_URL_ENV} not set");
        return None;
    };
    run_migrations(&url).await.expect("migrations should apply");
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(4))
        .await
        .expect("pool should build");
    Some(pool)
}

/// Ports and doubles over `pool` with the clock at [`start_of_suite`].
pub fn ports(pool: &DbPool) -> (DrivenPorts, Doubles) {
    ports_with_doubles(pool, start_of_suite())
}

/// The production route table over `ports`.
pub async fn app(
    ports: &DrivenPorts,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let state = HttpState::from_ports(ports, BookingPolicy::default(), OtpPolicy::default());
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(api_routes)),
    )
    .await
}

/// Issue a request and decode the JSON body.
pub async fn call<S>(
    app: &S,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = match method {
        "GET" => test::TestRequest::get(),
        "POST" => test::TestRequest::post(),
        "PATCH" => test::TestRequest::patch(),
        "DELETE" => test::TestRequest::delete(),
        other => panic!("unsupported method {other}"),
    }
    .uri(uri);
    let request = match token {
        Some(token) => request.insert_header((AUTHORIZATION, format!("Bearer {token}"))),
        None => request,
    };
    let request = match body {
        Some(body) => request.set_json(body),
        None => request,
    };
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, value)
}

/// Fresh address so suites can share one database.
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@courtside.test", uuid::Uuid::new_v4().simple())
}

/// Register and verify an account; returns its bearer token.
pub async fn signed_up<S>(app: &S, doubles: &Doubles, email: &str, role: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, _) = call(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "password": "courtside42",
            "fullName": "Test Player",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email}");
    let code = doubles
        .mailer
        .last_code_for(email)
        .expect("verification code mailed");
    let (status, body) = call(
        app,
        "POST",
        "/api/v1/auth/verify-email",
        None,
        Some(serde_json::json!({ "email": email, "code": code })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "verify {email}: {body}");
    token_of(&body)
}

/// Bearer token from an auth session envelope.
pub fn token_of(body: &Value) -> String {
    body["data"]["token"]
        .as_str()
        .expect("token in session")
        .to_owned()
}
