//! In-app notification feed and push subscription handlers.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::ports::PushRegistration;
use crate::domain::{Error, FieldError, NotificationId, WebUrl};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::NotificationDto;
use crate::inbound::http::envelope::{CursorPageDto, Envelope, MessageDto, acknowledged, ok};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::require;

const DEFAULT_FEED_LIMIT: u32 = 20;

/// Feed filters and keyset position.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FeedParams {
    /// Only unread notifications.
    #[serde(default)]
    pub unread_only: bool,
    /// Opaque token from the previous slice.
    pub cursor: Option<String>,
    /// Slice size, 1 to 50 (default 20).
    pub limit: Option<u32>,
}

/// Newest-first feed of the caller's notifications.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    params(FeedParams),
    responses(
        (status = 200, description = "Feed slice", body = Envelope<CursorPageDto<NotificationDto>>),
        (status = 400, description = "Bad cursor or limit", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    caller: Authenticated,
    params: web::Query<FeedParams>,
) -> ApiResult<HttpResponse> {
    let FeedParams {
        unread_only,
        cursor,
        limit,
    } = params.into_inner();
    let cursor = cursor.filter(|token| !token.trim().is_empty());
    let feed = state
        .notifications_query
        .list(
            &caller.0,
            unread_only,
            cursor,
            limit.unwrap_or(DEFAULT_FEED_LIMIT),
        )
        .await?;
    Ok(ok(CursorPageDto::map(feed, NotificationDto::from)))
}

/// Unread badge count.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnreadCountDto {
    pub unread: u64,
}

/// Unread badge count.
#[utoipa::path(
    get,
    path = "/api/v1/notifications/unread-count",
    responses(
        (status = 200, description = "Unread count", body = Envelope<UnreadCountDto>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "unreadNotificationCount"
)]
#[get("/notifications/unread-count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let unread = state.notifications_query.unread_count(&caller.0).await?;
    Ok(ok(UnreadCountDto { unread }))
}

/// Mark one notification read. Already-read notifications are left as is.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 200, description = "Marked read", body = Envelope<MessageDto>),
        (status = 404, description = "Unknown notification", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = NotificationId::from_uuid(path.into_inner());
    state.notifications.mark_read(&caller.0, &id).await?;
    Ok(acknowledged("notification marked read"))
}

/// Result of a bulk mark-read.
#[derive(Debug, Serialize, ToSchema)]
pub struct MarkedDto {
    /// Notifications that changed state.
    pub updated: u64,
}

/// Mark the whole feed read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/read-all",
    responses(
        (
            status = 200,
            description = "Count of notifications marked read",
            body = Envelope<MarkedDto>
        ),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "markAllNotificationsRead"
)]
#[post("/notifications/read-all")]
pub async fn mark_all_read(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<HttpResponse> {
    let updated = state.notifications.mark_all_read(&caller.0).await?;
    Ok(ok(MarkedDto { updated }))
}

#[utoipa::path(
    delete,
    path = "/api/v1/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown notification", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "deleteNotification"
)]
#[delete("/notifications/{id}")]
pub async fn delete_notification(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let id = NotificationId::from_uuid(path.into_inner());
    state.notifications.delete(&caller.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Web Push registration as produced by `PushManager.subscribe()`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PushSubscriptionBody {
    #[schema(example = "https://push.example.com/send/abc")]
    pub endpoint: Option<String>,
    pub keys: Option<PushKeysBody>,
}

/// Client keys from `PushSubscription.toJSON()`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PushKeysBody {
    pub p256dh: Option<String>,
    pub auth: Option<String>,
}

fn secure_endpoint(raw: &str) -> Result<WebUrl, Error> {
    let url = WebUrl::parse("endpoint", raw)?;
    if !url.as_str().starts_with("https://") {
        return Err(FieldError::new("endpoint", "invalid_url", "endpoint must use https").into());
    }
    Ok(url)
}

fn non_blank(value: Option<String>, field: &'static str) -> Result<String, Error> {
    require(
        value
            .map(|raw| raw.trim().to_owned())
            .filter(|raw| !raw.is_empty()),
        field,
    )
}

impl TryFrom<PushSubscriptionBody> for PushRegistration {
    type Error = Error;

    fn try_from(value: PushSubscriptionBody) -> Result<Self, Self::Error> {
        let endpoint = secure_endpoint(&require(value.endpoint, "endpoint")?)?;
        let keys = require(value.keys, "keys")?;
        Ok(Self {
            endpoint,
            p256dh: non_blank(keys.p256dh, "keys.p256dh")?,
            auth: non_blank(keys.auth, "keys.auth")?,
        })
    }
}

/// Register or refresh a Web Push endpoint for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/push-subscriptions",
    request_body = PushSubscriptionBody,
    responses(
        (status = 200, description = "Subscribed", body = Envelope<MessageDto>),
        (status = 400, description = "Invalid subscription", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "subscribePush"
)]
#[post("/push-subscriptions")]
pub async fn subscribe_push(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<PushSubscriptionBody>,
) -> ApiResult<HttpResponse> {
    let registration = PushRegistration::try_from(payload.into_inner())?;
    state
        .notifications
        .subscribe_push(&caller.0, registration)
        .await?;
    Ok(acknowledged("push subscription saved"))
}

/// Endpoint to forget.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UnsubscribeBody {
    pub endpoint: Option<String>,
}

#[utoipa::path(
    delete,
    path = "/api/v1/push-subscriptions",
    request_body = UnsubscribeBody,
    responses(
        (status = 204, description = "Removed"),
        (status = 404, description = "Unknown endpoint", body = ErrorSchema)
    ),
    tags = ["notifications"],
    operation_id = "unsubscribePush"
)]
#[delete("/push-subscriptions")]
pub async fn unsubscribe_push(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<UnsubscribeBody>,
) -> ApiResult<HttpResponse> {
    let endpoint = non_blank(payload.into_inner().endpoint, "endpoint")?;
    state
        .notifications
        .unsubscribe_push(&caller.0, &endpoint)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount the notification routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(list_notifications)
        .service(unread_count)
        .service(mark_all_read)
        .service(mark_read)
        .service(delete_notification)
        .service(subscribe_push)
        .service(unsubscribe_push);
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use pagination::CursorPage;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::test_fixtures::{fixture_now, principal};
    use crate::domain::{Notification, NotificationKind, UserRole};
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

    fn signed_in() -> StateMocks {
        StateMocks::signed_in(principal(UserRole::User))
    }

    #[rstest]
    #[actix_web::test]
    async fn feed_defaults_to_twenty_and_echoes_the_cursor() {
        let mut mocks = signed_in();
        mocks
            .notifications_query
            .expect_list()
            .withf(|_, unread_only, cursor, limit| {
                !*unread_only && cursor.is_none() && *limit == DEFAULT_FEED_LIMIT
            })
            .times(1)
            .returning(|principal, _, _, _| {
                Ok(CursorPage {
                    items: vec![Notification {
                        id: NotificationId::random(),
                        user_id: principal.user_id,
                        kind: NotificationKind::BookingConfirmed,
                        title: "Booking confirmed".into(),
                        message: "Court 1 on 2026-06-01".into(),
                        read_at: None,
                        created_at: fixture_now(),
                    }],
                    next_cursor: Some("next".into()),
                })
            });

        let (status, body) =
            send(mocks, actix_test::TestRequest::get().uri("/api/v1/notifications")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["items"][0]["kind"], "booking_confirmed");
        assert_eq!(body["data"]["items"][0]["read"], false);
        assert_eq!(body["data"]["nextCursor"], "next");
    }

    #[rstest]
    #[actix_web::test]
    async fn feed_forwards_filters() {
        let mut mocks = signed_in();
        mocks
            .notifications_query
            .expect_list()
            .withf(|_, unread_only, cursor, limit| {
                *unread_only && cursor.as_deref() == Some("abc") && *limit == 5
            })
            .times(1)
            .returning(|_, _, _, _| {
                Ok(CursorPage {
                    items: Vec::new(),
                    next_cursor: None,
                })
            });
        let (status, body) = send(
            mocks,
            actix_test::TestRequest::get()
                .uri("/api/v1/notifications?unreadOnly=true&cursor=abc&limit=5"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["data"].get("nextCursor").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn read_all_reports_the_count() {
        let mut mocks = signed_in();
        mocks
            .notifications
            .expect_mark_all_read()
            .times(1)
            .returning(|_| Ok(3));
        let (status, body) = send(
            mocks,
            actix_test::TestRequest::post().uri("/api/v1/notifications/read-all"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated"], 3);
    }

    #[rstest]
    #[actix_web::test]
    async fn unread_count_is_wrapped() {
        let mut mocks = signed_in();
        mocks
            .notifications_query
            .expect_unread_count()
            .returning(|_| Ok(4));
        let (_, body) = send(
            mocks,
            actix_test::TestRequest::get().uri("/api/v1/notifications/unread-count"),
        )
        .await;
        assert_eq!(body["data"]["unread"], 4);
    }

    #[rstest]
    #[actix_web::test]
    async fn deleting_a_missing_notification_is_not_found() {
        let mut mocks = signed_in();
        mocks
            .notifications
            .expect_delete()
            .returning(|_, _| Err(Error::not_found("notification not found")));
        let (status, _) = send(
            mocks,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/notifications/{}", NotificationId::random())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[rstest]
    #[actix_web::test]
    async fn push_subscriptions_are_trimmed_and_forwarded() {
        let mut mocks = signed_in();
        mocks
            .notifications
            .expect_subscribe_push()
            .withf(|_, registration| {
                registration.endpoint.as_str() == "https://push.example.com/send/abc"
                    && registration.p256dh == "key"
                    && registration.auth == "secret"
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let (status, _) = send(
            mocks,
            actix_test::TestRequest::post()
                .uri("/api/v1/push-subscriptions")
                .set_json(json!({
                    "endpoint": "https://push.example.com/send/abc",
                    "keys": {"p256dh": " key ", "auth": "secret"}
                })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[rstest]
    #[case::plain_http(
        json!({"endpoint": "http://push.example.com/a", "keys": {"p256dh": "k", "auth": "a"}}),
        "endpoint"
    )]
    #[case::missing_keys(json!({"endpoint": "https://push.example.com/a"}), "keys")]
    #[case::blank_auth(
        json!({"endpoint": "https://push.example.com/a", "keys": {"p256dh": "k", "auth": " "}}),
        "keys.auth"
    )]
    #[actix_web::test]
    async fn push_subscriptions_reject_bad_registrations(
        #[case] payload: Value,
        #[case] field: &str,
    ) {
        let (status, body) = send(
            signed_in(),
            actix_test::TestRequest::post()
                .uri("/api/v1/push-subscriptions")
                .set_json(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn unsubscribing_answers_no_content() {
        let mut mocks = signed_in();
        mocks
            .notifications
            .expect_unsubscribe_push()
            .withf(|_, endpoint| endpoint == "https://push.example.com/a")
            .returning(|_, _| Ok(()));
        let (status, _) = send(
            mocks,
            actix_test::TestRequest::delete()
                .uri("/api/v1/push-subscriptions")
                .set_json(json!({"endpoint": "https://push.example.com/a"})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
