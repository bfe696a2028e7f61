//! Bearer-token extractors.
//!
//! Handlers declare [`Authenticated`] to require a caller or
//! [`MaybeAuthenticated`] for public endpoints whose output depends on who
//! is asking. Both resolve the principal through
//! [`AccountQuery::authenticate`](crate::domain::ports::AccountQuery), which
//! re-reads the account so bans and deletions apply immediately.

use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, Principal};
use crate::inbound::http::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Read the bearer token, `None` when no `Authorization` header is sent.
fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, Error> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| Error::unauthorized("authorization header is not valid ASCII"))?;
    let token = raw
        .get(..BEARER_PREFIX.len())
        .filter(|prefix| prefix.eq_ignore_ascii_case(BEARER_PREFIX))
        .and_then(|_| raw.get(BEARER_PREFIX.len()..))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("authorization header must use the Bearer scheme"))?;
    Ok(Some(token.to_owned()))
}

fn resolve(
    req: &HttpRequest,
) -> LocalBoxFuture<'static, Result<Option<Principal>, Error>> {
    let state = req.app_data::<web::Data<HttpState>>().cloned();
    let token = bearer_token(req.headers());
    Box::pin(async move {
        let Some(token) = token? else {
            return Ok(None);
        };
        let state = state.ok_or_else(|| Error::internal("http state is not configured"))?;
        state.accounts_query.authenticate(&token).await.map(Some)
    })
}

/// Authenticated caller; rejects the request with `401` otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Principal);

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let fut = resolve(req);
        Box::pin(async move {
            fut.await?
                .map(Self)
                .ok_or_else(|| Error::unauthorized("authentication required"))
        })
    }
}

/// Optional caller; a present but invalid token is still rejected.
#[derive(Debug, Clone, Copy)]
pub struct MaybeAuthenticated(pub Option<Principal>);

impl FromRequest for MaybeAuthenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let fut = resolve(req);
        Box::pin(async move { fut.await.map(Self) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_web::http::StatusCode;
    use actix_web::http::header::HeaderValue;
    use actix_web::{App, HttpResponse, test as actix_test};
    use rstest::rstest;

    use super::*;
    use crate::domain::{ErrorCode, UserId, UserRole};
    use crate::inbound::http::test_utils::{StateMocks, bearer};

    #[rstest]
    #[case::missing(None, Ok(None))]
    #[case::bearer(Some("Bearer abc.def"), Ok(Some("abc.def")))]
    #[case::lowercase_scheme(Some("bearer abc"), Ok(Some("abc")))]
    #[case::basic(Some("Basic dXNlcg=="), Err(()))]
    #[case::empty_token(Some("Bearer   "), Err(()))]
    fn parses_authorization_headers(
        #[case] header: Option<&str>,
        #[case] expected: Result<Option<&str>, ()>,
    ) {
        let mut headers = HeaderMap::new();
        if let Some(raw) = header {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(raw).expect("header"));
        }
        let parsed = bearer_token(&headers);
        match expected {
            Ok(token) => assert_eq!(parsed.expect("token").as_deref(), token),
            Err(()) => {
                assert_eq!(parsed.expect_err("rejected").code(), ErrorCode::Unauthorized);
            }
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn resolves_principals_through_the_account_query() {
        let principal = Principal {
            user_id: UserId::random(),
            role: UserRole::User,
        };
        let mut mocks = StateMocks::default();
        mocks
            .accounts_query
            .expect_authenticate()
            .withf(|token| token == "good")
            .returning(move |_| Ok(principal));
        let app = actix_test::init_service(
            App::new().app_data(mocks.into_data()).route(
                "/",
                web::get().to(|caller: Authenticated| async move {
                    HttpResponse::Ok().body(caller.0.user_id.to_string())
                }),
            ),
        )
        .await;

        let ok = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/")
                .insert_header(bearer("good"))
                .to_request(),
        )
        .await;
        assert_eq!(ok.status(), StatusCode::OK);

        let anonymous =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri("/").to_request())
                .await;
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn optional_extraction_allows_anonymous_callers() {
        let app = actix_test::init_service(
            App::new().app_data(StateMocks::default().into_data()).route(
                "/",
                web::get().to(|caller: MaybeAuthenticated| async move {
                    HttpResponse::Ok().body(if caller.0.is_some() { "user" } else { "anon" })
                }),
            ),
        )
        .await;
        let body = actix_test::call_and_read_body(
            &app,
            actix_test::TestRequest::get().uri("/").to_request(),
        )
        .await;
        assert_eq!(body.as_ref(), b"anon");
    }
}
