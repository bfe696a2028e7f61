//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};

use crate::domain::ports::{
    MockAccountCommand, MockAccountQuery, MockBookingCommand, MockBookingQuery,
    MockCatalogueQuery, MockModerationCommand, MockModerationQuery, MockNotificationCommand,
    MockNotificationQuery, MockReportCommand, MockReviewCommand, MockReviewQuery,
    MockVenueCommand,
};
use crate::domain::{Principal, UserId, UserRole};
use crate::inbound::http::error::{json_config, path_config, query_config};
use crate::inbound::http::state::HttpState;

/// Token accepted by [`StateMocks::signed_in`].
pub const TEST_TOKEN: &str = "test-token";

/// `Authorization` header carrying `token`.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

/// Principal with a fresh id and the given role.
pub fn principal(role: UserRole) -> Principal {
    Principal {
        user_id: UserId::random(),
        role,
    }
}

/// Individually configurable driving-port mocks.
#[derive(Default)]
pub struct StateMocks {
    pub accounts: MockAccountCommand,
    pub accounts_query: MockAccountQuery,
    pub catalogue: MockCatalogueQuery,
    pub venues: MockVenueCommand,
    pub bookings: MockBookingCommand,
    pub bookings_query: MockBookingQuery,
    pub reviews: MockReviewCommand,
    pub reviews_query: MockReviewQuery,
    pub notifications: MockNotificationCommand,
    pub notifications_query: MockNotificationQuery,
    pub reports: MockReportCommand,
    pub moderation: MockModerationCommand,
    pub moderation_query: MockModerationQuery,
}

impl StateMocks {
    /// Mocks where [`TEST_TOKEN`] authenticates as `principal`.
    pub fn signed_in(principal: Principal) -> Self {
        let mut mocks = Self::default();
        mocks
            .accounts_query
            .expect_authenticate()
            .withf(|token| token == TEST_TOKEN)
            .returning(move |_| Ok(principal));
        mocks
    }

    /// Share the mocks as handler state.
    pub fn into_data(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            accounts_query: Arc::new(self.accounts_query),
            catalogue: Arc::new(self.catalogue),
            venues: Arc::new(self.venues),
            bookings: Arc::new(self.bookings),
            bookings_query: Arc::new(self.bookings_query),
            reviews: Arc::new(self.reviews),
            reviews_query: Arc::new(self.reviews_query),
            notifications: Arc::new(self.notifications),
            notifications_query: Arc::new(self.notifications_query),
            reports: Arc::new(self.reports),
            moderation: Arc::new(self.moderation),
            moderation_query: Arc::new(self.moderation_query),
        })
    }

    /// App with the mocks and envelope-rendering extractor configs mounted
    /// under `/api/v1`.
    pub fn into_app<F>(
        self,
        register: F,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    >
    where
        F: FnOnce(&mut web::ServiceConfig),
    {
        App::new()
            .app_data(self.into_data())
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config())
            .service(web::scope("/api/v1").configure(register))
    }
}
