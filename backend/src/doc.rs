//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every versioned endpoint plus the health probes.
//! Payload schemas are picked up from the handler annotations; the error
//! envelope and code enumeration are registered explicitly because the
//! extractor configs render them outside any handler.
//!
//! The document backs Swagger UI in debug builds and is exported by the
//! `openapi-dump` binary.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Name of the bearer scheme referenced by authenticated operations.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Registers the bearer token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        let bearer = HttpBuilder::new()
            .scheme(HttpAuthScheme::Bearer)
            .bearer_format("JWT")
            .description(Some("Token returned by POST /api/v1/auth/login."))
            .build();
        components.add_security_scheme(BEARER_SCHEME, SecurityScheme::Http(bearer));
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Courtside API",
        description = "Sports facility discovery, court booking and payments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::account::register,
        crate::inbound::http::account::verify_email,
        crate::inbound::http::account::resend_otp,
        crate::inbound::http::account::login,
        crate::inbound::http::account::forgot_password,
        crate::inbound::http::account::reset_password,
        crate::inbound::http::account::current_user,
        crate::inbound::http::account::update_current_user,
        crate::inbound::http::account::change_password,
        crate::inbound::http::account::delete_current_user,
        crate::inbound::http::catalogue::search_venues,
        crate::inbound::http::catalogue::venue_detail,
        crate::inbound::http::catalogue::list_amenities,
        crate::inbound::http::catalogue::list_sports,
        crate::inbound::http::catalogue::court_availability,
        crate::inbound::http::reviews::list_reviews,
        crate::inbound::http::reviews::create_review,
        crate::inbound::http::reviews::update_review,
        crate::inbound::http::reviews::delete_review,
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::bookings::list_my_bookings,
        crate::inbound::http::bookings::get_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::bookings::complete_booking,
        crate::inbound::http::bookings::list_owner_bookings,
        crate::inbound::http::bookings::confirm_payment,
        crate::inbound::http::bookings::payment_webhook,
        crate::inbound::http::owner::list_owner_venues,
        crate::inbound::http::owner::create_venue,
        crate::inbound::http::owner::update_venue,
        crate::inbound::http::owner::delete_venue,
        crate::inbound::http::owner::list_courts,
        crate::inbound::http::owner::add_court,
        crate::inbound::http::owner::update_court,
        crate::inbound::http::owner::deactivate_court,
        crate::inbound::http::owner::block_slot,
        crate::inbound::http::owner::unblock_slot,
        crate::inbound::http::owner::owner_dashboard,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::unread_count,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::http::notifications::mark_all_read,
        crate::inbound::http::notifications::delete_notification,
        crate::inbound::http::notifications::subscribe_push,
        crate::inbound::http::notifications::unsubscribe_push,
        crate::inbound::http::reports::submit_report,
        crate::inbound::http::admin::dashboard,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::ban_user,
        crate::inbound::http::admin::unban_user,
        crate::inbound::http::admin::list_venues,
        crate::inbound::http::admin::approve_venue,
        crate::inbound::http::admin::reject_venue,
        crate::inbound::http::admin::list_reports,
        crate::inbound::http::admin::resolve_report,
        crate::inbound::http::admin::create_amenity,
        crate::inbound::http::admin::delete_amenity,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "auth", description = "Registration, login and password recovery"),
        (name = "users", description = "The signed-in account"),
        (name = "catalogue", description = "Venue discovery and court availability"),
        (name = "reviews", description = "Venue ratings"),
        (name = "bookings", description = "Court bookings"),
        (name = "payments", description = "Gateway callbacks"),
        (name = "owner", description = "Facility owner tools"),
        (name = "notifications", description = "In-app and push notifications"),
        (name = "reports", description = "Abuse reports"),
        (name = "admin", description = "Platform moderation"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated document.
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    use super::*;

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    fn error_envelope_schema_lists_its_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error = schemas.get("ApiError").expect("ApiError schema");
        for field in ["success", "code", "error", "details", "traceId"] {
            assert!(object_has_field(error, field), "ApiError should have {field}");
        }
        assert!(schemas.contains_key("ErrorCode"));
    }

    #[rstest]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }

    #[rstest]
    #[case("/api/v1/auth/register")]
    #[case("/api/v1/venues/{id}")]
    #[case("/api/v1/courts/{id}/availability")]
    #[case("/api/v1/bookings/{id}/cancel")]
    #[case("/api/v1/payments/webhook")]
    #[case("/api/v1/owner/courts/{id}/blocks")]
    #[case("/api/v1/notifications/read-all")]
    #[case("/api/v1/admin/reports/{id}/resolve")]
    #[case("/health/ready")]
    fn routes_are_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }
}
