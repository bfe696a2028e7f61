//! OpenAPI schema definitions for types that stay free of utoipa.
//!
//! The domain error is rendered through [`super::error::ErrorEnvelope`];
//! these wrappers describe that wire shape without making the domain depend
//! on utoipa.

use utoipa::ToSchema;

/// Stable machine-readable error codes returned in failure envelopes.
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The request clashes with current state, such as a taken slot.
    #[schema(rename = "conflict")]
    Conflict,
    /// Too many attempts or a cooldown is active.
    #[schema(rename = "rate_limited")]
    RateLimited,
    /// A dependency such as the payment gateway is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// Failure envelope: `{"success": false, "code", "error", "details"?, "traceId"?}`.
#[derive(ToSchema)]
#[schema(as = ApiError)]
#[serde(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false`.
    success: bool,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "endTime must be after startTime")]
    error: String,
    /// Supplementary details such as `{"field": "endTime", "code": "invalid_window"}`.
    details: Option<serde_json::Value>,
    /// Correlation identifier, mirrored in the `Trace-Id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}
