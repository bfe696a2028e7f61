//! Report submission handler.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ports::NewReport;
use crate::domain::{Error, ReportReason, ReportTargetKind};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::dto::ReportDto;
use crate::inbound::http::envelope::{Envelope, created};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::require;

/// Report against a venue or another user.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportBody {
    /// `venue` or `user`.
    #[schema(example = "venue")]
    pub target_kind: Option<String>,
    pub target_id: Option<Uuid>,
    /// `inappropriate_content`, `fake_listing`, `safety_concern`,
    /// `harassment` or `other`.
    #[schema(example = "fake_listing")]
    pub reason: Option<String>,
    /// 10 to 1000 characters.
    pub description: Option<String>,
}

impl TryFrom<ReportBody> for NewReport {
    type Error = Error;

    fn try_from(value: ReportBody) -> Result<Self, Self::Error> {
        let target_kind = require(value.target_kind, "targetKind")?.parse::<ReportTargetKind>()?;
        let target_id = require(value.target_id, "targetId")?;
        let reason = require(value.reason, "reason")?.parse::<ReportReason>()?;
        Ok(Self {
            target_kind,
            target_id,
            reason,
            description: require(value.description, "description")?,
        })
    }
}

/// Report a venue or another user to the moderators.
#[utoipa::path(
    post,
    path = "/api/v1/reports",
    request_body = ReportBody,
    responses(
        (status = 201, description = "Report filed", body = Envelope<ReportDto>),
        (status = 400, description = "Invalid report", body = ErrorSchema),
        (status = 404, description = "Unknown target", body = ErrorSchema)
    ),
    tags = ["reports"],
    operation_id = "submitReport"
)]
#[post("/reports")]
pub async fn submit_report(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<ReportBody>,
) -> ApiResult<HttpResponse> {
    let report = NewReport::try_from(payload.into_inner())?;
    let stored = state.reports.submit(&caller.0, report).await?;
    Ok(created(ReportDto::from(stored)))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(submit_report);
}
