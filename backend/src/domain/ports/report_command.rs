//! Driving port for submitting reports.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Error, Principal, Report, ReportReason, ReportTargetKind};

/// Validated report payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReport {
    /// Target type.
    pub target_kind: ReportTargetKind,
    /// Venue or user id.
    pub target_id: Uuid,
    /// Category.
    pub reason: ReportReason,
    /// Reporter's explanation.
    pub description: String,
}

/// Report submission.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportCommand: Send + Sync {
    /// File a report against an existing venue or another user.
    async fn submit(&self, principal: &Principal, report: NewReport) -> Result<Report, Error>;
}
