//! Port abstraction for user reports.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Report, ReportId, ReportStatus};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by report adapters.
    pub enum ReportRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "report repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "report repository query failed: {message}",
    }
}

impl From<ReportRepositoryError> for Error {
    fn from(value: ReportRepositoryError) -> Self {
        match value {
            ReportRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("report repository unavailable: {message}"))
            }
            ReportRepositoryError::Query { message } => {
                Error::internal(format!("report repository error: {message}"))
            }
        }
    }
}

/// Report storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportRepository: Send + Sync {
    /// Insert a report.
    async fn create(&self, report: &Report) -> Result<(), ReportRepositoryError>;

    /// Fetch a report by id.
    async fn find_by_id(&self, id: &ReportId) -> Result<Option<Report>, ReportRepositoryError>;

    /// Persist status and resolution fields.
    async fn update(&self, report: &Report) -> Result<(), ReportRepositoryError>;

    /// Page through reports, oldest first.
    async fn list(
        &self,
        status: Option<ReportStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Report>, u64), ReportRepositoryError>;
}
