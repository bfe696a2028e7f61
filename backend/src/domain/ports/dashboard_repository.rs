//! Port abstraction for dashboard aggregates.

use async_trait::async_trait;
use crate::domain::{AdminDashboard, DashboardPeriod, Error, OwnerDashboard, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by dashboard adapters.
    pub enum DashboardRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "dashboard repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "dashboard repository query failed: {message}",
    }
}

impl From<DashboardRepositoryError> for Error {
    fn from(value: DashboardRepositoryError) -> Self {
        match value {
            DashboardRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("dashboard repository unavailable: {message}"))
            }
            DashboardRepositoryError::Query { message } => {
                Error::internal(format!("dashboard repository error: {message}"))
            }
        }
    }
}

/// Read-only aggregate queries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Totals over the venues `owner_id` owns.
    async fn owner_dashboard(
        &self,
        owner_id: &UserId,
        period: DashboardPeriod,
    ) -> Result<OwnerDashboard, DashboardRepositoryError>;

    /// Platform-wide totals.
    async fn admin_dashboard(&self) -> Result<AdminDashboard, DashboardRepositoryError>;
}
