//! Port abstraction for venue persistence and search candidates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::{
    Error, SearchCandidate, UserId, Venue, VenueId, VenueStatus, VenueTextFilter,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by venue adapters.
    pub enum VenueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "venue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "venue repository query failed: {message}",
    }
}

impl From<VenueRepositoryError> for Error {
    fn from(value: VenueRepositoryError) -> Self {
        match value {
            VenueRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("venue repository unavailable: {message}"))
            }
            VenueRepositoryError::Query { message } => {
                Error::internal(format!("venue repository error: {message}"))
            }
        }
    }
}

/// Venue storage, including amenity links.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VenueRepository: Send + Sync {
    /// Insert a venue with its amenity links.
    async fn create(&self, venue: &Venue) -> Result<(), VenueRepositoryError>;

    /// Persist every mutable field, replacing amenity links.
    async fn update(&self, venue: &Venue) -> Result<(), VenueRepositoryError>;

    /// Fetch a venue by id, deleted venues included.
    async fn find_by_id(&self, id: &VenueId) -> Result<Option<Venue>, VenueRepositoryError>;

    /// Approved, non-deleted venues matching the text and city filters,
    /// with their active courts and rating summary.
    async fn search_candidates(
        &self,
        filter: &VenueTextFilter,
    ) -> Result<Vec<SearchCandidate>, VenueRepositoryError>;

    /// Non-deleted venues owned by `owner`, newest first.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Venue>, VenueRepositoryError>;

    /// Non-deleted venues for moderation, oldest first.
    async fn list_by_status(
        &self,
        status: Option<VenueStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Venue>, u64), VenueRepositoryError>;

    /// Mark a venue deleted.
    async fn soft_delete(
        &self,
        id: &VenueId,
        at: DateTime<Utc>,
    ) -> Result<(), VenueRepositoryError>;
}
