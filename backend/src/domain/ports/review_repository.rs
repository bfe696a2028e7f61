//! Port abstraction for venue reviews.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    Error, RatingSummary, Review, ReviewId, ReviewSort, ReviewView, VenueId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The author already reviewed the venue.
        Duplicate => "review already exists",
    }
}

impl From<ReviewRepositoryError> for Error {
    fn from(value: ReviewRepositoryError) -> Self {
        match value {
            ReviewRepositoryError::Connection { message } => {
                Error::service_unavailable(format!("review repository unavailable: {message}"))
            }
            ReviewRepositoryError::Query { message } => {
                Error::internal(format!("review repository error: {message}"))
            }
            ReviewRepositoryError::Duplicate => {
                Error::conflict("you have already reviewed this venue")
            }
        }
    }
}

/// Review storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Insert a review; one per author and venue.
    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Persist rating, comment and `updated_at`.
    async fn update(&self, review: &Review) -> Result<(), ReviewRepositoryError>;

    /// Delete a review. Returns `false` when missing.
    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError>;

    /// Fetch a review by id.
    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Page through a venue's reviews with author names.
    async fn list_for_venue(
        &self,
        venue_id: &VenueId,
        sort: ReviewSort,
        page: PageRequest,
    ) -> Result<(Vec<ReviewView>, u64), ReviewRepositoryError>;

    /// Rating summary for a venue.
    async fn summary(&self, venue_id: &VenueId) -> Result<RatingSummary, ReviewRepositoryError>;
}
