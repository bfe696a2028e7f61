//! Driving port for reading reviews.

use async_trait::async_trait;
use pagination::{Page, PageRequest};

use crate::domain::{Error, RatingSummary, ReviewSort, ReviewView, VenueId};

/// Rating summary and a page of reviews.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueReviews {
    /// Aggregate over every review.
    pub summary: RatingSummary,
    /// Requested page.
    pub reviews: Page<ReviewView>,
}

/// Review reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Reviews of a public venue.
    async fn list(
        &self,
        venue_id: &VenueId,
        sort: ReviewSort,
        page: PageRequest,
    ) -> Result<VenueReviews, Error>;
}
