//! Driving port for writing reviews.

use async_trait::async_trait;

use crate::domain::{Error, Principal, Rating, Review, ReviewId, VenueId};

/// Review use-cases that change state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Review a venue the caller has played at.
    async fn create(
        &self,
        principal: &Principal,
        venue_id: &VenueId,
        rating: Rating,
        comment: String,
    ) -> Result<Review, Error>;

    /// Edit the caller's review.
    async fn update(
        &self,
        principal: &Principal,
        id: &ReviewId,
        rating: Option<Rating>,
        comment: Option<String>,
    ) -> Result<Review, Error>;

    /// Delete a review as its author or an admin.
    async fn delete(&self, principal: &Principal, id: &ReviewId) -> Result<(), Error>;
}
