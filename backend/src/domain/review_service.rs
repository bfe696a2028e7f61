//! Venue reviews written by players who have booked there.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageRequest};
use tracing::info;

use crate::domain::driven_ports::Notifier;
use crate::domain::ports::{
    BookingRepository, ReviewCommand, ReviewQuery, ReviewRepository, VenueRepository,
    VenueReviews,
};
use crate::domain::review::validate_comment;
use crate::domain::{
    BookingPolicy, DrivenPorts, Error, NewNotification, Principal, Rating, Review, ReviewId,
    ReviewSort, Venue, VenueId,
};

/// Review service implementing [`ReviewCommand`] and [`ReviewQuery`].
#[derive(Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    venues: Arc<dyn VenueRepository>,
    bookings: Arc<dyn BookingRepository>,
    notifier: Notifier,
    clock: Arc<dyn Clock>,
    policy: BookingPolicy,
}

impl ReviewService {
    /// Create the service from the shared port bundle.
    pub fn new(ports: &DrivenPorts, policy: BookingPolicy) -> Self {
        Self {
            reviews: Arc::clone(&ports.reviews),
            venues: Arc::clone(&ports.venues),
            bookings: Arc::clone(&ports.bookings),
            notifier: Notifier::new(ports),
            clock: Arc::clone(&ports.clock),
            policy,
        }
    }

    async fn public_venue(&self, id: &VenueId) -> Result<Venue, Error> {
        self.venues
            .find_by_id(id)
            .await?
            .filter(Venue::is_public)
            .ok_or_else(|| Error::not_found("venue not found"))
    }

    async fn authored(&self, principal: &Principal, id: &ReviewId) -> Result<Review, Error> {
        let review = self
            .reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found("review not found"))?;
        if review.user_id == principal.user_id {
            Ok(review)
        } else {
            Err(Error::forbidden("only the author can change this review"))
        }
    }
}

#[async_trait]
impl ReviewCommand for ReviewService {
    async fn create(
        &self,
        principal: &Principal,
        venue_id: &VenueId,
        rating: Rating,
        comment: String,
    ) -> Result<Review, Error> {
        let comment = validate_comment(&comment)?;
        let venue = self.public_venue(venue_id).await?;
        let now = self.clock.utc();
        let played = self
            .bookings
            .find_by_user_and_venue(&principal.user_id, venue_id)
            .await?
            .iter()
            .any(|booking| booking.counts_as_played(now, &self.policy));
        if !played {
            return Err(Error::forbidden(
                "you can review a venue after playing there",
            ));
        }

        let review = Review {
            id: ReviewId::random(),
            user_id: principal.user_id,
            venue_id: venue.id,
            rating,
            comment,
            created_at: now,
            updated_at: now,
        };
        self.reviews.create(&review).await?;
        self.notifier
            .send(vec![NewNotification::new_review(
                venue.owner_id,
                &venue.name,
                rating.stars(),
            )])
            .await;
        info!(review_id = %review.id, venue_id = %venue.id, "review posted");
        Ok(review)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: &ReviewId,
        rating: Option<Rating>,
        comment: Option<String>,
    ) -> Result<Review, Error> {
        let mut review = self.authored(principal, id).await?;
        if let Some(rating) = rating {
            review.rating = rating;
        }
        if let Some(comment) = comment {
            review.comment = validate_comment(&comment)?;
        }
        review.updated_at = self.clock.utc();
        self.reviews.update(&review).await?;
        Ok(review)
    }

    async fn delete(&self, principal: &Principal, id: &ReviewId) -> Result<(), Error> {
        if !principal.is_admin() {
            self.authored(principal, id).await?;
        }
        if self.reviews.delete(id).await? {
            Ok(())
        } else {
            Err(Error::not_found("review not found"))
        }
    }
}

#[async_trait]
impl ReviewQuery for ReviewService {
    async fn list(
        &self,
        venue_id: &VenueId,
        sort: ReviewSort,
        page: PageRequest,
    ) -> Result<VenueReviews, Error> {
        let venue = self.public_venue(venue_id).await?;
        let summary = self.reviews.summary(&venue.id).await?;
        let (rows, total) = self.reviews.list_for_venue(&venue.id, sort, page).await?;
        Ok(VenueReviews {
            summary,
            reviews: Page::new(rows, page, total),
        })
    }
}

#[cfg(test)]
#[path = "review_service_tests.rs"]
mod tests;
