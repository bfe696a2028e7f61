//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{RatingSummary, Review, ReviewId, ReviewSort, ReviewView, VenueId};

use super::diesel_helpers::{
    CorruptRow, count_to_u64, is_unique_violation, map_diesel_error, map_pool_error,
    page_bounds,
};
use super::models::{ReviewRow, rating_from_db};
use super::pool::{DbPool, PoolError};
use super::schema::{reviews, users};

/// Diesel-backed implementation of the `ReviewRepository` port.
///
/// One review per user and venue is enforced by the
/// `reviews_user_venue_key` constraint.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ReviewRepositoryError {
    map_pool_error(error, ReviewRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    if is_unique_violation(&error, Some("reviews_user_venue_key")) {
        return ReviewRepositoryError::duplicate();
    }
    map_diesel_error(error, ReviewRepositoryError::query, ReviewRepositoryError::connection)
}

fn corrupt(error: CorruptRow) -> ReviewRepositoryError {
    ReviewRepositoryError::query(error.to_string())
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn create(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(reviews::table)
            .values(ReviewRow::from(review))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn update(&self, review: &Review) -> Result<(), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(reviews::table.find(review.id.as_uuid()))
            .set((
                reviews::rating.eq(i16::from(review.rating.stars())),
                reviews::comment.eq(&review.comment),
                reviews::updated_at.eq(review.updated_at),
            ))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        if updated == 0 {
            return Err(ReviewRepositoryError::query("review not found for update"));
        }
        Ok(())
    }

    async fn delete(&self, id: &ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(reviews::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ReviewRow> = reviews::table
            .find(id.as_uuid())
            .select(ReviewRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Review::try_from).transpose().map_err(corrupt)
    }

    async fn list_for_venue(
        &self,
        venue_id: &VenueId,
        sort: ReviewSort,
        page: PageRequest,
    ) -> Result<(Vec<ReviewView>, u64), ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = reviews::table
            .filter(reviews::venue_id.eq(venue_id.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        let query = reviews::table
            .inner_join(users::table)
            .filter(reviews::venue_id.eq(venue_id.as_uuid()))
            .into_boxed();
        let query = match sort {
            ReviewSort::Newest => query.order((reviews::created_at.desc(), reviews::id)),
            ReviewSort::Highest => query.order((
                reviews::rating.desc(),
                reviews::created_at.desc(),
                reviews::id,
            )),
            ReviewSort::Lowest => query.order((
                reviews::rating.asc(),
                reviews::created_at.desc(),
                reviews::id,
            )),
        };
        let (limit, offset) = page_bounds(page);
        let rows: Vec<(ReviewRow, String)> = query
            .limit(limit)
            .offset(offset)
            .select((ReviewRow::as_select(), users::full_name))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let views = rows
            .into_iter()
            .map(|(row, author_name)| {
                Review::try_from(row).map(|review| ReviewView {
                    review,
                    author_name,
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;
        Ok((views, count_to_u64(total)))
    }

    async fn summary(&self, venue_id: &VenueId) -> Result<RatingSummary, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let stars: Vec<i16> = reviews::table
            .filter(reviews::venue_id.eq(venue_id.as_uuid()))
            .select(reviews::rating)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let ratings = stars
            .into_iter()
            .map(rating_from_db)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;
        Ok(RatingSummary::from_ratings(ratings))
    }
}
