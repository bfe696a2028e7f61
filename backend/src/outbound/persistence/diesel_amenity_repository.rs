//! PostgreSQL-backed `AmenityRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{AmenityRepository, AmenityRepositoryError};
use crate::domain::{Amenity, AmenityId};

use super::diesel_helpers::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::AmenityRow;
use super::pool::{DbPool, PoolError};
use super::schema::amenities;

/// Diesel-backed implementation of the `AmenityRepository` port.
///
/// Venue links cascade on delete, so removing an amenity also detaches it
/// from every venue.
#[derive(Clone)]
pub struct DieselAmenityRepository {
    pool: DbPool,
}

impl DieselAmenityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AmenityRepositoryError {
    map_pool_error(error, AmenityRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AmenityRepositoryError {
    if is_unique_violation(&error, Some("amenities_name_key")) {
        return AmenityRepositoryError::duplicate_name();
    }
    map_diesel_error(error, AmenityRepositoryError::query, AmenityRepositoryError::connection)
}

#[async_trait]
impl AmenityRepository for DieselAmenityRepository {
    async fn list(&self) -> Result<Vec<Amenity>, AmenityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<AmenityRow> = amenities::table
            .order(amenities::name)
            .select(AmenityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Amenity::from).collect())
    }

    async fn find_many(&self, ids: &[AmenityId]) -> Result<Vec<Amenity>, AmenityRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let wanted: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<AmenityRow> = amenities::table
            .filter(amenities::id.eq_any(wanted))
            .order(amenities::name)
            .select(AmenityRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows.into_iter().map(Amenity::from).collect())
    }

    async fn create(&self, amenity: &Amenity) -> Result<(), AmenityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(amenities::table)
            .values(AmenityRow::from(amenity))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn delete(&self, id: &AmenityId) -> Result<bool, AmenityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(amenities::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::super::diesel_helpers::test_errors::unique_violation;
    use super::*;

    #[rstest]
    #[case("amenities_name_key", AmenityRepositoryError::DuplicateName)]
    #[case("venue_amenities_pkey", AmenityRepositoryError::query("database error"))]
    fn unique_violations_are_told_apart(
        #[case] constraint: &'static str,
        #[case] expected: AmenityRepositoryError,
    ) {
        assert_eq!(diesel_error(unique_violation(constraint)), expected);
    }
}
