//! PostgreSQL-backed `VenueRepository` implementation using Diesel ORM.
//!
//! Amenity links live in `venue_amenities`; every read joins them back onto
//! the venue with a second `IN` query rather than a row-multiplying join.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{VenueRepository, VenueRepositoryError};
use crate::domain::{
    AmenityId, Coordinates, Money, RatingSummary, SearchCandidate, Sport, UserId, Venue, VenueId,
    VenueStatus, VenueTextFilter,
};

use super::diesel_helpers::{
    CorruptRow, contains_pattern, count_to_u64, exact_pattern, map_diesel_error, map_pool_error,
    money_from_db, page_bounds,
};
use super::models::{VenueAmenityRow, VenueRecord, VenueRow, rating_from_db};
use super::pool::{DbPool, PoolError};
use super::schema::{courts, reviews, venue_amenities, venues};

/// Diesel-backed implementation of the `VenueRepository` port.
#[derive(Clone)]
pub struct DieselVenueRepository {
    pool: DbPool,
}

impl DieselVenueRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> VenueRepositoryError {
    map_pool_error(error, VenueRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> VenueRepositoryError {
    map_diesel_error(error, VenueRepositoryError::query, VenueRepositoryError::connection)
}

fn corrupt(error: CorruptRow) -> VenueRepositoryError {
    VenueRepositoryError::query(error.to_string())
}

fn amenity_links(venue: &Venue) -> Vec<VenueAmenityRow> {
    venue
        .amenity_ids
        .iter()
        .map(|amenity| VenueAmenityRow {
            venue_id: *venue.id.as_uuid(),
            amenity_id: *amenity.as_uuid(),
        })
        .collect()
}

async fn load_amenity_ids(
    conn: &mut AsyncPgConnection,
    venue_ids: Vec<Uuid>,
) -> Result<HashMap<Uuid, Vec<AmenityId>>, diesel::result::Error> {
    let links: Vec<VenueAmenityRow> = venue_amenities::table
        .filter(venue_amenities::venue_id.eq_any(venue_ids))
        .select(VenueAmenityRow::as_select())
        .load(conn)
        .await?;
    let mut grouped: HashMap<Uuid, Vec<AmenityId>> = HashMap::new();
    for link in links {
        grouped
            .entry(link.venue_id)
            .or_default()
            .push(AmenityId::from_uuid(link.amenity_id));
    }
    Ok(grouped)
}

async fn hydrate(
    conn: &mut AsyncPgConnection,
    rows: Vec<VenueRow>,
) -> Result<Vec<Venue>, VenueRepositoryError> {
    let ids = rows.iter().map(|row| row.id).collect();
    let mut links = load_amenity_ids(conn, ids).await.map_err(diesel_error)?;
    rows.into_iter()
        .map(|row| {
            let amenity_ids = links.remove(&row.id).unwrap_or_default();
            row.into_venue(amenity_ids)
        })
        .collect::<Result<Vec<_>, _>>()
        .map_err(corrupt)
}

fn candidate(
    row: VenueRow,
    courts: Vec<(Sport, Money)>,
    rating: RatingSummary,
) -> Result<SearchCandidate, CorruptRow> {
    let location = Coordinates::new(row.latitude, row.longitude)
        .map_err(|_| CorruptRow::new("latitude", row.latitude))?;
    Ok(SearchCandidate {
        venue_id: VenueId::from_uuid(row.id),
        cover_photo: row.photos.into_iter().next(),
        name: row.name,
        city: row.city,
        address: row.address,
        location,
        created_at: row.created_at,
        courts,
        rating,
    })
}

#[async_trait]
impl VenueRepository for DieselVenueRepository {
    async fn create(&self, venue: &Venue) -> Result<(), VenueRepositoryError> {
        let record = VenueRecord::from(venue);
        let links = amenity_links(venue);
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction(|conn| {
            async move {
                diesel::insert_into(venues::table)
                    .values(&record)
                    .execute(conn)
                    .await?;
                if !links.is_empty() {
                    diesel::insert_into(venue_amenities::table)
                        .values(&links)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn update(&self, venue: &Venue) -> Result<(), VenueRepositoryError> {
        let venue_id = *venue.id.as_uuid();
        let record = VenueRecord::from(venue);
        let links = amenity_links(venue);
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = conn
            .transaction(|conn| {
                async move {
                    let updated = diesel::update(venues::table.find(venue_id))
                        .set(&record)
                        .execute(conn)
                        .await?;
                    diesel::delete(
                        venue_amenities::table.filter(venue_amenities::venue_id.eq(venue_id)),
                    )
                    .execute(conn)
                    .await?;
                    if !links.is_empty() {
                        diesel::insert_into(venue_amenities::table)
                            .values(&links)
                            .execute(conn)
                            .await?;
                    }
                    Ok(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)?;
        if updated == 0 {
            return Err(VenueRepositoryError::query("venue not found for update"));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &VenueId) -> Result<Option<Venue>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<VenueRow> = venues::table
            .find(id.as_uuid())
            .select(VenueRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let venues = hydrate(&mut conn, vec![row]).await?;
        Ok(venues.into_iter().next())
    }

    async fn search_candidates(
        &self,
        filter: &VenueTextFilter,
    ) -> Result<Vec<SearchCandidate>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = venues::table
            .filter(venues::status.eq(VenueStatus::Approved.as_str()))
            .filter(venues::deleted_at.is_null())
            .into_boxed();
        if let Some(text) = filter.text.as_deref() {
            let pattern = contains_pattern(text);
            query = query.filter(
                venues::name
                    .ilike(pattern.clone())
                    .or(venues::description.ilike(pattern.clone()))
                    .or(venues::address.ilike(pattern)),
            );
        }
        if let Some(city) = filter.city.as_deref() {
            query = query.filter(venues::city.ilike(exact_pattern(city)));
        }
        let rows: Vec<VenueRow> = query
            .select(VenueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let court_rows: Vec<(Uuid, String, i64)> = courts::table
            .filter(courts::venue_id.eq_any(ids.clone()))
            .filter(courts::active.eq(true))
            .select((courts::venue_id, courts::sport, courts::price_per_hour_minor))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let rating_rows: Vec<(Uuid, i16)> = reviews::table
            .filter(reviews::venue_id.eq_any(ids))
            .select((reviews::venue_id, reviews::rating))
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        let mut offers: HashMap<Uuid, Vec<(Sport, Money)>> = HashMap::new();
        for (venue_id, sport, price) in court_rows {
            let sport = sport
                .parse::<Sport>()
                .map_err(|_| corrupt(CorruptRow::new("sport", &sport)))?;
            let price = money_from_db("price_per_hour_minor", price).map_err(corrupt)?;
            offers.entry(venue_id).or_default().push((sport, price));
        }
        let mut ratings: HashMap<Uuid, RatingSummary> = HashMap::new();
        for (venue_id, stars) in rating_rows {
            let rating = rating_from_db(stars).map_err(corrupt)?;
            ratings.entry(venue_id).or_default().record(rating);
        }

        rows.into_iter()
            .map(|row| {
                let courts = offers.remove(&row.id).unwrap_or_default();
                let rating = ratings.remove(&row.id).unwrap_or_default();
                candidate(row, courts, rating)
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Venue>, VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows: Vec<VenueRow> = venues::table
            .filter(venues::owner_id.eq(owner.as_uuid()))
            .filter(venues::deleted_at.is_null())
            .order((venues::created_at.desc(), venues::id))
            .select(VenueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        hydrate(&mut conn, rows).await
    }

    async fn list_by_status(
        &self,
        status: Option<VenueStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Venue>, u64), VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut count_query = venues::table
            .filter(venues::deleted_at.is_null())
            .into_boxed();
        let mut page_query = venues::table
            .filter(venues::deleted_at.is_null())
            .into_boxed();
        if let Some(status) = status {
            count_query = count_query.filter(venues::status.eq(status.as_str()));
            page_query = page_query.filter(venues::status.eq(status.as_str()));
        }
        let total: i64 = count_query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let (limit, offset) = page_bounds(page);
        let rows: Vec<VenueRow> = page_query
            .order((venues::created_at.asc(), venues::id))
            .limit(limit)
            .offset(offset)
            .select(VenueRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let venues = hydrate(&mut conn, rows).await?;
        Ok((venues, count_to_u64(total)))
    }

    async fn soft_delete(
        &self,
        id: &VenueId,
        at: DateTime<Utc>,
    ) -> Result<(), VenueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::update(venues::table.find(id.as_uuid()))
            .set((venues::deleted_at.eq(at), venues::updated_at.eq(at)))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn venue_row(photos: Vec<String>, latitude: f64) -> VenueRow {
        let stamp = Utc
            .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
            .single()
            .expect("timestamp");
        VenueRow {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            name: "Baseline Arena".into(),
            description: "Indoor courts".into(),
            address: "12 MG Road".into(),
            city: "Pune".into(),
            latitude,
            longitude: 73.85,
            photos,
            status: "approved".into(),
            rejection_reason: None,
            created_at: stamp,
            updated_at: stamp,
            deleted_at: None,
        }
    }

    #[rstest]
    fn candidates_use_the_first_photo_as_cover() {
        let row = venue_row(
            vec!["https://img.example/a.jpg".into(), "https://img.example/b.jpg".into()],
            18.52,
        );
        let built = candidate(row, Vec::new(), RatingSummary::default()).expect("candidate");
        assert_eq!(built.cover_photo.as_deref(), Some("https://img.example/a.jpg"));
        assert_eq!(built.city, "Pune");
    }

    #[rstest]
    fn candidates_reject_impossible_coordinates() {
        let row = venue_row(Vec::new(), 123.0);
        assert!(candidate(row, Vec::new(), RatingSummary::default()).is_err());
    }

    #[rstest]
    fn amenity_links_follow_the_venue() {
        let row = venue_row(Vec::new(), 18.52);
        let amenity = AmenityId::from_uuid(Uuid::new_v4());
        let venue = row.into_venue(vec![amenity]).expect("venue");
        let links = amenity_links(&venue);
        assert_eq!(links.len(), 1);
        assert!(links.iter().all(|link| link.venue_id == *venue.id.as_uuid()));
    }
}
