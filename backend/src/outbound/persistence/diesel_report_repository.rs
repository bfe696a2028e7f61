//! PostgreSQL-backed `ReportRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{ReportRepository, ReportRepositoryError};
use crate::domain::{Report, ReportId, ReportStatus};

use super::diesel_helpers::{
    CorruptRow, count_to_u64, map_diesel_error, map_pool_error, page_bounds,
};
use super::models::ReportRow;
use super::pool::{DbPool, PoolError};
use super::schema::reports;

/// Diesel-backed implementation of the `ReportRepository` port.
#[derive(Clone)]
pub struct DieselReportRepository {
    pool: DbPool,
}

impl DieselReportRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> ReportRepositoryError {
    map_pool_error(error, ReportRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> ReportRepositoryError {
    map_diesel_error(error, ReportRepositoryError::query, ReportRepositoryError::connection)
}

fn corrupt(error: CorruptRow) -> ReportRepositoryError {
    ReportRepositoryError::query(error.to_string())
}

#[async_trait]
impl ReportRepository for DieselReportRepository {
    async fn create(&self, report: &Report) -> Result<(), ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(reports::table)
            .values(ReportRow::from(report))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: &ReportId) -> Result<Option<Report>, ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<ReportRow> = reports::table
            .find(id.as_uuid())
            .select(ReportRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Report::try_from).transpose().map_err(corrupt)
    }

    async fn update(&self, report: &Report) -> Result<(), ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(reports::table.find(report.id.as_uuid()))
            .set(ReportRow::from(report))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        if updated == 0 {
            return Err(ReportRepositoryError::query("report not found for update"));
        }
        Ok(())
    }

    async fn list(
        &self,
        status: Option<ReportStatus>,
        page: PageRequest,
    ) -> Result<(Vec<Report>, u64), ReportRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut count_query = reports::table.into_boxed();
        let mut page_query = reports::table.into_boxed();
        if let Some(status) = status {
            count_query = count_query.filter(reports::status.eq(status.as_str()));
            page_query = page_query.filter(reports::status.eq(status.as_str()));
        }
        let total: i64 = count_query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let (limit, offset) = page_bounds(page);
        let rows: Vec<ReportRow> = page_query
            .order((reports::created_at.desc(), reports::id))
            .limit(limit)
            .offset(offset)
            .select(ReportRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let reports = rows
            .into_iter()
            .map(Report::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;
        Ok((reports, count_to_u64(total)))
    }
}
