//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{Account, AccountFilter, BookingStatus, Email, UserId};

use super::diesel_helpers::{
    CorruptRow, contains_pattern, count_to_u64, is_unique_violation, map_diesel_error,
    map_pool_error, page_bounds,
};
use super::models::{UserRecord, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{bookings, users};

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserRepositoryError {
    map_pool_error(error, UserRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    if is_unique_violation(&error, Some("users_email_key")) {
        return UserRepositoryError::duplicate_email();
    }
    map_diesel_error(error, UserRepositoryError::query, UserRepositoryError::connection)
}

fn corrupt(error: CorruptRow) -> UserRepositoryError {
    UserRepositoryError::query(error.to_string())
}

macro_rules! filtered_users {
    ($filter:expr) => {{
        let filter: &AccountFilter = $filter;
        let mut query = users::table
            .filter(users::deleted_at.is_null())
            .into_boxed();
        if let Some(role) = filter.role {
            query = query.filter(users::role.eq(role.as_str()));
        }
        match filter.banned {
            Some(true) => query = query.filter(users::banned_at.is_not_null()),
            Some(false) => query = query.filter(users::banned_at.is_null()),
            None => {}
        }
        if let Some(text) = filter.query.as_deref() {
            let pattern = contains_pattern(text);
            query = query.filter(
                users::email
                    .ilike(pattern.clone())
                    .or(users::full_name.ilike(pattern)),
            );
        }
        query
    }};
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, account: &Account) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        diesel::insert_into(users::table)
            .values(UserRecord::from(account))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Account::try_from).transpose().map_err(corrupt)
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Account>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(Account::try_from).transpose().map_err(corrupt)
    }

    async fn update(&self, account: &Account) -> Result<(), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let updated = diesel::update(users::table.find(account.id.as_uuid()))
            .set(UserRecord::from(account))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        if updated == 0 {
            return Err(UserRepositoryError::query("account not found for update"));
        }
        Ok(())
    }

    async fn soft_delete(
        &self,
        id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<u64, UserRepositoryError> {
        let user_id = *id.as_uuid();
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let cancelled = conn
            .transaction(|conn| {
                async move {
                    diesel::update(users::table.find(user_id))
                        .set((users::deleted_at.eq(at), users::updated_at.eq(at)))
                        .execute(conn)
                        .await?;
                    diesel::update(
                        bookings::table
                            .filter(bookings::user_id.eq(user_id))
                            .filter(bookings::status.eq(BookingStatus::Pending.as_str())),
                    )
                    .set((
                        bookings::status.eq(BookingStatus::Cancelled.as_str()),
                        bookings::cancellation_reason.eq("account deleted"),
                        bookings::updated_at.eq(at),
                    ))
                    .execute(conn)
                    .await
                }
                .scope_boxed()
            })
            .await
            .map_err(diesel_error)?;
        Ok(u64::try_from(cancelled).unwrap_or(u64::MAX))
    }

    async fn list(
        &self,
        filter: &AccountFilter,
        page: PageRequest,
    ) -> Result<(Vec<Account>, u64), UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let total: i64 = filtered_users!(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let (limit, offset) = page_bounds(page);
        let rows: Vec<UserRow> = filtered_users!(filter)
            .order((users::created_at.desc(), users::id))
            .limit(limit)
            .offset(offset)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let accounts = rows
            .into_iter()
            .map(Account::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(corrupt)?;
        Ok((accounts, count_to_u64(total)))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use diesel::result::Error as DieselError;
    use rstest::rstest;

    use super::super::diesel_helpers::test_errors::unique_violation;
    use super::*;

    #[rstest]
    fn email_conflicts_become_duplicate_email() {
        assert_eq!(
            diesel_error(unique_violation("users_email_key")),
            UserRepositoryError::DuplicateEmail
        );
    }

    #[rstest]
    fn missing_rows_are_query_errors() {
        assert!(matches!(
            diesel_error(DieselError::NotFound),
            UserRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn pool_failures_are_connection_errors() {
        let mapped = pool_error(PoolError::checkout("timed out"));
        assert_eq!(mapped, UserRepositoryError::connection("timed out"));
    }
}
