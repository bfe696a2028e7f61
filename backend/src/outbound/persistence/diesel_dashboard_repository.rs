//! PostgreSQL-backed dashboard aggregates.
//!
//! Aggregates are raw SQL so grouping, `FILTER` clauses and the refund
//! netting stay in one statement each. Sums are cast to `bigint` to avoid
//! decoding PostgreSQL `numeric`.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::QueryableByName;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Date, Text, Uuid as SqlUuid};
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{DashboardRepository, DashboardRepositoryError};
use crate::domain::{
    AdminDashboard, BookingStatus, DashboardPeriod, OwnerDashboard, ReportStatus, Tally, UserId,
    UserRole, VenueStatus,
};

use super::diesel_helpers::{
    CorruptRow, count_to_u64, map_diesel_error, map_pool_error, money_from_db,
};
use super::pool::{DbPool, PoolError};

const OWNER_VENUES_SQL: &str = r#"
SELECT status AS key, COUNT(*)::bigint AS total
FROM venues
WHERE owner_id = $1 AND deleted_at IS NULL
GROUP BY status
"#;

const OWNER_COURTS_SQL: &str = r#"
SELECT COUNT(*)::bigint AS total
FROM courts c
JOIN venues v ON v.id = c.venue_id
WHERE v.owner_id = $1 AND v.deleted_at IS NULL AND c.active
"#;

const OWNER_BOOKINGS_SQL: &str = r#"
SELECT
    COUNT(*) FILTER (
        WHERE b.slot_date >= $2 AND b.slot_date < $3
          AND b.status IN ('confirmed', 'completed')
    )::bigint AS this_month,
    COUNT(*) FILTER (
        WHERE b.slot_date >= $4 AND b.status = 'confirmed'
    )::bigint AS upcoming
FROM bookings b
JOIN venues v ON v.id = b.venue_id
WHERE v.owner_id = $1
"#;

const OWNER_EARNINGS_SQL: &str = r#"
WITH net AS (
    SELECT
        b.slot_date,
        p.amount_minor - COALESCE((
            SELECT SUM(r.amount_minor)
            FROM refunds r
            WHERE r.payment_id = p.id AND r.status = 'processed'
        ), 0) AS amount
    FROM payments p
    JOIN bookings b ON b.id = p.booking_id
    JOIN venues v ON v.id = b.venue_id
    WHERE v.owner_id = $1
      AND p.status IN ('captured', 'partially_refunded', 'refunded')
)
SELECT
    GREATEST(COALESCE(SUM(amount) FILTER (
        WHERE slot_date >= $2 AND slot_date < $3
    ), 0), 0)::bigint AS this_month,
    GREATEST(COALESCE(SUM(amount), 0), 0)::bigint AS all_time
FROM net
"#;

const USERS_BY_ROLE_SQL: &str = r#"
SELECT role AS key, COUNT(*)::bigint AS total
FROM users
WHERE deleted_at IS NULL
GROUP BY role
"#;

const BANNED_USERS_SQL: &str = r#"
SELECT COUNT(*)::bigint AS total
FROM users
WHERE deleted_at IS NULL AND banned_at IS NOT NULL
"#;

const VENUES_BY_STATUS_SQL: &str = r#"
SELECT status AS key, COUNT(*)::bigint AS total
FROM venues
WHERE deleted_at IS NULL
GROUP BY status
"#;

const BOOKINGS_BY_STATUS_SQL: &str = r#"
SELECT status AS key, COUNT(*)::bigint AS total
FROM bookings
GROUP BY status
"#;

const REPORTS_BY_STATUS_SQL: &str = r#"
SELECT status AS key, COUNT(*)::bigint AS total
FROM reports
GROUP BY status
"#;

const REVENUE_SQL: &str = r#"
SELECT GREATEST(COALESCE(SUM(
    p.amount_minor - COALESCE((
        SELECT SUM(r.amount_minor)
        FROM refunds r
        WHERE r.payment_id = p.id AND r.status = 'processed'
    ), 0)
), 0), 0)::bigint AS total
FROM payments p
WHERE p.status IN ('captured', 'partially_refunded', 'refunded')
"#;

#[derive(Debug, QueryableByName)]
struct KeyCountRow {
    #[diesel(sql_type = Text)]
    key: String,
    #[diesel(sql_type = BigInt)]
    total: i64,
}

#[derive(Debug, QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    total: i64,
}

#[derive(Debug, QueryableByName)]
struct OwnerBookingsRow {
    #[diesel(sql_type = BigInt)]
    this_month: i64,
    #[diesel(sql_type = BigInt)]
    upcoming: i64,
}

#[derive(Debug, QueryableByName)]
struct EarningsRow {
    #[diesel(sql_type = BigInt)]
    this_month: i64,
    #[diesel(sql_type = BigInt)]
    all_time: i64,
}

/// Diesel-backed implementation of the `DashboardRepository` port.
#[derive(Clone)]
pub struct DieselDashboardRepository {
    pool: DbPool,
}

impl DieselDashboardRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> DashboardRepositoryError {
    map_pool_error(error, DashboardRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> DashboardRepositoryError {
    map_diesel_error(
        error,
        DashboardRepositoryError::query,
        DashboardRepositoryError::connection,
    )
}

fn corrupt(error: CorruptRow) -> DashboardRepositoryError {
    DashboardRepositoryError::query(error.to_string())
}

/// Fold grouped counts into a tally seeded with every known key.
fn tally<K>(
    keys: impl IntoIterator<Item = K>,
    rows: Vec<KeyCountRow>,
    column: &'static str,
) -> Result<Tally<K>, CorruptRow>
where
    K: Copy + PartialEq + std::str::FromStr,
{
    let mut tally = Tally::zeroed(keys);
    for row in rows {
        let key = row
            .key
            .parse::<K>()
            .map_err(|_| CorruptRow::new(column, &row.key))?;
        tally.add(key, count_to_u64(row.total));
    }
    Ok(tally)
}

async fn grouped(
    conn: &mut AsyncPgConnection,
    sql: &'static str,
) -> Result<Vec<KeyCountRow>, DashboardRepositoryError> {
    sql_query(sql).load(conn).await.map_err(diesel_error)
}

async fn single_count(
    conn: &mut AsyncPgConnection,
    sql: &'static str,
) -> Result<i64, DashboardRepositoryError> {
    let row: CountRow = sql_query(sql).get_result(conn).await.map_err(diesel_error)?;
    Ok(row.total)
}

#[async_trait]
impl DashboardRepository for DieselDashboardRepository {
    async fn owner_dashboard(
        &self,
        owner_id: &UserId,
        period: DashboardPeriod,
    ) -> Result<OwnerDashboard, DashboardRepositoryError> {
        let owner: Uuid = *owner_id.as_uuid();
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let venue_rows: Vec<KeyCountRow> = sql_query(OWNER_VENUES_SQL)
            .bind::<SqlUuid, _>(owner)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        let courts: CountRow = sql_query(OWNER_COURTS_SQL)
            .bind::<SqlUuid, _>(owner)
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let bookings: OwnerBookingsRow = sql_query(OWNER_BOOKINGS_SQL)
            .bind::<SqlUuid, _>(owner)
            .bind::<Date, NaiveDate>(period.month_start)
            .bind::<Date, NaiveDate>(period.next_month_start)
            .bind::<Date, NaiveDate>(period.today)
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;
        let earnings: EarningsRow = sql_query(OWNER_EARNINGS_SQL)
            .bind::<SqlUuid, _>(owner)
            .bind::<Date, NaiveDate>(period.month_start)
            .bind::<Date, NaiveDate>(period.next_month_start)
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(OwnerDashboard {
            venues: tally(VenueStatus::ALL, venue_rows, "venues.status").map_err(corrupt)?,
            active_courts: count_to_u64(courts.total),
            bookings_this_month: count_to_u64(bookings.this_month),
            upcoming_confirmed: count_to_u64(bookings.upcoming),
            earnings_this_month: money_from_db("earnings", earnings.this_month)
                .map_err(corrupt)?,
            earnings_all_time: money_from_db("earnings", earnings.all_time).map_err(corrupt)?,
        })
    }

    async fn admin_dashboard(&self) -> Result<AdminDashboard, DashboardRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let users = grouped(&mut conn, USERS_BY_ROLE_SQL).await?;
        let banned = single_count(&mut conn, BANNED_USERS_SQL).await?;
        let venues = grouped(&mut conn, VENUES_BY_STATUS_SQL).await?;
        let bookings = grouped(&mut conn, BOOKINGS_BY_STATUS_SQL).await?;
        let reports = grouped(&mut conn, REPORTS_BY_STATUS_SQL).await?;
        let revenue = single_count(&mut conn, REVENUE_SQL).await?;

        Ok(AdminDashboard {
            users: tally(UserRole::ALL, users, "users.role").map_err(corrupt)?,
            banned_users: count_to_u64(banned),
            venues: tally(VenueStatus::ALL, venues, "venues.status").map_err(corrupt)?,
            bookings: tally(BookingStatus::ALL, bookings, "bookings.status").map_err(corrupt)?,
            revenue: money_from_db("revenue", revenue).map_err(corrupt)?,
            reports: tally(ReportStatus::ALL, reports, "reports.status").map_err(corrupt)?,
        })
    }
}
