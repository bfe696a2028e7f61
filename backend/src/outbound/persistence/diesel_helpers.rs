//! Shared helpers for the Diesel repository implementations.
//!
//! Covers error mapping into each port's `Connection`/`Query` constructors,
//! unique-constraint detection, and the column conversions between
//! PostgreSQL integer types and domain values.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use pagination::PageRequest;

use crate::domain::{HourOfDay, Money};

use super::pool::PoolError;

/// A stored value that no longer satisfies the domain rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("stored {column} value {value:?} is invalid")]
pub struct CorruptRow {
    column: &'static str,
    value: String,
}

impl CorruptRow {
    /// Record an unreadable column value.
    pub fn new(column: &'static str, value: impl ToString) -> Self {
        Self {
            column,
            value: value.to_string(),
        }
    }
}

/// Failure inside a multi-statement transaction.
#[derive(Debug, thiserror::Error)]
pub enum TxError {
    /// The database refused a statement.
    #[error(transparent)]
    Diesel(#[from] DieselError),
    /// A row read inside the transaction could not be decoded.
    #[error(transparent)]
    Corrupt(#[from] CorruptRow),
}

/// Map pool errors into a repository-specific connection error.
pub fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => connection(message),
    }
}

/// Map Diesel failures into query or connection constructors.
///
/// `NotFound` and query-builder failures are query errors; a closed
/// connection is a connection error so callers answer `503`.
pub fn map_diesel_error<E>(
    error: DieselError,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        _ => query("database error"),
    }
}

/// Map a transaction failure the same way as a single statement.
pub fn map_tx_error<E>(
    error: TxError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match error {
        TxError::Diesel(error) => map_diesel_error(
            error,
            |message| query(message.to_owned()),
            |message| connection(message.to_owned()),
        ),
        TxError::Corrupt(corrupt) => query(corrupt.to_string()),
    }
}

/// Whether `error` is a unique violation, optionally of a named constraint.
pub fn is_unique_violation(error: &DieselError, constraint: Option<&str>) -> bool {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            constraint.is_none_or(|name| info.constraint_name() == Some(name))
        }
        _ => false,
    }
}

/// Decode a `SMALLINT` hour column.
pub fn hour_from_db(column: &'static str, value: i16) -> Result<HourOfDay, CorruptRow> {
    u8::try_from(value)
        .ok()
        .filter(|hour| *hour <= 24)
        .map(HourOfDay::from_trusted)
        .ok_or_else(|| CorruptRow::new(column, value))
}

/// Encode an hour for a `SMALLINT` column.
pub fn hour_to_db(hour: HourOfDay) -> i16 {
    i16::from(hour.get())
}

/// Decode a `BIGINT` minor-unit column.
pub fn money_from_db(column: &'static str, value: i64) -> Result<Money, CorruptRow> {
    Money::from_minor(value).ok_or_else(|| CorruptRow::new(column, value))
}

/// Clamp a `COUNT(*)` result into `u64`.
pub fn count_to_u64(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

/// `LIMIT` and `OFFSET` for a page request.
pub fn page_bounds(page: PageRequest) -> (i64, i64) {
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (i64::from(page.limit()), offset)
}

/// `ILIKE` pattern matching `text` exactly, ignoring case.
pub fn exact_pattern(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// `ILIKE` pattern matching `text` anywhere, with wildcards escaped.
pub fn contains_pattern(text: &str) -> String {
    format!("%{}%", exact_pattern(text))
}
