//! Shared validation helpers for inbound HTTP adapters.
//!
//! Failures become `400 invalid_request` errors whose details name the
//! offending field in the request's camelCase spelling.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{Error, FieldError, HourOfDay, Money, SlotWindow};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ErrorCode {
    MissingField,
    InvalidDate,
    InvalidAmount,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidAmount => "invalid_amount",
        }
    }
}

fn field_error(field: &str, code: ErrorCode, message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: &'static str) -> Error {
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {field}"),
    )
}

/// Unwrap a required body field.
pub(crate) fn require<T>(value: Option<T>, field: &'static str) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse an optional enum-like parameter through its `FromStr` impl.
pub(crate) fn parse_optional<T>(value: Option<&str>) -> Result<Option<T>, Error>
where
    T: FromStr<Err = FieldError>,
{
    value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| raw.parse::<T>().map_err(Error::from))
        .transpose()
}

/// Parse a `YYYY-MM-DD` calendar date.
pub(crate) fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        field_error(
            field,
            ErrorCode::InvalidDate,
            format!("{field} must be a date in YYYY-MM-DD format"),
        )
    })
}

/// Parse an amount in minor units.
pub(crate) fn parse_money(minor: i64, field: &'static str) -> Result<Money, Error> {
    Money::from_minor(minor).ok_or_else(|| {
        field_error(
            field,
            ErrorCode::InvalidAmount,
            format!("{field} must not be negative"),
        )
    })
}

/// Parse `date`, `startTime` and `endTime` into a slot window.
pub(crate) fn parse_window(
    date: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<SlotWindow, Error> {
    let date = parse_date(require(date, "date")?, "date")?;
    let start = HourOfDay::parse("startTime", require(start, "startTime")?)?;
    let end = HourOfDay::parse("endTime", require(end, "endTime")?)?;
    Ok(SlotWindow::new(date, start, end)?)
}
