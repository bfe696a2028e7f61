//! Field-level validation shared by domain constructors.
//!
//! Constructors report failures as [`FieldError`], naming the offending
//! request field (camelCase, as clients send it) and a stable code. Services
//! convert these into `invalid_request` errors carrying the same details.

use serde_json::json;
use url::Url;

use crate::domain::Error;

/// A validation failure attributed to one input field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    field: &'static str,
    code: &'static str,
    message: String,
}

impl FieldError {
    /// Build a field error.
    pub fn new(field: &'static str, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            code,
            message: message.into(),
        }
    }

    /// Offending field name.
    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Stable failure code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<FieldError> for Error {
    fn from(value: FieldError) -> Self {
        Error::invalid_request(value.message).with_details(json!({
            "field": value.field,
            "code": value.code,
        }))
    }
}

/// Trim `value` and require its length in characters to fall in `min..=max`.
///
/// # Errors
/// Returns `empty` for blank input and `too_short`/`too_long` otherwise.
pub fn bounded_text(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, FieldError> {
    let trimmed = value.trim();
    let length = trimmed.chars().count();
    if length == 0 && min > 0 {
        return Err(FieldError::new(field, "empty", format!("{field} must not be empty")));
    }
    if length < min {
        return Err(FieldError::new(
            field,
            "too_short",
            format!("{field} must be at least {min} characters"),
        ));
    }
    if length > max {
        return Err(FieldError::new(
            field,
            "too_long",
            format!("{field} must be at most {max} characters"),
        ));
    }
    Ok(trimmed.to_owned())
}

/// Like [`bounded_text`] but maps blank input to `None`.
///
/// # Errors
/// Returns `too_short`/`too_long` for non-blank input outside the bounds.
pub fn optional_text(
    field: &'static str,
    value: Option<&str>,
    min: usize,
    max: usize,
) -> Result<Option<String>, FieldError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => bounded_text(field, text, min, max).map(Some),
    }
}

/// Absolute `http`/`https` URL such as a photo or avatar link.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct WebUrl(String);

impl WebUrl {
    /// Parse and normalise a web URL.
    ///
    /// # Errors
    /// Returns `invalid_url` when the value is not an absolute http(s) URL.
    pub fn parse(field: &'static str, raw: &str) -> Result<Self, FieldError> {
        let invalid =
            || FieldError::new(field, "invalid_url", format!("{field} must be an http(s) URL"));
        let url = Url::parse(raw.trim()).map_err(|_| invalid())?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(invalid());
        }
        Ok(Self(url.to_string()))
    }

    /// Rehydrate a stored URL without validation.
    #[must_use]
    pub fn from_trusted(value: String) -> Self {
        Self(value)
    }

    /// Borrow the URL text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
