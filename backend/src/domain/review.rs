//! Venue reviews.

use chrono::{DateTime, Utc};

use crate::domain::rating::Rating;
use crate::domain::validation::{FieldError, bounded_text};
use crate::domain::{ReviewId, UserId, VenueId};

const COMMENT_MAX: usize = 1000;

/// Review left by a player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    /// Identifier.
    pub id: ReviewId,
    /// Author.
    pub user_id: UserId,
    /// Reviewed venue.
    pub venue_id: VenueId,
    /// Stars.
    pub rating: Rating,
    /// Free text, may be empty.
    pub comment: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit.
    pub updated_at: DateTime<Utc>,
}

/// Review with the author's display name for listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    /// The review.
    pub review: Review,
    /// Author display name.
    pub author_name: String,
}

/// Validate a review comment (at most 1000 characters, may be empty).
///
/// # Errors
/// Returns a `too_long` [`FieldError`] for `comment`.
pub fn validate_comment(raw: &str) -> Result<String, FieldError> {
    bounded_text("comment", raw, 0, COMMENT_MAX)
}

/// Order of review listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSort {
    /// Latest first.
    #[default]
    Newest,
    /// Highest rating first.
    Highest,
    /// Lowest rating first.
    Lowest,
}

impl std::str::FromStr for ReviewSort {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "highest" => Ok(Self::Highest),
            "lowest" => Ok(Self::Lowest),
            _ => Err(FieldError::new(
                "sort",
                "invalid_sort",
                "sort must be newest, highest or lowest",
            )),
        }
    }
}
