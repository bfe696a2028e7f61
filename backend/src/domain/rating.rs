//! Star ratings and Wilson-score ranking.
//!
//! Average ratings overrate venues with a handful of reviews. Ranking uses
//! the lower bound of the Wilson score interval instead: the 1-5 average is
//! mapped onto a proportion `p = (avg - 1) / 4` and the bound is taken at
//! 95% confidence (`z = 1.96`).

use serde::{Deserialize, Serialize};

use crate::domain::validation::FieldError;

/// Normal quantile for a 95% confidence interval.
pub const WILSON_Z: f64 = 1.96;

/// Star rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    /// Validate a star count.
    ///
    /// # Errors
    /// Returns an `out_of_range` [`FieldError`] outside `1..=5`.
    pub fn new(stars: i64) -> Result<Self, FieldError> {
        u8::try_from(stars)
            .ok()
            .filter(|value| (1..=5).contains(value))
            .map(Self)
            .ok_or_else(|| {
                FieldError::new("rating", "out_of_range", "rating must be between 1 and 5")
            })
    }

    /// Star count.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

/// Lower bound of the Wilson interval for an average star rating.
///
/// Returns `0.0` when there are no reviews.
///
/// # Examples
/// ```
/// use courtside::domain::wilson_lower_bound;
///
/// let single_five = wilson_lower_bound(5.0, 1);
/// let many_fours = wilson_lower_bound(4.5, 100);
/// assert!(many_fours > single_five);
/// ```
#[must_use]
pub fn wilson_lower_bound(average: f64, count: u32) -> f64 {
    if count == 0 || !average.is_finite() {
        return 0.0;
    }
    let n = f64::from(count);
    let p = ((average - 1.0) / 4.0).clamp(0.0, 1.0);
    let z2 = WILSON_Z * WILSON_Z;
    let centre = p + z2 / (2.0 * n);
    let spread = WILSON_Z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();
    ((centre - spread) / (1.0 + z2 / n)).max(0.0)
}

/// Aggregate of a venue's reviews.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RatingSummary {
    /// Number of reviews.
    pub count: u32,
    /// Sum of all star ratings.
    pub total_stars: u64,
    /// Reviews per star, index 0 holding one-star reviews.
    pub histogram: [u32; 5],
}

impl RatingSummary {
    /// Build a summary from individual ratings.
    #[must_use]
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = Rating>,
    {
        ratings.into_iter().fold(Self::default(), |mut summary, rating| {
            summary.record(rating);
            summary
        })
    }

    /// Add one rating.
    pub fn record(&mut self, rating: Rating) {
        self.count = self.count.saturating_add(1);
        self.total_stars = self.total_stars.saturating_add(u64::from(rating.stars()));
        if let Some(slot) = self.histogram.get_mut(usize::from(rating.stars()).saturating_sub(1)) {
            *slot = slot.saturating_add(1);
        }
    }

    /// Mean stars, `0.0` without reviews.
    #[must_use]
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        #[expect(clippy::cast_precision_loss, reason = "star totals stay far below 2^52")]
        let total = self.total_stars as f64;
        total / f64::from(self.count)
    }

    /// Mean stars rounded to one decimal for display.
    #[must_use]
    pub fn display_average(&self) -> f64 {
        (self.average() * 10.0).round() / 10.0
    }

    /// Wilson lower bound used for ranking.
    #[must_use]
    pub fn wilson_score(&self) -> f64 {
        wilson_lower_bound(self.average(), self.count)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn ratings(stars: &[i64]) -> Vec<Rating> {
        stars.iter().map(|s| Rating::new(*s).expect("valid rating")).collect()
    }

    #[rstest]
    #[case(5.0, 1, 0.206_543)]
    #[case(4.5, 100, 0.796_021)]
    #[case(4.8, 5, 0.511_854)]
    #[case(3.0, 4, 0.150_036)]
    fn matches_reference_values(#[case] average: f64, #[case] count: u32, #[case] expected: f64) {
        let score = wilson_lower_bound(average, count);
        assert!((score - expected).abs() < 1e-5, "got {score}");
    }

    #[rstest]
    fn no_reviews_scores_zero() {
        assert!(wilson_lower_bound(5.0, 0).abs() < f64::EPSILON);
    }

    #[rstest]
    fn all_one_star_never_goes_negative() {
        assert!(wilson_lower_bound(1.0, 10) >= 0.0);
    }

    #[rstest]
    fn more_evidence_ranks_higher_at_equal_average() {
        assert!(wilson_lower_bound(4.0, 50) > wilson_lower_bound(4.0, 5));
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(-1)]
    fn rejects_out_of_range_ratings(#[case] stars: i64) {
        assert!(Rating::new(stars).is_err());
    }

    #[rstest]
    fn summary_tracks_histogram_and_average() {
        let summary = RatingSummary::from_ratings(ratings(&[5, 4, 4, 1]));
        assert_eq!(summary.count, 4);
        assert_eq!(summary.histogram, [1, 0, 0, 2, 1]);
        assert!((summary.average() - 3.5).abs() < 1e-9);
        assert!((summary.display_average() - 3.5).abs() < 1e-9);
    }

    #[rstest]
    fn display_average_rounds_to_one_decimal() {
        let summary = RatingSummary::from_ratings(ratings(&[5, 4, 4]));
        assert!((summary.display_average() - 4.3).abs() < 1e-9);
    }
}
