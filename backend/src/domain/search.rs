//! Venue search: filters that run over loaded candidates and the sort order.
//!
//! Text and city filters are pushed into SQL by the repository. Sport,
//! price, rating and distance filters need the court list, the review
//! aggregate and the Haversine distance, so they run here.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::domain::geo::{Coordinates, SearchRadius};
use crate::domain::money::Money;
use crate::domain::rating::RatingSummary;
use crate::domain::validation::FieldError;
use crate::domain::venue::Sport;
use crate::domain::VenueId;

/// Order of search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VenueSort {
    /// Wilson score, then review count.
    #[default]
    Relevance,
    /// Wilson score only.
    Rating,
    /// Cheapest court first.
    PriceAsc,
    /// Most expensive cheapest-court first.
    PriceDesc,
    /// Nearest first; needs coordinates.
    Distance,
    /// Most recently created first.
    Newest,
}

impl VenueSort {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Rating => "rating",
            Self::PriceAsc => "price_asc",
            Self::PriceDesc => "price_desc",
            Self::Distance => "distance",
            Self::Newest => "newest",
        }
    }
}

impl std::str::FromStr for VenueSort {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "rating" => Ok(Self::Rating),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "distance" => Ok(Self::Distance),
            "newest" => Ok(Self::Newest),
            _ => Err(FieldError::new(
                "sort",
                "invalid_sort",
                "sort must be relevance, rating, price_asc, price_desc, distance or newest",
            )),
        }
    }
}

/// Filters pushed down to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VenueTextFilter {
    /// Case-insensitive substring over name, description and address.
    pub text: Option<String>,
    /// Case-insensitive city match.
    pub city: Option<String>,
}

/// Full validated search request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VenueSearch {
    /// Store-side filters.
    pub text_filter: VenueTextFilter,
    /// Require at least one active court for this sport.
    pub sport: Option<Sport>,
    /// Lower bound on the cheapest court price.
    pub min_price: Option<Money>,
    /// Upper bound on the cheapest court price.
    pub max_price: Option<Money>,
    /// Lower bound on the displayed average rating.
    pub min_rating: Option<f64>,
    /// Distance filter.
    pub radius: Option<SearchRadius>,
    /// Result order.
    pub sort: VenueSort,
}

impl VenueSearch {
    /// Check cross-field rules.
    ///
    /// # Errors
    /// Returns a [`FieldError`] when the price range is inverted, the
    /// rating bound is outside 1..=5, or distance sort lacks coordinates.
    pub fn validate(self) -> Result<Self, FieldError> {
        if matches!((self.min_price, self.max_price), (Some(min), Some(max)) if min > max) {
            return Err(FieldError::new(
                "maxPrice",
                "invalid_range",
                "maxPrice must not be below minPrice",
            ));
        }
        if self
            .min_rating
            .is_some_and(|rating| !rating.is_finite() || !(1.0..=5.0).contains(&rating))
        {
            return Err(FieldError::new(
                "minRating",
                "out_of_range",
                "minRating must be between 1 and 5",
            ));
        }
        if self.sort == VenueSort::Distance && self.radius.is_none() {
            return Err(FieldError::new(
                "sort",
                "missing_coordinates",
                "distance sort requires lat and lng",
            ));
        }
        Ok(self)
    }
}

/// Venue loaded for in-memory filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    /// Venue identifier.
    pub venue_id: VenueId,
    /// Name.
    pub name: String,
    /// City.
    pub city: String,
    /// Address.
    pub address: String,
    /// Map position.
    pub location: Coordinates,
    /// First photo, if any.
    pub cover_photo: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Sports and prices of active courts.
    pub courts: Vec<(Sport, Money)>,
    /// Review aggregate.
    pub rating: RatingSummary,
}

impl SearchCandidate {
    /// Distinct sports offered, sorted.
    #[must_use]
    pub fn sports(&self) -> Vec<Sport> {
        let mut sports: Vec<Sport> = self.courts.iter().map(|(sport, _)| *sport).collect();
        sports.sort_unstable();
        sports.dedup();
        sports
    }

    /// Cheapest active court price.
    #[must_use]
    pub fn min_price(&self) -> Option<Money> {
        self.courts.iter().map(|(_, price)| *price).min()
    }
}

/// Search result row.
#[derive(Debug, Clone, PartialEq)]
pub struct VenueSummary {
    /// Venue identifier.
    pub id: VenueId,
    /// Name.
    pub name: String,
    /// City.
    pub city: String,
    /// Address.
    pub address: String,
    /// Sports offered.
    pub sports: Vec<Sport>,
    /// Cheapest court.
    pub min_price: Option<Money>,
    /// Average rating rounded to one decimal.
    pub average_rating: f64,
    /// Number of reviews.
    pub review_count: u32,
    /// Distance from the search centre.
    pub distance_km: Option<f64>,
    /// First photo.
    pub cover_photo: Option<String>,
}

struct Ranked {
    candidate: SearchCandidate,
    distance_km: Option<f64>,
    wilson: f64,
    min_price: Option<Money>,
}

/// Apply in-memory filters and sort.
///
/// Venues without active courts never match a sport or price filter.
#[must_use]
pub fn rank_candidates(
    candidates: Vec<SearchCandidate>,
    search: &VenueSearch,
) -> Vec<VenueSummary> {
    let mut ranked: Vec<Ranked> = candidates
        .into_iter()
        .filter_map(|candidate| admit(candidate, search))
        .collect();
    ranked.sort_by(|a, b| compare(a, b, search.sort));
    ranked
        .into_iter()
        .map(|row| VenueSummary {
            id: row.candidate.venue_id,
            sports: row.candidate.sports(),
            min_price: row.min_price,
            average_rating: row.candidate.rating.display_average(),
            review_count: row.candidate.rating.count,
            distance_km: row.distance_km.map(|km| (km * 100.0).round() / 100.0),
            name: row.candidate.name,
            city: row.candidate.city,
            address: row.candidate.address,
            cover_photo: row.candidate.cover_photo,
        })
        .collect()
}

fn admit(candidate: SearchCandidate, search: &VenueSearch) -> Option<Ranked> {
    if search
        .sport
        .is_some_and(|sport| !candidate.courts.iter().any(|(offered, _)| *offered == sport))
    {
        return None;
    }
    let min_price = candidate.min_price();
    if search.min_price.is_some() || search.max_price.is_some() {
        let price = min_price?;
        if search.min_price.is_some_and(|min| price < min)
            || search.max_price.is_some_and(|max| price > max)
        {
            return None;
        }
    }
    if search
        .min_rating
        .is_some_and(|bound| candidate.rating.display_average() < bound)
    {
        return None;
    }
    let distance_km = match &search.radius {
        Some(radius) => Some(radius.distance_if_within(&candidate.location)?),
        None => None,
    };
    Some(Ranked {
        wilson: candidate.rating.wilson_score(),
        min_price,
        distance_km,
        candidate,
    })
}

fn compare(a: &Ranked, b: &Ranked, sort: VenueSort) -> Ordering {
    let by_wilson = || b.wilson.total_cmp(&a.wilson);
    let by_count = || b.candidate.rating.count.cmp(&a.candidate.rating.count);
    let by_newest = || b.candidate.created_at.cmp(&a.candidate.created_at);
    let primary = match sort {
        VenueSort::Relevance => by_wilson().then_with(by_count),
        VenueSort::Rating => by_wilson(),
        VenueSort::PriceAsc => price_order(a.min_price, b.min_price, false),
        VenueSort::PriceDesc => price_order(a.min_price, b.min_price, true),
        VenueSort::Distance => a
            .distance_km
            .unwrap_or(f64::MAX)
            .total_cmp(&b.distance_km.unwrap_or(f64::MAX)),
        VenueSort::Newest => by_newest(),
    };
    primary
        .then_with(by_newest)
        .then_with(|| a.candidate.venue_id.cmp(&b.candidate.venue_id))
}

// Venues without a price sort last in both directions.
fn price_order(first: Option<Money>, second: Option<Money>, descending: bool) -> Ordering {
    match (first, second) {
        (Some(x), Some(y)) if descending => y.cmp(&x),
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
