//! Geographic coordinates and great-circle distance.

use serde::{Deserialize, Serialize};

use crate::domain::validation::FieldError;

/// Mean Earth radius used by the Haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// WGS-84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Validate ranges: latitude in `[-90, 90]`, longitude in `[-180, 180]`.
    ///
    /// # Errors
    /// Returns a [`FieldError`] naming the out-of-range component.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, FieldError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(FieldError::new(
                "latitude",
                "out_of_range",
                "latitude must be between -90 and 90",
            ));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(FieldError::new(
                "longitude",
                "out_of_range",
                "longitude must be between -180 and 180",
            ));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Haversine distance to `other` in kilometres.
    ///
    /// # Examples
    /// ```
    /// use courtside::domain::Coordinates;
    ///
    /// let mumbai = Coordinates::new(19.0760, 72.8777).expect("valid");
    /// let pune = Coordinates::new(18.5204, 73.8567).expect("valid");
    /// let km = mumbai.distance_km(&pune);
    /// assert!((km - 120.2).abs() < 1.0);
    /// ```
    #[must_use]
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(self, other)
    }
}

/// Great-circle distance between two points in kilometres.
#[must_use]
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

/// Circle used by the search distance filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchRadius {
    /// Centre of the search.
    pub centre: Coordinates,
    /// Radius in kilometres.
    pub radius_km: f64,
}

impl SearchRadius {
    /// Default radius when the client supplies only coordinates.
    pub const DEFAULT_KM: f64 = 10.0;
    /// Largest radius accepted.
    pub const MAX_KM: f64 = 100.0;

    /// Validate the radius (`0 < r <= 100`).
    ///
    /// # Errors
    /// Returns an `out_of_range` [`FieldError`] for `radiusKm`.
    pub fn new(centre: Coordinates, radius_km: Option<f64>) -> Result<Self, FieldError> {
        let radius_km = radius_km.unwrap_or(Self::DEFAULT_KM);
        if !radius_km.is_finite() || radius_km <= 0.0 || radius_km > Self::MAX_KM {
            return Err(FieldError::new(
                "radiusKm",
                "out_of_range",
                "radiusKm must be greater than 0 and at most 100",
            ));
        }
        Ok(Self { centre, radius_km })
    }

    /// Distance from the centre when `point` lies inside the circle.
    #[must_use]
    pub fn distance_if_within(&self, point: &Coordinates) -> Option<f64> {
        let distance = self.centre.distance_km(point);
        (distance <= self.radius_km).then_some(distance)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn point(lat: f64, lon: f64) -> Coordinates {
        Coordinates::new(lat, lon).expect("valid coordinates")
    }

    #[rstest]
    fn zero_distance_to_self() {
        let p = point(12.9716, 77.5946);
        assert!(p.distance_km(&p).abs() < 1e-9);
    }

    #[rstest]
    fn one_degree_of_latitude_is_about_111_km() {
        let d = point(0.0, 0.0).distance_km(&point(1.0, 0.0));
        assert!((d - 111.195).abs() < 0.01, "got {d}");
    }

    #[rstest]
    fn antipodes_are_half_circumference() {
        let d = point(0.0, 0.0).distance_km(&point(0.0, 180.0));
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[rstest]
    fn distance_is_symmetric() {
        let delhi = point(28.6139, 77.2090);
        let bengaluru = point(12.9716, 77.5946);
        let there = delhi.distance_km(&bengaluru);
        let back = bengaluru.distance_km(&delhi);
        assert!((there - back).abs() < 1e-9);
        assert!((there - 1740.0).abs() < 5.0, "got {there}");
    }

    #[rstest]
    #[case(90.1, 0.0, "latitude")]
    #[case(-90.5, 0.0, "latitude")]
    #[case(0.0, 180.5, "longitude")]
    #[case(f64::NAN, 0.0, "latitude")]
    fn rejects_out_of_range(#[case] lat: f64, #[case] lon: f64, #[case] field: &str) {
        let err = Coordinates::new(lat, lon).expect_err("out of range");
        assert_eq!(err.field(), field);
    }

    #[rstest]
    #[case(Some(0.0))]
    #[case(Some(100.5))]
    #[case(Some(-3.0))]
    fn rejects_bad_radius(#[case] radius: Option<f64>) {
        assert!(SearchRadius::new(point(0.0, 0.0), radius).is_err());
    }

    #[rstest]
    fn radius_filter_includes_boundary_neighbourhood() {
        let radius = SearchRadius::new(point(0.0, 0.0), None).expect("default radius");
        assert!(radius.distance_if_within(&point(0.05, 0.0)).is_some());
        assert!(radius.distance_if_within(&point(0.5, 0.0)).is_none());
    }
}
