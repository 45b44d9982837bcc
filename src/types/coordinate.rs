//! Geographic coordinate used to key dataset requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of decimal places a coordinate is rounded to when it becomes part of a cache key.
///
/// Four decimals is roughly 11 m at the equator, so requests for nearly the same
/// spot share one cache entry.
pub const CACHE_KEY_PRECISION: i32 = 4;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use will_it_rain::LatLon;
///
/// let orlando = LatLon(28.5383, -81.3792);
/// assert_eq!(orlando.0, 28.5383); // Latitude
/// assert_eq!(orlando.1, -81.3792); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    /// Builds a coordinate, rejecting non-finite values and values outside
    /// `[-90, 90]` / `[-180, 180]`.
    pub fn try_new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(LatLon(latitude, longitude))
    }

    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// Returns the coordinate rounded to [`CACHE_KEY_PRECISION`] decimals.
    ///
    /// Negative zero is folded into zero so `-0.00001` and `0.00001` land on the same key.
    pub fn rounded(&self) -> LatLon {
        LatLon(round_component(self.0), round_component(self.1))
    }

    /// Fixed-precision text form of the rounded coordinate, e.g. `("28.5383", "-81.3792")`.
    pub fn cache_key_parts(&self) -> (String, String) {
        let rounded = self.rounded();
        let precision = CACHE_KEY_PRECISION as usize;
        (
            format!("{:.*}", precision, rounded.0),
            format!("{:.*}", precision, rounded.1),
        )
    }
}

fn round_component(value: f64) -> f64 {
    let factor = 10f64.powi(CACHE_KEY_PRECISION);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
