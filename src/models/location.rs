//! Location model for the static location table

use serde::{Deserialize, Serialize};

/// Decimal places used when comparing locations by coordinates
pub const COORDINATE_PRECISION: u32 = 5;

/// One row of the location table
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Zero-based row index in the loaded table
    pub index: usize,
    /// Street address or place name
    pub address: String,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// Rounded coordinate pair used for equality between locations.
///
/// Stored as scaled integers so it can be compared and hashed exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordinateKey {
    lat: i64,
    lon: i64,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(index: usize, address: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            index,
            address: address.into(),
            latitude,
            longitude,
        }
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.5}, {:.5}", self.latitude, self.longitude)
    }

    /// Key identifying this location by its rounded coordinate pair
    #[must_use]
    pub fn coordinate_key(&self) -> CoordinateKey {
        let multiplier = 10_f64.powi(i32::try_from(COORDINATE_PRECISION).unwrap_or(5));
        CoordinateKey {
            lat: (self.latitude * multiplier).round() as i64,
            lon: (self.longitude * multiplier).round() as i64,
        }
    }

    /// Great-circle distance to a point, in kilometers
    #[must_use]
    pub fn distance_km(&self, latitude: f64, longitude: f64) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.latitude,
                longitude: self.longitude,
            },
            haversine::Location {
                latitude,
                longitude,
            },
            haversine::Units::Kilometers,
        )
    }
}
