//! Location Table Module
//!
//! Loads the static delimited location file (`address;latitude;longitude`)
//! once at startup and answers lookups by row index or by map click.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::models::Location;
use crate::{Result, TravelChatError};

const ADDRESS_COLUMN: &str = "address";
const LATITUDE_COLUMN: &str = "latitude";
const LONGITUDE_COLUMN: &str = "longitude";

/// Immutable, indexed list of the loaded locations
#[derive(Debug, Clone, Default)]
pub struct LocationTable {
    locations: Vec<Location>,
}

/// Column positions resolved from the header row
struct Columns {
    address: usize,
    latitude: usize,
    longitude: usize,
    width: usize,
}

impl LocationTable {
    /// Build a table from already-parsed locations, re-indexing them by position
    #[must_use]
    pub fn from_locations(locations: Vec<Location>) -> Self {
        let locations = locations
            .into_iter()
            .enumerate()
            .map(|(index, location)| Location { index, ..location })
            .collect();
        Self { locations }
    }

    /// Load the table from a delimited text file
    #[tracing::instrument(level = "debug")]
    pub fn load(path: &Path, delimiter: char) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            TravelChatError::data(format!(
                "Failed to read locations file {}: {e}",
                path.display()
            ))
        })?;
        let table = Self::parse(&text, delimiter)?;
        info!(
            "Loaded {} locations from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse delimited text with a header row.
    ///
    /// Rows with the wrong number of fields or unparsable coordinates are
    /// skipped with a warning.
    pub fn parse(text: &str, delimiter: char) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let (_, header) = lines
            .next()
            .ok_or_else(|| TravelChatError::data("Locations file is empty"))?;
        let columns = Columns::from_header(header, delimiter)?;

        let mut locations = Vec::new();
        for (line_no, line) in lines {
            match columns.parse_row(line, delimiter) {
                Some((address, latitude, longitude)) => {
                    locations.push(Location::new(locations.len(), address, latitude, longitude));
                }
                None => {
                    warn!("Skipping malformed location row {}: {:?}", line_no + 1, line);
                }
            }
        }

        debug!("Parsed {} location rows", locations.len());
        Ok(Self { locations })
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Location> {
        self.locations.get(index)
    }

    #[must_use]
    pub fn all(&self) -> &[Location] {
        &self.locations
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Resolve a map click to the closest location within `max_km`
    #[must_use]
    pub fn nearest(&self, latitude: f64, longitude: f64, max_km: f64) -> Option<&Location> {
        self.locations
            .iter()
            .map(|location| (location, location.distance_km(latitude, longitude)))
            .filter(|(_, distance)| *distance <= max_km)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(location, _)| location)
    }
}

impl Columns {
    fn from_header(header: &str, delimiter: char) -> Result<Self> {
        let names: Vec<String> = header
            .split(delimiter)
            .map(|name| name.trim().trim_start_matches('\u{feff}').to_lowercase())
            .collect();

        let position = |wanted: &str| {
            names.iter().position(|name| name == wanted).ok_or_else(|| {
                TravelChatError::data(format!(
                    "Locations file header is missing the '{wanted}' column (found: {})",
                    names.join(", ")
                ))
            })
        };

        Ok(Self {
            address: position(ADDRESS_COLUMN)?,
            latitude: position(LATITUDE_COLUMN)?,
            longitude: position(LONGITUDE_COLUMN)?,
            width: names.len(),
        })
    }

    fn parse_row(&self, line: &str, delimiter: char) -> Option<(String, f64, f64)> {
        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();
        if fields.len() != self.width {
            return None;
        }

        let address = fields[self.address].trim_matches('"');
        let latitude = parse_coordinate(fields[self.latitude])?;
        let longitude = parse_coordinate(fields[self.longitude])?;

        if address.is_empty()
            || !(-90.0..=90.0).contains(&latitude)
            || !(-180.0..=180.0).contains(&longitude)
        {
            return None;
        }

        Some((address.to_string(), latitude, longitude))
    }
}

/// Accepts both `50.06` and the decimal-comma form `50,06`
fn parse_coordinate(raw: &str) -> Option<f64> {
    let raw = raw.trim_matches('"');
    raw.parse::<f64>()
        .ok()
        .or_else(|| raw.replace(',', ".").parse::<f64>().ok())
        .filter(|value| value.is_finite())
}
