//! Geographic bounding boxes used to crop forecast grids.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A latitude/longitude region of interest, in degrees.
///
/// Construction does not validate; call [`BoundingBox::validate`] (the
/// resolver does) before relying on `lat_min < lat_max` and
/// `lon_min < lon_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    /// Create a new bounding box from its latitude and longitude extents.
    pub fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Create a bounding box and check its invariants.
    pub fn try_new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Result<Self, BboxError> {
        let bbox = Self::new(lat_min, lat_max, lon_min, lon_max);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Parse `"lat_min,lat_max,lon_min,lon_max"`.
    pub fn from_extent_string(s: &str) -> Result<Self, BboxError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxError::InvalidFormat(s.to_string()));
        }

        let parse = |part: &str| -> Result<f64, BboxError> {
            part.parse()
                .map_err(|_| BboxError::InvalidNumber(part.to_string()))
        };

        Self::try_new(
            parse(parts[0])?,
            parse(parts[1])?,
            parse(parts[2])?,
            parse(parts[3])?,
        )
    }

    /// Check that every extent is finite and both ranges are non-empty.
    pub fn validate(&self) -> Result<(), BboxError> {
        let extents = [self.lat_min, self.lat_max, self.lon_min, self.lon_max];
        if extents.iter().any(|v| !v.is_finite()) {
            return Err(BboxError::NonFinite(*self));
        }
        if self.lat_min >= self.lat_max {
            return Err(BboxError::EmptyLatitudeRange {
                min: self.lat_min,
                max: self.lat_max,
            });
        }
        if self.lon_min >= self.lon_max {
            return Err(BboxError::EmptyLongitudeRange {
                min: self.lon_min,
                max: self.lon_max,
            });
        }
        Ok(())
    }

    /// Longitude span in degrees.
    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Latitude span in degrees.
    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }

    /// Check if a point lies inside the box, edges included.
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }

    /// The same box with both longitudes moved by `offset` degrees.
    pub fn shift_lon(&self, offset: f64) -> Self {
        Self {
            lon_min: self.lon_min + offset,
            lon_max: self.lon_max + offset,
            ..*self
        }
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat[{}, {}] lon[{}, {}]",
            self.lat_min, self.lat_max, self.lon_min, self.lon_max
        )
    }
}

impl FromStr for BoundingBox {
    type Err = BboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extent_string(s)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BboxError {
    #[error("Invalid bounding box format: {0}. Expected 'lat_min,lat_max,lon_min,lon_max'")]
    InvalidFormat(String),

    #[error("Invalid number in bounding box: {0}")]
    InvalidNumber(String),

    #[error("Bounding box has non-finite extents: {0}")]
    NonFinite(BoundingBox),

    #[error("lat_min ({min}) must be less than lat_max ({max})")]
    EmptyLatitudeRange { min: f64, max: f64 },

    #[error("lon_min ({min}) must be less than lon_max ({max})")]
    EmptyLongitudeRange { min: f64, max: f64 },
}

/// Named regions the forecast maps are usually drawn for.
pub mod regions {
    use super::BoundingBox;

    /// Soekarno-Hatta airport area (Cengkareng).
    pub const SOEKARNO_HATTA: BoundingBox = BoundingBox {
        lat_min: -7.0,
        lat_max: -5.0,
        lon_min: 105.0,
        lon_max: 108.0,
    };

    /// South Kalimantan, used for the animated loops.
    pub const SOUTH_KALIMANTAN: BoundingBox = BoundingBox {
        lat_min: -4.5,
        lat_max: -1.0,
        lon_min: 114.0,
        lon_max: 117.0,
    };

    /// Look up a preset by its short name.
    pub fn by_name(name: &str) -> Option<BoundingBox> {
        match name.to_ascii_lowercase().as_str() {
            "soetta" | "soekarno-hatta" => Some(SOEKARNO_HATTA),
            "kalsel" | "south-kalimantan" => Some(SOUTH_KALIMANTAN),
            _ => None,
        }
    }
}
