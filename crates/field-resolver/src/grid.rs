//! Two-dimensional grids of forecast values.

use serde::{Deserialize, Serialize};

/// A lat × lon grid of values in row-major order.
///
/// Rows follow the latitude axis, columns the longitude axis, in whatever
/// order the owning coordinate vectors have.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid2D {
    /// Number of longitude points per row.
    pub width: usize,
    /// Number of latitude rows.
    pub height: usize,
    /// Values; NaN marks missing data and is written as `null` in JSON.
    #[serde(with = "nullable_floats")]
    pub data: Vec<f32>,
}

impl Grid2D {
    /// Create a new grid. Returns `None` if `data` does not hold
    /// `width * height` values.
    pub fn new(data: Vec<f32>, width: usize, height: usize) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// `(rows, cols)`, i.e. `(lat, lon)` lengths.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    /// Get the value at a specific row/column.
    pub fn get(&self, row: usize, col: usize) -> Option<f32> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }

    /// One latitude row.
    pub fn row(&self, row: usize) -> Option<&[f32]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        Some(&self.data[start..start + self.width])
    }

    /// A grid of the same shape with every value passed through `f`.
    pub fn map(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Get the total number of grid points.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Minimum and maximum over finite values, if any.
    pub fn finite_range(&self) -> Option<(f32, f32)> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// JSON has no NaN; missing values travel as `null`.
pub(crate) mod nullable_floats {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(values: &[f32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            values
                .iter()
                .map(|v| if v.is_finite() { Some(*v) } else { None }),
        )
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<f32>, D::Error> {
        let values: Vec<Option<f32>> = Vec::deserialize(deserializer)?;
        Ok(values.into_iter().map(|v| v.unwrap_or(f32::NAN)).collect())
    }
}
