//! Orientation-agnostic cropping of grids to a bounding box.
//!
//! A [`CropWindow`] is computed once from the dataset axes and then applied
//! to every grid of a request, so scalar and vector crops share one index
//! range. Output is always ascending in latitude and longitude.

use forecast_common::BoundingBox;

use crate::grid::Grid2D;

/// A contiguous run of axis indices, visited in ascending coordinate order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSelection {
    /// First selected source index (lowest index, not lowest coordinate).
    pub start: usize,
    /// Number of selected points.
    pub len: usize,
    /// Source axis runs from high to low coordinates.
    pub descending: bool,
}

impl AxisSelection {
    /// Source index of the `k`-th output point.
    #[inline]
    pub fn source_index(&self, k: usize) -> usize {
        if self.descending {
            self.start + self.len - 1 - k
        } else {
            self.start + k
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AxisError {
    #[error("{axis} axis is not strictly monotonic")]
    NotMonotonic { axis: &'static str },
}

/// Select the points of a strictly monotonic `axis` within `[min, max]`.
pub fn select_axis(
    axis: &[f64],
    min: f64,
    max: f64,
    name: &'static str,
) -> Result<AxisSelection, AxisError> {
    let ascending = axis.windows(2).all(|w| w[0] < w[1]);
    let descending = axis.len() > 1 && axis.windows(2).all(|w| w[0] > w[1]);
    if !ascending && !descending {
        return Err(AxisError::NotMonotonic { axis: name });
    }

    let inside = |v: f64| v >= min && v <= max;
    let start = axis.iter().position(|&v| inside(v));
    let selection = match start {
        Some(start) => {
            let len = axis[start..].iter().take_while(|&&v| inside(v)).count();
            AxisSelection {
                start,
                len,
                descending,
            }
        }
        None => AxisSelection {
            start: 0,
            len: 0,
            descending,
        },
    };
    Ok(selection)
}

/// Lat/lon selection shared by every grid of one request.
#[derive(Debug, Clone, PartialEq)]
pub struct CropWindow {
    pub lat: AxisSelection,
    /// Source column of each output column, in output order.
    pub lon_indices: Vec<usize>,
    /// Ascending latitudes of the cropped grid.
    pub latitudes: Vec<f64>,
    /// Ascending longitudes of the cropped grid, in the request's convention.
    pub longitudes: Vec<f64>,
}

impl CropWindow {
    /// Compute the window for `bbox` over the given dataset axes.
    ///
    /// Grids stored on 0..360 longitudes accept boxes given in -180..180.
    /// A box crossing Greenwich is joined from the top of the axis (shifted
    /// back by 360) and its start.
    pub fn new(lat_axis: &[f64], lon_axis: &[f64], bbox: &BoundingBox) -> Result<Self, AxisError> {
        let lat = select_axis(lat_axis, bbox.lat_min, bbox.lat_max, "latitude")?;
        let latitudes = (0..lat.len).map(|k| lat_axis[lat.source_index(k)]).collect();

        let mut lon_indices = Vec::new();
        let mut longitudes = Vec::new();
        for (min, max, offset) in lon_ranges(lon_axis, bbox) {
            let sel = select_axis(lon_axis, min, max, "longitude")?;
            for k in 0..sel.len {
                let index = sel.source_index(k);
                let lon = lon_axis[index] - offset;
                // 360 is the same meridian as 0
                if offset > 0.0 && lon >= 0.0 {
                    continue;
                }
                lon_indices.push(index);
                longitudes.push(lon);
            }
        }

        Ok(Self {
            lat,
            lon_indices,
            latitudes,
            longitudes,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty() || self.lon_indices.is_empty()
    }

    /// `(rows, cols)` of the cropped grid.
    pub fn shape(&self) -> (usize, usize) {
        (self.lat.len, self.lon_indices.len())
    }

    /// Crop a full-extent grid into ascending lat/lon order.
    pub fn apply(&self, grid: &Grid2D) -> Grid2D {
        let mut data = Vec::with_capacity(self.lat.len * self.lon_indices.len());
        for r in 0..self.lat.len {
            let offset = self.lat.source_index(r) * grid.width;
            data.extend(self.lon_indices.iter().map(|&col| grid.data[offset + col]));
        }
        Grid2D {
            width: self.lon_indices.len(),
            height: self.lat.len,
            data,
        }
    }
}

/// `(min, max, offset)` longitude ranges to select, in output order.
fn lon_ranges(lon_axis: &[f64], bbox: &BoundingBox) -> Vec<(f64, f64, f64)> {
    if !uses_0_360(lon_axis) || bbox.lon_min >= 0.0 {
        return vec![(bbox.lon_min, bbox.lon_max, 0.0)];
    }
    let shifted = bbox.shift_lon(360.0);
    if bbox.lon_max < 0.0 {
        vec![(shifted.lon_min, shifted.lon_max, 360.0)]
    } else {
        vec![(shifted.lon_min, 360.0, 360.0), (0.0, bbox.lon_max, 0.0)]
    }
}

fn uses_0_360(lon_axis: &[f64]) -> bool {
    lon_axis.iter().any(|&v| v > 180.0) && lon_axis.iter().all(|&v| v >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_ascending_inclusive() {
        let axis = [-8.0, -7.0, -6.0, -5.0, -4.0];
        let sel = select_axis(&axis, -7.0, -5.0, "latitude").unwrap();
        assert_eq!(sel, AxisSelection { start: 1, len: 3, descending: false });
        assert_eq!(sel.source_index(0), 1);
    }

    #[test]
    fn test_select_descending_reverses() {
        let axis = [-4.0, -5.0, -6.0, -7.0, -8.0];
        let sel = select_axis(&axis, -7.0, -5.0, "latitude").unwrap();
        assert_eq!(sel, AxisSelection { start: 1, len: 3, descending: true });
        assert_eq!(sel.source_index(0), 3);
        assert_eq!(sel.source_index(2), 1);
    }

    #[test]
    fn test_select_outside_is_empty() {
        let sel = select_axis(&[0.0, 1.0, 2.0], 5.0, 6.0, "latitude").unwrap();
        assert!(sel.is_empty());
    }

    #[test]
    fn test_select_rejects_unordered_axis() {
        assert_eq!(
            select_axis(&[0.0, 2.0, 1.0], 0.0, 2.0, "longitude"),
            Err(AxisError::NotMonotonic { axis: "longitude" })
        );
        assert!(select_axis(&[1.0, 1.0], 0.0, 2.0, "longitude").is_err());
    }

    #[test]
    fn test_single_point_axis() {
        let sel = select_axis(&[3.0], 0.0, 5.0, "latitude").unwrap();
        assert_eq!(sel.len, 1);
    }

    #[test]
    fn test_window_flips_descending_rows() {
        // Rows north to south, as GRIB-sourced grids arrive.
        let lat = [2.0, 1.0, 0.0];
        let lon = [10.0, 11.0];
        let grid = Grid2D::new(vec![20.0, 21.0, 10.0, 11.0, 0.0, 1.0], 2, 3).unwrap();

        let window = CropWindow::new(&lat, &lon, &BoundingBox::new(0.0, 1.0, 10.0, 11.0)).unwrap();
        assert_eq!(window.latitudes, vec![0.0, 1.0]);
        assert_eq!(window.apply(&grid).data, vec![0.0, 1.0, 10.0, 11.0]);
    }

    #[test]
    fn test_window_western_box_on_0_360_grid() {
        let lat = [30.0, 31.0];
        let lon = [0.0, 90.0, 180.0, 260.0, 270.0, 359.0];
        let bbox = BoundingBox::new(30.0, 31.0, -100.0, -90.0);

        let window = CropWindow::new(&lat, &lon, &bbox).unwrap();
        assert_eq!(window.longitudes, vec![-100.0, -90.0]);
        assert_eq!(window.lon_indices, vec![3, 4]);
    }

    #[test]
    fn test_window_joins_runs_across_greenwich() {
        let lat = [40.0, 50.0];
        let lon = [0.0, 5.0, 10.0, 180.0, 350.0, 355.0];
        let grid = Grid2D::new((0..12).map(|v| v as f32).collect(), 6, 2).unwrap();
        let bbox = BoundingBox::new(40.0, 50.0, -10.0, 10.0);

        let window = CropWindow::new(&lat, &lon, &bbox).unwrap();
        assert_eq!(window.longitudes, vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
        assert_eq!(window.lon_indices, vec![4, 5, 0, 1, 2]);
        assert_eq!(window.shape(), (2, 5));
        assert_eq!(
            window.apply(&grid).data,
            vec![4.0, 5.0, 0.0, 1.0, 2.0, 10.0, 11.0, 6.0, 7.0, 8.0]
        );
    }

    #[test]
    fn test_window_skips_duplicate_360_meridian() {
        let lat = [0.0];
        let lon = [0.0, 10.0, 350.0, 360.0];
        let window = CropWindow::new(&lat, &lon, &BoundingBox::new(-1.0, 1.0, -10.0, 10.0)).unwrap();
        assert_eq!(window.longitudes, vec![-10.0, 0.0, 10.0]);
        assert_eq!(window.lon_indices, vec![2, 0, 1]);
    }
}
