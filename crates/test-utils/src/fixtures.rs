//! Common test fixtures for forecast tests.
//!
//! Bounding boxes are `(lat_min, lat_max, lon_min, lon_max)` tuples, the
//! same order as the `--bbox` extent string.

/// Common bounding box definitions for testing.
pub mod bbox {
    /// Soekarno-Hatta airport area, western Java.
    pub const SOEKARNO_HATTA: (f64, f64, f64, f64) = (-7.0, -5.0, 105.0, 108.0);

    /// West of Greenwich; needs shifting on a 0..360 grid.
    pub const GULF_OF_MEXICO: (f64, f64, f64, f64) = (18.0, 31.0, -98.0, -81.0);

    /// Does not touch any Indonesian test grid.
    pub const NORTH_ATLANTIC: (f64, f64, f64, f64) = (40.0, 50.0, -40.0, -30.0);

    /// Invalid bbox (min > max)
    pub const INVALID: (f64, f64, f64, f64) = (-5.0, -7.0, 108.0, 105.0);
}

/// Common grid specifications for testing.
pub mod grid {
    /// GFS global grid (0.25 degree resolution)
    pub const GFS_GLOBAL: GridSpec = GridSpec {
        width: 1440,
        height: 721,
        min_lon: 0.0,
        max_lon: 359.75,
        min_lat: -90.0,
        max_lat: 90.0,
    };

    /// 0.25° window around western Java.
    pub const JAVA_WEST: GridSpec = GridSpec {
        width: 21,
        height: 17,
        min_lon: 104.0,
        max_lon: 109.0,
        min_lat: -8.0,
        max_lat: -4.0,
    };

    /// Grid specification for testing.
    #[derive(Debug, Clone, Copy)]
    pub struct GridSpec {
        pub width: usize,
        pub height: usize,
        pub min_lon: f64,
        pub max_lon: f64,
        pub min_lat: f64,
        pub max_lat: f64,
    }

    impl GridSpec {
        /// Total number of grid points.
        pub fn size(&self) -> usize {
            self.width * self.height
        }

        /// Grid resolution in degrees `(lat, lon)`.
        pub fn resolution(&self) -> (f64, f64) {
            let lat_res = (self.max_lat - self.min_lat) / (self.height.max(2) - 1) as f64;
            let lon_res = (self.max_lon - self.min_lon) / (self.width.max(2) - 1) as f64;
            (lat_res, lon_res)
        }

        /// Extent as `(lat_min, lat_max, lon_min, lon_max)`.
        pub fn bbox(&self) -> (f64, f64, f64, f64) {
            (self.min_lat, self.max_lat, self.min_lon, self.max_lon)
        }
    }
}

/// Parameter ids the resolver understands.
pub mod parameters {
    pub const PRECIPITATION: &str = "pratesfc";
    pub const TEMPERATURE: &str = "tmp2m";
    pub const WIND: &str = "wind10m";
    pub const PRESSURE: &str = "prmslmsl";

    pub const ALL: [&str; 4] = [PRECIPITATION, TEMPERATURE, WIND, PRESSURE];
}
