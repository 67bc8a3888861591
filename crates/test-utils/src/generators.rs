//! Test data generators for synthetic GFS-like runs.
//!
//! Grids are row-major `Vec<f32>` with rows following the latitude axis,
//! in the raw units the model publishes (K, Pa, m/s, kg m-2 s-1).

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Regular axis from `start` to `end` inclusive with `step` spacing.
///
/// Pass a negative `step` for a descending axis (GFS latitudes run north to
/// south in some products).
///
/// ```
/// use test_utils::regular_axis;
///
/// assert_eq!(regular_axis(-7.0, -5.0, 1.0), vec![-7.0, -6.0, -5.0]);
/// assert_eq!(regular_axis(-5.0, -7.0, -1.0), vec![-5.0, -6.0, -7.0]);
/// ```
pub fn regular_axis(start: f64, end: f64, step: f64) -> Vec<f64> {
    if step == 0.0 || (end - start) * step < 0.0 {
        return vec![start];
    }
    let n = ((end - start) / step).round() as usize + 1;
    (0..n).map(|i| start + i as f64 * step).collect()
}

/// 0.25° latitude axis covering `[lat_min, lat_max]`.
pub fn lat_axis(lat_min: f64, lat_max: f64, descending: bool) -> Vec<f64> {
    if descending {
        regular_axis(lat_max, lat_min, -0.25)
    } else {
        regular_axis(lat_min, lat_max, 0.25)
    }
}

/// 0.25° longitude axis covering `[lon_min, lon_max]`.
pub fn lon_axis(lon_min: f64, lon_max: f64) -> Vec<f64> {
    regular_axis(lon_min, lon_max, 0.25)
}

/// `steps` hourly valid times starting at `init`.
pub fn hourly_times(init: DateTime<Utc>, steps: usize) -> Vec<DateTime<Utc>> {
    (0..steps).map(|h| init + Duration::hours(h as i64)).collect()
}

/// Initialization time of a run, e.g. `run_init(2025, 1, 15, 0)`.
pub fn run_init(year: i32, month: u32, day: u32, cycle_hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, cycle_hour, 0, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid run init {year}-{month}-{day} {cycle_hour}z"))
}

/// Creates a grid where each cell encodes its position: `row * 1000 + col`.
///
/// ```
/// use test_utils::create_index_grid;
///
/// let grid = create_index_grid(3, 2);
/// assert_eq!(grid, vec![0.0, 1.0, 2.0, 1000.0, 1001.0, 1002.0]);
/// ```
pub fn create_index_grid(width: usize, height: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            data.push((row * 1000 + col) as f32);
        }
    }
    data
}

/// 2 m temperature in Kelvin, warming eastward and with each time step.
///
/// Values stay within roughly 295K to 305K (22°C to 32°C), typical of Java.
pub fn create_temperature_grid(width: usize, height: usize, step: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let x = col as f32 / width.max(1) as f32;
            let y = row as f32 / height.max(1) as f32;
            data.push(295.0 + x * 6.0 + y * 2.0 + (step % 24) as f32 * 0.1);
        }
    }
    data
}

/// Eastward wind component in m/s: uniform `speed`.
pub fn create_u_wind_grid(width: usize, height: usize, speed: f32) -> Vec<f32> {
    vec![speed; width * height]
}

/// Northward wind component in m/s, varying linearly across rows from
/// `-amplitude` to `amplitude`.
pub fn create_v_wind_grid(width: usize, height: usize, amplitude: f32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        let t = if height > 1 {
            row as f32 / (height - 1) as f32
        } else {
            0.5
        };
        let v = -amplitude + 2.0 * amplitude * t;
        data.extend(std::iter::repeat(v).take(width));
    }
    data
}

/// Mean sea-level pressure in Pascals, with a low centred in the grid.
pub fn create_pressure_grid(width: usize, height: usize) -> Vec<f32> {
    let cx = width as f32 / 2.0;
    let cy = height as f32 / 2.0;
    let max_dist = (cx * cx + cy * cy).sqrt().max(1.0);

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let dx = col as f32 - cx;
            let dy = row as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt() / max_dist;
            data.push(100_600.0 + dist * 800.0);
        }
    }
    data
}

/// Precipitation rate flux in kg m-2 s-1.
///
/// Mostly dry with scattered cells; `seed` shifts the pattern so successive
/// time steps differ.
pub fn create_precipitation_grid(width: usize, height: usize, seed: u32) -> Vec<f32> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let hash = ((row as u32).wrapping_mul(31))
                .wrapping_add((col as u32).wrapping_mul(17))
                .wrapping_add(seed.wrapping_mul(7));
            let value = if hash % 5 == 0 {
                // 0 to ~0.005 kg m-2 s-1, i.e. up to ~18 mm/h
                (hash % 50) as f32 * 1.0e-4
            } else {
                0.0
            };
            data.push(value);
        }
    }
    data
}

/// Creates a grid filled with one value.
pub fn create_constant_grid(width: usize, height: usize, value: f32) -> Vec<f32> {
    vec![value; width * height]
}

/// Replaces every `nan_interval`-th value with NaN (the model's fill value
/// after decoding).
pub fn with_nans(mut data: Vec<f32>, nan_interval: usize) -> Vec<f32> {
    if nan_interval == 0 {
        return data;
    }
    for value in data.iter_mut().step_by(nan_interval) {
        *value = f32::NAN;
    }
    data
}
