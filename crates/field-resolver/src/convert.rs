//! Unit conversion and derived-field calculation.
//!
//! Every function here is total: out-of-range, negative and NaN inputs are
//! carried through untouched so artifacts in the model output stay visible.

use serde::{Deserialize, Serialize};

use crate::grid::Grid2D;

/// Seconds per hour; precipitation flux kg m⁻² s⁻¹ equals mm s⁻¹.
pub const SECONDS_PER_HOUR: f32 = 3600.0;

/// 0 °C in Kelvin.
pub const KELVIN_OFFSET: f32 = 273.15;

/// Pascals per hectopascal.
pub const PASCALS_PER_HPA: f32 = 100.0;

/// Knots per metre per second.
pub const KNOTS_PER_MPS: f32 = 1.94384;

/// Scalar unit conversions supported by the parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitConversion {
    /// kg m⁻² s⁻¹ to mm/h: × 3600
    FluxToMmPerHour,
    /// Kelvin to Celsius: C = K - 273.15
    KelvinToCelsius,
    /// Pascal to hectoPascal: hPa = Pa / 100
    PascalToHectopascal,
}

impl UnitConversion {
    /// Apply the unit conversion to a value.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        match self {
            Self::FluxToMmPerHour => value * SECONDS_PER_HOUR,
            Self::KelvinToCelsius => value - KELVIN_OFFSET,
            Self::PascalToHectopascal => value / PASCALS_PER_HPA,
        }
    }

    /// Apply the conversion to every grid point.
    pub fn apply_grid(&self, grid: &Grid2D) -> Grid2D {
        grid.map(|v| self.apply(v))
    }
}

/// Wind speed plus the components it was derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct WindDerivation {
    /// Speed in knots.
    pub speed: Grid2D,
    /// Eastward component, m/s, unchanged.
    pub u: Grid2D,
    /// Northward component, m/s, unchanged.
    pub v: Grid2D,
}

/// Wind speed in knots for one point: `sqrt(u² + v²) × 1.94384`.
#[inline]
pub fn wind_speed_knots(u: f32, v: f32) -> f32 {
    (u * u + v * v).sqrt() * KNOTS_PER_MPS
}

/// Derive knot-scaled speed from m/s components.
///
/// The returned `u`/`v` stay in m/s: overlay arrows are drawn from the raw
/// components, shading from the speed.
pub fn derive_wind(u: Grid2D, v: Grid2D) -> WindDerivation {
    debug_assert_eq!(u.shape(), v.shape());
    let data = u
        .data
        .iter()
        .zip(&v.data)
        .map(|(&u, &v)| wind_speed_knots(u, v))
        .collect();
    let speed = Grid2D {
        width: u.width,
        height: u.height,
        data,
    };
    WindDerivation { speed, u, v }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(values: &[f32]) -> Grid2D {
        Grid2D::new(values.to_vec(), values.len(), 1).unwrap()
    }

    #[test]
    fn test_known_fixtures() {
        let eps = 1e-4;
        assert_eq!(UnitConversion::KelvinToCelsius.apply(273.15), 0.0);
        assert_eq!(UnitConversion::PascalToHectopascal.apply(101325.0), 1013.25);
        assert!((UnitConversion::FluxToMmPerHour.apply(0.001) - 3.6).abs() < eps);
        assert!((wind_speed_knots(3.0, 4.0) - 9.7192).abs() < eps);
    }

    #[test]
    fn test_precipitation_is_not_clamped() {
        let out = UnitConversion::FluxToMmPerHour.apply_grid(&grid(&[-0.0001, f32::NAN, 0.0]));
        assert!(out.data[0] < 0.0);
        assert!(out.data[1].is_nan());
        assert_eq!(out.data[2], 0.0);
    }

    #[test]
    fn test_extremes_are_valid() {
        assert!((UnitConversion::KelvinToCelsius.apply(183.95) - -89.2).abs() < 1e-3);
        assert!(UnitConversion::PascalToHectopascal.apply(87000.0) > 0.0);
        assert_eq!(UnitConversion::KelvinToCelsius.apply(f32::INFINITY), f32::INFINITY);
    }

    #[test]
    fn test_wind_keeps_raw_components() {
        let u = grid(&[3.0, -6.0, f32::NAN]);
        let v = grid(&[4.0, 8.0, 1.0]);
        let wind = derive_wind(u.clone(), v.clone());

        let bits = |g: &Grid2D| g.data.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&wind.u), bits(&u));
        assert_eq!(bits(&wind.v), bits(&v));
        assert!((wind.speed.data[0] - 9.7192).abs() < 1e-4);
        assert!((wind.speed.data[1] - 19.4384).abs() < 1e-3);
        assert!(wind.speed.data[2].is_nan());
    }
}
