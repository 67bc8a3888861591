//! The parameter table: one entry per selectable forecast parameter.
//!
//! Raw variable names follow the GFS 0.25° hourly OPeNDAP product.

use crate::convert::UnitConversion;
use crate::policy::{Colormap, FieldKind, RenderStyle};

/// How the physical field is derived from raw dataset variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// One raw variable passed through a unit conversion.
    Scalar {
        variable: &'static str,
        conversion: UnitConversion,
    },
    /// Speed in knots from two m/s components, keeping the components.
    WindSpeed {
        u: &'static str,
        v: &'static str,
    },
}

impl Derivation {
    /// Raw variables that must be read, in read order.
    pub fn raw_variables(&self) -> Vec<&'static str> {
        match *self {
            Derivation::Scalar { variable, .. } => vec![variable],
            Derivation::WindSpeed { u, v } => vec![u, v],
        }
    }
}

/// Static description of one selectable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    /// Identifier used in requests.
    pub id: &'static str,
    /// Human-readable label, units included.
    pub label: &'static str,
    /// Display units after conversion.
    pub units: &'static str,
    pub derivation: Derivation,
    pub kind: FieldKind,
    /// Declared `(vmin, vmax)`, or `None` to auto-range from data.
    pub default_range: Option<(f32, f32)>,
    pub style: RenderStyle,
}

/// Every supported parameter.
pub static PARAMETERS: [ParameterSpec; 4] = [
    ParameterSpec {
        id: "pratesfc",
        label: "Precipitation rate (mm/h)",
        units: "mm/h",
        derivation: Derivation::Scalar {
            variable: "pratesfc",
            conversion: UnitConversion::FluxToMmPerHour,
        },
        kind: FieldKind::Scalar,
        default_range: Some((0.0, 50.0)),
        style: RenderStyle::Colormap {
            name: Colormap::Blues,
            classes: None,
        },
    },
    ParameterSpec {
        id: "tmp2m",
        label: "2 m temperature (°C)",
        units: "°C",
        derivation: Derivation::Scalar {
            variable: "tmp2m",
            conversion: UnitConversion::KelvinToCelsius,
        },
        kind: FieldKind::Scalar,
        default_range: Some((-5.0, 35.0)),
        style: RenderStyle::Colormap {
            name: Colormap::CoolWarm,
            classes: None,
        },
    },
    ParameterSpec {
        id: "wind10m",
        label: "10 m wind speed (kt)",
        units: "kt",
        derivation: Derivation::WindSpeed {
            u: "ugrd10m",
            v: "vgrd10m",
        },
        kind: FieldKind::VectorMagnitude,
        default_range: Some((0.0, 40.0)),
        style: RenderStyle::Colormap {
            name: Colormap::RdYlGnReversed,
            classes: Some(10),
        },
    },
    ParameterSpec {
        id: "prmslmsl",
        label: "Mean sea-level pressure (hPa)",
        units: "hPa",
        derivation: Derivation::Scalar {
            variable: "prmslmsl",
            conversion: UnitConversion::PascalToHectopascal,
        },
        kind: FieldKind::ContourScalar,
        default_range: None,
        style: RenderStyle::Contour {
            levels: 15,
            line_width: 0.8,
        },
    },
];

impl ParameterSpec {
    /// Look up a parameter by exact identifier.
    pub fn lookup(id: &str) -> Option<&'static ParameterSpec> {
        PARAMETERS.iter().find(|p| p.id == id)
    }

    /// All supported identifiers, in table order.
    pub fn ids() -> impl Iterator<Item = &'static str> {
        PARAMETERS.iter().map(|p| p.id)
    }
}
