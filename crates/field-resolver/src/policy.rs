//! Render policies handed to the external renderer.

use serde::{Deserialize, Serialize};

use crate::grid::Grid2D;

/// Physical nature of a field, which drives how it is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Shaded scalar.
    Scalar,
    /// Shaded magnitude with a vector overlay.
    VectorMagnitude,
    /// Isolines of a scalar.
    ContourScalar,
}

/// Named colormaps understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Colormap {
    #[serde(rename = "Blues")]
    Blues,
    #[serde(rename = "coolwarm")]
    CoolWarm,
    #[serde(rename = "RdYlGn_r")]
    RdYlGnReversed,
}

/// How values are turned into marks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderStyle {
    /// Continuous (or `classes`-step discrete) color shading.
    Colormap {
        name: Colormap,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        classes: Option<u32>,
    },
    /// Black isolines labelled with integer values.
    Contour { levels: u32, line_width: f32 },
}

/// Value range mapped onto the color scale or contour levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RenderRange {
    /// Declared constants, comparable across lead times and frames.
    Fixed { vmin: f32, vmax: f32 },
    /// Derive the range from the field's own finite values.
    Auto,
}

impl RenderRange {
    pub fn from_declared(range: Option<(f32, f32)>) -> Self {
        match range {
            Some((vmin, vmax)) => Self::Fixed { vmin, vmax },
            None => Self::Auto,
        }
    }

    /// Concrete `(vmin, vmax)` for `values`. `None` when the range is auto
    /// and the field holds no finite value.
    pub fn effective(&self, values: &Grid2D) -> Option<(f32, f32)> {
        match *self {
            Self::Fixed { vmin, vmax } => Some((vmin, vmax)),
            Self::Auto => values.finite_range(),
        }
    }
}

/// Everything the renderer needs to draw a resolved field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderPolicy {
    pub kind: FieldKind,
    pub style: RenderStyle,
    pub range: RenderRange,
    /// Draw every n-th vector along each axis; only set for vector fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector_stride: Option<usize>,
}

impl RenderPolicy {
    /// Declared lower bound, if fixed.
    pub fn vmin(&self) -> Option<f32> {
        match self.range {
            RenderRange::Fixed { vmin, .. } => Some(vmin),
            RenderRange::Auto => None,
        }
    }

    /// Declared upper bound, if fixed.
    pub fn vmax(&self) -> Option<f32> {
        match self.range {
            RenderRange::Fixed { vmax, .. } => Some(vmax),
            RenderRange::Auto => None,
        }
    }

    pub fn is_auto_range(&self) -> bool {
        matches!(self.range, RenderRange::Auto)
    }
}

/// Decimation stride that keeps at most `max_per_axis` arrows along the
/// longer axis of a `rows × cols` field.
pub fn vector_stride(rows: usize, cols: usize, max_per_axis: usize) -> usize {
    let longest = rows.max(cols);
    let max_per_axis = max_per_axis.max(1);
    ((longest + max_per_axis - 1) / max_per_axis).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declared_range_wins() {
        let grid = Grid2D::new(vec![100.0, 200.0], 2, 1).unwrap();
        let range = RenderRange::from_declared(Some((0.0, 50.0)));
        assert_eq!(range.effective(&grid), Some((0.0, 50.0)));
    }

    #[test]
    fn test_auto_range_uses_data() {
        let grid = Grid2D::new(vec![1008.5, f32::NAN, 1012.0], 3, 1).unwrap();
        let range = RenderRange::from_declared(None);
        assert_eq!(range, RenderRange::Auto);
        assert_eq!(range.effective(&grid), Some((1008.5, 1012.0)));
    }

    #[test]
    fn test_vector_stride() {
        assert_eq!(vector_stride(9, 13, 15), 1);
        assert_eq!(vector_stride(15, 13, 15), 1);
        assert_eq!(vector_stride(16, 13, 15), 2);
        assert_eq!(vector_stride(75, 60, 15), 5);
        assert_eq!(vector_stride(0, 0, 15), 1);
        assert_eq!(vector_stride(10, 10, 0), 10);
    }

    #[test]
    fn test_policy_json_shape() {
        let policy = RenderPolicy {
            kind: FieldKind::VectorMagnitude,
            style: RenderStyle::Colormap {
                name: Colormap::RdYlGnReversed,
                classes: Some(10),
            },
            range: RenderRange::Fixed {
                vmin: 0.0,
                vmax: 40.0,
            },
            vector_stride: Some(2),
        };
        let json = serde_json::to_value(policy).unwrap();
        assert_eq!(json["kind"], "vector_magnitude");
        assert_eq!(json["style"]["name"], "RdYlGn_r");
        assert_eq!(json["range"]["mode"], "fixed");
        assert_eq!(json["vector_stride"], 2);
        assert_eq!(policy.vmax(), Some(40.0));
    }
}
