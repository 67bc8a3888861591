//! Forecast field resolution.
//!
//! ```text
//! (parameter, lead time, bbox)
//!      │
//!      ├─► ParameterSpec lookup ──────────► UnknownParameter
//!      ├─► lead time / bbox checks ───────► LeadTimeOutOfRange / InvalidBoundingBox
//!      ├─► CropWindow from dataset axes ──► EmptySelection
//!      ├─► read raw variable(s) ──────────► DatasetReadError
//!      ├─► crop (shared window), convert / derive
//!      └─► RenderPolicy + valid time ─────► ResolvedField
//! ```

use forecast_common::{run_label, BoundingBox, ForecastError, ForecastResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::convert::derive_wind;
use crate::crop::CropWindow;
use crate::dataset::GridDataset;
use crate::field::{FieldParts, ResolvedField, WindComponents};
use crate::grid::Grid2D;
use crate::parameters::{Derivation, ParameterSpec};
use crate::policy::{vector_stride, FieldKind, RenderPolicy, RenderRange};

/// Tunables for field resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverOptions {
    /// Upper bound on overlay arrows along the longer axis.
    pub max_vectors_per_axis: usize,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_vectors_per_axis: 15,
        }
    }
}

/// Turns (parameter, lead time, bounding box) requests into render-ready
/// fields. Holds no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldResolver {
    options: ResolverOptions,
}

impl FieldResolver {
    pub fn new(options: ResolverOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Resolve one field. Fails without reading the dataset when the
    /// parameter, lead time or bounding box is invalid, checked in that
    /// order.
    pub fn resolve<D>(
        &self,
        dataset: &D,
        parameter_id: &str,
        lead_time_index: i64,
        bbox: &BoundingBox,
    ) -> ForecastResult<ResolvedField>
    where
        D: GridDataset + ?Sized,
    {
        let run = run_label(dataset.run());
        let spec = ParameterSpec::lookup(parameter_id).ok_or_else(|| {
            ForecastError::UnknownParameter {
                parameter: parameter_id.to_string(),
                lead_time: lead_time_index,
                run: run.clone(),
            }
        })?;

        let times = dataset.times();
        let index = usize::try_from(lead_time_index)
            .ok()
            .filter(|&i| i < times.len())
            .ok_or_else(|| ForecastError::LeadTimeOutOfRange {
                parameter: spec.id.to_string(),
                index: lead_time_index,
                available: times.len(),
                run: run.clone(),
            })?;
        let valid_time = times[index];

        bbox.validate()
            .map_err(|source| ForecastError::InvalidBoundingBox {
                bbox: *bbox,
                parameter: spec.id.to_string(),
                lead_time: lead_time_index,
                run: run.clone(),
                source,
            })?;

        let read_error = |variable: &str, message: String| ForecastError::DatasetReadError {
            parameter: spec.id.to_string(),
            variable: variable.to_string(),
            lead_time: lead_time_index,
            run: run.clone(),
            message,
        };

        let lat_axis = dataset.latitudes();
        let lon_axis = dataset.longitudes();
        let window = CropWindow::new(lat_axis, lon_axis, bbox)
            .map_err(|e| read_error("coordinates", e.to_string()))?;
        if window.is_empty() {
            return Err(ForecastError::EmptySelection {
                parameter: spec.id.to_string(),
                bbox: *bbox,
                lead_time: lead_time_index,
                run: run.clone(),
            });
        }

        let read_cropped = |variable: &str| -> ForecastResult<Grid2D> {
            let grid = dataset
                .read_slice(variable, index)
                .map_err(|e| read_error(variable, e.to_string()))?;
            let expected = (lat_axis.len(), lon_axis.len());
            if grid.shape() != expected || grid.len() != grid.width * grid.height {
                return Err(read_error(
                    variable,
                    format!(
                        "slice shape {:?} does not match axes {:?}",
                        grid.shape(),
                        expected
                    ),
                ));
            }
            Ok(window.apply(&grid))
        };

        let (values, wind) = match spec.derivation {
            Derivation::Scalar {
                variable,
                conversion,
            } => (conversion.apply_grid(&read_cropped(variable)?), None),
            Derivation::WindSpeed { u, v } => {
                let derived = derive_wind(read_cropped(u)?, read_cropped(v)?);
                let components = WindComponents {
                    u: derived.u,
                    v: derived.v,
                };
                (derived.speed, Some(components))
            }
        };

        let render_policy = self.policy_for(spec, &window);

        debug!(
            parameter = spec.id,
            lead_time = index,
            run = %run,
            rows = window.lat.len,
            cols = window.shape().1,
            valid_time = %valid_time,
            "Resolved field"
        );

        Ok(ResolvedField::from_parts(FieldParts {
            parameter: spec.id.to_string(),
            label: spec.label.to_string(),
            units: spec.units.to_string(),
            run: dataset.run(),
            lead_time_index: index,
            valid_time,
            lat: window.latitudes,
            lon: window.longitudes,
            values,
            wind,
            render_policy,
        }))
    }

    /// Resolve one frame per lead-time index, in the given order, with the
    /// parameter and bounding box held fixed. The first failure aborts the
    /// whole sequence.
    pub fn resolve_sequence<D>(
        &self,
        dataset: &D,
        parameter_id: &str,
        lead_time_indices: &[i64],
        bbox: &BoundingBox,
    ) -> ForecastResult<Vec<ResolvedField>>
    where
        D: GridDataset + ?Sized,
    {
        let frames = lead_time_indices
            .iter()
            .map(|&lead| self.resolve(dataset, parameter_id, lead, bbox))
            .collect::<ForecastResult<Vec<_>>>()?;

        debug!(
            parameter = parameter_id,
            frames = frames.len(),
            "Resolved frame sequence"
        );
        Ok(frames)
    }

    fn policy_for(&self, spec: &ParameterSpec, window: &CropWindow) -> RenderPolicy {
        let stride = match spec.kind {
            FieldKind::VectorMagnitude => {
                let (rows, cols) = window.shape();
                Some(vector_stride(rows, cols, self.options.max_vectors_per_axis))
            }
            FieldKind::Scalar | FieldKind::ContourScalar => None,
        };
        RenderPolicy {
            kind: spec.kind,
            style: spec.style,
            range: RenderRange::from_declared(spec.default_range),
            vector_stride: stride,
        }
    }
}

/// Resolve with default options.
pub fn resolve<D>(
    dataset: &D,
    parameter_id: &str,
    lead_time_index: i64,
    bbox: &BoundingBox,
) -> ForecastResult<ResolvedField>
where
    D: GridDataset + ?Sized,
{
    FieldResolver::default().resolve(dataset, parameter_id, lead_time_index, bbox)
}

/// Resolve a frame sequence with default options.
pub fn resolve_sequence<D>(
    dataset: &D,
    parameter_id: &str,
    lead_time_indices: &[i64],
    bbox: &BoundingBox,
) -> ForecastResult<Vec<ResolvedField>>
where
    D: GridDataset + ?Sized,
{
    FieldResolver::default().resolve_sequence(dataset, parameter_id, lead_time_indices, bbox)
}
