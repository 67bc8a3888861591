//! Render-ready fields.

use chrono::{DateTime, Utc};
use forecast_common::{format_valid_time, lead_tag, ForecastRun};
use serde::{Deserialize, Serialize};

use crate::grid::Grid2D;
use crate::policy::RenderPolicy;

/// Raw wind components in m/s, cropped exactly like the speed field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindComponents {
    pub u: Grid2D,
    pub v: Grid2D,
}

/// A cropped, unit-converted field plus how to draw it.
///
/// Latitudes and longitudes are strictly ascending; `values` rows follow
/// `lat`, columns follow `lon`. Fields are built once per request and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedField {
    parameter: String,
    label: String,
    units: String,
    run: Option<ForecastRun>,
    lead_time_index: usize,
    lead_hours: Option<i64>,
    valid_time: DateTime<Utc>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    values: Grid2D,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wind: Option<WindComponents>,
    render_policy: RenderPolicy,
}

/// Builder-side view of a field, filled in by the resolver.
#[derive(Debug, Clone)]
pub(crate) struct FieldParts {
    pub parameter: String,
    pub label: String,
    pub units: String,
    pub run: Option<ForecastRun>,
    pub lead_time_index: usize,
    pub valid_time: DateTime<Utc>,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub values: Grid2D,
    pub wind: Option<WindComponents>,
    pub render_policy: RenderPolicy,
}

impl ResolvedField {
    pub(crate) fn from_parts(parts: FieldParts) -> Self {
        let lead_hours = parts
            .run
            .map(|run| (parts.valid_time - run.init_time()).num_hours());
        Self {
            parameter: parts.parameter,
            label: parts.label,
            units: parts.units,
            run: parts.run,
            lead_time_index: parts.lead_time_index,
            lead_hours,
            valid_time: parts.valid_time,
            lat: parts.lat,
            lon: parts.lon,
            values: parts.values,
            wind: parts.wind,
            render_policy: parts.render_policy,
        }
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn run(&self) -> Option<ForecastRun> {
        self.run
    }

    pub fn lead_time_index(&self) -> usize {
        self.lead_time_index
    }

    /// Hours between run initialization and valid time, when the run is known.
    pub fn lead_hours(&self) -> Option<i64> {
        self.lead_hours
    }

    pub fn valid_time(&self) -> DateTime<Utc> {
        self.valid_time
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn values(&self) -> &Grid2D {
        &self.values
    }

    pub fn wind(&self) -> Option<&WindComponents> {
        self.wind.as_ref()
    }

    pub fn render_policy(&self) -> &RenderPolicy {
        &self.render_policy
    }

    /// `(lat, lon)` lengths.
    pub fn shape(&self) -> (usize, usize) {
        self.values.shape()
    }

    /// Left-hand map title: `"{label} Valid 12UTC Wed 15 Jan 2025"`.
    pub fn title(&self) -> String {
        format!("{} Valid {}", self.label, format_valid_time(&self.valid_time))
    }

    /// Right-hand map title: `"GFS t+003"`. Hourly datasets fall back to
    /// the index when the run is unknown.
    pub fn lead_tag(&self) -> String {
        let hours = self.lead_hours.unwrap_or(self.lead_time_index as i64);
        format!("GFS {}", lead_tag(hours))
    }
}
