//! Request-level entry point: opens the run, then resolves.

use std::sync::Arc;

use chrono::{Duration, Utc};
use forecast_common::{BoundingBox, ForecastError, ForecastResult, ForecastRun};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::config::ResolverConfig;
use crate::dataset::DatasetSource;
use crate::error::DatasetError;
use crate::field::ResolvedField;
use crate::parameters::ParameterSpec;
use crate::resolver::FieldResolver;

/// A single field request against a model run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRequest {
    pub run: ForecastRun,
    pub parameter: String,
    pub lead_time_index: i64,
    pub bbox: BoundingBox,
}

impl FieldRequest {
    pub fn new(
        run: ForecastRun,
        parameter: impl Into<String>,
        lead_time_index: i64,
        bbox: BoundingBox,
    ) -> Self {
        Self {
            run,
            parameter: parameter.into(),
            lead_time_index,
            bbox,
        }
    }
}

/// Resolves requests against runs supplied by a [`DatasetSource`].
///
/// Wrap the source in [`crate::LruRunCache`] to reuse opened runs across
/// requests.
pub struct ForecastService<S: DatasetSource> {
    source: S,
    resolver: FieldResolver,
    publish_delay: Duration,
}

impl<S: DatasetSource> ForecastService<S> {
    pub fn new(source: S, resolver: FieldResolver, publish_delay: Duration) -> Self {
        Self {
            source,
            resolver,
            publish_delay,
        }
    }

    pub fn from_config(source: S, config: &ResolverConfig) -> Self {
        Self::new(
            source,
            FieldResolver::new(config.resolver_options()),
            config.publish_delay(),
        )
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn resolver(&self) -> &FieldResolver {
        &self.resolver
    }

    /// Resolve one request. Unknown parameters are rejected before the run
    /// is opened.
    #[instrument(skip_all, fields(run = %request.run, parameter = %request.parameter))]
    pub fn resolve(&self, request: &FieldRequest) -> ForecastResult<ResolvedField> {
        let context = RequestContext {
            run: &request.run,
            parameter: &request.parameter,
            lead_time: request.lead_time_index,
        };
        context.ensure_known()?;
        let dataset = self.open(&context)?;
        self.resolver.resolve(
            dataset.as_ref(),
            &request.parameter,
            request.lead_time_index,
            &request.bbox,
        )
    }

    /// Resolve an animation: one frame per lead-time index, in order.
    /// Errors raised before the first frame name its lead time.
    #[instrument(skip_all, fields(run = %run, parameter = parameter, frames = lead_time_indices.len()))]
    pub fn resolve_animation(
        &self,
        run: &ForecastRun,
        parameter: &str,
        lead_time_indices: &[i64],
        bbox: &BoundingBox,
    ) -> ForecastResult<Vec<ResolvedField>> {
        let context = RequestContext {
            run,
            parameter,
            lead_time: lead_time_indices.first().copied().unwrap_or(0),
        };
        context.ensure_known()?;
        let dataset = self.open(&context)?;
        self.resolver
            .resolve_sequence(dataset.as_ref(), parameter, lead_time_indices, bbox)
    }

    fn open(&self, context: &RequestContext<'_>) -> ForecastResult<Arc<S::Dataset>> {
        let run = context.run;
        self.source.open_run(run).map_err(|err| match err {
            DatasetError::Unavailable(message) => {
                if run.may_be_unpublished(Utc::now(), self.publish_delay) {
                    info!(run = %run, error = %message, "Run not available yet");
                } else {
                    warn!(run = %run, error = %message, "Run unavailable");
                }
                ForecastError::DatasetUnavailable {
                    parameter: context.parameter.to_string(),
                    lead_time: context.lead_time,
                    run: run.to_string(),
                    message,
                }
            }
            other => {
                warn!(run = %run, error = %other, "Failed to open run");
                ForecastError::DatasetReadError {
                    parameter: context.parameter.to_string(),
                    variable: "dataset".to_string(),
                    lead_time: context.lead_time,
                    run: run.to_string(),
                    message: other.to_string(),
                }
            }
        })
    }
}

/// What a request is about, for error context before resolution starts.
struct RequestContext<'a> {
    run: &'a ForecastRun,
    parameter: &'a str,
    lead_time: i64,
}

impl RequestContext<'_> {
    fn ensure_known(&self) -> ForecastResult<()> {
        ParameterSpec::lookup(self.parameter)
            .map(|_| ())
            .ok_or_else(|| ForecastError::UnknownParameter {
                parameter: self.parameter.to_string(),
                lead_time: self.lead_time,
                run: self.run.to_string(),
            })
    }
}
