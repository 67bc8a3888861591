//! GFS forecast field resolution.
//!
//! Turns a (parameter, lead time, bounding box) request against one model
//! run into a cropped, unit-converted field with a render policy attached.
//! Plotting and transport live elsewhere; this crate only sees datasets
//! through the [`GridDataset`] / [`DatasetSource`] seam.
//!
//! # Architecture
//!
//! ```text
//! FieldRequest
//!      │
//!      ▼
//! ForecastService::resolve
//!      │
//!      ├─► DatasetSource::open_run (LruRunCache ─► SnapshotSource / adapter)
//!      │
//!      └─► FieldResolver::resolve
//!               │
//!               ├─► ParameterSpec (PARAMETERS table)
//!               ├─► CropWindow (shared by values and wind components)
//!               ├─► UnitConversion / derive_wind
//!               └─► RenderPolicy
//!                        │
//!                        ▼
//!                  ResolvedField
//! ```
//!
//! # Example
//!
//! ```ignore
//! use field_resolver::{resolve, SnapshotSource, DatasetSource};
//! use forecast_common::{regions, ForecastRun};
//!
//! let run = ForecastRun::parse("20250115", "00")?;
//! let dataset = SnapshotSource::new("/data/gfs").open_run(&run)?;
//! let field = resolve(dataset.as_ref(), "wind10m", 3, &regions::SOEKARNO_HATTA)?;
//! println!("{} | {}", field.title(), field.lead_tag());
//! ```

pub mod cache;
pub mod config;
pub mod convert;
pub mod crop;
pub mod dataset;
pub mod error;
pub mod field;
pub mod grid;
pub mod parameters;
pub mod policy;
pub mod resolver;
pub mod service;
pub mod snapshot;

// Re-export commonly used types at crate root
pub use cache::{CacheStats, LruRunCache};
pub use config::{ResolverConfig, DEFAULT_PROVIDER_URL};
pub use convert::{derive_wind, wind_speed_knots, UnitConversion, WindDerivation};
pub use crop::{AxisSelection, CropWindow};
pub use dataset::{DatasetSource, GridDataset, MemoryDataset};
pub use error::{ConfigError, DatasetError};
pub use field::{ResolvedField, WindComponents};
pub use grid::Grid2D;
pub use parameters::{Derivation, ParameterSpec, PARAMETERS};
pub use policy::{vector_stride, Colormap, FieldKind, RenderPolicy, RenderRange, RenderStyle};
pub use resolver::{resolve, resolve_sequence, FieldResolver, ResolverOptions};
pub use service::{FieldRequest, ForecastService};
pub use snapshot::{snapshot_file_name, SnapshotSource};
