//! Subcommand implementations.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use field_resolver::{
    FieldRequest, ForecastService, LruRunCache, ParameterSpec, RenderPolicy, RenderRange,
    ResolverConfig, SnapshotSource, PARAMETERS,
};
use forecast_common::{lead_indices, regions, BoundingBox, ForecastRun};

use crate::{AreaArgs, OutputArgs, RunArgs};

/// Parameter listing row.
#[derive(Debug, Serialize)]
struct ParameterRow<'a> {
    id: &'a str,
    label: &'a str,
    units: &'a str,
    variables: Vec<&'a str>,
    policy: RenderPolicy,
}

impl<'a> From<&'a ParameterSpec> for ParameterRow<'a> {
    fn from(spec: &'a ParameterSpec) -> Self {
        Self {
            id: spec.id,
            label: spec.label,
            units: spec.units,
            variables: spec.derivation.raw_variables(),
            policy: RenderPolicy {
                kind: spec.kind,
                style: spec.style,
                range: RenderRange::from_declared(spec.default_range),
                vector_stride: None,
            },
        }
    }
}

pub fn params(json: bool) -> Result<()> {
    let rows: Vec<ParameterRow> = PARAMETERS.iter().map(ParameterRow::from).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("{:<10} {:<32} {:<6} {:<20} RANGE", "ID", "LABEL", "UNITS", "VARIABLES");
    for row in &rows {
        let range = match row.policy.range {
            RenderRange::Fixed { vmin, vmax } => format!("{vmin}..{vmax}"),
            RenderRange::Auto => "auto".to_string(),
        };
        println!(
            "{:<10} {:<32} {:<6} {:<20} {}",
            row.id,
            row.label,
            row.units,
            row.variables.join(","),
            range
        );
    }
    Ok(())
}

pub fn url(config: &ResolverConfig, run: &RunArgs, provider: Option<&str>) -> Result<()> {
    let run = select_run(config, run)?;
    let provider = provider.unwrap_or(&config.provider_url);
    println!("{}", run.dataset_url(provider));
    Ok(())
}

pub fn resolve(
    config: &ResolverConfig,
    run: &RunArgs,
    area: &AreaArgs,
    output: &OutputArgs,
    parameter: &str,
    lead: i64,
) -> Result<()> {
    let run = select_run(config, run)?;
    let bbox = select_area(area)?;
    let service = build_service(config, output)?;

    let field = service.resolve(&FieldRequest::new(run, parameter, lead, bbox))?;
    info!(
        run = %run,
        parameter = parameter,
        title = %field.title(),
        tag = %field.lead_tag(),
        "Resolved field"
    );
    write_json(&field, output)
}

pub fn animate(
    config: &ResolverConfig,
    run: &RunArgs,
    area: &AreaArgs,
    output: &OutputArgs,
    parameter: &str,
    (start, end, step): (i64, i64, usize),
) -> Result<()> {
    let run = select_run(config, run)?;
    let bbox = select_area(area)?;
    let leads = lead_indices(start, end, step);
    if leads.is_empty() {
        bail!("empty lead-time range {start}..={end}");
    }

    let service = build_service(config, output)?;
    let frames = service.resolve_animation(&run, parameter, &leads, &bbox)?;
    info!(
        run = %run,
        parameter = parameter,
        frames = frames.len(),
        "Resolved animation"
    );
    write_json(&frames, output)
}

fn select_run(config: &ResolverConfig, args: &RunArgs) -> Result<ForecastRun> {
    match (&args.date, &args.cycle) {
        (Some(date), Some(cycle)) => Ok(ForecastRun::parse(date, cycle)?),
        _ => {
            let run = ForecastRun::latest_expected(Utc::now(), config.publish_delay());
            info!(run = %run, "No run given, using latest expected run");
            Ok(run)
        }
    }
}

fn select_area(args: &AreaArgs) -> Result<BoundingBox> {
    match &args.bbox {
        Some(extent) => Ok(BoundingBox::from_extent_string(extent)?),
        None => regions::by_name(&args.region)
            .ok_or_else(|| anyhow!("unknown region '{}'", args.region)),
    }
}

fn build_service(
    config: &ResolverConfig,
    output: &OutputArgs,
) -> Result<ForecastService<LruRunCache<SnapshotSource>>> {
    let dir = output
        .snapshot_dir
        .clone()
        .or_else(|| config.snapshot_dir.clone())
        .context("no snapshot directory; pass --snapshot-dir or set GFS_SNAPSHOT_DIR")?;

    let source = LruRunCache::new(SnapshotSource::new(dir), config.run_cache_capacity);
    Ok(ForecastService::from_config(source, config))
}

fn write_json<T: Serialize>(value: &T, output: &OutputArgs) -> Result<()> {
    match &output.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_to(BufWriter::new(file), value, output.pretty)?;
            info!(path = %path.display(), "Wrote output");
        }
        None => write_to(io::stdout().lock(), value, output.pretty)?,
    }
    Ok(())
}

fn write_to<W: Write, T: Serialize>(mut writer: W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut writer, value)?;
    } else {
        serde_json::to_writer(&mut writer, value)?;
    }
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
