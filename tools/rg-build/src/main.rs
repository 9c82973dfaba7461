//! # rg-build
//!
//! Extracts the road network of one or more configured regions and writes
//! one canonical graph document per region (`<out-dir>/<region>-graph.json`).
//!
//! Run with:
//!   cargo run -p rg-build --release -- vancouver --pbf british-columbia-latest.osm.pbf

mod pipeline;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use rg_core::{CoreError, RegionRegistry, ALL_SELECTOR};
use rg_graph::{Canonicalizer, CoordPrecision, GraphWriter};
use rg_source::{JsonSource, NetworkSource, PbfSource};

use pipeline::Pipeline;

/// Exit status for usage and configuration errors (matches clap's own).
const USAGE_EXIT: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "rg-build", version)]
#[command(about = "Extract regional road networks into canonical graph documents")]
#[command(long_about = "Extract regional road networks into canonical graph documents:
  rg-build vancouver --pbf bc.osm.pbf        # one region from a local OSM extract
  rg-build canada --pbf canada.osm.pbf       # every region of a group
  rg-build all --raw raw/{region}.json       # pre-extracted raw networks
  rg-build --list                            # show configured regions and groups")]
struct Cli {
    /// Region id, group name, or "all"
    #[arg(default_value = ALL_SELECTOR)]
    selector: String,

    /// Read networks from a local OSM PBF extract
    #[arg(long, value_name = "FILE", conflicts_with = "raw")]
    pbf: Option<PathBuf>,

    /// Read pre-extracted raw network JSON; "{region}" is replaced by the region id
    #[arg(long, value_name = "PATH")]
    raw: Option<String>,

    /// Directory receiving the graph documents
    #[arg(short, long, value_name = "DIR", default_value = "data")]
    out_dir: PathBuf,

    /// Decimal places kept on every output coordinate
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u8).range(5..=6))]
    precision: u8,

    /// TOML region registry replacing the built-in regions
    #[arg(long, value_name = "FILE")]
    regions: Option<PathBuf>,

    /// Print configured regions and groups, then exit
    #[arg(long)]
    list: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .target(env_logger::Target::Stderr)
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_status(&e))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let registry = match &cli.regions {
        Some(path) => RegionRegistry::load(path)
            .with_context(|| format!("loading regions from {}", path.display()))?,
        None => RegionRegistry::builtin(),
    };

    if cli.list {
        print_registry(&registry);
        return Ok(());
    }

    // Resolve before touching any input so a typo writes nothing.
    let regions = registry.resolve(&cli.selector)?;
    let precision = CoordPrecision::try_from(cli.precision)?;

    let source: Box<dyn NetworkSource> = match (&cli.pbf, &cli.raw) {
        (Some(path), None) => Box::new(PbfSource::new(path)),
        (None, Some(template)) => Box::new(JsonSource::new(template.as_str())),
        _ => {
            return Err(CoreError::Config("exactly one of --pbf or --raw is required".into()).into());
        }
    };

    info!(
        "extracting {} region(s) via {} at {} decimal places into {}",
        regions.len(),
        source.name(),
        precision.decimals(),
        cli.out_dir.display()
    );

    let pipeline = Pipeline::new(source, Canonicalizer::new(precision), GraphWriter::new(&cli.out_dir));
    for region in regions {
        pipeline
            .extract(region)
            .with_context(|| format!("extracting region {:?}", region.id))?;
    }
    Ok(())
}

fn print_registry(registry: &RegionRegistry) {
    println!("Regions:");
    for r in registry.regions() {
        println!("  {:<12} {:<16} {:<6} {}", r.id, r.name, r.network_type, r.bbox);
    }
    println!("Groups:");
    for (name, members) in registry.groups() {
        println!("  {:<12} {}", name, members.join(", "));
    }
    println!("  {:<12} every region", ALL_SELECTOR);
}

/// `2` when the operator asked for something invalid, `1` otherwise.
fn exit_status(e: &anyhow::Error) -> u8 {
    let usage = e.chain().any(|cause| {
        cause.downcast_ref::<CoreError>().is_some_and(CoreError::is_usage_error)
            || cause.downcast_ref::<rg_graph::GraphError>().is_some_and(|g| {
                matches!(g, rg_graph::GraphError::Precision(_))
            })
    });
    if usage { USAGE_EXIT } else { 1 }
}
