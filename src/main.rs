use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use parcours::{MuseumSnapshot, load_planner_config};
use parcours_core::{PlanRequest, Tour, plan_tour};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Full tour: artworks, segments and metadata
    Json,
    /// Segments only, as a FeatureCollection of LineStrings
    Geojson,
}

#[derive(Parser, Debug)]
#[command(name = "parcours", version, about = "Plan a narrated museum tour from a floor plan snapshot")]
struct Args {
    /// Museum snapshot (rooms, doors, walls, vertical links, artworks) as JSON
    #[arg(value_name = "SNAPSHOT")]
    snapshot: PathBuf,

    /// Target visit duration in minutes
    #[arg(long = "duration", value_name = "MINUTES", default_value_t = 60.0)]
    duration_minutes: f64,

    /// Seed of the weighted selection; variations use seed, seed + 1, ...
    #[arg(long)]
    seed: Option<u64>,

    /// Entrance id from the snapshot the tour starts from
    #[arg(long = "entrance", value_name = "ID")]
    entrance_id: Option<u32>,

    /// Number of tours to plan
    #[arg(long, value_name = "N", default_value_t = 1)]
    variations: u64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Planner settings (TOML)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Output file, stdout when omitted
    #[arg(long = "out", short = 'o', value_name = "PATH")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = load_planner_config(args.config.as_deref())?;

    let snapshot = MuseumSnapshot::load(&args.snapshot)?;
    let plan = snapshot.to_plan().context("Failed to build the floor plan")?;
    let candidates = snapshot.candidates(&plan);
    let entrance = args
        .entrance_id
        .map(|id| snapshot.entrance(id, &plan))
        .transpose()?;
    info!(
        "Floor plan: {} rooms, {} connections, {} candidate artworks",
        plan.room_count(),
        plan.connection_count(),
        candidates.len()
    );

    let tours = (0..args.variations.max(1))
        .into_par_iter()
        .map(|variation| {
            let mut request = PlanRequest::new(args.duration_minutes);
            request.seed = args.seed.map(|seed| seed.wrapping_add(variation));
            request.entrance = entrance;
            plan_tour(&plan, &candidates, &request, &config)
                .with_context(|| format!("Failed to plan variation {variation}"))
        })
        .collect::<Result<Vec<Tour>>>()?;

    let writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);
    write_tours(&mut writer, &tours, args.format)?;
    writer.flush()?;

    if let Some(path) = &args.output {
        info!("Wrote {} tour(s) to {}", tours.len(), path.display());
    }
    Ok(())
}

fn write_tours(writer: &mut impl Write, tours: &[Tour], format: OutputFormat) -> Result<()> {
    match (format, tours) {
        (OutputFormat::Json, [tour]) => serde_json::to_writer_pretty(&mut *writer, tour)?,
        (OutputFormat::Json, tours) => serde_json::to_writer_pretty(&mut *writer, tours)?,
        (OutputFormat::Geojson, [tour]) => {
            serde_json::to_writer_pretty(&mut *writer, &tour.to_geojson())?;
        }
        (OutputFormat::Geojson, tours) => {
            let collections: Vec<geojson::FeatureCollection> =
                tours.iter().map(Tour::to_geojson).collect();
            serde_json::to_writer_pretty(&mut *writer, &collections)?;
        }
    }
    writeln!(writer)?;
    Ok(())
}
