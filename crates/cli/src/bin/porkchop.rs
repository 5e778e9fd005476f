use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Parser;
use orrery::core::time::{days_to_seconds, epoch_seconds};
use orrery::core::units::ms_to_kms;
use orrery::export::{porkchop as export_porkchop, summary as export_summary};
use orrery::transfer::{PorkchopRequest, PorkchopSummary, TimeWindow, TransferPair, generate};
use tracing::info;

#[path = "../common.rs"]
mod common;

/// Generate porkchop data (CSV) by sweeping departure epochs and times of flight.
#[derive(Parser, Debug)]
#[command(author, version, about = "Porkchop CSV generator (Lambert, patched conics)")]
struct Cli {
    /// Body catalog (YAML, TOML, JSON or a directory of TOML files)
    #[arg(long, default_value = "configs/solar_system.yaml")]
    catalog: PathBuf,

    /// Departure body name (case-insensitive)
    #[arg(long)]
    from: String,

    /// Destination body name (case-insensitive)
    #[arg(long)]
    to: String,

    /// Departure window start epoch (UTC, YYYY-MM-DD[THH:MM[:SS]])
    #[arg(long)]
    depart_start: String,

    /// Departure window end epoch
    #[arg(long)]
    depart_end: String,

    /// Departure grid step in days
    #[arg(long, default_value_t = 5.0)]
    step_days: f64,

    /// Shortest time of flight in days
    #[arg(long, default_value_t = 100.0)]
    min_tof_days: f64,

    /// Longest time of flight in days
    #[arg(long, default_value_t = 400.0)]
    max_tof_days: f64,

    /// Time-of-flight grid step in days (defaults to --step-days)
    #[arg(long)]
    tof_step_days: Option<f64>,

    /// Parking altitude at origin in km
    #[arg(long, default_value_t = 200.0)]
    origin_altitude: f64,

    /// Parking altitude at destination in km
    #[arg(long, default_value_t = 200.0)]
    dest_altitude: f64,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/pork.csv")]
    output: PathBuf,

    /// Optional JSON summary with the cheapest feasible transfer
    #[arg(long)]
    summary: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    common::init_tracing();
    let cli = Cli::parse();

    let system = common::load_catalog(&cli.catalog)?;
    let origin = common::find_body(&system, &cli.from)?;
    let destination = common::find_body(&system, &cli.to)?;

    let dep_start = epoch_seconds(&cli.depart_start)?;
    let dep_end = epoch_seconds(&cli.depart_end)?;
    if dep_end < dep_start {
        bail!("departure window end must not precede its start");
    }
    if cli.step_days <= 0.0 {
        bail!("--step-days must be positive");
    }
    let tof_step_days = cli.tof_step_days.unwrap_or(cli.step_days);

    let request = PorkchopRequest {
        origin,
        destination,
        departure: TimeWindow::new(dep_start, dep_end, days_to_seconds(cli.step_days)),
        time_of_flight: TimeWindow::new(
            days_to_seconds(cli.min_tof_days),
            days_to_seconds(cli.max_tof_days),
            days_to_seconds(tof_step_days),
        ),
        departure_altitude: cli.origin_altitude * 1_000.0,
        arrival_altitude: cli.dest_altitude * 1_000.0,
    };
    let points = generate(&system, &request)?;
    export_porkchop::write_csv(&cli.output, &points)?;
    info!(rows = points.len(), output = %cli.output.display(), "wrote porkchop grid");

    let pair = TransferPair::resolve(&system, origin, destination)?;
    let summary = PorkchopSummary::new(&pair, &points);
    if let Some(path) = &cli.summary {
        export_summary::write_json_file(path, &summary)?;
    }

    let best = summary
        .best
        .as_ref()
        .ok_or_else(|| anyhow!("no feasible transfer in {} grid points", summary.points))?;
    eprintln!(
        "best: depart {} arrive {} ({:.1} d), C3 {:.3} km²/s², Δv {:.3} km/s",
        best.departure_utc,
        best.arrival_utc,
        best.time_of_flight_days,
        best.c3 / 1.0e6,
        ms_to_kms(best.dv_total),
    );
    Ok(())
}
