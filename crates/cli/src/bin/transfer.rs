use std::path::PathBuf;

use clap::Parser;
use orrery::core::constants::{AU_M, SECONDS_PER_DAY};
use orrery::core::units::ms_to_kms;
use orrery::export::summary as export_summary;
use orrery::transfer::{EstimateOptions, estimate};

#[path = "../common.rs"]
mod common;

/// Compare Hohmann, bi-elliptic and one-tangent transfers between the orbits of two bodies.
#[derive(Parser, Debug)]
#[command(author, version, about = "Closed-form transfer estimates between two bodies")]
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

    /// Bi-elliptic intermediate apoapsis in AU
    #[arg(long)]
    apoapsis_au: Option<f64>,

    /// One-tangent transfer eccentricity
    #[arg(long)]
    eccentricity: Option<f64>,

    /// Print JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    common::init_tracing();
    let cli = Cli::parse();

    let system = common::load_catalog(&cli.catalog)?;
    let origin = common::find_body(&system, &cli.from)?;
    let destination = common::find_body(&system, &cli.to)?;
    let options = EstimateOptions {
        bi_elliptic_apoapsis: cli.apoapsis_au.map(|au| au * AU_M),
        one_tangent_eccentricity: cli.eccentricity,
    };
    let estimate = estimate(&system, origin, destination, &options)?;

    if cli.json {
        export_summary::write_json(std::io::stdout(), &estimate)?;
        return Ok(());
    }

    let days = |seconds: f64| seconds / SECONDS_PER_DAY;
    println!("{} -> {} around {}", estimate.origin, estimate.destination, estimate.primary);
    println!("  synodic period            {:>10.2} d", days(estimate.synodic_period));
    println!(
        "  hohmann                   {:>10.3} km/s {:>10.2} d",
        ms_to_kms(estimate.hohmann_dv),
        days(estimate.hohmann_time)
    );
    println!(
        "  bi-elliptic (rb {:>6.2} AU) {:>10.3} km/s {:>10.2} d",
        estimate.bi_elliptic_apoapsis / AU_M,
        ms_to_kms(estimate.bi_elliptic_dv),
        days(estimate.bi_elliptic_time)
    );
    println!(
        "  one-tangent (e {:>6.3})    {:>10.3} km/s {:>10.2} d",
        estimate.one_tangent_eccentricity,
        ms_to_kms(estimate.one_tangent_dv),
        days(estimate.one_tangent_time)
    );
    if estimate.hohmann_always_cheaper {
        println!("  no bi-elliptic transfer beats hohmann at this radius ratio");
    }
    Ok(())
}
