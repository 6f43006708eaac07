//! `ocdgen` CLI: generate scenario chains and inspect sector shapes.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use sector_models::{SectorElement, SectorType, ShapeParams};
use sim::config::{load_config, BaseScenario, ScenarioConfig};
use sim::output::{save_aircraft, write_aircraft};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ocdgen", about = "Seeded air-traffic conflict scenario generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ShapeArg {
    I,
    X,
    Y,
}

impl From<ShapeArg> for SectorType {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::I => SectorType::I,
            ShapeArg::X => SectorType::X,
            ShapeArg::Y => SectorType::Y,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BaseArg {
    Empty,
    OverflierClimber,
}

impl From<BaseArg> for BaseScenario {
    fn from(arg: BaseArg) -> Self {
        match arg {
            BaseArg::Empty => BaseScenario::Empty,
            BaseArg::OverflierClimber => BaseScenario::OverflierClimber,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Build a scenario chain and emit its aircraft as JSON.
    Generate {
        /// Scenario chain description (JSON); defaults apply when absent
        #[arg(long)]
        config: Option<PathBuf>,
        /// Override the base scenario seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override the sector shape
        #[arg(long, value_enum)]
        shape: Option<ShapeArg>,
        /// Override the base scenario
        #[arg(long, value_enum)]
        base: Option<BaseArg>,
        /// Extra uniform incremental layers stacked on top of the config's
        #[arg(long, default_value_t = 0)]
        layers: usize,
        /// Write the aircraft to a JSON file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a shape's fixes and routes.
    Describe {
        #[arg(long, value_enum, default_value = "i")]
        shape: ShapeArg,
        /// Inner fix spacing (nm)
        #[arg(long, default_value_t = 50.0)]
        length: f64,
        /// Distance out to the end fixes (nm)
        #[arg(long, default_value_t = 40.0)]
        offset: f64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            config,
            seed,
            shape,
            base,
            layers,
            output,
        } => {
            let mut config = match config {
                Some(path) => load_config(&path)?,
                None => ScenarioConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(shape) = shape {
                config.shape = shape.into();
            }
            if let Some(base) = base {
                config.base = base.into();
            }
            generate(config.with_extra_layers(layers), output.as_deref())?;
        }
        Commands::Describe {
            shape,
            length,
            offset,
        } => {
            describe(shape.into(), length, offset)?;
        }
    }

    Ok(())
}

fn generate(config: ScenarioConfig, output_path: Option<&Path>) -> Result<()> {
    let scenario = config.build()?;
    let start = std::time::Instant::now();

    match output_path {
        Some(path) => {
            let aircraft = scenario.collect_aircraft()?;
            save_aircraft(&aircraft, path)?;
            println!(
                "Generated {} aircraft over sector '{}' ({} shape, seed={}, {} layers) in {:.3}s",
                aircraft.len(),
                config.sector_name,
                config.shape,
                config.seed,
                config.layers.len(),
                start.elapsed().as_secs_f64(),
            );
            for rec in &aircraft {
                println!(
                    "  {:<12} {:<5} FL{:03}->FL{:03} {} t+{:.0}s",
                    rec.callsign,
                    rec.aircraft_type,
                    rec.current_flight_level,
                    rec.cleared_flight_level,
                    rec.route.join(" "),
                    rec.timedelta,
                );
            }
            println!("Aircraft saved to {}", path.display());
        }
        None => {
            let count = write_aircraft(scenario.as_ref(), std::io::stdout().lock())?;
            tracing::info!(count, "aircraft written to stdout");
        }
    }

    Ok(())
}

fn describe(sector_type: SectorType, length_nm: f64, offset_nm: f64) -> Result<()> {
    let params = ShapeParams::default()
        .with_length_nm(length_nm)
        .with_offset_nm(offset_nm);
    let sector = SectorElement::build(format!("{sector_type}-sector"), sector_type, &params)?;
    let centre = sector.centre_point();

    println!(
        "{} shape: length={:.1}nm offset={:.1}nm centre=({:.4}, {:.4})",
        sector_type,
        length_nm,
        offset_nm,
        centre.x(),
        centre.y()
    );
    println!("Spokes cross at {}", sector.shape().centre_fix().name);
    println!("Fixes:");
    for fix in sector.shape().fixes() {
        println!(
            "  {:<4} lon={:>9.4} lat={:>8.4}  local=({:>6.1}, {:>6.1})nm",
            fix.name,
            fix.position.x(),
            fix.position.y(),
            fix.local_nm.x,
            fix.local_nm.y,
        );
    }
    println!("Routes:");
    for route in sector.routes() {
        println!("  {:<6} {}", route.name(), route.fix_names().join(" -> "));
    }

    Ok(())
}
