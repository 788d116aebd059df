//! Headless sandbox for the physics kernel
//!
//! Loads a scenario file (TOML or RON), builds the scene and ticks it,
//! logging what happens. Set `RUST_LOG=debug` to also see registrations and
//! removals, or `trace` for every tick.

mod report;
mod scenario;

use std::process::ExitCode;

use clap::Parser;
use log::{error, info};

use rust_physics::foundation::logging;
use rust_physics::prelude::Config;

use crate::report::{run, LogPresenter, RunSummary};
use crate::scenario::{ScenarioConfig, ScenarioError};

#[derive(Parser, Debug)]
#[command(about = "Run a physics scenario and log the result")]
struct Args {
    /// Scenario file (.toml or .ron)
    #[arg(short, long, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/scenarios/falling_box.toml"))]
    scenario: String,

    /// Override the number of ticks from the scenario
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the time step from the scenario
    #[arg(long)]
    dt: Option<f64>,

    /// Log body state every N ticks (0 logs only start and end)
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn run_scenario(args: &Args) -> Result<RunSummary, ScenarioError> {
    info!("loading scenario {}", args.scenario);
    let config = ScenarioConfig::load_from_file(&args.scenario)?;

    let dt = args.dt.unwrap_or(config.dt);
    if !(dt.is_finite() && dt >= 0.0) {
        return Err(ScenarioError::InvalidStep(dt));
    }
    let ticks = args.ticks.unwrap_or(config.ticks);

    let mut scenario = config.build()?;
    let mut presenter = LogPresenter::new(args.report_every);
    Ok(run(&mut scenario, ticks, dt, &mut presenter))
}

fn main() -> ExitCode {
    logging::init();
    let args = Args::parse();

    match run_scenario(&args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
