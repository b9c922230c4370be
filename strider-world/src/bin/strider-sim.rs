//! Headless simulation runner.
//!
//! ```text
//! strider-sim [--json] <config.toml> [steps] [dt]
//! ```
//!
//! Loads a scene, steps it and prints where everyone ended up plus the
//! dispatch counters. `RUST_LOG` overrides the configured log level.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use strider_core::{Result, StriderConfig};
use strider_world::Scene;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Run a Strider scene headless and report where everyone ended up
#[derive(Parser, Debug)]
#[command(name = "strider-sim")]
#[command(about = "Headless Strider scene runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Scene configuration (TOML)
    config: PathBuf,

    /// Number of frames to simulate
    #[arg(default_value_t = 600)]
    steps: u64,

    /// Frame length in seconds
    #[arg(default_value_t = 1.0 / 30.0, value_parser = positive_dt)]
    dt: f32,

    /// Emit logs as JSON lines
    #[arg(long)]
    json: bool,
}

fn positive_dt(s: &str) -> std::result::Result<f32, String> {
    let dt: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(format!("dt must be a positive number of seconds, got {s}"))
    }
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn run(args: &Cli) -> Result<()> {
    let config = StriderConfig::from_file(&args.config)?;
    init_tracing(&config.general.log_level, args.json);

    let mut scene = Scene::from_config(config)?;
    scene.spawn()?;
    info!(characters = scene.len(), steps = args.steps, dt = args.dt, "Simulation starting");

    for _ in 0..args.steps {
        scene.step(args.dt);
    }

    for c in scene.characters() {
        let p = c.body().transform.position;
        println!(
            "{:<8} {:<10} {:<14} ({:>7.2}, {:>7.2})",
            c.id().to_string(),
            c.role().name(),
            format!("{:?}", c.state()),
            p.x,
            p.z
        );
    }
    print!("{}", scene.counters().to_prometheus());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Simulation failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
