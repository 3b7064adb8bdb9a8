use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use coolavg_core::UnitConfig;
use tracing_subscriber::EnvFilter;

mod driver;

use driver::{run_batch, run_interactive, CliError, RunEnd};

#[derive(Parser)]
#[command(name = "coolavg")]
#[command(about = "Manually stepped moving average with a zero-triggered cooldown")]
struct Cli {
    /// TOML file with `window_size` / `cooldown_ms`
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prompt for numbers; press ENTER to resume (default)
    Interactive,
    /// Feed the given values, waiting between resumes
    Batch {
        #[arg(required = true, allow_negative_numbers = true)]
        values: Vec<f64>,
        /// Milliseconds to wait before each resume
        #[arg(long, default_value_t = 0)]
        wait_ms: u64,
        /// Emit one JSON snapshot per step
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<RunEnd, CliError> {
    let cfg = UnitConfig::load(cli.config.as_deref())?;
    log::debug!("config: {cfg:?}");
    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => run_interactive(cfg, io::stdin().lock(), io::stdout()),
        Commands::Batch { values, wait_ms, json } => run_batch(
            cfg,
            values,
            Duration::from_millis(wait_ms),
            json,
            &mut io::stdout().lock(),
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(RunEnd::Finished) => ExitCode::SUCCESS,
        Ok(RunEnd::Violated(_)) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
