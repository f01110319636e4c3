mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::roi::RoiArgs;
use commands::sanity::SanityArgs;
use commands::sensitivity::SensitivityArgs;

/// Battery storage return-on-investment calculations
#[derive(Parser)]
#[command(
    name = "broi",
    version,
    about = "Battery storage return-on-investment calculations",
    long_about = "A CLI for estimating the return of a battery energy-storage system \
                  with decimal precision. Computes PV-shifting, peak-shaving and \
                  arbitrage savings, payback, NPV and IRR, and sanity-checks figures \
                  shown elsewhere."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate savings, payback, NPV and IRR
    Roi(RoiArgs),
    /// Check displayed annual net and payback against a fresh calculation
    SanityCheck(SanityArgs),
    /// Two-way sensitivity grid over any two inputs
    Sensitivity(SensitivityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Roi(args) => commands::roi::run_roi(args),
        Commands::SanityCheck(args) => commands::sanity::run_sanity_check(args),
        Commands::Sensitivity(args) => commands::sensitivity::run_sensitivity(args),
        Commands::Version => {
            println!("broi {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
