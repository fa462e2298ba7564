mod commands;
mod config;
mod input;
mod output;
mod quote;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::equity::{CommonArgs, ReportArgs, ScheduleArgs, ThresholdArgs};

/// Equity compensation pretty printer
#[derive(Parser)]
#[command(
    name = "stockworth",
    version,
    about = "Value your RSUs and options and see what leaving would cost",
    long_about = "Prices every RSU and stock option vesting event at the latest quote, \
                  splits the total into vested and unvested value, bins pending value \
                  into a monthly or yearly vesting calendar, and reports how long until \
                  the amount you would walk away from drops below each threshold."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "text", global = true)]
    output: OutputFormat,

    /// Enable debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Full report: totals, vesting calendar and thresholds
    Report(ReportArgs),
    /// Total, vested and unvested value
    Value(CommonArgs),
    /// Pending value binned by vesting month or year
    Schedule(ScheduleArgs),
    /// Dates on which the unvested remainder drops below each amount
    Thresholds(ThresholdArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("stockworth=debug,stockworth_core=debug")
        } else {
            EnvFilter::new("stockworth=warn")
        }
    });

    // stdout carries the report; logs go to stderr
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Report(args) => commands::equity::run_report(args),
        Commands::Value(args) => commands::equity::run_value(args),
        Commands::Schedule(args) => commands::equity::run_schedule(args),
        Commands::Thresholds(args) => commands::equity::run_thresholds(args),
        Commands::Version => {
            println!("stockworth {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
