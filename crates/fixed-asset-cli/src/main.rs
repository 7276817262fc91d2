mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::reports::GainLossArgs;
use commands::schedule::{DepreciationReportArgs, ScheduleArgs};
use commands::tax::{AdjustedBasisArgs, Form4562Args};
use commands::validate::ValidateArgs;
use commands::PortfolioReportArgs;

/// Fixed asset depreciation and reporting
#[derive(Parser)]
#[command(
    name = "fam",
    version,
    about = "Fixed asset depreciation schedules and period reports",
    long_about = "A CLI for fixed asset accounting with decimal precision. Builds GAAP \
                  and Tax depreciation schedules, category rollforwards, disposal \
                  gain/loss reports, depreciation waterfalls and Form 4562 summaries \
                  from JSON asset records."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter for stderr diagnostics (e.g. warn, debug, fixed_asset_core=trace).
    /// RUST_LOG takes precedence when set.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build one book's year-by-year depreciation schedule
    Schedule(ScheduleArgs),
    /// Build every schedule an asset carries, with per-book totals
    DepreciationReport(DepreciationReportArgs),
    /// Category rollforward over a reporting period
    Rollforward(PortfolioReportArgs),
    /// Gain/(loss) for assets disposed within a reporting period
    DisposalReport(PortfolioReportArgs),
    /// Book value waterfall and category composition for a period
    Waterfall(PortfolioReportArgs),
    /// Gain/(loss) on a single disposal
    GainLoss(GainLossArgs),
    /// Adjusted tax basis after Section 179 / 168(k) / other reductions
    AdjustedBasis(AdjustedBasisArgs),
    /// Form 4562 working summary for a tax year
    Form4562(Form4562Args),
    /// Check asset records without computing anything
    Validate(ValidateArgs),
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

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::DepreciationReport(args) => commands::schedule::run_depreciation_report(args),
        Commands::Rollforward(args) => commands::reports::run_rollforward(args),
        Commands::DisposalReport(args) => commands::reports::run_disposal_report(args),
        Commands::Waterfall(args) => commands::reports::run_waterfall(args),
        Commands::GainLoss(args) => commands::reports::run_gain_loss(args),
        Commands::AdjustedBasis(args) => commands::tax::run_adjusted_basis(args),
        Commands::Form4562(args) => commands::tax::run_form4562(args),
        Commands::Validate(args) => commands::validate::run_validate(args),
        Commands::Version => {
            println!("fam {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
