mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::returns::{ReturnsArgs, TaxArgs};
use commands::transactions::{FilterArgs, ParseArgs, ValidateArgs};

/// Round-up savings calculations
#[derive(Parser)]
#[command(
    name = "roundup",
    version,
    about = "Round-up savings calculations",
    long_about = "A CLI for round-up savings with decimal precision. Enriches expenses \
                  with ceilings and remanents, validates and filters transactions against \
                  Q/P/K periods, and projects savings into NPS or index-fund returns."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter written to stderr (e.g. "warn", "roundup_core=debug")
    #[arg(long, env = "ROUNDUP_LOG", default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich raw expenses with ceiling and remanent
    Parse(ParseArgs),
    /// Validate transactions against sign, magnitude, duplicate and ceiling rules
    Validate(ValidateArgs),
    /// Screen transactions and apply Q/P/K period rules
    Filter(FilterArgs),
    /// Project savings into NPS returns with tax benefit
    ReturnsNps(ReturnsArgs),
    /// Project savings into index-fund returns
    ReturnsIndex(ReturnsArgs),
    /// Progressive income tax and NPS deduction benefit
    Tax(TaxArgs),
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

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Parse(args) => commands::transactions::run_parse(args),
        Commands::Validate(args) => commands::transactions::run_validate(args),
        Commands::Filter(args) => commands::transactions::run_filter(args),
        Commands::ReturnsNps(args) => commands::returns::run_returns_nps(args),
        Commands::ReturnsIndex(args) => commands::returns::run_returns_index(args),
        Commands::Tax(args) => commands::returns::run_tax(args),
        Commands::Version => {
            println!("roundup {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
