mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::schedule::ScheduleArgs;
use commands::simulate::{ImpactArgs, SimulateArgs};

/// Loan amortization schedule simulation
#[derive(Parser)]
#[command(
    name = "amort",
    version,
    about = "Loan amortization schedule simulation with decimal precision",
    long_about = "A CLI for rebuilding a loan's payment schedule from a contract \
                  statement document and simulating extraordinary principal payments \
                  under reduce-term or reduce-installment policies, with interest, \
                  term, and total-paid impact summaries."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the baseline schedule from a contract document
    Schedule(ScheduleArgs),
    /// Apply amortization events and print the recomputed schedule
    Simulate(SimulateArgs),
    /// Print only the impact summary of a simulation
    Impact(ImpactArgs),
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

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Simulate(args) => commands::simulate::run_simulate(args),
        Commands::Impact(args) => commands::simulate::run_impact(args),
        Commands::Version => {
            println!("amort {}", env!("CARGO_PKG_VERSION"));
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
