//! Savings Projection CLI
//!
//! Command-line interface for running a single projection or a rate sweep

use anyhow::Context;
use clap::Parser;
use log::debug;
use savings_projection::api::response::ProjectionEnvelope;
use savings_projection::config::DEFAULT_YEARS;
use savings_projection::{ProjectionEngine, SavingsParameters, ScenarioRunner};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "savings-projection")]
#[command(about = "Project monthly savings growth under compound interest")]
#[command(allow_negative_numbers = true)]
struct Cli {
    /// Starting balance at month 0
    #[arg(long)]
    initial_amount: f64,

    /// Contribution added at the end of every month
    #[arg(long)]
    monthly_deposit: f64,

    /// Nominal annual interest rate in percent (e.g. 5 for 5%)
    #[arg(long)]
    interest_rate: f64,

    /// Projection horizon in years
    #[arg(long, default_value_t = i64::from(DEFAULT_YEARS))]
    years: i64,

    /// Number of monthly rows printed to the console
    #[arg(long, default_value_t = 24)]
    rows: usize,

    /// Write every monthly point to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the API response envelope as JSON instead of a table
    #[arg(long, conflicts_with = "sweep")]
    json: bool,

    /// Also compare final values across these annual rates (comma separated)
    #[arg(long, value_delimiter = ',')]
    sweep: Vec<f64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    debug!("CLI arguments: {:?}", cli);

    let params = SavingsParameters::new(cli.initial_amount, cli.monthly_deposit, cli.interest_rate, cli.years)
        .context("Invalid savings parameters")?;

    let result = ProjectionEngine::new()
        .project(&params)
        .context("Projection failed")?;

    if cli.json {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &ProjectionEnvelope::new(&result))?;
        writeln!(out)?;
    } else {
        println!("Savings Projection v{}", env!("CARGO_PKG_VERSION"));
        println!("=========================\n");

        println!("Parameters:");
        println!("  Initial Amount:  {:.2}", params.initial_amount());
        println!("  Monthly Deposit: {:.2}", params.monthly_deposit());
        println!("  Interest Rate:   {}%", params.interest_rate());
        println!("  Years:           {}", params.years());
        println!();

        println!("{:>5} {:>16}", "Month", "Value");
        println!("{}", "-".repeat(22));
        for point in result.points().iter().take(cli.rows) {
            println!("{:>5} {:>16.2}", point.month, point.value);
        }
        if result.len() > cli.rows {
            println!("... ({} more months)", result.len() - cli.rows);
        }

        let summary = result.summary();
        println!("\nSummary:");
        println!("  Total Months:        {}", summary.total_months);
        println!("  Final Value:         {:.2}", summary.final_value);
        println!("  Total Contributions: {:.2}", summary.total_contributions);
        println!("  Total Interest:      {:.2}", summary.total_interest);

        println!("\nYear-end Milestones:");
        for year in [1, 5, 10, 20, 30, 40, 50] {
            if let Some(point) = result.at_month(year * 12) {
                println!("  Year {:>2}: {:>16.2}", year, point.value);
            }
        }
    }

    if let Some(path) = &cli.csv {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Unable to create CSV file {}", path.display()))?;
        for point in result.points() {
            writer.serialize(point)?;
        }
        writer.flush()?;
        eprintln!("Full results written to: {}", path.display());
    }

    if !cli.sweep.is_empty() {
        let runner = ScenarioRunner::new();
        let results = runner
            .run_rate_sweep(&params, &cli.sweep)
            .context("Rate sweep failed")?;

        println!("\nRate Sweep ({} years):", params.years());
        println!("{:>8} {:>16} {:>16}", "Rate", "Final Value", "Interest");
        for (rate, result) in cli.sweep.iter().zip(&results) {
            let summary = result.summary();
            println!("{:>7}% {:>16.2} {:>16.2}", rate, summary.final_value, summary.total_interest);
        }
    }

    Ok(())
}
