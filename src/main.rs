//! Dilithium Bench Eval CLI
//!
//! Reduces per-iteration performance-counter traces of Dilithium benchmark
//! runs into cycle statistics, group breakdowns and per-function costs.

use anyhow::Result;
use clap::{Parser, Subcommand};
use dilithium_bench_eval::aggregator::{CycleAccounting, Reducer};
use dilithium_bench_eval::commands::{
    display_groups, display_version, execute_evaluate, validate_args, EvaluateArgs,
};
use dilithium_bench_eval::utils::config::DEFAULT_OUTPUT_FILE;
use env_logger::Env;
use std::path::PathBuf;

/// Dilithium Bench Eval - evaluate benchmark stores
#[derive(Parser, Debug)]
#[command(name = "bench-eval")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate benchmarks from a store
    Evaluate {
        /// Benchmark database (SQLite, or a `.json` dump)
        #[arg(short = 'f', long)]
        filename: PathBuf,

        /// Ids of benchmarks to evaluate
        #[arg(short, long, num_args = 1.., required = true)]
        ids: Vec<i64>,

        /// Output path for the text report
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        output: PathBuf,

        /// Output path for a JSON report (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// Classification TOML (defaults to the built-in Dilithium table)
        #[arg(long, env = "BENCH_EVAL_GROUPS")]
        groups: Option<PathBuf>,

        /// Statistic for the per-function table
        #[arg(long, value_enum, default_value_t = Reducer::Median)]
        stat: Reducer,

        /// Evaluate all ids as a single selection
        #[arg(long)]
        combine: bool,

        /// Recorded totals include stall cycles
        #[arg(long)]
        count_stalls: bool,
    },

    /// Show the function classification
    Groups {
        /// Classification TOML (defaults to the built-in Dilithium table)
        #[arg(long, env = "BENCH_EVAL_GROUPS")]
        groups: Option<PathBuf>,

        /// Print as TOML, ready to edit and pass back with --groups
        #[arg(long)]
        export: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Evaluate {
            filename,
            ids,
            output,
            json,
            groups,
            stat,
            combine,
            count_stalls,
        } => {
            let args = EvaluateArgs {
                store_path: filename,
                benchmark_ids: ids,
                output_text: output,
                output_json: json,
                groups,
                statistic: stat,
                accounting: if count_stalls {
                    CycleAccounting::InstructionsWithStalls
                } else {
                    CycleAccounting::Instructions
                },
                combine,
            };

            // Validate args first
            validate_args(&args)?;

            let summary = execute_evaluate(&args)?;
            if !summary.all_succeeded() {
                for (label, message) in &summary.failed {
                    eprintln!("index {}: {}", label, message);
                }
                anyhow::bail!(
                    "{} of {} evaluation(s) failed",
                    summary.failed.len(),
                    summary.failed.len() + summary.succeeded
                );
            }
        }

        Commands::Groups { groups, export } => {
            display_groups(groups, export)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
