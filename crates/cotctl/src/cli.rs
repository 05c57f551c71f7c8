use anyhow::Context;
use clap::{Parser, Subcommand};
use cotlens_core::CotConfig;
use std::path::PathBuf;

use crate::commands;
use crate::output::OutputFormat;

/// cotctl - inspect chain-of-thought compression experiments
#[derive(Parser, Debug)]
#[command(name = "cotctl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// YAML config file (labels, metrics glob, chart and sampling defaults)
    #[arg(long, global = true, env = "COTCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `cotlens_core=debug`
    #[arg(long, global = true, env = "COTCTL_LOG", default_value = "warn")]
    pub log_level: String,

    /// Shorthand for `--log-level debug`
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compare metrics.json of a baseline run against a compressed run
    Compare {
        /// Root directory of the baseline (full CoT) run
        baseline_dir: PathBuf,

        /// Root directory of the compressed CoT run
        compressed_dir: PathBuf,

        /// Glob locating metrics.json below each root
        #[arg(long, env = "COTCTL_METRICS_PATTERN")]
        pattern: Option<String>,

        /// Output format (text, json, yaml)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Turn a run's predictions into a per-example instrumentation CSV
    Instrument {
        /// Samples directory of the run (or the predictions file itself)
        #[arg(long)]
        run_dir: PathBuf,

        /// Destination CSV
        #[arg(long)]
        out_csv: PathBuf,
    },

    /// Summarize two instrumentation CSVs and render comparison charts
    Report {
        /// Instrumentation CSV of the full CoT run
        #[arg(long)]
        full_csv: PathBuf,

        /// Instrumentation CSV of the compressed CoT run
        #[arg(long)]
        comp_csv: PathBuf,

        /// Prefix for output files (may include a directory)
        #[arg(long)]
        output_prefix: PathBuf,

        /// Histogram bin count (overrides config)
        #[arg(long)]
        bins: Option<usize>,

        /// Output format for the printed summary (text, json, yaml)
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Print randomly sampled outputs of both runs next to each other
    SideBySide {
        /// Samples directory of the baseline run
        #[arg(long)]
        baseline_dir: PathBuf,

        /// Samples directory of the compressed run
        #[arg(long)]
        compressed_dir: PathBuf,

        /// Number of examples to show (overrides config)
        #[arg(short = 'n', long)]
        examples: Option<usize>,

        /// RNG seed for a reproducible sample
        #[arg(long, env = "COTCTL_SEED")]
        seed: Option<u64>,

        /// Wrap width (overrides config)
        #[arg(long)]
        width: Option<usize>,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: commands::completion::Shell,
    },
}

impl Cli {
    pub fn execute(self) -> anyhow::Result<()> {
        let config = match &self.config {
            Some(path) => CotConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => CotConfig::default(),
        };

        match self.command {
            Commands::Compare {
                baseline_dir,
                compressed_dir,
                pattern,
                output,
            } => commands::compare::execute(
                &baseline_dir,
                &compressed_dir,
                pattern.as_deref().unwrap_or(&config.metrics_pattern),
                output,
            ),
            Commands::Instrument { run_dir, out_csv } => {
                commands::instrument::execute(&run_dir, &out_csv)
            }
            Commands::Report {
                full_csv,
                comp_csv,
                output_prefix,
                bins,
                output,
            } => commands::report::execute(
                &full_csv,
                &comp_csv,
                &output_prefix,
                bins,
                output,
                &config,
            ),
            Commands::SideBySide {
                baseline_dir,
                compressed_dir,
                examples,
                seed,
                width,
            } => commands::side_by_side::execute(
                &baseline_dir,
                &compressed_dir,
                examples,
                seed,
                width,
                &config,
            ),
            Commands::Completion { shell } => commands::completion::execute(shell),
        }
    }
}
