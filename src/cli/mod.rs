//! Command-line parsing for the training-window preparation tool.
//!
//! Argument parsing and command dispatch stay separate from the pipeline
//! code; `app` converts these argument structs into domain configs.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "prnn",
    version,
    about = "Price-direction training-window preparation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the preparation pipeline and print the run summary.
    Prepare(PrepareArgs),
    /// Prepare, then hand the arrays to the trainer and report its metrics.
    Train(TrainArgs),
    /// Write synthetic per-year price dumps for exercising the pipeline.
    Sample(SampleArgs),
}

/// Common options for preparing training windows.
#[derive(Debug, Parser, Clone)]
pub struct PrepareArgs {
    /// Directory containing per-year price dumps.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Data provider token in file names.
    #[arg(long, default_value = "gemini")]
    pub provider: String,

    /// Trading pair symbol (uppercase, e.g. BTCUSD).
    #[arg(short, long, default_value = "BTCUSD")]
    pub pair: String,

    /// Sampling period label in file names (e.g. 1min).
    #[arg(long, default_value = "1min")]
    pub period: String,

    /// Years to load, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [2019])]
    pub years: Vec<i32>,

    /// Look-back window length (records per training sample).
    #[arg(long, default_value_t = 60)]
    pub window_len: usize,

    /// Forecast horizon (records ahead used to compute the label).
    #[arg(long, default_value_t = 3)]
    pub forecast_len: usize,

    /// Fraction of distinct timestamps reserved for the test split.
    #[arg(long, default_value_t = 0.4)]
    pub testpct: f64,

    /// Seed for balancing/shuffling randomness.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Export the run report as JSON.
    #[arg(long, value_name = "JSON")]
    pub export_report: Option<PathBuf>,
}

/// Options for preparing and then training.
#[derive(Debug, Parser)]
pub struct TrainArgs {
    #[command(flatten)]
    pub prep: PrepareArgs,

    /// Mini-batch size forwarded to the trainer.
    #[arg(long, default_value_t = 64)]
    pub batch_size: usize,

    /// Training epochs forwarded to the trainer.
    #[arg(long, default_value_t = 1)]
    pub epochs: usize,

    /// Hidden layer widths forwarded to the trainer, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [128, 128, 128, 128])]
    pub hidden_node_sizes: Vec<usize>,
}

/// Options for synthetic dump generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Directory to write dumps into (created if missing).
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Data provider token in file names.
    #[arg(long, default_value = "gemini")]
    pub provider: String,

    /// Trading pair symbol (uppercase, e.g. BTCUSD).
    #[arg(short, long, default_value = "BTCUSD")]
    pub pair: String,

    /// Sampling period label in file names (e.g. 1min).
    #[arg(long, default_value = "1min")]
    pub period: String,

    /// Years to synthesize, one file per year.
    #[arg(long, value_delimiter = ',', default_values_t = [2019])]
    pub years: Vec<i32>,

    /// Records per file.
    #[arg(long, default_value_t = 5000)]
    pub steps: usize,

    /// Starting price of the walk.
    #[arg(long, default_value_t = 3700.0)]
    pub start_price: f64,

    /// Per-step log-return volatility of the walk.
    #[arg(long, default_value_t = 0.002)]
    pub step_vol: f64,

    /// Seed for the walk.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}
