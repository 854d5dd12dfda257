//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - assembles domain configs
//! - runs the preparation pipeline (and optionally the trainer)
//! - prints summaries and writes optional exports

use clap::Parser;
use log::info;

use crate::cli::{Cli, Command, PrepareArgs, SampleArgs, TrainArgs};
use crate::data::SampleConfig;
use crate::domain::{PrepConfig, TrainConfig};
use crate::error::AppError;
use crate::train::{MajorityTrainer, Trainer};

pub mod pipeline;

/// Entry point for the `prnn` binary.
pub fn run() -> Result<(), AppError> {
    // `prnn --pair BTCUSD` should behave like `prnn prepare --pair BTCUSD`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Prepare(args) => handle_prepare(args),
        Command::Train(args) => handle_train(args),
        Command::Sample(args) => handle_sample(args),
    }
}

fn handle_prepare(args: PrepareArgs) -> Result<(), AppError> {
    let config = prep_config_from_args(&args);
    let output = pipeline::run_prep(&config)?;

    println!("{}", crate::report::format_prep_summary(&output.report));

    if let Some(path) = &config.export_report {
        crate::io::export::write_report_json(path, &output.report)?;
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn handle_train(args: TrainArgs) -> Result<(), AppError> {
    let config = prep_config_from_args(&args.prep);
    let train_config = TrainConfig {
        batch_size: args.batch_size,
        epochs: args.epochs,
        hidden_node_sizes: args.hidden_node_sizes,
    };

    let output = pipeline::run_prep(&config)?;
    println!("{}", crate::report::format_prep_summary(&output.report));

    let mut trainer = MajorityTrainer::default();
    let summary = trainer.train(&output.train, &output.test, &train_config)?;
    println!("{}", crate::report::format_train_summary(&summary));

    if let Some(path) = &config.export_report {
        crate::io::export::write_report_json(path, &output.report)?;
        info!("report written to {}", path.display());
    }
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let config = SampleConfig {
        data_dir: args.data_dir,
        provider: args.provider,
        pair: args.pair,
        period: args.period,
        years: args.years,
        steps: args.steps,
        start_price: args.start_price,
        step_vol: args.step_vol,
        seed: args.seed,
    };
    let written = crate::data::write_sample_files(&config)?;
    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}

pub fn prep_config_from_args(args: &PrepareArgs) -> PrepConfig {
    PrepConfig {
        data_dir: args.data_dir.clone(),
        provider: args.provider.clone(),
        pair: args.pair.clone(),
        period: args.period.clone(),
        years: args.years.clone(),
        window_len: args.window_len,
        forecast_len: args.forecast_len,
        testpct: args.testpct,
        seed: args.seed,
        export_report: args.export_report.clone(),
    }
}

/// Rewrite argv so `prnn` defaults to `prnn prepare`.
///
/// Rules:
/// - `prnn`                     -> `prnn prepare`
/// - `prnn --pair BTCUSD ...`   -> `prnn prepare --pair BTCUSD ...`
/// - `prnn --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("prepare".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "prepare" | "train" | "sample");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "prepare flags".
    if arg1.starts_with('-') {
        argv.insert(1, "prepare".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_prepare() {
        assert_eq!(rewrite_args(args(&["prnn"])), args(&["prnn", "prepare"]));
        assert_eq!(
            rewrite_args(args(&["prnn", "--pair", "ETHUSD"])),
            args(&["prnn", "prepare", "--pair", "ETHUSD"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["prnn", "train", "--epochs", "3"])),
            args(&["prnn", "train", "--epochs", "3"])
        );
        assert_eq!(rewrite_args(args(&["prnn", "--help"])), args(&["prnn", "--help"]));
        assert_eq!(rewrite_args(args(&["prnn", "-V"])), args(&["prnn", "-V"]));
    }
}
