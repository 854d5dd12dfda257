//! The end-to-end preparation pipeline.
//!
//! load -> label -> time split -> per split: frame -> normalize -> window ->
//! balance -> shuffle/materialize. The two splits never share normalization
//! statistics or RNG state, and everything before balancing is deterministic
//! for fixed inputs.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use chrono::Utc;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::{LabeledRecord, PrepConfig, SplitFrame, SplitKind, TrainingArrays};
use crate::error::AppError;
use crate::io::loader;
use crate::prep::{
    balance_classes, class_counts, label_series, materialize, normalize_frame, split_by_time,
    window_frame,
};
use crate::report::{fmt_timestamp, PrepReport, SplitReport};

/// All computed outputs of one preparation run.
#[derive(Debug, Clone)]
pub struct PrepOutput {
    pub train: TrainingArrays,
    pub test: TrainingArrays,
    pub report: PrepReport,
}

/// Execute the full preparation pipeline and return arrays plus the report.
pub fn run_prep(config: &PrepConfig) -> Result<PrepOutput, AppError> {
    config.validate()?;

    let records = loader::load_series(config)?;
    info!("loaded {} unique records", records.len());

    let labeled = label_series(&records, config.forecast_len);
    if labeled.is_empty() {
        return Err(AppError::InvalidConfig(format!(
            "series too short: {} record(s) cannot support forecast_len={}",
            records.len(),
            config.forecast_len
        )));
    }

    let split = split_by_time(&labeled, config.testpct)?;
    info!(
        "split at {}: {} train / {} test rows",
        split.boundary,
        split.train.len(),
        split.test.len()
    );

    // Independent RNG streams per split, derived from the configured seed, so
    // each side is reproducible in isolation.
    let mut train_rng = StdRng::seed_from_u64(split_seed(config.seed, SplitKind::Train));
    let mut test_rng = StdRng::seed_from_u64(split_seed(config.seed, SplitKind::Test));

    let (train, train_report) = prepare_split(SplitKind::Train, &split.train, config, &mut train_rng)?;
    let (test, test_report) = prepare_split(SplitKind::Test, &split.test, config, &mut test_rng)?;

    let report = PrepReport {
        run_name: config.run_name(Utc::now()),
        provider: config.provider.clone(),
        pair: config.pair.clone(),
        period: config.period.clone(),
        years: config.years.clone(),
        window_len: config.window_len,
        forecast_len: config.forecast_len,
        testpct: config.testpct,
        seed: config.seed,
        rows_loaded: records.len(),
        rows_labeled: labeled.len(),
        boundary_timestamp: split.boundary,
        boundary_utc: fmt_timestamp(split.boundary),
        train: train_report,
        test: test_report,
    };

    Ok(PrepOutput {
        train,
        test,
        report,
    })
}

/// Normalize, window, balance and materialize one split.
fn prepare_split(
    kind: SplitKind,
    records: &[LabeledRecord],
    config: &PrepConfig,
    rng: &mut StdRng,
) -> Result<(TrainingArrays, SplitReport), AppError> {
    let frame = SplitFrame::from_records(kind, &config.pair, records);
    let normalized = normalize_frame(&frame)?;
    let feature_count = normalized.frame.feature_count();

    // A split too short to window degrades to an empty dataset; the error is
    // still logged so it stays distinguishable from a truly empty success.
    let samples = match window_frame(&normalized.frame, config.window_len) {
        Ok(samples) => samples,
        Err(err @ AppError::InsufficientWindow { .. }) => {
            warn!("{err}");
            Vec::new()
        }
        Err(other) => return Err(other),
    };

    let windows = samples.len();
    let class_counts_raw = class_counts(&samples);
    let balanced = balance_classes(samples, rng);
    let class_counts_balanced = class_counts(&balanced);
    let arrays = materialize(balanced, config.window_len, feature_count, rng);

    info!(
        "{} split: {} rows -> {} windows -> {} balanced samples",
        kind.display_name(),
        records.len(),
        windows,
        arrays.len()
    );

    let report = SplitReport {
        split: kind,
        rows: records.len(),
        feature_columns: normalized.frame.columns.clone(),
        skipped_columns: normalized.skipped_columns,
        dropped_rows: normalized.dropped_rows,
        windows,
        class_counts_raw,
        class_counts_balanced,
        samples: arrays.len(),
    };
    Ok((arrays, report))
}

/// Derive a per-split RNG seed from the run seed.
fn split_seed(seed: u64, kind: SplitKind) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    kind.display_name().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{write_sample_files, SampleConfig};
    use std::fs;
    use std::path::PathBuf;

    fn fixture_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("prnn-pipeline-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn write_fixture(dir: &PathBuf, years: Vec<i32>, steps: usize) {
        write_sample_files(&SampleConfig {
            data_dir: dir.clone(),
            provider: "gemini".to_string(),
            pair: "BTCUSD".to_string(),
            period: "1min".to_string(),
            years,
            steps,
            start_price: 3700.0,
            step_vol: 0.01,
            seed: 42,
        })
        .unwrap();
    }

    fn config(dir: &PathBuf, years: Vec<i32>) -> PrepConfig {
        PrepConfig {
            data_dir: dir.clone(),
            provider: "gemini".to_string(),
            pair: "BTCUSD".to_string(),
            period: "1min".to_string(),
            years,
            window_len: 10,
            forecast_len: 2,
            testpct: 0.4,
            seed: 42,
            export_report: None,
        }
    }

    #[test]
    fn end_to_end_run_honors_shape_and_balance_contracts() {
        let dir = fixture_dir("e2e");
        write_fixture(&dir, vec![2018, 2019], 400);

        let config = config(&dir, vec![2018, 2019]);
        let output = run_prep(&config).unwrap();

        for arrays in [&output.train, &output.test] {
            // X is [N, window_len, features] with y parallel to it.
            let shape = arrays.x.shape();
            assert_eq!(shape[1], config.window_len);
            assert_eq!(shape[2], 2);
            assert_eq!(arrays.y.len(), shape[0]);

            // Balancing left exactly equal class counts.
            let (down, up) = arrays.class_counts();
            assert_eq!(down, up);

            // Normalized features stay inside the unit interval.
            for &v in arrays.x.iter() {
                assert!((0.0..=1.0).contains(&v), "value {v} out of [0, 1]");
            }
            assert!(!arrays.is_empty());
        }

        assert_eq!(output.report.rows_loaded, 800);
        // The final forecast_len records of the merged series have no future value.
        assert_eq!(output.report.rows_labeled, 798);
        assert_eq!(
            output.report.train.rows + output.report.test.rows,
            output.report.rows_labeled
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reruns_with_the_same_seed_are_identical() {
        let dir = fixture_dir("seeded");
        write_fixture(&dir, vec![2019], 300);

        let config = config(&dir, vec![2019]);
        let a = run_prep(&config).unwrap();
        let b = run_prep(&config).unwrap();

        assert_eq!(a.train.x, b.train.x);
        assert_eq!(a.train.y, b.train.y);
        assert_eq!(a.test.x, b.test.x);
        assert_eq!(a.test.y, b.test.y);
        assert_eq!(a.report.boundary_timestamp, b.report.boundary_timestamp);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn window_longer_than_split_degrades_to_empty_arrays() {
        let dir = fixture_dir("short");
        write_fixture(&dir, vec![2019], 40);

        let mut config = config(&dir, vec![2019]);
        // Test split gets ~15 labeled rows; a 20-record window cannot fit.
        config.window_len = 20;
        let output = run_prep(&config).unwrap();

        assert!(output.test.is_empty());
        assert_eq!(output.test.x.shape(), &[0, 20, 2]);
        assert_eq!(output.report.test.windows, 0);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_year_aborts_the_run() {
        let dir = fixture_dir("missing");
        write_fixture(&dir, vec![2019], 50);

        let config = config(&dir, vec![2018, 2019]);
        let err = run_prep(&config).unwrap_err();
        assert!(matches!(err, AppError::DataNotFound { .. }));

        fs::remove_dir_all(&dir).unwrap();
    }
}
