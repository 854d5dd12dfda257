//! Shared domain types for the preparation pipeline.
//!
//! Every stage takes and returns concrete values from this module, so the
//! pipeline can be exercised stage-by-stage in tests without touching the
//! filesystem. All of these are derived, immutable, single-pass artifacts;
//! nothing here is persisted between runs.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use ndarray::{Array1, Array3};
use serde::Serialize;

use crate::error::AppError;

/// One raw observation, keyed by its epoch timestamp.
///
/// Timestamps are treated as an opaque ordering key: they are stored as given
/// in the source files and never re-interpreted or rescaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRecord {
    pub timestamp: i64,
    pub close: f64,
    pub volume: f64,
}

/// A record extended with its forward-shifted future price and direction label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabeledRecord {
    pub timestamp: i64,
    pub close: f64,
    pub volume: f64,
    /// Close price `forecast_len` steps ahead of this record.
    pub future_close: f64,
    /// `1` when the future close is strictly above the current close, else `0`.
    pub target: u8,
}

/// Which side of the temporal cut a dataset belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitKind {
    Train,
    Test,
}

impl SplitKind {
    /// Human-readable label for diagnostics and summaries.
    pub fn display_name(self) -> &'static str {
        match self {
            SplitKind::Train => "train",
            SplitKind::Test => "test",
        }
    }
}

/// Column-oriented view of one split: named feature columns plus the label.
///
/// Feature columns are qualified by pair (`BTCUSD_close`, `BTCUSD_volume`) so
/// diagnostics stay unambiguous when reports from different pairs are compared.
/// The future-price column used for labeling is deliberately absent; only
/// close and volume survive into the feature set.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitFrame {
    pub split: SplitKind,
    /// Feature column names; `rows[i].len() == columns.len()`.
    pub columns: Vec<String>,
    pub timestamps: Vec<i64>,
    /// Row-major feature values, in time order.
    pub rows: Vec<Vec<f64>>,
    /// Direction label per row, parallel to `rows`.
    pub targets: Vec<u8>,
}

impl SplitFrame {
    /// Build a frame from time-ordered labeled records.
    pub fn from_records(split: SplitKind, pair: &str, records: &[LabeledRecord]) -> Self {
        let columns = vec![format!("{pair}_close"), format!("{pair}_volume")];
        let mut timestamps = Vec::with_capacity(records.len());
        let mut rows = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());
        for r in records {
            timestamps.push(r.timestamp);
            rows.push(vec![r.close, r.volume]);
            targets.push(r.target);
        }
        Self {
            split,
            columns,
            timestamps,
            rows,
            targets,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.columns.len()
    }
}

/// A fixed-length run of feature rows paired with the direction label of the
/// record that completed the window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSample {
    /// `window_len` consecutive feature rows, oldest first.
    pub window: Vec<Vec<f64>>,
    /// Direction label in `{0, 1}`.
    pub label: u8,
}

/// Dense, shuffled output of one split, ready for a trainer.
#[derive(Debug, Clone)]
pub struct TrainingArrays {
    /// `[samples, window_len, features]`.
    pub x: Array3<f64>,
    /// Direction labels in `{0, 1}`; `y.len() == x.shape()[0]`.
    pub y: Array1<u8>,
}

impl TrainingArrays {
    pub fn len(&self) -> usize {
        self.x.shape()[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(down, up)` label counts.
    pub fn class_counts(&self) -> (usize, usize) {
        let up = self.y.iter().filter(|&&label| label == 1).count();
        (self.y.len() - up, up)
    }
}

/// A full preparation run's configuration, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct PrepConfig {
    /// Directory containing per-year price dumps.
    pub data_dir: PathBuf,
    /// Data provider token in file names (e.g. `gemini`).
    pub provider: String,
    /// Trading pair symbol (uppercase, e.g. `BTCUSD`).
    pub pair: String,
    /// Sampling period label in file names (e.g. `1min`).
    pub period: String,
    /// Years whose files are loaded.
    pub years: Vec<i32>,
    /// Look-back window length (records per training sample).
    pub window_len: usize,
    /// Forecast horizon (records ahead used to compute the label).
    pub forecast_len: usize,
    /// Fraction of distinct timestamps reserved for the test split.
    pub testpct: f64,
    /// Seed for balancing/shuffling randomness.
    pub seed: u64,
    /// Optional run-report JSON destination.
    pub export_report: Option<PathBuf>,
}

impl PrepConfig {
    /// Reject configurations the pipeline cannot honor.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.pair.is_empty() {
            return Err(AppError::InvalidConfig("pair must not be empty".to_string()));
        }
        if self.years.is_empty() {
            return Err(AppError::InvalidConfig(
                "at least one year must be selected".to_string(),
            ));
        }
        if self.window_len == 0 {
            return Err(AppError::InvalidConfig("window_len must be >= 1".to_string()));
        }
        if self.forecast_len == 0 {
            return Err(AppError::InvalidConfig(
                "forecast_len must be >= 1".to_string(),
            ));
        }
        if !(self.testpct > 0.0 && self.testpct < 1.0) {
            return Err(AppError::InvalidConfig(format!(
                "testpct must be in (0, 1), got {}",
                self.testpct
            )));
        }
        Ok(())
    }

    /// Bookkeeping label for this run: pair, window and forecast lengths plus
    /// the start time.
    pub fn run_name(&self, started_at: DateTime<Utc>) -> String {
        format!(
            "{}-{}-window-{}-pred-{}",
            self.pair,
            self.window_len,
            self.forecast_len,
            started_at.timestamp()
        )
    }
}

/// Options the preparation core carries through untouched for the trainer.
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub batch_size: usize,
    pub epochs: usize,
    pub hidden_node_sizes: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PrepConfig {
        PrepConfig {
            data_dir: PathBuf::from("data"),
            provider: "gemini".to_string(),
            pair: "BTCUSD".to_string(),
            period: "1min".to_string(),
            years: vec![2019],
            window_len: 60,
            forecast_len: 3,
            testpct: 0.4,
            seed: 42,
            export_report: None,
        }
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_testpct() {
        for bad in [0.0, 1.0, -0.1, 1.5] {
            let mut c = config();
            c.testpct = bad;
            assert!(c.validate().is_err(), "testpct {bad} should be rejected");
        }
    }

    #[test]
    fn validate_rejects_zero_lengths() {
        let mut c = config();
        c.window_len = 0;
        assert!(c.validate().is_err());

        let mut c = config();
        c.forecast_len = 0;
        assert!(c.validate().is_err());
    }

    #[test]
    fn frame_carries_pair_qualified_columns() {
        let records = vec![
            LabeledRecord {
                timestamp: 1,
                close: 10.0,
                volume: 5.0,
                future_close: 11.0,
                target: 1,
            },
            LabeledRecord {
                timestamp: 2,
                close: 11.0,
                volume: 6.0,
                future_close: 11.0,
                target: 0,
            },
        ];
        let frame = SplitFrame::from_records(SplitKind::Train, "BTCUSD", &records);
        assert_eq!(frame.columns, vec!["BTCUSD_close", "BTCUSD_volume"]);
        assert_eq!(frame.len(), 2);
        assert_eq!(frame.rows[0], vec![10.0, 5.0]);
        assert_eq!(frame.targets, vec![1, 0]);
    }

    #[test]
    fn run_name_encodes_window_and_forecast() {
        let started = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let name = config().run_name(started);
        assert_eq!(name, "BTCUSD-60-window-3-pred-1700000000");
    }
}
