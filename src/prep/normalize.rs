//! Per-split min-max normalization.
//!
//! Scaling statistics come from the split being normalized and nothing else;
//! train statistics never touch test data and vice versa. A zero-spread
//! column cannot be scaled and is surfaced explicitly instead of silently
//! turning into NaN.

use log::{debug, warn};

use crate::domain::{SplitFrame, SplitKind};
use crate::error::AppError;

/// Inclusive value range of one feature column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStats {
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Scale a value into `[0, 1]` relative to this range.
    pub fn scale(&self, v: f64) -> f64 {
        (v - self.min) / (self.max - self.min)
    }
}

/// What the normalizer did to one split.
#[derive(Debug, Clone)]
pub struct NormalizedFrame {
    /// The rescaled frame; degenerate columns are absent from it.
    pub frame: SplitFrame,
    /// Zero-variance columns that were dropped, by name.
    pub skipped_columns: Vec<String>,
    /// Rows discarded for carrying a non-finite value after scaling.
    pub dropped_rows: usize,
}

/// Min/max of one column; zero spread is an error, not a NaN factory.
pub fn column_stats(
    split: SplitKind,
    column: &str,
    values: impl Iterator<Item = f64>,
) -> Result<ColumnStats, AppError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }

    if !min.is_finite() || !max.is_finite() || max == min {
        return Err(AppError::DegenerateColumn {
            split,
            column: column.to_string(),
        });
    }
    Ok(ColumnStats { min, max })
}

/// Rescale every feature column of `frame` to `[0, 1]` using min/max computed
/// from that frame alone.
///
/// Degenerate (zero-spread) columns are skipped with a diagnostic; the stage
/// fails only when no usable feature column remains. Rows containing a
/// non-finite value after scaling are dropped and counted.
pub fn normalize_frame(frame: &SplitFrame) -> Result<NormalizedFrame, AppError> {
    let mut kept: Vec<(usize, ColumnStats)> = Vec::with_capacity(frame.feature_count());
    let mut skipped_columns = Vec::new();

    for (idx, name) in frame.columns.iter().enumerate() {
        let values = frame.rows.iter().map(|row| row[idx]);
        match column_stats(frame.split, name, values) {
            Ok(stats) => kept.push((idx, stats)),
            Err(err @ AppError::DegenerateColumn { .. }) => {
                warn!("skipping column: {err}");
                skipped_columns.push(name.clone());
            }
            Err(other) => return Err(other),
        }
    }

    if kept.is_empty() {
        return Err(AppError::DegenerateColumn {
            split: frame.split,
            column: frame.columns.join(", "),
        });
    }

    let mut timestamps = Vec::with_capacity(frame.len());
    let mut rows = Vec::with_capacity(frame.len());
    let mut targets = Vec::with_capacity(frame.len());
    let mut dropped_rows = 0usize;

    for ((&ts, row), &target) in frame
        .timestamps
        .iter()
        .zip(&frame.rows)
        .zip(&frame.targets)
    {
        let scaled: Vec<f64> = kept.iter().map(|(idx, stats)| stats.scale(row[*idx])).collect();
        if scaled.iter().any(|v| !v.is_finite()) {
            dropped_rows += 1;
            continue;
        }
        timestamps.push(ts);
        rows.push(scaled);
        targets.push(target);
    }

    if dropped_rows > 0 {
        warn!(
            "dropped {dropped_rows} row(s) with non-finite values from the {} split",
            frame.split.display_name()
        );
    }
    debug!(
        "normalized {} split: {} columns kept, {} skipped",
        frame.split.display_name(),
        kept.len(),
        skipped_columns.len()
    );

    Ok(NormalizedFrame {
        frame: SplitFrame {
            split: frame.split,
            columns: kept
                .iter()
                .map(|(idx, _)| frame.columns[*idx].clone())
                .collect(),
            timestamps,
            rows,
            targets,
        },
        skipped_columns,
        dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(rows: Vec<Vec<f64>>) -> SplitFrame {
        let n = rows.len();
        SplitFrame {
            split: SplitKind::Train,
            columns: vec!["BTCUSD_close".to_string(), "BTCUSD_volume".to_string()],
            timestamps: (0..n as i64).collect(),
            rows,
            targets: vec![0; n],
        }
    }

    #[test]
    fn scaled_values_stay_within_unit_interval() {
        let f = frame(vec![
            vec![10.0, 100.0],
            vec![20.0, 50.0],
            vec![15.0, 75.0],
            vec![12.5, 60.0],
        ]);
        let normalized = normalize_frame(&f).unwrap();

        assert_eq!(normalized.frame.len(), 4);
        for row in &normalized.frame.rows {
            for &v in row {
                assert!((0.0..=1.0).contains(&v), "value {v} out of [0, 1]");
            }
        }
        // Extremes map exactly to the interval ends.
        assert_eq!(normalized.frame.rows[0][0], 0.0);
        assert_eq!(normalized.frame.rows[1][0], 1.0);
    }

    #[test]
    fn zero_spread_column_is_an_error_not_nan() {
        let err = column_stats(SplitKind::Train, "BTCUSD_close", [5.0, 5.0, 5.0].into_iter())
            .unwrap_err();
        assert!(matches!(err, AppError::DegenerateColumn { .. }));
    }

    #[test]
    fn degenerate_column_is_skipped_and_reported() {
        // Constant volume; close still varies.
        let f = frame(vec![vec![10.0, 7.0], vec![20.0, 7.0], vec![30.0, 7.0]]);
        let normalized = normalize_frame(&f).unwrap();

        assert_eq!(normalized.skipped_columns, vec!["BTCUSD_volume"]);
        assert_eq!(normalized.frame.columns, vec!["BTCUSD_close"]);
        assert_eq!(normalized.frame.feature_count(), 1);
        assert_eq!(normalized.frame.rows[1], vec![0.5]);
    }

    #[test]
    fn all_columns_degenerate_fails() {
        let f = frame(vec![vec![7.0, 7.0], vec![7.0, 7.0]]);
        let err = normalize_frame(&f).unwrap_err();
        assert!(matches!(err, AppError::DegenerateColumn { .. }));
    }

    #[test]
    fn non_finite_rows_are_dropped() {
        let f = frame(vec![
            vec![10.0, 100.0],
            vec![f64::NAN, 50.0],
            vec![20.0, 75.0],
        ]);
        let normalized = normalize_frame(&f).unwrap();
        assert_eq!(normalized.dropped_rows, 1);
        assert_eq!(normalized.frame.len(), 2);
        assert_eq!(normalized.frame.timestamps, vec![0, 2]);
    }

    #[test]
    fn statistics_are_local_to_the_frame() {
        // Same shape, different ranges: each frame scales by its own extremes.
        let a = normalize_frame(&frame(vec![vec![0.0, 1.0], vec![10.0, 2.0]])).unwrap();
        let b = normalize_frame(&frame(vec![vec![100.0, 1.0], vec![300.0, 2.0]])).unwrap();
        assert_eq!(a.frame.rows[1][0], 1.0);
        assert_eq!(b.frame.rows[1][0], 1.0);
    }
}
