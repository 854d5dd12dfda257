//! Sliding-window sequence assembly.
//!
//! A FIFO buffer holds the most recent `window_len` feature rows; the oldest
//! row is evicted on overflow. Each incoming row is appended, and once the
//! buffer is full a sample is emitted pairing the buffer contents with the
//! label of the row that completed it. The label already looks
//! `forecast_len` steps ahead, so no further shifting happens here.

use std::collections::VecDeque;

use log::debug;

use crate::domain::{SplitFrame, WindowSample};
use crate::error::AppError;

/// Slide a `window_len` buffer over a normalized, time-ordered frame.
///
/// The first `window_len - 1` rows warm the buffer and emit nothing, so a
/// frame of `L` rows yields exactly `L - window_len + 1` samples, in input
/// order. A frame shorter than `window_len` cannot produce a single window
/// and fails with an error distinguishable from a successful empty result.
pub fn window_frame(frame: &SplitFrame, window_len: usize) -> Result<Vec<WindowSample>, AppError> {
    if window_len == 0 {
        return Err(AppError::InvalidConfig("window_len must be >= 1".to_string()));
    }
    if frame.len() < window_len {
        return Err(AppError::InsufficientWindow {
            split: frame.split,
            rows: frame.len(),
            window_len,
        });
    }

    let mut buffer: VecDeque<Vec<f64>> = VecDeque::with_capacity(window_len);
    let mut samples = Vec::with_capacity(frame.len() - window_len + 1);

    for (row, &target) in frame.rows.iter().zip(&frame.targets) {
        if buffer.len() == window_len {
            buffer.pop_front();
        }
        buffer.push_back(row.clone());
        if buffer.len() == window_len {
            samples.push(WindowSample {
                window: buffer.iter().cloned().collect(),
                label: target,
            });
        }
    }

    debug!(
        "windowed {} split: {} rows -> {} samples (window_len={window_len})",
        frame.split.display_name(),
        frame.len(),
        samples.len()
    );
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SplitKind;

    /// A ramp frame where row `i` holds `[i, i + 0.5]` and is labeled `i % 2`.
    fn ramp(n: usize) -> SplitFrame {
        SplitFrame {
            split: SplitKind::Train,
            columns: vec!["BTCUSD_close".to_string(), "BTCUSD_volume".to_string()],
            timestamps: (0..n as i64).collect(),
            rows: (0..n).map(|i| vec![i as f64, i as f64 + 0.5]).collect(),
            targets: (0..n).map(|i| (i % 2) as u8).collect(),
        }
    }

    #[test]
    fn emits_exactly_len_minus_window_plus_one_samples() {
        for (len, window_len) in [(10, 3), (10, 10), (100, 60), (5, 1)] {
            let samples = window_frame(&ramp(len), window_len).unwrap();
            assert_eq!(samples.len(), len - window_len + 1, "L={len}, w={window_len}");
        }
    }

    #[test]
    fn windows_hold_consecutive_rows_in_order() {
        let samples = window_frame(&ramp(10), 4).unwrap();
        for (k, sample) in samples.iter().enumerate() {
            assert_eq!(sample.window.len(), 4);
            for (t, row) in sample.window.iter().enumerate() {
                assert_eq!(row[0], (k + t) as f64);
                assert_eq!(row[1], (k + t) as f64 + 0.5);
            }
        }
    }

    #[test]
    fn label_comes_from_the_record_completing_the_window() {
        let samples = window_frame(&ramp(10), 3).unwrap();
        // Sample k is completed by row k + 2.
        for (k, sample) in samples.iter().enumerate() {
            assert_eq!(sample.label, ((k + 2) % 2) as u8);
        }
    }

    #[test]
    fn short_frame_is_insufficient_not_empty() {
        let err = window_frame(&ramp(5), 6).unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientWindow {
                rows: 5,
                window_len: 6,
                ..
            }
        ));
    }

    #[test]
    fn full_length_window_emits_one_sample() {
        let samples = window_frame(&ramp(7), 7).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].window[0][0], 0.0);
        assert_eq!(samples[0].window[6][0], 6.0);
        assert_eq!(samples[0].label, 0);
    }
}
