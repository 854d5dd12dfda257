//! Direction labeling: forward-shifted future price to binary target.

use log::debug;

use crate::domain::{LabeledRecord, PriceRecord};

/// `1` only when the future close is strictly above the current close.
///
/// An exactly flat move is not an increase and classifies as `0`.
pub fn classify(current: f64, future: f64) -> u8 {
    if future > current { 1 } else { 0 }
}

/// Pair each record with the close `forecast_len` steps ahead and derive its
/// direction label.
///
/// The last `forecast_len` records have no valid future value and are dropped.
/// A series no longer than `forecast_len` yields an empty result.
pub fn label_series(records: &[PriceRecord], forecast_len: usize) -> Vec<LabeledRecord> {
    if records.len() <= forecast_len {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(records.len() - forecast_len);
    for i in 0..records.len() - forecast_len {
        let current = records[i];
        let future_close = records[i + forecast_len].close;
        out.push(LabeledRecord {
            timestamp: current.timestamp,
            close: current.close,
            volume: current.volume,
            future_close,
            target: classify(current.close, future_close),
        });
    }

    debug!(
        "labeled {} of {} records (forecast_len={forecast_len})",
        out.len(),
        records.len()
    );
    out
}
