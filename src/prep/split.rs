//! Temporal train/test partitioning.
//!
//! The cut is made on *distinct timestamps*, never on row counts, and no
//! shuffling happens before it. Everything at or after the boundary timestamp
//! is test data, so `max(train timestamps) < min(test timestamps)` always
//! holds on success.

use log::debug;

use crate::domain::LabeledRecord;
use crate::error::AppError;

/// A time-disjoint partition plus the boundary that produced it.
#[derive(Debug, Clone)]
pub struct TimeSplit {
    pub train: Vec<LabeledRecord>,
    pub test: Vec<LabeledRecord>,
    /// First timestamp belonging to the test split.
    pub boundary: i64,
}

/// Partition a labeled series so the last `testpct` of distinct timestamps
/// becomes the test split.
///
/// The boundary index is `ceil((1 - testpct) * n)` over the ascending distinct
/// timestamps, clamped to `[1, n - 1]` so both splits stay non-empty. Input
/// order is preserved within each split.
pub fn split_by_time(records: &[LabeledRecord], testpct: f64) -> Result<TimeSplit, AppError> {
    if !(testpct > 0.0 && testpct < 1.0) {
        return Err(AppError::InvalidConfig(format!(
            "testpct must be in (0, 1), got {testpct}"
        )));
    }

    let mut times: Vec<i64> = records.iter().map(|r| r.timestamp).collect();
    times.sort_unstable();
    times.dedup();
    if times.len() < 2 {
        return Err(AppError::InvalidConfig(format!(
            "need at least 2 distinct timestamps to split, got {}",
            times.len()
        )));
    }

    let n = times.len();
    let cut = (((1.0 - testpct) * n as f64).ceil() as usize).clamp(1, n - 1);
    let boundary = times[cut];

    let mut train = Vec::new();
    let mut test = Vec::new();
    for r in records {
        if r.timestamp < boundary {
            train.push(*r);
        } else {
            test.push(*r);
        }
    }

    debug!(
        "split {} rows at timestamp {boundary}: {} train / {} test",
        records.len(),
        train.len(),
        test.len()
    );
    Ok(TimeSplit {
        train,
        test,
        boundary,
    })
}
