//! Run reporting: per-split counters and formatted terminal output.
//!
//! Formatting lives in one place so the pipeline code stays clean and output
//! changes are localized. The same [`PrepReport`] backs the terminal summary
//! and the JSON export.

use chrono::{TimeZone, Utc};
use serde::Serialize;

use crate::domain::SplitKind;

/// Counters for one split's journey through the pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct SplitReport {
    pub split: SplitKind,
    /// Labeled rows entering the split.
    pub rows: usize,
    /// Feature columns that survived normalization.
    pub feature_columns: Vec<String>,
    /// Zero-variance columns dropped during normalization.
    pub skipped_columns: Vec<String>,
    /// Rows dropped for non-finite values after normalization.
    pub dropped_rows: usize,
    /// Window samples emitted before balancing.
    pub windows: usize,
    /// `[down, up]` counts before balancing.
    pub class_counts_raw: [usize; 2],
    /// `[down, up]` counts after balancing (always equal on success).
    pub class_counts_balanced: [usize; 2],
    /// Final sample count handed to the trainer.
    pub samples: usize,
}

/// Everything worth knowing about one preparation run.
#[derive(Debug, Clone, Serialize)]
pub struct PrepReport {
    pub run_name: String,
    pub provider: String,
    pub pair: String,
    pub period: String,
    pub years: Vec<i32>,
    pub window_len: usize,
    pub forecast_len: usize,
    pub testpct: f64,
    pub seed: u64,
    /// Unique records after loading and deduplication.
    pub rows_loaded: usize,
    /// Records that survived labeling (the trailing horizon is dropped).
    pub rows_labeled: usize,
    /// First timestamp belonging to the test split.
    pub boundary_timestamp: i64,
    /// UTC rendering of the boundary, when the timestamp plausibly is epoch seconds.
    pub boundary_utc: Option<String>,
    pub train: SplitReport,
    pub test: SplitReport,
}

/// Evaluation outcome of a training collaborator run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainSummary {
    pub trainer: String,
    pub accuracy: f64,
    pub n_train: usize,
    pub n_test: usize,
}

/// Render an epoch timestamp as UTC when it plausibly is one in seconds.
///
/// Dumps from some vintages store milliseconds; those fall outside the
/// plausible-seconds range and render as `None` rather than a wrong date.
pub fn fmt_timestamp(ts: i64) -> Option<String> {
    if !(1_000_000_000..100_000_000_000).contains(&ts) {
        return None;
    }
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
}

/// Format the full run summary for the terminal.
pub fn format_prep_summary(report: &PrepReport) -> String {
    let mut out = String::new();

    out.push_str("=== prnn - training-window preparation ===\n");
    out.push_str(&format!("Run: {}\n", report.run_name));
    out.push_str(&format!(
        "Source: {} {} {} | years {}\n",
        report.provider,
        report.pair,
        report.period,
        join_years(&report.years)
    ));
    out.push_str(&format!(
        "Windowing: window_len={} forecast_len={} | testpct={} seed={}\n",
        report.window_len, report.forecast_len, report.testpct, report.seed
    ));
    out.push_str(&format!(
        "Loaded: {} unique records, {} labeled\n",
        report.rows_loaded, report.rows_labeled
    ));
    match &report.boundary_utc {
        Some(utc) => out.push_str(&format!(
            "Split boundary: {} ({utc})\n",
            report.boundary_timestamp
        )),
        None => out.push_str(&format!("Split boundary: {}\n", report.boundary_timestamp)),
    }

    out.push('\n');
    format_split(&mut out, &report.train);
    out.push('\n');
    format_split(&mut out, &report.test);

    out
}

fn format_split(out: &mut String, s: &SplitReport) {
    out.push_str(&format!("{} split:\n", s.split.display_name()));
    out.push_str(&format!(
        "- rows: {} | windows: {} | dropped rows: {}\n",
        s.rows, s.windows, s.dropped_rows
    ));
    out.push_str(&format!("- features: {}\n", s.feature_columns.join(", ")));
    if !s.skipped_columns.is_empty() {
        out.push_str(&format!(
            "- skipped zero-variance: {}\n",
            s.skipped_columns.join(", ")
        ));
    }
    out.push_str(&format!(
        "- class counts: down={} up={} -> balanced down={} up={}\n",
        s.class_counts_raw[0],
        s.class_counts_raw[1],
        s.class_counts_balanced[0],
        s.class_counts_balanced[1]
    ));
    out.push_str(&format!("- samples: {}\n", s.samples));
}

/// Format the trainer outcome line.
pub fn format_train_summary(summary: &TrainSummary) -> String {
    format!(
        "{}: accuracy {:.4} on {} test samples ({} train samples)\n",
        summary.trainer, summary.accuracy, summary.n_test, summary.n_train
    )
}

fn join_years(years: &[i32]) -> String {
    let parts: Vec<String> = years.iter().map(|y| y.to_string()).collect();
    parts.join(", ")
}
