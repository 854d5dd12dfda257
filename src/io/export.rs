//! Run-report JSON export.
//!
//! The report is the portable record of one preparation run: configuration,
//! split boundary, per-split counters and final array shapes. Its schema is
//! defined by `report::PrepReport`.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;
use crate::report::PrepReport;

/// Write the run report as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &PrepReport) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::io(format!(
            "Failed to create report JSON '{}': {e}",
            path.display()
        ))
    })?;
    serde_json::to_writer_pretty(file, report)
        .map_err(|e| AppError::io(format!("Failed to write report JSON: {e}")))?;
    Ok(())
}
