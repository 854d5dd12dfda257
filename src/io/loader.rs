//! Source-file discovery and CSV ingest.
//!
//! Turns a directory of per-year exchange dumps into one time-indexed series:
//!
//! - file names encode provider, pair, year and period
//! - leading preamble/header lines are detected from content, not configured
//! - duplicate timestamps across files resolve last-write-wins
//! - the merged series is time-sorted with unique timestamps

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use log::{debug, info};
use rayon::prelude::*;

use crate::domain::{PrepConfig, PriceRecord};
use crate::error::AppError;

/// Expected data-row schema of the raw dumps, in field order.
pub const RAW_COLUMNS: [&str; 8] = [
    "time", "date", "symbol", "open", "high", "low", "close", "volume",
];

/// One discovered source file and the year token that matched it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub year: i32,
}

/// Human-readable form of the name pattern, for error messages.
pub fn file_pattern(config: &PrepConfig) -> String {
    format!(
        "{}_{}_{{year}}_{}.csv",
        config.provider, config.pair, config.period
    )
}

/// Load, merge and time-sort all records for the configured years.
pub fn load_series(config: &PrepConfig) -> Result<Vec<PriceRecord>, AppError> {
    let files = discover_files(config)?;
    info!(
        "loading {} file(s) for {} {}",
        files.len(),
        config.pair,
        config.period
    );

    // Files parse in parallel; the merge below re-establishes filename order.
    let mut parsed: Vec<(PathBuf, Vec<PriceRecord>)> = files
        .par_iter()
        .map(|f| parse_file(&f.path).map(|records| (f.path.clone(), records)))
        .collect::<Result<_, _>>()?;
    parsed.sort_by(|a, b| a.0.cmp(&b.0));

    // Later files win on duplicate timestamps; the BTreeMap keeps the result
    // time-sorted and timestamp-unique.
    let mut merged: BTreeMap<i64, PriceRecord> = BTreeMap::new();
    for (path, records) in parsed {
        debug!("{}: {} data rows", path.display(), records.len());
        for r in records {
            merged.insert(r.timestamp, r);
        }
    }

    Ok(merged.into_values().collect())
}

/// Find `{provider}_{pair}_{year}_{period}.csv` files for the requested years.
///
/// Every requested year must be covered by at least one file. The directory is
/// scanned non-recursively; results come back in filename order.
pub fn discover_files(config: &PrepConfig) -> Result<Vec<SourceFile>, AppError> {
    let entries = match fs::read_dir(&config.data_dir) {
        Ok(entries) => entries,
        Err(_) => {
            return Err(AppError::DataNotFound {
                data_dir: config.data_dir.clone(),
                pattern: file_pattern(config),
                missing_years: config.years.clone(),
            });
        }
    };

    let mut files = Vec::new();
    let mut found_years: BTreeSet<i32> = BTreeSet::new();
    for entry in entries.flatten() {
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(year) = match_source_name(name, config) {
            if config.years.contains(&year) {
                found_years.insert(year);
                files.push(SourceFile { path, year });
            }
        }
    }

    let missing_years: Vec<i32> = config
        .years
        .iter()
        .copied()
        .filter(|y| !found_years.contains(y))
        .collect();
    if !missing_years.is_empty() {
        return Err(AppError::DataNotFound {
            data_dir: config.data_dir.clone(),
            pattern: file_pattern(config),
            missing_years,
        });
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

/// Extract the year token from a `{provider}_{pair}_{year}_{period}.csv` name.
fn match_source_name(name: &str, config: &PrepConfig) -> Option<i32> {
    let prefix = format!("{}_{}_", config.provider, config.pair);
    let suffix = format!("_{}.csv", config.period);
    let year = name.strip_prefix(prefix.as_str())?.strip_suffix(suffix.as_str())?;
    if year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()) {
        year.parse().ok()
    } else {
        None
    }
}

/// Parse one dump, skipping however many preamble/header lines it carries.
///
/// Exchange dumps differ in their leading lines (download URLs, column-name
/// headers); rather than a per-file skip count, every leading line that does
/// not parse as a data row is skipped. Parsing is strict from the first data
/// row onward: a malformed row mid-file is a schema error, not more preamble.
pub fn parse_file(path: &Path) -> Result<Vec<PriceRecord>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open '{}': {e}", path.display())))?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut records = Vec::new();
    let mut in_data = false;
    for (idx, result) in reader.records().enumerate() {
        let line = idx + 1;
        let record = result.map_err(|e| AppError::Schema {
            path: path.to_path_buf(),
            line,
            message: format!("CSV parse error: {e}"),
        })?;

        match parse_row(&record) {
            Ok(r) => {
                in_data = true;
                records.push(r);
            }
            Err(message) if !in_data => {
                debug!("{}:{line}: skipping preamble: {message}", path.display());
            }
            Err(message) => {
                return Err(AppError::Schema {
                    path: path.to_path_buf(),
                    line,
                    message,
                });
            }
        }
    }

    if records.is_empty() {
        return Err(AppError::Schema {
            path: path.to_path_buf(),
            line: 0,
            message: "no data rows found".to_string(),
        });
    }
    Ok(records)
}

/// Project one 8-field data row to `(timestamp, close, volume)`.
///
/// The untouched numeric fields (open/high/low) must still parse for the row
/// to count as data; otherwise preamble lines with the right field count
/// could slip through.
fn parse_row(record: &StringRecord) -> Result<PriceRecord, String> {
    if record.len() != RAW_COLUMNS.len() {
        return Err(format!(
            "expected {} fields, got {}",
            RAW_COLUMNS.len(),
            record.len()
        ));
    }

    let timestamp = parse_timestamp(&record[0])?;
    for (name, idx) in [("open", 3), ("high", 4), ("low", 5)] {
        parse_field(name, &record[idx])?;
    }
    let close = parse_field("close", &record[6])?;
    let volume = parse_field("volume", &record[7])?;

    Ok(PriceRecord {
        timestamp,
        close,
        volume,
    })
}

/// Timestamps arrive as plain integers or scientific notation depending on the
/// dump vintage; both forms round to the same integer ordering key.
fn parse_timestamp(raw: &str) -> Result<i64, String> {
    let v: f64 = raw
        .parse()
        .map_err(|_| format!("non-numeric time value '{raw}'"))?;
    if !v.is_finite() {
        return Err(format!("non-finite time value '{raw}'"));
    }
    Ok(v.round() as i64)
}

fn parse_field(name: &str, raw: &str) -> Result<f64, String> {
    let v: f64 = raw
        .parse()
        .map_err(|_| format!("non-numeric {name} value '{raw}'"))?;
    if !v.is_finite() {
        return Err(format!("non-finite {name} value '{raw}'"));
    }
    Ok(v)
}
