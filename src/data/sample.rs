//! Synthetic price-walk generation.
//!
//! Generates seeded geometric random-walk candles and writes them with the
//! same file naming, preamble line, header row and 8-column schema as real
//! exchange dumps, so the loader's discovery and header-detection paths are
//! exercised end-to-end without shipping real data.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{TimeZone, Utc};
use log::info;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::PriceRecord;
use crate::error::AppError;

/// Synthetic dump generation settings, derived from CLI flags.
#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub data_dir: PathBuf,
    pub provider: String,
    pub pair: String,
    pub period: String,
    pub years: Vec<i32>,
    /// Records per file.
    pub steps: usize,
    /// Starting price of the walk.
    pub start_price: f64,
    /// Per-step log-return volatility.
    pub step_vol: f64,
    pub seed: u64,
}

/// Map a period label to its step length in seconds.
pub fn period_step_secs(period: &str) -> Result<i64, AppError> {
    match period {
        "1min" => Ok(60),
        "5min" => Ok(300),
        "15min" => Ok(900),
        "1h" | "60min" => Ok(3_600),
        "1d" | "day" => Ok(86_400),
        other => Err(AppError::InvalidConfig(format!(
            "unknown period label '{other}'"
        ))),
    }
}

/// Generate `steps` records of a seeded geometric random walk.
///
/// Prices follow `p * exp(step_vol * z)` with standard normal `z`; volumes are
/// log-normal around a fixed base. Identical arguments reproduce identical
/// records.
pub fn generate_records(
    seed: u64,
    start_ts: i64,
    step_secs: i64,
    steps: usize,
    start_price: f64,
    step_vol: f64,
) -> Result<Vec<PriceRecord>, AppError> {
    if !(start_price.is_finite() && start_price > 0.0) {
        return Err(AppError::InvalidConfig(format!(
            "start_price must be positive, got {start_price}"
        )));
    }
    if !(step_vol.is_finite() && step_vol >= 0.0) {
        return Err(AppError::InvalidConfig(format!(
            "step_vol must be non-negative, got {step_vol}"
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::io(format!("Noise distribution error: {e}")))?;

    let mut records = Vec::with_capacity(steps);
    let mut price = start_price;
    for i in 0..steps {
        let z: f64 = normal.sample(&mut rng);
        price = (price * (step_vol * z).exp()).max(1e-6);
        let volume_noise: f64 = normal.sample(&mut rng);
        let volume = 50.0 * (0.8 * volume_noise).exp();

        records.push(PriceRecord {
            timestamp: start_ts + i as i64 * step_secs,
            close: price,
            volume,
        });
    }
    Ok(records)
}

/// Write one synthetic dump per configured year, named
/// `{provider}_{pair}_{year}_{period}.csv`, and return the written paths.
pub fn write_sample_files(config: &SampleConfig) -> Result<Vec<PathBuf>, AppError> {
    if config.steps == 0 {
        return Err(AppError::InvalidConfig("steps must be >= 1".to_string()));
    }
    let step_secs = period_step_secs(&config.period)?;

    fs::create_dir_all(&config.data_dir).map_err(|e| {
        AppError::io(format!(
            "Failed to create data dir '{}': {e}",
            config.data_dir.display()
        ))
    })?;

    let mut written = Vec::with_capacity(config.years.len());
    for &year in &config.years {
        let start_ts = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| AppError::InvalidConfig(format!("invalid year {year}")))?
            .timestamp();

        let records = generate_records(
            year_seed(config.seed, year),
            start_ts,
            step_secs,
            config.steps,
            config.start_price,
            config.step_vol,
        )?;

        let name = format!(
            "{}_{}_{}_{}.csv",
            config.provider, config.pair, year, config.period
        );
        let path = config.data_dir.join(name);
        write_dump(&path, &config.pair, &records)?;
        info!("wrote {} ({} records)", path.display(), records.len());
        written.push(path);
    }
    Ok(written)
}

/// Per-year walk seed: each file gets its own stream, but the whole set is
/// still determined by the configured seed.
fn year_seed(seed: u64, year: i32) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    year.hash(&mut hasher);
    hasher.finish()
}

/// Write records as a raw dump: preamble line, header row, 8-column data rows.
fn write_dump(path: &Path, pair: &str, records: &[PriceRecord]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create '{}': {e}", path.display())))?;

    // Real dumps lead with a download-source line and a column header; the
    // loader is expected to skip both.
    writeln!(file, "https://data.example.local/{pair}")
        .and_then(|_| writeln!(file, "time,date,symbol,open,high,low,close,volume"))
        .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", path.display())))?;

    for r in records {
        let date = Utc
            .timestamp_opt(r.timestamp, 0)
            .single()
            .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_default();
        // Open/high/low are derived from close; the pipeline only reads
        // close and volume, the rest just has to parse as numeric.
        writeln!(
            file,
            "{},{},{},{:.6},{:.6},{:.6},{:.6},{:.6}",
            r.timestamp,
            date,
            pair,
            r.close * 0.999,
            r.close * 1.001,
            r.close * 0.998,
            r.close,
            r.volume
        )
        .map_err(|e| AppError::io(format!("Failed to write '{}': {e}", path.display())))?;
    }
    Ok(())
}
