//! Crate-wide error type.
//!
//! Every failure path funnels into [`AppError`] so the binary can map errors
//! to stable process exit codes:
//!
//! - `2`: bad input or configuration (missing files, malformed CSV, bad flags)
//! - `3`: data-quality failures discovered mid-pipeline (degenerate columns,
//!   splits too short to window, a missing label class)
//! - `4`: filesystem/serialization failures outside the data contract

use std::path::PathBuf;

use crate::domain::SplitKind;

/// Failure taxonomy for the preparation pipeline.
#[derive(Debug, Clone)]
pub enum AppError {
    /// No source files matched the file pattern for one or more requested years.
    DataNotFound {
        data_dir: PathBuf,
        pattern: String,
        missing_years: Vec<i32>,
    },
    /// A source file violated the expected data-row schema.
    Schema {
        path: PathBuf,
        line: usize,
        message: String,
    },
    /// Rejected configuration (flag values, ranges, impossible combinations).
    InvalidConfig(String),
    /// A feature column had zero spread within a split; min-max scaling is undefined.
    DegenerateColumn { split: SplitKind, column: String },
    /// A split was shorter than the window length, so no window can be produced.
    InsufficientWindow {
        split: SplitKind,
        rows: usize,
        window_len: usize,
    },
    /// A label class was absent, so the balanced dataset is empty.
    EmptyClass {
        split: SplitKind,
        down: usize,
        up: usize,
    },
    /// Filesystem or serialization failure.
    Io(String),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::DataNotFound { .. }
            | AppError::Schema { .. }
            | AppError::InvalidConfig(_) => 2,
            AppError::DegenerateColumn { .. }
            | AppError::InsufficientWindow { .. }
            | AppError::EmptyClass { .. } => 3,
            AppError::Io(_) => 4,
        }
    }

    pub fn io(message: impl Into<String>) -> Self {
        AppError::Io(message.into())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::DataNotFound {
                data_dir,
                pattern,
                missing_years,
            } => {
                let years: Vec<String> = missing_years.iter().map(|y| y.to_string()).collect();
                write!(
                    f,
                    "No source files matching '{pattern}' under '{}' for year(s) {}",
                    data_dir.display(),
                    years.join(", ")
                )
            }
            AppError::Schema {
                path,
                line,
                message,
            } => write!(f, "{}:{line}: {message}", path.display()),
            AppError::InvalidConfig(message) => write!(f, "Invalid configuration: {message}"),
            AppError::DegenerateColumn { split, column } => write!(
                f,
                "Zero-variance feature column '{column}' in {} split",
                split.display_name()
            ),
            AppError::InsufficientWindow {
                split,
                rows,
                window_len,
            } => write!(
                f,
                "{} split has {rows} row(s), fewer than window_len={window_len}; no windows can be produced",
                split.display_name()
            ),
            AppError::EmptyClass { split, down, up } => write!(
                f,
                "A label class is empty in the {} split (down={down}, up={up}); the balanced dataset is empty",
                split.display_name()
            ),
            AppError::Io(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_group_by_failure_kind() {
        let not_found = AppError::DataNotFound {
            data_dir: PathBuf::from("data"),
            pattern: "gemini_BTCUSD_{year}_1min.csv".to_string(),
            missing_years: vec![2019],
        };
        assert_eq!(not_found.exit_code(), 2);

        let degenerate = AppError::DegenerateColumn {
            split: SplitKind::Train,
            column: "BTCUSD_volume".to_string(),
        };
        assert_eq!(degenerate.exit_code(), 3);

        assert_eq!(AppError::io("disk full").exit_code(), 4);
    }

    #[test]
    fn display_names_the_missing_years() {
        let err = AppError::DataNotFound {
            data_dir: PathBuf::from("data"),
            pattern: "gemini_BTCUSD_{year}_1min.csv".to_string(),
            missing_years: vec![2018, 2019],
        };
        let text = err.to_string();
        assert!(text.contains("2018, 2019"), "{text}");
    }
}
