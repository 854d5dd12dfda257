//! Synthetic data generation.

pub mod sample;

pub use sample::{generate_records, period_step_secs, write_sample_files, SampleConfig};
