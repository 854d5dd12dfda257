//! `price-rnn` library crate.
//!
//! Preprocesses historical price time-series into labeled, class-balanced,
//! normalized fixed-length training windows for a binary price-direction
//! classifier. The binary (`prnn`) is a thin wrapper around this library so
//! that:
//!
//! - the pipeline is testable without spawning processes
//! - stages are reusable (e.g. from notebooks or other tools)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod prep;
pub mod report;
pub mod train;
