//! Pipeline stages, leaf-first: labeling, temporal splitting, normalization,
//! windowing, balancing, shuffling/materialization.
//!
//! Each stage is a pure function over the domain types so it can be tested in
//! isolation; only balancing and shuffling draw randomness, and both take a
//! caller-seeded RNG.

pub mod balance;
pub mod label;
pub mod normalize;
pub mod shuffle;
pub mod split;
pub mod window;

pub use balance::{balance_classes, class_counts};
pub use label::{classify, label_series};
pub use normalize::{column_stats, normalize_frame, ColumnStats, NormalizedFrame};
pub use shuffle::materialize;
pub use split::{split_by_time, TimeSplit};
pub use window::window_frame;
