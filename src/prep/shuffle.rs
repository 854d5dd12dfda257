//! Final shuffle and dense materialization.
//!
//! The balanced sample set arrives class-blocked; a uniform permutation here
//! removes that structure before the samples are stacked into the dense
//! arrays a trainer consumes.

use log::debug;
use ndarray::{Array1, Array3};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::{TrainingArrays, WindowSample};

/// Uniformly permute the samples and stack them into dense arrays.
///
/// `window_len` and `feature_count` parameterize the empty case, so shapes
/// stay honest (`[0, window_len, feature_count]`) even when nothing survived
/// balancing. Window/label pairing is preserved through the permutation.
pub fn materialize(
    mut samples: Vec<WindowSample>,
    window_len: usize,
    feature_count: usize,
    rng: &mut StdRng,
) -> TrainingArrays {
    samples.shuffle(rng);

    let n = samples.len();
    let mut x = Array3::zeros((n, window_len, feature_count));
    let mut y = Array1::zeros(n);

    for (i, sample) in samples.iter().enumerate() {
        debug_assert_eq!(sample.window.len(), window_len);
        for (t, row) in sample.window.iter().enumerate() {
            debug_assert_eq!(row.len(), feature_count);
            for (f, &v) in row.iter().enumerate() {
                x[[i, t, f]] = v;
            }
        }
        y[i] = sample.label;
    }

    debug!("materialized {n} samples into [{n}, {window_len}, {feature_count}]");
    TrainingArrays { x, y }
}
