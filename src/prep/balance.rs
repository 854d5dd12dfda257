//! Class balancing by majority subsampling.

use log::warn;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::domain::WindowSample;

/// `[down, up]` label counts, indexed by label value.
pub fn class_counts(samples: &[WindowSample]) -> [usize; 2] {
    let up = samples.iter().filter(|s| s.label == 1).count();
    [samples.len() - up, up]
}

/// Equalize label counts by shuffling each class and truncating the majority
/// to the minority size.
///
/// The output holds exactly `2 * min(|down|, |up|)` samples. If either class
/// is absent there is nothing to balance against and the result is empty:
/// a degenerate-but-valid dataset, left to the caller to reject or accept.
/// Output order is class-blocked; the materializer shuffles it away.
pub fn balance_classes(samples: Vec<WindowSample>, rng: &mut StdRng) -> Vec<WindowSample> {
    let (mut ups, mut downs): (Vec<_>, Vec<_>) = samples.into_iter().partition(|s| s.label == 1);

    let lower = ups.len().min(downs.len());
    if lower == 0 {
        if !ups.is_empty() || !downs.is_empty() {
            warn!(
                "one label class is empty ({} up / {} down); balanced dataset is empty",
                ups.len(),
                downs.len()
            );
        }
        return Vec::new();
    }

    ups.shuffle(rng);
    downs.shuffle(rng);
    ups.truncate(lower);
    downs.truncate(lower);
    ups.extend(downs);
    ups
}
