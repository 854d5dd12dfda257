//! Training collaborator seam.
//!
//! Model construction and the optimization loop live outside the preparation
//! core; its contract ends at `(X_train, y_train, X_test, y_test)`. This
//! module pins the seam down: a [`Trainer`] consumes the four arrays plus the
//! pass-through options and returns evaluation metrics. [`MajorityTrainer`]
//! is the bundled reference implementation; it predicts the most common
//! training label for every window, which on an exactly balanced test split
//! lands at 0.5 accuracy.

use log::info;
use ndarray::Array1;

use crate::domain::{SplitKind, TrainConfig, TrainingArrays};
use crate::error::AppError;
use crate::report::TrainSummary;

/// A consumer of prepared training arrays.
pub trait Trainer {
    /// Human-readable trainer label for summaries.
    fn name(&self) -> &'static str;

    /// Fit on the train arrays, evaluate on the test arrays.
    fn train(
        &mut self,
        train: &TrainingArrays,
        test: &TrainingArrays,
        config: &TrainConfig,
    ) -> Result<TrainSummary, AppError>;
}

/// Fraction of predictions matching the labels.
///
/// An empty label set scores 0.0; callers guard against evaluating on empty
/// splits before reading anything into the number.
pub fn accuracy(predictions: &Array1<u8>, labels: &Array1<u8>) -> f64 {
    if labels.is_empty() {
        return 0.0;
    }
    let hits = predictions
        .iter()
        .zip(labels.iter())
        .filter(|(p, l)| p == l)
        .count();
    hits as f64 / labels.len() as f64
}

/// Predicts the majority training label for every window.
#[derive(Debug, Default)]
pub struct MajorityTrainer {
    majority: Option<u8>,
}

impl MajorityTrainer {
    pub fn majority(&self) -> Option<u8> {
        self.majority
    }

    fn require_both_classes(split: SplitKind, arrays: &TrainingArrays) -> Result<(), AppError> {
        let (down, up) = arrays.class_counts();
        if down == 0 || up == 0 {
            return Err(AppError::EmptyClass { split, down, up });
        }
        Ok(())
    }
}

impl Trainer for MajorityTrainer {
    fn name(&self) -> &'static str {
        "majority-class baseline"
    }

    fn train(
        &mut self,
        train: &TrainingArrays,
        test: &TrainingArrays,
        config: &TrainConfig,
    ) -> Result<TrainSummary, AppError> {
        Self::require_both_classes(SplitKind::Train, train)?;
        Self::require_both_classes(SplitKind::Test, test)?;

        let (down, up) = train.class_counts();
        let majority = if up >= down { 1 } else { 0 };
        self.majority = Some(majority);
        info!(
            "fit majority baseline on {} samples (down={down}, up={up}): predicting {majority}",
            train.len()
        );

        // The baseline has no use for batches or hidden layers, but a real
        // collaborator receives the same options.
        let _ = (config.batch_size, config.epochs, &config.hidden_node_sizes);

        let predictions = Array1::from_elem(test.len(), majority);
        Ok(TrainSummary {
            trainer: self.name().to_string(),
            accuracy: accuracy(&predictions, &test.y),
            n_train: train.len(),
            n_test: test.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn arrays(labels: &[u8]) -> TrainingArrays {
        TrainingArrays {
            x: Array3::zeros((labels.len(), 2, 2)),
            y: Array1::from_vec(labels.to_vec()),
        }
    }

    fn config() -> TrainConfig {
        TrainConfig {
            batch_size: 64,
            epochs: 1,
            hidden_node_sizes: vec![128; 4],
        }
    }

    #[test]
    fn accuracy_counts_matches() {
        let predictions = Array1::from_vec(vec![1, 0, 1, 1]);
        let labels = Array1::from_vec(vec![1, 1, 1, 0]);
        assert_eq!(accuracy(&predictions, &labels), 0.5);
        assert_eq!(accuracy(&Array1::zeros(0), &Array1::zeros(0)), 0.0);
    }

    #[test]
    fn majority_baseline_picks_the_common_label() {
        let mut trainer = MajorityTrainer::default();
        let summary = trainer
            .train(&arrays(&[1, 1, 1, 0]), &arrays(&[1, 0]), &config())
            .unwrap();

        assert_eq!(trainer.majority(), Some(1));
        assert_eq!(summary.accuracy, 0.5);
        assert_eq!(summary.n_train, 4);
        assert_eq!(summary.n_test, 2);
    }

    #[test]
    fn empty_class_is_rejected() {
        let mut trainer = MajorityTrainer::default();
        let err = trainer
            .train(&arrays(&[1, 1]), &arrays(&[1, 0]), &config())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::EmptyClass {
                split: SplitKind::Train,
                ..
            }
        ));

        let err = trainer
            .train(&arrays(&[1, 0]), &arrays(&[]), &config())
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::EmptyClass {
                split: SplitKind::Test,
                ..
            }
        ));
    }
}
