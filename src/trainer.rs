//! Model collaborator boundary
//!
//! The core never trains or runs the behavior model itself; it hands
//! fixed-shape float vectors to external collaborators. Shape violations at
//! this boundary are genuine contract errors and are reported explicitly,
//! naming expected vs. actual dimensions, unlike the silent degradation used
//! for expected data edge cases inside the core.

use crate::error::AnalyticsError;
use crate::types::{ModelOutput, TrainingDataset, FEATURE_DIMENSION};
use crate::windowing::TARGET_DIMENSION;

/// External inference collaborator: one day's feature vector in, scores out.
pub trait BehaviorModel {
    /// Run inference on a flattened daily feature vector.
    fn infer(&self, features: &[f64]) -> Result<ModelOutput, AnalyticsError>;
}

/// External training collaborator: consumes a validated dataset and returns
/// a human-readable per-epoch loss log (lines like "Epoch 3 Loss: 0.04215").
/// The core does not parse the log beyond optional cosmetic display.
pub trait ModelTrainer {
    fn train(&mut self, dataset: &TrainingDataset) -> Result<Vec<String>, AnalyticsError>;
}

/// Validate a training batch before handing it to the trainer.
///
/// Checks batch-size agreement between inputs and targets, per-input length
/// (window_size x 34), and per-target length (2).
pub fn validate_training_batch(dataset: &TrainingDataset) -> Result<(), AnalyticsError> {
    if dataset.inputs.len() != dataset.targets.len() {
        return Err(AnalyticsError::ShapeMismatch {
            expected: format!("{} targets for {} inputs", dataset.inputs.len(), dataset.inputs.len()),
            actual: format!("{} targets", dataset.targets.len()),
        });
    }

    if dataset.sample_count != dataset.inputs.len() {
        return Err(AnalyticsError::ShapeMismatch {
            expected: format!("sample_count {}", dataset.inputs.len()),
            actual: format!("sample_count {}", dataset.sample_count),
        });
    }

    let expected_input_len = dataset.window_size * FEATURE_DIMENSION;
    for (index, input) in dataset.inputs.iter().enumerate() {
        if input.len() != expected_input_len {
            return Err(AnalyticsError::ShapeMismatch {
                expected: format!("input[{index}] of length {expected_input_len}"),
                actual: format!("length {}", input.len()),
            });
        }
    }

    for (index, target) in dataset.targets.iter().enumerate() {
        if target.len() != TARGET_DIMENSION {
            return Err(AnalyticsError::ShapeMismatch {
                expected: format!("target[{index}] of length {TARGET_DIMENSION}"),
                actual: format!("length {}", target.len()),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DailyBehaviorFeatures;
    use crate::windowing::TrainingDatasetAssembler;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn valid_dataset() -> TrainingDataset {
        let mut map = HashMap::new();
        for n in 1..=4 {
            map.insert(
                NaiveDate::from_ymd_opt(2024, 3, n).unwrap(),
                DailyBehaviorFeatures::default(),
            );
        }
        TrainingDatasetAssembler::assemble(&map, 3)
    }

    #[test]
    fn test_assembled_dataset_validates() {
        let dataset = valid_dataset();
        assert!(dataset.sample_count > 0);
        assert!(validate_training_batch(&dataset).is_ok());
    }

    #[test]
    fn test_empty_dataset_validates() {
        assert!(validate_training_batch(&TrainingDataset::empty(3)).is_ok());
    }

    #[test]
    fn test_batch_size_mismatch_is_reported() {
        let mut dataset = valid_dataset();
        dataset.targets.pop();
        let err = validate_training_batch(&dataset).unwrap_err();
        assert!(matches!(err, AnalyticsError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_input_length_mismatch_names_shapes() {
        let mut dataset = valid_dataset();
        dataset.inputs[0].pop();
        let err = validate_training_batch(&dataset).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("102"), "message should name the expected length: {message}");
        assert!(message.contains("101"), "message should name the actual length: {message}");
    }

    #[test]
    fn test_target_length_mismatch_is_reported() {
        let mut dataset = valid_dataset();
        dataset.targets[0].push(0.5);
        assert!(validate_training_batch(&dataset).is_err());
    }
}
