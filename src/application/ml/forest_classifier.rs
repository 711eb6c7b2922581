use crate::application::ml::predictor::ActionClassifier;
use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;

pub type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// One-vs-rest random-forest ensemble.
///
/// Each class has a forest fitted on a 0/1 membership target, so a forest's
/// output is the fraction of trees claiming the sample for that class. The
/// per-class scores normalize into the probability distribution the
/// orchestrator needs.
#[derive(Debug, Serialize, Deserialize)]
pub struct ForestEnsembleClassifier {
    forests: Vec<Forest>,
}

impl ForestEnsembleClassifier {
    /// Builds the ensemble from per-class forests in target-codec order.
    pub fn new(forests: Vec<Forest>) -> Self {
        Self { forests }
    }

    fn class_scores(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        let matrix = DenseMatrix::from_2d_vec(&vec![features.to_vec()]).map_err(|e| {
            ModelError::Evaluation {
                reason: format!("matrix creation failed: {e}"),
            }
        })?;

        let mut scores = Vec::with_capacity(self.forests.len());
        for forest in &self.forests {
            let predictions = forest.predict(&matrix).map_err(|e| ModelError::Evaluation {
                reason: format!("forest prediction failed: {e}"),
            })?;
            let score = predictions
                .first()
                .copied()
                .ok_or_else(|| ModelError::Evaluation {
                    reason: "no prediction returned".to_string(),
                })?;
            scores.push(score.clamp(0.0, 1.0));
        }
        Ok(scores)
    }
}

impl ActionClassifier for ForestEnsembleClassifier {
    fn predict(&self, features: &[f64]) -> Result<usize, ModelError> {
        let probabilities = self.predict_probabilities(features)?;
        probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(index, _)| index)
            .ok_or_else(|| ModelError::Evaluation {
                reason: "model has no classes".to_string(),
            })
    }

    fn predict_probabilities(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        let scores = self.class_scores(features)?;
        let total: f64 = scores.iter().sum();
        if total > 0.0 {
            Ok(scores.iter().map(|score| score / total).collect())
        } else {
            // No forest claimed the sample; spread the mass evenly.
            let n = scores.len().max(1);
            Ok(vec![1.0 / n as f64; scores.len()])
        }
    }

    fn n_classes(&self) -> usize {
        self.forests.len()
    }

    fn name(&self) -> &str {
        "one-vs-rest random forest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartcore::ensemble::random_forest_regressor::RandomForestRegressorParameters;

    fn tiny_forest(targets: &[f64]) -> Forest {
        let x = DenseMatrix::from_2d_vec(&vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.1, 0.1],
            vec![0.9, 0.9],
        ])
        .unwrap();
        let params = RandomForestRegressorParameters::default()
            .with_n_trees(10)
            .with_max_depth(4)
            .with_min_samples_split(2);
        RandomForestRegressor::fit(&x, &targets.to_vec(), params).unwrap()
    }

    #[test]
    fn test_probabilities_form_a_distribution() {
        let classifier = ForestEnsembleClassifier::new(vec![
            tiny_forest(&[1.0, 1.0, 0.0, 0.0, 1.0, 0.0]),
            tiny_forest(&[0.0, 0.0, 1.0, 1.0, 0.0, 1.0]),
        ]);

        let probabilities = classifier.predict_probabilities(&[0.05, 0.05]).unwrap();
        assert_eq!(probabilities.len(), 2);
        let total: f64 = probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_predict_is_argmax_of_probabilities() {
        let classifier = ForestEnsembleClassifier::new(vec![
            tiny_forest(&[1.0, 1.0, 0.0, 0.0, 1.0, 0.0]),
            tiny_forest(&[0.0, 0.0, 1.0, 1.0, 0.0, 1.0]),
        ]);

        let probabilities = classifier.predict_probabilities(&[0.95, 0.95]).unwrap();
        let predicted = classifier.predict(&[0.95, 0.95]).unwrap();
        let argmax = probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(predicted, argmax);
    }

    #[test]
    fn test_no_importances_exposed() {
        let classifier =
            ForestEnsembleClassifier::new(vec![tiny_forest(&[1.0, 0.0, 1.0, 0.0, 1.0, 0.0])]);
        assert!(classifier.feature_importances().is_none());
        assert_eq!(classifier.n_classes(), 1);
    }
}
