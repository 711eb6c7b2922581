use crate::domain::errors::ModelError;

/// Capability interface for the trained multi-class action model.
///
/// The orchestrator depends only on this surface, so any statistical model
/// that can map a scaled feature vector to a class index and a probability
/// vector is interchangeable with the bundled forest ensemble.
pub trait ActionClassifier: Send + Sync {
    /// Predict the class index for a scaled feature vector.
    fn predict(&self, features: &[f64]) -> Result<usize, ModelError>;

    /// Probability per class, indexed in target-codec order.
    fn predict_probabilities(&self, features: &[f64]) -> Result<Vec<f64>, ModelError>;

    /// Per-feature importances, when the underlying model exposes them.
    fn feature_importances(&self) -> Option<Vec<f64>> {
        None
    }

    /// Number of classes the model was trained on.
    fn n_classes(&self) -> usize;

    /// Model name/type label.
    fn name(&self) -> &str;
}
