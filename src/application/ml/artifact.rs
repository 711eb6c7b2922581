use crate::application::ml::encoder::LabelCodec;
use crate::application::ml::forest_classifier::ForestEnsembleClassifier;
use crate::application::ml::predictor::ActionClassifier;
use crate::application::ml::transform::{FeatureSelector, StandardScaler};
use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dataset column holding the spending category.
pub const SPENDING_COLUMN: &str = "spending_category";
/// Dataset column holding the risk profile.
pub const RISK_COLUMN: &str = "risk_profile";
/// Target column of the training dataset.
pub const TARGET_COLUMN: &str = "target_action";

/// Input columns the training job fits label codecs for.
pub const CATEGORICAL_COLUMNS: &[&str] = &[SPENDING_COLUMN, RISK_COLUMN];

/// Persisted output of the training job: the fitted classifier plus every
/// preprocessing transform needed to score new profiles exactly like the
/// training rows were scored. Loaded once at service start and read-only
/// afterwards.
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    pub accuracy: f64,
    pub encoders: BTreeMap<String, LabelCodec>,
    pub selector: FeatureSelector,
    pub scaler: StandardScaler,
    pub selected_features: Vec<String>,
    pub classifier: ForestEnsembleClassifier,
}

/// Runtime view of a loaded artifact with the classifier behind the
/// capability trait.
pub struct ModelPipeline {
    pub classifier: Box<dyn ActionClassifier>,
    pub spending_codec: LabelCodec,
    pub risk_codec: LabelCodec,
    pub target_codec: LabelCodec,
    pub selector: FeatureSelector,
    pub scaler: StandardScaler,
    pub selected_features: Vec<String>,
    pub model_type: String,
    pub accuracy: f64,
}

impl std::fmt::Debug for ModelPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelPipeline")
            .field("classifier", &self.classifier.name())
            .field("spending_codec", &self.spending_codec)
            .field("risk_codec", &self.risk_codec)
            .field("target_codec", &self.target_codec)
            .field("selector", &self.selector)
            .field("scaler", &self.scaler)
            .field("selected_features", &self.selected_features)
            .field("model_type", &self.model_type)
            .field("accuracy", &self.accuracy)
            .finish()
    }
}

impl ModelPipeline {
    /// Validates an artifact bundle and promotes it into the runtime form.
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, ModelError> {
        let mut encoders = artifact.encoders;
        let spending_codec = take_codec(&mut encoders, SPENDING_COLUMN)?;
        let risk_codec = take_codec(&mut encoders, RISK_COLUMN)?;
        let target_codec = take_codec(&mut encoders, TARGET_COLUMN)?;

        if artifact.classifier.n_classes() != target_codec.len() {
            return Err(ModelError::ArtifactUnavailable {
                reason: format!(
                    "classifier has {} classes but the target encoder knows {}",
                    artifact.classifier.n_classes(),
                    target_codec.len()
                ),
            });
        }

        Ok(Self {
            classifier: Box::new(artifact.classifier),
            spending_codec,
            risk_codec,
            target_codec,
            selector: artifact.selector,
            scaler: artifact.scaler,
            selected_features: artifact.selected_features,
            model_type: artifact.model_type,
            accuracy: artifact.accuracy,
        })
    }
}

fn take_codec(
    encoders: &mut BTreeMap<String, LabelCodec>,
    column: &str,
) -> Result<LabelCodec, ModelError> {
    let codec = encoders
        .remove(column)
        .ok_or_else(|| ModelError::ArtifactUnavailable {
            reason: format!("artifact is missing the {column} encoder"),
        })?;
    if codec.is_empty() {
        return Err(ModelError::ArtifactUnavailable {
            reason: format!("the {column} encoder has no classes"),
        });
    }
    Ok(codec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::FEATURE_COLUMNS;

    fn stub_artifact(encoders: BTreeMap<String, LabelCodec>) -> ModelArtifact {
        ModelArtifact {
            model_type: "test".to_string(),
            accuracy: 0.5,
            encoders,
            selector: FeatureSelector::new(
                FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
                vec![0, 1],
            ),
            scaler: StandardScaler::fit(&[vec![0.0, 0.0], vec![1.0, 1.0]]),
            selected_features: vec!["age".to_string(), "income".to_string()],
            classifier: ForestEnsembleClassifier::new(Vec::new()),
        }
    }

    #[test]
    fn test_missing_encoder_is_rejected() {
        let mut encoders = BTreeMap::new();
        encoders.insert(
            SPENDING_COLUMN.to_string(),
            LabelCodec::fit(["groceries", "travel"]),
        );
        encoders.insert(RISK_COLUMN.to_string(), LabelCodec::fit(["low", "medium"]));

        let err = ModelPipeline::from_artifact(stub_artifact(encoders)).unwrap_err();
        assert!(err.to_string().contains(TARGET_COLUMN));
    }

    #[test]
    fn test_class_count_mismatch_is_rejected() {
        let mut encoders = BTreeMap::new();
        encoders.insert(
            SPENDING_COLUMN.to_string(),
            LabelCodec::fit(["groceries", "travel"]),
        );
        encoders.insert(RISK_COLUMN.to_string(), LabelCodec::fit(["low", "medium"]));
        encoders.insert(
            TARGET_COLUMN.to_string(),
            LabelCodec::fit(["pay_debt", "save_money"]),
        );

        // The stub classifier has zero forests, the target codec two classes.
        let err = ModelPipeline::from_artifact(stub_artifact(encoders)).unwrap_err();
        assert!(err.to_string().contains("classes"));
    }
}
