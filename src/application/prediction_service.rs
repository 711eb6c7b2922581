use crate::application::ml::artifact::ModelPipeline;
use crate::domain::action::FinancialAction;
use crate::domain::errors::{ModelError, PredictionError};
use crate::domain::features::{self, FEATURE_COLUMNS};
use crate::domain::prediction::PredictionResult;
use crate::domain::profile::UserProfile;
use crate::infrastructure::persistence::artifact_store;
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use tracing::{error, info, warn};

enum ServiceState {
    Ready(ModelPipeline),
    Unavailable { reason: String },
}

/// Orchestrates one prediction cycle: engineer, encode, select, scale,
/// predict, decode. Failures never escape; every error path degrades to the
/// uniform fallback result carrying the error text.
pub struct PredictionService {
    state: ServiceState,
}

impl PredictionService {
    /// Loads the artifact bundle once at startup. A missing or corrupt
    /// artifact leaves the service in the degraded state for its lifetime.
    pub fn from_artifact_path(path: &Path) -> Self {
        match artifact_store::load(path).and_then(ModelPipeline::from_artifact) {
            Ok(pipeline) => {
                info!(
                    "Loaded model '{}' (accuracy {:.1}%) from {:?}",
                    pipeline.model_type,
                    pipeline.accuracy * 100.0,
                    path
                );
                Self {
                    state: ServiceState::Ready(pipeline),
                }
            }
            Err(e) => {
                error!("Model artifact could not be loaded, serving fallback predictions: {e}");
                Self::unavailable(e.to_string())
            }
        }
    }

    pub fn ready(pipeline: ModelPipeline) -> Self {
        Self {
            state: ServiceState::Ready(pipeline),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            state: ServiceState::Unavailable {
                reason: reason.into(),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ServiceState::Ready(_))
    }

    /// Fail-open prediction: always returns a well-formed result.
    pub fn predict(&self, profile: &UserProfile) -> PredictionResult {
        match self.try_predict(profile) {
            Ok(result) => result,
            Err(e) => {
                warn!("Prediction failed, returning fallback result: {e}");
                PredictionResult::fallback(e.to_string())
            }
        }
    }

    fn try_predict(&self, profile: &UserProfile) -> Result<PredictionResult, PredictionError> {
        let pipeline = match &self.state {
            ServiceState::Ready(pipeline) => pipeline,
            ServiceState::Unavailable { reason } => {
                return Err(ModelError::ArtifactUnavailable {
                    reason: reason.clone(),
                }
                .into());
            }
        };

        let engineered = features::engineer(profile)?;
        let spending_code = pipeline
            .spending_codec
            .encode("spending_category", &profile.spending_category);
        let risk_code = pipeline
            .risk_codec
            .encode("risk_profile", profile.risk_profile.as_str());

        let row = features::feature_row(profile, &engineered, spending_code, risk_code);
        let selected = pipeline.selector.transform(FEATURE_COLUMNS, &row)?;
        let scaled = pipeline.scaler.transform(&selected)?;

        let class_index = pipeline.classifier.predict(&scaled)?;
        let probabilities = pipeline.classifier.predict_probabilities(&scaled)?;

        let predicted_action = decode_action(pipeline, class_index)?;

        let mut all_probabilities = BTreeMap::new();
        for (index, probability) in probabilities.iter().enumerate() {
            all_probabilities.insert(decode_action(pipeline, index)?, *probability);
        }

        let confidence = probabilities.iter().copied().fold(0.0_f64, f64::max);

        let feature_importance = pipeline.classifier.feature_importances().map(|importances| {
            pipeline
                .selected_features
                .iter()
                .cloned()
                .zip(importances)
                .collect::<BTreeMap<_, _>>()
        });

        Ok(PredictionResult {
            predicted_action,
            confidence,
            all_probabilities,
            feature_importance,
            error: None,
        })
    }
}

fn decode_action(
    pipeline: &ModelPipeline,
    class_index: usize,
) -> Result<FinancialAction, ModelError> {
    let label = pipeline
        .target_codec
        .decode(class_index)
        .ok_or_else(|| ModelError::UnknownAction {
            label: format!("class index {class_index}"),
        })?;
    FinancialAction::from_str(label).map_err(|_| ModelError::UnknownAction {
        label: label.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::artifact::ModelPipeline;
    use crate::application::ml::encoder::LabelCodec;
    use crate::application::ml::predictor::ActionClassifier;
    use crate::application::ml::transform::{FeatureSelector, StandardScaler};
    use crate::domain::profile::RiskProfile;

    /// Deterministic classifier standing in for a trained model.
    struct StubClassifier {
        probabilities: Vec<f64>,
        importances: Option<Vec<f64>>,
    }

    impl ActionClassifier for StubClassifier {
        fn predict(&self, _features: &[f64]) -> Result<usize, ModelError> {
            Ok(self
                .probabilities
                .iter()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(i, _)| i)
                .unwrap_or(0))
        }

        fn predict_probabilities(&self, _features: &[f64]) -> Result<Vec<f64>, ModelError> {
            Ok(self.probabilities.clone())
        }

        fn feature_importances(&self) -> Option<Vec<f64>> {
            self.importances.clone()
        }

        fn n_classes(&self) -> usize {
            self.probabilities.len()
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn stub_pipeline(classifier: StubClassifier) -> ModelPipeline {
        let input_columns: Vec<String> = FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect();
        let selected = vec![1, 3, 11];
        let selected_features = vec![
            "income".to_string(),
            "credit_score".to_string(),
            "financial_health_score".to_string(),
        ];
        ModelPipeline {
            classifier: Box::new(classifier),
            spending_codec: LabelCodec::fit([
                "education",
                "entertainment",
                "groceries",
                "health",
                "travel",
                "utilities",
            ]),
            risk_codec: LabelCodec::fit(["high", "low", "medium"]),
            target_codec: LabelCodec::fit([
                "invest_more",
                "pay_debt",
                "save_money",
                "stop_spending",
            ]),
            selector: FeatureSelector::new(input_columns, selected),
            scaler: StandardScaler::fit(&[vec![0.0, 300.0, 0.0], vec![200_000.0, 850.0, 1.0]]),
            selected_features,
            model_type: "stub".to_string(),
            accuracy: 0.9,
        }
    }

    fn sample_profile() -> UserProfile {
        UserProfile {
            age: 28,
            income: 65_000.0,
            account_balance: 15_000.0,
            credit_score: 720,
            num_transactions: 45,
            avg_transaction_value: 85.50,
            spending_category: "groceries".to_string(),
            risk_profile: RiskProfile::Medium,
        }
    }

    #[test]
    fn test_prediction_decodes_action_and_distribution() {
        let service = PredictionService::ready(stub_pipeline(StubClassifier {
            probabilities: vec![0.1, 0.6, 0.2, 0.1],
            importances: None,
        }));

        let result = service.predict(&sample_profile());

        assert!(result.error.is_none());
        // Class index 1 in lexicographic target order is pay_debt.
        assert_eq!(result.predicted_action, FinancialAction::PayDebt);
        assert!((result.confidence - 0.6).abs() < 1e-12);
        let total: f64 = result.all_probabilities.values().sum();
        assert!((total - 1.0).abs() < 1e-6);
        let max = result
            .all_probabilities
            .values()
            .copied()
            .fold(0.0_f64, f64::max);
        assert_eq!(result.confidence, max);
        assert!(result.feature_importance.is_none());
    }

    #[test]
    fn test_feature_importances_are_keyed_by_selected_features() {
        let service = PredictionService::ready(stub_pipeline(StubClassifier {
            probabilities: vec![0.25, 0.25, 0.25, 0.25],
            importances: Some(vec![0.5, 0.3, 0.2]),
        }));

        let result = service.predict(&sample_profile());
        let importance = result.feature_importance.unwrap();
        assert_eq!(importance.len(), 3);
        assert_eq!(importance["income"], 0.5);
        assert_eq!(importance["financial_health_score"], 0.2);
    }

    #[test]
    fn test_unavailable_service_returns_fallback() {
        let service = PredictionService::unavailable("model artifact not found");

        let result = service.predict(&sample_profile());

        assert_eq!(result.confidence, 0.25);
        assert_eq!(result.all_probabilities.len(), 4);
        assert!(result.error.as_deref().unwrap().contains("not found"));
    }

    #[test]
    fn test_unseen_category_still_predicts() {
        let service = PredictionService::ready(stub_pipeline(StubClassifier {
            probabilities: vec![0.1, 0.2, 0.6, 0.1],
            importances: None,
        }));

        let profile = UserProfile {
            spending_category: "collectibles".to_string(),
            ..sample_profile()
        };

        let result = service.predict(&profile);
        assert!(result.error.is_none());
        assert_eq!(result.predicted_action, FinancialAction::SaveMoney);
    }

    #[test]
    fn test_zero_income_falls_open() {
        let service = PredictionService::ready(stub_pipeline(StubClassifier {
            probabilities: vec![0.25, 0.25, 0.25, 0.25],
            importances: None,
        }));

        let profile = UserProfile {
            income: 0.0,
            ..sample_profile()
        };

        let result = service.predict(&profile);
        assert!(result.error.as_deref().unwrap().contains("income"));
        assert_eq!(result.confidence, 0.25);
    }

    #[test]
    fn test_undecodable_label_falls_open() {
        let mut pipeline = stub_pipeline(StubClassifier {
            probabilities: vec![0.7, 0.3],
            importances: None,
        });
        pipeline.target_codec = LabelCodec::fit(["hoard_gold", "save_money"]);
        let service = PredictionService::ready(pipeline);

        let result = service.predict(&sample_profile());
        assert!(result.error.as_deref().unwrap().contains("hoard_gold"));
        assert_eq!(result.confidence, 0.25);
    }
}
