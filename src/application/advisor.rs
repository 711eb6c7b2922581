use crate::application::insights_service::InsightsEngine;
use crate::application::prediction_service::PredictionService;
use crate::domain::insights::InsightsBundle;
use crate::domain::prediction::PredictionResult;
use crate::interfaces::request::ProfileRequest;
use std::path::Path;

/// Facade combining the statistical prediction with the rules layer.
///
/// Constructed once per process. The loaded pipeline is read-only, so the
/// service can be shared across threads without synchronization.
pub struct AdvisorService {
    prediction: PredictionService,
}

impl AdvisorService {
    pub fn from_artifact_path(path: &Path) -> Self {
        Self {
            prediction: PredictionService::from_artifact_path(path),
        }
    }

    pub fn new(prediction: PredictionService) -> Self {
        Self { prediction }
    }

    pub fn is_ready(&self) -> bool {
        self.prediction.is_ready()
    }

    /// Predicts the recommended action. The prediction path requires every
    /// profile field and fails open when one is absent or invalid.
    pub fn predict(&self, request: &ProfileRequest) -> PredictionResult {
        match request.complete() {
            Ok(profile) => self.prediction.predict(&profile),
            Err(e) => PredictionResult::fallback(e.to_string()),
        }
    }

    /// Full insights bundle. Rule evaluation runs on the defaulted profile
    /// even when the prediction path fell back.
    pub fn insights(&self, request: &ProfileRequest) -> InsightsBundle {
        let prediction = self.predict(request);
        let profile = request.with_defaults();
        InsightsEngine::build(&profile, prediction)
    }
}
