use crate::domain::action::FinancialAction;
use crate::domain::insights::{InsightRecord, InsightsBundle, RiskAssessment, SavingsRecommendation};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The single JSON document the advisor binary writes to stdout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorResponse {
    pub predicted_action: FinancialAction,
    pub confidence: f64,
    pub all_probabilities: BTreeMap<FinancialAction, f64>,
    pub insights: Vec<InsightRecord>,
    pub risk_assessment: RiskAssessment,
    pub savings_recommendations: Vec<SavingsRecommendation>,
}

impl From<InsightsBundle> for AdvisorResponse {
    fn from(bundle: InsightsBundle) -> Self {
        Self {
            predicted_action: bundle.ml_prediction.predicted_action,
            confidence: bundle.ml_prediction.confidence,
            all_probabilities: bundle.ml_prediction.all_probabilities,
            insights: bundle.insights,
            risk_assessment: bundle.risk_assessment,
            savings_recommendations: bundle.savings_recommendations,
        }
    }
}

/// Well-formed error envelope for requests that cannot be parsed at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::insights_service::InsightsEngine;
    use crate::domain::prediction::PredictionResult;
    use crate::domain::profile::{RiskProfile, UserProfile};

    #[test]
    fn test_response_flattens_bundle() {
        let profile = UserProfile {
            age: 28,
            income: 65_000.0,
            account_balance: 15_000.0,
            credit_score: 720,
            num_transactions: 45,
            avg_transaction_value: 85.50,
            spending_category: "groceries".to_string(),
            risk_profile: RiskProfile::Medium,
        };
        let bundle = InsightsEngine::build(&profile, PredictionResult::fallback("offline"));

        let response = AdvisorResponse::from(bundle);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["predicted_action"], "save_money");
        assert!(json["all_probabilities"].is_object());
        assert!(json["insights"].is_array());
        assert!(json["risk_assessment"]["level"].is_string());
        assert!(json["savings_recommendations"][0]["allocation"]["stocks"].is_number());
    }
}
