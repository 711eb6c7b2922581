use crate::domain::action::FinancialAction;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Outcome of one prediction cycle: the top action, its confidence, and the
/// full probability distribution over all known actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_action: FinancialAction,
    pub confidence: f64,
    pub all_probabilities: BTreeMap<FinancialAction, f64>,
    /// Per-feature importances, present only when the underlying model
    /// exposes them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feature_importance: Option<BTreeMap<String, f64>>,
    /// Error annotation carried by fail-open fallback results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResult {
    /// The fixed fail-open result: a uniform distribution over the canonical
    /// actions with the default recommendation on top, annotated with the
    /// failure that triggered it.
    pub fn fallback(reason: impl Into<String>) -> Self {
        let all_probabilities = FinancialAction::ALL.iter().map(|a| (*a, 0.25)).collect();
        Self {
            predicted_action: FinancialAction::SaveMoney,
            confidence: 0.25,
            all_probabilities,
            feature_importance: None,
            error: Some(reason.into()),
        }
    }
}
