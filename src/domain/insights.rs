use crate::domain::prediction::PredictionResult;
use serde::{Deserialize, Serialize};

/// Kind tag of a generated insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    MlPrediction,
    EmergencyFund,
    CreditScore,
    Investment,
    SavingsRate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// One human-readable recommendation. Records are ordered: the ML-derived
/// insight first, then rule hits in a fixed rule order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightRecord {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub actionable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Additive risk score over independent sub-factors, bucketed into a level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: u32,
    pub description: String,
}

/// Age-bracket allocation strategy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocationStrategy {
    AggressiveGrowth,
    BalancedGrowth,
    Conservative,
}

/// Percentage split across asset classes. Always sums to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub stocks: u32,
    pub bonds: u32,
    pub cash: u32,
}

impl AssetAllocation {
    pub fn total(&self) -> u32 {
        self.stocks + self.bonds + self.cash
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsRecommendation {
    #[serde(rename = "type")]
    pub strategy: AllocationStrategy,
    pub allocation: AssetAllocation,
    pub description: String,
}

/// Everything the insights engine produces for one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightsBundle {
    pub insights: Vec<InsightRecord>,
    pub ml_prediction: PredictionResult,
    pub risk_assessment: RiskAssessment,
    pub savings_recommendations: Vec<SavingsRecommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insight_kind_serializes_as_type_tag() {
        let record = InsightRecord {
            kind: InsightKind::EmergencyFund,
            title: "Build Emergency Fund".to_string(),
            description: "desc".to_string(),
            priority: Priority::High,
            actionable: true,
            confidence: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "emergency_fund");
        assert_eq!(json["priority"], "high");
        assert!(json.get("confidence").is_none());
    }

    #[test]
    fn test_allocation_total() {
        let allocation = AssetAllocation {
            stocks: 65,
            bonds: 25,
            cash: 10,
        };
        assert_eq!(allocation.total(), 100);
    }
}
