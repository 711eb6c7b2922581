use crate::domain::insights::{
    AllocationStrategy, AssetAllocation, InsightKind, InsightRecord, InsightsBundle, Priority,
    RiskAssessment, RiskLevel, SavingsRecommendation,
};
use crate::domain::prediction::PredictionResult;
use crate::domain::profile::{RiskProfile, UserProfile};

/// Months of expenses below which the emergency-fund insight fires.
const EMERGENCY_FUND_TARGET_MONTHS: f64 = 3.0;
/// Credit score below which the credit insight fires.
const CREDIT_SCORE_CONCERN: u32 = 650;
/// Confidence above which the ML insight is flagged high priority.
const HIGH_CONFIDENCE: f64 = 0.4;
/// Percentage points shifted between stocks and bonds per risk profile.
const RISK_SHIFT_PP: u32 = 10;

/// Deterministic financial rules layered on top of the statistical
/// prediction. Stateless; every rule is evaluated independently and none
/// short-circuits another.
pub struct InsightsEngine;

impl InsightsEngine {
    /// Assembles the full bundle for one profile.
    pub fn build(profile: &UserProfile, prediction: PredictionResult) -> InsightsBundle {
        InsightsBundle {
            insights: Self::insight_records(profile, &prediction),
            risk_assessment: Self::assess_risk(profile),
            savings_recommendations: Self::savings_recommendations(profile),
            ml_prediction: prediction,
        }
    }

    /// Ordered insight list: the ML recommendation always leads, followed by
    /// rule hits in a fixed rule order.
    pub fn insight_records(
        profile: &UserProfile,
        prediction: &PredictionResult,
    ) -> Vec<InsightRecord> {
        let mut insights = Vec::new();

        let action = prediction.predicted_action;
        insights.push(InsightRecord {
            kind: InsightKind::MlPrediction,
            title: format!("AI Recommendation: {}", action.title_words()),
            description: format!(
                "Based on your financial profile, our AI suggests to {}.",
                action.human_words()
            ),
            priority: if prediction.confidence > HIGH_CONFIDENCE {
                Priority::High
            } else {
                Priority::Medium
            },
            actionable: true,
            confidence: Some(prediction.confidence),
        });

        let emergency_months = profile.emergency_fund_months();
        if emergency_months < EMERGENCY_FUND_TARGET_MONTHS {
            insights.push(InsightRecord {
                kind: InsightKind::EmergencyFund,
                title: "Build Emergency Fund".to_string(),
                description: format!(
                    "You have {emergency_months:.1} months of expenses saved. Aim for 3-6 months."
                ),
                priority: Priority::High,
                actionable: true,
                confidence: None,
            });
        }

        if profile.credit_score < CREDIT_SCORE_CONCERN {
            insights.push(InsightRecord {
                kind: InsightKind::CreditScore,
                title: "Improve Credit Score".to_string(),
                description: format!(
                    "Your credit score of {} could be improved. Focus on paying bills on time.",
                    profile.credit_score
                ),
                priority: Priority::Medium,
                actionable: true,
                confidence: None,
            });
        }

        if profile.age < 35
            && matches!(profile.risk_profile, RiskProfile::Medium | RiskProfile::High)
            && profile.account_balance > profile.income * 0.1
        {
            insights.push(InsightRecord {
                kind: InsightKind::Investment,
                title: "Consider Long-term Investing".to_string(),
                description:
                    "Your age and risk profile suggest you could benefit from growth investments."
                        .to_string(),
                priority: Priority::Medium,
                actionable: true,
                confidence: None,
            });
        }

        if profile.income > 75_000.0 && profile.account_balance < profile.income * 0.05 {
            insights.push(InsightRecord {
                kind: InsightKind::SavingsRate,
                title: "Increase Savings Rate".to_string(),
                description: "Consider increasing your savings rate to build wealth faster."
                    .to_string(),
                priority: Priority::Medium,
                actionable: true,
                confidence: None,
            });
        }

        insights
    }

    /// Additive risk score over independent sub-factors, bucketed into a
    /// level by fixed thresholds.
    pub fn assess_risk(profile: &UserProfile) -> RiskAssessment {
        let mut score = 0u32;

        let emergency_months = profile.emergency_fund_months();
        score += if emergency_months < 1.0 {
            3
        } else if emergency_months < 3.0 {
            2
        } else if emergency_months < 6.0 {
            1
        } else {
            0
        };

        score += if profile.credit_score < 600 {
            3
        } else if profile.credit_score < 700 {
            2
        } else if profile.credit_score < 750 {
            1
        } else {
            0
        };

        let balance_ratio = profile.balance_to_income_ratio();
        score += if balance_ratio < 0.05 {
            2
        } else if balance_ratio < 0.1 {
            1
        } else {
            0
        };

        let (level, description) = if score >= 6 {
            (
                RiskLevel::High,
                "High financial risk - immediate attention needed",
            )
        } else if score >= 3 {
            (
                RiskLevel::Medium,
                "Moderate financial risk - improvements recommended",
            )
        } else {
            (RiskLevel::Low, "Low financial risk - good financial health")
        };

        RiskAssessment {
            level,
            score,
            description: description.to_string(),
        }
    }

    /// Age-bracket base allocation shifted between stocks and bonds by the
    /// stated risk appetite. Totals always stay at 100.
    pub fn savings_recommendations(profile: &UserProfile) -> Vec<SavingsRecommendation> {
        let (strategy, mut allocation, description) = if profile.age < 30 {
            (
                AllocationStrategy::AggressiveGrowth,
                AssetAllocation {
                    stocks: 80,
                    bonds: 15,
                    cash: 5,
                },
                "Young age allows for aggressive growth strategy",
            )
        } else if profile.age < 50 {
            (
                AllocationStrategy::BalancedGrowth,
                AssetAllocation {
                    stocks: 65,
                    bonds: 25,
                    cash: 10,
                },
                "Balanced approach for middle-aged investors",
            )
        } else {
            (
                AllocationStrategy::Conservative,
                AssetAllocation {
                    stocks: 45,
                    bonds: 40,
                    cash: 15,
                },
                "Conservative approach for retirement preparation",
            )
        };

        match profile.risk_profile {
            RiskProfile::Low => {
                allocation.stocks -= RISK_SHIFT_PP;
                allocation.bonds += RISK_SHIFT_PP;
            }
            RiskProfile::High => {
                allocation.stocks += RISK_SHIFT_PP;
                allocation.bonds -= RISK_SHIFT_PP;
            }
            RiskProfile::Medium => {}
        }

        vec![SavingsRecommendation {
            strategy,
            allocation,
            description: description.to_string(),
        }]
    }
}
