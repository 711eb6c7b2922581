//! Property tests for the deterministic rules layer.

use finsight::application::insights_service::InsightsEngine;
use finsight::domain::profile::{RiskProfile, UserProfile};
use proptest::prelude::*;

fn profile(age: u32, income: f64, account_balance: f64, credit_score: u32) -> UserProfile {
    UserProfile {
        age,
        income,
        account_balance,
        credit_score,
        num_transactions: 30,
        avg_transaction_value: 100.0,
        spending_category: "groceries".to_string(),
        risk_profile: RiskProfile::Medium,
    }
}

fn risk_profiles() -> impl Strategy<Value = RiskProfile> {
    prop_oneof![
        Just(RiskProfile::Low),
        Just(RiskProfile::Medium),
        Just(RiskProfile::High),
    ]
}

proptest! {
    #[test]
    fn allocation_always_sums_to_100(age in 18u32..=100, risk in risk_profiles()) {
        let mut user = profile(age, 65_000.0, 15_000.0, 720);
        user.risk_profile = risk;

        let recommendations = InsightsEngine::savings_recommendations(&user);
        prop_assert_eq!(recommendations.len(), 1);
        prop_assert_eq!(recommendations[0].allocation.total(), 100);
    }

    #[test]
    fn risk_score_non_decreasing_as_credit_worsens(
        credit_a in 300u32..=850,
        credit_b in 300u32..=850,
    ) {
        let (worse, better) = if credit_a <= credit_b {
            (credit_a, credit_b)
        } else {
            (credit_b, credit_a)
        };

        let worse_score = InsightsEngine::assess_risk(&profile(40, 60_000.0, 40_000.0, worse)).score;
        let better_score = InsightsEngine::assess_risk(&profile(40, 60_000.0, 40_000.0, better)).score;
        prop_assert!(worse_score >= better_score);
    }

    #[test]
    fn risk_score_non_decreasing_as_balance_shrinks(
        balance_a in 0.0f64..200_000.0,
        balance_b in 0.0f64..200_000.0,
    ) {
        let (smaller, larger) = if balance_a <= balance_b {
            (balance_a, balance_b)
        } else {
            (balance_b, balance_a)
        };

        let small_score = InsightsEngine::assess_risk(&profile(40, 60_000.0, smaller, 720)).score;
        let large_score = InsightsEngine::assess_risk(&profile(40, 60_000.0, larger, 720)).score;
        prop_assert!(small_score >= large_score);
    }

    #[test]
    fn insights_list_always_leads_with_ml_record(
        age in 18u32..=100,
        income in 1.0f64..500_000.0,
        balance in 0.0f64..1_000_000.0,
        credit in 300u32..=850,
    ) {
        use finsight::domain::insights::InsightKind;
        use finsight::domain::prediction::PredictionResult;

        let user = profile(age, income, balance, credit);
        let records =
            InsightsEngine::insight_records(&user, &PredictionResult::fallback("offline"));

        prop_assert!(!records.is_empty());
        prop_assert_eq!(records[0].kind, InsightKind::MlPrediction);
    }
}
