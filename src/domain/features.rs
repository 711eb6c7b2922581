use crate::domain::errors::ProfileError;
use crate::domain::profile::{RiskProfile, UserProfile};
use serde::{Deserialize, Serialize};

/// Ordered list of model input columns: the raw profile fields followed by
/// the engineered columns.
/// This order MUST match exactly the order the training job fits its
/// transforms on. Any change here is a breaking change for persisted
/// artifacts.
pub const FEATURE_COLUMNS: &[&str] = &[
    "age",
    "income",
    "account_balance",
    "credit_score",
    "num_transactions",
    "avg_transaction_value",
    "spending_category",
    "risk_profile",
    "income_to_balance_ratio",
    "transaction_frequency",
    "spending_efficiency",
    "financial_health_score",
    "age_income_interaction",
    "high_risk_spending",
    "conservative_profile",
];

/// Spending categories treated as discretionary, high-risk spending.
pub const HIGH_RISK_CATEGORIES: &[&str] = &["entertainment", "travel"];

/// Signals derived from a raw profile. Flags are encoded as 0.0/1.0 so the
/// whole set flattens into one numeric row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    pub income_to_balance_ratio: f64,
    pub transaction_frequency: f64,
    pub spending_efficiency: f64,
    pub financial_health_score: f64,
    pub age_income_interaction: f64,
    pub high_risk_spending: f64,
    pub conservative_profile: f64,
}

/// Derives the engineered feature set from a raw profile.
///
/// The formulas are shared verbatim between the training job and the
/// inference service; both call this function. Profiles with non-positive
/// income are rejected because `spending_efficiency` and
/// `financial_health_score` are undefined for them.
pub fn engineer(profile: &UserProfile) -> Result<EngineeredFeatures, ProfileError> {
    if profile.income <= 0.0 {
        return Err(ProfileError::NonPositiveIncome {
            income: profile.income,
        });
    }

    let monthly_income = profile.income / 12.0;

    Ok(EngineeredFeatures {
        income_to_balance_ratio: profile.income / (profile.account_balance + 1.0),
        transaction_frequency: f64::from(profile.num_transactions) / 30.0,
        spending_efficiency: profile.avg_transaction_value / monthly_income,
        financial_health_score: (f64::from(profile.credit_score) / 850.0) * 0.4
            + (profile.account_balance / profile.income) * 0.6,
        age_income_interaction: f64::from(profile.age) * profile.income / 100_000.0,
        high_risk_spending: if HIGH_RISK_CATEGORIES.contains(&profile.spending_category.as_str()) {
            1.0
        } else {
            0.0
        },
        conservative_profile: if profile.risk_profile == RiskProfile::Low {
            1.0
        } else {
            0.0
        },
    })
}

/// Flattens a profile plus its engineered features into the
/// `FEATURE_COLUMNS` order, with the categorical columns already encoded to
/// integer codes.
pub fn feature_row(
    profile: &UserProfile,
    features: &EngineeredFeatures,
    spending_code: usize,
    risk_code: usize,
) -> Vec<f64> {
    vec![
        f64::from(profile.age),
        profile.income,
        profile.account_balance,
        f64::from(profile.credit_score),
        f64::from(profile.num_transactions),
        profile.avg_transaction_value,
        spending_code as f64,
        risk_code as f64,
        features.income_to_balance_ratio,
        features.transaction_frequency,
        features.spending_efficiency,
        features.financial_health_score,
        features.age_income_interaction,
        features.high_risk_spending,
        features.conservative_profile,
    ]
}
