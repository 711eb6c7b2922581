use crate::domain::errors::ProfileError;
use crate::domain::profile::{RiskProfile, UserProfile};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Defaults substituted by the lenient conversion used for rule evaluation.
const DEFAULT_AGE: u32 = 30;
const DEFAULT_INCOME: f64 = 50_000.0;
const DEFAULT_ACCOUNT_BALANCE: f64 = 10_000.0;
const DEFAULT_CREDIT_SCORE: u32 = 700;
const DEFAULT_RISK_PROFILE: RiskProfile = RiskProfile::Medium;
const DEFAULT_SPENDING_CATEGORY: &str = "other";

/// Wire-format profile with every field optional.
///
/// The prediction path requires all fields (`complete`); the insights rules
/// substitute documented defaults for missing ones (`with_defaults`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileRequest {
    pub age: Option<u32>,
    pub income: Option<f64>,
    pub account_balance: Option<f64>,
    pub credit_score: Option<u32>,
    pub num_transactions: Option<u32>,
    pub avg_transaction_value: Option<f64>,
    pub spending_category: Option<String>,
    pub risk_profile: Option<String>,
}

impl ProfileRequest {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            age: Some(profile.age),
            income: Some(profile.income),
            account_balance: Some(profile.account_balance),
            credit_score: Some(profile.credit_score),
            num_transactions: Some(profile.num_transactions),
            avg_transaction_value: Some(profile.avg_transaction_value),
            spending_category: Some(profile.spending_category.clone()),
            risk_profile: Some(profile.risk_profile.as_str().to_string()),
        }
    }

    /// Strict conversion: every field must be present and valid.
    pub fn complete(&self) -> Result<UserProfile, ProfileError> {
        Ok(UserProfile {
            age: self.age.ok_or(ProfileError::MissingField { field: "age" })?,
            income: self
                .income
                .ok_or(ProfileError::MissingField { field: "income" })?,
            account_balance: self.account_balance.ok_or(ProfileError::MissingField {
                field: "account_balance",
            })?,
            credit_score: self.credit_score.ok_or(ProfileError::MissingField {
                field: "credit_score",
            })?,
            num_transactions: self.num_transactions.ok_or(ProfileError::MissingField {
                field: "num_transactions",
            })?,
            avg_transaction_value: self.avg_transaction_value.ok_or(
                ProfileError::MissingField {
                    field: "avg_transaction_value",
                },
            )?,
            spending_category: self.spending_category.clone().ok_or(
                ProfileError::MissingField {
                    field: "spending_category",
                },
            )?,
            risk_profile: RiskProfile::from_str(self.risk_profile.as_deref().ok_or(
                ProfileError::MissingField {
                    field: "risk_profile",
                },
            )?)?,
        })
    }

    /// Lenient conversion for rule evaluation, substituting the documented
    /// defaults for absent fields. An unparseable risk profile also falls
    /// back to the default.
    pub fn with_defaults(&self) -> UserProfile {
        UserProfile {
            age: self.age.unwrap_or(DEFAULT_AGE),
            income: self.income.unwrap_or(DEFAULT_INCOME),
            account_balance: self.account_balance.unwrap_or(DEFAULT_ACCOUNT_BALANCE),
            credit_score: self.credit_score.unwrap_or(DEFAULT_CREDIT_SCORE),
            num_transactions: self.num_transactions.unwrap_or(0),
            avg_transaction_value: self.avg_transaction_value.unwrap_or(0.0),
            spending_category: self
                .spending_category
                .clone()
                .unwrap_or_else(|| DEFAULT_SPENDING_CATEGORY.to_string()),
            risk_profile: self
                .risk_profile
                .as_deref()
                .and_then(|value| RiskProfile::from_str(value).ok())
                .unwrap_or(DEFAULT_RISK_PROFILE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_reports_first_missing_field() {
        let request = ProfileRequest {
            age: Some(28),
            ..ProfileRequest::default()
        };
        let err = request.complete().unwrap_err();
        assert!(matches!(err, ProfileError::MissingField { field: "income" }));
    }

    #[test]
    fn test_complete_rejects_bad_risk_profile() {
        let mut request = ProfileRequest::from_profile(&UserProfile {
            age: 28,
            income: 65_000.0,
            account_balance: 15_000.0,
            credit_score: 720,
            num_transactions: 45,
            avg_transaction_value: 85.50,
            spending_category: "groceries".to_string(),
            risk_profile: RiskProfile::Medium,
        });
        request.risk_profile = Some("yolo".to_string());

        assert!(matches!(
            request.complete(),
            Err(ProfileError::InvalidRiskProfile { .. })
        ));
    }

    #[test]
    fn test_with_defaults_fills_documented_values() {
        let profile = ProfileRequest::default().with_defaults();
        assert_eq!(profile.age, 30);
        assert_eq!(profile.income, 50_000.0);
        assert_eq!(profile.account_balance, 10_000.0);
        assert_eq!(profile.credit_score, 700);
        assert_eq!(profile.risk_profile, RiskProfile::Medium);
    }

    #[test]
    fn test_request_parses_from_json() {
        let request: ProfileRequest = serde_json::from_str(
            r#"{"age": 28, "income": 65000, "spending_category": "groceries"}"#,
        )
        .unwrap();
        assert_eq!(request.age, Some(28));
        assert_eq!(request.spending_category.as_deref(), Some("groceries"));
        assert!(request.credit_score.is_none());
    }
}
