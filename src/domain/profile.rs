use crate::domain::errors::ProfileError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Self-declared appetite for investment risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskProfile {
    Low,
    Medium,
    High,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Low => "low",
            RiskProfile::Medium => "medium",
            RiskProfile::High => "high",
        }
    }
}

impl fmt::Display for RiskProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskProfile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(RiskProfile::Low),
            "medium" => Ok(RiskProfile::Medium),
            "high" => Ok(RiskProfile::High),
            other => Err(ProfileError::InvalidRiskProfile {
                value: other.to_string(),
            }),
        }
    }
}

/// Snapshot of a user's financial attributes. Immutable once received; one
/// profile drives exactly one prediction cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: u32,
    pub income: f64,
    pub account_balance: f64,
    pub credit_score: u32,
    pub num_transactions: u32,
    pub avg_transaction_value: f64,
    pub spending_category: String,
    pub risk_profile: RiskProfile,
}

impl UserProfile {
    /// Months of expenses covered by the account balance, with monthly income
    /// as the expense proxy. Zero when income is not positive.
    pub fn emergency_fund_months(&self) -> f64 {
        if self.income > 0.0 {
            self.account_balance / (self.income / 12.0)
        } else {
            0.0
        }
    }

    /// Balance as a fraction of annual income. Zero when income is not positive.
    pub fn balance_to_income_ratio(&self) -> f64 {
        if self.income > 0.0 {
            self.account_balance / self.income
        } else {
            0.0
        }
    }
}
