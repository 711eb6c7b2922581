use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The four canonical actions the model chooses between.
///
/// Variants are declared in lexicographic label order so that `Ord` (and any
/// sorted map keyed by actions) matches the code order the training-time
/// target encoder assigns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialAction {
    InvestMore,
    PayDebt,
    SaveMoney,
    StopSpending,
}

impl FinancialAction {
    pub const ALL: [FinancialAction; 4] = [
        FinancialAction::InvestMore,
        FinancialAction::PayDebt,
        FinancialAction::SaveMoney,
        FinancialAction::StopSpending,
    ];

    /// Wire label, e.g. `save_money`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FinancialAction::InvestMore => "invest_more",
            FinancialAction::PayDebt => "pay_debt",
            FinancialAction::SaveMoney => "save_money",
            FinancialAction::StopSpending => "stop_spending",
        }
    }

    /// Lowercase human form, e.g. `save money`.
    pub fn human_words(&self) -> &'static str {
        match self {
            FinancialAction::InvestMore => "invest more",
            FinancialAction::PayDebt => "pay debt",
            FinancialAction::SaveMoney => "save money",
            FinancialAction::StopSpending => "stop spending",
        }
    }

    /// Title-case human form, e.g. `Save Money`.
    pub fn title_words(&self) -> &'static str {
        match self {
            FinancialAction::InvestMore => "Invest More",
            FinancialAction::PayDebt => "Pay Debt",
            FinancialAction::SaveMoney => "Save Money",
            FinancialAction::StopSpending => "Stop Spending",
        }
    }
}

impl fmt::Display for FinancialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FinancialAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "invest_more" => Ok(FinancialAction::InvestMore),
            "pay_debt" => Ok(FinancialAction::PayDebt),
            "save_money" => Ok(FinancialAction::SaveMoney),
            "stop_spending" => Ok(FinancialAction::StopSpending),
            other => Err(format!("unknown action label: {other}")),
        }
    }
}
