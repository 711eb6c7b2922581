//! Synthetic dataset generator for the offline training job.
//!
//! Fabricates user rows with seeded randomness and writes them to CSV. The
//! label rule here is a data-generation convenience, not the ground truth
//! the trained model is evaluated against.

use anyhow::{Context, Result};
use clap::Parser;
use finsight::domain::features;
use finsight::domain::profile::{RiskProfile, UserProfile};
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Serialize;
use std::path::PathBuf;

const SPENDING_CATEGORIES: &[&str] = &[
    "groceries",
    "travel",
    "entertainment",
    "utilities",
    "education",
    "health",
];

const RISK_PROFILES: [RiskProfile; 3] =
    [RiskProfile::Low, RiskProfile::Medium, RiskProfile::High];

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of rows to generate
    #[arg(long, default_value_t = 5000)]
    rows: usize,

    /// Output CSV path
    #[arg(long, default_value = "data/synthetic_financial_data.csv")]
    output: PathBuf,

    /// RNG seed for reproducible datasets
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Debug, Serialize)]
struct DatasetRow {
    user_id: String,
    age: u32,
    income: f64,
    account_balance: f64,
    credit_score: u32,
    num_transactions: u32,
    avg_transaction_value: f64,
    spending_category: String,
    risk_profile: String,
    income_to_balance_ratio: f64,
    transaction_frequency: f64,
    spending_efficiency: f64,
    financial_health_score: f64,
    age_income_interaction: f64,
    high_risk_spending: u8,
    conservative_profile: u8,
    target_action: String,
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Priority-ordered labeling rule; profiles matching no rule get a random
/// label so the classes stay mixed.
fn target_action(profile: &UserProfile, rng: &mut StdRng) -> &'static str {
    if profile.account_balance < 1_000.0 && profile.credit_score < 550 {
        "pay_debt"
    } else if profile.income > 150_000.0 && profile.risk_profile == RiskProfile::Low {
        "save_money"
    } else if profile.income > 100_000.0 && profile.account_balance > 50_000.0 {
        "invest_more"
    } else if profile.avg_transaction_value > 20_000.0 && profile.num_transactions > 60 {
        "stop_spending"
    } else {
        ["save_money", "pay_debt", "invest_more"]
            .choose(rng)
            .copied()
            .unwrap_or("save_money")
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = StdRng::seed_from_u64(args.seed);

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to open {}", args.output.display()))?;

    for index in 0..args.rows {
        let profile = UserProfile {
            age: rng.random_range(18..=70),
            income: round_to(rng.random_range(10_000.0..=200_000.0), 2),
            account_balance: round_to(rng.random_range(0.0..=1_000_000.0), 2),
            credit_score: rng.random_range(300..=850),
            num_transactions: rng.random_range(5..=150),
            avg_transaction_value: round_to(rng.random_range(100.0..=50_000.0), 2),
            spending_category: SPENDING_CATEGORIES
                .choose(&mut rng)
                .copied()
                .unwrap_or("groceries")
                .to_string(),
            risk_profile: RISK_PROFILES
                .choose(&mut rng)
                .copied()
                .unwrap_or(RiskProfile::Medium),
        };

        // Incomes are drawn strictly positive, so derivation cannot fail.
        let engineered = features::engineer(&profile)?;
        let action = target_action(&profile, &mut rng);

        writer.serialize(DatasetRow {
            user_id: format!("U{:04}", index + 1),
            age: profile.age,
            income: profile.income,
            account_balance: profile.account_balance,
            credit_score: profile.credit_score,
            num_transactions: profile.num_transactions,
            avg_transaction_value: profile.avg_transaction_value,
            spending_category: profile.spending_category.clone(),
            risk_profile: profile.risk_profile.as_str().to_string(),
            income_to_balance_ratio: round_to(engineered.income_to_balance_ratio, 4),
            transaction_frequency: round_to(engineered.transaction_frequency, 2),
            spending_efficiency: round_to(engineered.spending_efficiency, 4),
            financial_health_score: round_to(engineered.financial_health_score, 4),
            age_income_interaction: round_to(engineered.age_income_interaction, 4),
            high_risk_spending: engineered.high_risk_spending as u8,
            conservative_profile: engineered.conservative_profile as u8,
            target_action: action.to_string(),
        })?;
    }

    writer.flush()?;
    println!("Wrote {} rows to {:?}", args.rows, args.output);

    Ok(())
}
