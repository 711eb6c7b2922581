//! Offline training job for the financial action model.
//!
//! Reads the synthetic dataset, re-derives the engineered features through
//! the same code path the inference service uses, fits the preprocessing
//! transforms and a one-vs-rest random forest, and persists the whole bundle
//! as a single JSON artifact.

use anyhow::{Context, Result, bail};
use clap::Parser;
use finsight::application::ml::artifact::{
    ModelArtifact, RISK_COLUMN, SPENDING_COLUMN, TARGET_COLUMN,
};
use finsight::application::ml::encoder::LabelCodec;
use finsight::application::ml::forest_classifier::ForestEnsembleClassifier;
use finsight::application::ml::predictor::ActionClassifier;
use finsight::application::ml::transform::{FeatureSelector, StandardScaler};
use finsight::domain::features::{self, FEATURE_COLUMNS};
use finsight::domain::profile::{RiskProfile, UserProfile};
use finsight::infrastructure::persistence::artifact_store;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::str::FromStr;

/// Raw dataset columns. Engineered columns present in the CSV are ignored
/// and re-derived, so the training features can never drift from inference.
#[derive(Debug, Deserialize)]
struct DatasetRecord {
    #[allow(dead_code)]
    user_id: String,
    age: u32,
    income: f64,
    account_balance: f64,
    credit_score: u32,
    num_transactions: u32,
    avg_transaction_value: f64,
    spending_category: String,
    risk_profile: String,
    target_action: String,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the training dataset CSV
    #[arg(long, default_value = "data/synthetic_financial_data.csv")]
    input: PathBuf,

    /// Path to the output artifact file
    #[arg(long, default_value = "data/model/financial_model.json")]
    output: PathBuf,

    /// Number of trees per class forest
    #[arg(long, default_value_t = 100)]
    n_trees: usize,

    /// Maximum tree depth
    #[arg(long, default_value_t = 10)]
    max_depth: u16,

    /// Minimum samples required to split an internal node
    #[arg(long, default_value_t = 5)]
    min_split: usize,

    /// Number of features kept by ANOVA selection
    #[arg(long, default_value_t = 12)]
    top_features: usize,

    /// Fraction of rows held out for evaluation
    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    /// RNG seed for the train/test shuffle and oversampling
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// One-way ANOVA F statistic per feature column, discriminating the target
/// classes. Constant columns score 0.
fn anova_f_scores(x: &[Vec<f64>], y: &[usize], n_classes: usize) -> Vec<f64> {
    let n_rows = x.len();
    let n_cols = x.first().map_or(0, Vec::len);
    let mut scores = vec![0.0; n_cols];
    if n_rows <= n_classes || n_classes < 2 {
        return scores;
    }

    for col in 0..n_cols {
        let mut class_sum = vec![0.0; n_classes];
        let mut class_count = vec![0usize; n_classes];
        let mut grand_sum = 0.0;

        for (row, &class) in x.iter().zip(y) {
            class_sum[class] += row[col];
            class_count[class] += 1;
            grand_sum += row[col];
        }
        let grand_mean = grand_sum / n_rows as f64;

        let mut between = 0.0;
        for class in 0..n_classes {
            if class_count[class] == 0 {
                continue;
            }
            let class_mean = class_sum[class] / class_count[class] as f64;
            between += class_count[class] as f64 * (class_mean - grand_mean).powi(2);
        }

        let mut within = 0.0;
        for (row, &class) in x.iter().zip(y) {
            let class_mean = class_sum[class] / class_count[class] as f64;
            within += (row[col] - class_mean).powi(2);
        }

        let df_between = (n_classes - 1) as f64;
        let df_within = (n_rows - n_classes) as f64;
        let ms_between = between / df_between;
        let ms_within = within / df_within;

        scores[col] = if ms_within > 0.0 {
            ms_between / ms_within
        } else if ms_between > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
    }

    scores
}

/// Top-k column indices by F score, returned in ascending column order so
/// the selected subset keeps the original column layout.
fn select_top_features(scores: &[f64], k: usize) -> Vec<usize> {
    let mut ranked: Vec<usize> = (0..scores.len()).collect();
    ranked.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    let mut selected: Vec<usize> = ranked.into_iter().take(k).collect();
    selected.sort_unstable();
    selected
}

/// Duplicates minority-class rows until every class matches the majority
/// count. Keeps the forests from collapsing onto the most common label.
fn oversample(
    rows: &mut Vec<Vec<f64>>,
    labels: &mut Vec<usize>,
    n_classes: usize,
    rng: &mut StdRng,
) {
    let mut by_class: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
    for (index, &label) in labels.iter().enumerate() {
        by_class[label].push(index);
    }
    let majority = by_class.iter().map(Vec::len).max().unwrap_or(0);

    for class_rows in by_class {
        if class_rows.is_empty() {
            continue;
        }
        for _ in class_rows.len()..majority {
            let source = class_rows[rng.random_range(0..class_rows.len())];
            rows.push(rows[source].clone());
            labels.push(labels[source]);
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if !args.input.exists() {
        bail!(
            "training data not found at {:?}; run generate_dataset first",
            args.input
        );
    }

    println!("Loading training data from {:?}", args.input);
    let file = File::open(&args.input)?;
    let mut reader = csv::Reader::from_reader(BufReader::new(file));

    let mut profiles: Vec<UserProfile> = Vec::new();
    let mut target_labels: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for result in reader.deserialize() {
        let record: DatasetRecord = result?;
        let profile = UserProfile {
            age: record.age,
            income: record.income,
            account_balance: record.account_balance,
            credit_score: record.credit_score,
            num_transactions: record.num_transactions,
            avg_transaction_value: record.avg_transaction_value,
            spending_category: record.spending_category,
            risk_profile: RiskProfile::from_str(&record.risk_profile)
                .with_context(|| format!("row {}", record.user_id))?,
        };
        if profile.income <= 0.0 {
            skipped += 1;
            continue;
        }
        profiles.push(profile);
        target_labels.push(record.target_action);
    }

    if profiles.is_empty() {
        bail!("no usable rows in {:?}", args.input);
    }
    if skipped > 0 {
        println!("Skipped {skipped} rows with non-positive income");
    }
    println!("Loaded {} rows", profiles.len());

    // Fit codecs over the observed labels.
    let spending_codec = LabelCodec::fit(profiles.iter().map(|p| p.spending_category.clone()));
    let risk_codec = LabelCodec::fit(profiles.iter().map(|p| p.risk_profile.as_str()));
    let target_codec = LabelCodec::fit(target_labels.iter().cloned());
    let n_classes = target_codec.len();
    println!("Encoded target classes: {:?}", target_codec.classes());

    // Build the full feature matrix through the shared engineering path.
    let mut x: Vec<Vec<f64>> = Vec::with_capacity(profiles.len());
    let mut y: Vec<usize> = Vec::with_capacity(profiles.len());
    for (profile, label) in profiles.iter().zip(&target_labels) {
        let engineered = features::engineer(profile)?;
        let spending_code = spending_codec.encode(SPENDING_COLUMN, &profile.spending_category);
        let risk_code = risk_codec.encode(RISK_COLUMN, profile.risk_profile.as_str());
        x.push(features::feature_row(
            profile,
            &engineered,
            spending_code,
            risk_code,
        ));
        let code = target_codec
            .try_encode(label)
            .context("target label missing from fitted codec")?;
        y.push(code);
    }

    // ANOVA feature selection over the full matrix.
    let k = args.top_features.min(FEATURE_COLUMNS.len());
    let scores = anova_f_scores(&x, &y, n_classes);
    let selected = select_top_features(&scores, k);
    let selected_features: Vec<String> = selected
        .iter()
        .map(|&index| FEATURE_COLUMNS[index].to_string())
        .collect();

    let df_between = (n_classes - 1) as f64;
    let df_within = (x.len() - n_classes) as f64;
    let f_dist = FisherSnedecor::new(df_between, df_within).ok();
    println!("\nSelected features ({k}):");
    for &index in &selected {
        let f_score = scores[index];
        let p_value = f_dist
            .as_ref()
            .map(|dist| 1.0 - dist.cdf(f_score))
            .unwrap_or(f64::NAN);
        println!(
            "  {:<24} F={:>10.3}  p={:.2e}",
            FEATURE_COLUMNS[index], f_score, p_value
        );
    }

    let x_selected: Vec<Vec<f64>> = x
        .iter()
        .map(|row| selected.iter().map(|&index| row[index]).collect())
        .collect();

    // Shuffled train/test split.
    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut order: Vec<usize> = (0..x_selected.len()).collect();
    order.shuffle(&mut rng);
    let test_rows = ((x_selected.len() as f64) * args.test_size).floor() as usize;
    let (test_idx, train_idx) = order.split_at(test_rows);

    let mut x_train: Vec<Vec<f64>> = train_idx.iter().map(|&i| x_selected[i].clone()).collect();
    let mut y_train: Vec<usize> = train_idx.iter().map(|&i| y[i]).collect();
    let x_test: Vec<Vec<f64>> = test_idx.iter().map(|&i| x_selected[i].clone()).collect();
    let y_test: Vec<usize> = test_idx.iter().map(|&i| y[i]).collect();

    if x_train.is_empty() {
        bail!("training split is empty; lower --test-size");
    }

    // Balance the classes, then fit the scaler on the balanced split.
    oversample(&mut x_train, &mut y_train, n_classes, &mut rng);
    let scaler = StandardScaler::fit(&x_train);
    let x_train_scaled: Vec<Vec<f64>> = x_train
        .iter()
        .map(|row| scaler.transform(row))
        .collect::<Result<_, _>>()?;

    println!(
        "\nTraining {} one-vs-rest forests on {} samples (trees: {}, depth: {}, min split: {})...",
        n_classes,
        x_train_scaled.len(),
        args.n_trees,
        args.max_depth,
        args.min_split
    );

    let x_matrix = DenseMatrix::from_2d_vec(&x_train_scaled)
        .map_err(|e| anyhow::anyhow!("matrix error: {e}"))?;
    let params = RandomForestRegressorParameters::default()
        .with_n_trees(args.n_trees)
        .with_max_depth(args.max_depth)
        .with_min_samples_split(args.min_split);

    let mut forests = Vec::with_capacity(n_classes);
    for class in 0..n_classes {
        let targets: Vec<f64> = y_train
            .iter()
            .map(|&label| if label == class { 1.0 } else { 0.0 })
            .collect();
        let forest = RandomForestRegressor::fit(&x_matrix, &targets, params.clone())
            .map_err(|e| anyhow::anyhow!("training error for class {class}: {e}"))?;
        forests.push(forest);
    }
    let classifier = ForestEnsembleClassifier::new(forests);

    // Held-out evaluation.
    let accuracy = if x_test.is_empty() {
        println!("No held-out rows; accuracy unavailable, storing 0.0");
        0.0
    } else {
        let mut correct = 0usize;
        let mut per_class_total = vec![0usize; n_classes];
        let mut per_class_correct = vec![0usize; n_classes];
        for (row, &label) in x_test.iter().zip(&y_test) {
            let scaled = scaler.transform(row)?;
            let predicted = classifier.predict(&scaled)?;
            per_class_total[label] += 1;
            if predicted == label {
                correct += 1;
                per_class_correct[label] += 1;
            }
        }
        let accuracy = correct as f64 / x_test.len() as f64;
        println!(
            "\nHeld-out accuracy: {:.1}% ({}/{})",
            accuracy * 100.0,
            correct,
            x_test.len()
        );
        for class in 0..n_classes {
            if per_class_total[class] == 0 {
                continue;
            }
            println!(
                "  {:<16} {:>5.1}% ({}/{})",
                target_codec.decode(class).unwrap_or("?"),
                per_class_correct[class] as f64 / per_class_total[class] as f64 * 100.0,
                per_class_correct[class],
                per_class_total[class]
            );
        }
        accuracy
    };

    let mut encoders = BTreeMap::new();
    encoders.insert(SPENDING_COLUMN.to_string(), spending_codec);
    encoders.insert(RISK_COLUMN.to_string(), risk_codec);
    encoders.insert(TARGET_COLUMN.to_string(), target_codec);

    let artifact = ModelArtifact {
        model_type: "one-vs-rest random forest".to_string(),
        accuracy,
        encoders,
        selector: FeatureSelector::new(
            FEATURE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            selected,
        ),
        scaler,
        selected_features,
        classifier,
    };

    artifact_store::save(&args.output, &artifact)?;
    println!("\nModel artifact saved to {:?}", args.output);

    Ok(())
}
