use crate::domain::errors::ModelError;
use serde::{Deserialize, Serialize};

/// Column-subset mask fitted by the training job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSelector {
    input_columns: Vec<String>,
    selected: Vec<usize>,
}

impl FeatureSelector {
    pub fn new(input_columns: Vec<String>, selected: Vec<usize>) -> Self {
        Self {
            input_columns,
            selected,
        }
    }

    pub fn input_columns(&self) -> &[String] {
        &self.input_columns
    }

    pub fn selected_indices(&self) -> &[usize] {
        &self.selected
    }

    /// Reduces a full feature row to the trained column subset.
    ///
    /// The caller's columns must match the training-time layout exactly. A
    /// mismatch signals train/inference skew and is not retryable.
    pub fn transform(&self, columns: &[&str], row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if columns.len() != self.input_columns.len() {
            return Err(ModelError::SchemaMismatch {
                detail: format!(
                    "expected {} input columns, got {}",
                    self.input_columns.len(),
                    columns.len()
                ),
            });
        }
        if row.len() != columns.len() {
            return Err(ModelError::SchemaMismatch {
                detail: format!(
                    "row has {} values for {} columns",
                    row.len(),
                    columns.len()
                ),
            });
        }
        for (position, (expected, actual)) in self.input_columns.iter().zip(columns).enumerate() {
            if expected.as_str() != *actual {
                return Err(ModelError::SchemaMismatch {
                    detail: format!(
                        "column {position} is '{actual}' but the artifact was trained on '{expected}'"
                    ),
                });
            }
        }

        self.selected
            .iter()
            .map(|&index| {
                row.get(index).copied().ok_or_else(|| ModelError::SchemaMismatch {
                    detail: format!("selected index {index} is out of bounds"),
                })
            })
            .collect()
    }
}

/// Mean/variance normalization fitted on the training split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    std: Vec<f64>,
}

impl StandardScaler {
    /// Fits per-column mean and population standard deviation.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut mean = vec![0.0; n_cols];
        let mut std = vec![0.0; n_cols];
        if n_rows == 0 {
            return Self { mean, std };
        }

        for row in rows {
            for (col, value) in row.iter().enumerate() {
                mean[col] += value;
            }
        }
        for value in &mut mean {
            *value /= n_rows as f64;
        }

        for row in rows {
            for (col, value) in row.iter().enumerate() {
                let delta = value - mean[col];
                std[col] += delta * delta;
            }
        }
        for value in &mut std {
            *value = (*value / n_rows as f64).sqrt();
        }

        Self { mean, std }
    }

    /// Applies (x - mean) / std. Constant columns (zero variance) keep their
    /// centered value, matching the training-time convention.
    pub fn transform(&self, row: &[f64]) -> Result<Vec<f64>, ModelError> {
        if row.len() != self.mean.len() {
            return Err(ModelError::SchemaMismatch {
                detail: format!(
                    "scaler was fitted on {} columns, got {}",
                    self.mean.len(),
                    row.len()
                ),
            });
        }

        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(value, (mean, std))| {
                let scale = if *std > 0.0 { *std } else { 1.0 };
                (value - mean) / scale
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> FeatureSelector {
        FeatureSelector::new(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![0, 2],
        )
    }

    #[test]
    fn test_selector_picks_trained_subset() {
        let reduced = selector().transform(&["a", "b", "c"], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(reduced, vec![1.0, 3.0]);
    }

    #[test]
    fn test_selector_rejects_column_count_mismatch() {
        let err = selector().transform(&["a", "b"], &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ModelError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_selector_rejects_renamed_column() {
        let err = selector()
            .transform(&["a", "x", "c"], &[1.0, 2.0, 3.0])
            .unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_scaler_normalizes_columns() {
        let scaler = StandardScaler::fit(&[vec![1.0, 10.0], vec![3.0, 10.0]]);
        let scaled = scaler.transform(&[3.0, 10.0]).unwrap();
        // Column 0: mean 2, std 1. Column 1 is constant and stays centered.
        assert!((scaled[0] - 1.0).abs() < 1e-12);
        assert_eq!(scaled[1], 0.0);
    }

    #[test]
    fn test_scaler_rejects_wrong_arity() {
        let scaler = StandardScaler::fit(&[vec![1.0, 2.0]]);
        assert!(scaler.transform(&[1.0]).is_err());
    }
}
