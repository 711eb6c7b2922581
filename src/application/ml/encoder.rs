use serde::{Deserialize, Serialize};
use tracing::warn;

/// Per-column categorical codec fitted at training time.
///
/// Codes are assigned in lexicographic class order, so the same label set
/// always yields the same codes regardless of dataset row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCodec {
    classes: Vec<String>,
}

impl LabelCodec {
    /// Fits a codec over the labels observed in a training column.
    pub fn fit<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = labels.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Code for a label seen during training.
    pub fn try_encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Encodes a label, falling back to the first trained code for labels the
    /// training data never contained. The fallback is logged so unseen
    /// categories stay visible in operations.
    pub fn encode(&self, column: &str, label: &str) -> usize {
        match self.try_encode(label) {
            Some(code) => code,
            None => {
                warn!(
                    "Unseen {} label '{}', falling back to default code 0",
                    column, label
                );
                0
            }
        }
    }

    /// Label for a trained code.
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }
}
