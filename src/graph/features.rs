//! Feature encoding for categorical node and edge labels

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{HgnnError, Result};

/// One-hot encoder for categorical labels
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneHotEncoder {
    dim: usize,
}

impl OneHotEncoder {
    /// Create an encoder producing `dim` columns
    pub fn new(dim: usize) -> Self {
        OneHotEncoder { dim }
    }

    /// Encoder sized to fit the largest label seen
    pub fn fit(labels: &[usize]) -> Self {
        let dim = labels.iter().max().map_or(1, |&m| m + 1);
        OneHotEncoder { dim }
    }

    /// Get the feature dimension
    pub fn feature_dim(&self) -> usize {
        self.dim
    }

    /// Encode labels into a [labels.len(), dim] matrix
    pub fn encode(&self, labels: &[usize]) -> Result<Array2<f32>> {
        let mut features = Array2::zeros((labels.len(), self.dim));

        for (row, &label) in labels.iter().enumerate() {
            if label >= self.dim {
                return Err(HgnnError::InvalidGraph(format!(
                    "label {} does not fit a one-hot encoding of width {}",
                    label, self.dim
                )));
            }
            features[[row, label]] = 1.0;
        }

        Ok(features)
    }
}

/// Constant single-column features for unlabelled nodes or edges
pub fn constant_features(rows: usize) -> Array2<f32> {
    Array2::ones((rows, 1))
}
