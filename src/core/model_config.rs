//! Model hyperparameters

use serde::{Deserialize, Serialize};

use crate::hypergraph::Aggregation;
use crate::nn::Pooling;
use crate::utils::env_parse;
use crate::{HgnnError, Result};

/// Architecture of the hypergraph network
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Width of node and hyperedge features inside the HMPNN stack
    pub hidden_channels: usize,
    /// Number of stacked HMPNN layers
    pub n_layers: usize,
    /// Probability of dropping an incidence entry during training
    pub adjacency_dropout: f64,
    /// Feature dropout before the update step
    pub updating_dropout: f64,
    /// Message aggregation
    pub aggregation: Aggregation,
    /// Graph readout
    pub pooling: Pooling,
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            hidden_channels: 64,
            n_layers: 2,
            adjacency_dropout: 0.7,
            updating_dropout: 0.5,
            aggregation: Aggregation::Sum,
            pooling: Pooling::Max,
        }
    }
}

impl ModelConfig {
    /// Set hidden width
    pub fn with_hidden_channels(mut self, hidden_channels: usize) -> Self {
        self.hidden_channels = hidden_channels;
        self
    }

    /// Set layer count
    pub fn with_layers(mut self, n_layers: usize) -> Self {
        self.n_layers = n_layers;
        self
    }

    /// Set both dropout probabilities
    pub fn with_dropout(mut self, adjacency: f64, updating: f64) -> Self {
        self.adjacency_dropout = adjacency;
        self.updating_dropout = updating;
        self
    }

    /// Apply `HGNN_*` environment overrides on top of `self`
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(v) = env_parse("HGNN_HIDDEN_CHANNELS")? {
            self.hidden_channels = v;
        }
        if let Some(v) = env_parse("HGNN_LAYERS")? {
            self.n_layers = v;
        }
        if let Some(v) = env_parse("HGNN_ADJACENCY_DROPOUT")? {
            self.adjacency_dropout = v;
        }
        if let Some(v) = env_parse("HGNN_UPDATING_DROPOUT")? {
            self.updating_dropout = v;
        }
        if let Some(v) = env_parse("HGNN_AGGREGATION")? {
            self.aggregation = v;
        }
        if let Some(v) = env_parse("HGNN_POOLING")? {
            self.pooling = v;
        }
        Ok(self)
    }

    /// Defaults with environment overrides
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.hidden_channels == 0 {
            return Err(HgnnError::Config("hidden_channels must be positive".to_string()));
        }
        if self.n_layers == 0 {
            return Err(HgnnError::Config("n_layers must be at least 1".to_string()));
        }
        for (name, p) in [
            ("adjacency_dropout", self.adjacency_dropout),
            ("updating_dropout", self.updating_dropout),
        ] {
            // p = 1 would drop everything and divide by zero when rescaling
            if !(0.0..1.0).contains(&p) {
                return Err(HgnnError::Config(format!("{} must be in [0, 1), got {}", name, p)));
            }
        }
        Ok(())
    }
}
