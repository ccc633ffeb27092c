//! Configuration and the training loop

mod model_config;
mod training;

pub use model_config::ModelConfig;
pub use training::{evaluate, fit, EpochReport, Evaluation, TrainingConfig, TrainingHistory};

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::load_json;
use crate::Result;

/// Model and training settings loaded together
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Network architecture
    pub model: ModelConfig,
    /// Training loop settings
    pub training: TrainingConfig,
}

impl ExperimentConfig {
    /// Defaults with `HGNN_*` environment overrides
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Read a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path)
    }

    /// Apply environment overrides to both sections
    pub fn with_env_overrides(self) -> Result<Self> {
        Ok(ExperimentConfig {
            model: self.model.with_env_overrides()?,
            training: self.training.with_env_overrides()?,
        })
    }

    /// Validate both sections
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.training.validate()
    }
}
