//! Training loop and metrics for the hypergraph classifier

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use burn::{
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    tensor::{backend::AutodiffBackend, backend::Backend, ElementConversion},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ModelConfig;
use crate::data::Sample;
use crate::hypergraph::LiftingStrategy;
use crate::nn::{bce_with_logits, is_correct, HypergraphNetwork, SampleTensors};
use crate::utils::{env_bool, env_parse, env_str, load_json};
use crate::{HgnnError, Result};

/// Training configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// TU dataset name, or `toy` for the built-in molecules
    pub dataset: String,
    /// Directory holding downloaded datasets
    pub cache_dir: PathBuf,
    /// Download the dataset when it is missing from `cache_dir`
    pub download: bool,
    /// Graph to hypergraph lifting
    pub lifting: LiftingStrategy,
    /// Number of passes over the training set
    pub epochs: usize,
    /// Adam learning rate
    pub learning_rate: f64,
    /// Evaluate the held-out set every this many epochs
    pub test_interval: usize,
    /// Fraction of samples held out
    pub test_size: f32,
    /// Probability above which a prediction counts as positive
    pub threshold: f32,
    /// Seed for the split, weight init and dropout
    pub seed: u64,
    /// Log every epoch at info level (otherwise debug)
    pub verbose: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        TrainingConfig {
            dataset: "MUTAG".to_string(),
            cache_dir: PathBuf::from("data"),
            download: true,
            lifting: LiftingStrategy::Edges,
            epochs: 50,
            learning_rate: 0.01,
            test_interval: 5,
            test_size: 0.2,
            threshold: 0.5,
            seed: 42,
            verbose: true,
        }
    }
}

impl TrainingConfig {
    /// Set dataset name
    pub fn with_dataset(mut self, dataset: impl Into<String>) -> Self {
        self.dataset = dataset.into();
        self
    }

    /// Set epoch count
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set evaluation cadence
    pub fn with_test_interval(mut self, test_interval: usize) -> Self {
        self.test_interval = test_interval;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set verbosity
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Apply `HGNN_*` environment overrides on top of `self`
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(v) = env_str("HGNN_DATASET") {
            self.dataset = v;
        }
        if let Some(v) = env_str("HGNN_CACHE_DIR") {
            self.cache_dir = PathBuf::from(v);
        }
        if let Some(v) = env_bool("HGNN_DOWNLOAD")? {
            self.download = v;
        }
        if let Some(v) = env_parse("HGNN_LIFTING")? {
            self.lifting = v;
        }
        if let Some(v) = env_parse("HGNN_EPOCHS")? {
            self.epochs = v;
        }
        if let Some(v) = env_parse("HGNN_LEARNING_RATE")? {
            self.learning_rate = v;
        }
        if let Some(v) = env_parse("HGNN_TEST_INTERVAL")? {
            self.test_interval = v;
        }
        if let Some(v) = env_parse("HGNN_TEST_SIZE")? {
            self.test_size = v;
        }
        if let Some(v) = env_parse("HGNN_THRESHOLD")? {
            self.threshold = v;
        }
        if let Some(v) = env_parse("HGNN_SEED")? {
            self.seed = v;
        }
        if let Some(v) = env_bool("HGNN_VERBOSE")? {
            self.verbose = v;
        }
        Ok(self)
    }

    /// Defaults with environment overrides
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides()
    }

    /// Read a JSON file; missing keys keep their defaults
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        load_json(path)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.dataset.trim().is_empty() {
            return Err(HgnnError::Config("dataset name is empty".to_string()));
        }
        if self.epochs == 0 {
            return Err(HgnnError::Config("epochs must be positive".to_string()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate.is_finite()) {
            return Err(HgnnError::Config(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            )));
        }
        if self.test_interval == 0 {
            return Err(HgnnError::Config("test_interval must be positive".to_string()));
        }
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(HgnnError::Config(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(HgnnError::Config(format!(
                "threshold must be in [0, 1], got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Whether 1-based `epoch` runs a held-out evaluation
    pub fn is_test_epoch(&self, epoch: usize) -> bool {
        epoch % self.test_interval == 0
    }
}

/// Loss and accuracy over a set of samples
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Mean binary cross-entropy
    pub loss: f32,
    /// Fraction of thresholded predictions matching the label
    pub accuracy: f32,
}

/// Outcome of one epoch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpochReport {
    /// 1-based epoch number
    pub epoch: usize,
    /// Mean training loss over the epoch
    pub train_loss: f32,
    /// Training accuracy over the epoch
    pub train_accuracy: f32,
    /// Held-out metrics on evaluation epochs
    pub test: Option<Evaluation>,
}

/// Per-epoch reports plus best held-out result
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TrainingHistory {
    /// Reports in epoch order
    pub epochs: Vec<EpochReport>,
    /// Best held-out accuracy seen
    pub best_test_accuracy: Option<f32>,
    /// Epoch of the best held-out accuracy
    pub best_epoch: Option<usize>,
    /// Total training time
    pub total_time: Duration,
}

impl TrainingHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a report, tracking the best held-out accuracy (earliest wins ties)
    pub fn record(&mut self, report: EpochReport) {
        if let Some(test) = report.test {
            let improved = self
                .best_test_accuracy
                .map_or(true, |best| test.accuracy > best);
            if improved {
                self.best_test_accuracy = Some(test.accuracy);
                self.best_epoch = Some(report.epoch);
            }
        }
        self.epochs.push(report);
    }

    /// Last report, if any epoch ran
    pub fn last(&self) -> Option<&EpochReport> {
        self.epochs.last()
    }

    /// Training losses in epoch order
    pub fn train_losses(&self) -> Vec<f32> {
        self.epochs.iter().map(|r| r.train_loss).collect()
    }

    /// Human-readable summary
    pub fn summary(&self) -> String {
        let (final_loss, final_accuracy) = self
            .last()
            .map_or((0.0, 0.0), |r| (r.train_loss, r.train_accuracy));
        let best = match (self.best_test_accuracy, self.best_epoch) {
            (Some(acc), Some(epoch)) => format!("{:.4} at epoch {}", acc, epoch),
            _ => "n/a".to_string(),
        };
        format!(
            "Best test accuracy: {}\nTotal training time: {:.2}s\nFinal train loss: {:.4}\nFinal train accuracy: {:.4}",
            best,
            self.total_time.as_secs_f32(),
            final_loss,
            final_accuracy
        )
    }
}

/// Loss and thresholded accuracy of `model` over `samples`, without updates.
///
/// An empty set yields zero loss and zero accuracy.
pub fn evaluate<B: Backend>(
    model: &HypergraphNetwork<B>,
    samples: &[SampleTensors<B>],
    threshold: f32,
) -> Evaluation {
    if samples.is_empty() {
        return Evaluation::default();
    }

    let mut total_loss = 0.0f32;
    let mut correct = 0usize;
    for input in samples {
        let logit = model.forward(input);
        let loss: f32 = bce_with_logits(logit.clone(), input.target.clone())
            .into_scalar()
            .elem();
        let value: f32 = logit.into_scalar().elem();

        total_loss += loss;
        if is_correct(value, input.label, threshold) {
            correct += 1;
        }
    }

    let n = samples.len() as f32;
    Evaluation {
        loss: total_loss / n,
        accuracy: correct as f32 / n,
    }
}

/// Train a fresh network on `train`, evaluating on `test` every `test_interval` epochs.
///
/// Each training sample is its own Adam step, visited in the given order.
pub fn fit<B: AutodiffBackend>(
    train: &[Sample],
    test: &[Sample],
    model_config: &ModelConfig,
    config: &TrainingConfig,
    device: &B::Device,
) -> Result<(HypergraphNetwork<B>, TrainingHistory)> {
    model_config.validate()?;
    config.validate()?;

    let first = train
        .first()
        .ok_or_else(|| HgnnError::Training("training set is empty".to_string()))?;
    let (node_dim, hyperedge_dim) = (first.node_dim(), first.hyperedge_dim());
    for (idx, sample) in train.iter().chain(test).enumerate() {
        if sample.node_dim() != node_dim || sample.hyperedge_dim() != hyperedge_dim {
            return Err(HgnnError::Dataset(format!(
                "sample {} has feature widths ({}, {}), expected ({}, {})",
                idx,
                sample.node_dim(),
                sample.hyperedge_dim(),
                node_dim,
                hyperedge_dim
            )));
        }
    }

    B::seed(config.seed);
    let aggregation = model_config.aggregation;
    let train_tensors: Vec<SampleTensors<B>> = train
        .iter()
        .map(|s| SampleTensors::from_sample(s, aggregation, device))
        .collect();
    let test_tensors: Vec<SampleTensors<B::InnerBackend>> = test
        .iter()
        .map(|s| SampleTensors::<B>::from_sample(s, aggregation, device).inner())
        .collect();
    if test_tensors.is_empty() {
        warn!("Held-out set is empty; skipping test evaluation");
    }

    let mut model = HypergraphNetwork::<B>::new(model_config, node_dim, hyperedge_dim, device);
    let mut optimizer = AdamConfig::new().init();
    let mut history = TrainingHistory::new();
    let start = Instant::now();

    debug!(
        train = train_tensors.len(),
        test = test_tensors.len(),
        node_dim,
        hyperedge_dim,
        "Starting training"
    );

    for epoch in 1..=config.epochs {
        let mut total_loss = 0.0f32;
        let mut correct = 0usize;

        for input in &train_tensors {
            let logit = model.forward(input);
            let value: f32 = logit.clone().into_scalar().elem();
            let loss = bce_with_logits(logit, input.target.clone());
            let loss_value: f32 = loss.clone().into_scalar().elem();
            if !loss_value.is_finite() {
                return Err(HgnnError::Training(format!(
                    "non-finite loss {} at epoch {}",
                    loss_value, epoch
                )));
            }

            total_loss += loss_value;
            if is_correct(value, input.label, config.threshold) {
                correct += 1;
            }

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optimizer.step(config.learning_rate, model, grads);
        }

        let n = train_tensors.len() as f32;
        let train_loss = total_loss / n;
        let train_accuracy = correct as f32 / n;
        if config.verbose {
            info!("Epoch: {} loss: {:.4} Train_acc: {:.4}", epoch, train_loss, train_accuracy);
        } else {
            debug!("Epoch: {} loss: {:.4} Train_acc: {:.4}", epoch, train_loss, train_accuracy);
        }

        let test_result = if config.is_test_epoch(epoch) && !test_tensors.is_empty() {
            let evaluation = evaluate(&model.valid(), &test_tensors, config.threshold);
            info!("Test_acc: {:.4} Test_loss: {:.4}", evaluation.accuracy, evaluation.loss);
            Some(evaluation)
        } else {
            None
        };

        history.record(EpochReport {
            epoch,
            train_loss,
            train_accuracy,
            test: test_result,
        });
    }

    history.total_time = start.elapsed();
    Ok((model, history))
}
