//! Train the HMPNN classifier on MUTAG (or the built-in toy molecules).
//!
//! Environment:
//! - `HGNN_LOG`: tracing filter, default `info`
//! - `HGNN_CONFIG`: optional JSON file with `model` and `training` sections
//! - `HGNN_DATASET`, `HGNN_EPOCHS`, ...: per-field overrides
//! - `HGNN_DOWNLOAD=0`: never fetch a missing dataset

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use hypergraph_tdl::core::ExperimentConfig;
use hypergraph_tdl::data::{preprocess, toy_dataset, train_test_split, TuDataset, TOY_DATASET};
use hypergraph_tdl::utils::{env_str, timing::Timer};
use hypergraph_tdl::{fit, Result, TrainBackend};

fn main() -> ExitCode {
    let filter = env_str("HGNN_LOG")
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = match env_str("HGNN_CONFIG") {
        Some(path) => ExperimentConfig::from_json_file(path)?.with_env_overrides()?,
        None => ExperimentConfig::from_env()?,
    };
    config.validate()?;
    let ExperimentConfig { model, training } = config;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        dataset = %training.dataset,
        lifting = ?training.lifting,
        epochs = training.epochs,
        "Starting hypergraph training"
    );

    let graphs = if training.dataset.eq_ignore_ascii_case(TOY_DATASET) {
        toy_dataset()?
    } else {
        let dataset = if training.download {
            TuDataset::fetch(&training.dataset, &training.cache_dir)?
        } else {
            TuDataset::load(&training.dataset, &training.cache_dir)?
        };
        let (negatives, positives) = dataset.class_counts();
        info!(graphs = dataset.len(), negatives, positives, "Loaded dataset");
        dataset.into_graphs()
    };

    let samples = {
        let _timer = Timer::new("preprocess");
        preprocess(&graphs, training.lifting)?
    };
    let (train, test) = train_test_split(samples, training.test_size, training.seed);
    info!(train = train.len(), test = test.len(), "Split dataset");

    let device = Default::default();
    let (_model, history) = fit::<TrainBackend>(&train, &test, &model, &training, &device)?;

    info!("Training complete\n{}", history.summary());
    Ok(())
}
