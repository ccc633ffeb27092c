//! # Hypergraph-TDL: hypergraph message passing on molecular graphs
//!
//! This library lifts molecular graphs into hypergraphs and trains a small
//! hypergraph message passing network (HMPNN) to classify them, using the
//! `burn` framework for tensors, automatic differentiation and optimization.
//!
//! ## Pipeline
//!
//! - **Data**: TU benchmark loader (MUTAG) and a built-in toy molecule set
//! - **Lifting**: graph to hypergraph conversion and incidence matrices
//! - **Model**: a thin network wrapping stacked HMPNN layers
//! - **Training**: per-sample Adam steps with periodic held-out evaluation

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Molecular graph data structures and featurization
pub mod graph;

/// Hypergraphs, incidence matrices and lifting
pub mod hypergraph;

/// Dataset loading, preprocessing and splitting
pub mod data;

/// Neural network layers and model wrapper
pub mod nn;

/// Configuration and the training loop
pub mod core;

/// Utility functions and helpers
pub mod utils;

use std::path::PathBuf;

// Re-export commonly used types
pub use graph::{EdgeIndex, GraphData, Molecule};
pub use hypergraph::{Hypergraph, IncidenceMatrix, LiftingStrategy};
pub use data::{Sample, TuDataset};
pub use nn::{HmpnnLayer, HypergraphNetwork};
pub use crate::core::{fit, ExperimentConfig, ModelConfig, TrainingConfig, TrainingHistory};

/// Autodiff backend used for training.
pub type TrainBackend = burn::backend::Autodiff<burn::backend::NdArray>;

/// Backend used for held-out evaluation (no autodiff).
pub type InferenceBackend = burn::backend::NdArray;

/// Error types for the library
#[derive(Debug, thiserror::Error)]
pub enum HgnnError {
    /// Invalid graph structure
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Invalid hypergraph structure
    #[error("Invalid hypergraph: {0}")]
    InvalidHypergraph(String),

    /// Row counts of features and incidence do not agree
    #[error("Shape mismatch in {context}: expected {expected} rows, found {found}")]
    ShapeMismatch {
        /// What was being checked
        context: &'static str,
        /// Expected row count
        expected: usize,
        /// Actual row count
        found: usize,
    },

    /// Dataset content is inconsistent
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Dataset files are missing from the cache directory
    #[error("Dataset {name} not found (expected {})", path.display())]
    DatasetNotFound {
        /// Dataset name
        name: String,
        /// Path that was looked up
        path: PathBuf,
    },

    /// Malformed line in a dataset file
    #[error("Parse error in {file} at line {line}: {message}")]
    Parse {
        /// File name
        file: String,
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// Fetching or unpacking a dataset archive failed
    #[error("Download error: {0}")]
    Download(String),

    /// Invalid configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Training diverged or could not run
    #[error("Training error: {0}")]
    Training(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, HgnnError>;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        core::{fit, EpochReport, Evaluation, ExperimentConfig, ModelConfig, TrainingConfig, TrainingHistory},
        data::{preprocess, toy_dataset, train_test_split, Sample, TuDataset},
        graph::{EdgeIndex, GraphData, Molecule},
        hypergraph::{lift, Aggregation, Hypergraph, IncidenceMatrix, LiftingStrategy},
        nn::{HypergraphNetwork, Pooling, SampleTensors},
        HgnnError, InferenceBackend, Result, TrainBackend,
    };
}
