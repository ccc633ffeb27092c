//! Neural network layers and the model wrapper, built on `burn`

mod hmpnn;
mod loss;
mod network;
mod tensors;

pub use hmpnn::{HmpnnLayer, HmpnnLayerConfig};
pub use loss::{bce_with_logits, is_correct, probability};
pub use network::{HypergraphNetwork, Pooling};
pub use tensors::{to_tensor, SampleTensors};
