//! Graph-level classifier wrapping stacked HMPNN layers

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{backend::Backend, Tensor},
};
use serde::{Deserialize, Serialize};

use super::{HmpnnLayer, HmpnnLayerConfig, SampleTensors};
use crate::core::ModelConfig;
use crate::HgnnError;

/// Graph readout over per-node logits
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pooling {
    /// Largest node logit
    #[default]
    Max,
    /// Mean node logit
    Mean,
}

impl Pooling {
    /// Returns the numeric ID stored inside the module.
    pub fn to_id(self) -> u8 {
        match self {
            Pooling::Max => 0,
            Pooling::Mean => 1,
        }
    }

    /// Creates a pooling from its numeric ID; unknown IDs fall back to `Max`.
    pub fn from_id(id: u8) -> Self {
        match id {
            1 => Pooling::Mean,
            _ => Pooling::Max,
        }
    }
}

impl std::str::FromStr for Pooling {
    type Err = HgnnError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "max" => Ok(Self::Max),
            "mean" => Ok(Self::Mean),
            other => Err(HgnnError::Config(format!("unknown pooling '{}'", other))),
        }
    }
}

/// Encoders, HMPNN stack and a linear head producing one logit per graph.
#[derive(Module, Debug)]
pub struct HypergraphNetwork<B: Backend> {
    node_encoder: Linear<B>,
    hyperedge_encoder: Linear<B>,
    layers: Vec<HmpnnLayer<B>>,
    head: Linear<B>,
    pooling_id: u8,
}

impl<B: Backend> HypergraphNetwork<B> {
    /// Build a network for inputs of the given feature widths
    pub fn new(config: &ModelConfig, node_dim: usize, hyperedge_dim: usize, device: &B::Device) -> Self {
        let hidden = config.hidden_channels;
        let layer_config = HmpnnLayerConfig::new(hidden)
            .with_adjacency_dropout(config.adjacency_dropout)
            .with_updating_dropout(config.updating_dropout);

        HypergraphNetwork {
            node_encoder: LinearConfig::new(node_dim, hidden).init(device),
            hyperedge_encoder: LinearConfig::new(hyperedge_dim, hidden).init(device),
            layers: (0..config.n_layers).map(|_| layer_config.init(device)).collect(),
            head: LinearConfig::new(hidden, 1).init(device),
            pooling_id: config.pooling.to_id(),
        }
    }

    /// Forward pass returning a one-element logit tensor
    pub fn forward(&self, input: &SampleTensors<B>) -> Tensor<B, 1> {
        let mut x_0 = self.node_encoder.forward(input.x_0.clone());
        let mut x_1 = self.hyperedge_encoder.forward(input.x_1.clone());

        for layer in &self.layers {
            (x_0, x_1) = layer.forward(
                x_0,
                x_1,
                input.node_to_hyperedge.clone(),
                input.hyperedge_to_node.clone(),
            );
        }

        let node_logits = self.head.forward(x_0);
        let pooled = match Pooling::from_id(self.pooling_id) {
            Pooling::Max => node_logits.max_dim(0),
            Pooling::Mean => node_logits.mean_dim(0),
        };
        pooled.reshape([1])
    }

    /// Number of HMPNN layers
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Readout in use
    pub fn pooling(&self) -> Pooling {
        Pooling::from_id(self.pooling_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{preprocess, toy_dataset};
    use crate::hypergraph::{Aggregation, LiftingStrategy};
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_pooling_ids_roundtrip() {
        for pooling in [Pooling::Max, Pooling::Mean] {
            assert_eq!(Pooling::from_id(pooling.to_id()), pooling);
        }
        assert_eq!("MEAN".parse::<Pooling>().unwrap(), Pooling::Mean);
    }

    #[test]
    fn test_forward_yields_one_logit() {
        let device = <TestBackend as Backend>::Device::default();
        let samples = preprocess(&toy_dataset().unwrap(), LiftingStrategy::Edges).unwrap();

        for pooling in [Pooling::Max, Pooling::Mean] {
            let config = ModelConfig {
                hidden_channels: 8,
                pooling,
                ..ModelConfig::default()
            };
            let model = HypergraphNetwork::<TestBackend>::new(&config, 7, 4, &device);
            assert_eq!(model.num_layers(), config.n_layers);
            assert_eq!(model.pooling(), pooling);

            for sample in &samples {
                let input = SampleTensors::from_sample(sample, Aggregation::Mean, &device);
                let logit = model.forward(&input);
                assert_eq!(logit.dims(), [1]);
                let value: f32 = logit.into_scalar();
                assert!(value.is_finite());
            }
        }
    }
}
