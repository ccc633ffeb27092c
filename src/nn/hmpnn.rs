//! Hypergraph message passing neural network (HMPNN) layer.
//!
//! One layer performs two rounds of messaging over the incidence structure:
//!
//! 1. node messages `m_v = σ(W_v x_0)` are gathered into hyperedges, `M_e = P_{v→e} m_v`;
//! 2. hyperedge messages `m_e = σ(W_e [x_1 ‖ M_e])` are gathered into nodes, `M_v = P_{e→v} m_e`;
//!
//! and then updates both ranks with `x' = σ(dropout(batchnorm(x)) + M)`.
//!
//! Adjacency dropout removes incidence entries at random (rescaling the
//! survivors) so each step sees a perturbed hypergraph. One mask is drawn
//! per forward pass and applied to both directions, so a node only hears
//! back from hyperedges it contributed to. Dropout and batch
//! statistics only run on an autodiff backend; inference is deterministic.

use burn::{
    module::Module,
    nn::{BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig},
    tensor::{activation::sigmoid, backend::Backend, Distribution, Tensor},
};

/// Configuration for an [`HmpnnLayer`]
#[derive(Debug, Clone)]
pub struct HmpnnLayerConfig {
    /// Width of node and hyperedge features (in and out)
    pub channels: usize,
    /// Probability of dropping an incidence entry during training
    pub adjacency_dropout: f64,
    /// Dropout probability applied to features before the update
    pub updating_dropout: f64,
}

impl HmpnnLayerConfig {
    /// Creates a new config without dropout.
    pub fn new(channels: usize) -> Self {
        Self {
            channels,
            adjacency_dropout: 0.0,
            updating_dropout: 0.0,
        }
    }

    /// Sets the adjacency dropout probability.
    pub fn with_adjacency_dropout(mut self, p: f64) -> Self {
        self.adjacency_dropout = p;
        self
    }

    /// Sets the updating dropout probability.
    pub fn with_updating_dropout(mut self, p: f64) -> Self {
        self.updating_dropout = p;
        self
    }

    /// Initializes the layer with the given device.
    pub fn init<B: Backend>(&self, device: &B::Device) -> HmpnnLayer<B> {
        HmpnnLayer {
            node_messenger: LinearConfig::new(self.channels, self.channels).init(device),
            hyperedge_messenger: LinearConfig::new(2 * self.channels, self.channels).init(device),
            node_norm: BatchNormConfig::new(self.channels).init(device),
            hyperedge_norm: BatchNormConfig::new(self.channels).init(device),
            updating_dropout: DropoutConfig::new(self.updating_dropout).init(),
            adjacency_dropout: self.adjacency_dropout,
            channels: self.channels,
        }
    }
}

/// HMPNN layer with sum/mean aggregation supplied through the incidence operators.
#[derive(Module, Debug)]
pub struct HmpnnLayer<B: Backend> {
    node_messenger: Linear<B>,
    hyperedge_messenger: Linear<B>,
    node_norm: BatchNorm<B, 1>,
    hyperedge_norm: BatchNorm<B, 1>,
    updating_dropout: Dropout,
    adjacency_dropout: f64,
    channels: usize,
}

impl<B: Backend> HmpnnLayer<B> {
    /// Performs the forward pass.
    ///
    /// `x_0` is [nodes, channels], `x_1` is [hyperedges, channels],
    /// `node_to_hyperedge` is [hyperedges, nodes] and `hyperedge_to_node`
    /// is [nodes, hyperedges]. Returns updated `(x_0, x_1)` with the same shapes.
    pub fn forward(
        &self,
        x_0: Tensor<B, 2>,
        x_1: Tensor<B, 2>,
        node_to_hyperedge: Tensor<B, 2>,
        hyperedge_to_node: Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let (node_to_hyperedge, hyperedge_to_node) =
            self.drop_adjacency(node_to_hyperedge, hyperedge_to_node);

        let node_messages = sigmoid(self.node_messenger.forward(x_0.clone()));
        let node_aggregated = node_to_hyperedge.matmul(node_messages);

        let hyperedge_input = Tensor::cat(vec![x_1.clone(), node_aggregated.clone()], 1);
        let hyperedge_messages = sigmoid(self.hyperedge_messenger.forward(hyperedge_input));
        let hyperedge_aggregated = hyperedge_to_node.matmul(hyperedge_messages);

        let x_0 = self.update(&self.node_norm, x_0, hyperedge_aggregated);
        let x_1 = self.update(&self.hyperedge_norm, x_1, node_aggregated);
        (x_0, x_1)
    }

    /// Returns the feature width of this layer.
    pub fn channels(&self) -> usize {
        self.channels
    }

    fn update(&self, norm: &BatchNorm<B, 1>, x: Tensor<B, 2>, messages: Tensor<B, 2>) -> Tensor<B, 2> {
        // BatchNorm<_, 1> expects [batch, channels, length]
        let normalized = norm.forward(x.unsqueeze_dim::<3>(2)).squeeze::<2>(2);
        sigmoid(self.updating_dropout.forward(normalized) + messages)
    }

    /// Drops the same incidence entries from both operators.
    ///
    /// The mask is [nodes, hyperedges]; the gather operator takes its transpose.
    fn drop_adjacency(
        &self,
        node_to_hyperedge: Tensor<B, 2>,
        hyperedge_to_node: Tensor<B, 2>,
    ) -> (Tensor<B, 2>, Tensor<B, 2>) {
        if !B::ad_enabled() || self.adjacency_dropout <= 0.0 {
            return (node_to_hyperedge, hyperedge_to_node);
        }
        let keep = 1.0 - self.adjacency_dropout;
        let mask = Tensor::<B, 2>::random(
            hyperedge_to_node.dims(),
            Distribution::Bernoulli(keep),
            &hyperedge_to_node.device(),
        )
        .div_scalar(keep);

        (
            node_to_hyperedge * mask.clone().transpose(),
            hyperedge_to_node * mask,
        )
    }
}
