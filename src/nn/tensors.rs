//! Conversion of preprocessed samples into backend tensors

use burn::tensor::{backend::AutodiffBackend, backend::Backend, Tensor, TensorData};
use ndarray::Array2;

use crate::data::Sample;
use crate::hypergraph::normalization::{hyperedge_to_node_operator, node_to_hyperedge_operator};
use crate::hypergraph::Aggregation;

/// Model inputs for one sample.
///
/// `node_to_hyperedge` is [hyperedges, nodes] and `hyperedge_to_node` is
/// [nodes, hyperedges]; both already carry the aggregation scaling.
#[derive(Clone, Debug)]
pub struct SampleTensors<B: Backend> {
    /// Node features [nodes, node_dim]
    pub x_0: Tensor<B, 2>,
    /// Hyperedge features [hyperedges, edge_dim]
    pub x_1: Tensor<B, 2>,
    /// Gathers node messages into hyperedges
    pub node_to_hyperedge: Tensor<B, 2>,
    /// Gathers hyperedge messages into nodes
    pub hyperedge_to_node: Tensor<B, 2>,
    /// Label as a one-element float tensor
    pub target: Tensor<B, 1>,
    /// Label
    pub label: u8,
}

impl<B: Backend> SampleTensors<B> {
    /// Build tensors for `sample` on `device`
    pub fn from_sample(sample: &Sample, aggregation: Aggregation, device: &B::Device) -> Self {
        let incidence = sample.incidence();
        SampleTensors {
            x_0: to_tensor(sample.x_0(), device),
            x_1: to_tensor(sample.x_1(), device),
            node_to_hyperedge: to_tensor(&node_to_hyperedge_operator(incidence, aggregation), device),
            hyperedge_to_node: to_tensor(&hyperedge_to_node_operator(incidence, aggregation), device),
            target: Tensor::from_floats([f32::from(sample.label())], device),
            label: sample.label(),
        }
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.x_0.dims()[0]
    }

    /// Number of hyperedges
    pub fn num_hyperedges(&self) -> usize {
        self.x_1.dims()[0]
    }
}

impl<B: AutodiffBackend> SampleTensors<B> {
    /// Same tensors on the inner (non-autodiff) backend
    pub fn inner(&self) -> SampleTensors<B::InnerBackend> {
        SampleTensors {
            x_0: self.x_0.clone().inner(),
            x_1: self.x_1.clone().inner(),
            node_to_hyperedge: self.node_to_hyperedge.clone().inner(),
            hyperedge_to_node: self.hyperedge_to_node.clone().inner(),
            target: self.target.clone().inner(),
            label: self.label,
        }
    }
}

/// Copy a row-major ndarray matrix into a 2-D tensor
pub fn to_tensor<B: Backend>(array: &Array2<f32>, device: &B::Device) -> Tensor<B, 2> {
    let (rows, cols) = array.dim();
    let values: Vec<f32> = array.iter().copied().collect();
    Tensor::from_data(TensorData::new(values, [rows, cols]), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::examples;
    use crate::hypergraph::LiftingStrategy;
    use burn::backend::NdArray;
    use ndarray::array;

    type TestBackend = NdArray;

    #[test]
    fn test_to_tensor_layout() {
        let device = <TestBackend as Backend>::Device::default();
        let t = to_tensor::<TestBackend>(&array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]], &device);

        assert_eq!(t.dims(), [2, 3]);
        let values: Vec<f32> = t.into_data().to_vec().unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_sample_tensor_shapes() {
        let device = <TestBackend as Backend>::Device::default();
        let graph = examples::nitrobenzene().to_graph_data(1).unwrap();
        let sample = Sample::from_graph(&graph, LiftingStrategy::Edges).unwrap();

        let tensors = SampleTensors::<TestBackend>::from_sample(&sample, Aggregation::Sum, &device);
        assert_eq!(tensors.num_nodes(), 9);
        assert_eq!(tensors.num_hyperedges(), 9);
        assert_eq!(tensors.node_to_hyperedge.dims(), [9, 9]);
        assert_eq!(tensors.x_0.dims(), [9, 7]);
        assert_eq!(tensors.x_1.dims(), [9, 4]);
        assert_eq!(tensors.label, 1);

        // every hyperedge gathers exactly its two atoms
        let gathered: Vec<f32> = tensors
            .node_to_hyperedge
            .sum_dim(1)
            .into_data()
            .to_vec()
            .unwrap();
        assert!(gathered.iter().all(|&s| s == 2.0));
    }
}
