//! Property-based checks on incidence structure, operators and metrics.

use hypergraph_tdl::hypergraph::normalization::{
    hyperedge_to_node_operator, node_to_hyperedge_operator, symmetric_normalized,
};
use hypergraph_tdl::nn::{bce_with_logits, is_correct};
use hypergraph_tdl::prelude::*;
use ndarray::Array2;
use proptest::prelude::*;

/// Random hypergraph: node count plus non-empty member lists within range
fn hypergraph_strategy() -> impl Strategy<Value = Hypergraph> {
    (2usize..12).prop_flat_map(|n| {
        prop::collection::vec(prop::collection::vec(0..n, 1..5), 1..10)
            .prop_map(move |edges| Hypergraph::new(n, edges).unwrap())
    })
}

/// Random simple graph with one-hot node features and a single edge feature
fn graph_strategy() -> impl Strategy<Value = GraphData> {
    (2usize..10).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 1..15).prop_map(move |pairs| {
            let edges: Vec<(usize, usize)> = pairs.into_iter().filter(|(u, v)| u != v).collect();
            let (edge_index, _) = EdgeIndex::from_edges(edges).dedup_undirected();
            let m = edge_index.num_edges();
            GraphData::new(
                n,
                edge_index,
                Array2::eye(n),
                Array2::ones((m, 1)),
                0,
            )
            .unwrap()
        })
    })
}

fn support(m: &Array2<f32>) -> Array2<bool> {
    m.mapv(|x| x != 0.0)
}

proptest! {
    #[test]
    fn incidence_column_sums_equal_hyperedge_sizes(hg in hypergraph_strategy()) {
        let incidence = hg.incidence_matrix();
        let dense = incidence.to_dense();
        prop_assert_eq!(incidence.shape(), (hg.num_nodes(), hg.num_hyperedges()));

        for (j, members) in hg.hyperedges().iter().enumerate() {
            prop_assert_eq!(dense.column(j).sum(), members.len() as f32);
        }
        prop_assert_eq!(incidence.nnz() as f32, dense.sum());
    }

    #[test]
    fn operators_keep_incidence_support(hg in hypergraph_strategy()) {
        let incidence = hg.incidence_matrix();
        let pattern = support(&incidence.to_dense());

        for aggregation in [Aggregation::Sum, Aggregation::Mean] {
            let to_nodes = hyperedge_to_node_operator(&incidence, aggregation);
            let to_edges = node_to_hyperedge_operator(&incidence, aggregation);
            prop_assert_eq!(support(&to_nodes), pattern.clone());
            prop_assert_eq!(support(&to_edges.t().to_owned()), pattern.clone());
        }
        prop_assert_eq!(support(&symmetric_normalized(&incidence)), pattern);
    }

    #[test]
    fn edge_lifting_makes_one_pair_per_bond(graph in graph_strategy()) {
        let (hg, features) = lift(&graph, LiftingStrategy::Edges).unwrap();
        prop_assert_eq!(hg.num_hyperedges(), graph.num_edges());
        prop_assert_eq!(features.nrows(), graph.num_edges());
        prop_assert!(hg.hyperedges().iter().all(|e| e.len() == 2));
    }

    #[test]
    fn neighborhood_hyperedges_contain_their_center(graph in graph_strategy()) {
        let (hg, features) = lift(&graph, LiftingStrategy::Neighborhoods).unwrap();
        prop_assert_eq!(features.nrows(), hg.num_hyperedges());
        prop_assert!(hg.num_hyperedges() <= graph.num_nodes);
        prop_assert!(hg.hyperedges().iter().all(|e| e.len() >= 2));
    }

    #[test]
    fn accuracy_is_a_fraction(
        logits in prop::collection::vec(-20.0f32..20.0, 1..40),
        threshold in 0.0f32..1.0,
        seed in any::<u64>(),
    ) {
        let labels: Vec<u8> = logits
            .iter()
            .enumerate()
            .map(|(i, _)| ((seed >> (i % 64)) & 1) as u8)
            .collect();
        let correct = logits
            .iter()
            .zip(&labels)
            .filter(|(&z, &y)| is_correct(z, y, threshold))
            .count();
        let accuracy = correct as f32 / logits.len() as f32;
        prop_assert!((0.0..=1.0).contains(&accuracy));
    }

    #[test]
    fn loss_is_finite_and_non_negative(z in -500.0f32..500.0, label in 0u8..2) {
        use burn::backend::NdArray;
        use burn::tensor::Tensor;

        let device = Default::default();
        let logits = Tensor::<NdArray, 1>::from_floats([z], &device);
        let targets = Tensor::<NdArray, 1>::from_floats([f32::from(label)], &device);
        let loss: f32 = bce_with_logits(logits, targets).into_scalar();
        prop_assert!(loss.is_finite());
        prop_assert!(loss >= 0.0);
    }
}
