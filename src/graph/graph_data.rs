//! Graph data structures for molecular samples

use ndarray::{Array1, Array2};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{HgnnError, Result};

/// Edge index representation for sparse adjacency
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeIndex {
    /// Source nodes for each edge
    pub src: Vec<usize>,
    /// Destination nodes for each edge
    pub dst: Vec<usize>,
}

impl EdgeIndex {
    /// Create from edge list
    pub fn from_edges(edges: Vec<(usize, usize)>) -> Self {
        let (src, dst): (Vec<_>, Vec<_>) = edges.into_iter().unzip();
        EdgeIndex { src, dst }
    }

    /// Get number of edges
    pub fn num_edges(&self) -> usize {
        self.src.len()
    }

    /// Iterate over `(src, dst)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.src.iter().copied().zip(self.dst.iter().copied())
    }

    /// Collapse reverse duplicates and drop self-loops.
    ///
    /// Each kept edge is stored as `(min, max)`. The first occurrence of a
    /// pair wins; the returned positions point into the original edge list so
    /// per-edge labels can be realigned.
    pub fn dedup_undirected(&self) -> (Self, Vec<usize>) {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        let mut kept = Vec::new();

        for (pos, (s, d)) in self.iter().enumerate() {
            if s == d {
                continue;
            }
            let key = (s.min(d), s.max(d));
            if seen.insert(key) {
                edges.push(key);
                kept.push(pos);
            }
        }

        (EdgeIndex::from_edges(edges), kept)
    }
}

/// A labelled molecular graph ready for lifting.
///
/// Edges are undirected and stored once; row `k` of `edge_features` belongs
/// to edge `k` of `edge_index`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    /// Number of nodes
    pub num_nodes: usize,

    /// Edge connectivity
    pub edge_index: EdgeIndex,

    /// Node features matrix [num_nodes, feature_dim]
    pub node_features: Array2<f32>,

    /// Edge features matrix [num_edges, edge_feature_dim]
    pub edge_features: Array2<f32>,

    /// Binary class label
    pub label: u8,
}

impl GraphData {
    /// Create new graph data, checking that all shapes agree
    pub fn new(
        num_nodes: usize,
        edge_index: EdgeIndex,
        node_features: Array2<f32>,
        edge_features: Array2<f32>,
        label: u8,
    ) -> Result<Self> {
        if node_features.nrows() != num_nodes {
            return Err(HgnnError::ShapeMismatch {
                context: "node features",
                expected: num_nodes,
                found: node_features.nrows(),
            });
        }
        if edge_features.nrows() != edge_index.num_edges() {
            return Err(HgnnError::ShapeMismatch {
                context: "edge features",
                expected: edge_index.num_edges(),
                found: edge_features.nrows(),
            });
        }
        if let Some((s, d)) = edge_index
            .iter()
            .find(|&(s, d)| s >= num_nodes || d >= num_nodes)
        {
            return Err(HgnnError::InvalidGraph(format!(
                "edge ({}, {}) references a node outside 0..{}",
                s, d, num_nodes
            )));
        }
        if label > 1 {
            return Err(HgnnError::InvalidGraph(format!(
                "label {} is not binary",
                label
            )));
        }

        Ok(GraphData {
            num_nodes,
            edge_index,
            node_features,
            edge_features,
            label,
        })
    }

    /// Get node feature dimension
    pub fn feature_dim(&self) -> usize {
        self.node_features.ncols()
    }

    /// Get edge feature dimension
    pub fn edge_feature_dim(&self) -> usize {
        self.edge_features.ncols()
    }

    /// Get number of edges
    pub fn num_edges(&self) -> usize {
        self.edge_index.num_edges()
    }

    /// Number of incident edges per node
    pub fn degree_vector(&self) -> Array1<f32> {
        let mut degrees = Array1::zeros(self.num_nodes);

        for (s, d) in self.edge_index.iter() {
            degrees[s] += 1.0;
            degrees[d] += 1.0;
        }

        degrees
    }

    /// Build a petgraph view; edge weights are edge positions.
    pub fn to_petgraph(&self) -> UnGraph<(), usize> {
        let mut graph = UnGraph::with_capacity(self.num_nodes, self.num_edges());
        for _ in 0..self.num_nodes {
            graph.add_node(());
        }
        for (pos, (s, d)) in self.edge_index.iter().enumerate() {
            graph.add_edge(NodeIndex::new(s), NodeIndex::new(d), pos);
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn path_graph() -> GraphData {
        let ei = EdgeIndex::from_edges(vec![(0, 1), (1, 2)]);
        let features = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let edge_features = array![[1.0], [0.0]];
        GraphData::new(3, ei, features, edge_features, 1).unwrap()
    }

    #[test]
    fn test_edge_index() {
        let edges = vec![(0, 1), (1, 2), (0, 2)];
        let ei = EdgeIndex::from_edges(edges);

        assert_eq!(ei.num_edges(), 3);
        assert_eq!(ei.iter().nth(2), Some((0, 2)));
    }

    #[test]
    fn test_dedup_undirected() {
        let ei = EdgeIndex::from_edges(vec![(0, 1), (1, 0), (1, 2), (2, 2), (2, 1)]);
        let (dedup, kept) = ei.dedup_undirected();

        assert_eq!(dedup.num_edges(), 2);
        assert_eq!(dedup.iter().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
        assert_eq!(kept, vec![0, 2]);
    }

    #[test]
    fn test_graph_data() {
        let graph = path_graph();
        assert_eq!(graph.num_nodes, 3);
        assert_eq!(graph.feature_dim(), 2);
        assert_eq!(graph.edge_feature_dim(), 1);
        assert_eq!(graph.degree_vector(), array![1.0, 2.0, 1.0]);

        let pg = graph.to_petgraph();
        assert_eq!(pg.node_count(), 3);
        assert_eq!(pg.edge_count(), 2);
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let ei = EdgeIndex::from_edges(vec![(0, 1)]);
        let features = array![[1.0], [1.0]];
        let edge_features = array![[1.0], [1.0]];
        let err = GraphData::new(2, ei, features, edge_features, 0).unwrap_err();
        assert!(matches!(err, HgnnError::ShapeMismatch { context: "edge features", .. }));
    }

    #[test]
    fn test_out_of_range_edge_rejected() {
        let ei = EdgeIndex::from_edges(vec![(0, 5)]);
        let features = array![[1.0], [1.0]];
        let edge_features = array![[1.0]];
        assert!(GraphData::new(2, ei, features, edge_features, 0).is_err());
    }
}
