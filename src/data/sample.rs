//! Preprocessed training samples

use crate::graph::GraphData;
use crate::hypergraph::{lift, IncidenceMatrix, LiftingStrategy};
use crate::{HgnnError, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// One compound after lifting: node features, hyperedge features, incidence and label
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    x_0: Array2<f32>,
    x_1: Array2<f32>,
    incidence: IncidenceMatrix,
    label: u8,
}

impl Sample {
    /// Create a sample, checking feature rows against the incidence shape
    pub fn new(
        x_0: Array2<f32>,
        x_1: Array2<f32>,
        incidence: IncidenceMatrix,
        label: u8,
    ) -> Result<Self> {
        if x_0.nrows() != incidence.num_nodes() {
            return Err(HgnnError::ShapeMismatch {
                context: "node features vs incidence rows",
                expected: incidence.num_nodes(),
                found: x_0.nrows(),
            });
        }
        if x_1.nrows() != incidence.num_hyperedges() {
            return Err(HgnnError::ShapeMismatch {
                context: "hyperedge features vs incidence columns",
                expected: incidence.num_hyperedges(),
                found: x_1.nrows(),
            });
        }
        Ok(Sample {
            x_0,
            x_1,
            incidence,
            label,
        })
    }

    /// Lift a graph and derive its incidence matrix
    pub fn from_graph(graph: &GraphData, strategy: LiftingStrategy) -> Result<Self> {
        let (hypergraph, x_1) = lift(graph, strategy)?;
        Sample::new(
            graph.node_features.clone(),
            x_1,
            hypergraph.incidence_matrix(),
            graph.label,
        )
    }

    /// Node features [nodes, node_dim]
    pub fn x_0(&self) -> &Array2<f32> {
        &self.x_0
    }

    /// Hyperedge features [hyperedges, edge_dim]
    pub fn x_1(&self) -> &Array2<f32> {
        &self.x_1
    }

    /// Incidence matrix [nodes, hyperedges]
    pub fn incidence(&self) -> &IncidenceMatrix {
        &self.incidence
    }

    /// Binary label
    pub fn label(&self) -> u8 {
        self.label
    }

    /// Node feature width
    pub fn node_dim(&self) -> usize {
        self.x_0.ncols()
    }

    /// Hyperedge feature width
    pub fn hyperedge_dim(&self) -> usize {
        self.x_1.ncols()
    }
}
