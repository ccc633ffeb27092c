//! Sparse node × hyperedge incidence matrices

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

/// Binary incidence matrix in coordinate form.
///
/// Entry `(v, e)` is present when node `v` belongs to hyperedge `e`. Entries
/// are sorted by hyperedge, then node, and never repeat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidenceMatrix {
    num_nodes: usize,
    num_hyperedges: usize,
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl IncidenceMatrix {
    /// Build from hyperedge membership lists (already validated)
    pub(crate) fn from_hyperedges(num_nodes: usize, hyperedges: &[Vec<usize>]) -> Self {
        let nnz = hyperedges.iter().map(Vec::len).sum();
        let mut rows = Vec::with_capacity(nnz);
        let mut cols = Vec::with_capacity(nnz);

        for (e, members) in hyperedges.iter().enumerate() {
            for &v in members {
                rows.push(v);
                cols.push(e);
            }
        }

        IncidenceMatrix {
            num_nodes,
            num_hyperedges: hyperedges.len(),
            rows,
            cols,
        }
    }

    /// Number of rows (nodes)
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of columns (hyperedges)
    pub fn num_hyperedges(&self) -> usize {
        self.num_hyperedges
    }

    /// Matrix shape as (nodes, hyperedges)
    pub fn shape(&self) -> (usize, usize) {
        (self.num_nodes, self.num_hyperedges)
    }

    /// Number of stored entries
    pub fn nnz(&self) -> usize {
        self.rows.len()
    }

    /// Iterate over `(node, hyperedge)` coordinates
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().copied().zip(self.cols.iter().copied())
    }

    /// Dense [nodes, hyperedges] matrix with 0/1 values
    pub fn to_dense(&self) -> Array2<f32> {
        let mut dense = Array2::zeros(self.shape());
        for (v, e) in self.entries() {
            dense[[v, e]] = 1.0;
        }
        dense
    }

    /// Number of hyperedges each node belongs to
    pub fn node_degrees(&self) -> Array1<f32> {
        let mut degrees = Array1::zeros(self.num_nodes);
        for &v in &self.rows {
            degrees[v] += 1.0;
        }
        degrees
    }

    /// Number of nodes in each hyperedge
    pub fn hyperedge_degrees(&self) -> Array1<f32> {
        let mut degrees = Array1::zeros(self.num_hyperedges);
        for &e in &self.cols {
            degrees[e] += 1.0;
        }
        degrees
    }

    /// Transposed coordinates as (hyperedge, node) pairs
    pub fn transpose_entries(&self) -> Vec<(usize, usize)> {
        self.entries().map(|(v, e)| (e, v)).collect()
    }
}
