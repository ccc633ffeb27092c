//! Hypergraphs lifted from molecular graphs

mod incidence;
mod lifting;
pub mod normalization;

pub use incidence::IncidenceMatrix;
pub use lifting::{lift, LiftingStrategy};
pub use normalization::Aggregation;

use crate::{HgnnError, Result};
use serde::{Deserialize, Serialize};

/// Hypergraph over `num_nodes` nodes.
///
/// Each hyperedge is a sorted, duplicate-free, non-empty list of node indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypergraph {
    num_nodes: usize,
    hyperedges: Vec<Vec<usize>>,
}

impl Hypergraph {
    /// Create a hypergraph, normalizing membership lists
    pub fn new(num_nodes: usize, hyperedges: Vec<Vec<usize>>) -> Result<Self> {
        let mut normalized = Vec::with_capacity(hyperedges.len());

        for (e, mut members) in hyperedges.into_iter().enumerate() {
            members.sort_unstable();
            members.dedup();
            if members.is_empty() {
                return Err(HgnnError::InvalidHypergraph(format!(
                    "hyperedge {} is empty",
                    e
                )));
            }
            if let Some(&v) = members.last().filter(|&&v| v >= num_nodes) {
                return Err(HgnnError::InvalidHypergraph(format!(
                    "hyperedge {} references node {} outside 0..{}",
                    e, v, num_nodes
                )));
            }
            normalized.push(members);
        }

        Ok(Hypergraph {
            num_nodes,
            hyperedges: normalized,
        })
    }

    /// Number of nodes
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Number of hyperedges
    pub fn num_hyperedges(&self) -> usize {
        self.hyperedges.len()
    }

    /// Hyperedge membership lists
    pub fn hyperedges(&self) -> &[Vec<usize>] {
        &self.hyperedges
    }

    /// Node × hyperedge incidence matrix
    pub fn incidence_matrix(&self) -> IncidenceMatrix {
        IncidenceMatrix::from_hyperedges(self.num_nodes, &self.hyperedges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_normalized() {
        let hg = Hypergraph::new(4, vec![vec![2, 0, 2], vec![3]]).unwrap();
        assert_eq!(hg.hyperedges(), &[vec![0, 2], vec![3]]);
        assert_eq!(hg.num_hyperedges(), 2);
        assert_eq!(hg.incidence_matrix().shape(), (4, 2));
    }

    #[test]
    fn test_invalid_hyperedges() {
        assert!(Hypergraph::new(2, vec![vec![]]).is_err());
        assert!(Hypergraph::new(2, vec![vec![0, 2]]).is_err());
    }
}
