//! Lift molecular graphs to hypergraphs

use super::Hypergraph;
use crate::graph::GraphData;
use crate::{HgnnError, Result};
use ndarray::Array2;
use petgraph::graph::NodeIndex;
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

/// How graph structure becomes hyperedges
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiftingStrategy {
    /// One two-node hyperedge per bond, carrying the bond features
    #[default]
    Edges,
    /// One hyperedge per non-isolated atom: its closed neighbourhood,
    /// carrying the mean of the incident bond features
    Neighborhoods,
}

impl std::str::FromStr for LiftingStrategy {
    type Err = HgnnError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "edges" => Ok(Self::Edges),
            "neighborhoods" | "neighbourhoods" => Ok(Self::Neighborhoods),
            other => Err(HgnnError::Config(format!(
                "unknown lifting strategy '{}'",
                other
            ))),
        }
    }
}

/// Lift a graph, returning the hypergraph and its hyperedge feature matrix.
///
/// Row `e` of the feature matrix belongs to hyperedge `e`.
pub fn lift(graph: &GraphData, strategy: LiftingStrategy) -> Result<(Hypergraph, Array2<f32>)> {
    match strategy {
        LiftingStrategy::Edges => lift_edges(graph),
        LiftingStrategy::Neighborhoods => lift_neighborhoods(graph),
    }
}

fn lift_edges(graph: &GraphData) -> Result<(Hypergraph, Array2<f32>)> {
    let hyperedges = graph.edge_index.iter().map(|(s, d)| vec![s, d]).collect();
    let hypergraph = Hypergraph::new(graph.num_nodes, hyperedges)?;
    Ok((hypergraph, graph.edge_features.clone()))
}

fn lift_neighborhoods(graph: &GraphData) -> Result<(Hypergraph, Array2<f32>)> {
    let pg = graph.to_petgraph();
    let mut hyperedges = Vec::new();
    let mut incident_bonds: Vec<Vec<usize>> = Vec::new();

    for node in 0..graph.num_nodes {
        let idx = NodeIndex::new(node);
        let incident: Vec<usize> = pg.edges(idx).map(|e| *e.weight()).collect();
        if incident.is_empty() {
            continue;
        }

        let mut members: Vec<usize> = pg.neighbors(idx).map(|n| n.index()).collect();
        members.push(node);
        hyperedges.push(members);
        incident_bonds.push(incident);
    }

    let mut features = Array2::zeros((hyperedges.len(), graph.edge_feature_dim()));
    for (e, incident) in incident_bonds.iter().enumerate() {
        let scale = 1.0 / incident.len() as f32;
        let mut row = features.row_mut(e);
        for &pos in incident {
            row.scaled_add(scale, &graph.edge_features.row(pos));
        }
    }

    let hypergraph = Hypergraph::new(graph.num_nodes, hyperedges)?;
    Ok((hypergraph, features))
}
