//! Degree-normalized incidence operators for message aggregation.
//!
//! With `B` the node × hyperedge incidence matrix, `D_v` the node degrees and
//! `D_e` the hyperedge degrees:
//!
//! | Operator                       | `Sum` | `Mean`      |
//! |--------------------------------|-------|-------------|
//! | nodes → hyperedges (`m × n`)   | `Bᵀ`  | `D_e⁻¹ Bᵀ`  |
//! | hyperedges → nodes (`n × m`)   | `B`   | `D_v⁻¹ B`   |
//!
//! Every operator keeps the support of `B` (or `Bᵀ`): normalization only
//! rescales non-zero entries. Rows or columns with zero degree stay zero.
//!
//! For a 2-complex with signed boundary matrices `B1` (nodes × edges) and
//! `B2` (edges × faces), [`normalized_2d_operators`] returns
//!
//! | Operator | Formula              | Shape           |
//! |----------|----------------------|-----------------|
//! | `B1N`    | `D1⁺ B1`             | nodes × edges   |
//! | `B1TN`   | `D2 B1ᵀ D1⁺`         | edges × nodes   |
//! | `B2N`    | `B2 D3`              | edges × faces   |
//! | `B2TN`   | `D3 B2ᵀ D2⁻¹`        | faces × edges   |
//!
//! with `D2 = max(diag(|B2| 1), I)`, `D1 = 2 diag(|B1| D2 1)` and `D3 = I / 3`.
//! All scalings are positive, so signs are kept entry by entry.

use super::IncidenceMatrix;
use crate::{HgnnError, Result};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Message aggregation over incidence neighbourhoods
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    /// Sum of incoming messages
    #[default]
    Sum,
    /// Mean of incoming messages
    Mean,
}

impl std::str::FromStr for Aggregation {
    type Err = HgnnError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "mean" => Ok(Self::Mean),
            other => Err(HgnnError::Config(format!("unknown aggregation '{}'", other))),
        }
    }
}

fn inverse(degrees: &Array1<f32>) -> Array1<f32> {
    degrees.mapv(|d| if d > 0.0 { 1.0 / d } else { 0.0 })
}

fn inverse_sqrt(degrees: &Array1<f32>) -> Array1<f32> {
    degrees.mapv(|d| if d > 0.0 { d.sqrt().recip() } else { 0.0 })
}

/// Operator gathering node messages into hyperedges, shape [hyperedges, nodes]
pub fn node_to_hyperedge_operator(incidence: &IncidenceMatrix, aggregation: Aggregation) -> Array2<f32> {
    let mut op = Array2::zeros((incidence.num_hyperedges(), incidence.num_nodes()));
    let scale = match aggregation {
        Aggregation::Sum => Array1::ones(incidence.num_hyperedges()),
        Aggregation::Mean => inverse(&incidence.hyperedge_degrees()),
    };

    for (v, e) in incidence.entries() {
        op[[e, v]] = scale[e];
    }
    op
}

/// Operator gathering hyperedge messages into nodes, shape [nodes, hyperedges]
pub fn hyperedge_to_node_operator(incidence: &IncidenceMatrix, aggregation: Aggregation) -> Array2<f32> {
    let mut op = Array2::zeros(incidence.shape());
    let scale = match aggregation {
        Aggregation::Sum => Array1::ones(incidence.num_nodes()),
        Aggregation::Mean => inverse(&incidence.node_degrees()),
    };

    for (v, e) in incidence.entries() {
        op[[v, e]] = scale[v];
    }
    op
}

/// Symmetric normalization `D_v^{-1/2} B D_e^{-1/2}`, shape [nodes, hyperedges]
pub fn symmetric_normalized(incidence: &IncidenceMatrix) -> Array2<f32> {
    let dv = inverse_sqrt(&incidence.node_degrees());
    let de = inverse_sqrt(&incidence.hyperedge_degrees());
    let mut op = Array2::zeros(incidence.shape());

    for (v, e) in incidence.entries() {
        op[[v, e]] = dv[v] * de[e];
    }
    op
}

/// Normalized boundary operators of a 2-complex
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedBoundaries {
    /// `D1⁺ B1`, nodes × edges
    pub b1: Array2<f32>,
    /// `D2 B1ᵀ D1⁺`, edges × nodes
    pub b1t: Array2<f32>,
    /// `B2 D3`, edges × faces
    pub b2: Array2<f32>,
    /// `D3 B2ᵀ D2⁻¹`, faces × edges
    pub b2t: Array2<f32>,
}

fn check_boundaries(b1: &Array2<f32>, b2: &Array2<f32>) -> Result<()> {
    if b1.ncols() != b2.nrows() {
        return Err(HgnnError::ShapeMismatch {
            context: "edge boundary rows",
            expected: b1.ncols(),
            found: b2.nrows(),
        });
    }
    Ok(())
}

/// Per-edge face count, at least 1
fn edge_weights(b2: &Array2<f32>) -> Array1<f32> {
    b2.mapv(f32::abs).sum_axis(Axis(1)).mapv(|d| d.max(1.0))
}

/// `D1⁺` diagonal: reciprocal of `2 |B1| D2 1`, zero for isolated nodes
fn node_weights_inv(b1: &Array2<f32>, d2: &Array1<f32>) -> Array1<f32> {
    inverse(&(b1.mapv(f32::abs).dot(d2) * 2.0))
}

/// `D1⁺ B1`
pub fn b1_normalized(b1: &Array2<f32>, b2: &Array2<f32>) -> Result<Array2<f32>> {
    check_boundaries(b1, b2)?;
    let d1_inv = node_weights_inv(b1, &edge_weights(b2));
    Ok(b1 * &d1_inv.insert_axis(Axis(1)))
}

/// `D2 B1ᵀ D1⁺`
pub fn b1t_normalized(b1: &Array2<f32>, b2: &Array2<f32>) -> Result<Array2<f32>> {
    check_boundaries(b1, b2)?;
    let d2 = edge_weights(b2);
    let d1_inv = node_weights_inv(b1, &d2);
    Ok(&b1.t() * &d2.insert_axis(Axis(1)) * &d1_inv.insert_axis(Axis(0)))
}

/// `B2 D3`
pub fn b2_normalized(b2: &Array2<f32>) -> Array2<f32> {
    b2 / 3.0
}

/// `D3 B2ᵀ D2⁻¹`
pub fn b2t_normalized(b2: &Array2<f32>) -> Array2<f32> {
    let d2_inv = inverse(&edge_weights(b2));
    &b2.t() * &d2_inv.insert_axis(Axis(0)) / 3.0
}

/// All four normalized boundary operators of a 2-complex
pub fn normalized_2d_operators(b1: &Array2<f32>, b2: &Array2<f32>) -> Result<NormalizedBoundaries> {
    Ok(NormalizedBoundaries {
        b1: b1_normalized(b1, b2)?,
        b1t: b1t_normalized(b1, b2)?,
        b2: b2_normalized(b2),
        b2t: b2t_normalized(b2),
    })
}
