//! Molecular graph representations for hypergraph lifting

mod features;
mod graph_data;
mod molecule;

pub use features::{constant_features, OneHotEncoder};
pub use graph_data::{EdgeIndex, GraphData};
pub use molecule::{examples, AtomType, Bond, BondType, Molecule};
