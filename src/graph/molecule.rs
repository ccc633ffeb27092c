//! Molecular structures with MUTAG atom and bond vocabularies

use super::{EdgeIndex, GraphData, OneHotEncoder};
use crate::{HgnnError, Result};
use serde::{Deserialize, Serialize};

/// Atom types in MUTAG label order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AtomType {
    /// C
    Carbon,
    /// N
    Nitrogen,
    /// O
    Oxygen,
    /// F
    Fluorine,
    /// I
    Iodine,
    /// Cl
    Chlorine,
    /// Br
    Bromine,
}

impl AtomType {
    /// Number of atom classes
    pub const COUNT: usize = 7;

    /// Categorical label used for one-hot features
    pub fn label(self) -> usize {
        match self {
            AtomType::Carbon => 0,
            AtomType::Nitrogen => 1,
            AtomType::Oxygen => 2,
            AtomType::Fluorine => 3,
            AtomType::Iodine => 4,
            AtomType::Chlorine => 5,
            AtomType::Bromine => 6,
        }
    }
}

/// Bond types in MUTAG label order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BondType {
    /// Aromatic ring bond
    Aromatic,
    /// Single bond
    Single,
    /// Double bond
    Double,
    /// Triple bond
    Triple,
}

impl BondType {
    /// Number of bond classes
    pub const COUNT: usize = 4;

    /// Categorical label used for one-hot features
    pub fn label(self) -> usize {
        match self {
            BondType::Aromatic => 0,
            BondType::Single => 1,
            BondType::Double => 2,
            BondType::Triple => 3,
        }
    }
}

/// Molecular bond
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bond {
    /// Index of the first atom
    pub atom1: usize,
    /// Index of the second atom
    pub atom2: usize,
    /// Bond order
    pub bond_type: BondType,
}

/// Molecule representation (heavy atoms only, as in MUTAG)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Molecule {
    /// Atoms in insertion order
    pub atoms: Vec<AtomType>,
    /// Bonds by atom index
    pub bonds: Vec<Bond>,
    /// Common name, if any
    pub name: Option<String>,
}

impl Molecule {
    /// Create new molecule
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a named molecule
    pub fn named(name: &str) -> Self {
        Molecule {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    /// Add atom
    pub fn add_atom(&mut self, atom_type: AtomType) -> usize {
        self.atoms.push(atom_type);
        self.atoms.len() - 1
    }

    /// Add bond
    pub fn add_bond(&mut self, atom1: usize, atom2: usize, bond_type: BondType) {
        self.bonds.push(Bond {
            atom1,
            atom2,
            bond_type,
        });
    }

    /// Attach a nitro group (N bonded to two O) to `atom`
    pub fn add_nitro(&mut self, atom: usize) -> usize {
        let n = self.add_atom(AtomType::Nitrogen);
        let o1 = self.add_atom(AtomType::Oxygen);
        let o2 = self.add_atom(AtomType::Oxygen);
        self.add_bond(atom, n, BondType::Single);
        self.add_bond(n, o1, BondType::Double);
        self.add_bond(n, o2, BondType::Single);
        n
    }

    /// Whether the molecule carries a nitro group
    pub fn has_nitro_group(&self) -> bool {
        self.atoms.iter().enumerate().any(|(idx, &atom)| {
            atom == AtomType::Nitrogen
                && self
                    .bonds
                    .iter()
                    .filter_map(|b| match (b.atom1 == idx, b.atom2 == idx) {
                        (true, _) => Some(b.atom2),
                        (_, true) => Some(b.atom1),
                        _ => None,
                    })
                    .filter(|&other| self.atoms.get(other) == Some(&AtomType::Oxygen))
                    .count()
                    >= 2
        })
    }

    /// Convert to graph data with one-hot atom and bond features
    pub fn to_graph_data(&self, label: u8) -> Result<GraphData> {
        if let Some(bond) = self
            .bonds
            .iter()
            .find(|b| b.atom1 >= self.atoms.len() || b.atom2 >= self.atoms.len())
        {
            return Err(HgnnError::InvalidGraph(format!(
                "bond ({}, {}) references a missing atom",
                bond.atom1, bond.atom2
            )));
        }

        let edges = self.bonds.iter().map(|b| (b.atom1, b.atom2)).collect();
        let (edge_index, kept) = EdgeIndex::from_edges(edges).dedup_undirected();

        let atom_labels: Vec<usize> = self.atoms.iter().map(|a| a.label()).collect();
        let bond_labels: Vec<usize> = kept
            .iter()
            .map(|&pos| self.bonds[pos].bond_type.label())
            .collect();

        let node_features = OneHotEncoder::new(AtomType::COUNT).encode(&atom_labels)?;
        let edge_features = OneHotEncoder::new(BondType::COUNT).encode(&bond_labels)?;

        GraphData::new(self.atoms.len(), edge_index, node_features, edge_features, label)
    }
}

/// Create example molecules
pub mod examples {
    use super::*;

    /// Six aromatic carbons in a ring; returns their indices
    fn benzene_ring(mol: &mut Molecule) -> Vec<usize> {
        let carbons: Vec<usize> = (0..6).map(|_| mol.add_atom(AtomType::Carbon)).collect();
        for i in 0..6 {
            mol.add_bond(carbons[i], carbons[(i + 1) % 6], BondType::Aromatic);
        }
        carbons
    }

    /// Create benzene (C6H6)
    pub fn benzene() -> Molecule {
        let mut mol = Molecule::named("Benzene");
        benzene_ring(&mut mol);
        mol
    }

    /// Create nitrobenzene
    pub fn nitrobenzene() -> Molecule {
        let mut mol = Molecule::named("Nitrobenzene");
        let ring = benzene_ring(&mut mol);
        mol.add_nitro(ring[0]);
        mol
    }

    /// Create 1,3-dinitrobenzene
    pub fn dinitrobenzene() -> Molecule {
        let mut mol = Molecule::named("1,3-Dinitrobenzene");
        let ring = benzene_ring(&mut mol);
        mol.add_nitro(ring[0]);
        mol.add_nitro(ring[2]);
        mol
    }

    /// Create 4-nitrophenol
    pub fn nitrophenol() -> Molecule {
        let mut mol = Molecule::named("4-Nitrophenol");
        let ring = benzene_ring(&mut mol);
        mol.add_nitro(ring[0]);
        let o = mol.add_atom(AtomType::Oxygen);
        mol.add_bond(ring[3], o, BondType::Single);
        mol
    }

    /// Create 2-nitrotoluene
    pub fn nitrotoluene() -> Molecule {
        let mut mol = Molecule::named("2-Nitrotoluene");
        let ring = benzene_ring(&mut mol);
        mol.add_nitro(ring[0]);
        let c = mol.add_atom(AtomType::Carbon);
        mol.add_bond(ring[1], c, BondType::Single);
        mol
    }

    /// Create 1-chloro-4-nitrobenzene
    pub fn chloronitrobenzene() -> Molecule {
        let mut mol = Molecule::named("1-Chloro-4-nitrobenzene");
        let ring = benzene_ring(&mut mol);
        mol.add_nitro(ring[0]);
        let cl = mol.add_atom(AtomType::Chlorine);
        mol.add_bond(ring[3], cl, BondType::Single);
        mol
    }

    /// Create aniline
    pub fn aniline() -> Molecule {
        let mut mol = Molecule::named("Aniline");
        let ring = benzene_ring(&mut mol);
        let n = mol.add_atom(AtomType::Nitrogen);
        mol.add_bond(ring[0], n, BondType::Single);
        mol
    }

    /// Create phenol
    pub fn phenol() -> Molecule {
        let mut mol = Molecule::named("Phenol");
        let ring = benzene_ring(&mut mol);
        let o = mol.add_atom(AtomType::Oxygen);
        mol.add_bond(ring[0], o, BondType::Single);
        mol
    }

    /// Create toluene
    pub fn toluene() -> Molecule {
        let mut mol = Molecule::named("Toluene");
        let ring = benzene_ring(&mut mol);
        let c = mol.add_atom(AtomType::Carbon);
        mol.add_bond(ring[0], c, BondType::Single);
        mol
    }

    /// Create chlorobenzene
    pub fn chlorobenzene() -> Molecule {
        let mut mol = Molecule::named("Chlorobenzene");
        let ring = benzene_ring(&mut mol);
        let cl = mol.add_atom(AtomType::Chlorine);
        mol.add_bond(ring[0], cl, BondType::Single);
        mol
    }

    /// All example molecules
    pub fn all() -> Vec<Molecule> {
        vec![
            benzene(),
            nitrobenzene(),
            aniline(),
            dinitrobenzene(),
            phenol(),
            nitrophenol(),
            toluene(),
            nitrotoluene(),
            chlorobenzene(),
            chloronitrobenzene(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::examples::*;
    use super::*;

    #[test]
    fn test_dangling_bond_is_not_nitro_and_is_rejected() {
        let mut mol = Molecule::new();
        let n = mol.add_atom(AtomType::Nitrogen);
        mol.add_bond(n, 5, BondType::Single);
        mol.add_bond(n, 6, BondType::Double);

        assert!(!mol.has_nitro_group());
        assert!(matches!(mol.to_graph_data(0), Err(HgnnError::InvalidGraph(_))));
    }

    #[test]
    fn test_benzene_graph() {
        let graph = benzene().to_graph_data(0).unwrap();
        assert_eq!(graph.num_nodes, 6);
        assert_eq!(graph.num_edges(), 6);
        assert_eq!(graph.feature_dim(), AtomType::COUNT);
        assert_eq!(graph.edge_feature_dim(), BondType::COUNT);
        // every bond is aromatic
        assert!(graph.edge_features.column(0).iter().all(|&x| x == 1.0));
    }

    #[test]
    fn test_nitro_detection() {
        assert!(nitrobenzene().has_nitro_group());
        assert!(dinitrobenzene().has_nitro_group());
        assert!(!aniline().has_nitro_group());
        assert!(!phenol().has_nitro_group());
    }

    #[test]
    fn test_nitrobenzene_graph() {
        let graph = nitrobenzene().to_graph_data(1).unwrap();
        assert_eq!(graph.num_nodes, 9);
        assert_eq!(graph.num_edges(), 9);
        assert_eq!(graph.label, 1);
        // one nitrogen, two oxygens
        assert_eq!(graph.node_features.column(1).sum(), 1.0);
        assert_eq!(graph.node_features.column(2).sum(), 2.0);
    }

    #[test]
    fn test_duplicate_bond_collapsed() {
        let mut mol = Molecule::new();
        let a = mol.add_atom(AtomType::Carbon);
        let b = mol.add_atom(AtomType::Oxygen);
        mol.add_bond(a, b, BondType::Double);
        mol.add_bond(b, a, BondType::Double);

        let graph = mol.to_graph_data(0).unwrap();
        assert_eq!(graph.num_edges(), 1);
        assert_eq!(graph.edge_features[[0, BondType::Double.label()]], 1.0);
    }

    #[test]
    fn test_dangling_bond_rejected() {
        let mut mol = Molecule::new();
        mol.add_atom(AtomType::Carbon);
        mol.add_bond(0, 3, BondType::Single);
        assert!(mol.to_graph_data(0).is_err());
    }
}
