//! Dataset loading and preprocessing

mod download;
mod sample;
mod split;
mod tu;

pub use download::{download_tu, unpack_archive, TU_BASE_URL};
pub use sample::Sample;
pub use split::{test_count, train_test_split};
pub use tu::TuDataset;

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::graph::{examples, GraphData};
use crate::hypergraph::LiftingStrategy;
use crate::Result;

/// Name that selects the built-in molecules instead of a TU dataset
pub const TOY_DATASET: &str = "toy";

/// Built-in molecules, labelled 1 when they carry a nitro group
pub fn toy_dataset() -> Result<Vec<GraphData>> {
    examples::all()
        .iter()
        .map(|mol| mol.to_graph_data(u8::from(mol.has_nitro_group())))
        .collect()
}

/// Lift every graph and build its incidence matrix, in parallel.
///
/// Output keeps input order. Graphs without hyperedges are skipped.
pub fn preprocess(graphs: &[GraphData], strategy: LiftingStrategy) -> Result<Vec<Sample>> {
    let lifted = graphs
        .par_iter()
        .map(|graph| Sample::from_graph(graph, strategy))
        .collect::<Result<Vec<_>>>()?;

    let total = lifted.len();
    let samples: Vec<Sample> = lifted
        .into_iter()
        .enumerate()
        .filter_map(|(idx, sample)| {
            if sample.incidence().num_hyperedges() == 0 {
                warn!(sample = idx, "Skipping graph without hyperedges");
                None
            } else {
                Some(sample)
            }
        })
        .collect();

    debug!(kept = samples.len(), total, ?strategy, "Preprocessed samples");
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{AtomType, Molecule};

    #[test]
    fn test_toy_dataset_balanced() {
        let graphs = toy_dataset().unwrap();
        let positives = graphs.iter().filter(|g| g.label == 1).count();
        assert_eq!(graphs.len(), 10);
        assert_eq!(positives, 5);
    }

    #[test]
    fn test_preprocess_keeps_order_and_skips_empty() {
        let mut lone = Molecule::new();
        lone.add_atom(AtomType::Carbon);

        let mut graphs = toy_dataset().unwrap();
        graphs.insert(1, lone.to_graph_data(0).unwrap());

        let samples = preprocess(&graphs, LiftingStrategy::Edges).unwrap();
        assert_eq!(samples.len(), graphs.len() - 1);
        assert_eq!(samples[0].x_0(), &graphs[0].node_features);
        assert_eq!(samples[1].x_0(), &graphs[2].node_features);
    }
}
