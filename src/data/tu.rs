//! Loader for TU benchmark datasets (MUTAG and friends).
//!
//! A dataset named `NAME` is a directory of plain-text files:
//!
//! | File                       | Content                                      |
//! |----------------------------|----------------------------------------------|
//! | `NAME_A.txt`               | `i, j` per line, 1-based global node ids     |
//! | `NAME_graph_indicator.txt` | graph id (1-based) of node `i` on line `i`   |
//! | `NAME_graph_labels.txt`    | class label of graph `g` on line `g`         |
//! | `NAME_node_labels.txt`     | optional categorical label per node          |
//! | `NAME_edge_labels.txt`     | optional categorical label per line of `_A`  |
//!
//! The directory is looked up as `<cache>/NAME/raw` first, then `<cache>/NAME`.
//! [`TuDataset::fetch`] downloads the archive into `<cache>/NAME/raw` when
//! neither exists.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::download::{download_tu, TU_BASE_URL};
use crate::graph::{constant_features, EdgeIndex, GraphData, OneHotEncoder};
use crate::{HgnnError, Result};

/// An in-memory TU dataset of binary-labelled graphs
#[derive(Clone, Debug)]
pub struct TuDataset {
    name: String,
    graphs: Vec<GraphData>,
}

impl TuDataset {
    /// Resolve `name` inside `cache_dir` and load it
    pub fn load(name: &str, cache_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = Self::resolve_dir(name, cache_dir.as_ref())?;
        Self::from_dir(name, &dir)
    }

    /// Like [`TuDataset::load`], downloading the dataset first when it is not cached
    pub fn fetch(name: &str, cache_dir: impl AsRef<Path>) -> Result<Self> {
        Self::fetch_from(name, cache_dir, TU_BASE_URL)
    }

    /// [`TuDataset::fetch`] against a specific mirror
    pub fn fetch_from(name: &str, cache_dir: impl AsRef<Path>, base_url: &str) -> Result<Self> {
        let cache_dir = cache_dir.as_ref();
        let dir = match Self::resolve_dir(name, cache_dir) {
            Ok(dir) => dir,
            Err(HgnnError::DatasetNotFound { .. }) => download_tu(name, cache_dir, base_url)?,
            Err(e) => return Err(e),
        };
        Self::from_dir(name, &dir)
    }

    /// Find the directory holding `NAME_A.txt`
    pub fn resolve_dir(name: &str, cache_dir: &Path) -> Result<PathBuf> {
        let root = cache_dir.join(name);
        [root.join("raw"), root.clone()]
            .into_iter()
            .find(|dir| dir.join(format!("{}_A.txt", name)).is_file())
            .ok_or_else(|| HgnnError::DatasetNotFound {
                name: name.to_string(),
                path: root.join("raw").join(format!("{}_A.txt", name)),
            })
    }

    /// Load from a directory that directly contains the dataset files
    pub fn from_dir(name: &str, dir: &Path) -> Result<Self> {
        let file = |suffix: &str| dir.join(format!("{}_{}.txt", name, suffix));

        let edges = read_rows(&file("A"), 2)?;
        let indicator = read_column(&file("graph_indicator"))?;
        let raw_graph_labels = read_column(&file("graph_labels"))?;
        let node_labels = read_optional_column(&file("node_labels"))?;
        let edge_labels = read_optional_column(&file("edge_labels"))?;

        let graph_labels = binarize_labels(&raw_graph_labels)?;
        let graphs = assemble(
            &edges,
            &indicator,
            &graph_labels,
            node_labels.as_deref(),
            edge_labels.as_deref(),
        )?;

        debug!(
            dataset = name,
            graphs = graphs.len(),
            nodes = indicator.len(),
            edges = edges.len(),
            "Loaded TU dataset"
        );

        Ok(TuDataset {
            name: name.to_string(),
            graphs,
        })
    }

    /// Dataset name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get number of graphs
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Borrow the graphs
    pub fn graphs(&self) -> &[GraphData] {
        &self.graphs
    }

    /// Take ownership of the graphs
    pub fn into_graphs(self) -> Vec<GraphData> {
        self.graphs
    }

    /// Count of graphs per class as (label 0, label 1)
    pub fn class_counts(&self) -> (usize, usize) {
        let positives = self.graphs.iter().filter(|g| g.label == 1).count();
        (self.graphs.len() - positives, positives)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse comma-separated integer rows, keeping the first `width` fields
fn read_rows(path: &Path, width: usize) -> Result<Vec<Vec<i64>>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => HgnnError::Dataset(format!(
            "missing required file {}",
            path.display()
        )),
        _ => HgnnError::Io(e),
    })?;

    let mut rows = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields = line
            .split(',')
            .map(|f| f.trim().parse::<i64>())
            .take(width)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| HgnnError::Parse {
                file: file_name(path),
                line: idx + 1,
                message: e.to_string(),
            })?;
        if fields.len() < width {
            return Err(HgnnError::Parse {
                file: file_name(path),
                line: idx + 1,
                message: format!("expected {} fields, found {}", width, fields.len()),
            });
        }
        rows.push(fields);
    }
    Ok(rows)
}

fn read_column(path: &Path) -> Result<Vec<i64>> {
    Ok(read_rows(path, 1)?.into_iter().map(|row| row[0]).collect())
}

fn read_optional_column(path: &Path) -> Result<Option<Vec<i64>>> {
    if path.is_file() {
        read_column(path).map(Some)
    } else {
        Ok(None)
    }
}

/// Map the two distinct raw labels to 0 and 1 by sorted rank
fn binarize_labels(raw: &[i64]) -> Result<Vec<u8>> {
    let classes: Vec<i64> = raw.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
    if classes.len() != 2 {
        return Err(HgnnError::Dataset(format!(
            "expected exactly two graph classes, found {:?}",
            classes
        )));
    }
    Ok(raw
        .iter()
        .map(|&l| if l == classes[0] { 0 } else { 1 })
        .collect())
}

fn categorical(labels: &[i64], what: &str) -> Result<Vec<usize>> {
    labels
        .iter()
        .map(|&l| {
            usize::try_from(l)
                .map_err(|_| HgnnError::Dataset(format!("negative {} label {}", what, l)))
        })
        .collect()
}

fn assemble(
    edges: &[Vec<i64>],
    indicator: &[i64],
    graph_labels: &[u8],
    node_labels: Option<&[i64]>,
    edge_labels: Option<&[i64]>,
) -> Result<Vec<GraphData>> {
    let num_graphs = graph_labels.len();
    let num_nodes = indicator.len();

    if let Some(labels) = node_labels.filter(|l| l.len() != num_nodes) {
        return Err(HgnnError::Dataset(format!(
            "{} node labels for {} nodes",
            labels.len(),
            num_nodes
        )));
    }
    if let Some(labels) = edge_labels.filter(|l| l.len() != edges.len()) {
        return Err(HgnnError::Dataset(format!(
            "{} edge labels for {} edges",
            labels.len(),
            edges.len()
        )));
    }

    // graph id and local index of every global node
    let mut owner = Vec::with_capacity(num_nodes);
    let mut local = Vec::with_capacity(num_nodes);
    let mut sizes = vec![0usize; num_graphs];
    for (node, &g) in indicator.iter().enumerate() {
        let g = usize::try_from(g)
            .ok()
            .filter(|&g| (1..=num_graphs).contains(&g))
            .ok_or_else(|| {
                HgnnError::Dataset(format!("node {} assigned to unknown graph {}", node + 1, g))
            })?
            - 1;
        owner.push(g);
        local.push(sizes[g]);
        sizes[g] += 1;
    }

    let node_cats = node_labels.map(|l| categorical(l, "node")).transpose()?;
    let edge_cats = edge_labels.map(|l| categorical(l, "edge")).transpose()?;
    let node_encoder = node_cats.as_deref().map(OneHotEncoder::fit);
    let edge_encoder = edge_cats.as_deref().map(OneHotEncoder::fit);

    let mut graph_edges: Vec<Vec<(usize, usize)>> = vec![Vec::new(); num_graphs];
    let mut graph_edge_cats: Vec<Vec<usize>> = vec![Vec::new(); num_graphs];
    for (pos, row) in edges.iter().enumerate() {
        let endpoint = |id: i64| {
            usize::try_from(id)
                .ok()
                .filter(|&i| (1..=num_nodes).contains(&i))
                .map(|i| i - 1)
                .ok_or_else(|| HgnnError::Dataset(format!("edge {} references node {}", pos + 1, id)))
        };
        let (s, d) = (endpoint(row[0])?, endpoint(row[1])?);
        if owner[s] != owner[d] {
            return Err(HgnnError::Dataset(format!(
                "edge {} connects graphs {} and {}",
                pos + 1,
                owner[s] + 1,
                owner[d] + 1
            )));
        }
        let g = owner[s];
        graph_edges[g].push((local[s], local[d]));
        graph_edge_cats[g].push(edge_cats.as_ref().map_or(0, |c| c[pos]));
    }

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); num_graphs];
    for (node, &g) in owner.iter().enumerate() {
        members[g].push(node);
    }

    let mut graphs = Vec::with_capacity(num_graphs);
    for g in 0..num_graphs {
        let (edge_index, kept) =
            EdgeIndex::from_edges(std::mem::take(&mut graph_edges[g])).dedup_undirected();

        let node_features = match (&node_encoder, &node_cats) {
            (Some(encoder), Some(cats)) => {
                let labels: Vec<usize> = members[g].iter().map(|&n| cats[n]).collect();
                encoder.encode(&labels)?
            }
            _ => constant_features(sizes[g]),
        };
        let edge_features = match &edge_encoder {
            Some(encoder) => {
                let labels: Vec<usize> = kept.iter().map(|&k| graph_edge_cats[g][k]).collect();
                encoder.encode(&labels)?
            }
            None => constant_features(edge_index.num_edges()),
        };

        graphs.push(GraphData::new(
            sizes[g],
            edge_index,
            node_features,
            edge_features,
            graph_labels[g],
        )?);
    }

    Ok(graphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_dataset(dir: &Path, name: &str, with_node_labels: bool, with_edge_labels: bool) {
        let raw = dir.join(name).join("raw");
        fs::create_dir_all(&raw).unwrap();
        let put = |suffix: &str, body: &str| {
            fs::write(raw.join(format!("{}_{}.txt", name, suffix)), body).unwrap();
        };
        // graph 1: triangle 1-2-3, graph 2: edge 4-5; every edge listed twice
        put("A", "1, 2\n2, 1\n2, 3\n3, 2\n1, 3\n3, 1\n4, 5\n5, 4\n");
        put("graph_indicator", "1\n1\n1\n2\n2\n");
        put("graph_labels", "1\n-1\n");
        if with_node_labels {
            put("node_labels", "0\n1\n2\n0\n0\n");
        }
        if with_edge_labels {
            put("edge_labels", "0\n0\n1\n1\n0\n0\n3\n3\n");
        }
    }

    #[test]
    fn test_load_tiny_dataset() {
        let cache = TempDir::new().unwrap();
        write_dataset(cache.path(), "TINY", true, true);

        let ds = TuDataset::load("TINY", cache.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.class_counts(), (1, 1));

        let g0 = &ds.graphs()[0];
        assert_eq!(g0.num_nodes, 3);
        assert_eq!(g0.num_edges(), 3);
        assert_eq!(g0.label, 1);
        assert_eq!(g0.feature_dim(), 3);
        assert_eq!(g0.edge_feature_dim(), 4);
        // (2, 3) carries edge label 1
        assert_eq!(g0.edge_features[[1, 1]], 1.0);

        let g1 = &ds.graphs()[1];
        assert_eq!(g1.label, 0);
        assert_eq!(g1.edge_index.iter().collect::<Vec<_>>(), vec![(0, 1)]);
        assert_eq!(g1.edge_features[[0, 3]], 1.0);
    }

    #[test]
    fn test_missing_edge_labels_use_constant_features() {
        let cache = TempDir::new().unwrap();
        write_dataset(cache.path(), "TINY", true, false);

        let ds = TuDataset::load("TINY", cache.path()).unwrap();
        assert_eq!(ds.graphs()[0].edge_feature_dim(), 1);
    }

    #[test]
    fn test_missing_node_labels_use_constant_features() {
        let cache = TempDir::new().unwrap();
        write_dataset(cache.path(), "TINY", false, true);

        let ds = TuDataset::load("TINY", cache.path()).unwrap();
        for graph in ds.graphs() {
            assert_eq!(graph.feature_dim(), 1);
            assert!(graph.node_features.iter().all(|&x| x == 1.0));
        }
        assert_eq!(ds.graphs()[0].edge_feature_dim(), 4);
    }

    #[test]
    fn test_missing_dataset() {
        let cache = TempDir::new().unwrap();
        let err = TuDataset::load("MUTAG", cache.path()).unwrap_err();
        assert!(matches!(err, HgnnError::DatasetNotFound { .. }));
    }

    #[test]
    fn test_fetch_uses_cached_files_offline() {
        let cache = TempDir::new().unwrap();
        write_dataset(cache.path(), "TINY", true, true);

        // an unreachable mirror proves nothing was downloaded
        let ds = TuDataset::fetch_from("TINY", cache.path(), "http://127.0.0.1:9").unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn test_fetch_reports_download_failure() {
        let cache = TempDir::new().unwrap();
        let err = TuDataset::fetch_from("TINY", cache.path(), "http://127.0.0.1:9").unwrap_err();
        assert!(matches!(err, HgnnError::Download(_)));
    }

    #[test]
    fn test_binarize_labels() {
        assert_eq!(binarize_labels(&[1, -1, 1]).unwrap(), vec![1, 0, 1]);
        assert!(binarize_labels(&[0, 1, 2]).is_err());
        assert!(binarize_labels(&[3, 3]).is_err());
    }

    #[test]
    fn test_parse_error_reports_line() {
        let cache = TempDir::new().unwrap();
        let path = cache.path().join("BAD_A.txt");
        fs::write(&path, "1, 2\nx, 1\n").unwrap();

        let err = read_rows(&path, 2).unwrap_err();
        assert!(matches!(err, HgnnError::Parse { line: 2, .. }));
    }
}
