// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Oscillator Graph
// ─────────────────────────────────────────────────────────────────────
//! Simple undirected graph over contiguous node ids `0..n`.
//!
//! Adjacency lists and the edge list are kept side by side: the vector
//! field walks neighbors, the local order parameter walks edges, and
//! each undirected edge appears exactly once in `edges`.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Wire form used by serde: `{"n": 4, "edges": [[0, 1], [1, 2]]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GraphSpec {
    n: usize,
    #[serde(default)]
    edges: Vec<(usize, usize)>,
}

/// Undirected coupling graph of `n` oscillators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphSpec", into = "GraphSpec")]
pub struct Graph {
    n: usize,
    adjacency: Vec<Vec<usize>>,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    /// Graph with `n` isolated nodes.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            adjacency: vec![Vec::new(); n],
            edges: Vec::new(),
        }
    }

    /// Build from an edge list. Duplicates are dropped.
    pub fn from_edges(n: usize, edges: &[(usize, usize)]) -> SyncResult<Self> {
        let mut g = Self::new(n);
        for &(i, j) in edges {
            g.add_edge(i, j)?;
        }
        Ok(g)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| SyncError::InvalidGraph(format!("JSON parse error: {e}")))
    }

    /// Insert the undirected edge `{i, j}`.
    ///
    /// Returns `Ok(false)` when the edge already exists.
    pub fn add_edge(&mut self, i: usize, j: usize) -> SyncResult<bool> {
        if i >= self.n || j >= self.n {
            return Err(SyncError::InvalidGraph(format!(
                "edge ({i}, {j}) out of range for {} nodes",
                self.n
            )));
        }
        if i == j {
            return Err(SyncError::InvalidGraph(format!("self-loop on node {i}")));
        }
        if self.adjacency[i].contains(&j) {
            return Ok(false);
        }
        self.adjacency[i].push(j);
        self.adjacency[j].push(i);
        self.edges.push((i, j));
        Ok(true)
    }

    pub fn node_count(&self) -> usize {
        self.n
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Neighbors of `i` in insertion order.
    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.adjacency[i].iter().copied()
    }

    pub fn degree(&self, i: usize) -> usize {
        self.adjacency[i].len()
    }

    /// Every undirected edge exactly once, as inserted.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }

    pub fn has_edge(&self, i: usize, j: usize) -> bool {
        i < self.n && self.adjacency[i].contains(&j)
    }
}

impl TryFrom<GraphSpec> for Graph {
    type Error = SyncError;

    fn try_from(spec: GraphSpec) -> SyncResult<Self> {
        Graph::from_edges(spec.n, &spec.edges)
    }
}

impl From<Graph> for GraphSpec {
    fn from(g: Graph) -> Self {
        GraphSpec {
            n: g.n,
            edges: g.edges,
        }
    }
}
