// ─────────────────────────────────────────────────────────────────────
// Kuramoto Sync — Cluster Assignment
// ─────────────────────────────────────────────────────────────────────

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-oscillator cluster label, numbered in first-discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    pub labels: Vec<usize>,
}

impl ClusterAssignment {
    pub fn new(labels: Vec<usize>) -> Self {
        Self { labels }
    }

    /// Every oscillator in cluster 0.
    pub fn single(n: usize) -> Self {
        Self { labels: vec![0; n] }
    }

    /// Renumber arbitrary labels so ids follow first appearance.
    pub fn canonical(raw: &[usize]) -> Self {
        let mut remap: HashMap<usize, usize> = HashMap::new();
        let labels = raw
            .iter()
            .map(|&l| {
                let next = remap.len();
                *remap.entry(l).or_insert(next)
            })
            .collect();
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn n_clusters(&self) -> usize {
        self.labels.iter().max().map_or(0, |&m| m + 1)
    }

    /// Oscillator indices in cluster `c`, ascending.
    pub fn members(&self, c: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == c)
            .map(|(i, _)| i)
            .collect()
    }

    /// All clusters as index lists, ordered by id.
    pub fn groups(&self) -> Vec<Vec<usize>> {
        let mut groups = vec![Vec::new(); self.n_clusters()];
        for (i, &l) in self.labels.iter().enumerate() {
            groups[l].push(i);
        }
        groups
    }

    /// Same partition, ignoring how the clusters are numbered.
    pub fn same_partition(&self, other: &ClusterAssignment) -> bool {
        Self::canonical(&self.labels) == Self::canonical(&other.labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_relabels_first_seen() {
        let a = ClusterAssignment::canonical(&[7, 7, 3, 9, 3]);
        assert_eq!(a.labels, vec![0, 0, 1, 2, 1]);
    }

    #[test]
    fn test_groups_and_members() {
        let a = ClusterAssignment::new(vec![0, 1, 0, 2]);
        assert_eq!(a.n_clusters(), 3);
        assert_eq!(a.members(0), vec![0, 2]);
        assert_eq!(a.groups(), vec![vec![0, 2], vec![1], vec![3]]);
    }

    #[test]
    fn test_same_partition_ignores_ids() {
        let a = ClusterAssignment::new(vec![0, 0, 1, 1]);
        let b = ClusterAssignment::new(vec![1, 1, 0, 0]);
        let c = ClusterAssignment::new(vec![0, 1, 1, 1]);
        assert!(a.same_partition(&b));
        assert!(!a.same_partition(&c));
    }

    #[test]
    fn test_empty() {
        let a = ClusterAssignment::default();
        assert!(a.is_empty());
        assert_eq!(a.n_clusters(), 0);
        assert!(a.groups().is_empty());
    }

    #[test]
    fn test_single() {
        let a = ClusterAssignment::single(3);
        assert_eq!(a.n_clusters(), 1);
        assert_eq!(a.len(), 3);
    }
}
