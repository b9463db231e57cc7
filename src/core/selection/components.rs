use crate::AlnDiffError;
use indexmap::IndexMap;
use petgraph::unionfind::UnionFind;
use std::collections::{BTreeMap, BTreeSet};

/// Connected components by union-find.
///
/// Output is canonical: members ascending within a component, components
/// ordered by their smallest member. Edge order and direction do not matter.
pub struct ComponentFinder;

impl ComponentFinder {
    /// Partition `0..node_count`; isolated nodes come back as singletons.
    pub fn find(node_count: usize, edges: &[(usize, usize)]) -> crate::Result<Vec<Vec<usize>>> {
        let mut uf = UnionFind::new(node_count);
        for &(a, b) in edges {
            if a >= node_count || b >= node_count {
                return Err(AlnDiffError::Input(format!(
                    "edge ({}, {}) refers to a node outside 0..{}",
                    a, b, node_count
                )));
            }
            uf.union(a, b);
        }

        let mut groups: IndexMap<usize, Vec<usize>> = IndexMap::new();
        for node in 0..node_count {
            groups.entry(uf.find(node)).or_default().push(node);
        }
        Ok(groups.into_values().collect())
    }

    /// Components over the nodes that appear in `edges`, whatever their ids.
    pub fn from_edges(edges: &[(usize, usize)]) -> Vec<BTreeSet<usize>> {
        let nodes: BTreeSet<usize> = edges.iter().flat_map(|&(a, b)| [a, b]).collect();
        let dense: BTreeMap<usize, usize> = nodes.iter().enumerate().map(|(i, &n)| (n, i)).collect();
        let ids: Vec<usize> = nodes.into_iter().collect();

        let remapped: Vec<(usize, usize)> = edges.iter().map(|(a, b)| (dense[a], dense[b])).collect();

        // remapped indices are always in range
        Self::find(ids.len(), &remapped)
            .unwrap_or_default()
            .into_iter()
            .map(|component| component.into_iter().map(|i| ids[i]).collect())
            .collect()
    }
}
