//! # Edges and edge groups
//!
//! An [`Edge`] names two catalog entries that must be joined by a line on the chart. Edges are
//! collected in named [`EdgeGroup`]s (a constellation figure, the boundary of one
//! constellation, …), and the groups in an [`EdgeGroups`] collection.
//!
//! ## Ordering
//! -----------------
//! - Groups keep the order in which they were first seen.
//! - Edges keep their insertion order inside a group; this order drives polyline and polygon
//!   assembly in [`geometry`](crate::geometry).
//! - Membership ([`EdgeGroup::contains`]) ignores both the order of edges and the direction of
//!   an edge.
//!
//! ## Sources
//! -----------------
//! * [`stellarium::parse_constellationship`] – Stellarium stick figures (HIP pairs).
//! * [`BoundaryData::edge_groups`](crate::catalogs::BoundaryData::edge_groups) – IAU boundary edges.
pub mod stellarium;

use std::collections::{HashMap, HashSet};

use crate::constants::CatalogKey;

/// A pair of catalog keys to be joined by a line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: CatalogKey,
    pub to: CatalogKey,
}

impl Edge {
    pub fn new(from: impl Into<CatalogKey>, to: impl Into<CatalogKey>) -> Self {
        Edge {
            from: from.into(),
            to: to.into(),
        }
    }

    /// True if both edges join the same two keys, in either direction.
    pub fn same_pair(&self, other: &Edge) -> bool {
        (self.from == other.from && self.to == other.to)
            || (self.from == other.to && self.to == other.from)
    }
}

/// Ordered edges under one group name.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeGroup {
    pub name: String,
    pub edges: Vec<Edge>,
}

impl EdgeGroup {
    pub fn new(name: impl Into<String>, edges: Vec<Edge>) -> Self {
        EdgeGroup {
            name: name.into(),
            edges,
        }
    }

    /// Undirected membership test.
    pub fn contains(&self, edge: &Edge) -> bool {
        self.edges.iter().any(|e| e.same_pair(edge))
    }
}

/// Named edge groups, in first-seen order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EdgeGroups {
    groups: Vec<EdgeGroup>,
    index: HashMap<String, usize>,
}

impl EdgeGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already-grouped edges. Groups sharing a name are merged, keeping edge order.
    pub fn from_groups(groups: impl IntoIterator<Item = EdgeGroup>) -> Self {
        let mut collection = Self::new();
        for group in groups {
            for edge in group.edges {
                collection.push_edge(&group.name, edge);
            }
            // keep empty groups visible
            collection.group_mut(&group.name);
        }
        collection
    }

    fn group_mut(&mut self, name: &str) -> &mut EdgeGroup {
        let idx = match self.index.get(name) {
            Some(&idx) => idx,
            None => {
                self.groups.push(EdgeGroup::new(name, Vec::new()));
                self.index.insert(name.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    /// Append an edge to `group`, creating the group on first use.
    pub fn push_edge(&mut self, group: &str, edge: Edge) {
        self.group_mut(group).edges.push(edge);
    }

    pub fn get(&self, name: &str) -> Option<&EdgeGroup> {
        self.index.get(name).map(|&i| &self.groups[i])
    }

    pub fn groups(&self) -> &[EdgeGroup] {
        &self.groups
    }

    /// Every edge of every group, groups in order, edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.groups.iter().flat_map(|g| g.edges.iter())
    }

    /// Every key referenced by at least one edge.
    pub fn referenced_keys(&self) -> HashSet<&CatalogKey> {
        self.edges().flat_map(|e| [&e.from, &e.to]).collect()
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.groups.iter().map(|g| g.edges.len()).sum()
    }
}
