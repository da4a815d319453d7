//! Connected-component filtering.
//!
//! The exported networks keep only the largest connected component: the long
//! tail of one-company islands drowns the layout otherwise, and the
//! interesting structure of a registry leak is the connected core.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::Graph;

impl Graph {
    /// The induced subgraph on the largest connected component.
    ///
    /// Isolated nodes count as singleton components. On a size tie, the
    /// component containing the lexicographically smallest node id wins, so
    /// the choice is deterministic across runs.
    pub fn largest_component(&self) -> Graph {
        let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for node in self.nodes() {
            adjacency.entry(node.id.as_str()).or_default();
        }
        for edge in self.edges() {
            adjacency
                .entry(edge.source.as_str())
                .or_default()
                .push(edge.target.as_str());
            adjacency
                .entry(edge.target.as_str())
                .or_default()
                .push(edge.source.as_str());
        }

        let mut best: BTreeSet<&str> = BTreeSet::new();
        let mut visited: BTreeSet<&str> = BTreeSet::new();

        // BTreeMap iteration starts components at their smallest member, so
        // the first component of a given size is also the tie-winner.
        for &start in adjacency.keys() {
            if visited.contains(start) {
                continue;
            }
            let mut component: BTreeSet<&str> = BTreeSet::new();
            let mut queue: VecDeque<&str> = VecDeque::new();
            queue.push_back(start);
            visited.insert(start);
            while let Some(id) = queue.pop_front() {
                component.insert(id);
                if let Some(neighbors) = adjacency.get(id) {
                    for &n in neighbors {
                        if visited.insert(n) {
                            queue.push_back(n);
                        }
                    }
                }
            }
            if component.len() > best.len() {
                best = component;
            }
        }

        let mut out = Graph::new();
        for node in self.nodes() {
            if best.contains(node.id.as_str()) {
                out.upsert_node(node.clone());
            }
        }
        for edge in self.edges() {
            if best.contains(edge.source.as_str()) {
                out.bump_edge(&edge.source, &edge.target, edge.relation, edge.weight);
            }
        }
        out
    }
}
