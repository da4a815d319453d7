//! Network construction over leaked registry records.
//!
//! Two aggregation granularities are built from the same record set:
//!
//! - **corporation graph**: company and person nodes; an edge links a person
//!   (or a corporate shareholder) to a company, weighted by the number of
//!   roles held there.
//! - **officer graph**: person nodes only; an edge links two people who serve
//!   in the same company, weighted by how many companies they share.
//!
//! Construction is two-pass: a registry first fixes the identity of every
//! company mentioned anywhere in the input (including cross-references to
//! records that appear later, or never), then edges are built against that
//! frozen registry. Graphs are fully materialized in memory and never
//! mutated after the build.

use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use thiserror::Error;

pub mod attributes;
pub mod builder;
pub mod component;
pub mod membership;
pub mod registry;

pub use builder::{build_corporation_graph, build_officer_graph, BuildContext};

/// Display name substituted when the source data has none.
pub const PLACEHOLDER_NAME: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Company,
    Person,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Company => "company",
            NodeKind::Person => "person",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "company" => Some(NodeKind::Company),
            "person" => Some(NodeKind::Person),
            _ => None,
        }
    }
}

/// Relation label carried on an edge.
///
/// Edge identity is the endpoint pair, not the label: a person who is both
/// officer and shareholder of one company gets a single edge of weight 2,
/// keeping the first-seen label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    OfficerOf,
    ShareholderOf,
    SharedCompany,
}

impl RelationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::OfficerOf => "officer_of",
            RelationKind::ShareholderOf => "shareholder_of",
            RelationKind::SharedCompany => "shared_company",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "officer_of" => Some(RelationKind::OfficerOf),
            "shareholder_of" => Some(RelationKind::ShareholderOf),
            "shared_company" => Some(RelationKind::SharedCompany),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub name: String,
    /// Extra attributes (registration number, nationality, …). BTreeMap so
    /// serialization order is stable.
    #[serde(default)]
    pub attrs: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub relation: RelationKind,
    pub weight: u32,
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("edge {src} -- {target} references a node missing from the node set")]
    DanglingEdge { src: String, target: String },

    #[error("self-loop on {id}")]
    SelfLoop { id: String },

    #[error("edge {src} -- {target} stored in non-canonical endpoint order")]
    NonCanonicalEdge { src: String, target: String },
}

/// An undirected weighted graph for one aggregation granularity.
///
/// Nodes are keyed by id (ids embed the kind prefix, so (kind, identifier)
/// identity falls out of the key). Edges are keyed by the canonically-ordered
/// endpoint pair, which makes weight accumulation symmetric and rules out
/// parallel edges by construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: BTreeMap<String, Node>,
    edges: BTreeMap<(String, String), Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Edges in canonical (source, target) order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Insert a node, merging with any existing node of the same id.
    ///
    /// Display names reconcile last-write-wins, except that a placeholder
    /// never overwrites a real name. Attributes merge key-wise, also
    /// last-write-wins.
    pub fn upsert_node(&mut self, node: Node) {
        match self.nodes.entry(node.id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(node);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.name = merge_display_name(&node.id, &existing.name, &node.name);
                for (k, v) in node.attrs {
                    existing.attrs.insert(k, v);
                }
            }
        }
    }

    /// Accumulate weight on the undirected edge between `a` and `b`.
    ///
    /// Self-loops are dropped: co-occurrence with oneself carries no signal.
    /// An edge whose endpoint is not yet a node is dropped with a warning
    /// rather than left dangling.
    pub fn bump_edge(&mut self, a: &str, b: &str, relation: RelationKind, delta: u32) {
        if a == b {
            return;
        }
        if !self.nodes.contains_key(a) || !self.nodes.contains_key(b) {
            tracing::warn!(source = a, target = b, "dropping edge with unknown endpoint");
            return;
        }
        let (source, target) = if a <= b { (a, b) } else { (b, a) };
        self.edges
            .entry((source.to_string(), target.to_string()))
            .and_modify(|e| e.weight += delta)
            .or_insert_with(|| Edge {
                source: source.to_string(),
                target: target.to_string(),
                relation,
                weight: delta,
            });
    }

    /// Check the structural invariants: referential integrity, no self-loops,
    /// canonical edge ordering.
    pub fn validate(&self) -> Result<(), GraphError> {
        for edge in self.edges.values() {
            if edge.source == edge.target {
                return Err(GraphError::SelfLoop {
                    id: edge.source.clone(),
                });
            }
            if edge.source > edge.target {
                return Err(GraphError::NonCanonicalEdge {
                    src: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
            if !self.nodes.contains_key(&edge.source) || !self.nodes.contains_key(&edge.target) {
                return Err(GraphError::DanglingEdge {
                    src: edge.source.clone(),
                    target: edge.target.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Last-write-wins name reconciliation with a logged warning on real
/// conflicts. Placeholders never win over a real name.
pub(crate) fn merge_display_name(id: &str, existing: &str, incoming: &str) -> String {
    if incoming == existing || incoming == PLACEHOLDER_NAME {
        return existing.to_string();
    }
    if existing == PLACEHOLDER_NAME {
        return incoming.to_string();
    }
    tracing::warn!(
        id,
        kept = incoming,
        dropped = existing,
        "conflicting names for one identifier; keeping the later spelling"
    );
    incoming.to_string()
}

/// Identifier-safe form of a source string: alphanumerics survive, everything
/// else collapses to `_`, lowercased, capped.
pub(crate) fn sanitize_id(s: &str) -> String {
    s.trim()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .flat_map(|c| c.to_lowercase())
        .take(120)
        .collect()
}

/// Trimmed, non-empty view of an optional source field.
pub(crate) fn clean(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
