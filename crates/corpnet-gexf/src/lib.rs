//! GEXF 1.2 interchange codec.
//!
//! The graphs leave this repository as GEXF so an external layout tool
//! (Gephi) can compute positions and community labels, then hand the file
//! onward to the rendering step. The codec therefore covers both directions:
//!
//! - **export**: serialize a built [`Graph`]: node id/label, a `kind`
//!   attribute, extra node attributes, weighted undirected edges with a
//!   relation label. Output ordering is stable (sorted node ids, canonical
//!   edge keys) so repeated runs diff cleanly.
//! - **import**: parse a GEXF file back, keeping whatever the layout tool
//!   added (`viz:position`, `viz:size`, community attributes), for
//!   round-trip checks and summary inspection.
//!
//! The document model ([`GexfDocument`]) mirrors the file; [`GexfDocument::to_graph`]
//! recovers the core [`Graph`] and is strict. An interchange file with
//! dangling edges or an unknown node kind is a real error, unlike the
//! tolerated noise in leaked source records.

use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use corpnet_graph::{Graph, GraphError, Node, NodeKind, RelationKind};

pub mod export;
pub mod import;

pub use export::{write_gexf, write_gexf_file, GexfMeta};
pub use import::{read_gexf, read_gexf_file};

/// Node attribute key carrying the kind discriminator.
pub const KIND_ATTRIBUTE: &str = "kind";

#[derive(Debug, Error)]
pub enum GexfError {
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("xml: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("xml attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("malformed gexf: {0}")]
    Malformed(String),

    #[error("node `{0}` has no kind attribute")]
    MissingKind(String),

    #[error("node `{id}` has unknown kind `{kind}`")]
    UnknownKind { id: String, kind: String },

    #[error("edge {src} -- {target} has unknown relation label `{label}`")]
    UnknownRelation {
        src: String,
        target: String,
        label: String,
    },

    #[error("edge {src} -- {target} references a node not in the file")]
    DanglingEdge { src: String, target: String },

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// A parsed GEXF file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GexfDocument {
    /// `defaultedgetype` of the `<graph>` element.
    pub default_edge_type: String,
    pub nodes: Vec<GexfNode>,
    pub edges: Vec<GexfEdge>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GexfNode {
    pub id: String,
    pub label: String,
    /// Declared attribute values, keyed by attribute title (`kind`,
    /// `modularity_class`, …).
    pub attrs: BTreeMap<String, String>,
    /// `viz:position`, when a layout tool has annotated the file.
    pub position: Option<(f32, f32)>,
    /// `viz:size`, when present.
    pub size: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GexfEdge {
    pub source: String,
    pub target: String,
    pub label: Option<String>,
    pub weight: f64,
}

impl GexfDocument {
    /// Recover the core graph: kind + label + declared attributes per node,
    /// relation + integer weight per edge. Layout annotations are dropped;
    /// they belong to the document, not the graph.
    pub fn to_graph(&self) -> Result<Graph, GexfError> {
        let mut graph = Graph::new();

        for n in &self.nodes {
            let kind_value = n
                .attrs
                .get(KIND_ATTRIBUTE)
                .ok_or_else(|| GexfError::MissingKind(n.id.clone()))?;
            let kind = NodeKind::parse(kind_value).ok_or_else(|| GexfError::UnknownKind {
                id: n.id.clone(),
                kind: kind_value.clone(),
            })?;

            let mut attrs = n.attrs.clone();
            attrs.remove(KIND_ATTRIBUTE);
            graph.upsert_node(Node {
                id: n.id.clone(),
                kind,
                name: n.label.clone(),
                attrs,
            });
        }

        for e in &self.edges {
            if e.source == e.target {
                return Err(GexfError::Malformed(format!(
                    "self-loop on node `{}`",
                    e.source
                )));
            }
            if !graph.contains_node(&e.source) || !graph.contains_node(&e.target) {
                return Err(GexfError::DanglingEdge {
                    src: e.source.clone(),
                    target: e.target.clone(),
                });
            }
            let label = e.label.clone().unwrap_or_default();
            let relation =
                RelationKind::parse(&label).ok_or_else(|| GexfError::UnknownRelation {
                    src: e.source.clone(),
                    target: e.target.clone(),
                    label,
                })?;
            graph.bump_edge(&e.source, &e.target, relation, e.weight.round() as u32);
        }

        graph.validate()?;
        Ok(graph)
    }
}
