//! GEXF serialization.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use corpnet_graph::Graph;

use crate::{GexfError, KIND_ATTRIBUTE};

const GEXF_XMLNS: &str = "http://www.gexf.net/1.2draft";
const VIZ_XMLNS: &str = "http://www.gexf.net/1.2draft/viz";

/// File-level metadata for the `<meta>` element.
#[derive(Debug, Clone)]
pub struct GexfMeta {
    pub creator: String,
    /// `lastmodifieddate`, YYYY-MM-DD. Omitted when `None` so test output
    /// stays byte-stable.
    pub last_modified: Option<String>,
}

impl Default for GexfMeta {
    fn default() -> Self {
        Self {
            creator: format!("corpnet {}", env!("CARGO_PKG_VERSION")),
            last_modified: None,
        }
    }
}

/// Serialize `graph` as GEXF to `path`.
pub fn write_gexf_file(graph: &Graph, path: &Path, meta: &GexfMeta) -> Result<(), GexfError> {
    let file = File::create(path).map_err(|source| GexfError::File {
        path: path.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    write_gexf(graph, &mut out, meta)?;
    // Surface disk-full style failures here instead of in an implicit drop.
    out.flush().map_err(|source| GexfError::File {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Serialize `graph` as GEXF to an arbitrary writer.
///
/// Node order follows the graph's id ordering and edges their canonical
/// endpoint keys, so equal graphs serialize identically.
pub fn write_gexf<W: Write>(graph: &Graph, out: W, meta: &GexfMeta) -> Result<(), GexfError> {
    let mut w = Writer::new_with_indent(out, b' ', 2);

    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut gexf = BytesStart::new("gexf");
    gexf.push_attribute(("xmlns", GEXF_XMLNS));
    gexf.push_attribute(("xmlns:viz", VIZ_XMLNS));
    gexf.push_attribute(("version", "1.2"));
    w.write_event(Event::Start(gexf))?;

    let mut meta_el = BytesStart::new("meta");
    if let Some(date) = &meta.last_modified {
        meta_el.push_attribute(("lastmodifieddate", date.as_str()));
    }
    w.write_event(Event::Start(meta_el))?;
    w.write_event(Event::Start(BytesStart::new("creator")))?;
    w.write_event(Event::Text(BytesText::new(&meta.creator)))?;
    w.write_event(Event::End(BytesEnd::new("creator")))?;
    w.write_event(Event::End(BytesEnd::new("meta")))?;

    let mut graph_el = BytesStart::new("graph");
    graph_el.push_attribute(("mode", "static"));
    graph_el.push_attribute(("defaultedgetype", "undirected"));
    w.write_event(Event::Start(graph_el))?;

    // Attribute declarations: `kind` is always id 0; every other node
    // attribute key observed in the graph gets a stable id from sorted order.
    let mut extra_keys: BTreeSet<&str> = BTreeSet::new();
    for node in graph.nodes() {
        for key in node.attrs.keys() {
            extra_keys.insert(key);
        }
    }
    let attr_id = |key: &str| -> String {
        if key == KIND_ATTRIBUTE {
            "0".to_string()
        } else {
            let idx = extra_keys.iter().position(|k| *k == key).unwrap_or(0);
            (idx + 1).to_string()
        }
    };

    let mut attributes_el = BytesStart::new("attributes");
    attributes_el.push_attribute(("class", "node"));
    w.write_event(Event::Start(attributes_el))?;
    let mut decl = BytesStart::new("attribute");
    decl.push_attribute(("id", "0"));
    decl.push_attribute(("title", KIND_ATTRIBUTE));
    decl.push_attribute(("type", "string"));
    w.write_event(Event::Empty(decl))?;
    for key in &extra_keys {
        let mut decl = BytesStart::new("attribute");
        decl.push_attribute(("id", attr_id(key).as_str()));
        decl.push_attribute(("title", *key));
        decl.push_attribute(("type", "string"));
        w.write_event(Event::Empty(decl))?;
    }
    w.write_event(Event::End(BytesEnd::new("attributes")))?;

    w.write_event(Event::Start(BytesStart::new("nodes")))?;
    for node in graph.nodes() {
        let mut node_el = BytesStart::new("node");
        node_el.push_attribute(("id", node.id.as_str()));
        node_el.push_attribute(("label", node.name.as_str()));
        w.write_event(Event::Start(node_el))?;

        w.write_event(Event::Start(BytesStart::new("attvalues")))?;
        let mut kind_el = BytesStart::new("attvalue");
        kind_el.push_attribute(("for", "0"));
        kind_el.push_attribute(("value", node.kind.as_str()));
        w.write_event(Event::Empty(kind_el))?;
        for (key, value) in &node.attrs {
            let mut att = BytesStart::new("attvalue");
            att.push_attribute(("for", attr_id(key).as_str()));
            att.push_attribute(("value", value.as_str()));
            w.write_event(Event::Empty(att))?;
        }
        w.write_event(Event::End(BytesEnd::new("attvalues")))?;

        w.write_event(Event::End(BytesEnd::new("node")))?;
    }
    w.write_event(Event::End(BytesEnd::new("nodes")))?;

    w.write_event(Event::Start(BytesStart::new("edges")))?;
    for (i, edge) in graph.edges().enumerate() {
        let mut edge_el = BytesStart::new("edge");
        edge_el.push_attribute(("id", i.to_string().as_str()));
        edge_el.push_attribute(("source", edge.source.as_str()));
        edge_el.push_attribute(("target", edge.target.as_str()));
        edge_el.push_attribute(("label", edge.relation.as_str()));
        edge_el.push_attribute(("weight", edge.weight.to_string().as_str()));
        w.write_event(Event::Empty(edge_el))?;
    }
    w.write_event(Event::End(BytesEnd::new("edges")))?;

    w.write_event(Event::End(BytesEnd::new("graph")))?;
    w.write_event(Event::End(BytesEnd::new("gexf")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use corpnet_graph::{Node, NodeKind, RelationKind};
    use std::collections::BTreeMap;

    fn tiny_graph() -> Graph {
        let mut g = Graph::new();
        g.upsert_node(Node {
            id: "company::1".to_string(),
            kind: NodeKind::Company,
            name: "Alpha".to_string(),
            attrs: BTreeMap::from([(
                "registration_number".to_string(),
                "104".to_string(),
            )]),
        });
        g.upsert_node(Node {
            id: "person::a::1".to_string(),
            kind: NodeKind::Person,
            name: "A".to_string(),
            attrs: BTreeMap::new(),
        });
        g.bump_edge("person::a::1", "company::1", RelationKind::OfficerOf, 1);
        g
    }

    #[test]
    fn writes_expected_structure() {
        let mut buf = Vec::new();
        write_gexf(&tiny_graph(), &mut buf, &GexfMeta::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(text.contains("defaultedgetype=\"undirected\""));
        assert!(text.contains("<attribute id=\"0\" title=\"kind\" type=\"string\"/>"));
        assert!(text.contains("<attvalue for=\"0\" value=\"company\"/>"));
        assert!(text.contains("label=\"officer_of\""));
        assert!(text.contains("weight=\"1\""));
    }

    #[test]
    fn equal_graphs_serialize_identically() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        write_gexf(&tiny_graph(), &mut a, &GexfMeta::default()).unwrap();
        write_gexf(&tiny_graph(), &mut b, &GexfMeta::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let graph = tiny_graph();
        let err = write_gexf_file(
            &graph,
            Path::new("/nonexistent-dir/out.gexf"),
            &GexfMeta::default(),
        )
        .unwrap_err();
        assert!(matches!(err, GexfError::File { .. }));
    }

    #[test]
    fn meta_date_is_written_when_present() {
        let meta = GexfMeta {
            creator: "corpnet test".to_string(),
            last_modified: Some("2026-08-05".to_string()),
        };
        let mut buf = Vec::new();
        write_gexf(&tiny_graph(), &mut buf, &meta).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("lastmodifieddate=\"2026-08-05\""));
        assert!(text.contains("<creator>corpnet test</creator>"));
    }
}
