//! GEXF parsing.
//!
//! Event-driven: a single pass over the XML, tracking just enough state to
//! attach attribute values and viz annotations to the node being read.
//! Unknown elements and attributes are skipped, so files that came back from
//! a layout tool (extra viz color elements, edge attributes, spell metadata)
//! still parse.

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::{GexfDocument, GexfEdge, GexfError, GexfNode};

/// Parse a GEXF file from disk.
pub fn read_gexf_file(path: &Path) -> Result<GexfDocument, GexfError> {
    let file = File::open(path).map_err(|source| GexfError::File {
        path: path.to_path_buf(),
        source,
    })?;
    read_gexf(BufReader::new(file))
}

/// Parse a GEXF document from an arbitrary reader.
pub fn read_gexf<R: BufRead>(input: R) -> Result<GexfDocument, GexfError> {
    let mut reader = Reader::from_reader(input);
    let mut buf = Vec::new();

    let mut doc = GexfDocument::default();
    // Attribute-declaration titles by declared id, for the node class only.
    let mut attr_titles: HashMap<String, String> = HashMap::new();
    let mut in_node_attribute_class = false;
    let mut current_node: Option<GexfNode> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let is_empty = matches!(&event, Event::Empty(_));
                match e.name().as_ref() {
                    b"graph" => {
                        doc.default_edge_type = attr(e, b"defaultedgetype")?
                            .unwrap_or_else(|| "undirected".to_string());
                    }
                    b"attributes" => {
                        in_node_attribute_class =
                            attr(e, b"class")?.as_deref() == Some("node");
                    }
                    b"attribute" if in_node_attribute_class => {
                        if let (Some(id), Some(title)) = (attr(e, b"id")?, attr(e, b"title")?) {
                            attr_titles.insert(id, title);
                        }
                    }
                    b"node" => {
                        let node = GexfNode {
                            id: require_attr(e, b"id", "node")?,
                            label: attr(e, b"label")?.unwrap_or_default(),
                            ..Default::default()
                        };
                        // An empty <node .../> element has no attvalues to wait for.
                        if is_empty {
                            doc.nodes.push(node);
                        } else {
                            current_node = Some(node);
                        }
                    }
                    b"attvalue" => {
                        if let Some(node) = current_node.as_mut() {
                            if let (Some(for_id), Some(value)) =
                                (attr(e, b"for")?, attr(e, b"value")?)
                            {
                                let key =
                                    attr_titles.get(&for_id).cloned().unwrap_or(for_id);
                                node.attrs.insert(key, value);
                            }
                        }
                    }
                    b"viz:position" => {
                        if let Some(node) = current_node.as_mut() {
                            let x = parse_float(e, b"x")?;
                            let y = parse_float(e, b"y")?;
                            if let (Some(x), Some(y)) = (x, y) {
                                node.position = Some((x, y));
                            }
                        }
                    }
                    b"viz:size" => {
                        if let Some(node) = current_node.as_mut() {
                            node.size = parse_float(e, b"value")?;
                        }
                    }
                    b"edge" => {
                        let weight = match attr(e, b"weight")? {
                            Some(raw) => raw.parse::<f64>().map_err(|_| {
                                GexfError::Malformed(format!("edge weight `{raw}` is not a number"))
                            })?,
                            None => 1.0,
                        };
                        doc.edges.push(GexfEdge {
                            source: require_attr(e, b"source", "edge")?,
                            target: require_attr(e, b"target", "edge")?,
                            label: attr(e, b"label")?,
                            weight,
                        });
                    }
                    _ => {}
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"node" => {
                    if let Some(node) = current_node.take() {
                        doc.nodes.push(node);
                    }
                }
                b"attributes" => in_node_attribute_class = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if doc.nodes.is_empty() && doc.edges.is_empty() {
        return Err(GexfError::Malformed(
            "no nodes or edges found; not a gexf graph".to_string(),
        ));
    }

    Ok(doc)
}

fn attr(e: &BytesStart, key: &[u8]) -> Result<Option<String>, GexfError> {
    for a in e.attributes() {
        let a = a?;
        if a.key.as_ref() == key {
            return Ok(Some(a.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn require_attr(e: &BytesStart, key: &[u8], element: &str) -> Result<String, GexfError> {
    attr(e, key)?.ok_or_else(|| {
        GexfError::Malformed(format!(
            "<{element}> missing required `{}` attribute",
            String::from_utf8_lossy(key)
        ))
    })
}

fn parse_float(e: &BytesStart, key: &[u8]) -> Result<Option<f32>, GexfError> {
    match attr(e, key)? {
        None => Ok(None),
        Some(raw) => raw.parse::<f32>().map(Some).map_err(|_| {
            GexfError::Malformed(format!(
                "`{}` value `{raw}` is not a number",
                String::from_utf8_lossy(key)
            ))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANNOTATED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gexf xmlns="http://www.gexf.net/1.2draft" xmlns:viz="http://www.gexf.net/1.2draft/viz" version="1.2">
  <meta lastmodifieddate="2026-08-05">
    <creator>Gephi 0.10</creator>
  </meta>
  <graph mode="static" defaultedgetype="undirected">
    <attributes class="node">
      <attribute id="0" title="kind" type="string"/>
      <attribute id="modularity_class" title="modularity_class" type="integer"/>
    </attributes>
    <nodes>
      <node id="person::a::1" label="A">
        <attvalues>
          <attvalue for="0" value="person"/>
          <attvalue for="modularity_class" value="4"/>
        </attvalues>
        <viz:size value="12.5"/>
        <viz:position x="-120.5" y="33.25" z="0.0"/>
        <viz:color r="230" g="10" b="10"/>
      </node>
      <node id="person::b::2" label="B">
        <attvalues>
          <attvalue for="0" value="person"/>
        </attvalues>
      </node>
    </nodes>
    <edges>
      <edge id="0" source="person::a::1" target="person::b::2" label="shared_company" weight="2.0"/>
    </edges>
  </graph>
</gexf>"#;

    #[test]
    fn reads_layout_annotated_files() {
        let doc = read_gexf(ANNOTATED.as_bytes()).unwrap();
        assert_eq!(doc.nodes.len(), 2);
        assert_eq!(doc.edges.len(), 1);

        let a = &doc.nodes[0];
        assert_eq!(a.id, "person::a::1");
        assert_eq!(a.attrs.get("kind").map(String::as_str), Some("person"));
        assert_eq!(
            a.attrs.get("modularity_class").map(String::as_str),
            Some("4")
        );
        assert_eq!(a.position, Some((-120.5, 33.25)));
        assert_eq!(a.size, Some(12.5));

        let edge = &doc.edges[0];
        assert_eq!(edge.weight, 2.0);
        assert_eq!(edge.label.as_deref(), Some("shared_company"));
    }

    #[test]
    fn missing_weight_defaults_to_one() {
        let xml = r#"<gexf><graph defaultedgetype="undirected"><nodes>
            <node id="n1" label="N1"/>
            <node id="n2" label="N2"/>
        </nodes><edges>
            <edge id="0" source="n1" target="n2"/>
        </edges></graph></gexf>"#;
        let doc = read_gexf(xml.as_bytes()).unwrap();
        assert_eq!(doc.edges[0].weight, 1.0);
    }

    #[test]
    fn rejects_files_without_graph_content() {
        let err = read_gexf("<gexf><graph/></gexf>".as_bytes()).unwrap_err();
        assert!(matches!(err, GexfError::Malformed(_)));
    }

    #[test]
    fn rejects_nodes_without_ids() {
        let xml = r#"<gexf><graph><nodes><node label="x"/></nodes></graph></gexf>"#;
        assert!(matches!(
            read_gexf(xml.as_bytes()),
            Err(GexfError::Malformed(_))
        ));
    }

    #[test]
    fn unescapes_attribute_values() {
        let xml = r#"<gexf><graph><nodes>
            <node id="company::1" label="Shwe &amp; Sons &lt;Trading&gt;"/>
        </nodes></graph></gexf>"#;
        let doc = read_gexf(xml.as_bytes()).unwrap();
        assert_eq!(doc.nodes[0].label, "Shwe & Sons <Trading>");
    }
}
