//! The `inspect` command: summarize a GEXF file.
//!
//! Works on both freshly exported graphs and files a layout tool has already
//! annotated, so it doubles as a quick check that a Gephi round trip kept
//! the attributes intact.

use anyhow::Result;
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::Path;

use corpnet_gexf::read_gexf_file;

pub fn run(path: &Path, top: usize) -> Result<()> {
    let doc = read_gexf_file(path)?;

    println!(
        "{} {}",
        "Inspecting".green().bold(),
        path.display().to_string().bold()
    );
    println!(
        "  {} {} nodes, {} edges ({})",
        "→".cyan(),
        doc.nodes.len(),
        doc.edges.len(),
        doc.default_edge_type
    );

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for node in &doc.nodes {
        let kind = node
            .attrs
            .get(corpnet_gexf::KIND_ATTRIBUTE)
            .map(String::as_str)
            .unwrap_or("untagged");
        *kinds.entry(kind).or_default() += 1;
    }
    for (kind, count) in &kinds {
        println!("  {} {kind}: {count}", "→".cyan());
    }

    let positioned = doc.nodes.iter().filter(|n| n.position.is_some()).count();
    let with_community = doc
        .nodes
        .iter()
        .filter(|n| n.attrs.contains_key("modularity_class"))
        .count();
    if positioned > 0 || with_community > 0 {
        println!(
            "  {} layout annotations: {positioned} positioned, {with_community} with community",
            "→".yellow()
        );
    } else {
        println!("  {} no layout annotations yet", "→".yellow());
    }

    // Weighted degree, so heavy multi-role links rank above incidental ones.
    let mut degree: BTreeMap<&str, f64> = BTreeMap::new();
    for edge in &doc.edges {
        *degree.entry(edge.source.as_str()).or_default() += edge.weight;
        *degree.entry(edge.target.as_str()).or_default() += edge.weight;
    }
    let label_of: BTreeMap<&str, &str> = doc
        .nodes
        .iter()
        .map(|n| (n.id.as_str(), n.label.as_str()))
        .collect();

    let mut ranked: Vec<(&str, f64)> = degree.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    if !ranked.is_empty() {
        println!("  {} best connected:", "→".yellow());
        for (id, weight) in ranked.into_iter().take(top) {
            let label = label_of.get(id).copied().unwrap_or(id);
            println!("      {weight:>8.0}  {label}");
        }
    }

    Ok(())
}
