//! The `build` command: records directory → GEXF graphs + JSON sidecars.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

use corpnet_gexf::{write_gexf_file, GexfMeta};
use corpnet_graph::attributes;
use corpnet_graph::builder::{
    build_corporation_graph_with, build_officer_graph_with, BuildContext,
};
use corpnet_graph::Graph;
use corpnet_records::load_directory;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Corporations,
    Officers,
    Both,
}

impl Granularity {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "corporations" | "corps" | "companies" => Ok(Self::Corporations),
            "officers" | "persons" => Ok(Self::Officers),
            "both" | "all" => Ok(Self::Both),
            other => Err(anyhow!(
                "unknown granularity `{other}` (expected corporations|officers|both)"
            )),
        }
    }

    fn corporations(self) -> bool {
        matches!(self, Self::Corporations | Self::Both)
    }

    fn officers(self) -> bool {
        matches!(self, Self::Officers | Self::Both)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BuildFlags {
    pub keep_all: bool,
    pub sidecars: bool,
}

pub fn run(input: &Path, out_dir: &Path, granularity: Granularity, flags: BuildFlags) -> Result<()> {
    println!(
        "{} records from {}",
        "Loading".green().bold(),
        input.display()
    );

    let outcome = load_directory(input)?;
    println!(
        "  {} {} records parsed, {} skipped",
        "→".cyan(),
        outcome.records.len(),
        outcome.skipped
    );

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let now = chrono::Utc::now();
    let generated_at = now.to_rfc3339();
    let meta = GexfMeta {
        last_modified: Some(now.format("%Y-%m-%d").to_string()),
        ..GexfMeta::default()
    };

    let ctx = BuildContext::new(&outcome.records);

    if granularity.corporations() {
        let graph = build_corporation_graph_with(&ctx, &outcome.records);
        let graph = finish(graph, flags, "corporation")?;

        let out = out_dir.join("corporations_graph.gexf");
        write_gexf_file(&graph, &out, &meta)?;
        println!("  {} {}", "→".cyan(), out.display());

        if flags.sidecars {
            write_json(
                &out_dir.join("corporations_attributes.json"),
                &attributes::company_attributes(&ctx, &graph, &generated_at),
            )?;
            write_json(
                &out_dir.join("corporations_edges.json"),
                &attributes::edge_list(&graph, &generated_at),
            )?;
        }
    }

    if granularity.officers() {
        let graph = build_officer_graph_with(&ctx);
        let graph = finish(graph, flags, "officer")?;

        let out = out_dir.join("officers_graph.gexf");
        write_gexf_file(&graph, &out, &meta)?;
        println!("  {} {}", "→".cyan(), out.display());

        if flags.sidecars {
            write_json(
                &out_dir.join("officers_attributes.json"),
                &attributes::officer_attributes(&ctx, &graph, &generated_at),
            )?;
            write_json(
                &out_dir.join("officers_edges.json"),
                &attributes::edge_list(&graph, &generated_at),
            )?;
        }
    }

    println!("{}", "ok".green().bold());
    Ok(())
}

fn finish(graph: Graph, flags: BuildFlags, label: &str) -> Result<Graph> {
    let graph = if flags.keep_all {
        graph
    } else {
        graph.largest_component()
    };
    graph
        .validate()
        .with_context(|| format!("{label} graph failed invariant checks"))?;
    println!(
        "  {} {} graph: {} nodes, {} edges",
        "→".yellow(),
        label,
        graph.node_count(),
        graph.edge_count()
    );
    Ok(graph)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    println!("  {} {}", "→".cyan(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn granularity_parses_aliases() {
        assert_eq!(
            Granularity::parse("Corporations").unwrap(),
            Granularity::Corporations
        );
        assert_eq!(Granularity::parse("officers").unwrap(), Granularity::Officers);
        assert_eq!(Granularity::parse(" both ").unwrap(), Granularity::Both);
        assert!(Granularity::parse("planets").is_err());
    }

    #[test]
    fn granularity_selects_graphs() {
        assert!(Granularity::Both.corporations() && Granularity::Both.officers());
        assert!(!Granularity::Officers.corporations());
        assert!(!Granularity::Corporations.officers());
    }
}
