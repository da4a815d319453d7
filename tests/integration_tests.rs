//! Integration tests for the complete corpnet pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - records directory → loader → builders → GEXF export
//! - GEXF export → import → graph equality (round trip)
//! - placeholder handling for incomplete leaked records
//!
//! Run with: cargo test --test integration_tests

use std::fs;
use std::path::Path;

use tempfile::tempdir;

use corpnet_gexf::{read_gexf_file, write_gexf_file, GexfMeta};
use corpnet_graph::builder::{
    build_corporation_graph, build_officer_graph, build_officer_graph_with, BuildContext,
};
use corpnet_graph::{NodeKind, PLACEHOLDER_NAME};
use corpnet_records::load_directory;

fn write_record(dir: &Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

/// Three-company fixture: Jane Doe serves in Alpha and Beta (shared with
/// Ko Min), Beta is owned by a holding company whose record comes *after*
/// the record that references it.
fn seed_records(dir: &Path) {
    write_record(
        dir,
        "alpha.json",
        r#"{
            "Corp": {"CorpId": "1", "CompanyName": "Alpha Trading", "RegistrationNumber": "100"},
            "Officers": [
                {"FullName": "Jane Doe", "FullNameNormalized": "JANE DOE", "IdNumber": "77", "Position": "Director"},
                {"FullName": "Ko Min", "FullNameNormalized": "KO MIN", "IdNumber": "12", "Position": "Secretary"}
            ]
        }"#,
    );
    write_record(
        dir,
        "beta.json",
        r#"{
            "Corp": {
                "CorpId": "2", "CompanyName": "Beta Industries", "RegistrationNumber": "200",
                "HoldingCompanyName": "Gamma Holdings", "HoldingCompanyRegNumber": "300"
            },
            "Officers": [
                {"FullName": "Jane Doe", "FullNameNormalized": "JANE DOE", "IdNumber": "77", "Position": "Director"},
                {"FullName": "Ko Min", "FullNameNormalized": "KO MIN", "IdNumber": "12", "Position": "Director"}
            ]
        }"#,
    );
    write_record(
        dir,
        "gamma.json",
        r#"{
            "Corp": {"CorpId": "3", "CompanyName": "Gamma Holdings", "RegistrationNumber": "300"},
            "Officers": []
        }"#,
    );
}

// ============================================================================
// Records → builders
// ============================================================================

#[test]
fn test_pipeline_shared_officer_weights() {
    let dir = tempdir().unwrap();
    seed_records(dir.path());

    let outcome = load_directory(dir.path()).unwrap();
    assert_eq!(outcome.records.len(), 3);

    let officers = build_officer_graph(&outcome.records);
    officers.validate().unwrap();

    // Exactly one Jane Doe node, despite appearing in two records.
    let janes: Vec<_> = officers.nodes().filter(|n| n.name == "Jane Doe").collect();
    assert_eq!(janes.len(), 1);

    // Jane and Ko share two companies: one edge, weight 2.
    assert_eq!(officers.edge_count(), 1);
    let edge = officers.edges().next().unwrap();
    assert_eq!(edge.weight, 2);
}

#[test]
fn test_pipeline_forward_holding_reference() {
    let dir = tempdir().unwrap();
    seed_records(dir.path());

    let outcome = load_directory(dir.path()).unwrap();
    let corp = build_corporation_graph(&outcome.records);
    corp.validate().unwrap();

    // Gamma's record appears after the reference to it; there must be one
    // Gamma node, not a record node plus an "unknown" placeholder.
    let gammas: Vec<_> = corp
        .nodes()
        .filter(|n| n.name == "Gamma Holdings")
        .collect();
    assert_eq!(gammas.len(), 1);
    assert_eq!(gammas[0].id, "company::3");

    // And the ownership edge lands on that node.
    assert!(corp
        .edges()
        .any(|e| e.source == "company::2" && e.target == "company::3"));

    // Jane has a weight-1 edge to each of her companies.
    let jane_edges: Vec<_> = corp
        .edges()
        .filter(|e| e.source.contains("jane_doe") || e.target.contains("jane_doe"))
        .collect();
    assert_eq!(jane_edges.len(), 2);
    assert!(jane_edges.iter().all(|e| e.weight == 1));
}

#[test]
fn test_record_missing_name_gets_placeholder() {
    let dir = tempdir().unwrap();
    write_record(
        dir.path(),
        "mystery.json",
        r#"{"Corp": {"CorpId": "9"}, "Officers": [{"IdNumber": "5"}]}"#,
    );

    let outcome = load_directory(dir.path()).unwrap();
    let corp = build_corporation_graph(&outcome.records);

    let company = corp.node("company::9").expect("company node exists");
    assert_eq!(company.name, PLACEHOLDER_NAME);
    let person = corp
        .nodes()
        .find(|n| n.kind == NodeKind::Person)
        .expect("officer node exists");
    assert_eq!(person.name, PLACEHOLDER_NAME);
}

// ============================================================================
// GEXF round trip
// ============================================================================

#[test]
fn test_gexf_round_trip_both_granularities() {
    let dir = tempdir().unwrap();
    seed_records(dir.path());
    let outcome = load_directory(dir.path()).unwrap();

    let ctx = BuildContext::new(&outcome.records);
    let corp = build_corporation_graph(&outcome.records);
    let officers = build_officer_graph_with(&ctx);

    for (graph, name) in [(corp, "corporations.gexf"), (officers, "officers.gexf")] {
        let path = dir.path().join(name);
        write_gexf_file(&graph, &path, &GexfMeta::default()).unwrap();

        let doc = read_gexf_file(&path).unwrap();
        assert_eq!(doc.default_edge_type, "undirected");
        let back = doc.to_graph().unwrap();
        assert_eq!(back, graph, "{name} round trip");
    }
}

#[test]
fn test_runs_are_idempotent_down_to_the_bytes() {
    let dir = tempdir().unwrap();
    seed_records(dir.path());

    let export = |out: &Path| {
        let outcome = load_directory(dir.path()).unwrap();
        let graph = build_officer_graph(&outcome.records).largest_component();
        write_gexf_file(&graph, out, &GexfMeta::default()).unwrap();
    };

    let first = dir.path().join("run1.gexf");
    let second = dir.path().join("run2.gexf");
    export(&first);
    export(&second);

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_largest_component_drops_islands() {
    let dir = tempdir().unwrap();
    seed_records(dir.path());
    // An unconnected company with its own officer.
    write_record(
        dir.path(),
        "island.json",
        r#"{
            "Corp": {"CorpId": "50", "CompanyName": "Island Ltd"},
            "Officers": [{"FullName": "Solo Officer", "FullNameNormalized": "SOLO OFFICER", "IdNumber": "1"}]
        }"#,
    );

    let outcome = load_directory(dir.path()).unwrap();
    let corp = build_corporation_graph(&outcome.records);
    let filtered = corp.largest_component();

    assert!(corp.contains_node("company::50"));
    assert!(!filtered.contains_node("company::50"));
    assert!(filtered.node_count() < corp.node_count());
    filtered.validate().unwrap();
}
