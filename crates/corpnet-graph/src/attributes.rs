//! Derived node-attribute tables and edge-list sidecars.
//!
//! The downstream visualization joins these against the laid-out graph by
//! node id: per-company rows carry the three best-connected officers, and
//! per-officer rows the three best-connected companies, so hover tooltips
//! have something to say. Rows cover only the nodes that survived filtering
//! in the graph actually exported.

use serde::{Deserialize, Serialize};

use crate::builder::BuildContext;
use crate::{Graph, NodeKind};

pub const ATTRIBUTE_TABLES_VERSION: u32 = 1;
pub const EDGE_LIST_VERSION: u32 = 1;

/// How many best-connected names a row carries.
const TOP_N: usize = 3;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAttributesFile {
    pub version: u32,
    pub generated_at: String,
    pub rows: Vec<CompanyAttributeRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyAttributeRow {
    pub node_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_name: Option<String>,
    /// Up to three officers, ranked by how many companies each serves.
    pub top_officers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerAttributesFile {
    pub version: u32,
    pub generated_at: String,
    pub rows: Vec<OfficerAttributeRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficerAttributeRow {
    pub node_id: String,
    pub full_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_number: Option<String>,
    /// Up to three companies, ranked by officer headcount.
    pub top_companies: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeListFile {
    pub version: u32,
    pub generated_at: String,
    pub rows: Vec<EdgeListRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeListRow {
    pub source: String,
    pub target: String,
    pub weight: u32,
}

/// Attribute rows for the company nodes present in `graph`.
pub fn company_attributes(
    ctx: &BuildContext,
    graph: &Graph,
    generated_at: &str,
) -> CompanyAttributesFile {
    let rows = graph
        .nodes()
        .filter(|n| n.kind == NodeKind::Company)
        .map(|node| {
            let (alt_name, name) = match ctx.registry.identity_by_node_id(&node.id) {
                Some(identity) => (identity.alt_name.clone(), identity.name.clone()),
                None => (None, node.name.clone()),
            };
            CompanyAttributeRow {
                node_id: node.id.clone(),
                name,
                alt_name,
                top_officers: top_officers(ctx, &node.id),
            }
        })
        .collect();

    CompanyAttributesFile {
        version: ATTRIBUTE_TABLES_VERSION,
        generated_at: generated_at.to_string(),
        rows,
    }
}

/// Attribute rows for the person nodes present in `graph`.
pub fn officer_attributes(
    ctx: &BuildContext,
    graph: &Graph,
    generated_at: &str,
) -> OfficerAttributesFile {
    let rows = graph
        .nodes()
        .filter(|n| n.kind == NodeKind::Person)
        .map(|node| {
            let (full_name, id_number) = match ctx.membership.person(&node.id) {
                Some(person) => (person.name.clone(), person.id_number.clone()),
                None => (node.name.clone(), None),
            };
            OfficerAttributeRow {
                node_id: node.id.clone(),
                full_name,
                id_number,
                top_companies: top_companies(ctx, &node.id),
            }
        })
        .collect();

    OfficerAttributesFile {
        version: ATTRIBUTE_TABLES_VERSION,
        generated_at: generated_at.to_string(),
        rows,
    }
}

/// Edge list of `graph` as (source, target, weight) rows.
pub fn edge_list(graph: &Graph, generated_at: &str) -> EdgeListFile {
    EdgeListFile {
        version: EDGE_LIST_VERSION,
        generated_at: generated_at.to_string(),
        rows: graph
            .edges()
            .map(|e| EdgeListRow {
                source: e.source.clone(),
                target: e.target.clone(),
                weight: e.weight,
            })
            .collect(),
    }
}

/// The company's officers, ranked by how many companies each one serves
/// (ties break by node id, so output is stable).
fn top_officers(ctx: &BuildContext, company_id: &str) -> Vec<String> {
    let Some(members) = ctx.membership.officers_by_company.get(company_id) else {
        return Vec::new();
    };
    let mut ranked: Vec<(usize, &String)> = members
        .iter()
        .map(|person_id| {
            let reach = ctx
                .membership
                .companies_by_officer
                .get(person_id)
                .map_or(0, |c| c.len());
            (reach, person_id)
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    ranked
        .into_iter()
        .take(TOP_N)
        .filter_map(|(_, person_id)| ctx.membership.person(person_id).map(|p| p.name.clone()))
        .collect()
}

/// The person's companies, ranked by officer headcount.
fn top_companies(ctx: &BuildContext, person_id: &str) -> Vec<String> {
    let Some(companies) = ctx.membership.companies_by_officer.get(person_id) else {
        return Vec::new();
    };
    let mut ranked: Vec<(usize, &String)> = companies
        .iter()
        .map(|company_id| {
            let headcount = ctx
                .membership
                .officers_by_company
                .get(company_id)
                .map_or(0, |o| o.len());
            (headcount, company_id)
        })
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    ranked
        .into_iter()
        .take(TOP_N)
        .filter_map(|(_, company_id)| {
            ctx.registry
                .identity_by_node_id(company_id)
                .map(|c| c.name.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_corporation_graph_with, build_officer_graph_with};
    use corpnet_records::{CompanyRecord, CorpDetails, OfficerEntry, SourcedRecord};
    use std::path::PathBuf;

    fn officer(name: &str, id: &str) -> OfficerEntry {
        OfficerEntry {
            full_name: Some(name.to_string()),
            full_name_normalized: Some(name.to_uppercase()),
            id_number: Some(id.to_string()),
            ..Default::default()
        }
    }

    fn record(corp_id: &str, name: &str, officers: Vec<OfficerEntry>) -> SourcedRecord {
        SourcedRecord {
            path: PathBuf::from(format!("{corp_id}.json")),
            record: CompanyRecord {
                corp: CorpDetails {
                    corp_id: Some(corp_id.to_string()),
                    company_name: Some(name.to_string()),
                    ..Default::default()
                },
                officers,
                shareholders: Vec::new(),
            },
        }
    }

    fn fixture() -> Vec<SourcedRecord> {
        // Jane serves three companies, Ko two, Mya one.
        vec![
            record(
                "1",
                "Alpha",
                vec![
                    officer("Jane Doe", "77"),
                    officer("Ko Min", "12"),
                    officer("Mya Aye", "9"),
                ],
            ),
            record("2", "Beta", vec![officer("Jane Doe", "77"), officer("Ko Min", "12")]),
            record("3", "Gamma", vec![officer("Jane Doe", "77")]),
        ]
    }

    #[test]
    fn company_rows_rank_officers_by_reach() {
        let records = fixture();
        let ctx = BuildContext::new(&records);
        let graph = build_corporation_graph_with(&ctx, &records);

        let file = company_attributes(&ctx, &graph, "2026-08-05T00:00:00Z");
        assert_eq!(file.version, ATTRIBUTE_TABLES_VERSION);

        let alpha = file
            .rows
            .iter()
            .find(|r| r.node_id == "company::1")
            .expect("alpha row");
        assert_eq!(
            alpha.top_officers,
            vec!["Jane Doe".to_string(), "Ko Min".to_string(), "Mya Aye".to_string()]
        );
    }

    #[test]
    fn officer_rows_rank_companies_by_headcount() {
        let records = fixture();
        let ctx = BuildContext::new(&records);
        let graph = build_officer_graph_with(&ctx);

        let file = officer_attributes(&ctx, &graph, "2026-08-05T00:00:00Z");
        let jane = file
            .rows
            .iter()
            .find(|r| r.full_name == "Jane Doe")
            .expect("jane row");
        assert_eq!(jane.id_number.as_deref(), Some("77"));
        assert_eq!(
            jane.top_companies,
            vec!["Alpha".to_string(), "Beta".to_string(), "Gamma".to_string()]
        );
    }

    #[test]
    fn rows_cover_only_nodes_in_the_given_graph() {
        let records = fixture();
        let ctx = BuildContext::new(&records);
        let filtered = build_officer_graph_with(&ctx).largest_component();

        let file = officer_attributes(&ctx, &filtered, "2026-08-05T00:00:00Z");
        assert_eq!(file.rows.len(), filtered.node_count());
    }

    #[test]
    fn edge_list_mirrors_the_graph() {
        let records = fixture();
        let ctx = BuildContext::new(&records);
        let graph = build_officer_graph_with(&ctx);

        let file = edge_list(&graph, "2026-08-05T00:00:00Z");
        assert_eq!(file.rows.len(), graph.edge_count());
        assert!(file.rows.iter().all(|r| r.source < r.target));
    }
}
