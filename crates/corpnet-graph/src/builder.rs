//! Graph construction, one pass per granularity.
//!
//! Both builders run against a [`BuildContext`] (the frozen company registry
//! plus the membership index), so identity is settled before the first edge
//! and the two granularities agree on who is who.

use corpnet_records::SourcedRecord;
use std::collections::BTreeMap;

use crate::membership::{officer_identity, shareholder_identity, MembershipIndex, PersonIdentity};
use crate::registry::{CompanyIdentity, CompanyRegistry};
use crate::{clean, Graph, Node, NodeKind, RelationKind};

/// Shared first-pass state: identity registry + membership index.
pub struct BuildContext {
    pub registry: CompanyRegistry,
    pub membership: MembershipIndex,
}

impl BuildContext {
    pub fn new(records: &[SourcedRecord]) -> Self {
        let registry = CompanyRegistry::scan(records);
        let membership = MembershipIndex::build(records, &registry);
        Self {
            registry,
            membership,
        }
    }
}

fn company_node(identity: &CompanyIdentity) -> Node {
    let mut attrs = BTreeMap::new();
    if let Some(reg) = &identity.registration_number {
        attrs.insert("registration_number".to_string(), reg.clone());
    }
    if let Some(alt) = &identity.alt_name {
        attrs.insert("alt_name".to_string(), alt.clone());
    }
    if let Some(date) = &identity.registration_date {
        attrs.insert("registration_date".to_string(), date.clone());
    }
    if identity.external {
        attrs.insert("external".to_string(), "true".to_string());
    }
    Node {
        id: identity.node_id.clone(),
        kind: NodeKind::Company,
        name: identity.name.clone(),
        attrs,
    }
}

fn person_node(person: &PersonIdentity) -> Node {
    let mut attrs = BTreeMap::new();
    if let Some(id_number) = &person.id_number {
        attrs.insert("id_number".to_string(), id_number.clone());
    }
    if let Some(nationality) = &person.nationality {
        attrs.insert("nationality".to_string(), nationality.clone());
    }
    Node {
        id: person.node_id.clone(),
        kind: NodeKind::Person,
        name: person.name.clone(),
        attrs,
    }
}

/// Build the corporation-granularity graph.
///
/// One company node per distinct company identifier (including companies
/// known only through cross-references), one person node per distinct person,
/// and a weighted edge per person/company affiliation. A person holding
/// several roles in the same company gets one edge whose weight counts the
/// roles. Corporate shareholdings and holding-company links become
/// company↔company edges.
pub fn build_corporation_graph(records: &[SourcedRecord]) -> Graph {
    build_corporation_graph_with(&BuildContext::new(records), records)
}

pub fn build_corporation_graph_with(ctx: &BuildContext, records: &[SourcedRecord]) -> Graph {
    let mut graph = Graph::new();

    for identity in ctx.registry.identities() {
        graph.upsert_node(company_node(identity));
    }

    for (i, rec) in records.iter().enumerate() {
        let company_id = ctx.registry.record_identity(i).node_id.clone();

        for officer in &rec.record.officers {
            let person = officer_identity(officer);
            graph.upsert_node(person_node(&person));
            graph.bump_edge(&person.node_id, &company_id, RelationKind::OfficerOf, 1);
        }

        for sh in &rec.record.shareholders {
            match shareholder_identity(sh) {
                Some(person) => {
                    graph.upsert_node(person_node(&person));
                    graph.bump_edge(&person.node_id, &company_id, RelationKind::ShareholderOf, 1);
                }
                None => {
                    // Corporate shareholder: resolve the cross-reference.
                    let reg = clean(&sh.company_reg_number).unwrap_or_default();
                    match ctx.registry.resolve_reg(reg) {
                        Some(holder) => graph.bump_edge(
                            &holder.node_id,
                            &company_id,
                            RelationKind::ShareholderOf,
                            1,
                        ),
                        None => tracing::warn!(
                            reg,
                            "corporate shareholder reference missing from registry"
                        ),
                    }
                }
            }
        }

        if let Some(reg) = clean(&rec.record.corp.holding_company_reg_number) {
            if let Some(holding) = ctx.registry.resolve_reg(reg) {
                graph.bump_edge(
                    &holding.node_id,
                    &company_id,
                    RelationKind::ShareholderOf,
                    1,
                );
            }
        }
    }

    graph
}

/// Build the officer-granularity graph.
///
/// Person nodes only. Two people are linked iff they co-occur in at least
/// one company; the weight is the number of companies they share. Pairing
/// runs over the per-company membership *sets*, so role multiplicity within
/// one company never inflates a weight, and nobody co-occurs with themselves.
pub fn build_officer_graph(records: &[SourcedRecord]) -> Graph {
    build_officer_graph_with(&BuildContext::new(records))
}

pub fn build_officer_graph_with(ctx: &BuildContext) -> Graph {
    let mut graph = Graph::new();

    for person in ctx.membership.persons() {
        graph.upsert_node(person_node(person));
    }

    for members in ctx.membership.officers_by_company.values() {
        let members: Vec<&String> = members.iter().collect();
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                graph.bump_edge(a.as_str(), b.as_str(), RelationKind::SharedCompany, 1);
            }
        }
    }

    graph
}
