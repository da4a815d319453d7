//! Person identity and company membership.
//!
//! A person is identified by the pair (normalized name, id number): two
//! different people may share a name OR an id number, but rarely both. When
//! the id number is missing, the role id stands in, so distinct anonymous
//! officers stay distinct wherever the dataset distinguishes them at all.
//!
//! The membership index is the co-occurrence backbone shared by the officer
//! graph and the derived attribute tables: who serves where, and where each
//! person serves. Sets, not lists: a person holding three roles in one
//! company still shares that company with a colleague exactly once.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use corpnet_records::{OfficerEntry, ShareholderEntry, SourcedRecord};

use crate::registry::CompanyRegistry;
use crate::{clean, merge_display_name, sanitize_id, PLACEHOLDER_NAME};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonIdentity {
    pub node_id: String,
    pub name: String,
    pub id_number: Option<String>,
    pub nationality: Option<String>,
}

fn person_identity(
    full_name: &Option<String>,
    full_name_normalized: &Option<String>,
    id_number: &Option<String>,
    role_id: &Option<String>,
    nationality: &Option<String>,
) -> PersonIdentity {
    let normalized = clean(full_name_normalized)
        .or_else(|| clean(full_name))
        .map(sanitize_id);
    let name_key = match normalized {
        Some(k) if !k.is_empty() => k,
        _ => "unknown".to_string(),
    };
    let id_key = clean(id_number)
        .or_else(|| clean(role_id))
        .map(sanitize_id)
        .unwrap_or_else(|| "-".to_string());

    let name = clean(full_name)
        .or_else(|| clean(full_name_normalized))
        .map(str::to_string)
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());

    PersonIdentity {
        node_id: format!("person::{name_key}::{id_key}"),
        name,
        id_number: clean(id_number).map(str::to_string),
        nationality: clean(nationality).map(str::to_string),
    }
}

/// Identity of an officer entry.
pub fn officer_identity(entry: &OfficerEntry) -> PersonIdentity {
    person_identity(
        &entry.full_name,
        &entry.full_name_normalized,
        &entry.id_number,
        &entry.corp_officer_id,
        &entry.nationality,
    )
}

/// Identity of an individual shareholder, or `None` for a corporate
/// shareholder (those resolve through the company registry instead).
pub fn shareholder_identity(entry: &ShareholderEntry) -> Option<PersonIdentity> {
    if clean(&entry.company_reg_number).is_some() {
        return None;
    }
    Some(person_identity(
        &entry.full_name,
        &entry.full_name_normalized,
        &entry.id_number,
        &entry.corp_shareholder_id,
        &None,
    ))
}

/// Who serves where, and where each person serves.
#[derive(Debug, Default)]
pub struct MembershipIndex {
    pub officers_by_company: BTreeMap<String, BTreeSet<String>>,
    pub companies_by_officer: BTreeMap<String, BTreeSet<String>>,
    persons: BTreeMap<String, PersonIdentity>,
}

impl MembershipIndex {
    pub fn build(records: &[SourcedRecord], registry: &CompanyRegistry) -> Self {
        let mut index = Self::default();

        for (i, rec) in records.iter().enumerate() {
            let company_id = registry.record_identity(i).node_id.clone();

            for officer in &rec.record.officers {
                index.insert(&company_id, officer_identity(officer));
            }
            for sh in &rec.record.shareholders {
                if let Some(person) = shareholder_identity(sh) {
                    index.insert(&company_id, person);
                }
            }
        }

        index
    }

    fn insert(&mut self, company_id: &str, person: PersonIdentity) {
        self.officers_by_company
            .entry(company_id.to_string())
            .or_default()
            .insert(person.node_id.clone());
        self.companies_by_officer
            .entry(person.node_id.clone())
            .or_default()
            .insert(company_id.to_string());

        match self.persons.entry(person.node_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(person);
            }
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.name =
                    merge_display_name(&person.node_id, &existing.name, &person.name);
                if existing.id_number.is_none() {
                    existing.id_number = person.id_number;
                }
                if existing.nationality.is_none() {
                    existing.nationality = person.nationality;
                }
            }
        }
    }

    pub fn person(&self, node_id: &str) -> Option<&PersonIdentity> {
        self.persons.get(node_id)
    }

    /// All persons, in node-id order.
    pub fn persons(&self) -> impl Iterator<Item = &PersonIdentity> {
        self.persons.values()
    }
}
