//! Company identity resolution.
//!
//! The first build pass. Every company mentioned anywhere in the input, as
//! a record of its own, as a holding company, or as a corporate shareholder,
//! is assigned one stable identity here before any edge exists. Records
//! register first, cross-references after, so a reference to a company whose
//! record appears later in input order resolves to that record's identity
//! instead of spawning a duplicate placeholder.

use std::collections::HashMap;

use corpnet_records::SourcedRecord;

use crate::{clean, merge_display_name, sanitize_id, PLACEHOLDER_NAME};

/// One resolved company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompanyIdentity {
    pub node_id: String,
    pub name: String,
    pub alt_name: Option<String>,
    pub registration_number: Option<String>,
    pub registration_date: Option<String>,
    /// Known only through a cross-reference; no record of its own was seen.
    pub external: bool,
}

/// Identifier index over every company in a record set.
#[derive(Debug, Default)]
pub struct CompanyRegistry {
    identities: Vec<CompanyIdentity>,
    /// Alias key (`id:…` or `reg:…`) to identity index.
    by_alias: HashMap<String, usize>,
    /// Node id to identity index.
    by_node_id: HashMap<String, usize>,
    /// Record index (input order) to identity index.
    by_record: Vec<usize>,
}

impl CompanyRegistry {
    /// Build the registry over the full record set.
    pub fn scan(records: &[SourcedRecord]) -> Self {
        let mut registry = Self::default();

        // Records claim their identities first.
        for rec in records {
            let idx = registry.register_record(rec);
            registry.by_record.push(idx);
        }

        // Cross-references resolve against the complete record index; only
        // the leftovers become external identities.
        for rec in records {
            let corp = &rec.record.corp;
            if corp.holding_company_reg_number.is_some() || corp.holding_company_name.is_some() {
                registry.register_reference(
                    clean(&corp.holding_company_reg_number),
                    clean(&corp.holding_company_name),
                );
            }
            for sh in &rec.record.shareholders {
                // Individual shareholders are persons, not references.
                if let Some(reg) = clean(&sh.company_reg_number) {
                    registry.register_reference(Some(reg), clean(&sh.full_name));
                }
            }
        }

        registry
    }

    fn register_record(&mut self, rec: &SourcedRecord) -> usize {
        let corp = &rec.record.corp;
        let corp_id = clean(&corp.corp_id);
        let reg = clean(&corp.registration_number);

        let id_alias = corp_id.map(|v| format!("id:{v}"));
        let reg_alias = reg.map(|v| format!("reg:{v}"));

        // A repeated identifier means a duplicate record: merge into the
        // identity that claimed it first.
        let existing = id_alias
            .as_deref()
            .and_then(|a| self.by_alias.get(a).copied())
            .or_else(|| {
                reg_alias
                    .as_deref()
                    .and_then(|a| self.by_alias.get(a).copied())
            });

        let name = match clean(&corp.company_name) {
            Some(n) => n.to_string(),
            None => {
                tracing::warn!(
                    path = %rec.path.display(),
                    "company record has no name; substituting placeholder"
                );
                PLACEHOLDER_NAME.to_string()
            }
        };

        let idx = match existing {
            Some(idx) => {
                let identity = &mut self.identities[idx];
                identity.name = merge_display_name(&identity.node_id, &identity.name, &name);
                if identity.registration_number.is_none() {
                    identity.registration_number = reg.map(str::to_string);
                }
                if identity.alt_name.is_none() {
                    identity.alt_name = clean(&corp.alt_name).map(str::to_string);
                }
                if identity.registration_date.is_none() {
                    identity.registration_date = clean(&corp.registration_date).map(str::to_string);
                }
                idx
            }
            None => {
                let node_id = match (corp_id, reg) {
                    (Some(id), _) => format!("company::{}", sanitize_id(id)),
                    (None, Some(reg)) => format!("company::reg_{}", sanitize_id(reg)),
                    (None, None) => {
                        tracing::warn!(
                            path = %rec.path.display(),
                            "company record has no identifier; substituting file-derived placeholder"
                        );
                        format!("company::file_{}", sanitize_id(&rec.file_stem()))
                    }
                };
                self.push_identity(CompanyIdentity {
                    node_id,
                    name,
                    alt_name: clean(&corp.alt_name).map(str::to_string),
                    registration_number: reg.map(str::to_string),
                    registration_date: clean(&corp.registration_date).map(str::to_string),
                    external: false,
                })
            }
        };

        for alias in [id_alias, reg_alias].into_iter().flatten() {
            match self.by_alias.get(&alias).copied() {
                None => {
                    self.by_alias.insert(alias, idx);
                }
                Some(claimed) if claimed != idx => {
                    tracing::warn!(
                        alias,
                        "identifier already claimed by another company; keeping the first claim"
                    );
                }
                Some(_) => {}
            }
        }

        idx
    }

    /// Register a cross-reference to another company.
    ///
    /// Identifier-based only: a reference with a name but no registration
    /// number cannot be resolved without inventing merges, so it is dropped
    /// with a warning.
    fn register_reference(&mut self, reg_number: Option<&str>, name: Option<&str>) {
        let Some(reg) = reg_number else {
            if let Some(name) = name {
                tracing::warn!(name, "name-only company reference cannot be resolved");
            }
            return;
        };

        let alias = format!("reg:{reg}");
        match self.by_alias.get(&alias).copied() {
            Some(idx) => {
                // Already known (a record, or an earlier reference). A named
                // reference may still improve an external placeholder.
                if let Some(name) = name {
                    let identity = &mut self.identities[idx];
                    if identity.external {
                        identity.name =
                            merge_display_name(&identity.node_id, &identity.name, name);
                    }
                }
            }
            None => {
                let idx = self.push_identity(CompanyIdentity {
                    node_id: format!("company::reg_{}", sanitize_id(reg)),
                    name: name.unwrap_or(PLACEHOLDER_NAME).to_string(),
                    alt_name: None,
                    registration_number: Some(reg.to_string()),
                    registration_date: None,
                    external: true,
                });
                self.by_alias.insert(alias, idx);
            }
        }
    }

    fn push_identity(&mut self, identity: CompanyIdentity) -> usize {
        let idx = self.identities.len();
        self.by_node_id.insert(identity.node_id.clone(), idx);
        self.identities.push(identity);
        idx
    }

    /// Identity of the `record_index`-th input record.
    pub fn record_identity(&self, record_index: usize) -> &CompanyIdentity {
        &self.identities[self.by_record[record_index]]
    }

    /// Resolve a registration-number cross-reference.
    pub fn resolve_reg(&self, reg_number: &str) -> Option<&CompanyIdentity> {
        self.by_alias
            .get(&format!("reg:{}", reg_number.trim()))
            .map(|&idx| &self.identities[idx])
    }

    pub fn identity_by_node_id(&self, node_id: &str) -> Option<&CompanyIdentity> {
        self.by_node_id.get(node_id).map(|&idx| &self.identities[idx])
    }

    /// All identities, in registration order (records first, externals after).
    pub fn identities(&self) -> impl Iterator<Item = &CompanyIdentity> {
        self.identities.iter()
    }
}
