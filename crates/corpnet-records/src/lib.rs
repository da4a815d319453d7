//! Company record contract for the leaked registry dataset.
//!
//! One JSON document per corporation, with three subtrees:
//! - `Corp`: the corporation itself (id, names, registration data)
//! - `Officers`: directors and officers, one entry per role
//! - `Shareholders`: individual or corporate shareholders
//!
//! Field names mirror the dataset and are treated as an external, versioned
//! contract. Every field is optional in practice: the leak is inconsistent,
//! and downstream stages substitute placeholders rather than reject records.
//! Unknown fields are ignored so contract growth does not break parsing.

use serde::Deserialize;
use std::path::PathBuf;

pub mod loader;

pub use loader::{load_directory, LoadOutcome, RecordsError};

/// A single company document, as found on disk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompanyRecord {
    #[serde(rename = "Corp", default)]
    pub corp: CorpDetails,
    #[serde(rename = "Officers", default)]
    pub officers: Vec<OfficerEntry>,
    #[serde(rename = "Shareholders", default)]
    pub shareholders: Vec<ShareholderEntry>,
}

/// The `Corp` subtree.
///
/// `HoldingCompanyRegNumber` is a cross-reference: it names another company
/// record by registration number, whether or not that record exists in the
/// input set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorpDetails {
    #[serde(rename = "CorpId")]
    pub corp_id: Option<String>,
    #[serde(rename = "CompanyName")]
    pub company_name: Option<String>,
    #[serde(rename = "RegistrationNumber")]
    pub registration_number: Option<String>,
    #[serde(rename = "HoldingCompanyName")]
    pub holding_company_name: Option<String>,
    #[serde(rename = "HoldingCompanyRegNumber")]
    pub holding_company_reg_number: Option<String>,
    #[serde(rename = "RegistrationDate")]
    pub registration_date: Option<String>,
    #[serde(rename = "AltName")]
    pub alt_name: Option<String>,
}

/// One officer role. A person holding two positions in the same company
/// appears twice, once per role.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfficerEntry {
    #[serde(rename = "CorpOfficerId")]
    pub corp_officer_id: Option<String>,
    #[serde(rename = "FullName")]
    pub full_name: Option<String>,
    #[serde(rename = "FullNameNormalized")]
    pub full_name_normalized: Option<String>,
    #[serde(rename = "Nationality")]
    pub nationality: Option<String>,
    #[serde(rename = "IdNumber")]
    pub id_number: Option<String>,
    #[serde(rename = "Position")]
    pub position: Option<String>,
}

/// One shareholding. `CompanyRegNumber`, when present, marks a corporate
/// shareholder and cross-references that company's registration number.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShareholderEntry {
    #[serde(rename = "CorpShareholderId")]
    pub corp_shareholder_id: Option<String>,
    #[serde(rename = "FullName")]
    pub full_name: Option<String>,
    #[serde(rename = "FullNameNormalized")]
    pub full_name_normalized: Option<String>,
    #[serde(rename = "IdNumber")]
    pub id_number: Option<String>,
    #[serde(rename = "NumberShares")]
    pub number_shares: Option<serde_json::Value>,
    #[serde(rename = "CompanyRegNumber")]
    pub company_reg_number: Option<String>,
}

/// A parsed record together with its source path.
///
/// The path matters beyond diagnostics: when a record carries no usable
/// company identifier at all, the file stem is the placeholder of last
/// resort, so two id-less records in different files stay distinct.
#[derive(Debug, Clone)]
pub struct SourcedRecord {
    pub path: PathBuf,
    pub record: CompanyRecord,
}

impl SourcedRecord {
    /// File stem of the source document, used as a fallback identifier.
    pub fn file_stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_record() {
        let json = r#"{
            "Corp": {
                "CorpId": "189934",
                "CompanyName": "Shwe Trading Co., Ltd.",
                "RegistrationNumber": "104778707",
                "RegistrationDate": "2018-04-11",
                "AltName": "ရွှေကုန်သွယ်ရေး"
            },
            "Officers": [
                {
                    "CorpOfficerId": "552211",
                    "FullName": "U Aung Kyaw",
                    "FullNameNormalized": "AUNG KYAW",
                    "Nationality": "Myanmar",
                    "IdNumber": "12/ABC(N)123456",
                    "Position": "Director"
                }
            ],
            "Shareholders": [
                {
                    "FullName": "Golden Holdings Ltd.",
                    "CompanyRegNumber": "104700001",
                    "NumberShares": 5000
                }
            ]
        }"#;

        let rec: CompanyRecord = serde_json::from_str(json).expect("record parses");
        assert_eq!(rec.corp.corp_id.as_deref(), Some("189934"));
        assert_eq!(rec.officers.len(), 1);
        assert_eq!(rec.officers[0].position.as_deref(), Some("Director"));
        assert_eq!(
            rec.shareholders[0].company_reg_number.as_deref(),
            Some("104700001")
        );
    }

    #[test]
    fn tolerates_missing_subtrees_and_unknown_fields() {
        let rec: CompanyRecord =
            serde_json::from_str(r#"{"Corp": {"CorpId": "7"}, "SourceUrl": "x"}"#)
                .expect("sparse record parses");
        assert_eq!(rec.corp.corp_id.as_deref(), Some("7"));
        assert!(rec.officers.is_empty());
        assert!(rec.shareholders.is_empty());

        // A completely empty object is still a record; placeholders come later.
        let rec: CompanyRecord = serde_json::from_str("{}").expect("empty record parses");
        assert!(rec.corp.company_name.is_none());
    }

    #[test]
    fn tolerates_null_fields() {
        let rec: CompanyRecord = serde_json::from_str(
            r#"{"Corp": {"CorpId": null, "CompanyName": null}, "Officers": [{"FullName": null}]}"#,
        )
        .expect("nulls parse as absent");
        assert!(rec.corp.corp_id.is_none());
        assert!(rec.officers[0].full_name.is_none());
    }
}
