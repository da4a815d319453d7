//! Directory loader for company records.
//!
//! Reads every `.json` file under the input directory, in parallel, and keeps
//! whatever parses. Unparseable files are skipped with a warning: the leak
//! contains truncated and double-encoded documents, and one bad record must
//! never abort a run. An input directory with no `.json` files at all is a
//! configuration error, not an empty dataset.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::{CompanyRecord, SourcedRecord};

#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("no .json records found under {}", .dir.display())]
    EmptyInput { dir: PathBuf },

    #[error("walking {}: {source}", .dir.display())]
    Walk {
        dir: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Result of a directory scan.
#[derive(Debug)]
pub struct LoadOutcome {
    pub records: Vec<SourcedRecord>,
    /// Files that existed but did not parse as a company record.
    pub skipped: usize,
}

/// Load every company record under `dir`.
///
/// Parsing fans out across files (no ordering between files is needed, since
/// node identity downstream is keyed by identifier); results merge back into
/// a single list sorted by path so a run is reproducible.
pub fn load_directory(dir: &Path) -> Result<LoadOutcome, RecordsError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|source| RecordsError::Walk {
            dir: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !entry.file_type().is_file() {
            continue;
        }
        if !path.extension().map_or(false, |e| e == "json") {
            continue;
        }
        paths.push(path.to_path_buf());
    }

    if paths.is_empty() {
        return Err(RecordsError::EmptyInput {
            dir: dir.to_path_buf(),
        });
    }
    paths.sort();

    let parsed: Vec<Option<SourcedRecord>> = paths
        .par_iter()
        .map(|path| match parse_file(path) {
            Ok(record) => Some(SourcedRecord {
                path: path.clone(),
                record,
            }),
            Err(err) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %err,
                    "skipping unparseable company record"
                );
                None
            }
        })
        .collect();

    let total = parsed.len();
    let records: Vec<SourcedRecord> = parsed.into_iter().flatten().collect();
    let skipped = total - records.len();

    Ok(LoadOutcome { records, skipped })
}

fn parse_file(path: &Path) -> Result<CompanyRecord, serde_json::Error> {
    // I/O failures on an individual file are treated like parse failures:
    // skip and warn, keep the run alive.
    let text = fs::read_to_string(path).map_err(serde_json::Error::io)?;
    serde_json::from_str(&text)
}
