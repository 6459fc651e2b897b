//! Voter eligibility against the pre-loaded allow-list.
//!
//! Student IDs come in several written forms ("2494/16", "UGPR2494/16",
//! "ugpr 2494-16"). They are reduced to a canonical `<serial>/<year>` key
//! before lookup. Accepted input formats:
//!
//! - surrounding and inner whitespace is ignored, letters are case-insensitive;
//! - an optional known program-code prefix (e.g. `UGPR`);
//! - a numeric serial, one separator out of `/ \ - .`, and a numeric year.
//!
//! Leading zeros are significant: "02494/16" and "2494/16" are different students.
//!
//! Anything else is not a student ID and is never eligible.

use std::collections::HashMap;
use std::path::Path;

use crate::errors::AppError;
use crate::models::{VerifiedVoter, VoterRecord};

const SEPARATORS: [char; 4] = ['/', '\\', '-', '.'];

/// Reduce a raw student ID to its canonical form, or `None` if it is not in an accepted format.
pub fn normalize_student_id(raw: &str, known_prefixes: &[String]) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_uppercase();

    // Longest prefix first so "UGPRX" is not shadowed by "UGPR"
    let mut prefixes: Vec<String> = known_prefixes
        .iter()
        .map(|p| p.trim().to_ascii_uppercase())
        .filter(|p| !p.is_empty())
        .collect();
    prefixes.sort_by_key(|p| std::cmp::Reverse(p.len()));
    let body = prefixes
        .iter()
        .find_map(|p| compact.strip_prefix(p.as_str()))
        .unwrap_or(compact.as_str());

    let (serial, year) = body.split_once(|c: char| SEPARATORS.contains(&c))?;
    let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_number(serial) || !is_number(year) {
        return None;
    }

    Some(format!("{}/{}", serial, year))
}

/// Lower-case a name and collapse whitespace runs so comparisons ignore formatting.
pub fn normalize_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Immutable index of eligible voters keyed by canonical student ID.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    entries: HashMap<String, VoterRecord>,
    known_prefixes: Vec<String>,
}

impl AllowList {
    /// Build the index. Unparsable IDs and two records sharing a canonical ID are rejected.
    pub fn from_records(
        records: Vec<VoterRecord>,
        known_prefixes: &[String],
    ) -> Result<Self, AppError> {
        let mut entries: HashMap<String, VoterRecord> = HashMap::with_capacity(records.len());

        for record in records {
            let canonical =
                normalize_student_id(&record.student_id, known_prefixes).ok_or_else(|| {
                    AppError::Validation(format!(
                        "Allow-list entry has an unrecognised student ID: {}",
                        record.student_id
                    ))
                })?;

            if let Some(existing) = entries.get(&canonical) {
                return Err(AppError::Validation(format!(
                    "Allow-list entries {} and {} share the student ID {}",
                    existing.student_id, record.student_id, canonical
                )));
            }

            entries.insert(canonical, record);
        }

        Ok(Self {
            entries,
            known_prefixes: known_prefixes.to_vec(),
        })
    }

    /// Load a JSON array of `{studentId, fullName}` records.
    ///
    /// A missing file gives an empty allow-list so the service can still start.
    pub fn load(path: &Path, known_prefixes: &[String]) -> Result<Self, AppError> {
        if !path.exists() {
            tracing::warn!(
                "Voter allow-list {:?} not found; nobody will be eligible to vote",
                path
            );
            return Self::from_records(Vec::new(), known_prefixes);
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::Internal(format!("Failed to read allow-list {:?}: {}", path, e))
        })?;
        let records: Vec<VoterRecord> = serde_json::from_str(&raw)?;

        Self::from_records(records, known_prefixes)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check a `(studentId, fullName)` pair. Has no side effects and grants nothing on its own.
    pub fn verify(&self, student_id: &str, full_name: &str) -> Result<VerifiedVoter, AppError> {
        let canonical = normalize_student_id(student_id, &self.known_prefixes)
            .ok_or(AppError::NotEligible)?;
        let record = self.entries.get(&canonical).ok_or(AppError::NotEligible)?;

        if normalize_name(&record.full_name) != normalize_name(full_name) {
            return Err(AppError::NameMismatch);
        }

        Ok(VerifiedVoter {
            student_id: canonical,
            full_name: record.full_name.clone(),
        })
    }
}
