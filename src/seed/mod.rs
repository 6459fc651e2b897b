//! Start-up seeding of elections prepared by administrators.
//!
//! The file is a JSON array of elections, each with its candidates in the
//! order they registered. Re-running the seed updates titles, statuses and
//! candidate details; it never removes anything.

use std::collections::HashSet;
use std::path::Path;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::NewElection;

/// Read and validate an elections file.
pub fn read_elections(path: &Path) -> Result<Vec<NewElection>, AppError> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        AppError::Internal(format!("Failed to read elections file {:?}: {}", path, e))
    })?;
    let elections: Vec<NewElection> = serde_json::from_str(&raw)?;

    for election in &elections {
        validate_election(election)?;
    }

    Ok(elections)
}

/// Check that an election definition is usable before it is stored.
pub fn validate_election(election: &NewElection) -> Result<(), AppError> {
    if election.id.trim().is_empty() {
        return Err(AppError::Validation("Election id is required".to_string()));
    }
    if election.title.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "Election {} needs a title",
            election.id
        )));
    }

    let mut seen = HashSet::new();
    for candidate in &election.candidates {
        if candidate.id.trim().is_empty()
            || candidate.name.trim().is_empty()
            || candidate.position.trim().is_empty()
        {
            return Err(AppError::Validation(format!(
                "Election {} has a candidate without id, name or position",
                election.id
            )));
        }
        if !seen.insert(candidate.id.as_str()) {
            return Err(AppError::Validation(format!(
                "Election {} lists candidate {} twice",
                election.id, candidate.id
            )));
        }
    }

    Ok(())
}

/// Load the elections file and upsert every election it defines.
pub async fn seed_elections(repo: &Repository, path: &Path) -> Result<usize, AppError> {
    let elections = read_elections(path)?;

    for election in &elections {
        let stored = repo.upsert_election(election).await?;
        tracing::info!(
            "Seeded election {} ({}) with {} candidates",
            stored.id,
            stored.status.as_str(),
            stored.candidates.len()
        );
    }

    Ok(elections.len())
}
