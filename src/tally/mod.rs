//! Result aggregation for the live monitor.
//!
//! Turns raw `(position, candidate) -> count` rows into ranked results per position.
//! Ties on vote count keep the candidates' registration order.

use std::collections::HashMap;

use crate::models::{CandidateResult, Election, ElectionResults, PositionResult, VoteCount};

/// Aggregate vote counts for an election.
///
/// Every registered candidate appears, including those without votes. Counts
/// for candidates the election does not know are dropped with a warning.
pub fn tally(election: &Election, counts: &[VoteCount], total_voters: i64) -> ElectionResults {
    let mut lookup: HashMap<(&str, &str), i64> = HashMap::with_capacity(counts.len());
    for count in counts {
        let known = election
            .candidate(&count.candidate_id)
            .is_some_and(|c| c.position == count.position);
        if !known {
            tracing::warn!(
                "Ignoring {} vote(s) for unknown candidate {} ({}) in election {}",
                count.votes,
                count.candidate_id,
                count.position,
                election.id
            );
            continue;
        }
        *lookup
            .entry((count.position.as_str(), count.candidate_id.as_str()))
            .or_insert(0) += count.votes;
    }

    let mut positions: Vec<&str> = Vec::new();
    for candidate in &election.candidates {
        if !positions.contains(&candidate.position.as_str()) {
            positions.push(candidate.position.as_str());
        }
    }

    let positions: Vec<PositionResult> = positions
        .into_iter()
        .map(|position| {
            let mut candidates: Vec<CandidateResult> = election
                .candidates
                .iter()
                .filter(|c| c.position == position)
                .map(|c| CandidateResult {
                    id: c.id.clone(),
                    name: c.name.clone(),
                    position: c.position.clone(),
                    photo_url: c.photo_url.clone(),
                    votes: lookup
                        .get(&(position, c.id.as_str()))
                        .copied()
                        .unwrap_or(0),
                    percentage: 0.0,
                    is_winner: false,
                })
                .collect();

            let total_votes: i64 = candidates.iter().map(|c| c.votes).sum();

            // sort_by is stable, which keeps registration order among ties
            candidates.sort_by(|a, b| b.votes.cmp(&a.votes));

            for (rank, candidate) in candidates.iter_mut().enumerate() {
                candidate.percentage = percentage(candidate.votes, total_votes);
                candidate.is_winner = rank == 0 && total_votes > 0;
            }

            PositionResult {
                position: position.to_string(),
                total_votes,
                candidates,
            }
        })
        .collect();

    let results = positions
        .iter()
        .flat_map(|p| p.candidates.iter().cloned())
        .collect();

    ElectionResults {
        positions,
        results,
        total_voters,
    }
}

/// Share of `total` in percent, one decimal place. Zero when nothing was cast.
fn percentage(votes: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    let raw = votes as f64 * 100.0 / total as f64;
    (raw * 10.0).round() / 10.0
}
