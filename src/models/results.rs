//! Live result models returned to the president's dashboard.

use serde::Serialize;

use super::ElectionSummary;

/// Vote count for one `(position, candidate)` pair as read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCount {
    pub position: String,
    pub candidate_id: String,
    pub votes: i64,
}

/// Everything the aggregator needs, read in one transaction.
#[derive(Debug, Clone, Default)]
pub struct TallySnapshot {
    pub counts: Vec<VoteCount>,
    pub total_voters: i64,
}

/// A candidate's standing within its position.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CandidateResult {
    pub id: String,
    pub name: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    pub votes: i64,
    /// Share of the position's votes, one decimal place
    pub percentage: f64,
    pub is_winner: bool,
}

/// Ranked candidates for one contested position.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PositionResult {
    pub position: String,
    pub total_votes: i64,
    pub candidates: Vec<CandidateResult>,
}

/// Aggregated results of one election.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    pub positions: Vec<PositionResult>,
    /// Flattened, ranked per position
    pub results: Vec<CandidateResult>,
    pub total_voters: i64,
}

/// Response body of the live monitor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveResultsResponse {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub election: Option<ElectionSummary>,
    #[serde(flatten)]
    pub results: Option<ElectionResults>,
}

impl LiveResultsResponse {
    pub fn inactive(message: &str) -> Self {
        Self {
            active: false,
            message: Some(message.to_string()),
            election: None,
            results: None,
        }
    }

    pub fn for_election(election: ElectionSummary, results: ElectionResults) -> Self {
        Self {
            active: true,
            message: None,
            election: Some(election),
            results: Some(results),
        }
    }
}
