//! Ballot models. A recorded vote is never updated or deleted.

use serde::{Deserialize, Serialize};

/// A recorded ballot for one position.
#[derive(Debug, Clone)]
pub struct Vote {
    pub id: String,
    pub election_id: String,
    pub student_id: String,
    pub position: String,
    pub candidate_id: String,
    pub timestamp: String,
}

/// One `(election, candidate)` choice in a vote submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteChoice {
    pub election_id: String,
    pub candidate_id: String,
}

/// A choice whose candidate has been resolved to the position it contests.
#[derive(Debug, Clone)]
pub struct ResolvedChoice {
    pub election_id: String,
    pub candidate_id: String,
    pub position: String,
}

/// Request body for submitting votes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVotesRequest {
    pub student_id: String,
    pub full_name: String,
    #[serde(default)]
    pub votes: Vec<VoteChoice>,
}

/// Confirmation of one recorded choice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    pub election_id: String,
    pub candidate_id: String,
    pub position: String,
    pub timestamp: String,
}

impl From<Vote> for VoteReceipt {
    fn from(vote: Vote) -> Self {
        Self {
            election_id: vote.election_id,
            candidate_id: vote.candidate_id,
            position: vote.position,
            timestamp: vote.timestamp,
        }
    }
}

/// Response body for a successful vote submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastVotesResponse {
    pub message: String,
    pub votes: Vec<VoteReceipt>,
}

/// Request body for the vote status query.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusRequest {
    pub student_id: String,
    pub full_name: String,
    #[serde(default)]
    pub election_id: Option<String>,
}

/// A position the student has already voted for.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VotedPosition {
    pub election_id: String,
    pub position: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub timestamp: String,
}

/// Response body for the vote status query.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteStatusResponse {
    pub student_id: String,
    pub voted_positions: Vec<VotedPosition>,
}
