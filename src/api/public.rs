//! Public voting endpoints. No login session: every call carries the student's ID and name.

use std::collections::HashMap;

use axum::extract::State;

use super::{success, ApiJson, ApiResult};
use crate::errors::AppError;
use crate::models::{
    CastVotesRequest, CastVotesResponse, Election, ElectionStatus, ResolvedChoice, VoteChoice,
    VoteReceipt, VoteStatusRequest, VoteStatusResponse, VerifyStudentRequest,
    VerifyStudentResponse,
};
use crate::AppState;

/// POST /api/public/verify-student - Check a student against the allow-list.
pub async fn verify_student(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VerifyStudentRequest>,
) -> ApiResult<VerifyStudentResponse> {
    let voter = state
        .allow_list
        .verify(&request.student_id, &request.full_name)?;

    tracing::debug!("Student {} verified", voter.student_id);

    success(VerifyStudentResponse {
        message: "Student verified successfully".to_string(),
        student_id: voter.student_id,
        full_name: voter.full_name,
    })
}

/// GET /api/public/elections/active - List elections currently accepting ballots.
pub async fn list_active_elections(State(state): State<AppState>) -> ApiResult<Vec<Election>> {
    let elections = state
        .repo
        .list_elections_by_status(ElectionStatus::Open)
        .await?;
    success(elections)
}

/// POST /api/public/vote - Record one ballot per chosen candidate.
///
/// Eligibility is checked again here rather than trusting an earlier verify call.
/// The batch is stored all or nothing.
pub async fn cast_votes(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CastVotesRequest>,
) -> ApiResult<CastVotesResponse> {
    let voter = state
        .allow_list
        .verify(&request.student_id, &request.full_name)?;

    if request.votes.is_empty() {
        return Err(AppError::Validation("No votes submitted".to_string()));
    }

    let choices = resolve_choices(&state, &request.votes).await?;
    let votes = state.repo.record_votes(&voter.student_id, &choices).await?;

    // Never log which candidate a student picked
    tracing::info!(
        "Recorded {} ballot(s) in election(s) {}",
        votes.len(),
        distinct_elections(&choices).join(", ")
    );

    success(CastVotesResponse {
        message: "Vote recorded successfully".to_string(),
        votes: votes.into_iter().map(VoteReceipt::from).collect(),
    })
}

/// POST /api/public/vote-status - Positions the student has already voted for.
pub async fn vote_status(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<VoteStatusRequest>,
) -> ApiResult<VoteStatusResponse> {
    let voter = state
        .allow_list
        .verify(&request.student_id, &request.full_name)?;

    if let Some(election_id) = &request.election_id {
        if state.repo.get_election(election_id).await?.is_none() {
            return Err(AppError::UnknownElection(election_id.clone()));
        }
    }

    let voted_positions = state
        .repo
        .votes_for_student(&voter.student_id, request.election_id.as_deref())
        .await?;

    success(VoteStatusResponse {
        student_id: voter.student_id,
        voted_positions,
    })
}

/// Map each `(election, candidate)` choice to the position that candidate contests.
async fn resolve_choices(
    state: &AppState,
    choices: &[VoteChoice],
) -> Result<Vec<ResolvedChoice>, AppError> {
    let mut elections: HashMap<String, Election> = HashMap::new();
    let mut resolved = Vec::with_capacity(choices.len());

    for choice in choices {
        if !elections.contains_key(&choice.election_id) {
            let election = state
                .repo
                .get_election(&choice.election_id)
                .await?
                .ok_or_else(|| AppError::UnknownElection(choice.election_id.clone()))?;
            elections.insert(choice.election_id.clone(), election);
        }
        let election = &elections[&choice.election_id];

        if !election.is_open() {
            return Err(AppError::ElectionNotOpen(election.id.clone()));
        }

        let candidate =
            election
                .candidate(&choice.candidate_id)
                .ok_or_else(|| AppError::UnknownCandidate {
                    election_id: election.id.clone(),
                    candidate_id: choice.candidate_id.clone(),
                })?;

        resolved.push(ResolvedChoice {
            election_id: election.id.clone(),
            candidate_id: candidate.id.clone(),
            position: candidate.position.clone(),
        });
    }

    Ok(resolved)
}

fn distinct_elections(choices: &[ResolvedChoice]) -> Vec<&str> {
    let mut ids: Vec<&str> = Vec::new();
    for choice in choices {
        if !ids.contains(&choice.election_id.as_str()) {
            ids.push(choice.election_id.as_str());
        }
    }
    ids
}
