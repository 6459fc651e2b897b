//! Live monitor endpoints for the president's dashboard. Guarded by the PSK layer.

use axum::extract::{Path, State};

use super::{election_results, success, ApiResult};
use crate::errors::AppError;
use crate::models::{ElectionSummary, LiveResultsResponse};
use crate::AppState;

/// GET /api/president/elections/live - Results of the current open election.
pub async fn live_results(State(state): State<AppState>) -> ApiResult<LiveResultsResponse> {
    let Some(election) = state.repo.current_open_election().await? else {
        return success(LiveResultsResponse::inactive("No active election"));
    };

    let results = election_results(&state, &election).await?;
    success(LiveResultsResponse::for_election(
        ElectionSummary::from(&election),
        results,
    ))
}

/// GET /api/president/elections/:id/results - Results of any election, open or not.
pub async fn get_election_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<LiveResultsResponse> {
    let election = state
        .repo
        .get_election(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Election {} not found", id)))?;

    let results = election_results(&state, &election).await?;
    let mut response =
        LiveResultsResponse::for_election(ElectionSummary::from(&election), results);
    response.active = election.is_open();
    success(response)
}
