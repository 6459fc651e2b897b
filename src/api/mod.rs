//! REST API module.
//!
//! Public routes serve the voting client; president routes serve the live monitor.

mod president;
mod public;

pub use president::*;
pub use public::*;

use axum::{extract::FromRequest, Json};

use crate::errors::AppError;
use crate::models::{Election, ElectionResults};
use crate::tally::tally;
use crate::AppState;

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// JSON body extractor whose rejections use the `AppError` envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Create a successful API response.
pub fn success<T>(data: T) -> ApiResult<T> {
    Ok(Json(data))
}

/// Read the election's ballots and aggregate them.
async fn election_results(
    state: &AppState,
    election: &Election,
) -> Result<ElectionResults, AppError> {
    let snapshot = state.repo.tally_snapshot(&election.id).await?;
    Ok(tally(election, &snapshot.counts, snapshot.total_voters))
}
