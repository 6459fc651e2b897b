//! Error handling module for the election backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned when a ballot already exists for the student, election and position.
/// Clients match on this exact text.
pub const DUPLICATE_VOTE_MESSAGE: &str = "You voted for this position";

/// Error codes as constants to avoid stringly-typed errors.
#[allow(dead_code)]
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const NOT_ELIGIBLE: &str = "NOT_ELIGIBLE";
    pub const NAME_MISMATCH: &str = "NAME_MISMATCH";
    pub const UNKNOWN_ELECTION: &str = "UNKNOWN_ELECTION";
    pub const UNKNOWN_CANDIDATE: &str = "UNKNOWN_CANDIDATE";
    pub const ELECTION_NOT_OPEN: &str = "ELECTION_NOT_OPEN";
    pub const DUPLICATE_VOTE: &str = "DUPLICATE_VOTE";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const DATABASE_ERROR: &str = "DATABASE_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Authentication required
    Unauthorized(String),
    /// Resource not found
    NotFound(String),
    /// Validation error
    Validation(String),
    /// Student ID is not on the allow-list
    NotEligible,
    /// Student ID is on the allow-list under a different name
    NameMismatch,
    /// Election does not exist
    UnknownElection(String),
    /// Candidate does not exist within the election
    UnknownCandidate {
        election_id: String,
        candidate_id: String,
    },
    /// Election exists but is not accepting ballots
    ElectionNotOpen(String),
    /// A ballot already exists for this (election, student, position)
    DuplicateVote,
    /// Database error
    Database(String),
    /// Internal server error
    Internal(String),
    /// Bad request
    BadRequest(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_)
            | AppError::NotEligible
            | AppError::NameMismatch
            | AppError::UnknownElection(_)
            | AppError::UnknownCandidate { .. }
            | AppError::ElectionNotOpen(_)
            | AppError::DuplicateVote
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::NotEligible => codes::NOT_ELIGIBLE,
            AppError::NameMismatch => codes::NAME_MISMATCH,
            AppError::UnknownElection(_) => codes::UNKNOWN_ELECTION,
            AppError::UnknownCandidate { .. } => codes::UNKNOWN_CANDIDATE,
            AppError::ElectionNotOpen(_) => codes::ELECTION_NOT_OPEN,
            AppError::DuplicateVote => codes::DUPLICATE_VOTE,
            AppError::Database(_) => codes::DATABASE_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::NotEligible => "Student is not on the eligible voters list".to_string(),
            AppError::NameMismatch => {
                "Full name does not match the records for this student ID".to_string()
            }
            AppError::UnknownElection(id) => format!("Election {} not found", id),
            AppError::UnknownCandidate {
                election_id,
                candidate_id,
            } => format!(
                "Candidate {} not found in election {}",
                candidate_id, election_id
            ),
            AppError::ElectionNotOpen(id) => format!("Election {} is not open for voting", id),
            AppError::DuplicateVote => DUPLICATE_VOTE_MESSAGE.to_string(),
            AppError::Database(msg) => msg.clone(),
            AppError::Internal(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        AppError::Database(format!("Database error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::BadRequest(format!("JSON error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
}

/// Error response envelope.
///
/// `message` is duplicated at the top level because the voting client reads it directly.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(code: &str, message: String) -> Self {
        Self {
            success: false,
            message: message.clone(),
            error: ErrorDetails {
                code: code.to_string(),
                message,
            },
        }
    }
}

impl From<&AppError> for ErrorResponse {
    fn from(error: &AppError) -> Self {
        ErrorResponse::new(error.error_code(), error.message())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        let body = ErrorResponse::from(&self);
        (status, Json(body)).into_response()
    }
}
