//! Voter allow-list records and verification payloads.

use serde::{Deserialize, Serialize};

/// One entry of the eligible voters allow-list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoterRecord {
    pub student_id: String,
    pub full_name: String,
}

/// A voter whose ID and name matched the allow-list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedVoter {
    /// Canonical student ID (program prefix stripped, `/` separator)
    pub student_id: String,
    /// Full name as recorded on the allow-list
    pub full_name: String,
}

/// Request body for verifying a student.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyStudentRequest {
    pub student_id: String,
    pub full_name: String,
}

/// Response body for a successful verification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyStudentResponse {
    pub message: String,
    pub student_id: String,
    pub full_name: String,
}
