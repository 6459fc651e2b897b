//! Election and candidate models.

use serde::{Deserialize, Serialize};

/// Lifecycle state of an election. Only `Open` elections accept ballots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ElectionStatus {
    Scheduled,
    Open,
    Closed,
}

impl ElectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElectionStatus::Scheduled => "scheduled",
            ElectionStatus::Open => "open",
            ElectionStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(ElectionStatus::Scheduled),
            "open" => Some(ElectionStatus::Open),
            "closed" => Some(ElectionStatus::Closed),
            _ => None,
        }
    }
}

/// A person standing for one position in one election.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: String,
    pub name: String,
    /// The office contested, e.g. "President"
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

/// An election with its candidates in registration order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Election {
    pub id: String,
    pub title: String,
    pub status: ElectionStatus,
    pub candidates: Vec<Candidate>,
    pub created_at: String,
}

impl Election {
    /// Find a candidate of this election by ID.
    pub fn candidate(&self, candidate_id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == candidate_id)
    }

    pub fn is_open(&self) -> bool {
        self.status == ElectionStatus::Open
    }
}

/// Election summary without its candidate list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionSummary {
    pub id: String,
    pub title: String,
    pub status: ElectionStatus,
}

impl From<&Election> for ElectionSummary {
    fn from(election: &Election) -> Self {
        Self {
            id: election.id.clone(),
            title: election.title.clone(),
            status: election.status,
        }
    }
}

/// Seed definition of an election, as written by administrators.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewElection {
    pub id: String,
    pub title: String,
    pub status: ElectionStatus,
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [
            ElectionStatus::Scheduled,
            ElectionStatus::Open,
            ElectionStatus::Closed,
        ] {
            assert_eq!(ElectionStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(ElectionStatus::from_str("OPEN"), None);
    }

    #[test]
    fn test_candidate_lookup() {
        let election = Election {
            id: "src-2026".to_string(),
            title: "SRC General Elections".to_string(),
            status: ElectionStatus::Open,
            candidates: vec![Candidate {
                id: "c1".to_string(),
                name: "Ama Mensah".to_string(),
                position: "President".to_string(),
                photo_url: None,
            }],
            created_at: "2026-10-01T00:00:00+00:00".to_string(),
        };

        assert_eq!(
            election.candidate("c1").map(|c| c.position.as_str()),
            Some("President")
        );
        assert!(election.candidate("c2").is_none());
        assert!(election.is_open());
    }
}
