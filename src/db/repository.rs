//! Database repository for elections and ballots.
//!
//! Ballots are only ever inserted. Duplicate detection is left to the unique
//! index: an insert that violates it is reported as `AppError::DuplicateVote`.

use chrono::{SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{
    Candidate, Election, ElectionStatus, NewElection, ResolvedChoice, TallySnapshot, Vote,
    VoteCount, VotedPosition,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== ELECTION OPERATIONS ====================

    /// Insert an election or update its title and status, then upsert its candidates.
    ///
    /// A candidate's position is fixed once stored; ballots already reference it.
    pub async fn upsert_election(&self, election: &NewElection) -> Result<Election, AppError> {
        let now = timestamp();
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO elections (id, title, status, created_at) VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET title = excluded.title, status = excluded.status",
        )
        .bind(&election.id)
        .bind(&election.title)
        .bind(election.status.as_str())
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        for (sort_order, candidate) in election.candidates.iter().enumerate() {
            sqlx::query(
                "INSERT INTO candidates (election_id, id, name, position, photo_url, sort_order) VALUES (?, ?, ?, ?, ?, ?)
                 ON CONFLICT(election_id, id) DO UPDATE SET name = excluded.name, photo_url = excluded.photo_url, sort_order = excluded.sort_order",
            )
            .bind(&election.id)
            .bind(&candidate.id)
            .bind(&candidate.name)
            .bind(&candidate.position)
            .bind(&candidate.photo_url)
            .bind(sort_order as i64)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        self.get_election(&election.id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("Election {} vanished", election.id)))
    }

    /// Get an election with its candidates.
    pub async fn get_election(&self, id: &str) -> Result<Option<Election>, AppError> {
        let row = sqlx::query("SELECT id, title, status, created_at FROM elections WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let candidates = self.list_candidates(id).await?;
                Ok(Some(election_from_row(&row, candidates)))
            }
            None => Ok(None),
        }
    }

    /// List elections in the given state, newest first.
    pub async fn list_elections_by_status(
        &self,
        status: ElectionStatus,
    ) -> Result<Vec<Election>, AppError> {
        let rows = sqlx::query(
            "SELECT id, title, status, created_at FROM elections WHERE status = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut elections = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let candidates = self.list_candidates(&id).await?;
            elections.push(election_from_row(&row, candidates));
        }
        Ok(elections)
    }

    /// The most recently created open election, if any.
    pub async fn current_open_election(&self) -> Result<Option<Election>, AppError> {
        Ok(self
            .list_elections_by_status(ElectionStatus::Open)
            .await?
            .into_iter()
            .next())
    }

    async fn list_candidates(&self, election_id: &str) -> Result<Vec<Candidate>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, position, photo_url FROM candidates WHERE election_id = ? ORDER BY sort_order, id",
        )
        .bind(election_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| candidate_from_row(&row)).collect())
    }

    // ==================== BALLOT OPERATIONS ====================

    /// Record a batch of ballots for one student, all or nothing.
    ///
    /// The transaction writes before it reads anything, so SQLite takes the
    /// write lock up front and concurrent batches queue on the busy timeout.
    pub async fn record_votes(
        &self,
        student_id: &str,
        choices: &[ResolvedChoice],
    ) -> Result<Vec<Vote>, AppError> {
        let now = timestamp();
        let mut tx = self.pool.begin().await?;
        let mut votes = Vec::with_capacity(choices.len());

        for choice in choices {
            let vote = Vote {
                id: uuid::Uuid::new_v4().to_string(),
                election_id: choice.election_id.clone(),
                student_id: student_id.to_string(),
                position: choice.position.clone(),
                candidate_id: choice.candidate_id.clone(),
                timestamp: now.clone(),
            };

            sqlx::query(
                "INSERT INTO votes (id, election_id, student_id, position, candidate_id, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&vote.id)
            .bind(&vote.election_id)
            .bind(&vote.student_id)
            .bind(&vote.position)
            .bind(&vote.candidate_id)
            .bind(&vote.timestamp)
            .execute(&mut *tx)
            .await
            .map_err(map_insert_error)?;

            votes.push(vote);
        }

        tx.commit().await?;

        Ok(votes)
    }

    /// Positions a student has voted for, oldest first, optionally limited to one election.
    pub async fn votes_for_student(
        &self,
        student_id: &str,
        election_id: Option<&str>,
    ) -> Result<Vec<VotedPosition>, AppError> {
        let rows = sqlx::query(
            "SELECT v.election_id, v.position, v.candidate_id, c.name AS candidate_name, v.created_at
             FROM votes v
             JOIN candidates c ON c.election_id = v.election_id AND c.id = v.candidate_id
             WHERE v.student_id = ? AND (? IS NULL OR v.election_id = ?)
             ORDER BY v.created_at, v.rowid",
        )
        .bind(student_id)
        .bind(election_id)
        .bind(election_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| VotedPosition {
                election_id: row.get("election_id"),
                position: row.get("position"),
                candidate_id: row.get("candidate_id"),
                candidate_name: row.get("candidate_name"),
                timestamp: row.get("created_at"),
            })
            .collect())
    }

    /// Ballot counts per `(position, candidate)` and the distinct voter count, read from one snapshot.
    pub async fn tally_snapshot(&self, election_id: &str) -> Result<TallySnapshot, AppError> {
        let mut tx = self.pool.begin().await?;

        let rows = sqlx::query(
            "SELECT position, candidate_id, COUNT(*) AS votes FROM votes WHERE election_id = ? GROUP BY position, candidate_id",
        )
        .bind(election_id)
        .fetch_all(&mut *tx)
        .await?;

        let voters = sqlx::query(
            "SELECT COUNT(DISTINCT student_id) AS voters FROM votes WHERE election_id = ?",
        )
        .bind(election_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(TallySnapshot {
            counts: rows
                .into_iter()
                .map(|row| VoteCount {
                    position: row.get("position"),
                    candidate_id: row.get("candidate_id"),
                    votes: row.get("votes"),
                })
                .collect(),
            total_voters: voters.get("voters"),
        })
    }
}

// Helper functions for row conversion

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A unique-index hit is the expected duplicate signal, not a storage failure.
fn map_insert_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => AppError::DuplicateVote,
        _ => AppError::from(err),
    }
}

fn election_from_row(row: &sqlx::sqlite::SqliteRow, candidates: Vec<Candidate>) -> Election {
    let status: String = row.get("status");
    Election {
        id: row.get("id"),
        title: row.get("title"),
        status: ElectionStatus::from_str(&status).unwrap_or(ElectionStatus::Closed),
        candidates,
        created_at: row.get("created_at"),
    }
}

fn candidate_from_row(row: &sqlx::sqlite::SqliteRow) -> Candidate {
    Candidate {
        id: row.get("id"),
        name: row.get("name"),
        position: row.get("position"),
        photo_url: row.get("photo_url"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use tempfile::TempDir;

    async fn repo() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let pool = init_database(&temp_dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        (Repository::new(pool), temp_dir)
    }

    fn new_election(status: ElectionStatus) -> NewElection {
        NewElection {
            id: "src-2026".to_string(),
            title: "SRC General Elections".to_string(),
            status,
            candidates: vec![
                Candidate {
                    id: "p1".to_string(),
                    name: "Ama Mensah".to_string(),
                    position: "President".to_string(),
                    photo_url: Some("/img/ama.png".to_string()),
                },
                Candidate {
                    id: "p2".to_string(),
                    name: "Kofi Boateng".to_string(),
                    position: "President".to_string(),
                    photo_url: None,
                },
                Candidate {
                    id: "s1".to_string(),
                    name: "Yaw Asante".to_string(),
                    position: "Secretary".to_string(),
                    photo_url: None,
                },
            ],
        }
    }

    fn choice(candidate_id: &str, position: &str) -> ResolvedChoice {
        ResolvedChoice {
            election_id: "src-2026".to_string(),
            candidate_id: candidate_id.to_string(),
            position: position.to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_election_keeps_candidate_order() {
        let (repo, _dir) = repo().await;

        let election = repo
            .upsert_election(&new_election(ElectionStatus::Open))
            .await
            .unwrap();
        let ids: Vec<&str> = election.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "s1"]);
        assert_eq!(election.status, ElectionStatus::Open);

        // Re-seeding updates status without duplicating candidates
        let closed = repo
            .upsert_election(&new_election(ElectionStatus::Closed))
            .await
            .unwrap();
        assert_eq!(closed.status, ElectionStatus::Closed);
        assert_eq!(closed.candidates.len(), 3);
        assert_eq!(closed.created_at, election.created_at);
    }

    #[tokio::test]
    async fn test_current_open_election() {
        let (repo, _dir) = repo().await;
        assert!(repo.current_open_election().await.unwrap().is_none());

        repo.upsert_election(&new_election(ElectionStatus::Scheduled))
            .await
            .unwrap();
        assert!(repo.current_open_election().await.unwrap().is_none());

        repo.upsert_election(&new_election(ElectionStatus::Open))
            .await
            .unwrap();
        let open = repo.current_open_election().await.unwrap().unwrap();
        assert_eq!(open.id, "src-2026");
    }

    #[tokio::test]
    async fn test_current_open_election_is_latest_seeded() {
        let (repo, _dir) = repo().await;

        // Seeded back to back, usually within the same millisecond
        for id in ["zz-first", "aa-second"] {
            let mut election = new_election(ElectionStatus::Open);
            election.id = id.to_string();
            repo.upsert_election(&election).await.unwrap();
        }

        let open = repo.current_open_election().await.unwrap().unwrap();
        assert_eq!(open.id, "aa-second");
    }

    #[tokio::test]
    async fn test_second_vote_for_position_is_duplicate() {
        let (repo, _dir) = repo().await;
        repo.upsert_election(&new_election(ElectionStatus::Open))
            .await
            .unwrap();

        repo.record_votes("2494/16", &[choice("p1", "President")])
            .await
            .unwrap();
        let second = repo
            .record_votes("2494/16", &[choice("p2", "President")])
            .await;

        assert!(matches!(second, Err(AppError::DuplicateVote)));
        let snapshot = repo.tally_snapshot("src-2026").await.unwrap();
        assert_eq!(snapshot.counts.len(), 1);
        assert_eq!(snapshot.counts[0].candidate_id, "p1");
        assert_eq!(snapshot.total_voters, 1);
    }

    #[tokio::test]
    async fn test_duplicate_in_batch_rolls_back_whole_batch() {
        let (repo, _dir) = repo().await;
        repo.upsert_election(&new_election(ElectionStatus::Open))
            .await
            .unwrap();

        let result = repo
            .record_votes(
                "2494/16",
                &[
                    choice("s1", "Secretary"),
                    choice("p1", "President"),
                    choice("p2", "President"),
                ],
            )
            .await;

        assert!(matches!(result, Err(AppError::DuplicateVote)));
        assert!(repo
            .votes_for_student("2494/16", None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_votes_are_immutable() {
        let (repo, _dir) = repo().await;
        repo.upsert_election(&new_election(ElectionStatus::Open))
            .await
            .unwrap();
        repo.record_votes("2494/16", &[choice("p1", "President")])
            .await
            .unwrap();

        let update = sqlx::query("UPDATE votes SET candidate_id = 'p2'")
            .execute(&repo.pool)
            .await;
        assert!(update.is_err());

        let delete = sqlx::query("DELETE FROM votes").execute(&repo.pool).await;
        assert!(delete.is_err());

        let snapshot = repo.tally_snapshot("src-2026").await.unwrap();
        assert_eq!(snapshot.counts[0].candidate_id, "p1");
        assert_eq!(snapshot.total_voters, 1);
    }

    #[tokio::test]
    async fn test_votes_for_student_joins_candidate_names() {
        let (repo, _dir) = repo().await;
        repo.upsert_election(&new_election(ElectionStatus::Open))
            .await
            .unwrap();
        repo.record_votes(
            "2494/16",
            &[choice("p2", "President"), choice("s1", "Secretary")],
        )
        .await
        .unwrap();

        let voted = repo.votes_for_student("2494/16", Some("src-2026")).await.unwrap();
        assert_eq!(voted.len(), 2);
        assert_eq!(voted[0].position, "President");
        assert_eq!(voted[0].candidate_name, "Kofi Boateng");
        assert_eq!(voted[1].candidate_name, "Yaw Asante");

        assert!(repo
            .votes_for_student("2494/16", Some("other"))
            .await
            .unwrap()
            .is_empty());
        assert!(repo
            .votes_for_student("3001/19", None)
            .await
            .unwrap()
            .is_empty());
    }
}
