//! Startup candidate repository for database operations.

use domain::models::TeamMember;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::StartupCandidateEntity;
use crate::metrics::timed;

const CANDIDATE_COLUMNS: &str = "id, user_id, event_id, team_name, leader_name, leader_email, \
    leader_mobile, idea, video, members, total_fee, created_at";

/// Input for inserting a candidate team.
#[derive(Debug, Clone)]
pub struct NewStartupCandidate<'a> {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub team_name: &'a str,
    pub leader_name: &'a str,
    pub leader_email: &'a str,
    pub leader_mobile: &'a str,
    pub idea: &'a str,
    pub video: &'a str,
    pub members: &'a [TeamMember],
    pub total_fee: i64,
}

#[derive(Clone)]
pub struct StartupCandidateRepository {
    pool: PgPool,
}

impl StartupCandidateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        candidate: NewStartupCandidate<'_>,
    ) -> Result<StartupCandidateEntity, sqlx::Error> {
        let members = serde_json::to_value(candidate.members)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let sql = format!(
            r#"
            INSERT INTO startup_candidates
                (user_id, event_id, team_name, leader_name, leader_email, leader_mobile,
                 idea, video, members, total_fee)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {CANDIDATE_COLUMNS}
            "#
        );
        timed(
            "create_startup_candidate",
            sqlx::query_as::<_, StartupCandidateEntity>(&sql)
                .bind(candidate.user_id)
                .bind(candidate.event_id)
                .bind(candidate.team_name)
                .bind(candidate.leader_name)
                .bind(candidate.leader_email)
                .bind(candidate.leader_mobile)
                .bind(candidate.idea)
                .bind(candidate.video)
                .bind(members)
                .bind(candidate.total_fee)
                .fetch_one(&self.pool),
        )
        .await
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<StartupCandidateEntity>, sqlx::Error> {
        let sql = format!("SELECT {CANDIDATE_COLUMNS} FROM startup_candidates WHERE id = $1");
        timed(
            "find_startup_candidate",
            sqlx::query_as::<_, StartupCandidateEntity>(&sql)
                .bind(id)
                .fetch_optional(&self.pool),
        )
        .await
    }

    pub async fn list(&self) -> Result<Vec<StartupCandidateEntity>, sqlx::Error> {
        let sql = format!(
            "SELECT {CANDIDATE_COLUMNS} FROM startup_candidates ORDER BY created_at DESC"
        );
        timed(
            "list_startup_candidates",
            sqlx::query_as::<_, StartupCandidateEntity>(&sql).fetch_all(&self.pool),
        )
        .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = timed(
            "delete_startup_candidate",
            sqlx::query("DELETE FROM startup_candidates WHERE id = $1")
                .bind(id)
                .execute(&self.pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
