//! Startup candidate entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::TeamMember;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct StartupCandidateEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub team_name: String,
    pub leader_name: String,
    pub leader_email: String,
    pub leader_mobile: String,
    pub idea: String,
    pub video: String,
    pub members: serde_json::Value,
    pub total_fee: i64,
    pub created_at: DateTime<Utc>,
}

impl From<StartupCandidateEntity> for domain::models::StartupCandidate {
    fn from(entity: StartupCandidateEntity) -> Self {
        let members: Vec<TeamMember> = serde_json::from_value(entity.members).unwrap_or_else(|e| {
            tracing::warn!(candidate_id = %entity.id, error = %e, "Unreadable team members column");
            Vec::new()
        });

        Self {
            id: entity.id,
            user_id: entity.user_id,
            event_id: entity.event_id,
            team_name: entity.team_name,
            leader_name: entity.leader_name,
            leader_email: entity.leader_email,
            leader_mobile: entity.leader_mobile,
            idea: entity.idea,
            video: entity.video,
            members,
            total_fee: entity.total_fee,
            created_at: entity.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_members_decoded_from_json() {
        let entity = StartupCandidateEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            team_name: "Rocket".to_string(),
            leader_name: "Lead".to_string(),
            leader_email: "lead@example.com".to_string(),
            leader_mobile: "9998887777".to_string(),
            idea: "Kiosks".to_string(),
            video: "pitch.mp4".to_string(),
            members: serde_json::json!([
                { "name": "A", "email": "a@example.com", "mobile": "9876543210" }
            ]),
            total_fee: 1000,
            created_at: Utc::now(),
        };
        let candidate: domain::models::StartupCandidate = entity.into();
        assert_eq!(candidate.members.len(), 1);
        assert_eq!(candidate.members[0].email, "a@example.com");
    }
}
