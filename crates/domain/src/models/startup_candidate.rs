//! Startup event candidate models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Largest team (excluding the leader) a candidate may register.
pub const MAX_TEAM_MEMBERS: u64 = 10;

/// One member of a candidate team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: String,
}

/// A team entered into a startup event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupCandidate {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub team_name: String,
    pub leader_name: String,
    pub leader_email: String,
    pub leader_mobile: String,
    pub idea: String,
    pub video: String,
    pub members: Vec<TeamMember>,
    /// Minor currency units.
    pub total_fee: i64,
    pub created_at: DateTime<Utc>,
}

/// Request payload for entering a team.
///
/// `video` is a filename returned by the video upload route.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStartupCandidateRequest {
    pub event_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Team name must be 1-200 characters"))]
    pub team_name: String,

    #[validate(length(min = 1, max = 100, message = "Leader name must be 1-100 characters"))]
    pub leader_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub leader_email: String,

    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub leader_mobile: String,

    #[validate(length(min = 1, max = 5000, message = "Idea must be 1-5000 characters"))]
    pub idea: String,

    #[validate(custom(function = "shared::validation::validate_not_blank"))]
    pub video: String,

    #[validate(
        length(min = 1, max = 10, message = "Team must have 1-10 members"),
        nested
    )]
    pub members: Vec<TeamMember>,
}

/// Fee for a team: every member plus the leader pays `fee_per_member`.
pub fn team_fee(fee_per_member: i64, member_count: usize) -> i64 {
    fee_per_member.saturating_mul(member_count as i64 + 1)
}
