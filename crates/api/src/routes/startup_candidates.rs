//! Startup event team registration.

use axum::extract::{Path, State};
use domain::models::startup_candidate::{team_fee, CreateStartupCandidateRequest};
use domain::models::StartupCandidate;
use persistence::repositories::{EventRepository, NewStartupCandidate, StartupCandidateRepository};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson, UserAuth};
use crate::response::{ApiResponse, Message};
use crate::services::media::MediaKind;

/// POST /api/v1/startup-candidates
///
/// The total fee is computed here from the team size; clients never send it.
pub async fn create_candidate(
    State(state): State<AppState>,
    auth: UserAuth,
    ApiJson(request): ApiJson<CreateStartupCandidateRequest>,
) -> Result<ApiResponse<StartupCandidate>, ApiError> {
    request.validate()?;

    match EventRepository::new(state.pool.clone())
        .find_by_id(request.event_id)
        .await?
    {
        Some(found) if found.event.is_start_up_vapi_event => {}
        Some(_) => {
            return Err(ApiError::field(
                "eventId",
                "Event does not accept startup teams",
            ))
        }
        None => return Err(ApiError::NotFound("Event not found".to_string())),
    }

    let video = request.video.trim();
    state
        .media
        .ensure_exists(MediaKind::Video, video)
        .await
        .map_err(|e| e.for_field("video"))?;

    let total_fee = team_fee(state.config.startup.fee_per_member, request.members.len());
    let candidate = StartupCandidateRepository::new(state.pool.clone())
        .create(NewStartupCandidate {
            user_id: auth.user_id(),
            event_id: request.event_id,
            team_name: request.team_name.trim(),
            leader_name: request.leader_name.trim(),
            leader_email: request.leader_email.trim(),
            leader_mobile: &request.leader_mobile,
            idea: request.idea.trim(),
            video,
            members: &request.members,
            total_fee,
        })
        .await?;

    info!(
        candidate_id = %candidate.id,
        event_id = %request.event_id,
        members = request.members.len(),
        total_fee,
        "Startup team registered"
    );
    Ok(ApiResponse::created(candidate.into()))
}

/// GET /api/v1/startup-candidates
pub async fn list_candidates(
    State(state): State<AppState>,
    _admin: AdminAuth,
) -> Result<ApiResponse<Vec<StartupCandidate>>, ApiError> {
    let candidates = StartupCandidateRepository::new(state.pool.clone())
        .list()
        .await?;
    Ok(ApiResponse::ok(
        candidates.into_iter().map(Into::into).collect(),
    ))
}

/// GET /api/v1/startup-candidates/:id
///
/// Visible to the registering user and to admins.
pub async fn get_candidate(
    State(state): State<AppState>,
    auth: UserAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<StartupCandidate>, ApiError> {
    let candidate: StartupCandidate = StartupCandidateRepository::new(state.pool.clone())
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Startup candidate not found".to_string()))?
        .into();
    auth.ensure_self_or_admin(candidate.user_id)?;
    Ok(ApiResponse::ok(candidate))
}

/// DELETE /api/v1/startup-candidates/:id
pub async fn delete_candidate(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    if !StartupCandidateRepository::new(state.pool.clone())
        .delete(id)
        .await?
    {
        return Err(ApiError::NotFound("Startup candidate not found".to_string()));
    }
    Ok(ApiResponse::ok(Message::new("Startup candidate deleted")))
}
