//! Event routes.
//!
//! `POST /api/v1/events` accepts either a multipart form with a `banner` file
//! part or a JSON body naming an already uploaded banner. Both shapes go
//! through the same create operation.

use axum::{
    extract::{multipart::MultipartError, FromRequest, Multipart, Path, Request, State},
    http::header::CONTENT_TYPE,
};
use domain::models::event::{CreateEventRequest, ListEventsQuery, UpdateEventDetailsRequest, UpdateEventRequest};
use domain::models::EventWithDetails;
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{AdminAuth, ApiJson, ApiQuery};
use crate::response::{ApiResponse, Message};
use crate::services::events::{BannerUpload, EventForm};
use crate::services::EventService;

pub(crate) fn event_service(state: &AppState) -> EventService {
    EventService::new(
        state.pool.clone(),
        state.media.clone(),
        state.config.content.video_hosts.clone(),
    )
}

pub(crate) fn multipart_error(err: MultipartError) -> ApiError {
    ApiError::bad_request(err.body_text())
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

/// Reads the form: the `banner` part as a file, every other part as text.
async fn read_event_form(
    mut multipart: Multipart,
) -> Result<(CreateEventRequest, Option<BannerUpload>), ApiError> {
    let mut form = EventForm::new();
    let mut banner = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "banner" {
            let content_type = field.content_type().map(str::to_string);
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;
            banner = Some(BannerUpload {
                content_type,
                file_name,
                data,
            });
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.insert(&name, value);
        }
    }

    Ok((form.into_request()?, banner))
}

/// POST /api/v1/events
pub async fn create_event(
    State(state): State<AppState>,
    _admin: AdminAuth,
    request: Request,
) -> Result<ApiResponse<EventWithDetails>, ApiError> {
    let (body, banner) = if is_multipart(&request) {
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;
        read_event_form(multipart).await?
    } else {
        let ApiJson(body) = ApiJson::<CreateEventRequest>::from_request(request, &state).await?;
        (body, None)
    };

    let event = event_service(&state).create(body, banner).await?;
    Ok(ApiResponse::created(event))
}

/// GET /api/v1/events?filter=upcoming|past|today|all
pub async fn list_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListEventsQuery>,
) -> Result<ApiResponse<Vec<EventWithDetails>>, ApiError> {
    let events = event_service(&state).list(query.filter).await?;
    Ok(ApiResponse::ok(events))
}

/// GET /api/v1/events/:id
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<EventWithDetails>, ApiError> {
    Ok(ApiResponse::ok(event_service(&state).get(id).await?))
}

/// PUT /api/v1/events/:id
pub async fn update_event(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateEventRequest>,
) -> Result<ApiResponse<EventWithDetails>, ApiError> {
    Ok(ApiResponse::ok(event_service(&state).update(id, request).await?))
}

/// PUT /api/v1/events/:id/details
pub async fn update_event_details(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
    ApiJson(request): ApiJson<UpdateEventDetailsRequest>,
) -> Result<ApiResponse<EventWithDetails>, ApiError> {
    Ok(ApiResponse::ok(
        event_service(&state).update_details(id, request).await?,
    ))
}

/// DELETE /api/v1/events/:id
pub async fn delete_event(
    State(state): State<AppState>,
    _admin: AdminAuth,
    Path(id): Path<Uuid>,
) -> Result<ApiResponse<Message>, ApiError> {
    event_service(&state).delete(id).await?;
    Ok(ApiResponse::ok(Message::new("Event deleted")))
}
