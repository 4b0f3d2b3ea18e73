//! Event creation and maintenance.
//!
//! There is one create operation. The multipart form (banner uploaded in the
//! same request) and the JSON body (banner uploaded beforehand) both end up in
//! [`EventService::create`] and go through the same field and schedule rules.

use axum::body::Bytes;
use chrono::Utc;
use domain::models::event::{
    CreateEventRequest, UpdateEventDetailsRequest, UpdateEventRequest,
};
use domain::models::{EventWithDetails, NewEventDetails, RecencyFilter};
use domain::services::schedule::validate_video_links;
use domain::services::{build_new_event, merge_details, validate_schedule, ScheduleError};
use persistence::repositories::EventRepository;
use shared::validation::parse_date;
use sqlx::PgPool;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::ApiError;
use crate::services::media::{MediaError, MediaKind, MediaStore};

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    Schedule(#[from] ScheduleError),

    #[error("{message}")]
    InvalidField { field: String, message: String },

    #[error("Banner error: {0}")]
    Banner(MediaError),

    #[error("Event not found")]
    NotFound,

    #[error("Event details not found")]
    DetailsNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<EventError> for ApiError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::Validation(e) => e.into(),
            EventError::Schedule(e) => e.into(),
            EventError::InvalidField { field, message } => ApiError::field(&field, message),
            EventError::Banner(e) => e.for_field("banner"),
            EventError::NotFound | EventError::DetailsNotFound => {
                ApiError::NotFound(err.to_string())
            }
            EventError::Database(e) => e.into(),
        }
    }
}

/// A banner file carried in the same request as the event fields.
#[derive(Debug, Clone)]
pub struct BannerUpload {
    pub content_type: Option<String>,
    pub file_name: Option<String>,
    pub data: Bytes,
}

/// Text parts of a multipart event form, keyed by part name.
#[derive(Debug, Default)]
pub struct EventForm {
    fields: HashMap<String, String>,
    video_links: Vec<String>,
}

impl EventForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a text part. `videoLinks` may repeat or hold a comma separated
    /// or JSON array value.
    pub fn insert(&mut self, name: &str, value: String) {
        if name == "videoLinks" || name == "videoLinks[]" {
            self.video_links.extend(split_links(&value));
        } else {
            self.fields.insert(name.to_string(), value);
        }
    }

    fn text(&self, name: &str) -> String {
        self.fields.get(name).cloned().unwrap_or_default()
    }

    fn optional(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Converts the form into the same request the JSON body decodes into.
    pub fn into_request(self) -> Result<CreateEventRequest, EventError> {
        let max_seats = match self.optional("maxSeats") {
            Some(value) => value.parse::<i32>().map_err(|_| EventError::InvalidField {
                field: "maxSeats".to_string(),
                message: "Max seats must be a whole number".to_string(),
            })?,
            None => {
                return Err(EventError::InvalidField {
                    field: "maxSeats".to_string(),
                    message: "maxSeats is required".to_string(),
                })
            }
        };

        let is_start_up_vapi_event = match self.optional("isStartUpVapiEvent") {
            Some(value) => parse_flag(&value).ok_or_else(|| EventError::InvalidField {
                field: "isStartUpVapiEvent".to_string(),
                message: "isStartUpVapiEvent must be true or false".to_string(),
            })?,
            None => false,
        };

        Ok(CreateEventRequest {
            name: self.text("name"),
            max_seats,
            is_start_up_vapi_event,
            banner: None,
            date: self.text("date"),
            time: self.text("time"),
            location: self.text("location"),
            description: self.text("description"),
            prize: self.optional("prize"),
            last_date: self.text("lastDate"),
            video_links: self.video_links,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_links(value: &str) -> Vec<String> {
    let value = value.trim();
    if value.starts_with('[') {
        if let Ok(links) = serde_json::from_str::<Vec<String>>(value) {
            return links;
        }
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct EventService {
    events: EventRepository,
    media: MediaStore,
    video_hosts: Vec<String>,
}

impl EventService {
    pub fn new(pool: PgPool, media: MediaStore, video_hosts: Vec<String>) -> Self {
        Self {
            events: EventRepository::new(pool),
            media,
            video_hosts,
        }
    }

    /// Creates an event with its details.
    ///
    /// With an upload the banner is stored first and removed again if any
    /// later step fails. Without one, `request.banner` must name a file the
    /// media store already holds.
    pub async fn create(
        &self,
        mut request: CreateEventRequest,
        upload: Option<BannerUpload>,
    ) -> Result<EventWithDetails, EventError> {
        request.validate()?;
        // Reject bad schedules before touching the media store.
        self.check_schedule(&request)?;

        let uploaded = match upload {
            Some(upload) => {
                let stored = self
                    .media
                    .store(
                        MediaKind::Image,
                        upload.content_type.as_deref(),
                        upload.file_name.as_deref(),
                        upload.data,
                    )
                    .await
                    .map_err(EventError::Banner)?;
                request.banner = Some(stored.filename.clone());
                Some(stored.filename)
            }
            None => {
                match request.banner.as_deref().map(str::trim) {
                    Some(name) if !name.is_empty() => {
                        self.media
                            .ensure_exists(MediaKind::Image, name)
                            .await
                            .map_err(EventError::Banner)?;
                    }
                    _ => return Err(ScheduleError::MissingBanner.into()),
                }
                None
            }
        };

        let result = self.insert(request).await;
        if result.is_err() {
            if let Some(filename) = uploaded {
                if let Err(e) = self.media.remove(&filename).await {
                    warn!(filename = %filename, error = %e, "Failed to remove orphaned banner");
                }
            }
        }
        result
    }

    fn check_schedule(&self, request: &CreateEventRequest) -> Result<(), ScheduleError> {
        let date = parse_date(&request.date).ok_or(ScheduleError::InvalidDate { field: "date" })?;
        let last_date = parse_date(&request.last_date)
            .ok_or(ScheduleError::InvalidDate { field: "lastDate" })?;
        validate_schedule(date, last_date, Utc::now().date_naive())?;
        validate_video_links(&request.video_links, &self.video_hosts)
    }

    async fn insert(&self, request: CreateEventRequest) -> Result<EventWithDetails, EventError> {
        let today = Utc::now().date_naive();
        let new_event = build_new_event(request, today, &self.video_hosts)?;
        let (event, details) = self.events.create(&new_event).await?;

        info!(event_id = %event.id, name = %event.name, date = %details.date, "Event created");
        Ok(EventWithDetails {
            event: event.into(),
            details: Some(details.into()),
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<EventWithDetails, EventError> {
        self.events
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or(EventError::NotFound)
    }

    /// Events matching `filter` as of today. Events without details only
    /// appear in the unfiltered listing.
    pub async fn list(&self, filter: RecencyFilter) -> Result<Vec<EventWithDetails>, EventError> {
        let today = Utc::now().date_naive();
        Ok(self
            .events
            .list()
            .await?
            .into_iter()
            .map(EventWithDetails::from)
            .filter(|event| match &event.details {
                Some(details) => filter.matches(details.date, today),
                None => filter == RecencyFilter::All,
            })
            .collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateEventRequest,
    ) -> Result<EventWithDetails, EventError> {
        request.validate()?;
        self.events
            .update(
                id,
                request.name.as_deref().map(str::trim),
                request.max_seats,
                request.is_start_up_vapi_event,
            )
            .await?
            .ok_or(EventError::NotFound)?;

        info!(event_id = %id, "Event updated");
        self.get(id).await
    }

    /// Merges a partial update into the stored details and revalidates the
    /// whole set with the create rules.
    pub async fn update_details(
        &self,
        id: Uuid,
        request: UpdateEventDetailsRequest,
    ) -> Result<EventWithDetails, EventError> {
        request.validate()?;
        if !self.events.exists(id).await? {
            return Err(EventError::NotFound);
        }
        let current: NewEventDetails = domain::models::EventDetails::from(
            self.events
                .find_details(id)
                .await?
                .ok_or(EventError::DetailsNotFound)?,
        )
        .into();

        if let Some(banner) = request.banner.as_deref() {
            if banner != current.banner {
                self.media
                    .ensure_exists(MediaKind::Image, banner)
                    .await
                    .map_err(EventError::Banner)?;
            }
        }

        let merged = merge_details(
            current,
            request,
            Utc::now().date_naive(),
            &self.video_hosts,
        )?;
        self.events
            .replace_details(id, &merged)
            .await?
            .ok_or(EventError::DetailsNotFound)?;

        info!(event_id = %id, "Event details updated");
        self.get(id).await
    }

    /// Hard delete. Payments, guests and reviews referencing the event stay.
    pub async fn delete(&self, id: Uuid) -> Result<(), EventError> {
        let existing = self.get(id).await?;
        if !self.events.delete(id).await? {
            return Err(EventError::NotFound);
        }
        if let Some(details) = existing.details {
            if let Err(e) = self.media.remove(&details.banner).await {
                warn!(event_id = %id, error = %e, "Failed to remove banner of deleted event");
            }
        }
        info!(event_id = %id, "Event deleted");
        Ok(())
    }
}
