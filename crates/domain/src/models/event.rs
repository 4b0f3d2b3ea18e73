//! Event and event details domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// The lightweight event record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub max_seats: i32,
    pub is_start_up_vapi_event: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rich extension of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub id: Uuid,
    pub event_id: Uuid,
    pub banner: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub description: String,
    pub video_links: Vec<String>,
    pub prize: Option<String>,
    pub last_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event joined with its details for read responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventWithDetails {
    #[serde(flatten)]
    pub event: Event,
    pub details: Option<EventDetails>,
}

/// Request payload for creating an event with its details.
///
/// The multipart form and the JSON body both decode into this shape. For the
/// JSON body `banner` carries a filename returned by the media upload route;
/// for the multipart form it is filled from the stored `banner` file part.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(range(min = 1, message = "Max seats must be at least 1"))]
    pub max_seats: i32,

    #[serde(default)]
    pub is_start_up_vapi_event: bool,

    pub banner: Option<String>,

    #[validate(custom(function = "shared::validation::validate_date"))]
    pub date: String,

    #[validate(length(min = 1, max = 50, message = "Time must be 1-50 characters"))]
    pub time: String,

    #[validate(length(min = 1, max = 300, message = "Location must be 1-300 characters"))]
    pub location: String,

    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: String,

    #[serde(default)]
    pub video_links: Vec<String>,

    #[validate(length(max = 500, message = "Prize must be at most 500 characters"))]
    pub prize: Option<String>,

    #[validate(custom(function = "shared::validation::validate_date"))]
    pub last_date: String,
}

/// Partial update of the event record.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: Option<String>,

    #[validate(range(min = 1, message = "Max seats must be at least 1"))]
    pub max_seats: Option<i32>,

    pub is_start_up_vapi_event: Option<bool>,
}

/// Partial update of event details; the merged result is revalidated.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventDetailsRequest {
    pub banner: Option<String>,

    #[validate(custom(function = "shared::validation::validate_date"))]
    pub date: Option<String>,

    #[validate(length(min = 1, max = 50, message = "Time must be 1-50 characters"))]
    pub time: Option<String>,

    #[validate(length(min = 1, max = 300, message = "Location must be 1-300 characters"))]
    pub location: Option<String>,

    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: Option<String>,

    pub video_links: Option<Vec<String>>,

    #[validate(length(max = 500, message = "Prize must be at most 500 characters"))]
    pub prize: Option<String>,

    #[validate(custom(function = "shared::validation::validate_date"))]
    pub last_date: Option<String>,
}

/// Fully validated input for inserting an event and its details.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub max_seats: i32,
    pub is_start_up_vapi_event: bool,
    pub details: NewEventDetails,
}

/// Fully validated event details.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEventDetails {
    pub banner: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub description: String,
    pub video_links: Vec<String>,
    pub prize: Option<String>,
    pub last_date: NaiveDate,
}

impl From<EventDetails> for NewEventDetails {
    fn from(details: EventDetails) -> Self {
        Self {
            banner: details.banner,
            date: details.date,
            time: details.time,
            location: details.location,
            description: details.description,
            video_links: details.video_links,
            prize: details.prize,
            last_date: details.last_date,
        }
    }
}

/// Recency filter for event listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecencyFilter {
    Upcoming,
    Past,
    Today,
    #[default]
    All,
}

impl FromStr for RecencyFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "upcoming" => Ok(RecencyFilter::Upcoming),
            "past" => Ok(RecencyFilter::Past),
            "today" => Ok(RecencyFilter::Today),
            "all" => Ok(RecencyFilter::All),
            _ => Err(format!("Invalid filter: {}", s)),
        }
    }
}

/// Query parameters for event listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEventsQuery {
    #[serde(default)]
    pub filter: RecencyFilter,
}
