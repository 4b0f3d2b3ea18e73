//! Event scheduling rules shared by every event write path.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::models::event::{
    CreateEventRequest, NewEvent, NewEventDetails, RecencyFilter, UpdateEventDetailsRequest,
};
use shared::validation::{is_allowed_video_link, parse_date};

/// A scheduling rule violation, reported against the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("{field} is not a valid date")]
    InvalidDate { field: &'static str },

    #[error("Event date must be in the future")]
    DateNotInFuture,

    #[error("Last registration date must be on or before the event date")]
    LastDateAfterDate,

    #[error("Video link host is not allowed: {0}")]
    VideoHostNotAllowed(String),

    #[error("Banner image is required")]
    MissingBanner,
}

impl ScheduleError {
    /// Request field the error is reported under.
    pub fn field(&self) -> &'static str {
        match self {
            ScheduleError::InvalidDate { field } => *field,
            ScheduleError::DateNotInFuture => "date",
            ScheduleError::LastDateAfterDate => "lastDate",
            ScheduleError::VideoHostNotAllowed(_) => "videoLinks",
            ScheduleError::MissingBanner => "banner",
        }
    }
}

/// Sortable `YYYYMMDD` key for a calendar date.
pub fn date_key(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month() * 100 + date.day())
}

impl RecencyFilter {
    /// Whether an event on `date` belongs in this listing as of `today`.
    pub fn matches(&self, date: NaiveDate, today: NaiveDate) -> bool {
        let (event, now) = (date_key(date), date_key(today));
        match self {
            RecencyFilter::Upcoming => event > now,
            RecencyFilter::Past => event < now,
            RecencyFilter::Today => event == now,
            RecencyFilter::All => true,
        }
    }
}

/// The event must lie strictly after `today` and registration must close on
/// or before it.
pub fn validate_schedule(
    date: NaiveDate,
    last_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ScheduleError> {
    if date_key(date) <= date_key(today) {
        return Err(ScheduleError::DateNotInFuture);
    }
    if last_date > date {
        return Err(ScheduleError::LastDateAfterDate);
    }
    Ok(())
}

pub fn validate_video_links<S: AsRef<str>>(
    links: &[String],
    allowed_hosts: &[S],
) -> Result<(), ScheduleError> {
    match links
        .iter()
        .find(|link| !is_allowed_video_link(link, allowed_hosts))
    {
        Some(link) => Err(ScheduleError::VideoHostNotAllowed(link.clone())),
        None => Ok(()),
    }
}

fn parse_field(value: &str, field: &'static str) -> Result<NaiveDate, ScheduleError> {
    parse_date(value).ok_or(ScheduleError::InvalidDate { field })
}

/// Validates details against the scheduling rules.
pub fn validate_details<S: AsRef<str>>(
    details: &NewEventDetails,
    today: NaiveDate,
    allowed_hosts: &[S],
) -> Result<(), ScheduleError> {
    if details.banner.trim().is_empty() {
        return Err(ScheduleError::MissingBanner);
    }
    validate_schedule(details.date, details.last_date, today)?;
    validate_video_links(&details.video_links, allowed_hosts)
}

/// Builds a validated [`NewEvent`] from a create request.
///
/// Field-level rules are checked by the request's `Validate` derive first;
/// this applies the cross-field scheduling rules.
pub fn build_new_event<S: AsRef<str>>(
    request: CreateEventRequest,
    today: NaiveDate,
    allowed_hosts: &[S],
) -> Result<NewEvent, ScheduleError> {
    let details = NewEventDetails {
        banner: request.banner.unwrap_or_default(),
        date: parse_field(&request.date, "date")?,
        time: request.time,
        location: request.location,
        description: request.description,
        video_links: request.video_links,
        prize: request.prize.filter(|p| !p.trim().is_empty()),
        last_date: parse_field(&request.last_date, "lastDate")?,
    };
    validate_details(&details, today, allowed_hosts)?;

    Ok(NewEvent {
        name: request.name,
        max_seats: request.max_seats,
        is_start_up_vapi_event: request.is_start_up_vapi_event,
        details,
    })
}

/// Applies a partial update to stored details and revalidates the result.
pub fn merge_details<S: AsRef<str>>(
    current: NewEventDetails,
    update: UpdateEventDetailsRequest,
    today: NaiveDate,
    allowed_hosts: &[S],
) -> Result<NewEventDetails, ScheduleError> {
    let merged = NewEventDetails {
        banner: update.banner.unwrap_or(current.banner),
        date: match update.date {
            Some(value) => parse_field(&value, "date")?,
            None => current.date,
        },
        time: update.time.unwrap_or(current.time),
        location: update.location.unwrap_or(current.location),
        description: update.description.unwrap_or(current.description),
        video_links: update.video_links.unwrap_or(current.video_links),
        prize: update.prize.or(current.prize),
        last_date: match update.last_date {
            Some(value) => parse_field(&value, "lastDate")?,
            None => current.last_date,
        },
    };
    validate_details(&merged, today, allowed_hosts)?;
    Ok(merged)
}
