//! Event reminder models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// A reminder a user set for an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub remind_at: DateTime<Utc>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReminderRequest {
    pub event_id: Uuid,

    #[validate(custom(function = "validate_future_instant"))]
    pub remind_at: DateTime<Utc>,

    #[validate(length(max = 500, message = "Note must be at most 500 characters"))]
    pub note: Option<String>,
}

fn validate_future_instant(instant: &DateTime<Utc>) -> Result<(), ValidationError> {
    if *instant <= Utc::now() {
        let mut err = ValidationError::new("future");
        err.message = Some("Reminder time must be in the future".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_remind_at_must_be_future() {
        let request = CreateReminderRequest {
            event_id: Uuid::new_v4(),
            remind_at: Utc::now() - Duration::minutes(1),
            note: None,
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("remind_at"));

        let request = CreateReminderRequest {
            remind_at: Utc::now() + Duration::hours(2),
            ..request
        };
        assert!(request.validate().is_ok());
    }
}
