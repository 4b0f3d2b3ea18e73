//! Event guest models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Attendee contact record for one event. Unique per (email, event).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGuestRequest {
    pub event_id: Uuid,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_request_validation() {
        let request = CreateGuestRequest {
            event_id: Uuid::new_v4(),
            name: "Ravi".to_string(),
            email: "a@b.com".to_string(),
            mobile: "9998887777".to_string(),
        };
        assert!(request.validate().is_ok());

        let request = CreateGuestRequest {
            name: String::new(),
            email: "not-an-email".to_string(),
            ..request
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_generated_contacts_validate() {
        use fake::faker::internet::en::SafeEmail;
        use fake::faker::name::en::Name;
        use fake::Fake;

        for _ in 0..20 {
            let request = CreateGuestRequest {
                event_id: Uuid::new_v4(),
                name: Name().fake(),
                email: SafeEmail().fake(),
                mobile: "9876543210".to_string(),
            };
            assert!(request.validate().is_ok(), "{:?}", request);
        }
    }
}
