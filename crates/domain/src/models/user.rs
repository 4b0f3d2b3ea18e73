//! User account domain models.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

/// Age below which a new account is registered as a student.
pub const STUDENT_AGE_LIMIT: u32 = 20;

/// Account role.
///
/// Students and jury members are assigned at registration from the derived age.
/// Admins are only ever created out-of-band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Jury,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Student => "student",
            UserRole::Jury => "jury",
            UserRole::Admin => "admin",
        }
    }

    /// Role assigned to a self-registered account of the given age.
    pub fn for_age(age: u32) -> Self {
        if age < STUDENT_AGE_LIMIT {
            UserRole::Student
        } else {
            UserRole::Jury
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "jury" => Ok(UserRole::Jury),
            "admin" => Ok(UserRole::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whole years between `date_of_birth` and `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    if date_of_birth >= today {
        return 0;
    }
    let mut years = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    years.max(0) as u32
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub mobile: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub role: UserRole,
    pub date_of_birth: Option<NaiveDate>,
    pub is_verified: bool,
    pub active: bool,
    #[serde(skip_serializing)]
    pub push_tokens: Vec<String>,
    #[serde(skip_serializing)]
    pub password_changed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Returns true if a token issued at `issued_at` (Unix seconds) predates
    /// the last password change.
    pub fn changed_password_after(&self, issued_at: i64) -> bool {
        match self.password_changed_at {
            Some(changed) => issued_at < changed.timestamp(),
            None => false,
        }
    }
}

/// Request payload for self-registration.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(custom(function = "shared::validation::validate_date"))]
    pub date_of_birth: String,
}

/// Request payload for password login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request payload for changing the caller's password.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Partial profile update.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(custom(function = "shared::validation::validate_mobile"))]
    pub mobile: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.mobile.is_none()
    }
}

/// Registers a device token for push notifications.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPushTokenRequest {
    #[validate(length(min = 1, max = 4096, message = "Token must be 1-4096 characters"))]
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            mobile: "9998887777".to_string(),
            password_hash: Some("secret_hash".to_string()),
            role: UserRole::Student,
            date_of_birth: Some(date(2008, 4, 2)),
            is_verified: false,
            active: true,
            push_tokens: vec!["device-token".to_string()],
            password_changed_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_role_for_age() {
        assert_eq!(UserRole::for_age(0), UserRole::Student);
        assert_eq!(UserRole::for_age(19), UserRole::Student);
        assert_eq!(UserRole::for_age(20), UserRole::Jury);
        assert_eq!(UserRole::for_age(65), UserRole::Jury);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [UserRole::Student, UserRole::Jury, UserRole::Admin] {
            assert_eq!(UserRole::from_str(role.as_str()).unwrap(), role);
        }
        assert_eq!(UserRole::from_str("ADMIN").unwrap(), UserRole::Admin);
        assert!(UserRole::from_str("organizer").is_err());
    }

    #[test]
    fn test_age_on_birthday_boundary() {
        let dob = date(2006, 10, 19);
        assert_eq!(age_on(dob, date(2026, 10, 18)), 19);
        assert_eq!(age_on(dob, date(2026, 10, 19)), 20);
    }

    #[test]
    fn test_age_on_future_birth_date() {
        assert_eq!(age_on(date(2030, 1, 1), date(2026, 1, 1)), 0);
    }

    #[test]
    fn test_changed_password_after() {
        let mut user = sample_user();
        assert!(!user.changed_password_after(0));

        let changed = Utc::now();
        user.password_changed_at = Some(changed);
        assert!(user.changed_password_after(changed.timestamp() - 10));
        assert!(!user.changed_password_after(changed.timestamp()));
        assert!(!user.changed_password_after(changed.timestamp() + 10));
    }

    #[test]
    fn test_user_secrets_not_serialized() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("secret_hash"));
        assert!(!json.contains("device-token"));
        assert!(json.contains("\"isVerified\":false"));
        assert!(json.contains("\"role\":\"student\""));
    }

    #[test]
    fn test_register_request_validation() {
        let request = RegisterUserRequest {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            mobile: "9998887777".to_string(),
            password: "password1".to_string(),
            date_of_birth: "2008-04-02".to_string(),
        };
        assert!(request.validate().is_ok());

        let bad = RegisterUserRequest {
            mobile: "12345".to_string(),
            date_of_birth: "someday".to_string(),
            ..request
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("mobile"));
        assert!(fields.contains_key("date_of_birth"));
    }

    #[test]
    fn test_update_request_is_empty() {
        assert!(UpdateUserRequest::default().is_empty());
        let request = UpdateUserRequest {
            name: Some("New".to_string()),
            ..Default::default()
        };
        assert!(!request.is_empty());
    }
}
