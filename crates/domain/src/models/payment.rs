//! Event payments, membership fees and membership payments.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::User;

/// A user's payment for one event. At most one per (user, event).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub payment_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for recording an event payment.
///
/// `userId` defaults to the caller; only admins may name another user.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventPaymentRequest {
    pub user_id: Option<Uuid>,

    pub event_id: Uuid,

    #[validate(
        length(min = 1, max = 255, message = "Payment ID must be 1-255 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub payment_id: String,
}

/// A membership fee plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberFee {
    pub id: Uuid,
    pub title: String,
    /// Amount in minor currency units.
    pub amount: i64,
    pub description: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberFeeRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(range(min = 1, message = "Amount must be positive"))]
    pub amount: i64,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,
}

/// A membership payment, valid until `expire_date`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberPayment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub member_fees_id: Uuid,
    pub payment_id: String,
    pub expire_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for recording a membership payment.
///
/// All three identifiers are required; absence is reported as a missing
/// field rather than a decode failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemberPaymentRequest {
    pub user_id: Option<Uuid>,
    pub member_fees_id: Option<Uuid>,
    pub payment_id: Option<String>,
}

impl CreateMemberPaymentRequest {
    /// Returns the first absent identifier, in declaration order.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.user_id.is_none() {
            return Some("userId");
        }
        if self.member_fees_id.is_none() {
            return Some("memberFeesId");
        }
        match self.payment_id.as_deref().map(str::trim) {
            None | Some("") => Some("paymentId"),
            Some(_) => None,
        }
    }
}

/// Answer to "does this user hold a valid membership right now".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipStatus {
    pub active: bool,
    pub membership: Option<MemberPayment>,
    pub days_remaining: Option<i64>,
    pub message: String,
}

impl MembershipStatus {
    pub fn none() -> Self {
        Self {
            active: false,
            membership: None,
            days_remaining: None,
            message: "No active membership".to_string(),
        }
    }

    pub fn active(membership: MemberPayment, days_remaining: i64) -> Self {
        let message = if days_remaining == 1 {
            "1 day remaining".to_string()
        } else {
            format!("{} days remaining", days_remaining)
        };
        Self {
            active: true,
            membership: Some(membership),
            days_remaining: Some(days_remaining),
            message,
        }
    }
}

/// Attendance ratio for a single user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub attended: i64,
    pub total_events: i64,
    pub percentage: i64,
}

/// A user row in the admin listing, with attendance attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserParticipation {
    #[serde(flatten)]
    pub user: User,
    pub participation: Participation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_order() {
        let mut request = CreateMemberPaymentRequest::default();
        assert_eq!(request.missing_field(), Some("userId"));

        request.user_id = Some(Uuid::new_v4());
        assert_eq!(request.missing_field(), Some("memberFeesId"));

        request.member_fees_id = Some(Uuid::new_v4());
        assert_eq!(request.missing_field(), Some("paymentId"));

        request.payment_id = Some("   ".to_string());
        assert_eq!(request.missing_field(), Some("paymentId"));

        request.payment_id = Some("pay_123".to_string());
        assert_eq!(request.missing_field(), None);
    }

    #[test]
    fn test_event_payment_reference_not_blank() {
        let request = CreateEventPaymentRequest {
            user_id: None,
            event_id: Uuid::new_v4(),
            payment_id: "   ".to_string(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("payment_id"));

        let request = CreateEventPaymentRequest {
            payment_id: "pay_123".to_string(),
            ..request
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_member_payment_request_accepts_partial_json() {
        let request: CreateMemberPaymentRequest =
            serde_json::from_value(serde_json::json!({ "paymentId": "pay_1" })).unwrap();
        assert!(request.user_id.is_none());
        assert_eq!(request.payment_id.as_deref(), Some("pay_1"));
    }

    #[test]
    fn test_membership_status_messages() {
        let none = MembershipStatus::none();
        assert!(!none.active);
        assert!(none.membership.is_none());

        let payment = MemberPayment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            member_fees_id: Uuid::new_v4(),
            payment_id: "pay_1".to_string(),
            expire_date: NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(MembershipStatus::active(payment.clone(), 1).message, "1 day remaining");
        let status = MembershipStatus::active(payment, 42);
        assert_eq!(status.message, "42 days remaining");
        assert_eq!(status.days_remaining, Some(42));
    }

    #[test]
    fn test_member_fee_amount_positive() {
        let request = CreateMemberFeeRequest {
            title: "Annual".to_string(),
            amount: 0,
            description: None,
        };
        assert!(request.validate().is_err());
    }
}
