//! Registration and payment reconciliation.
//!
//! A user pays for an event at most once and a payment reference is spent at
//! most once. The lookups before each insert only give a friendlier early
//! answer; the named unique indexes decide, and a violation on them maps to
//! the same duplicate error as the lookup.

use chrono::Utc;
use domain::models::payment::CreateMemberPaymentRequest;
use domain::models::{EventPayment, MemberPayment, MembershipStatus, Participation, UserParticipation};
use domain::services::{membership_expiry, membership_status, participation};
use persistence::db::{constraints, violates};
use persistence::repositories::{
    EventPaymentRepository, EventRepository, MemberFeeRepository, MemberPaymentRepository,
    UserRepository,
};
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::metrics::record_payment;

#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("Payment already exists for this user and event")]
    DuplicatePayment,

    #[error("This payment reference has already been used")]
    DuplicatePaymentReference,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("User not found")]
    UserNotFound,

    #[error("Event not found")]
    EventNotFound,

    #[error("Membership fee not found")]
    FeeNotFound,

    #[error("Payment not found")]
    PaymentNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ReconciliationError> for ApiError {
    fn from(err: ReconciliationError) -> Self {
        match err {
            ReconciliationError::DuplicatePayment
            | ReconciliationError::DuplicatePaymentReference => ApiError::Duplicate(err.to_string()),
            ReconciliationError::MissingField(field) => ApiError::missing_field(field),
            ReconciliationError::UserNotFound
            | ReconciliationError::EventNotFound
            | ReconciliationError::FeeNotFound
            | ReconciliationError::PaymentNotFound => ApiError::NotFound(err.to_string()),
            ReconciliationError::Database(e) => e.into(),
        }
    }
}

pub struct ReconciliationService {
    users: UserRepository,
    events: EventRepository,
    event_payments: EventPaymentRepository,
    member_fees: MemberFeeRepository,
    member_payments: MemberPaymentRepository,
}

impl ReconciliationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            event_payments: EventPaymentRepository::new(pool.clone()),
            member_fees: MemberFeeRepository::new(pool.clone()),
            member_payments: MemberPaymentRepository::new(pool),
        }
    }

    async fn ensure_user(&self, user_id: Uuid) -> Result<(), ReconciliationError> {
        match self.users.find_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(ReconciliationError::UserNotFound),
        }
    }

    pub async fn create_event_payment(
        &self,
        user_id: Uuid,
        event_id: Uuid,
        payment_id: &str,
    ) -> Result<EventPayment, ReconciliationError> {
        self.ensure_user(user_id).await?;
        if !self.events.exists(event_id).await? {
            return Err(ReconciliationError::EventNotFound);
        }

        if self
            .event_payments
            .find_by_user_event(user_id, event_id)
            .await?
            .is_some()
        {
            record_payment("event", "duplicate");
            return Err(ReconciliationError::DuplicatePayment);
        }

        let payment = self
            .event_payments
            .create(user_id, event_id, payment_id.trim())
            .await
            .map_err(|e| {
                if violates(&e, constraints::EVENT_PAYMENTS_USER_EVENT) {
                    record_payment("event", "duplicate");
                    ReconciliationError::DuplicatePayment
                } else {
                    ReconciliationError::Database(e)
                }
            })?;

        record_payment("event", "created");
        info!(
            payment_id = %payment.id,
            user_id = %user_id,
            event_id = %event_id,
            "Event payment recorded"
        );
        Ok(payment.into())
    }

    /// Marks a payment inactive; the row is kept for the audit trail.
    pub async fn revoke_event_payment(&self, id: Uuid) -> Result<EventPayment, ReconciliationError> {
        let payment = self
            .event_payments
            .deactivate(id)
            .await?
            .ok_or(ReconciliationError::PaymentNotFound)?;
        info!(payment_id = %id, "Event payment revoked");
        Ok(payment.into())
    }

    pub async fn list_event_payments_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<EventPayment>, ReconciliationError> {
        Ok(self
            .event_payments
            .list_for_user(user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub async fn list_event_payments_for_event(
        &self,
        event_id: Uuid,
    ) -> Result<Vec<EventPayment>, ReconciliationError> {
        if !self.events.exists(event_id).await? {
            return Err(ReconciliationError::EventNotFound);
        }
        Ok(self
            .event_payments
            .list_for_event(event_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Records a membership payment valid for one year from today.
    pub async fn create_member_payment(
        &self,
        request: &CreateMemberPaymentRequest,
    ) -> Result<MemberPayment, ReconciliationError> {
        if let Some(field) = request.missing_field() {
            return Err(ReconciliationError::MissingField(field));
        }
        let (Some(user_id), Some(fee_id), Some(reference)) = (
            request.user_id,
            request.member_fees_id,
            request.payment_id.as_deref().map(str::trim),
        ) else {
            return Err(ReconciliationError::MissingField("paymentId"));
        };

        self.ensure_user(user_id).await?;
        if self.member_fees.find_by_id(fee_id).await?.is_none() {
            return Err(ReconciliationError::FeeNotFound);
        }

        if self.member_payments.find_by_reference(reference).await?.is_some() {
            record_payment("member", "duplicate");
            return Err(ReconciliationError::DuplicatePaymentReference);
        }

        let expire_date = membership_expiry(Utc::now().date_naive());
        let payment = self
            .member_payments
            .create(user_id, fee_id, reference, expire_date)
            .await
            .map_err(|e| {
                if violates(&e, constraints::MEMBER_PAYMENTS_REFERENCE) {
                    record_payment("member", "duplicate");
                    ReconciliationError::DuplicatePaymentReference
                } else {
                    ReconciliationError::Database(e)
                }
            })?;

        record_payment("member", "created");
        info!(
            payment_id = %payment.id,
            user_id = %user_id,
            expire_date = %expire_date,
            "Membership payment recorded"
        );
        Ok(payment.into())
    }

    pub async fn list_member_payments_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<MemberPayment>, ReconciliationError> {
        Ok(self
            .member_payments
            .list_for_user(user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Absence of a qualifying payment is a normal answer, not an error.
    pub async fn check_membership_status(
        &self,
        user_id: Uuid,
    ) -> Result<MembershipStatus, ReconciliationError> {
        let payments = self.list_member_payments_for_user(user_id).await?;
        Ok(membership_status(&payments, Utc::now()))
    }

    pub async fn compute_participation(
        &self,
        user_id: Uuid,
    ) -> Result<Participation, ReconciliationError> {
        self.ensure_user(user_id).await?;
        let (attended, total) = self.users.participation_counts(user_id).await?;
        Ok(participation(attended, total))
    }

    /// Every active non-admin user with participation, from one grouped query.
    pub async fn aggregate_user_participation(
        &self,
    ) -> Result<Vec<UserParticipation>, ReconciliationError> {
        Ok(self
            .users
            .list_with_participation()
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_errors_share_status() {
        for err in [
            ReconciliationError::DuplicatePayment,
            ReconciliationError::DuplicatePaymentReference,
        ] {
            assert!(matches!(ApiError::from(err), ApiError::Duplicate(_)));
        }
    }

    #[test]
    fn test_missing_field_names_field() {
        match ApiError::from(ReconciliationError::MissingField("memberFeesId")) {
            ApiError::Validation { message, details } => {
                assert_eq!(message, "memberFeesId is required");
                assert_eq!(details[0].field, "memberFeesId");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_not_found_variants() {
        for err in [
            ReconciliationError::UserNotFound,
            ReconciliationError::EventNotFound,
            ReconciliationError::FeeNotFound,
            ReconciliationError::PaymentNotFound,
        ] {
            assert!(matches!(ApiError::from(err), ApiError::NotFound(_)));
        }
    }
}
