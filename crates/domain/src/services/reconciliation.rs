//! Membership and participation rules.
//!
//! These functions are pure so the same rules apply to single lookups and
//! to the bulk listing computed in SQL.

use chrono::{DateTime, Months, NaiveDate, Utc};

use crate::models::{MemberPayment, MembershipStatus, Participation};

const SECONDS_PER_DAY: i64 = 86_400;

/// Months a membership payment stays valid.
pub const MEMBERSHIP_MONTHS: u32 = 12;

/// Expiry date for a membership paid on `today`: same calendar day next year,
/// clamped to the month end (Feb 29 maps to Feb 28).
pub fn membership_expiry(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_months(Months::new(MEMBERSHIP_MONTHS))
        .unwrap_or(NaiveDate::MAX)
}

/// Whole days left until `expire_date` (midnight UTC), rounded up.
pub fn days_remaining(expire_date: NaiveDate, now: DateTime<Utc>) -> i64 {
    let expires_at = expire_date.and_time(chrono::NaiveTime::MIN).and_utc();
    let seconds = (expires_at - now).num_seconds();
    if seconds <= 0 {
        return 0;
    }
    (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY
}

/// Picks the membership that currently applies.
///
/// Only active rows expiring after `today` qualify. The most recently created
/// wins; equal creation times fall back to the later expiry.
pub fn current_membership(payments: &[MemberPayment], today: NaiveDate) -> Option<&MemberPayment> {
    payments
        .iter()
        .filter(|p| p.is_active && p.expire_date > today)
        .max_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then(a.expire_date.cmp(&b.expire_date))
        })
}

/// Builds the membership answer for a user from their payment history.
pub fn membership_status(payments: &[MemberPayment], now: DateTime<Utc>) -> MembershipStatus {
    match current_membership(payments, now.date_naive()) {
        Some(payment) => {
            let days = days_remaining(payment.expire_date, now);
            MembershipStatus::active(payment.clone(), days)
        }
        None => MembershipStatus::none(),
    }
}

/// `round(attended / total * 100)`, half rounded up; 0 when there are no events.
pub fn participation_percentage(attended: i64, total: i64) -> i64 {
    if total <= 0 || attended <= 0 {
        return 0;
    }
    (200 * attended + total) / (2 * total)
}

pub fn participation(attended: i64, total_events: i64) -> Participation {
    Participation {
        attended,
        total_events,
        percentage: participation_percentage(attended, total_events),
    }
}
