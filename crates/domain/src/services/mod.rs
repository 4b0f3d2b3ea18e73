//! Domain services for EventDesk.
//!
//! Services contain business logic that operates on domain models.

pub mod notification;
pub mod reconciliation;
pub mod schedule;
pub mod sms;

pub use notification::{BroadcastSummary, MockPushNotifier, PushMessage, PushNotifier, PushOutcome};
pub use reconciliation::{
    current_membership, days_remaining, membership_expiry, membership_status, participation,
    participation_percentage,
};
pub use schedule::{build_new_event, date_key, merge_details, validate_schedule, ScheduleError};
pub use sms::{MockSmsSender, SentSms, SmsError, SmsSender};
