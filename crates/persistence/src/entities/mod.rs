//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod content;
pub mod event;
pub mod guest;
pub mod otp;
pub mod payment;
pub mod reminder;
pub mod review;
pub mod startup_candidate;
pub mod user;

pub use content::{TipEntity, VideoLessonEntity};
pub use event::{EventDetailsEntity, EventEntity, EventWithDetailsEntity};
pub use guest::GuestEntity;
pub use otp::OtpEntity;
pub use payment::{EventPaymentEntity, MemberFeeEntity, MemberPaymentEntity};
pub use reminder::ReminderEntity;
pub use review::ReviewEntity;
pub use startup_candidate::StartupCandidateEntity;
pub use user::{UserEntity, UserParticipationEntity};
