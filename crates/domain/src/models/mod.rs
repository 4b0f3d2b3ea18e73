//! Domain models for EventDesk.

pub mod content;
pub mod event;
pub mod guest;
pub mod otp;
pub mod payment;
pub mod reminder;
pub mod review;
pub mod startup_candidate;
pub mod user;

pub use content::{TipsAndTricks, VideoLesson};
pub use event::{Event, EventDetails, EventWithDetails, NewEvent, NewEventDetails, RecencyFilter};
pub use guest::Guest;
pub use otp::OtpRecord;
pub use payment::{
    EventPayment, MemberFee, MemberPayment, MembershipStatus, Participation, UserParticipation,
};
pub use reminder::Reminder;
pub use review::Review;
pub use startup_candidate::{StartupCandidate, TeamMember};
pub use user::{User, UserRole};
