//! Repository implementations for database operations.

pub mod content;
pub mod event;
pub mod guest;
pub mod otp;
pub mod payment;
pub mod reminder;
pub mod review;
pub mod startup_candidate;
pub mod user;

pub use content::ContentRepository;
pub use event::EventRepository;
pub use guest::GuestRepository;
pub use otp::OtpRepository;
pub use payment::{EventPaymentRepository, MemberFeeRepository, MemberPaymentRepository};
pub use reminder::ReminderRepository;
pub use review::ReviewRepository;
pub use startup_candidate::{NewStartupCandidate, StartupCandidateRepository};
pub use user::{NewUser, UserRepository};
