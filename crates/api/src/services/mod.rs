//! Application services and external provider integrations.

pub mod admin_bootstrap;
pub mod auth;
pub mod cookies;
pub mod events;
pub mod fcm;
pub mod media;
pub mod notifications;
pub mod otp;
pub mod reconciliation;
pub mod sms;

pub use auth::AuthService;
pub use cookies::CookieHelper;
pub use events::EventService;
pub use media::MediaStore;
pub use notifications::NotificationService;
pub use otp::OtpService;
pub use reconciliation::ReconciliationService;
