//! HTTP route handlers.

pub mod auth;
pub mod content;
pub mod event_payments;
pub mod events;
pub mod guests;
pub mod health;
pub mod media;
pub mod member_fees;
pub mod member_payments;
pub mod notifications;
pub mod reminders;
pub mod reviews;
pub mod startup_candidates;
pub mod users;
