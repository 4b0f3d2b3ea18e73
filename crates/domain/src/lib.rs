//! Domain layer for EventDesk.
//!
//! This crate contains:
//! - Domain models and request payloads
//! - Business rules for scheduling, membership and participation
//! - Collaborator traits for SMS and push delivery

pub mod models;
pub mod services;
