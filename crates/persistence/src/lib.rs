//! Persistence layer for EventDesk.
//!
//! This crate contains:
//! - Database connection management and unique-violation helpers
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - Query timing metrics

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
