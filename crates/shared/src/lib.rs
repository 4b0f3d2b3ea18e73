//! Shared utilities and common types for the EventDesk backend.
//!
//! This crate provides stateless helpers used across the other crates:
//! - Password hashing with Argon2id
//! - Signed session tokens
//! - One-time password generation
//! - Field validators shared by request payloads

pub mod crypto;
pub mod jwt;
pub mod otp;
pub mod password;
pub mod validation;
