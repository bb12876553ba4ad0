//! Shared domain types for Skillsheet.
//!
//! This crate contains the core domain types used across the service:
//! courses, skills, scales, evaluations, results, users, and their
//! associated error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod config;
pub mod course;
pub mod error;
pub mod ids;
pub mod result;
pub mod sheet;
pub mod skill;
pub mod user;
