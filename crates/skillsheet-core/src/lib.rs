//! Business logic and repository trait definitions for Skillsheet.
//!
//! This crate defines the "ports" (repository traits) that the
//! infrastructure layer implements, the authorization gate, and the
//! evaluation service carrying the three operations. It depends only on
//! `skillsheet-types` -- never on `skillsheet-infra` or any database/IO
//! crate.

pub mod authz;
pub mod evaluation;
