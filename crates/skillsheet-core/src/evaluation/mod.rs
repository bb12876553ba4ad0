//! Skill-evaluation operations: course overview, evaluation upsert, and
//! student sheet assembly.

pub mod repository;
pub mod service;

pub use service::EvaluationService;
