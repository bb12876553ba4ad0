use serde::{Deserialize, Serialize};

/// Application configuration, loaded from `config.toml` in the data
/// directory. Every field has a default so a missing file means defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// When true, teachers may edit a student's overall result regardless
    /// of the `enrollments.edit` capability.
    pub teachers_can_edit_result: bool,
}
