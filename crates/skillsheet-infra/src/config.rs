//! Configuration loader for Skillsheet.
//!
//! Reads `config.toml` from the data directory (`~/.skillsheet/` in
//! production) and deserializes it into [`AppConfig`]. Falls back to
//! defaults when the file is missing or malformed.

use std::path::{Path, PathBuf};

use skillsheet_types::config::AppConfig;

/// Resolve the data directory: `SKILLSHEET_DATA_DIR` if set, otherwise
/// `~/.skillsheet`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SKILLSHEET_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".skillsheet")
}

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`AppConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_config(data_dir: &Path) -> AppConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(
                "No config.toml found at {}, using defaults",
                config_path.display()
            );
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!(
                "Failed to read {}: {err}, using defaults",
                config_path.display()
            );
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            AppConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert!(!config.teachers_can_edit_result);
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            "teachers_can_edit_result = true\n",
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert!(config.teachers_can_edit_result);
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert!(!config.teachers_can_edit_result);
    }

    #[test]
    fn resolve_data_dir_honors_env_override() {
        unsafe {
            std::env::set_var("SKILLSHEET_DATA_DIR", "/tmp/skillsheet-test");
        }
        let dir = resolve_data_dir();
        unsafe {
            std::env::remove_var("SKILLSHEET_DATA_DIR");
        }
        assert_eq!(dir, PathBuf::from("/tmp/skillsheet-test"));
    }
}
