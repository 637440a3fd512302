//! Session configuration
//!
//! Loaded from TOML; every field has a default.

use crate::error::{Error, Result};
use crate::logging::LogConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the command loop answers "Set breakpoint anyway?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmPolicy {
    /// Prompt on the terminal
    #[default]
    Ask,
    /// Always answer yes
    Always,
    /// Always answer no
    Never,
}

/// Debugger session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Re-read a cached source file when its modification time changes
    #[serde(default = "default_reload_source_on_change")]
    pub reload_source_on_change: bool,
    /// Answer for the unloadable-file and delete-all confirmations
    #[serde(default)]
    pub confirm_unloadable: ConfirmPolicy,
    /// Lines starting with this prefix are never stop points
    #[serde(default = "default_comment_prefix")]
    pub comment_prefix: String,
    /// Logging configuration
    #[serde(default)]
    pub logging: LogConfig,
}

fn default_reload_source_on_change() -> bool {
    true
}

fn default_comment_prefix() -> String {
    "#".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reload_source_on_change: default_reload_source_on_change(),
            confirm_unloadable: ConfirmPolicy::default(),
            comment_prefix: default_comment_prefix(),
            logging: LogConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();
        assert!(config.reload_source_on_change);
        assert_eq!(config.confirm_unloadable, ConfirmPolicy::Ask);
        assert_eq!(config.comment_prefix, "#");
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
            reload_source_on_change = false
            confirm_unloadable = "never"
            comment_prefix = "//"

            [logging]
            level = "debug"
        "#;
        let config = SessionConfig::from_toml(toml).unwrap();
        assert!(!config.reload_source_on_change);
        assert_eq!(config.confirm_unloadable, ConfirmPolicy::Never);
        assert_eq!(config.comment_prefix, "//");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_from_toml_rejects_unknown_policy() {
        let err = SessionConfig::from_toml("confirm_unloadable = \"maybe\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "confirm_unloadable = \"always\"").unwrap();
        let config = SessionConfig::from_file(file.path()).unwrap();
        assert_eq!(config.confirm_unloadable, ConfirmPolicy::Always);
    }

    #[test]
    fn test_from_missing_file() {
        let err = SessionConfig::from_file("/nonexistent/snare.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
