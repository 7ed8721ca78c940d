//! FlowConfig - injected feature flags and tuning
//!
//! Coordinators never read global settings. Everything that gates their
//! behavior arrives here, at construction time, through the flow
//! environment.

use crate::error::ConfigError;
use crate::navigation::NavigationLayout;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    /// Show the detail screen with a confirmation after joining a space.
    pub post_join_confirmation: bool,
    /// Gate for the roles & permissions flow.
    pub roles_enabled: bool,
    pub layout: NavigationLayout,
    /// Transitions kept per coordinator for debugging.
    pub history_limit: usize,
    /// Default animation flag for flow-initiated presentations.
    pub animated: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            post_join_confirmation: true,
            roles_enabled: true,
            layout: NavigationLayout::Stacked,
            history_limit: 64,
            animated: true,
        }
    }
}

impl FlowConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Apply `SPACEFLOW_LAYOUT` (`stacked` | `split`) when set.
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        match std::env::var("SPACEFLOW_LAYOUT") {
            Ok(value) => self.with_layout_str(&value),
            Err(_) => Ok(self),
        }
    }

    fn with_layout_str(mut self, value: &str) -> Result<Self, ConfigError> {
        self.layout = match value.trim().to_ascii_lowercase().as_str() {
            "stacked" | "stack" => NavigationLayout::Stacked,
            "split" => NavigationLayout::Split,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "SPACEFLOW_LAYOUT",
                    value: value.to_string(),
                });
            }
        };
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = FlowConfig::from_toml_str(
            r#"
            roles_enabled = false
            layout = "split"
            "#,
        )
        .unwrap();

        assert!(!config.roles_enabled);
        assert_eq!(config.layout, NavigationLayout::Split);
        assert!(config.post_join_confirmation);
        assert_eq!(config.history_limit, 64);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = FlowConfig::from_toml_str("layout = \"sideways\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "post_join_confirmation = false").unwrap();

        let config = FlowConfig::load(file.path()).unwrap();
        assert!(!config.post_join_confirmation);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = FlowConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_layout_override_values() {
        let config = FlowConfig::default().with_layout_str("Split").unwrap();
        assert_eq!(config.layout, NavigationLayout::Split);
        assert!(FlowConfig::default().with_layout_str("diagonal").is_err());
    }
}
