use anyhow::Context;
use canopy_editor::Registry;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "canopy.config.json";

/// Canopy configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Component registry JSON, relative to the config's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,

    /// Maximum undo depth in `chat` (0 = unlimited)
    #[serde(default = "default_undo_levels")]
    pub undo_levels: usize,

    /// Keep before/after documents in session patch history
    #[serde(default = "default_snapshot_history")]
    pub snapshot_history: bool,

    /// Tracing filter used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_undo_levels() -> usize {
    100
}

fn default_snapshot_history() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load `path`, or `canopy.config.json` in `cwd`. A missing default
    /// file yields the defaults; a missing explicit file is an error.
    pub fn load(cwd: &str, path: Option<&Path>) -> anyhow::Result<Self> {
        let config_path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let default_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
                if !default_path.exists() {
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Cannot read config {}", config_path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config {}", config_path.display()))?;
        Ok(config)
    }

    /// The configured registry, loaded relative to `cwd`
    pub fn load_registry(&self, cwd: &str) -> anyhow::Result<Option<Registry>> {
        let Some(registry) = &self.registry else {
            return Ok(None);
        };
        let path = PathBuf::from(cwd).join(registry);
        let registry = Registry::load(&path)
            .with_context(|| format!("Cannot load registry {}", path.display()))?;
        Ok(Some(registry))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: None,
            undo_levels: default_undo_levels(),
            snapshot_history: default_snapshot_history(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "registry": "registry.json",
            "undoLevels": 20,
            "snapshotHistory": false,
            "logLevel": "debug"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.registry.as_deref(), Some("registry.json"));
        assert_eq!(config.undo_levels, 20);
        assert!(!config.snapshot_history);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.undo_levels, 100);
        assert!(config.snapshot_history);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "undoLevels": 5 }"#,
        )
        .unwrap();

        let cwd = dir.path().display().to_string();
        let config = Config::load(&cwd, None).unwrap();
        assert_eq!(config.undo_levels, 5);
    }

    #[test]
    fn test_missing_default_file_is_default() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().display().to_string();
        assert_eq!(Config::load(&cwd, None).unwrap(), Config::default());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let cwd = dir.path().display().to_string();
        let missing = dir.path().join("nope.json");
        assert!(Config::load(&cwd, Some(&missing)).is_err());
    }

    #[test]
    fn test_load_registry() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("registry.json"),
            r#"{ "components": { "Button": { "variants": ["solid", "ghost"] } } }"#,
        )
        .unwrap();
        let cwd = dir.path().display().to_string();

        let config = Config {
            registry: Some("registry.json".to_string()),
            ..Config::default()
        };
        let registry = config.load_registry(&cwd).unwrap().unwrap();
        assert_eq!(registry.components["Button"].variants, vec!["solid", "ghost"]);

        assert!(Config::default().load_registry(&cwd).unwrap().is_none());
    }
}
