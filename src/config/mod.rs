//! Configuration management for Fabula

pub mod schema;

pub use schema::Config;

use crate::error::{FabulaError, FabulaResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Project-local config file discovered by walking up from the working directory
pub const LOCAL_CONFIG_NAME: &str = ".fabula.toml";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fabula")
            .join("config.toml")
    }

    /// Find a `.fabula.toml` in `start` or any of its ancestors
    pub fn find_local_config(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(LOCAL_CONFIG_NAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration, creating default if not exists
    pub async fn load(&self) -> FabulaResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file not found, using defaults");
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path).await
    }

    /// Load the global config merged under a project-local `.fabula.toml`.
    ///
    /// Relative paths are anchored to the local config's directory when one
    /// is found, to `start` otherwise.
    pub async fn load_merged(&self, start: &Path) -> FabulaResult<Config> {
        let mut value = if self.config_path.exists() {
            self.read_value(&self.config_path).await?
        } else {
            toml::Value::Table(toml::map::Map::new())
        };

        let anchor = match Self::find_local_config(start) {
            Some(local) => {
                debug!("Merging local config from {}", local.display());
                let overlay = self.read_value(&local).await?;
                merge_value(&mut value, overlay);
                local.parent().map(Path::to_path_buf).unwrap_or_default()
            }
            None => start.to_path_buf(),
        };

        let mut config: Config =
            value
                .try_into()
                .map_err(|e: toml::de::Error| FabulaError::ConfigInvalid {
                    path: self.config_path.clone(),
                    reason: e.to_string(),
                })?;
        config.anchor_paths(&anchor);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub async fn load_from_file(&self, path: &Path) -> FabulaResult<Config> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| FabulaError::io(format!("reading config from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| FabulaError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to file
    pub async fn save(&self, config: &Config) -> FabulaResult<()> {
        self.ensure_config_dir().await?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).await.map_err(|e| {
            FabulaError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    async fn ensure_config_dir(&self) -> FabulaResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| FabulaError::ConfigDirCreate {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    async fn read_value(&self, path: &Path) -> FabulaResult<toml::Value> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| FabulaError::io(format!("reading config from {}", path.display()), e))?;

        content.parse().map_err(|e: toml::de::Error| {
            FabulaError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Deep-merge `overlay` into `base`; overlay scalars win, tables merge
fn merge_value(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(slot) => merge_value(slot, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().await.unwrap();
        assert_eq!(config.generation.workers, 3);
    }

    #[tokio::test]
    async fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.generation.style = Some("ink".to_string());

        manager.save(&config).await.unwrap();
        let loaded = manager.load().await.unwrap();

        assert_eq!(loaded.generation.style.as_deref(), Some("ink"));
    }

    #[tokio::test]
    async fn local_config_overrides_global() {
        let temp = TempDir::new().unwrap();
        let global = temp.path().join("config.toml");
        std::fs::write(
            &global,
            "[generation]\nstyle = \"ink\"\nworkers = 5\n",
        )
        .unwrap();

        let project = temp.path().join("project");
        let nested = project.join("pages");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            project.join(LOCAL_CONFIG_NAME),
            "[generation]\nstyle = \"watercolor\"\n",
        )
        .unwrap();

        let manager = ConfigManager::with_path(global);
        let config = manager.load_merged(&nested).await.unwrap();

        // Local wins where set, global fills the rest
        assert_eq!(config.generation.style.as_deref(), Some("watercolor"));
        assert_eq!(config.generation.workers, 5);
        // Paths anchor to the local config's directory
        assert_eq!(config.paths.output, project.join("out"));
    }

    #[tokio::test]
    async fn merged_without_local_anchors_to_start() {
        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("missing.toml"));
        let config = manager.load_merged(temp.path()).await.unwrap();
        assert_eq!(config.paths.output, temp.path().join("out"));
    }

    #[test]
    fn find_local_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(temp.path().join(LOCAL_CONFIG_NAME), "").unwrap();

        let found = ConfigManager::find_local_config(&nested).unwrap();
        assert_eq!(found, temp.path().join(LOCAL_CONFIG_NAME));
    }
}
