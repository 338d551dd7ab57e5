//! Configuration schema for Fabula
//!
//! Configuration is stored at `~/.config/fabula/config.toml`, optionally
//! overridden by a `.fabula.toml` at the project root.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Content base and output locations
    pub paths: PathsConfig,

    /// Image generation settings
    pub generation: GenerationConfig,

    /// Terminal output settings
    pub ui: UiConfig,
}

impl Config {
    /// Rebase relative paths onto `base` (the project root once a local
    /// config file is found, the working directory otherwise).
    pub fn anchor_paths(&mut self, base: &Path) {
        if self.paths.content.is_relative() {
            self.paths.content = base.join(&self.paths.content);
        }
        if self.paths.output.is_relative() {
            self.paths.output = base.join(&self.paths.output);
        }
    }
}

/// Filesystem layout of the content base and the generated output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Root of the content base (pages/, characters/, locations/, ref/)
    pub content: PathBuf,

    /// Root of generated output (images/ pool and versions/)
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            content: PathBuf::from("."),
            output: PathBuf::from("out"),
        }
    }
}

impl PathsConfig {
    pub fn pages_dir(&self) -> PathBuf {
        self.content.join("pages")
    }

    pub fn characters_dir(&self) -> PathBuf {
        self.content.join("characters")
    }

    pub fn locations_dir(&self) -> PathBuf {
        self.content.join("locations")
    }

    pub fn refs_dir(&self) -> PathBuf {
        self.content.join("ref")
    }

    pub fn story_path(&self) -> PathBuf {
        self.content.join("story.yaml")
    }

    pub fn styles_path(&self) -> PathBuf {
        self.content.join("styles.yaml")
    }

    /// Shared content-addressed artifact pool
    pub fn pool_dir(&self) -> PathBuf {
        self.output.join("images")
    }

    /// Root of the numbered version directories
    pub fn versions_dir(&self) -> PathBuf {
        self.output.join("versions")
    }
}

/// Image generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Default style id (must exist in styles.yaml)
    pub style: Option<String>,

    /// Maximum in-flight generation calls
    pub workers: usize,

    /// Generation model identifier
    pub model: String,

    /// Fixed seed applied to every page (pages may override)
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            style: None,
            workers: 3,
            model: "gemini-3-pro-image-preview".to_string(),
            seed: None,
        }
    }
}

/// Terminal output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Disable interactive prompts and fancy output
    pub plain: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[paths]"));
        assert!(toml.contains("[generation]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.generation.workers, 3);
        assert_eq!(config.paths.output, PathBuf::from("out"));
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [generation]
            style = "watercolor"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.generation.style.as_deref(), Some("watercolor"));
        assert_eq!(config.generation.workers, 3); // default preserved
    }

    #[test]
    fn anchor_leaves_absolute_paths() {
        let mut config = Config::default();
        config.paths.output = PathBuf::from("/data/out");
        config.anchor_paths(Path::new("/project"));
        assert_eq!(config.paths.content, PathBuf::from("/project/."));
        assert_eq!(config.paths.output, PathBuf::from("/data/out"));
    }
}
