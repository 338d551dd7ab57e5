//! Error types for Fabula
//!
//! All modules use `FabulaResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Fabula operations
pub type FabulaResult<T> = Result<T, FabulaError>;

/// All errors that can occur in Fabula
#[derive(Error, Debug)]
pub enum FabulaError {
    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("GEMINI_API_KEY is not set")]
    ApiKeyMissing,

    #[error("No style configured. Pass --style or set generation.style")]
    StyleMissing,

    #[error("Unknown style: {style} (available: {available})")]
    UnknownStyle { style: String, available: String },

    // Content errors
    #[error("Content directory not found: {0}")]
    ContentDirNotFound(PathBuf),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Character not found: {0}")]
    CharacterNotFound(String),

    #[error("Invalid content file {path}: {reason}")]
    ContentInvalid { path: PathBuf, reason: String },

    #[error("Too many reference images for {page}: {count} (the model accepts at most {max})")]
    TooManyRefs {
        page: String,
        count: usize,
        max: usize,
    },

    #[error("Failed to parse {path}: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    // Version store errors
    #[error("No versions exist yet")]
    NoVersions,

    #[error("Version {0} not found")]
    VersionNotFound(u32),

    #[error("A message is required to create the first version")]
    MessageRequired,

    #[error("{count} page(s) changed since version {latest} ({preview}); a new version requires a message")]
    VersionStale {
        latest: u32,
        count: usize,
        preview: String,
    },

    #[error("No image recorded in version {version} for {pages}")]
    ImageMissing { version: u32, pages: String },

    // Generation errors
    #[error("Generation API returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Unexpected API response: {0}")]
    ApiResponse(String),

    #[error("Generation request failed: {0}")]
    ApiTransport(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command execution error: {command}, stderr: {stderr}")]
    CommandExecution { command: String, stderr: String },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("{0}")]
    User(String),
}

impl FabulaError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a YAML parse error with file context
    pub fn yaml(path: impl Into<PathBuf>, source: serde_yaml::Error) -> Self {
        Self::YamlParse {
            path: path.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create a command execution error
    pub fn command_exec(command: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self::CommandExecution {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ApiKeyMissing => Some("Run: export GEMINI_API_KEY=<your key>"),
            Self::StyleMissing => Some("Run: fabula config set generation.style <id>"),
            Self::UnknownStyle { .. } => Some("Styles are defined in styles.yaml"),
            Self::ContentDirNotFound(_) => Some("Run: fabula init"),
            Self::NoVersions => Some("Run: fabula generate --message \"initial\""),
            Self::MessageRequired | Self::VersionStale { .. } => {
                Some("Pass --message to mint a new version")
            }
            Self::ImageMissing { .. } => Some("Run: fabula generate"),
            Self::Api { status: 429, .. } => {
                Some("Rate limited; rerun later, finished pages are cached")
            }
            Self::CommandFailed { .. } => {
                Some("Check that the external tool is installed and on PATH")
            }
            _ => None,
        }
    }
}
