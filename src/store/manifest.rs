//! Per-version manifests and their store
//!
//! Each version directory under `versions/` holds one `manifest.yaml`
//! describing the release: which pool artifact each page uses, which books
//! were compiled, and how the version came to be. Mutation is whole-file
//! read-modify-write, serialized by one in-process lock; cross-process
//! writers are out of scope.

use crate::error::{FabulaError, FabulaResult};
use crate::store::revision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Manifest file name inside a version directory
pub const MANIFEST_FILE: &str = "manifest.yaml";

/// One page's image selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    /// Pool file name (not a full path)
    pub file: String,

    /// Fingerprint the image was generated from
    pub prompt_hash: String,

    /// Version the selection was copied from, for merge-built versions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_version: Option<u32>,
}

/// Per-version record of image selections and produced documents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,

    /// Creation time (UTC)
    pub created: DateTime<Utc>,

    /// Short source revision at creation, or "unknown"
    pub commit: String,

    /// Operator-supplied reason for the version
    pub message: String,

    /// Style id the version was generated with
    pub style: String,

    /// page id -> selection
    #[serde(default)]
    pub images: BTreeMap<String, ImageEntry>,

    /// Compiled document file names, relative to the version directory
    #[serde(default)]
    pub books: Vec<String>,

    /// Versions a merge version was assembled from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_versions: Option<Vec<u32>>,
}

/// Store of numbered version directories and their manifests
pub struct ManifestStore {
    versions_dir: PathBuf,
    lock: Mutex<()>,
}

impl ManifestStore {
    pub fn new(versions_dir: impl Into<PathBuf>) -> Self {
        Self {
            versions_dir: versions_dir.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn versions_dir(&self) -> &Path {
        &self.versions_dir
    }

    /// Directory for a version, zero-padded to two digits
    pub fn version_dir(&self, version: u32) -> PathBuf {
        self.versions_dir.join(format!("{version:02}"))
    }

    pub fn manifest_path(&self, version: u32) -> PathBuf {
        self.version_dir(version).join(MANIFEST_FILE)
    }

    /// All existing version numbers, ascending.
    ///
    /// Any all-digit directory name counts, so versions beyond 99 stay
    /// discoverable even though new directories are written zero-padded.
    pub async fn list_versions(&self) -> FabulaResult<Vec<u32>> {
        if !self.versions_dir.exists() {
            return Ok(vec![]);
        }

        let mut versions = vec![];
        let mut entries = fs::read_dir(&self.versions_dir)
            .await
            .map_err(|e| FabulaError::io("reading versions directory", e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FabulaError::io("reading versions entry", e))?
        {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(version) = name.parse::<u32>() {
                    versions.push(version);
                }
            }
        }

        versions.sort_unstable();
        versions.dedup();
        Ok(versions)
    }

    /// Highest existing version number, 0 when none exist
    pub async fn latest_version(&self) -> FabulaResult<u32> {
        Ok(self.list_versions().await?.last().copied().unwrap_or(0))
    }

    /// Read one version's manifest. `None` when the file does not exist;
    /// a malformed file is an error, not a skip.
    pub async fn read(&self, version: u32) -> FabulaResult<Option<Manifest>> {
        let path = self.manifest_path(version);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| FabulaError::io(format!("reading {}", path.display()), e))?;

        let manifest = serde_yaml::from_str(&content).map_err(|e| FabulaError::yaml(&path, e))?;
        Ok(Some(manifest))
    }

    /// Latest version number plus its manifest. `(0, None)` when no versions
    /// exist; `(n, None)` when the newest directory has a missing or
    /// unreadable manifest, which the resolver treats as stale.
    pub async fn read_latest(&self) -> FabulaResult<(u32, Option<Manifest>)> {
        let latest = self.latest_version().await?;
        if latest == 0 {
            return Ok((0, None));
        }

        match self.read(latest).await {
            Ok(manifest) => Ok((latest, manifest)),
            Err(e) => {
                warn!("Manifest for version {latest} is unreadable: {e}");
                Ok((latest, None))
            }
        }
    }

    /// Full overwrite of a version's manifest, creating the directory
    pub async fn write(&self, version: u32, manifest: &Manifest) -> FabulaResult<()> {
        let dir = self.version_dir(version);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| FabulaError::io(format!("creating {}", dir.display()), e))?;

        let content = serde_yaml::to_string(manifest)?;
        let path = self.manifest_path(version);
        fs::write(&path, content)
            .await
            .map_err(|e| FabulaError::io(format!("writing {}", path.display()), e))?;
        Ok(())
    }

    /// Mint the next version with empty collections
    pub async fn create_version(&self, message: &str, style: &str) -> FabulaResult<u32> {
        let _guard = self.lock.lock().await;
        self.create_locked(message, style, None).await
    }

    /// Mint the next version, recording the versions it merges
    pub async fn create_merge_version(
        &self,
        message: &str,
        style: &str,
        sources: &[u32],
    ) -> FabulaResult<u32> {
        let _guard = self.lock.lock().await;
        self.create_locked(message, style, Some(sources.to_vec()))
            .await
    }

    async fn create_locked(
        &self,
        message: &str,
        style: &str,
        source_versions: Option<Vec<u32>>,
    ) -> FabulaResult<u32> {
        let version = self.latest_version().await? + 1;

        let manifest = Manifest {
            version,
            created: Utc::now(),
            commit: revision::current().await,
            message: message.to_string(),
            style: style.to_string(),
            images: BTreeMap::new(),
            books: vec![],
            source_versions,
        };

        self.write(version, &manifest).await?;
        info!("Created version {version:02}");
        Ok(version)
    }

    /// Upsert one page's image selection. Serialized with every other
    /// manifest mutation, so parallel workers recording different pages
    /// never lose each other's updates.
    pub async fn record_image(
        &self,
        version: u32,
        page_id: &str,
        file: &str,
        prompt_hash: &str,
    ) -> FabulaResult<()> {
        self.upsert_image(version, page_id, file, prompt_hash, None)
            .await
    }

    /// Upsert a selection copied from another version
    pub async fn record_selection(
        &self,
        version: u32,
        page_id: &str,
        file: &str,
        prompt_hash: &str,
        source_version: u32,
    ) -> FabulaResult<()> {
        self.upsert_image(version, page_id, file, prompt_hash, Some(source_version))
            .await
    }

    async fn upsert_image(
        &self,
        version: u32,
        page_id: &str,
        file: &str,
        prompt_hash: &str,
        source_version: Option<u32>,
    ) -> FabulaResult<()> {
        let _guard = self.lock.lock().await;

        let mut manifest = self
            .read(version)
            .await?
            .ok_or(FabulaError::VersionNotFound(version))?;

        manifest.images.insert(
            page_id.to_string(),
            ImageEntry {
                file: file.to_string(),
                prompt_hash: prompt_hash.to_string(),
                source_version,
            },
        );

        self.write(version, &manifest).await
    }

    /// Append a book file name if not already present
    pub async fn record_book(&self, version: u32, filename: &str) -> FabulaResult<()> {
        let _guard = self.lock.lock().await;

        let mut manifest = self
            .read(version)
            .await?
            .ok_or(FabulaError::VersionNotFound(version))?;

        if !manifest.books.iter().any(|b| b == filename) {
            manifest.books.push(filename.to_string());
        }

        self.write(version, &manifest).await
    }
}
