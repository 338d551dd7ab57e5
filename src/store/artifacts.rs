//! Shared content-addressed artifact pool
//!
//! Generated images and their prompt records live in one flat directory,
//! named `{page_id}-{fingerprint}.jpg` / `.txt`. The pool is shared across
//! all versions; a version's manifest only points into it. Writes are
//! write-once: an existing artifact is never touched again, so regenerating
//! a page whose fingerprint is unchanged costs nothing.

use crate::error::{FabulaError, FabulaResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Pool file name for a (page, fingerprint) pair; manifests record this
pub fn image_file_name(page_id: &str, fingerprint: &str) -> String {
    format!("{page_id}-{fingerprint}.jpg")
}

/// Content-addressed pool of generated images and prompt records
#[derive(Debug, Clone)]
pub struct ArtifactPool {
    dir: PathBuf,
}

impl ArtifactPool {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Canonical image path for a (page, fingerprint) pair
    pub fn image_path(&self, page_id: &str, fingerprint: &str) -> PathBuf {
        self.dir.join(image_file_name(page_id, fingerprint))
    }

    /// Canonical prompt record path for a (page, fingerprint) pair
    pub fn prompt_path(&self, page_id: &str, fingerprint: &str) -> PathBuf {
        self.dir.join(format!("{page_id}-{fingerprint}.txt"))
    }

    /// Existing artifact for this key, if any. Pure existence check.
    pub fn locate(&self, page_id: &str, fingerprint: &str) -> Option<PathBuf> {
        let path = self.image_path(page_id, fingerprint);
        path.exists().then_some(path)
    }

    /// Store image bytes under the canonical name, write-once.
    ///
    /// Returns the final path whether or not a write happened. Concurrent
    /// stores for the same key are safe: each writer lands its bytes in a
    /// uniquely named temp file and renames into place, and identical
    /// fingerprints imply identical content.
    pub async fn store(
        &self,
        page_id: &str,
        fingerprint: &str,
        bytes: &[u8],
    ) -> FabulaResult<PathBuf> {
        self.write_once(self.image_path(page_id, fingerprint), bytes)
            .await
    }

    /// Store the prompt text alongside the image, same write-once semantics
    pub async fn store_prompt(
        &self,
        page_id: &str,
        fingerprint: &str,
        text: &str,
    ) -> FabulaResult<PathBuf> {
        self.write_once(self.prompt_path(page_id, fingerprint), text.as_bytes())
            .await
    }

    async fn write_once(&self, path: PathBuf, bytes: &[u8]) -> FabulaResult<PathBuf> {
        if path.exists() {
            debug!("Pool hit, keeping existing {}", path.display());
            return Ok(path);
        }

        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| FabulaError::io(format!("creating pool {}", self.dir.display()), e))?;

        let tmp = self.dir.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, bytes)
            .await
            .map_err(|e| FabulaError::io(format!("writing {}", tmp.display()), e))?;

        // Rename is atomic within the pool directory; a lost race just
        // replaces identical content
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| FabulaError::io(format!("renaming into {}", path.display()), e))?;

        debug!("Stored {}", path.display());
        Ok(path)
    }
}
