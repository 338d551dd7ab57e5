//! Page files and their naming convention
//!
//! Pages live under `pages/` and are named `p{NN}-{characters}.yaml`, e.g.
//! `p03-mia-leo.yaml`. The number orders the book; the hyphen-separated ids
//! name the characters on the page. The page id used everywhere else (pool
//! artifacts, manifests) is the file stem.

use crate::error::{FabulaError, FabulaResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Free text that may be written as one string or a list of bullet items
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Lines {
    One(String),
    Many(Vec<String>),
}

impl Default for Lines {
    fn default() -> Self {
        Lines::Many(vec![])
    }
}

impl Lines {
    pub fn is_empty(&self) -> bool {
        match self {
            Lines::One(text) => text.trim().is_empty(),
            Lines::Many(items) => items.is_empty(),
        }
    }

    /// Render for prompt inclusion: a single string stays as written, a
    /// list becomes indented bullet items
    pub fn block(&self) -> String {
        match self {
            Lines::One(text) => text.trim().to_string(),
            Lines::Many(items) => items
                .iter()
                .map(|item| format!("  - {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Parsed body of a page file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageSpec {
    /// Character ids on this page; falls back to the file name segments
    #[serde(default)]
    pub characters: Vec<String>,

    /// Location id, resolved against `locations/`
    pub location: Option<String>,

    /// Scene description fed to the prompt
    #[serde(default)]
    pub visual: Lines,

    /// Story text to render inside the illustration
    #[serde(default)]
    pub text: String,

    /// Object ids whose reference images should be attached
    #[serde(default)]
    pub objects: Vec<String>,

    /// Per-page seed override
    pub seed: Option<u64>,
}

/// A page: identity from the file name plus the parsed body
#[derive(Debug, Clone)]
pub struct Page {
    /// File stem, e.g. `p03-mia-leo`
    pub id: String,

    /// Position in the book
    pub number: u32,

    pub spec: PageSpec,

    pub path: PathBuf,
}

/// Split a page stem like `p03-mia-leo` into its number and character ids
pub fn parse_stem(stem: &str) -> Option<(u32, Vec<String>)> {
    let rest = stem.strip_prefix('p')?;
    let (digits, characters) = rest.split_once('-')?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let number = digits.parse().ok()?;

    let characters: Vec<String> = characters
        .split('-')
        .filter(|part| !part.is_empty())
        .map(String::from)
        .collect();
    if characters.is_empty() {
        return None;
    }

    Some((number, characters))
}

/// Load a single page file
pub async fn load(path: &Path) -> FabulaResult<Page> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| FabulaError::PageNotFound(path.display().to_string()))?;

    let (number, filename_characters) =
        parse_stem(stem).ok_or_else(|| FabulaError::ContentInvalid {
            path: path.to_path_buf(),
            reason: "page files must be named p{NN}-{characters}.yaml".to_string(),
        })?;

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| FabulaError::io(format!("reading page {}", path.display()), e))?;

    let mut spec: PageSpec =
        serde_yaml::from_str(&content).map_err(|e| FabulaError::yaml(path, e))?;
    if spec.characters.is_empty() {
        spec.characters = filename_characters;
    }

    Ok(Page {
        id: stem.to_string(),
        number,
        spec,
        path: path.to_path_buf(),
    })
}

/// Load every page in the directory, ordered by page number then id.
/// Files that do not follow the naming convention are skipped.
pub async fn discover(pages_dir: &Path) -> FabulaResult<Vec<Page>> {
    if !pages_dir.is_dir() {
        return Err(FabulaError::ContentDirNotFound(pages_dir.to_path_buf()));
    }

    let mut paths = vec![];
    let mut entries = fs::read_dir(pages_dir)
        .await
        .map_err(|e| FabulaError::io("reading pages directory", e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FabulaError::io("reading pages entry", e))?
    {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "yaml") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if parse_stem(stem).is_none() {
            debug!("Skipping {} (not a page file)", path.display());
            continue;
        }
        paths.push(path);
    }

    let mut pages = Vec::with_capacity(paths.len());
    for path in paths {
        pages.push(load(&path).await?);
    }

    pages.sort_by(|a, b| a.number.cmp(&b.number).then_with(|| a.id.cmp(&b.id)));
    Ok(pages)
}
