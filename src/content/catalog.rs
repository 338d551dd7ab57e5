//! Story, style, character and location records
//!
//! The catalog is everything in the content base that is not a page. It
//! loads tolerantly: a missing `story.yaml` means an untitled story, missing
//! directories mean empty maps. A malformed file is still an error.

use crate::config::schema::PathsConfig;
use crate::error::{FabulaError, FabulaResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tokio::fs;

/// `story.yaml`: the book's framing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Story {
    #[serde(default)]
    pub title: String,

    /// Setting bullets included in every prompt
    #[serde(default)]
    pub setting: Vec<String>,
}

/// One entry of `styles.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Style {
    /// Artist whose manner the style imitates; the id stands in when unset
    pub artist: Option<String>,

    /// Style bullets included in every prompt
    #[serde(default)]
    pub prompts: Vec<String>,
}

/// `characters/{id}.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Character {
    pub name: Option<String>,

    pub age: Option<u32>,

    /// Visual bullets for the prompt's character section
    #[serde(default)]
    pub visual: Vec<String>,
}

/// `locations/{id}.yaml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Location {
    pub display_name: Option<String>,

    /// Visual bullets for the prompt's location section
    #[serde(default)]
    pub visual: Vec<String>,
}

/// Everything in the content base except the pages
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub story: Story,
    pub styles: BTreeMap<String, Style>,
    pub characters: BTreeMap<String, Character>,
    pub locations: BTreeMap<String, Location>,
}

impl Catalog {
    pub async fn load(paths: &PathsConfig) -> FabulaResult<Self> {
        if !paths.content.is_dir() {
            return Err(FabulaError::ContentDirNotFound(paths.content.clone()));
        }

        Ok(Self {
            story: read_optional(&paths.story_path()).await?.unwrap_or_default(),
            styles: read_optional(&paths.styles_path()).await?.unwrap_or_default(),
            characters: read_id_dir(&paths.characters_dir()).await?,
            locations: read_id_dir(&paths.locations_dir()).await?,
        })
    }

    /// Look up a style, failing with the list of known ids
    pub fn style(&self, id: &str) -> FabulaResult<&Style> {
        self.styles.get(id).ok_or_else(|| FabulaError::UnknownStyle {
            style: id.to_string(),
            available: if self.styles.is_empty() {
                "none defined".to_string()
            } else {
                self.styles.keys().cloned().collect::<Vec<_>>().join(", ")
            },
        })
    }

    /// Artist credited for a style, defaulting to the style id
    pub fn artist<'a>(&'a self, id: &'a str) -> &'a str {
        self.styles
            .get(id)
            .and_then(|s| s.artist.as_deref())
            .unwrap_or(id)
    }

    /// Display name for a character id
    pub fn character_name(&self, id: &str) -> String {
        self.characters
            .get(id)
            .and_then(|c| c.name.clone())
            .unwrap_or_else(|| title_case(id))
    }

    /// Display name for a location id
    pub fn location_name(&self, id: &str) -> String {
        self.locations
            .get(id)
            .and_then(|l| l.display_name.clone())
            .unwrap_or_else(|| title_case(id))
    }
}

/// `old_mill` -> `Old Mill`
fn title_case(id: &str) -> String {
    id.split(['_', '-'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

async fn read_optional<T: serde::de::DeserializeOwned>(path: &Path) -> FabulaResult<Option<T>> {
    if !path.is_file() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| FabulaError::io(format!("reading {}", path.display()), e))?;
    let value = serde_yaml::from_str(&content).map_err(|e| FabulaError::yaml(path, e))?;
    Ok(Some(value))
}

async fn read_id_dir<T: serde::de::DeserializeOwned>(
    dir: &Path,
) -> FabulaResult<BTreeMap<String, T>> {
    let mut map = BTreeMap::new();
    if !dir.is_dir() {
        return Ok(map);
    }

    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|e| FabulaError::io(format!("reading {}", dir.display()), e))?;

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| FabulaError::io(format!("reading entry in {}", dir.display()), e))?
    {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "yaml") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if let Some(value) = read_optional(&path).await? {
            map.insert(stem.to_string(), value);
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn paths_for(temp: &TempDir) -> PathsConfig {
        PathsConfig {
            content: temp.path().to_path_buf(),
            output: temp.path().join("out"),
        }
    }

    fn write(temp: &TempDir, rel: &str, body: &str) {
        let path = temp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    #[tokio::test]
    async fn loads_full_base() {
        let temp = TempDir::new().unwrap();
        write(&temp, "story.yaml", "title: The Lantern\nsetting:\n  - a fishing village\n");
        write(
            &temp,
            "styles.yaml",
            "watercolor:\n  artist: E. Shepard\n  prompts:\n    - soft washes\n",
        );
        write(&temp, "characters/mia.yaml", "name: Mia\nage: 7\nvisual:\n  - red coat\n");
        write(&temp, "locations/forest.yaml", "display_name: Dark Forest\n");

        let catalog = Catalog::load(&paths_for(&temp)).await.unwrap();
        assert_eq!(catalog.story.title, "The Lantern");
        assert_eq!(catalog.artist("watercolor"), "E. Shepard");
        assert_eq!(catalog.character_name("mia"), "Mia");
        assert_eq!(catalog.location_name("forest"), "Dark Forest");
        assert_eq!(catalog.characters["mia"].age, Some(7));
    }

    #[tokio::test]
    async fn tolerates_sparse_base() {
        let temp = TempDir::new().unwrap();
        let catalog = Catalog::load(&paths_for(&temp)).await.unwrap();

        assert!(catalog.story.title.is_empty());
        assert!(catalog.styles.is_empty());
        // Fallback names derive from the id
        assert_eq!(catalog.character_name("old_fox"), "Old Fox");
        assert_eq!(catalog.location_name("mill-pond"), "Mill Pond");
        assert_eq!(catalog.artist("watercolor"), "watercolor");
    }

    #[tokio::test]
    async fn missing_content_dir_fails() {
        let temp = TempDir::new().unwrap();
        let paths = PathsConfig {
            content: temp.path().join("absent"),
            output: temp.path().join("out"),
        };
        let err = Catalog::load(&paths).await.unwrap_err();
        assert!(matches!(err, FabulaError::ContentDirNotFound(_)));
    }

    #[tokio::test]
    async fn unknown_style_lists_known_ids() {
        let temp = TempDir::new().unwrap();
        write(&temp, "styles.yaml", "ink: {}\nwatercolor: {}\n");

        let catalog = Catalog::load(&paths_for(&temp)).await.unwrap();
        let err = catalog.style("crayon").unwrap_err();
        match err {
            FabulaError::UnknownStyle { style, available } => {
                assert_eq!(style, "crayon");
                assert_eq!(available, "ink, watercolor");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn title_case_forms() {
        assert_eq!(title_case("mia"), "Mia");
        assert_eq!(title_case("old_mill"), "Old Mill");
        assert_eq!(title_case(""), "");
    }
}
