//! Reference image collection
//!
//! Each page's generation request carries labeled reference images picked up
//! from `ref/` by naming convention: `{id}-{NN}.jpg`. Styles, characters and
//! locations contribute at most one image each; objects contribute all of
//! theirs. The model accepts at most [`MAX_TOTAL_IMAGES`] per request.

use crate::content::{Catalog, Page};
use crate::error::{FabulaError, FabulaResult};
use std::path::{Path, PathBuf};

pub const MAX_TOTAL_IMAGES: usize = 14;
const MAX_STYLE_IMAGES: usize = 1;
const MAX_CHARACTER_IMAGES: usize = 1;
const MAX_LOCATION_IMAGES: usize = 1;

/// One reference image attached to a generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefImage {
    /// Where to read the bytes
    pub path: PathBuf,

    /// Content-base-relative id, e.g. `ref/characters/mia-01.jpg`; this is
    /// what fingerprints hash, so it must not vary across machines
    pub rel: String,

    /// Caption sent alongside the image
    pub label: String,
}

/// Collect the labeled reference images for one page in a fixed order:
/// style, then characters, then location, then objects.
pub fn collect(
    page: &Page,
    catalog: &Catalog,
    style_id: &str,
    refs_dir: &Path,
) -> FabulaResult<Vec<RefImage>> {
    let artist = catalog.artist(style_id);
    let mut refs = Vec::new();

    for name in matching(&refs_dir.join("styles"), style_id, MAX_STYLE_IMAGES) {
        refs.push(ref_image(
            refs_dir,
            "styles",
            name,
            format!("A style reference image showing {artist}'s illustration style"),
        ));
    }

    for character in &page.spec.characters {
        let display = catalog.character_name(character);
        for name in matching(&refs_dir.join("characters"), character, MAX_CHARACTER_IMAGES) {
            refs.push(ref_image(
                refs_dir,
                "characters",
                name,
                format!("A reference picture of {display}"),
            ));
        }
    }

    if let Some(location) = &page.spec.location {
        let display = catalog.location_name(location);
        for name in matching(&refs_dir.join("locations"), location, MAX_LOCATION_IMAGES) {
            refs.push(ref_image(
                refs_dir,
                "locations",
                name,
                format!("A reference picture of the {display}"),
            ));
        }
    }

    for object in &page.spec.objects {
        let display = object.replace('_', " ");
        for name in matching(&refs_dir.join("objects"), object, usize::MAX) {
            refs.push(ref_image(
                refs_dir,
                "objects",
                name,
                format!("A reference picture of {display}"),
            ));
        }
    }

    if refs.len() > MAX_TOTAL_IMAGES {
        return Err(FabulaError::TooManyRefs {
            page: page.id.clone(),
            count: refs.len(),
            max: MAX_TOTAL_IMAGES,
        });
    }

    Ok(refs)
}

fn ref_image(refs_dir: &Path, group: &str, name: String, label: String) -> RefImage {
    RefImage {
        path: refs_dir.join(group).join(&name),
        rel: format!("ref/{group}/{name}"),
        label,
    }
}

/// File names under `dir` matching `{id}-*.jpg`, sorted, first `limit` kept
fn matching(dir: &Path, id: &str, limit: usize) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return vec![];
    };
    let prefix = format!("{id}-");
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "jpg"))
        .filter_map(|path| path.file_name()?.to_str().map(String::from))
        .filter(|name| name.starts_with(&prefix))
        .collect();
    names.sort();
    names.truncate(limit);
    names
}
