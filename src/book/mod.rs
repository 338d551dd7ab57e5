//! Book compilation
//!
//! A book is one character's pages in order, compiled into a PDF from the
//! images the version's manifest records. Nothing is regenerated here: a
//! page without a recorded image is an error telling the user to rerun
//! generation, not a trigger for it.

pub mod frame;
pub mod pdf;

pub use frame::FrameTool;
pub use pdf::Img2pdfRenderer;

use crate::content::Page;
use crate::error::{FabulaError, FabulaResult};
use crate::store::{ArtifactPool, Manifest};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Compiles an ordered list of page images into one document
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    async fn render(&self, images: &[PathBuf], output: &Path) -> FabulaResult<()>;
}

/// Pages featuring one character, in book order
pub fn select_pages<'a>(pages: &'a [Page], character: &str) -> Vec<&'a Page> {
    pages
        .iter()
        .filter(|page| page.spec.characters.iter().any(|c| c == character))
        .collect()
}

/// Resolve every selected page to its recorded pool image.
///
/// Missing pages are collected and reported together, so one `generate`
/// rerun can fill all gaps at once.
pub fn collect_images(
    manifest: &Manifest,
    version: u32,
    pages: &[&Page],
    pool: &ArtifactPool,
) -> FabulaResult<Vec<PathBuf>> {
    let mut images = Vec::with_capacity(pages.len());
    let mut missing = Vec::new();

    for page in pages {
        match manifest.images.get(&page.id) {
            Some(entry) => images.push(pool.dir().join(&entry.file)),
            None => missing.push(page.id.clone()),
        }
    }

    if !missing.is_empty() {
        return Err(FabulaError::ImageMissing {
            version,
            pages: missing.join(", "),
        });
    }
    Ok(images)
}

/// `{character}-{version:02}-{style}.pdf`, recorded in the manifest and
/// written into the version directory
pub fn book_file_name(character: &str, version: u32, style: &str) -> String {
    format!("{character}-{version:02}-{style}.pdf")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PageSpec;
    use crate::store::ImageEntry;
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn page(id: &str, number: u32, characters: &[&str]) -> Page {
        Page {
            id: id.to_string(),
            number,
            spec: PageSpec {
                characters: characters.iter().map(|c| c.to_string()).collect(),
                ..Default::default()
            },
            path: PathBuf::from(format!("pages/{id}.yaml")),
        }
    }

    fn manifest_with(entries: &[(&str, &str)]) -> Manifest {
        let mut images = BTreeMap::new();
        for (page_id, file) in entries {
            images.insert(
                page_id.to_string(),
                ImageEntry {
                    file: file.to_string(),
                    prompt_hash: "aaaaa".to_string(),
                    source_version: None,
                },
            );
        }
        Manifest {
            version: 1,
            created: Utc::now(),
            commit: "unknown".to_string(),
            message: "initial".to_string(),
            style: "ink".to_string(),
            images,
            books: vec![],
            source_versions: None,
        }
    }

    #[test]
    fn select_filters_and_keeps_book_order() {
        let pages = vec![
            page("p01-mia", 1, &["mia"]),
            page("p02-leo", 2, &["leo"]),
            page("p03-mia-leo", 3, &["mia", "leo"]),
        ];

        let selected = select_pages(&pages, "mia");
        let ids: Vec<&str> = selected.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["p01-mia", "p03-mia-leo"]);
    }

    #[test]
    fn collect_resolves_pool_paths_in_page_order() {
        let pages = vec![page("p01-mia", 1, &["mia"]), page("p02-mia", 2, &["mia"])];
        let selected: Vec<&Page> = pages.iter().collect();
        let manifest = manifest_with(&[
            ("p01-mia", "p01-mia-aaaaa.jpg"),
            ("p02-mia", "p02-mia-bbbbb.jpg"),
        ]);
        let pool = ArtifactPool::new("/out/images");

        let images = collect_images(&manifest, 1, &selected, &pool).unwrap();
        assert_eq!(images[0], PathBuf::from("/out/images/p01-mia-aaaaa.jpg"));
        assert_eq!(images[1], PathBuf::from("/out/images/p02-mia-bbbbb.jpg"));
    }

    #[test]
    fn collect_lists_every_missing_page() {
        let pages = vec![
            page("p01-mia", 1, &["mia"]),
            page("p02-mia", 2, &["mia"]),
            page("p03-mia", 3, &["mia"]),
        ];
        let selected: Vec<&Page> = pages.iter().collect();
        let manifest = manifest_with(&[("p02-mia", "p02-mia-bbbbb.jpg")]);
        let pool = ArtifactPool::new("/out/images");

        let err = collect_images(&manifest, 4, &selected, &pool).unwrap_err();
        match err {
            FabulaError::ImageMissing { version, pages } => {
                assert_eq!(version, 4);
                assert_eq!(pages, "p01-mia, p03-mia");
            }
            other => panic!("expected ImageMissing, got {other:?}"),
        }
    }

    #[test]
    fn book_names_are_zero_padded() {
        assert_eq!(book_file_name("mia", 3, "ink"), "mia-03-ink.pdf");
        assert_eq!(book_file_name("mia", 12, "ink"), "mia-12-ink.pdf");
    }
}
