//! Version reuse decisions
//!
//! Before any generation work starts, the computed fingerprints for the
//! in-scope pages are compared against the latest manifest. Matching
//! fingerprints mean the latest version can be extended in place; any
//! difference (including a page the manifest has never seen) makes the
//! version stale, and minting a replacement requires an explicit operator
//! message. Nothing here ever creates a version silently.

use crate::error::{FabulaError, FabulaResult};
use crate::store::manifest::{Manifest, ManifestStore};
use std::collections::BTreeMap;

/// How many changed pages the stale error names before truncating
const PREVIEW_LIMIT: usize = 3;

/// Outcome of comparing computed fingerprints against the latest manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionState {
    /// No versions exist yet
    NoVersion,

    /// Every in-scope page matches the latest manifest
    Current(u32),

    /// At least one page differs from (or is absent in) the latest manifest
    Stale { latest: u32, changed: Vec<String> },
}

/// Compare computed page fingerprints against the latest manifest.
///
/// `manifest` is `None` both when no version exists (`latest == 0`) and when
/// the latest directory's manifest is missing or unreadable; the latter
/// counts as fully stale. A page present in the manifest but not in
/// `computed` is ignored: only the in-scope page set is judged.
pub fn assess(
    latest: u32,
    manifest: Option<&Manifest>,
    computed: &BTreeMap<String, String>,
) -> VersionState {
    if latest == 0 {
        return VersionState::NoVersion;
    }

    let Some(manifest) = manifest else {
        return VersionState::Stale {
            latest,
            changed: computed.keys().cloned().collect(),
        };
    };

    let changed: Vec<String> = computed
        .iter()
        .filter(|(page, fingerprint)| {
            manifest.images.get(*page).map(|e| &e.prompt_hash) != Some(fingerprint)
        })
        .map(|(page, _)| page.clone())
        .collect();

    if changed.is_empty() {
        VersionState::Current(latest)
    } else {
        VersionState::Stale { latest, changed }
    }
}

/// Turn an assessment into a concrete version number.
///
/// `Current` reuses the existing number. `NoVersion` and `Stale` mint
/// `latest + 1`, but only with a message; without one they fail before any
/// directory is created.
pub async fn resolve(
    store: &ManifestStore,
    state: &VersionState,
    message: Option<&str>,
    style: &str,
) -> FabulaResult<u32> {
    match state {
        VersionState::Current(version) => Ok(*version),
        VersionState::NoVersion => match message {
            Some(message) => store.create_version(message, style).await,
            None => Err(FabulaError::MessageRequired),
        },
        VersionState::Stale { latest, changed } => match message {
            Some(message) => store.create_version(message, style).await,
            None => Err(FabulaError::VersionStale {
                latest: *latest,
                count: changed.len(),
                preview: preview(changed),
            }),
        },
    }
}

fn preview(changed: &[String]) -> String {
    let mut text = changed
        .iter()
        .take(PREVIEW_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if changed.len() > PREVIEW_LIMIT {
        text.push_str(&format!(", +{} more", changed.len() - PREVIEW_LIMIT));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::manifest::ImageEntry;
    use chrono::Utc;
    use tempfile::TempDir;

    fn manifest_with(entries: &[(&str, &str)]) -> Manifest {
        Manifest {
            version: 3,
            created: Utc::now(),
            commit: "unknown".into(),
            message: "m".into(),
            style: "ink".into(),
            images: entries
                .iter()
                .map(|(page, hash)| {
                    (
                        page.to_string(),
                        ImageEntry {
                            file: format!("{page}-{hash}.jpg"),
                            prompt_hash: hash.to_string(),
                            source_version: None,
                        },
                    )
                })
                .collect(),
            books: vec![],
            source_versions: None,
        }
    }

    fn computed(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|(page, hash)| (page.to_string(), hash.to_string()))
            .collect()
    }

    #[test]
    fn no_versions_yet() {
        assert_eq!(
            assess(0, None, &computed(&[("p1", "abc12")])),
            VersionState::NoVersion
        );
    }

    #[test]
    fn matching_fingerprints_are_current() {
        let manifest = manifest_with(&[("p1", "abc12")]);
        assert_eq!(
            assess(3, Some(&manifest), &computed(&[("p1", "abc12")])),
            VersionState::Current(3)
        );
    }

    #[test]
    fn changed_fingerprint_is_stale() {
        let manifest = manifest_with(&[("p1", "abc12")]);
        assert_eq!(
            assess(3, Some(&manifest), &computed(&[("p1", "def34")])),
            VersionState::Stale {
                latest: 3,
                changed: vec!["p1".into()]
            }
        );
    }

    #[test]
    fn page_absent_from_manifest_is_stale() {
        let manifest = manifest_with(&[("p1", "abc12")]);
        let state = assess(
            3,
            Some(&manifest),
            &computed(&[("p1", "abc12"), ("p2", "99aa1")]),
        );
        assert_eq!(
            state,
            VersionState::Stale {
                latest: 3,
                changed: vec!["p2".into()]
            }
        );
    }

    #[test]
    fn extra_manifest_pages_do_not_matter() {
        let manifest = manifest_with(&[("p1", "abc12"), ("p2", "99aa1")]);
        assert_eq!(
            assess(3, Some(&manifest), &computed(&[("p1", "abc12")])),
            VersionState::Current(3)
        );
    }

    #[test]
    fn unreadable_manifest_is_fully_stale() {
        let state = assess(2, None, &computed(&[("p1", "abc12"), ("p2", "99aa1")]));
        assert_eq!(
            state,
            VersionState::Stale {
                latest: 2,
                changed: vec!["p1".into(), "p2".into()]
            }
        );
    }

    #[test]
    fn preview_caps_long_lists() {
        let changed: Vec<String> = (1..=5).map(|i| format!("p{i:02}")).collect();
        assert_eq!(preview(&changed), "p01, p02, p03, +2 more");
    }

    #[tokio::test]
    async fn resolve_without_message_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let store = ManifestStore::new(temp.path().join("versions"));

        let err = resolve(&store, &VersionState::NoVersion, None, "ink")
            .await
            .unwrap_err();
        assert!(matches!(err, FabulaError::MessageRequired));
        assert!(store.list_versions().await.unwrap().is_empty());

        let stale = VersionState::Stale {
            latest: 3,
            changed: vec!["p1".into()],
        };
        let err = resolve(&store, &stale, None, "ink").await.unwrap_err();
        assert!(matches!(err, FabulaError::VersionStale { latest: 3, count: 1, .. }));
        assert!(store.list_versions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolve_first_version_with_message() {
        let temp = TempDir::new().unwrap();
        let store = ManifestStore::new(temp.path().join("versions"));

        let version = resolve(&store, &VersionState::NoVersion, Some("initial"), "ink")
            .await
            .unwrap();
        assert_eq!(version, 1);
        assert_eq!(store.list_versions().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn resolve_current_reuses_without_message() {
        let temp = TempDir::new().unwrap();
        let store = ManifestStore::new(temp.path().join("versions"));
        store.create_version("one", "ink").await.unwrap();

        let version = resolve(&store, &VersionState::Current(1), None, "ink")
            .await
            .unwrap();
        assert_eq!(version, 1);
        assert_eq!(store.list_versions().await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn resolve_stale_mints_fresh_successor() {
        let temp = TempDir::new().unwrap();
        let store = ManifestStore::new(temp.path().join("versions"));
        let first = store.create_version("one", "ink").await.unwrap();
        store
            .record_image(first, "p1", "p1-abc12.jpg", "abc12")
            .await
            .unwrap();

        let stale = VersionState::Stale {
            latest: first,
            changed: vec!["p1".into()],
        };
        let version = resolve(&store, &stale, Some("fix p1"), "ink")
            .await
            .unwrap();

        assert_eq!(version, 2);
        let manifest = store.read(2).await.unwrap().unwrap();
        // Fresh version starts empty, nothing copied from version 1
        assert!(manifest.images.is_empty());
        assert!(manifest.books.is_empty());
        assert_eq!(manifest.message, "fix p1");
    }
}
