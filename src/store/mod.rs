//! Versioned artifact cache
//!
//! The store is the heart of the toolset: a shared content-addressed pool of
//! generated images, per-version manifests recording which pool artifacts
//! make up each release of the book, and the resolver that decides when a
//! page set can reuse the latest version and when a new one must be minted.

pub mod artifacts;
pub mod fingerprint;
pub mod manifest;
pub mod resolver;
pub mod revision;

pub use artifacts::{image_file_name, ArtifactPool};
pub use fingerprint::fingerprint;
pub use manifest::{ImageEntry, Manifest, ManifestStore, MANIFEST_FILE};
pub use resolver::{assess, resolve, VersionState};
