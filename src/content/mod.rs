//! Hand-authored content base
//!
//! The content base is a directory of YAML files and reference images the
//! author maintains by hand: one file per page, character and location, plus
//! `story.yaml` and `styles.yaml` at the root and reference photos under
//! `ref/`. Loading is tolerant (missing optional files fall back to
//! defaults); the `check` command is the strict gate.

pub mod catalog;
pub mod page;
pub mod validate;

pub use catalog::{Catalog, Character, Location, Story, Style};
pub use page::{Lines, Page, PageSpec};
pub use validate::{Finding, Report, Severity};
