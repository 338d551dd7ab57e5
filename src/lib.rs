//! Fabula - Storybook Generation Toolset
//!
//! Turns a YAML content base (story, styles, characters, locations,
//! pages) into versioned illustrated pages and compiled PDF books.

pub mod book;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod generate;
pub mod prompt;
pub mod store;
pub mod ui;

pub use error::{FabulaError, FabulaResult};
