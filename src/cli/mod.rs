//! Command-line interface: argument definitions and command dispatch

pub mod args;
pub mod commands;

pub use args::{Cli, Commands};
