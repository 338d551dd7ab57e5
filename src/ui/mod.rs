//! UI module for consistent, modern CLI experience
//!
//! Uses `cliclack` (Rust port of @clack/prompts) for interactive prompts
//! with automatic fallback to plain output in CI/non-interactive environments.
//!
//! # Example
//!
//! ```rust,ignore
//! use fabula::ui::{self, UiContext, PageProgress};
//!
//! let ctx = UiContext::detect().with_plain(args.plain);
//!
//! ui::intro(&ctx, "fabula generate");
//!
//! let progress = PageProgress::new(&ctx, 12);
//! // ... generate pages, calling progress.on_page(...) ...
//! progress.finish();
//!
//! ui::step_ok(&ctx, "12 pages up to date");
//! ui::outro_success(&ctx, "Version 3 complete");
//! ```

mod context;
mod output;
mod progress;
mod prompts;
mod theme;

pub use context::UiContext;
pub use output::{
    intro, key_value, outro_error, outro_success, outro_warn, remark, step_error,
    step_error_detail, step_info, step_ok, step_ok_detail, step_warn, step_warn_hint,
};
pub use progress::{PageProgress, TaskSpinner};
pub use prompts::input;
pub use theme::{init_theme, FabulaTheme};
