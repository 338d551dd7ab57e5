//! Check command - validate the content base

use crate::config::Config;
use crate::content::validate::{self, Severity};
use crate::error::{FabulaError, FabulaResult};
use crate::ui::{self, UiContext};

/// Execute the check command
pub async fn execute(config: &Config) -> FabulaResult<()> {
    let ctx = UiContext::detect().with_plain(config.ui.plain);
    ui::intro(&ctx, "fabula check");

    let report = validate::run(&config.paths);

    for finding in &report.findings {
        match finding.severity {
            Severity::Error => ui::step_error(&ctx, &finding.message),
            Severity::Warning => ui::step_warn(&ctx, &finding.message),
        }
    }

    let errors = report.errors();
    let warnings = report.warnings();

    if report.has_errors() {
        ui::outro_error(&ctx, &format!("{errors} error(s), {warnings} warning(s)"));
        return Err(FabulaError::User(format!(
            "content check failed with {errors} error(s)"
        )));
    }

    if warnings > 0 {
        ui::outro_warn(
            &ctx,
            &format!("Content base is usable, {warnings} warning(s)"),
        );
    } else {
        ui::outro_success(&ctx, "Content base is valid");
    }

    Ok(())
}
