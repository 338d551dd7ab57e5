//! Leveled command output
//!
//! Fancy mode routes through cliclack so step lines join the prompt log;
//! plain mode prints tagged lines that stay greppable in CI. Print results
//! are discarded, output is never worth failing a command over.

use super::context::UiContext;
use console::{style, Style};

/// Severity of a step line, carrying its plain-mode tag and color
enum Tone {
    Ok,
    Warn,
    Fail,
    Info,
}

impl Tone {
    fn tag(&self) -> &'static str {
        match self {
            Tone::Ok => "[OK]",
            Tone::Warn => "[WARN]",
            Tone::Fail => "[FAIL]",
            Tone::Info => "[INFO]",
        }
    }

    fn paint(&self) -> Style {
        match self {
            Tone::Ok => Style::new().green(),
            Tone::Warn => Style::new().yellow(),
            Tone::Fail => Style::new().red(),
            Tone::Info => Style::new().cyan(),
        }
    }

    fn log(&self, text: String) {
        let _ = match self {
            Tone::Ok => cliclack::log::success(text),
            Tone::Warn => cliclack::log::warning(text),
            Tone::Fail => cliclack::log::error(text),
            Tone::Info => cliclack::log::info(text),
        };
    }
}

/// One step line; `fancy` may carry inline styling, `plain` must not
fn step(ctx: &UiContext, tone: Tone, fancy: String, plain: String) {
    if ctx.use_fancy_output() {
        tone.log(fancy);
    } else {
        println!("  {} {}", tone.paint().apply_to(tone.tag()), plain);
    }
}

/// Closing line of a command's output block
fn close(ctx: &UiContext, badge: &'static str, paint: Style, message: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::outro(paint.bold().apply_to(message));
    } else {
        println!();
        println!("{} {}", paint.apply_to(badge), message);
    }
}

/// Open a command's output block
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::intro(style(title).cyan().bold());
    } else {
        println!("{}", style(title).cyan().bold());
        println!();
    }
}

/// Close the block after a successful run
pub fn outro_success(ctx: &UiContext, message: &str) {
    close(ctx, "[OK]", Style::new().green(), message);
}

/// Close the block after a failure
pub fn outro_error(ctx: &UiContext, message: &str) {
    close(ctx, "[ERROR]", Style::new().red(), message);
}

/// Close the block with a warning
pub fn outro_warn(ctx: &UiContext, message: &str) {
    close(ctx, "[WARN]", Style::new().yellow(), message);
}

/// Step line for a completed action
pub fn step_ok(ctx: &UiContext, message: &str) {
    step(ctx, Tone::Ok, message.to_string(), message.to_string());
}

/// Completed action with a dimmed detail in parentheses
pub fn step_ok_detail(ctx: &UiContext, message: &str, detail: &str) {
    step(
        ctx,
        Tone::Ok,
        format!("{message} ({})", style(detail).dim()),
        format!("{message} ({detail})"),
    );
}

/// Step line for a warning
pub fn step_warn(ctx: &UiContext, message: &str) {
    step(ctx, Tone::Warn, message.to_string(), message.to_string());
}

/// Warning with a dimmed follow-up hint
pub fn step_warn_hint(ctx: &UiContext, message: &str, hint: &str) {
    step(
        ctx,
        Tone::Warn,
        format!("{message} - {}", style(hint).dim()),
        format!("{message} - {hint}"),
    );
}

/// Step line for a failure
pub fn step_error(ctx: &UiContext, message: &str) {
    step(ctx, Tone::Fail, message.to_string(), message.to_string());
}

/// Failure with the underlying cause appended
pub fn step_error_detail(ctx: &UiContext, message: &str, detail: &str) {
    step(
        ctx,
        Tone::Fail,
        format!("{message}: {}", style(detail).red()),
        format!("{message}: {detail}"),
    );
}

/// Neutral step line
pub fn step_info(ctx: &UiContext, message: &str) {
    step(ctx, Tone::Info, message.to_string(), message.to_string());
}

/// Dimmed aside below the current step
pub fn remark(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        let _ = cliclack::log::remark(message);
    } else {
        println!("  {}", style(message).dim());
    }
}

/// Aligned `key: value` line
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {key}: {value}");
    }
}
