//! Interactive prompts with CI/non-interactive fallback

use super::context::UiContext;
use crate::error::FabulaResult;

/// Prompt for a line of free text, returns None if non-interactive
/// or the user submitted an empty answer.
pub async fn input(ctx: &UiContext, message: &str) -> FabulaResult<Option<String>> {
    // Non-interactive mode cannot ask
    if !ctx.is_interactive() {
        return Ok(None);
    }

    // Run blocking cliclack prompt in spawn_blocking
    let message = message.to_string();
    let result = tokio::task::spawn_blocking(move || {
        cliclack::input(&message)
            .required(false)
            .interact::<String>()
    })
    .await
    .map_err(|e| crate::error::FabulaError::User(format!("Prompt task failed: {}", e)))?;

    let answer = result
        .map_err(|e| crate::error::FabulaError::User(format!("Prompt failed: {}", e)))?;

    let trimmed = answer.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
