//! Interactive vs plain output detection

use std::io::IsTerminal;

/// CI indicators that force plain output even on a TTY
const CI_VARS: [&str; 9] = [
    "CI",
    "GITHUB_ACTIONS",
    "GITLAB_CI",
    "CIRCLECI",
    "TRAVIS",
    "JENKINS_URL",
    "BUILDKITE",
    "TEAMCITY_VERSION",
    "TF_BUILD",
];

/// Decides whether commands may show spinners, styled steps and prompts
#[derive(Debug, Clone)]
pub struct UiContext {
    interactive: bool,
    plain: bool,
}

impl UiContext {
    /// Detect from the terminal and environment
    pub fn detect() -> Self {
        Self {
            interactive: detect_interactive(),
            plain: false,
        }
    }

    /// A context that never prompts or animates
    pub fn non_interactive() -> Self {
        Self {
            interactive: false,
            plain: false,
        }
    }

    /// Apply the `--plain` flag or `ui.plain` config override
    pub fn with_plain(mut self, plain: bool) -> Self {
        self.plain = plain;
        self
    }

    /// Whether prompts may be shown
    pub fn is_interactive(&self) -> bool {
        self.interactive && !self.plain
    }

    /// Whether to use spinners, bars and styled step lines
    pub fn use_fancy_output(&self) -> bool {
        self.interactive && !self.plain
    }
}

/// Both stdio ends must be TTYs and no CI marker may be set
fn detect_interactive() -> bool {
    if !std::io::stdout().is_terminal() || !std::io::stdin().is_terminal() {
        return false;
    }
    CI_VARS.iter().all(|var| std::env::var_os(var).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_interactive_context() {
        let ctx = UiContext::non_interactive();
        assert!(!ctx.is_interactive());
        assert!(!ctx.use_fancy_output());
    }

    #[test]
    fn plain_overrides_interactivity() {
        let ctx = UiContext {
            interactive: true,
            plain: false,
        }
        .with_plain(true);
        assert!(!ctx.use_fancy_output());
        assert!(!ctx.is_interactive());
    }
}
