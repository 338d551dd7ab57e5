//! cliclack prompt theme

use cliclack::ThemeState;
use console::Style;

/// Cyan-accented theme matching the step output colors
#[derive(Debug, Clone, Default)]
pub struct FabulaTheme;

impl cliclack::Theme for FabulaTheme {
    fn bar_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().cyan(),
            ThemeState::Error(_) => Style::new().red(),
            ThemeState::Submit | ThemeState::Cancel => Style::new().dim(),
        }
    }

    fn state_symbol_color(&self, state: &ThemeState) -> Style {
        match state {
            ThemeState::Active => Style::new().cyan(),
            ThemeState::Error(_) | ThemeState::Cancel => Style::new().red(),
            ThemeState::Submit => Style::new().green(),
        }
    }
}

/// Install the theme process-wide; called once from `main`
pub fn init_theme() {
    cliclack::set_theme(FabulaTheme);
}
