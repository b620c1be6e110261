//! Terminal color theme with a plain fallback for pipes and scripts

use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Styles for the output jobtrack renders: headers and sections, the
/// success/error/warn status lines, info context lines, and dimmed totals.
#[derive(Debug, Clone)]
pub struct Theme {
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub info: Style,
    pub dim: Style,
}

impl Theme {
    /// Colored when stdout is a terminal, plain when piped
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            info: Style::new().magenta(),
            dim: Style::new().white().dimmed(),
        }
    }

    pub fn plain() -> Self {
        Self {
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            info: Style::new(),
            dim: Style::new(),
        }
    }
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;
    use owo_colors::OwoColorize;

    #[test]
    fn test_plain_theme_leaves_text_unstyled() {
        let theme = Theme::plain();
        assert_eq!("42 active".style(theme.dim.clone()).to_string(), "42 active");
        assert_eq!("done".style(theme.success.clone()).to_string(), "done");
    }

    #[test]
    fn test_colored_theme_wraps_text_in_escapes() {
        let theme = Theme::colored();
        let styled = "Pipeline".style(theme.header.clone()).to_string();
        assert!(styled.contains("Pipeline"));
        assert_ne!(styled, "Pipeline");
    }
}
