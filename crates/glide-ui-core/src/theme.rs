use crate::variant::TextScale;
use crate::variant::Tone;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;

/// Design tokens mapped onto terminal styles.
///
/// Components never hard-code colors; they resolve a [`Tone`] or [`TextScale`] token and ask the
/// theme for the matching style.
#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub success: Style,
    pub warning: Style,
    pub border: Style,
    pub surface: Style,
    pub surface_muted: Style,
    pub surface_dark: Style,
    pub link: Style,
    pub focus: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            danger: Style::default().red(),
            success: Style::default().green(),
            warning: Style::default().yellow(),
            border: Style::default().dark_gray(),
            surface: Style::default(),
            surface_muted: Style::default().bg(Color::Rgb(30, 30, 36)),
            surface_dark: Style::default().bg(Color::Rgb(15, 23, 42)).white(),
            link: Style::default().cyan().add_modifier(Modifier::UNDERLINED),
            focus: Style::default().bg(Color::Rgb(40, 44, 52)),
        }
    }
}

impl Theme {
    pub fn tone_style(&self, tone: Tone) -> Style {
        match tone {
            Tone::Default => self.text_primary,
            Tone::Muted => self.text_muted,
            Tone::Primary => self.accent,
            Tone::Destructive => self.danger,
            Tone::Success => self.success,
            Tone::Warning => self.warning,
        }
    }

    /// Terminals have a single font size; larger scales become emphasis instead.
    pub fn scale_style(&self, scale: TextScale) -> Style {
        if scale >= TextScale::X3l {
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else if scale >= TextScale::Lg {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn larger_scales_add_emphasis() {
        let theme = Theme::default();
        assert!(!theme.scale_style(TextScale::Sm).add_modifier.contains(Modifier::BOLD));
        assert!(theme.scale_style(TextScale::Xl).add_modifier.contains(Modifier::BOLD));
        assert!(
            theme
                .scale_style(TextScale::X4l)
                .add_modifier
                .contains(Modifier::UNDERLINED)
        );
    }
}
