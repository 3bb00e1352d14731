use crate::render;
use crate::theme::Theme;
use crate::wrapping;
use ratatui::buffer::Buffer;
use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::Modifier;

/// Glyph drawn where an image is missing.
pub const PLACEHOLDER_GLYPH: &str = "▣";

/// Glyph drawn on video frames.
pub const PLAY_GLYPH: &str = "▶";

/// Visual media attached to a record.
///
/// Terminals cannot show bitmaps, so images render as a framed caption of their alt text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Media {
    Image { src: String, alt: String },
    Video { src: String, title: String },
    Placeholder,
}

impl Media {
    /// An image when `src` is present and non-empty, else a placeholder.
    pub fn image_or_placeholder(src: Option<&str>, alt: Option<&str>) -> Self {
        match src {
            Some(src) if !src.is_empty() => Media::Image {
                src: src.to_string(),
                alt: alt.unwrap_or_default().to_string(),
            },
            _ => Media::Placeholder,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Media::Placeholder)
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        buf.set_style(area, theme.surface_muted);
        let mid = area.y + area.height.saturating_sub(1) / 2;
        match self {
            Media::Placeholder => {
                render::render_aligned(
                    area,
                    mid,
                    buf,
                    PLACEHOLDER_GLYPH,
                    theme.surface_muted.patch(theme.text_muted),
                    Alignment::Center,
                );
            }
            Media::Image { src, alt } => {
                let caption = if alt.is_empty() { src.as_str() } else { alt };
                let caption = wrapping::truncate_to_width(caption, area.width);
                render::render_aligned(
                    area,
                    mid,
                    buf,
                    &caption,
                    theme
                        .surface_muted
                        .patch(theme.text_muted)
                        .add_modifier(Modifier::ITALIC),
                    Alignment::Center,
                );
            }
            Media::Video { src, title } => {
                let label = if title.is_empty() { src.as_str() } else { title };
                let caption = format!("{PLAY_GLYPH} {label}");
                let caption = wrapping::truncate_to_width(&caption, area.width);
                render::render_aligned(
                    area,
                    mid,
                    buf,
                    &caption,
                    theme.surface_muted.patch(theme.accent),
                    Alignment::Center,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_or_empty_src_is_placeholder() {
        assert!(Media::image_or_placeholder(None, Some("x")).is_placeholder());
        assert!(Media::image_or_placeholder(Some(""), None).is_placeholder());
        assert!(!Media::image_or_placeholder(Some("/a.png"), None).is_placeholder());
    }

    #[test]
    fn placeholder_draws_glyph() {
        let area = Rect::new(0, 0, 5, 3);
        let mut buf = Buffer::empty(area);
        Media::Placeholder.render(area, &mut buf, &Theme::default());
        let lines = render::buffer_lines(&buf);
        assert_eq!(lines[1].trim(), PLACEHOLDER_GLYPH);
    }
}
