//! Typography primitive.
use crate::render;
use crate::theme::Theme;
use crate::variant::Attrs;
use crate::variant::Recipe;
use crate::variant::TextAlign;
use crate::variant::TextScale;
use crate::variant::Tone;
use crate::variant_axis;
use crate::view::TextBlock;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use std::sync::LazyLock;

variant_axis! {
    pub enum TextVariant default P {
        H1 => "h1",
        H2 => "h2",
        H3 => "h3",
        H4 => "h4",
        P => "p",
        Lead => "lead",
        Large => "large",
        Small => "small",
        Muted => "muted",
        Code => "code",
    }
}

variant_axis! {
    pub enum FontWeight default Normal {
        Light => "light",
        Normal => "normal",
        Medium => "medium",
        Semibold => "semibold",
        Bold => "bold",
        Extrabold => "extrabold",
    }
}

variant_axis! {
    pub enum TextTransform default None {
        None => "none",
        Uppercase => "uppercase",
        Lowercase => "lowercase",
        Capitalize => "capitalize",
    }
}

pub static VARIANT: LazyLock<Recipe<TextVariant>> = LazyLock::new(|| {
    Recipe::<TextVariant>::new(Attrs::new()).axis(|v| match v {
        TextVariant::H1 => Attrs::new().scale(TextScale::X4l).modifier(Modifier::BOLD),
        TextVariant::H2 => Attrs::new().scale(TextScale::X3l).modifier(Modifier::BOLD),
        TextVariant::H3 => Attrs::new().scale(TextScale::X2l).modifier(Modifier::BOLD),
        TextVariant::H4 => Attrs::new().scale(TextScale::Xl).modifier(Modifier::BOLD),
        TextVariant::P => Attrs::new(),
        TextVariant::Lead => Attrs::new().scale(TextScale::Xl).tone(Tone::Muted),
        TextVariant::Large => Attrs::new().scale(TextScale::Lg).modifier(Modifier::BOLD),
        TextVariant::Small => Attrs::new().scale(TextScale::Sm),
        TextVariant::Muted => Attrs::new().scale(TextScale::Sm).tone(Tone::Muted),
        TextVariant::Code => Attrs::new().scale(TextScale::Sm).modifier(Modifier::BOLD),
    })
});

impl FontWeight {
    pub fn modifier(self) -> Modifier {
        match self {
            FontWeight::Light => Modifier::DIM,
            FontWeight::Normal | FontWeight::Medium => Modifier::empty(),
            FontWeight::Semibold | FontWeight::Bold | FontWeight::Extrabold => Modifier::BOLD,
        }
    }
}

impl TextTransform {
    pub fn apply(self, text: &str) -> String {
        match self {
            TextTransform::None => text.to_string(),
            TextTransform::Uppercase => text.to_uppercase(),
            TextTransform::Lowercase => text.to_lowercase(),
            TextTransform::Capitalize => {
                let mut out = String::with_capacity(text.len());
                let mut at_word_start = true;
                for c in text.chars() {
                    if at_word_start && c.is_alphanumeric() {
                        out.extend(c.to_uppercase());
                        at_word_start = false;
                    } else {
                        out.push(c);
                        at_word_start = c.is_whitespace();
                    }
                }
                out
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Text {
    pub content: String,
    pub variant: TextVariant,
    pub size: Option<TextScale>,
    pub weight: Option<FontWeight>,
    pub align: TextAlign,
    pub color: Tone,
    pub transform: TextTransform,
    /// One line, cut with an ellipsis.
    pub truncate: bool,
    /// Maximum wrapped lines, 1 through 6.
    pub clamp: Option<u8>,
}

impl Text {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn variant(mut self, variant: TextVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: TextScale) -> Self {
        self.size = Some(size);
        self
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    pub fn color(mut self, color: Tone) -> Self {
        self.color = color;
        self
    }

    pub fn transform(mut self, transform: TextTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn clamp(mut self, lines: u8) -> Self {
        self.clamp = Some(lines.clamp(1, 6));
        self
    }

    /// Variant styles first, then the explicit size, weight, alignment and color.
    pub fn attrs(&self) -> Attrs {
        let mut attrs = VARIANT.resolve(&self.variant);
        if let Some(size) = self.size {
            attrs = attrs.scale(size);
        }
        if let Some(weight) = self.weight {
            attrs.style = attrs.style.remove_modifier(Modifier::BOLD | Modifier::DIM);
            attrs = attrs.modifier(weight.modifier());
        }
        if self.color != Tone::Default || attrs.tone.is_none() {
            attrs = attrs.tone(self.color);
        }
        attrs.align(self.align)
    }

    pub fn block(&self) -> TextBlock {
        TextBlock::new(self.transform.apply(&self.content), self.attrs())
            .truncate(self.truncate)
            .clamp(self.clamp.map(usize::from))
    }

    /// H2 headings carry a rule underneath.
    fn has_rule(&self) -> bool {
        self.variant == TextVariant::H2
    }

    pub fn height(&self, width: u16) -> u16 {
        self.block().height(width) + u16::from(self.has_rule())
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let block = self.block();
        let text_h = block.height(area.width).min(area.height);
        let text_area = Rect::new(area.x, area.y, area.width, text_h);
        if self.variant == TextVariant::Code {
            let w = block
                .lines(area.width)
                .iter()
                .map(|l| render::display_width(l))
                .max()
                .unwrap_or(0) as u16;
            let x = render::aligned_x(area, w, block.attrs.alignment());
            buf.set_style(Rect::new(x, area.y, w, text_h), theme.surface_muted);
        }
        block.render(text_area, buf, theme);
        if self.has_rule() && text_h < area.height {
            let rule = "─".repeat(area.width as usize);
            render::render_str_clipped(
                area.x,
                area.y + text_h,
                area.width,
                buf,
                &rule,
                theme.border,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::buffer_lines;
    use crate::variant::Variant;

    #[test]
    fn variants_map_to_scale_and_tone() {
        let h1 = Text::new("x").variant(TextVariant::H1).attrs();
        assert_eq!(h1.scale, Some(TextScale::X4l));
        let lead = Text::new("x").variant(TextVariant::Lead).attrs();
        assert_eq!(lead.tone, Some(Tone::Muted));
        let colored = Text::new("x")
            .variant(TextVariant::Lead)
            .color(Tone::Destructive)
            .attrs();
        assert_eq!(colored.tone, Some(Tone::Destructive));
    }

    #[test]
    fn explicit_weight_replaces_variant_weight() {
        let light = Text::new("x")
            .variant(TextVariant::H3)
            .weight(FontWeight::Light)
            .attrs();
        assert!(light.style.add_modifier.contains(Modifier::DIM));
        assert!(!light.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn transforms() {
        assert_eq!(TextTransform::Capitalize.apply("hello big world"), "Hello Big World");
        assert_eq!(TextTransform::Uppercase.apply("abc"), "ABC");
        assert_eq!(TextTransform::Lowercase.apply("AbC"), "abc");
    }

    #[test]
    fn clamp_and_truncate_limit_height() {
        let long = "one two three four five six seven eight";
        assert_eq!(Text::new(long).clamp(2).height(10), 2);
        assert_eq!(Text::new(long).truncate(true).height(10), 1);
        assert_eq!(Text::new(long).clamp(9).clamp, Some(6));
    }

    #[test]
    fn h2_draws_rule() {
        let t = Text::new("Section").variant(TextVariant::H2);
        assert_eq!(t.height(20), 2);
        let area = Rect::new(0, 0, 10, 2);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        assert_eq!(buffer_lines(&buf), vec!["Section", "──────────"]);
    }

    #[test]
    fn right_alignment() {
        let area = Rect::new(0, 0, 8, 1);
        let mut buf = Buffer::empty(area);
        Text::new("end")
            .align(TextAlign::Right)
            .render(area, &mut buf, &Theme::default());
        assert_eq!(buffer_lines(&buf), vec!["     end"]);
    }

    #[test]
    fn every_variant_renders() {
        for v in TextVariant::ALL {
            let area = Rect::new(0, 0, 12, 2);
            let mut buf = Buffer::empty(area);
            Text::new("Sample").variant(*v).render(area, &mut buf, &Theme::default());
            assert!(buffer_lines(&buf)[0].contains("Sample"), "{v}");
        }
    }
}
