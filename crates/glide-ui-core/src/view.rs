//! Measurable, paintable descriptions of one rendered record.
//!
//! Components translate a data record into an [`ItemView`]: resolved root attributes, an optional
//! media slot, and an ordered list of content slots. The view knows how tall it is at a given
//! width and how to paint itself, which is all a collection layout needs.
use crate::interaction::Interaction;
use crate::media::Media;
use crate::render;
use crate::theme::Theme;
use crate::variant::Attrs;
use crate::variant::Border;
use crate::variant::Direction;
use crate::wrapping;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;

/// A wrapped, optionally clamped run of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    pub text: String,
    pub attrs: Attrs,
    /// Maximum wrapped lines; `None` shows everything.
    pub clamp: Option<usize>,
    /// Keep to one line and cut with an ellipsis.
    pub truncate: bool,
}

impl TextBlock {
    pub fn new(text: impl Into<String>, attrs: Attrs) -> Self {
        Self {
            text: text.into(),
            attrs,
            clamp: None,
            truncate: false,
        }
    }

    pub fn clamp(mut self, clamp: Option<usize>) -> Self {
        self.clamp = clamp;
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    pub fn lines(&self, width: u16) -> Vec<String> {
        if self.text.is_empty() || width == 0 {
            return Vec::new();
        }
        if self.truncate {
            let first = self.text.lines().next().unwrap_or_default();
            return vec![wrapping::truncate_to_width(first, width)];
        }
        wrapping::wrap_clamped(&self.text, width, self.clamp)
    }

    pub fn height(&self, width: u16) -> u16 {
        self.lines(width).len() as u16
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) -> u16 {
        let style = self.attrs.text_style(theme);
        let align = self.attrs.alignment();
        let mut used = 0u16;
        for (i, line) in self.lines(area.width).iter().enumerate() {
            let y = area.y + i as u16;
            if y >= area.bottom() {
                break;
            }
            render::render_aligned(area, y, buf, line, style, align);
            used += 1;
        }
        used
    }
}

/// One vertical section of an item view.
#[derive(Clone, Debug, PartialEq)]
pub enum Slot {
    Text(TextBlock),
    /// Pre-styled rows supplied by a custom renderer.
    Lines(Vec<Line<'static>>),
    /// Blocks laid out on one row, separated by a space, when they fit; stacked otherwise.
    Inline(Vec<TextBlock>),
    Separator,
    Spacer(u16),
    /// A nested view, e.g. a media row inside a cover.
    View(Box<ItemView>),
}

fn inline_fits(blocks: &[TextBlock], width: u16) -> bool {
    let parts: Vec<&TextBlock> = blocks.iter().filter(|b| !b.text.is_empty()).collect();
    let total: usize = parts.iter().map(|b| render::display_width(&b.text)).sum::<usize>()
        + parts.len().saturating_sub(1);
    parts.iter().all(|b| !b.text.contains('\n')) && total <= width as usize
}

impl Slot {
    pub fn text(text: impl Into<String>, attrs: Attrs) -> Self {
        Slot::Text(TextBlock::new(text, attrs))
    }

    pub fn height(&self, width: u16) -> u16 {
        match self {
            Slot::Text(t) => t.height(width),
            Slot::Lines(lines) => lines.len() as u16,
            Slot::Inline(blocks) => {
                if blocks.iter().all(|b| b.text.is_empty()) {
                    0
                } else if inline_fits(blocks, width) {
                    1
                } else {
                    blocks.iter().map(|b| b.height(width)).sum()
                }
            }
            Slot::Separator => 1,
            Slot::Spacer(h) => *h,
            Slot::View(v) => v.height(width),
        }
    }

    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, base: Style) {
        match self {
            Slot::Text(t) => {
                t.render(area, buf, theme);
            }
            Slot::Lines(lines) => {
                for (i, line) in lines.iter().enumerate() {
                    let y = area.y + i as u16;
                    if y >= area.bottom() {
                        break;
                    }
                    render::render_line_clipped(area.x, y, area.width, buf, line, base);
                }
            }
            Slot::Inline(blocks) => {
                if inline_fits(blocks, area.width) {
                    let mut x = area.x;
                    for b in blocks.iter().filter(|b| !b.text.is_empty()) {
                        let used = render::render_str_clipped(
                            x,
                            area.y,
                            area.right().saturating_sub(x),
                            buf,
                            &b.text,
                            b.attrs.text_style(theme),
                        );
                        x = x.saturating_add(used + 1);
                    }
                } else {
                    let mut y = area.y;
                    for b in blocks {
                        if y >= area.bottom() {
                            break;
                        }
                        let h = b.height(area.width).min(area.bottom() - y);
                        b.render(Rect::new(area.x, y, area.width, h), buf, theme);
                        y += h;
                    }
                }
            }
            Slot::Separator => {
                let rule = "─".repeat(area.width as usize);
                render::render_str_clipped(area.x, area.y, area.width, buf, &rule, theme.border);
            }
            Slot::Spacer(_) => {}
            Slot::View(v) => v.render(area, buf, theme, false),
        }
    }
}

/// Media plus the attributes that size it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaSlot {
    pub media: Media,
    pub attrs: Attrs,
}

impl MediaSlot {
    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let inner = frame(&self.attrs, area, buf, theme.border);
        self.media.render(inner, buf, theme);
    }
}

/// Paints the border of `attrs` into `area` and returns the area inside border and padding.
pub fn frame(attrs: &Attrs, area: Rect, buf: &mut Buffer, border_style: Style) -> Rect {
    let border = attrs.border.unwrap_or_default();
    let inner = if border == Border::None {
        area
    } else {
        let kind = match border {
            Border::Rounded => BorderType::Rounded,
            Border::Thick => BorderType::Thick,
            _ => BorderType::Plain,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(kind)
            .border_style(border_style);
        let inner = block.inner(area);
        block.render(area, buf);
        inner
    };
    let p = attrs.padding_or_zero();
    Rect::new(
        inner.x.saturating_add(p.left),
        inner.y.saturating_add(p.top),
        inner.width.saturating_sub(p.left + p.right),
        inner.height.saturating_sub(p.top + p.bottom),
    )
}

/// Default media height in rows for vertical layouts.
pub const DEFAULT_MEDIA_HEIGHT: u16 = 3;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemView {
    pub interaction: Interaction,
    pub aria_label: Option<String>,
    pub attrs: Attrs,
    pub media: Option<MediaSlot>,
    pub slots: Vec<Slot>,
    /// Short block pinned to the top-right corner of the content, e.g. an actions glyph.
    pub trailing: Option<TextBlock>,
}

impl ItemView {
    pub fn new(attrs: Attrs) -> Self {
        Self {
            attrs,
            ..Self::default()
        }
    }

    pub fn interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = interaction;
        self
    }

    pub fn aria_label(mut self, label: Option<String>) -> Self {
        self.aria_label = label;
        self
    }

    pub fn media(mut self, media: Media, attrs: Attrs) -> Self {
        self.media = Some(MediaSlot { media, attrs });
        self
    }

    pub fn slot(mut self, slot: Slot) -> Self {
        self.slots.push(slot);
        self
    }

    pub fn push(&mut self, slot: Slot) {
        self.slots.push(slot);
    }

    pub fn trailing(mut self, block: TextBlock) -> Self {
        self.trailing = Some(block);
        self
    }

    fn trailing_width(&self) -> u16 {
        self.trailing
            .as_ref()
            .map(|t| render::display_width(&t.text) as u16 + 1)
            .unwrap_or(0)
    }

    fn horizontal(&self) -> bool {
        self.attrs.direction.unwrap_or_default() == Direction::Horizontal
    }

    fn gap(&self) -> u16 {
        self.attrs.gap.unwrap_or(0)
    }

    fn media_width(&self, inner_w: u16) -> u16 {
        let Some(m) = &self.media else {
            return 0;
        };
        if !self.horizontal() {
            return inner_w;
        }
        m.attrs
            .width
            .unwrap_or(inner_w / 3)
            .min(inner_w.saturating_sub(1))
    }

    fn media_height(&self) -> u16 {
        self.media
            .as_ref()
            .map(|m| m.attrs.height.unwrap_or(DEFAULT_MEDIA_HEIGHT))
            .unwrap_or(0)
    }

    fn content_width(&self, inner_w: u16) -> u16 {
        let w = if self.horizontal() && self.media.is_some() {
            inner_w.saturating_sub(self.media_width(inner_w) + 1)
        } else {
            inner_w
        };
        w.saturating_sub(self.trailing_width())
    }

    fn slots_height(&self, width: u16) -> u16 {
        let gap = self.gap();
        let mut total = 0u16;
        let mut first = true;
        for slot in &self.slots {
            let h = slot.height(width);
            if h == 0 {
                continue;
            }
            if !first {
                total += gap;
            }
            total += h;
            first = false;
        }
        total
    }

    /// Total rows needed at `width` columns, including border and padding.
    pub fn height(&self, width: u16) -> u16 {
        let (cw, ch) = self.attrs.chrome();
        let inner_w = width.saturating_sub(cw);
        let content_w = self.content_width(inner_w);
        let slots_h = self.slots_height(content_w);
        let media_h = self.media_height();
        let body = if self.horizontal() {
            slots_h.max(media_h)
        } else if self.media.is_some() && slots_h > 0 {
            media_h + self.gap() + slots_h
        } else {
            media_h + slots_h
        };
        let h = self.attrs.height.unwrap_or(body + ch);
        h.max(self.attrs.min_height.unwrap_or(0)).max(1)
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme, focused: bool) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let base = self.attrs.text_style(theme);
        buf.set_style(area, self.attrs.style);
        if focused {
            buf.set_style(area, theme.focus);
        }

        let border_style = if focused { theme.accent } else { theme.border };
        let inner = frame(&self.attrs, area, buf, border_style);

        let mut content = inner;
        if let Some(m) = &self.media {
            if self.horizontal() {
                let mw = self.media_width(inner.width);
                m.render(Rect::new(inner.x, inner.y, mw, inner.height), buf, theme);
                content = Rect::new(
                    inner.x + mw + 1,
                    inner.y,
                    inner.width.saturating_sub(mw + 1),
                    inner.height,
                );
            } else {
                let mh = self.media_height().min(inner.height);
                let mw = m.attrs.width.unwrap_or(inner.width).min(inner.width);
                let mx = render::aligned_x(inner, mw, m.attrs.alignment());
                m.render(Rect::new(mx, inner.y, mw, mh), buf, theme);
                let skip = (mh + self.gap()).min(inner.height);
                content = Rect::new(
                    inner.x,
                    inner.y + skip,
                    inner.width,
                    inner.height - skip,
                );
            }
        }

        if let Some(t) = self.trailing.as_ref().filter(|_| content.height > 0) {
            // One blank column separates the trailing block from the slots.
            let tw = self.trailing_width().min(content.width);
            if tw > 1 {
                let tx = content.right() - tw + 1;
                t.render(Rect::new(tx, content.y, tw - 1, 1), buf, theme);
            }
            content.width -= tw;
        }

        let gap = self.gap();
        let mut y = content.y;
        let mut first = true;
        for slot in &self.slots {
            let h = slot.height(content.width);
            if h == 0 {
                continue;
            }
            if !first {
                y = y.saturating_add(gap);
            }
            first = false;
            if y >= content.bottom() {
                break;
            }
            let h = h.min(content.bottom() - y);
            slot.render(Rect::new(content.x, y, content.width, h), buf, theme, base);
            y += h;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::TextScale;
    use ratatui::widgets::Padding;

    #[test]
    fn height_counts_wrapped_slots_gap_and_chrome() {
        let view = ItemView::new(
            Attrs::new()
                .border(Border::Plain)
                .gap(1)
                .padding(Padding::horizontal(1)),
        )
        .slot(Slot::text("Title", Attrs::new().scale(TextScale::Lg)))
        .slot(Slot::text("one two three", Attrs::new()));
        // inner width 10 - 2 border - 2 padding = 6: "one", "two", "three"
        assert_eq!(view.height(10), 2 + 1 + 1 + 3);
    }

    #[test]
    fn empty_slots_take_no_space() {
        let view = ItemView::new(Attrs::new().gap(1))
            .slot(Slot::text("", Attrs::new()))
            .slot(Slot::text("x", Attrs::new()));
        assert_eq!(view.height(10), 1);
    }

    #[test]
    fn vertical_media_sits_above_text() {
        let view = ItemView::new(Attrs::new())
            .media(Media::Placeholder, Attrs::new().height(2))
            .slot(Slot::text("Caption", Attrs::new()));
        assert_eq!(view.height(12), 3);
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf, &Theme::default(), false);
        let lines = render::buffer_lines(&buf);
        assert_eq!(lines[2], "Caption");
    }

    #[test]
    fn horizontal_media_sits_left_of_text() {
        let view = ItemView::new(Attrs::new().direction(Direction::Horizontal))
            .media(Media::Placeholder, Attrs::new().width(3).height(1))
            .slot(Slot::text("Hi", Attrs::new()));
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf, &Theme::default(), false);
        assert_eq!(render::buffer_lines(&buf)[0], " ▣  Hi");
    }

    #[test]
    fn truncated_text_is_one_line() {
        let block = TextBlock::new("a very long heading", Attrs::new()).truncate(true);
        assert_eq!(block.lines(8), vec!["a very …".to_string()]);
    }

    #[test]
    fn inline_blocks_share_a_row_when_they_fit() {
        let slot = Slot::Inline(vec![
            TextBlock::new("Build", Attrs::new()),
            TextBlock::new("faster", Attrs::new()),
        ]);
        assert_eq!(slot.height(20), 1);
        assert_eq!(slot.height(8), 2);
        let view = ItemView::new(Attrs::new()).slot(slot);
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf, &Theme::default(), false);
        assert_eq!(render::buffer_lines(&buf)[0], "Build faster");
    }

    #[test]
    fn min_height_pads_short_views() {
        let view = ItemView::new(Attrs::new().min_height(4)).slot(Slot::text("x", Attrs::new()));
        assert_eq!(view.height(5), 4);
    }

    #[test]
    fn trailing_block_pins_to_the_right() {
        let view = ItemView::new(Attrs::new())
            .slot(Slot::text("alpha beta", Attrs::new()))
            .trailing(TextBlock::new("⋮", Attrs::new()));
        // 12 columns minus "⋮" and its gap leaves 10 for the text.
        assert_eq!(view.height(12), 1);
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf, &Theme::default(), false);
        assert_eq!(render::buffer_lines(&buf)[0], "alpha beta ⋮");
    }
}
