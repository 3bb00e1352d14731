use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::Line;
use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

pub const ELLIPSIS: &str = "…";

pub fn render_scrollbar(area: Rect, buf: &mut Buffer, state: &ViewportState, style: Style) {
    buf.set_style(area, style);
    if area.height == 0 {
        return;
    }
    if state.content_h <= state.viewport_h as u32 || state.content_h == 0 {
        for dy in 0..area.height {
            buf.set_stringn(area.x, area.y + dy, " ", 1, style);
        }
        return;
    }

    let track_h = area.height as f64;
    let thumb_h = ((state.viewport_h as f64 / state.content_h as f64) * track_h)
        .round()
        .clamp(1.0, track_h) as u16;

    let max_y = state
        .content_h
        .saturating_sub(state.viewport_h as u32)
        .max(1) as f64;
    let thumb_top = ((state.y as f64 / max_y) * (track_h - thumb_h as f64))
        .round()
        .clamp(0.0, (track_h - thumb_h as f64).max(0.0)) as u16;

    for dy in 0..area.height {
        let ch = if dy >= thumb_top && dy < thumb_top + thumb_h {
            "█"
        } else {
            "│"
        };
        buf.set_stringn(area.x, area.y + dy, ch, 1, style);
    }
}

/// Cursor over one buffer row that writes characters column by column.
///
/// Tabs expand to four spaces, zero-width characters are dropped, and a wide character that
/// would straddle the right edge is not drawn at all.
struct RowWriter<'a> {
    buf: &'a mut Buffer,
    x: u16,
    y: u16,
    max_cols: usize,
    out_cols: usize,
}

impl RowWriter<'_> {
    fn push_str(&mut self, s: &str, style: Style) -> bool {
        let mut tmp = [0u8; 4];
        for ch in s.chars() {
            if ch == '\t' {
                for _ in 0..4 {
                    if !self.put(" ", 1, style) {
                        return false;
                    }
                }
                continue;
            }
            let w = UnicodeWidthChar::width(ch).unwrap_or(0);
            if w == 0 {
                continue;
            }
            if !self.put(ch.encode_utf8(&mut tmp), w, style) {
                return false;
            }
        }
        true
    }

    fn put(&mut self, symbol: &str, w: usize, style: Style) -> bool {
        if self.out_cols + w > self.max_cols {
            return false;
        }
        let dx = self.out_cols as u16;
        if let Some(cell) = self.buf.cell_mut((self.x + dx, self.y)) {
            cell.set_style(style);
            cell.set_symbol(symbol);
        }
        if w == 2 {
            if let Some(cell) = self.buf.cell_mut((self.x + dx + 1, self.y)) {
                cell.set_style(style);
                cell.set_symbol("");
            }
        }
        self.out_cols += w;
        true
    }
}

/// Writes `input` at `(x, y)` using at most `max_cols` columns. Returns the columns used.
pub fn render_str_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    input: &str,
    style: Style,
) -> u16 {
    if max_cols == 0 {
        return 0;
    }
    let mut w = RowWriter {
        buf,
        x,
        y,
        max_cols: max_cols as usize,
        out_cols: 0,
    };
    w.push_str(input, style);
    w.out_cols as u16
}

/// Like [`render_str_clipped`] but for styled lines; span styles are patched over `base`.
pub fn render_line_clipped(
    x: u16,
    y: u16,
    max_cols: u16,
    buf: &mut Buffer,
    line: &Line<'_>,
    base: Style,
) -> u16 {
    if max_cols == 0 {
        return 0;
    }
    let line_style = base.patch(line.style);
    let mut w = RowWriter {
        buf,
        x,
        y,
        max_cols: max_cols as usize,
        out_cols: 0,
    };
    for span in &line.spans {
        if !w.push_str(span.content.as_ref(), line_style.patch(span.style)) {
            break;
        }
    }
    w.out_cols as u16
}

/// Renders a single text row inside `area`, honoring alignment.
pub fn render_aligned(
    area: Rect,
    y: u16,
    buf: &mut Buffer,
    text: &str,
    style: Style,
    align: Alignment,
) -> u16 {
    let w = display_width(text).min(area.width as usize) as u16;
    let x = aligned_x(area, w, align);
    render_str_clipped(x, y, area.right().saturating_sub(x), buf, text, style)
}

pub fn aligned_x(area: Rect, content_w: u16, align: Alignment) -> u16 {
    let free = area.width.saturating_sub(content_w);
    match align {
        Alignment::Left => area.x,
        Alignment::Center => area.x + free / 2,
        Alignment::Right => area.x + free,
    }
}

pub fn display_width(s: &str) -> usize {
    if s.contains('\t') {
        UnicodeWidthStr::width(s.replace('\t', "    ").as_str())
    } else {
        UnicodeWidthStr::width(s)
    }
}

pub fn slice_by_cols(input: &str, start_col: u32, max_cols: u16) -> String {
    if max_cols == 0 {
        return String::new();
    }

    let start_col = start_col as usize;
    let max_cols = max_cols as usize;
    let input = if input.contains('\t') {
        std::borrow::Cow::Owned(input.replace('\t', "    "))
    } else {
        std::borrow::Cow::Borrowed(input)
    };

    let mut col = 0usize;
    let mut out_cols = 0usize;
    let mut out = String::new();

    for ch in input.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if w == 0 {
            continue;
        }
        if col < start_col {
            col += w;
            continue;
        }
        if out_cols + w > max_cols {
            break;
        }
        out.push(ch);
        col += w;
        out_cols += w;
    }

    out
}

/// Reads a buffer back as one string per row with trailing blanks removed.
///
/// Handy for assertions on rendered output.
pub fn buffer_lines(buf: &Buffer) -> Vec<String> {
    let area = buf.area;
    (area.y..area.bottom())
        .map(|y| {
            let row: String = (area.x..area.right())
                .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                .collect();
            row.trim_end().to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_by_cols_handles_tabs_and_width() {
        assert_eq!(slice_by_cols("\t1", 0, 4), "    ");
        assert_eq!(slice_by_cols("abcdef", 0, 3), "abc");
        assert_eq!(slice_by_cols("abcdef", 2, 3), "cde");
        assert_eq!(slice_by_cols("你好", 1, 2), "好");
    }

    #[test]
    fn render_str_clipped_stops_before_split_wide_char() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 3, 1));
        let used = render_str_clipped(0, 0, 3, &mut buf, "a你好", Style::default());
        assert_eq!(used, 3);
        assert_eq!(buffer_lines(&buf), vec!["a你".to_string()]);
    }

    #[test]
    fn render_aligned_centers_text() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 7, 1));
        render_aligned(
            Rect::new(0, 0, 7, 1),
            0,
            &mut buf,
            "abc",
            Style::default(),
            Alignment::Center,
        );
        assert_eq!(buffer_lines(&buf), vec!["  abc".to_string()]);
    }

    #[test]
    fn render_scrollbar_does_not_panic() {
        let mut state = ViewportState::default();
        state.set_viewport(10, 5);
        state.set_content(10, 50);
        let mut buf = Buffer::empty(Rect::new(0, 0, 1, 5));
        render_scrollbar(Rect::new(0, 0, 1, 5), &mut buf, &state, Style::default());
    }
}
