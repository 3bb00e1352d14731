//! Grid layout, focus and scrolling for a list of [`ItemView`]s.
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::MouseEventKind;
use crate::interaction::Activation;
use crate::keymap::NavBindings;
use crate::render;
use crate::theme::Theme;
use crate::view::ItemView;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CollectionLayout {
    pub columns: u16,
    pub column_gap: u16,
    pub row_gap: u16,
    /// Draw a horizontal rule in the gap between rows.
    pub separators: bool,
}

impl Default for CollectionLayout {
    fn default() -> Self {
        Self {
            columns: 1,
            column_gap: 1,
            row_gap: 1,
            separators: false,
        }
    }
}

impl CollectionLayout {
    pub fn new(columns: u16) -> Self {
        Self {
            columns: columns.max(1),
            ..Self::default()
        }
    }

    pub fn gaps(mut self, column_gap: u16, row_gap: u16) -> Self {
        self.column_gap = column_gap;
        self.row_gap = row_gap;
        self
    }

    pub fn separators(mut self, on: bool) -> Self {
        self.separators = on;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CollectionAction {
    None,
    Redraw,
    Activated { index: usize, activation: Activation },
}

/// Focus and scroll state shared by every collection component.
///
/// Item rectangles are computed during [`CollectionState::render`] and reused for mouse hit
/// testing and keyboard scrolling until the next render.
#[derive(Clone, Debug, Default)]
pub struct CollectionState {
    cursor: Option<usize>,
    viewport: ViewportState,
    area: Rect,
    columns: u16,
    rects: Vec<Rect>,
    bindings: NavBindings,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = cursor;
        self.scroll_cursor_into_view();
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn set_bindings(&mut self, bindings: NavBindings) {
        self.bindings = bindings;
    }

    /// Lays out and paints `views` into `area`.
    pub fn render(
        &mut self,
        area: Rect,
        buf: &mut Buffer,
        views: &[ItemView],
        layout: CollectionLayout,
        theme: &Theme,
    ) {
        self.area = area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        if let Some(c) = self.cursor {
            if c >= views.len() {
                self.cursor = views.len().checked_sub(1);
            }
        }

        let mut rects = compute_rects(views, layout, area.width);
        let content_h = rects.iter().map(|r| r.bottom()).max().unwrap_or(0);
        let show_scrollbar = content_h > area.height && area.width >= 2;
        let body_w = if show_scrollbar {
            rects = compute_rects(views, layout, area.width - 1);
            area.width - 1
        } else {
            area.width
        };
        let content_h = rects.iter().map(|r| r.bottom()).max().unwrap_or(0);
        self.columns = layout.columns.max(1);
        self.rects = rects;
        self.viewport.set_viewport(body_w, area.height);
        self.viewport.set_content(body_w as u32, content_h as u32);
        self.scroll_cursor_into_view();

        let top = self.viewport.y;
        let bottom = top + area.height as u32;
        for (i, (view, rect)) in views.iter().zip(&self.rects).enumerate() {
            let start = rect.y as u32;
            let end = rect.bottom() as u32;
            if end <= top || start >= bottom {
                continue;
            }
            let focused = self.cursor == Some(i);
            if start >= top && end <= bottom {
                let target = Rect::new(
                    area.x + rect.x,
                    area.y + (start - top) as u16,
                    rect.width,
                    rect.height,
                );
                view.render(target, buf, theme, focused);
                continue;
            }
            // Partially visible: paint off-screen, then copy the visible rows.
            let mut scratch = Buffer::empty(Rect::new(0, 0, rect.width, rect.height));
            view.render(scratch.area, &mut scratch, theme, focused);
            for sy in 0..rect.height {
                let cy = start + sy as u32;
                if cy < top || cy >= bottom {
                    continue;
                }
                let ty = area.y + (cy - top) as u16;
                for sx in 0..rect.width {
                    let Some(src) = scratch.cell((sx, sy)).cloned() else {
                        continue;
                    };
                    if let Some(dst) = buf.cell_mut((area.x + rect.x + sx, ty)) {
                        *dst = src;
                    }
                }
            }
        }

        if layout.separators && layout.row_gap > 0 {
            let rule = "─".repeat(body_w as usize);
            let mut rows: Vec<u16> = self.rects.iter().map(|r| r.bottom()).collect();
            rows.sort_unstable();
            rows.dedup();
            rows.pop();
            for row in rows {
                let cy = row as u32;
                if cy >= top && cy < bottom {
                    let y = area.y + (cy - top) as u16;
                    render::render_str_clipped(area.x, y, body_w, buf, &rule, theme.border);
                }
            }
        }

        if show_scrollbar {
            render::render_scrollbar(
                Rect::new(area.right() - 1, area.y, 1, area.height),
                buf,
                &self.viewport,
                theme.border,
            );
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent, views: &[ItemView]) -> CollectionAction {
        let len = views.len();
        match event {
            InputEvent::Key(key) => {
                if len == 0 {
                    return CollectionAction::None;
                }
                let cols = self.columns.max(1) as usize;
                let cur = self.cursor;
                let b = &self.bindings;
                let next = if b.activate.matches(key) {
                    return match cur {
                        Some(i) => self.activate(i, views),
                        None => {
                            self.cursor = Some(0);
                            CollectionAction::Redraw
                        }
                    };
                } else if b.down.matches(key) {
                    cur.map(|c| (c + cols).min(len - 1)).unwrap_or(0)
                } else if b.up.matches(key) {
                    cur.map(|c| c.saturating_sub(cols)).unwrap_or(0)
                } else if b.right.matches(key) {
                    cur.map(|c| (c + 1).min(len - 1)).unwrap_or(0)
                } else if b.left.matches(key) {
                    cur.map(|c| c.saturating_sub(1)).unwrap_or(0)
                } else if b.first.matches(key) {
                    0
                } else if b.last.matches(key) {
                    len - 1
                } else if key.code == KeyCode::PageDown {
                    self.viewport.page_down();
                    return CollectionAction::Redraw;
                } else if key.code == KeyCode::PageUp {
                    self.viewport.page_up();
                    return CollectionAction::Redraw;
                } else {
                    return CollectionAction::None;
                };
                if Some(next) == cur {
                    return CollectionAction::None;
                }
                self.cursor = Some(next);
                self.scroll_cursor_into_view();
                CollectionAction::Redraw
            }
            InputEvent::Mouse(m) => match m.kind {
                MouseEventKind::ScrollDown => {
                    self.viewport.scroll_y_by(3);
                    CollectionAction::Redraw
                }
                MouseEventKind::ScrollUp => {
                    self.viewport.scroll_y_by(-3);
                    CollectionAction::Redraw
                }
                _ if m.is_click() => match self.hit_test(m.x, m.y) {
                    Some(i) if i < len => {
                        self.cursor = Some(i);
                        self.activate(i, views)
                    }
                    _ => CollectionAction::None,
                },
                _ => CollectionAction::None,
            },
            InputEvent::Paste(_) => CollectionAction::None,
        }
    }

    /// Index of the item under a screen position, using the last rendered layout.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.area.x || y < self.area.y || x >= self.area.right() || y >= self.area.bottom() {
            return None;
        }
        let cx = x - self.area.x;
        let cy = (y - self.area.y) as u32 + self.viewport.y;
        self.rects.iter().position(|r| {
            cx >= r.x && cx < r.right() && cy >= r.y as u32 && cy < r.bottom() as u32
        })
    }

    /// Screen rectangle of an item from the last render, clipped to the visible area.
    pub fn item_area(&self, index: usize) -> Option<Rect> {
        let r = self.rects.get(index)?;
        let top = self.viewport.y;
        let bottom = top + self.area.height as u32;
        let start = (r.y as u32).max(top);
        let end = (r.bottom() as u32).min(bottom);
        if start >= end {
            return None;
        }
        Some(Rect::new(
            self.area.x + r.x,
            self.area.y + (start - top) as u16,
            r.width,
            (end - start) as u16,
        ))
    }

    fn activate(&mut self, index: usize, views: &[ItemView]) -> CollectionAction {
        match views.get(index).map(|v| v.interaction.activate()) {
            Some(Activation::None) | None => CollectionAction::Redraw,
            Some(activation) => CollectionAction::Activated { index, activation },
        }
    }

    fn scroll_cursor_into_view(&mut self) {
        let Some(rect) = self.cursor.and_then(|c| self.rects.get(c)) else {
            return;
        };
        self.viewport
            .ensure_visible(rect.y as u32, rect.height as u32);
    }
}

/// Centered message painted in place of a collection with nothing to show.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EmptyState<'a> {
    pub message: &'a str,
}

impl<'a> EmptyState<'a> {
    pub const HEIGHT: u16 = 3;

    pub fn new(message: &'a str) -> Self {
        Self { message }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let y = area.y + area.height.saturating_sub(1) / 2;
        let text = crate::wrapping::truncate_to_width(self.message, area.width);
        render::render_aligned(
            area,
            y,
            buf,
            &text,
            theme.text_muted,
            ratatui::layout::Alignment::Center,
        );
    }
}

/// Item rectangles in content coordinates (origin at the top-left of the collection).
pub fn compute_rects(views: &[ItemView], layout: CollectionLayout, width: u16) -> Vec<Rect> {
    let cols = layout.columns.max(1);
    let gaps = layout.column_gap.saturating_mul(cols - 1);
    let cell_w = width.saturating_sub(gaps) / cols;
    let extra = width.saturating_sub(gaps).saturating_sub(cell_w * cols);

    let mut rects = Vec::with_capacity(views.len());
    let mut y = 0u16;
    for row in views.chunks(cols as usize) {
        let row_h = row.iter().map(|v| v.height(cell_w)).max().unwrap_or(0);
        let mut x = 0u16;
        for (c, _) in row.iter().enumerate() {
            // The last column absorbs rounding slack.
            let w = if c as u16 == cols - 1 { cell_w + extra } else { cell_w };
            rects.push(Rect::new(x, y, w, row_h));
            x = x.saturating_add(w + layout.column_gap);
        }
        y = y.saturating_add(row_h + layout.row_gap);
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;
    use crate::input::MouseEvent;
    use crate::interaction::Interaction;
    use crate::keymap;
    use crate::variant::Attrs;
    use crate::view::Slot;

    fn views(n: usize) -> Vec<ItemView> {
        (0..n)
            .map(|i| {
                ItemView::new(Attrs::new())
                    .interaction(Interaction::resolve(Some(&format!("/item/{i}")), false))
                    .slot(Slot::text(format!("Item {i}"), Attrs::new()))
            })
            .collect()
    }

    #[test]
    fn compute_rects_fills_rows_left_to_right() {
        let v = views(5);
        let rects = compute_rects(&v, CollectionLayout::new(2).gaps(2, 1), 20);
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[0], Rect::new(0, 0, 9, 1));
        assert_eq!(rects[1], Rect::new(11, 0, 9, 1));
        assert_eq!(rects[2].y, 2);
        assert_eq!(rects[4].y, 4);
    }

    #[test]
    fn arrows_move_by_row_and_column() {
        let v = views(6);
        let mut s = CollectionState::new();
        let mut buf = Buffer::empty(Rect::new(0, 0, 30, 10));
        s.render(buf.area, &mut buf, &v, CollectionLayout::new(3), &Theme::default());

        let down = InputEvent::Key(keymap::key(KeyCode::Down));
        assert_eq!(s.handle_event(&down, &v), CollectionAction::Redraw);
        assert_eq!(s.cursor(), Some(0));
        s.handle_event(&down, &v);
        assert_eq!(s.cursor(), Some(3));
        s.handle_event(&InputEvent::Key(keymap::key(KeyCode::Right)), &v);
        assert_eq!(s.cursor(), Some(4));
    }

    #[test]
    fn enter_activates_link() {
        let v = views(2);
        let mut s = CollectionState::new();
        s.set_cursor(Some(1));
        let action = s.handle_event(&InputEvent::Key(keymap::key(KeyCode::Enter)), &v);
        assert_eq!(
            action,
            CollectionAction::Activated {
                index: 1,
                activation: Activation::Navigate("/item/1".to_string()),
            }
        );
    }

    #[test]
    fn click_hits_item_under_pointer() {
        let v = views(4);
        let mut s = CollectionState::new();
        let mut buf = Buffer::empty(Rect::new(0, 0, 21, 10));
        s.render(buf.area, &mut buf, &v, CollectionLayout::new(2), &Theme::default());
        let click = InputEvent::Mouse(MouseEvent {
            x: 15,
            y: 2,
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: Default::default(),
        });
        match s.handle_event(&click, &v) {
            CollectionAction::Activated { index, .. } => assert_eq!(index, 3),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_state_is_centered() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        EmptyState::new("No items").render(area, &mut buf, &Theme::default());
        assert_eq!(render::buffer_lines(&buf)[1], "      No items");
    }

    #[test]
    fn partially_visible_items_are_clipped() {
        let v = views(10);
        let mut s = CollectionState::new();
        let mut buf = Buffer::empty(Rect::new(0, 0, 12, 3));
        s.set_cursor(Some(9));
        s.render(buf.area, &mut buf, &v, CollectionLayout::new(1), &Theme::default());
        let lines = render::buffer_lines(&buf);
        assert!(lines.iter().any(|l| l.contains("Item 9")));
    }

    #[test]
    fn separators_fill_row_gaps() {
        let v = views(2);
        let mut s = CollectionState::new();
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 3));
        let layout = CollectionLayout::new(1).separators(true);
        s.render(buf.area, &mut buf, &v, layout, &Theme::default());
        let lines = render::buffer_lines(&buf);
        assert_eq!(lines[0], "Item 0");
        assert_eq!(lines[1], "──────");
        assert_eq!(lines[2], "Item 1");
    }
}
