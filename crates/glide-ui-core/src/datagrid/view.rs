use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEvent;
use crate::input::MouseEventKind;
use crate::keymap::NavBindings;
use crate::render;
use crate::theme::Theme;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use virtualizer::Align;
use virtualizer::Virtualizer;
use virtualizer::VirtualizerOptions;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridAction {
    None,
    Redraw,
    /// Enter or a click on the cell under the cursor.
    Activated(Cell),
    HeaderClicked(usize),
    SelectionChanged,
}

/// A grid cell address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

/// Cell range selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    None,
    Single(Cell),
    Rect { start: Cell, end: Cell },
}

impl Selection {
    /// Normalized `(top_left, bottom_right)` bounds.
    pub fn bounds(&self) -> Option<(Cell, Cell)> {
        match *self {
            Selection::None => None,
            Selection::Single(c) => Some((c, c)),
            Selection::Rect { start, end } => Some((
                Cell {
                    row: start.row.min(end.row),
                    col: start.col.min(end.col),
                },
                Cell {
                    row: start.row.max(end.row),
                    col: start.col.max(end.col),
                },
            )),
        }
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.bounds().is_some_and(|(lo, hi)| {
            cell.row >= lo.row && cell.row <= hi.row && cell.col >= lo.col && cell.col <= hi.col
        })
    }
}

#[derive(Clone, Debug)]
pub struct GridColumn {
    pub title: String,
    pub width: u16,
}

impl GridColumn {
    pub fn new(title: impl Into<String>, width: u16) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GridViewOptions {
    pub show_header: bool,
    pub show_scrollbar_y: bool,
    pub overscan_rows: usize,
    pub overscan_cols: usize,
    pub col_gap: u32,
    pub header_style: Style,
    pub cursor_style: Style,
    pub selected_style: Style,
    /// Shift+movement extends a rectangular selection.
    pub multi_select: bool,
    /// Terminal lines per body row.
    pub row_height: u16,
}

impl Default for GridViewOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            show_scrollbar_y: true,
            overscan_rows: 2,
            overscan_cols: 2,
            col_gap: 1,
            header_style: Style::default().add_modifier(Modifier::BOLD),
            cursor_style: Style::default().add_modifier(Modifier::REVERSED),
            selected_style: Style::default().add_modifier(Modifier::BOLD),
            multi_select: true,
            row_height: 1,
        }
    }
}

/// Context passed to the `render_cell` callback in [`GridView::render`].
#[derive(Clone, Copy, Debug)]
pub struct CellContext {
    pub cell: Cell,
    /// Columns of the cell hidden behind the left edge.
    pub clip_left: u32,
    pub is_cursor: bool,
    pub is_selected: bool,
}

/// A virtualized 2D grid with keyboard and mouse navigation.
///
/// Rows are `row_height` terminal lines each. Only rows and columns intersecting the viewport (plus
/// overscan) are visited, so very large row counts stay cheap. Cell content comes from a callback.
pub struct GridView {
    pub state: ViewportState,
    options: GridViewOptions,
    bindings: NavBindings,
    columns: Vec<GridColumn>,
    rows: usize,
    cursor: Option<Cell>,
    selection: Selection,
    anchor: Option<Cell>,
    header_area: Rect,
    body_area: Rect,
    row_v: Virtualizer,
    col_v: Virtualizer,
    row_items: Vec<virtualizer::VirtualItem>,
    col_items: Vec<virtualizer::VirtualItem>,
}

impl Default for GridView {
    fn default() -> Self {
        Self::with_options(GridViewOptions::default())
    }
}

impl GridView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: GridViewOptions) -> Self {
        let row_h = u32::from(options.row_height.max(1));
        let mut row_opts = VirtualizerOptions::new(0, move |_| row_h);
        row_opts.overscan = options.overscan_rows;
        let mut col_opts = VirtualizerOptions::new(0, |_| 1);
        col_opts.gap = options.col_gap;
        col_opts.overscan = options.overscan_cols;

        Self {
            state: ViewportState::default(),
            options,
            bindings: NavBindings::default(),
            columns: Vec::new(),
            rows: 0,
            cursor: None,
            selection: Selection::None,
            anchor: None,
            header_area: Rect::default(),
            body_area: Rect::default(),
            row_v: Virtualizer::new(row_opts),
            col_v: Virtualizer::new(col_opts),
            row_items: Vec::new(),
            col_items: Vec::new(),
        }
    }

    pub fn set_row_count(&mut self, rows: usize) {
        if rows == self.rows {
            return;
        }
        self.rows = rows;
        let row_h = u32::from(self.options.row_height.max(1));
        let mut opts = VirtualizerOptions::new(rows, move |_| row_h);
        opts.overscan = self.options.overscan_rows;
        self.row_v = Virtualizer::new(opts);
        self.row_v.set_viewport_size(self.state.viewport_h as u32);
        self.row_v.set_scroll_offset(self.state.y as u64);
        self.state.y = self.row_v.scroll_offset().min(u32::MAX as u64) as u32;
        self.clamp_cursor();
    }

    pub fn set_columns(&mut self, columns: Vec<GridColumn>) {
        self.columns = columns;
        let widths: Vec<u32> = self.columns.iter().map(|c| c.width as u32).collect();
        let mut opts = VirtualizerOptions::new(widths.len(), move |i| {
            widths.get(i).copied().unwrap_or(1).max(1)
        });
        opts.gap = self.options.col_gap;
        opts.overscan = self.options.overscan_cols;
        self.col_v = Virtualizer::new(opts);
        self.col_v.set_viewport_size(self.state.viewport_w as u32);
        self.col_v.set_scroll_offset(self.state.x as u64);
        self.state.x = self.col_v.scroll_offset().min(u32::MAX as u64) as u32;
        self.clamp_cursor();
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn cursor(&self) -> Option<Cell> {
        self.cursor
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_cursor(&mut self, cursor: Option<Cell>) {
        self.cursor = cursor;
        self.clamp_cursor();
        self.selection = self.cursor.map(Selection::Single).unwrap_or(Selection::None);
        self.anchor = self.cursor;
        self.ensure_cursor_visible();
    }

    /// Screen rectangle of a cell in the last rendered frame, if visible.
    pub fn cell_rect(&self, cell: Cell) -> Option<Rect> {
        let row = self.row_items.iter().find(|i| i.index == cell.row)?;
        let col = self.col_items.iter().find(|i| i.index == cell.col)?;
        let (row_rect, _) = clipped_rect_y(
            self.body_area,
            self.row_v.scroll_offset(),
            row.start,
            row.size,
        );
        let (rect, _) = clipped_rect_x(row_rect, self.col_v.scroll_offset(), col.start, col.size);
        (rect.width > 0 && rect.height > 0).then_some(rect)
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> GridAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(m) => self.handle_mouse(m),
            InputEvent::Paste(_) => GridAction::None,
        }
    }

    pub fn scroll_y_by(&mut self, delta: i32) {
        self.sync_virtualizers_from_state();
        self.state.scroll_y_by(delta);
        self.row_v.set_scroll_offset(self.state.y as u64);
        self.state.y = self.row_v.scroll_offset().min(u32::MAX as u64) as u32;
    }

    pub fn ensure_cursor_visible(&mut self) {
        self.sync_virtualizers_from_state();
        let Some(c) = self.cursor else {
            return;
        };
        self.row_v.scroll_to_index(c.row, Align::Auto);
        self.col_v.scroll_to_index(c.col, Align::Auto);
        self.state.y = self.row_v.scroll_offset().min(u32::MAX as u64) as u32;
        self.state.x = self.col_v.scroll_offset().min(u32::MAX as u64) as u32;
        self.state.clamp();
    }

    pub fn render<F>(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme, mut render_cell: F)
    where
        F: FnMut(Rect, CellContext, &mut Buffer),
    {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let header_h = u16::from(self.options.show_header).min(area.height);
        let (content_area, scrollbar_x) = if self.options.show_scrollbar_y && area.width >= 2 {
            (
                Rect::new(area.x, area.y, area.width - 1, area.height),
                Some(area.right() - 1),
            )
        } else {
            (area, None)
        };
        self.header_area = Rect::new(content_area.x, content_area.y, content_area.width, header_h);
        self.body_area = Rect::new(
            content_area.x,
            content_area.y + header_h,
            content_area.width,
            content_area.height.saturating_sub(header_h),
        );

        let header_style = theme.text_primary.patch(self.options.header_style);
        let cursor_style = theme.accent.patch(self.options.cursor_style);
        let selected_style = theme.focus.patch(self.options.selected_style);

        buf.set_style(content_area, theme.text_primary);
        self.sync_virtualizers(self.body_area);
        self.row_v.collect_virtual_items(&mut self.row_items);
        self.col_v.collect_virtual_items(&mut self.col_items);

        let scroll_x = self.col_v.scroll_offset();
        if self.header_area.height > 0 {
            buf.set_style(self.header_area, header_style);
            for item in &self.col_items {
                let (rect, clip_left) =
                    clipped_rect_x(self.header_area, scroll_x, item.start, item.size);
                if rect.width == 0 {
                    continue;
                }
                let title =
                    render::slice_by_cols(&self.columns[item.index].title, clip_left, rect.width);
                render::render_str_clipped(rect.x, rect.y, rect.width, buf, &title, header_style);
                self.draw_col_separator(self.header_area, buf, item, theme.border);
            }
        }

        let scroll_y = self.row_v.scroll_offset();
        for row_item in &self.row_items {
            let (row_rect, _) =
                clipped_rect_y(self.body_area, scroll_y, row_item.start, row_item.size);
            if row_rect.height == 0 {
                continue;
            }
            for col_item in &self.col_items {
                let (cell_rect, clip_left) =
                    clipped_rect_x(row_rect, scroll_x, col_item.start, col_item.size);
                if cell_rect.width == 0 {
                    continue;
                }
                let cell = Cell {
                    row: row_item.index,
                    col: col_item.index,
                };
                let is_cursor = self.cursor == Some(cell);
                let is_selected = self.selection.contains(cell);
                if is_cursor {
                    buf.set_style(cell_rect, cursor_style);
                } else if is_selected {
                    buf.set_style(cell_rect, selected_style);
                }
                render_cell(
                    cell_rect,
                    CellContext {
                        cell,
                        clip_left,
                        is_cursor,
                        is_selected,
                    },
                    buf,
                );
                self.draw_col_separator(row_rect, buf, col_item, theme.border);
            }
        }

        if let Some(sb_x) = scrollbar_x {
            render::render_scrollbar(
                Rect::new(sb_x, self.body_area.y, 1, self.body_area.height),
                buf,
                &self.state,
                theme.border,
            );
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> GridAction {
        if self.rows == 0 || self.columns.is_empty() {
            self.cursor = None;
            self.selection = Selection::None;
            self.anchor = None;
            self.state.to_top();
            return GridAction::None;
        }
        self.sync_virtualizers_from_state();

        // Movement bindings compare modifiers exactly, so strip shift before matching.
        let mut plain = key.clone();
        plain.modifiers.shift = false;
        let extend = key.modifiers.shift;
        let b = &self.bindings;
        let moved = if b.down.matches(&plain) {
            self.move_cursor_by(1, 0, extend)
        } else if b.up.matches(&plain) {
            self.move_cursor_by(-1, 0, extend)
        } else if b.right.matches(&plain) {
            self.move_cursor_by(0, 1, extend)
        } else if b.left.matches(&plain) {
            self.move_cursor_by(0, -1, extend)
        } else if key.code == KeyCode::Home || key.code == KeyCode::Char('g') {
            let col = self.cursor.map(|c| c.col).unwrap_or(0);
            self.set_cursor(Some(Cell { row: 0, col }));
            true
        } else if key.code == KeyCode::End || key.code == KeyCode::Char('G') {
            let col = self.cursor.map(|c| c.col).unwrap_or(0);
            self.set_cursor(Some(Cell {
                row: self.rows - 1,
                col,
            }));
            true
        } else if key.code == KeyCode::PageDown {
            self.page_by(1);
            true
        } else if key.code == KeyCode::PageUp {
            self.page_by(-1);
            true
        } else if key.code == KeyCode::Enter {
            return self
                .cursor
                .map(GridAction::Activated)
                .unwrap_or(GridAction::None);
        } else {
            return GridAction::None;
        };

        if !moved {
            GridAction::None
        } else if extend && self.options.multi_select {
            GridAction::SelectionChanged
        } else {
            GridAction::Redraw
        }
    }

    fn handle_mouse(&mut self, m: &MouseEvent) -> GridAction {
        match m.kind {
            MouseEventKind::ScrollDown => {
                self.scroll_y_by(3);
                GridAction::Redraw
            }
            MouseEventKind::ScrollUp => {
                self.scroll_y_by(-3);
                GridAction::Redraw
            }
            _ if m.is_click() => {
                if contains(self.header_area, m.x, m.y) {
                    return self
                        .col_at(m.x)
                        .map(GridAction::HeaderClicked)
                        .unwrap_or(GridAction::None);
                }
                if !contains(self.body_area, m.x, m.y) {
                    return GridAction::None;
                }
                let row_off = self.row_v.scroll_offset() + (m.y - self.body_area.y) as u64;
                let (Some(row), Some(col)) = (self.row_v.index_at_offset(row_off), self.col_at(m.x))
                else {
                    return GridAction::None;
                };
                if row >= self.rows {
                    return GridAction::None;
                }
                let cell = Cell { row, col };
                if self.cursor == Some(cell) {
                    return GridAction::Activated(cell);
                }
                self.set_cursor(Some(cell));
                GridAction::Redraw
            }
            _ => GridAction::None,
        }
    }

    fn col_at(&self, x: u16) -> Option<usize> {
        let off = self.col_v.scroll_offset() + x.checked_sub(self.body_area.x)? as u64;
        let idx = self.col_v.index_at_offset(off)?;
        (idx < self.columns.len()).then_some(idx)
    }

    fn page_by(&mut self, dir: i32) {
        let step = self.state.viewport_h.saturating_sub(1).max(1) as i32;
        self.scroll_y_by(step * dir);
        let row = self
            .row_v
            .index_at_offset(self.row_v.scroll_offset())
            .unwrap_or(0);
        let col = self.cursor.map(|c| c.col).unwrap_or(0);
        self.cursor = Some(Cell { row, col });
        self.clamp_cursor();
        self.selection = self.cursor.map(Selection::Single).unwrap_or(Selection::None);
        self.anchor = self.cursor;
    }

    fn move_cursor_by(&mut self, drow: i32, dcol: i32, extend: bool) -> bool {
        let cur = self.cursor.unwrap_or(Cell { row: 0, col: 0 });
        let next = Cell {
            row: (cur.row as i64 + drow as i64).clamp(0, self.rows.saturating_sub(1) as i64)
                as usize,
            col: (cur.col as i64 + dcol as i64)
                .clamp(0, self.columns.len().saturating_sub(1) as i64) as usize,
        };
        if Some(next) == self.cursor {
            return false;
        }
        self.cursor = Some(next);

        if self.options.multi_select && extend {
            let anchor = *self.anchor.get_or_insert(cur);
            self.selection = Selection::Rect {
                start: anchor,
                end: next,
            };
        } else {
            self.selection = Selection::Single(next);
            self.anchor = Some(next);
        }

        self.ensure_cursor_visible();
        true
    }

    fn clamp_cursor(&mut self) {
        let cols = self.columns.len();
        if self.rows == 0 || cols == 0 {
            self.cursor = None;
            self.selection = Selection::None;
            self.anchor = None;
            return;
        }
        self.cursor = self.cursor.map(|c| Cell {
            row: c.row.min(self.rows - 1),
            col: c.col.min(cols - 1),
        });
        if let Some((_, hi)) = self.selection.bounds() {
            if hi.row >= self.rows || hi.col >= cols {
                self.selection = self.cursor.map(Selection::Single).unwrap_or(Selection::None);
                self.anchor = self.cursor;
            }
        }
    }

    fn sync_virtualizers(&mut self, body_area: Rect) {
        self.state.set_viewport(body_area.width, body_area.height);
        self.sync_virtualizers_from_state();
    }

    fn sync_virtualizers_from_state(&mut self) {
        self.row_v.set_count(self.rows);
        self.col_v.set_count(self.columns.len());

        self.row_v.set_viewport_size(self.state.viewport_h as u32);
        self.col_v.set_viewport_size(self.state.viewport_w as u32);

        self.row_v.set_scroll_offset(self.state.y as u64);
        self.col_v.set_scroll_offset(self.state.x as u64);

        self.state.y = self.row_v.scroll_offset().min(u32::MAX as u64) as u32;
        self.state.x = self.col_v.scroll_offset().min(u32::MAX as u64) as u32;

        let total_w = self.col_v.total_size().min(u32::MAX as u64) as u32;
        let total_h = self.row_v.total_size().min(u32::MAX as u64) as u32;
        self.state.set_content(total_w, total_h);

        self.row_v.set_overscan(self.options.overscan_rows);
        self.col_v.set_overscan(self.options.overscan_cols);
    }

    fn draw_col_separator(
        &self,
        area: Rect,
        buf: &mut Buffer,
        item: &virtualizer::VirtualItem,
        style: Style,
    ) {
        if self.options.col_gap == 0 || item.index + 1 >= self.columns.len() {
            return;
        }
        let rel = (item.start + item.size as u64) as i64 - self.col_v.scroll_offset() as i64;
        if rel < 0 || rel >= area.width as i64 {
            return;
        }
        let x = area.x + rel as u16;
        for dy in 0..area.height {
            render::render_str_clipped(x, area.y + dy, 1, buf, "│", style);
        }
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.right() && y >= area.y && y < area.bottom()
}

fn clipped_rect_x(area: Rect, scroll_x: u64, start: u64, size: u32) -> (Rect, u32) {
    let rel = start as i64 - scroll_x as i64;
    let clip_left = (-rel).max(0) as u32;
    let x = rel.clamp(0, area.width as i64) as u16;
    let max_w = area.width.saturating_sub(x);
    let visible_w = size.saturating_sub(clip_left).min(max_w as u32) as u16;
    (
        Rect::new(area.x + x, area.y, visible_w, area.height),
        clip_left,
    )
}

fn clipped_rect_y(area: Rect, scroll_y: u64, start: u64, size: u32) -> (Rect, u32) {
    let rel = start as i64 - scroll_y as i64;
    let clip_top = (-rel).max(0) as u32;
    let y = rel.clamp(0, area.height as i64) as u16;
    let max_h = area.height.saturating_sub(y);
    let visible_h = size.saturating_sub(clip_top).min(max_h as u32) as u16;
    (
        Rect::new(area.x, area.y + y, area.width, visible_h),
        clip_top,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyModifiers;
    use crate::input::MouseButton;

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::key(code)
    }

    fn key_shift(code: KeyCode) -> InputEvent {
        InputEvent::Key(KeyEvent::new(code).with_modifiers(KeyModifiers::shift()))
    }

    fn grid(rows: usize) -> GridView {
        let mut g = GridView::new();
        g.set_columns(vec![
            GridColumn::new("A", 5),
            GridColumn::new("B", 5),
            GridColumn::new("C", 5),
        ]);
        g.set_row_count(rows);
        g
    }

    #[test]
    fn moves_cursor_and_scrolls_down() {
        let mut g = grid(10_000);
        g.state.set_viewport(10, 5);
        g.set_cursor(Some(Cell { row: 0, col: 0 }));
        assert_eq!(g.state.y, 0);

        for _ in 0..10 {
            g.handle_event(&key(KeyCode::Down));
        }
        assert_eq!(g.cursor(), Some(Cell { row: 10, col: 0 }));
        assert!(g.state.y > 0);
    }

    #[test]
    fn shift_extends_rect_selection() {
        let mut g = grid(100);
        g.state.set_viewport(10, 5);
        g.set_cursor(Some(Cell { row: 2, col: 0 }));

        assert_eq!(
            g.handle_event(&key_shift(KeyCode::Down)),
            GridAction::SelectionChanged
        );
        g.handle_event(&key_shift(KeyCode::Right));
        assert_eq!(
            g.selection().bounds(),
            Some((Cell { row: 2, col: 0 }, Cell { row: 3, col: 1 }))
        );
        g.handle_event(&key(KeyCode::Down));
        assert_eq!(g.selection(), Selection::Single(Cell { row: 4, col: 1 }));
    }

    #[test]
    fn shrinking_rows_clamps_cursor() {
        let mut g = grid(10);
        g.set_cursor(Some(Cell { row: 9, col: 2 }));
        g.set_row_count(3);
        assert_eq!(g.cursor(), Some(Cell { row: 2, col: 2 }));
        g.set_row_count(0);
        assert_eq!(g.cursor(), None);
    }

    #[test]
    fn render_calls_back_for_visible_cells_only() {
        let mut g = grid(1000);
        let area = Rect::new(0, 0, 18, 4);
        let mut buf = Buffer::empty(area);
        let mut seen = Vec::new();
        g.render(area, &mut buf, &Theme::default(), |rect, ctx, buf| {
            seen.push(ctx.cell);
            render::render_str_clipped(rect.x, rect.y, rect.width, buf, "x", Style::default());
        });
        assert!(seen.iter().all(|c| c.row < 10));
        let lines = render::buffer_lines(&buf);
        assert!(lines[0].starts_with("A"));
        assert!(lines[1].starts_with("x"));
    }

    #[test]
    fn header_click_reports_column() {
        let mut g = grid(5);
        let area = Rect::new(0, 0, 18, 6);
        let mut buf = Buffer::empty(area);
        g.render(area, &mut buf, &Theme::default(), |_, _, _| {});
        let click = InputEvent::Mouse(MouseEvent {
            x: 7,
            y: 0,
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: KeyModifiers::none(),
        });
        assert_eq!(g.handle_event(&click), GridAction::HeaderClicked(1));

        let body = InputEvent::Mouse(MouseEvent {
            x: 1,
            y: 3,
            kind: MouseEventKind::Down(MouseButton::Left),
            modifiers: KeyModifiers::none(),
        });
        assert_eq!(g.handle_event(&body), GridAction::Redraw);
        assert_eq!(g.cursor(), Some(Cell { row: 2, col: 0 }));
        assert_eq!(g.handle_event(&body), GridAction::Activated(Cell { row: 2, col: 0 }));
    }
}
