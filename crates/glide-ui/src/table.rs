//! A paginated, searchable, sortable table over typed rows.
use crate::collection::EmptyState;
use crate::data::Pagination;
use crate::data::Record;
use crate::data::SortColumn;
use crate::data::SortState;
use crate::data::Value;
use crate::data::display_order;
use crate::data::format_currency;
use crate::data::format_date;
use crate::data::format_number;
use crate::data::initials;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::MouseEventKind;
use crate::keymap::NavBindings;
use crate::line_input::LineInput;
use crate::line_input::LineInputAction;
use crate::render;
use crate::selection::RowId;
use crate::selection::RowSelection;
use crate::selection::SelectionBindings;
use crate::theme::Theme;
use crate::variant::Tone;
use crate::variant_axis;
use crate::viewport::ViewportState;
use ratatui::buffer::Buffer;
use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;
use std::collections::BTreeSet;
use std::sync::Arc;

variant_axis! {
    pub enum TableVariant default Default {
        Default => "default",
        Minimal => "minimal",
        Striped => "striped",
    }
}

variant_axis! {
    pub enum TableSize default Default {
        Default => "default",
        Compact => "compact",
    }
}

pub type Accessor<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
pub type ToneFn = Arc<dyn Fn(&str) -> Tone + Send + Sync>;
pub type RowIdFn<T> = Arc<dyn Fn(&T, usize) -> RowId + Send + Sync>;

/// How a column turns a row into a cell.
#[derive(Clone)]
pub enum ColumnKind {
    Text,
    Number,
    Currency(String),
    Date,
    Badge(Option<ToneFn>),
    /// Initials of the name read by the accessor.
    Avatar,
    /// Row checkbox.
    Select,
    /// Opens the host's row actions.
    Actions,
}

pub struct TableColumn<T> {
    pub id: String,
    pub header: String,
    pub kind: ColumnKind,
    pub value: Option<Accessor<T>>,
    pub sortable: bool,
    pub width: Option<u16>,
    pub hideable: bool,
}

impl<T> Clone for TableColumn<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            header: self.header.clone(),
            kind: self.kind.clone(),
            value: self.value.clone(),
            sortable: self.sortable,
            width: self.width,
            hideable: self.hideable,
        }
    }
}

impl<T> TableColumn<T> {
    fn with_kind(
        id: impl Into<String>,
        header: impl Into<String>,
        kind: ColumnKind,
        value: Option<Accessor<T>>,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            kind,
            value,
            sortable: false,
            width: None,
            hideable: true,
        }
    }

    pub fn text(
        id: impl Into<String>,
        header: impl Into<String>,
        value: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::with_kind(id, header, ColumnKind::Text, Some(Arc::new(value)))
    }

    /// A text column whose header toggles sorting.
    pub fn sortable(
        id: impl Into<String>,
        header: impl Into<String>,
        value: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::text(id, header, value).sort(true)
    }

    pub fn number(
        id: impl Into<String>,
        header: impl Into<String>,
        value: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::with_kind(id, header, ColumnKind::Number, Some(Arc::new(value)))
    }

    /// Money column; `None` uses USD.
    pub fn currency(
        id: impl Into<String>,
        header: impl Into<String>,
        currency: Option<&str>,
        value: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        let code = currency.unwrap_or("USD").to_string();
        Self::with_kind(id, header, ColumnKind::Currency(code), Some(Arc::new(value)))
    }

    pub fn date(
        id: impl Into<String>,
        header: impl Into<String>,
        value: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::with_kind(id, header, ColumnKind::Date, Some(Arc::new(value)))
    }

    pub fn badge(
        id: impl Into<String>,
        header: impl Into<String>,
        value: impl Fn(&T) -> Value + Send + Sync + 'static,
        tone: Option<ToneFn>,
    ) -> Self {
        Self::with_kind(id, header, ColumnKind::Badge(tone), Some(Arc::new(value)))
    }

    /// Avatar initials from the name the accessor returns; blank names read as "User".
    pub fn avatar(
        id: impl Into<String>,
        header: impl Into<String>,
        name: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::with_kind(id, header, ColumnKind::Avatar, Some(Arc::new(name))).width(4)
    }

    pub fn select() -> Self {
        let mut c = Self::with_kind("select", "", ColumnKind::Select, None).width(3);
        c.hideable = false;
        c
    }

    pub fn actions() -> Self {
        let mut c = Self::with_kind("actions", "", ColumnKind::Actions, None).width(3);
        c.hideable = false;
        c
    }

    pub fn sort(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    fn value_of(&self, row: &T) -> Value {
        self.value.as_ref().map(|f| f(row)).unwrap_or_default()
    }

    fn right_aligned(&self) -> bool {
        matches!(self.kind, ColumnKind::Number | ColumnKind::Currency(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableCollectionOptions {
    pub variant: TableVariant,
    pub size: TableSize,
    pub limit: Option<usize>,
    pub page_size: usize,
    pub search_placeholder: String,
    pub empty_message: String,
    pub enable_sorting: bool,
    pub enable_filtering: bool,
    pub enable_pagination: bool,
    pub enable_row_selection: bool,
    /// A row click handler is attached.
    pub on_row_click: bool,
    pub show_toolbar: bool,
}

impl Default for TableCollectionOptions {
    fn default() -> Self {
        Self {
            variant: TableVariant::Default,
            size: TableSize::Default,
            limit: None,
            page_size: crate::data::DEFAULT_PAGE_SIZE,
            search_placeholder: "Search...".to_string(),
            empty_message: "No results.".to_string(),
            enable_sorting: false,
            enable_filtering: false,
            enable_pagination: false,
            enable_row_selection: false,
            on_row_click: false,
            show_toolbar: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableAction {
    None,
    Redraw,
    /// Position of the clicked row in the data.
    RowClicked(usize),
    ActionsRequested(usize),
    SelectionChanged,
    SortChanged,
    PageChanged,
    SearchChanged,
}

#[derive(Clone, Debug, Default)]
struct Geometry {
    search: Option<Rect>,
    header_y: Option<u16>,
    body: Rect,
    /// (x, width, column index) for visible columns.
    spans: Vec<(u16, u16, usize)>,
    footer_y: Option<u16>,
}

pub struct TableCollection<T> {
    rows: Vec<T>,
    columns: Vec<TableColumn<T>>,
    options: TableCollectionOptions,
    row_id: RowIdFn<T>,
    search: LineInput,
    search_focused: bool,
    sort: SortState,
    pagination: Pagination,
    selection: RowSelection,
    hidden: BTreeSet<String>,
    cursor: Option<usize>,
    focus_col: usize,
    viewport: ViewportState,
    bindings: NavBindings,
    selection_bindings: SelectionBindings,
    geometry: Geometry,
}

impl<T: Record> TableCollection<T> {
    pub fn new(
        rows: Vec<T>,
        columns: Vec<TableColumn<T>>,
        options: TableCollectionOptions,
    ) -> Self {
        let search = LineInput::new().placeholder(options.search_placeholder.clone());
        let pagination = Pagination::new(options.page_size);
        Self {
            rows,
            columns,
            options,
            row_id: Arc::new(|_, i| RowId(i as u64)),
            search,
            search_focused: false,
            sort: SortState::new(),
            pagination,
            selection: RowSelection::new(),
            hidden: BTreeSet::new(),
            cursor: None,
            focus_col: 0,
            viewport: ViewportState::default(),
            bindings: NavBindings::default(),
            selection_bindings: SelectionBindings::default(),
            geometry: Geometry::default(),
        }
    }

    /// Identity used for selection. Defaults to the row's position in the data.
    pub fn with_row_id(mut self, f: impl Fn(&T, usize) -> RowId + Send + Sync + 'static) -> Self {
        self.row_id = Arc::new(f);
        self
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Replaces the data. Selection of rows that are gone is dropped.
    pub fn set_rows(&mut self, rows: Vec<T>) {
        self.rows = rows;
        let present: BTreeSet<RowId> = self.limited_ids().into_iter().collect();
        self.selection.retain(|id| present.contains(&id));
        let total = self.display_order().len();
        self.pagination.clamp(total);
    }

    pub fn options(&self) -> &TableCollectionOptions {
        &self.options
    }

    pub fn columns(&self) -> &[TableColumn<T>] {
        &self.columns
    }

    pub fn query(&self) -> &str {
        self.search.text()
    }

    pub fn set_query(&mut self, query: &str) {
        self.search.set_text(query);
        self.pagination.set_page(0, 0);
        self.cursor = None;
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Toggles sorting on a column: ascending, then descending.
    pub fn sort_by(&mut self, column_id: &str) -> bool {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.id == column_id && c.sortable);
        if !(self.options.enable_sorting && sortable) {
            return false;
        }
        self.sort.toggle_two_way(column_id);
        true
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn selected_rows(&self) -> Vec<&T> {
        self.limited()
            .iter()
            .enumerate()
            .filter(|(i, row)| self.selection.is_selected((self.row_id)(row, *i)))
            .map(|(_, row)| row)
            .collect()
    }

    pub fn set_column_visible(&mut self, id: &str, visible: bool) {
        let hideable = self.columns.iter().any(|c| c.id == id && c.hideable);
        if visible {
            self.hidden.remove(id);
        } else if hideable {
            self.hidden.insert(id.to_string());
        }
    }

    pub fn is_column_visible(&self, id: &str) -> bool {
        !self.hidden.contains(id)
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    fn limited(&self) -> &[T] {
        crate::item::limited(&self.rows, self.options.limit)
    }

    fn limited_ids(&self) -> Vec<RowId> {
        self.limited()
            .iter()
            .enumerate()
            .map(|(i, r)| (self.row_id)(r, i))
            .collect()
    }

    /// Displayed positions (into the data) after limit, search and sort.
    pub fn display_order(&self) -> Vec<usize> {
        let rows = self.limited();
        let query = if self.options.enable_filtering {
            self.search.text()
        } else {
            ""
        };
        let sort: &[SortColumn] = if self.options.enable_sorting {
            self.sort.columns()
        } else {
            &[]
        };
        let columns = &self.columns;
        display_order(rows, query, sort, |row, key| {
            columns
                .iter()
                .find(|c| c.id == key)
                .map(|c| c.value_of(row))
                .unwrap_or_default()
        })
    }

    pub fn page(&self) -> usize {
        self.pagination.page()
    }

    pub fn page_count(&self) -> usize {
        if self.options.enable_pagination {
            self.pagination.page_count(self.display_order().len())
        } else {
            1
        }
    }

    pub fn set_page(&mut self, page: usize) {
        let total = self.display_order().len();
        self.pagination.set_page(page, total);
        self.cursor = None;
    }

    /// Data positions of the rows on the current page.
    pub fn page_rows(&self) -> Vec<usize> {
        let order = self.display_order();
        if !self.options.enable_pagination {
            return order;
        }
        let range = self.pagination.range(order.len());
        order[range].to_vec()
    }

    fn page_ids(&self, page: &[usize]) -> Vec<RowId> {
        page.iter()
            .map(|&i| (self.row_id)(&self.rows[i], i))
            .collect()
    }

    /// "n of m row(s) selected." counted over the filtered rows.
    pub fn selection_summary(&self) -> String {
        let order = self.display_order();
        let selected = order
            .iter()
            .filter(|&&i| self.selection.is_selected((self.row_id)(&self.rows[i], i)))
            .count();
        format!("{selected} of {} row(s) selected.", order.len())
    }

    fn visible_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| self.is_column_visible(&c.id))
            .filter(|(_, c)| {
                !matches!(c.kind, ColumnKind::Select) || self.options.enable_row_selection
            })
            .map(|(i, _)| i)
            .collect()
    }

    fn has_search(&self) -> bool {
        self.options.show_toolbar && self.options.enable_filtering
    }

    fn toggle_row(&mut self, data_index: usize) -> TableAction {
        if !self.options.enable_row_selection {
            return TableAction::None;
        }
        let Some(row) = self.rows.get(data_index) else {
            return TableAction::None;
        };
        self.selection.toggle((self.row_id)(row, data_index));
        TableAction::SelectionChanged
    }

    fn toggle_page(&mut self) -> TableAction {
        if !self.options.enable_row_selection {
            return TableAction::None;
        }
        let ids = self.page_ids(&self.page_rows());
        self.selection.toggle_all(&ids);
        TableAction::SelectionChanged
    }

    fn change_page(&mut self, forward: bool) -> TableAction {
        if !self.options.enable_pagination {
            return TableAction::None;
        }
        let total = self.display_order().len();
        let before = self.pagination.page();
        if forward {
            self.pagination.next(total);
        } else {
            self.pagination.prev(total);
        }
        if self.pagination.page() == before {
            return TableAction::None;
        }
        self.cursor = None;
        TableAction::PageChanged
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> TableAction {
        if self.search_focused {
            return match self.search.input(event.clone()) {
                LineInputAction::Changed => {
                    self.pagination.set_page(0, 0);
                    self.cursor = None;
                    TableAction::SearchChanged
                }
                LineInputAction::Submitted(_) | LineInputAction::Cancelled => {
                    self.search_focused = false;
                    TableAction::Redraw
                }
                LineInputAction::None => TableAction::Redraw,
            };
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(m) => match m.kind {
                MouseEventKind::ScrollDown => {
                    self.viewport.scroll_y_by(3);
                    TableAction::Redraw
                }
                MouseEventKind::ScrollUp => {
                    self.viewport.scroll_y_by(-3);
                    TableAction::Redraw
                }
                _ if m.is_click() => self.handle_click(m.x, m.y),
                _ => TableAction::None,
            },
            InputEvent::Paste(_) => TableAction::None,
        }
    }

    fn handle_key(&mut self, key: &crate::input::KeyEvent) -> TableAction {
        let page = self.page_rows();
        let visible = self.visible_columns();
        if key.code == KeyCode::Char('/') && self.has_search() {
            self.search_focused = true;
            return TableAction::Redraw;
        }
        if self.selection_bindings.is_toggle_all(key) {
            return self.toggle_page();
        }
        if self.selection_bindings.is_clear(key) && !self.selection.is_empty() {
            self.selection.clear();
            return TableAction::SelectionChanged;
        }
        if self.selection_bindings.is_toggle(key) && self.options.enable_row_selection {
            return match self.cursor.and_then(|c| page.get(c)) {
                Some(&i) => self.toggle_row(i),
                None => TableAction::None,
            };
        }
        if key.is_activate() {
            return match self.cursor.and_then(|c| page.get(c)) {
                Some(&i) if self.options.on_row_click => TableAction::RowClicked(i),
                Some(_) => TableAction::None,
                None if page.is_empty() => TableAction::None,
                None => {
                    self.cursor = Some(0);
                    TableAction::Redraw
                }
            };
        }
        let b = &self.bindings;
        if b.down.matches(key) || b.up.matches(key) || b.first.matches(key) || b.last.matches(key) {
            if page.is_empty() {
                return TableAction::None;
            }
            let last = page.len() - 1;
            let next = if b.down.matches(key) {
                self.cursor.map(|c| (c + 1).min(last)).unwrap_or(0)
            } else if b.up.matches(key) {
                self.cursor.map(|c| c.saturating_sub(1)).unwrap_or(0)
            } else if b.first.matches(key) {
                0
            } else {
                last
            };
            self.cursor = Some(next);
            self.viewport.ensure_visible(next as u32, 1);
            return TableAction::Redraw;
        }
        if b.right.matches(key) || b.left.matches(key) {
            if visible.is_empty() {
                return TableAction::None;
            }
            let cur = self.focus_col.min(visible.len() - 1);
            self.focus_col = if b.right.matches(key) {
                (cur + 1).min(visible.len() - 1)
            } else {
                cur.saturating_sub(1)
            };
            return TableAction::Redraw;
        }
        match key.code {
            KeyCode::Char('s') => {
                let Some(&col) = visible.get(self.focus_col) else {
                    return TableAction::None;
                };
                let id = self.columns[col].id.clone();
                if self.sort_by(&id) {
                    TableAction::SortChanged
                } else {
                    TableAction::None
                }
            }
            KeyCode::Char('a') => {
                let has_actions = self
                    .columns
                    .iter()
                    .any(|c| matches!(c.kind, ColumnKind::Actions));
                match self.cursor.and_then(|c| page.get(c)) {
                    Some(&i) if has_actions => TableAction::ActionsRequested(i),
                    _ => TableAction::None,
                }
            }
            KeyCode::PageDown | KeyCode::Char(']') => self.change_page(true),
            KeyCode::PageUp | KeyCode::Char('[') => self.change_page(false),
            _ => TableAction::None,
        }
    }

    fn column_at(&self, x: u16) -> Option<usize> {
        self.geometry
            .spans
            .iter()
            .find(|(sx, w, _)| x >= *sx && x < sx + w)
            .map(|(_, _, c)| *c)
    }

    fn handle_click(&mut self, x: u16, y: u16) -> TableAction {
        if let Some(search) = self.geometry.search {
            if search.contains((x, y).into()) {
                self.search_focused = true;
                return TableAction::Redraw;
            }
        }
        let col = self.column_at(x);
        if self.geometry.header_y == Some(y) {
            let Some(col) = col else {
                return TableAction::None;
            };
            if matches!(self.columns[col].kind, ColumnKind::Select) {
                return self.toggle_page();
            }
            let id = self.columns[col].id.clone();
            return if self.sort_by(&id) {
                TableAction::SortChanged
            } else {
                TableAction::None
            };
        }
        let body = self.geometry.body;
        if !body.contains((x, y).into()) {
            return TableAction::None;
        }
        let pos = (y - body.y) as usize + self.viewport.y as usize;
        let page = self.page_rows();
        let Some(&data_index) = page.get(pos) else {
            return TableAction::None;
        };
        self.cursor = Some(pos);
        match col.map(|c| &self.columns[c].kind) {
            Some(ColumnKind::Select) => self.toggle_row(data_index),
            Some(ColumnKind::Actions) => TableAction::ActionsRequested(data_index),
            _ if self.options.on_row_click => TableAction::RowClicked(data_index),
            _ => TableAction::Redraw,
        }
    }

    fn column_widths(&self, visible: &[usize], width: u16, gap: u16) -> Vec<u16> {
        let gaps = gap.saturating_mul(visible.len().saturating_sub(1) as u16);
        let fixed: u16 = visible.iter().filter_map(|&c| self.columns[c].width).sum();
        let flexible = visible
            .iter()
            .filter(|&&c| self.columns[c].width.is_none())
            .count() as u16;
        let rest = width.saturating_sub(gaps).saturating_sub(fixed);
        let share = if flexible == 0 { 0 } else { rest / flexible };
        let mut extra = if flexible == 0 { 0 } else { rest - share * flexible };
        visible
            .iter()
            .map(|&c| match self.columns[c].width {
                Some(w) => w,
                None => {
                    let bonus = u16::from(extra > 0);
                    extra = extra.saturating_sub(1);
                    share + bonus
                }
            })
            .collect()
    }

    fn cell_text(
        &self,
        col: &TableColumn<T>,
        row: &T,
        data_index: usize,
    ) -> (String, Style, Alignment) {
        let value = col.value_of(row);
        match &col.kind {
            ColumnKind::Text => (value.to_string(), Style::default(), Alignment::Left),
            ColumnKind::Number => (
                value.as_f64().map(format_number).unwrap_or_else(|| value.to_string()),
                Style::default().add_modifier(Modifier::BOLD),
                Alignment::Right,
            ),
            ColumnKind::Currency(code) => (
                value
                    .as_f64()
                    .map(|v| format_currency(v, code))
                    .unwrap_or_else(|| value.to_string()),
                Style::default().add_modifier(Modifier::BOLD),
                Alignment::Right,
            ),
            ColumnKind::Date => (
                format_date(&value.to_string()),
                Style::default(),
                Alignment::Left,
            ),
            ColumnKind::Badge(_) => (format!(" {value} "), Style::default(), Alignment::Left),
            ColumnKind::Avatar => {
                let name = value.to_string();
                let name = if name.trim().is_empty() { "User" } else { name.as_str() };
                (format!("({})", initials(name)), Style::default(), Alignment::Left)
            }
            ColumnKind::Select => {
                let on = self.selection.is_selected((self.row_id)(row, data_index));
                let glyph = if on { "[x]" } else { "[ ]" };
                (glyph.to_string(), Style::default(), Alignment::Left)
            }
            ColumnKind::Actions => ("⋯".to_string(), Style::default(), Alignment::Center),
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.geometry = Geometry::default();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let mut y = area.y;

        if self.has_search() {
            let label = "Search: ";
            let lw = render::display_width(label) as u16;
            render::render_str_clipped(area.x, y, area.width, buf, label, theme.text_muted);
            let input_w = area.width.saturating_sub(lw).min(40);
            let input = Rect::new(area.x + lw.min(area.width), y, input_w, 1);
            let style = if self.search_focused { theme.focus } else { theme.surface_muted };
            self.search.render(input, buf, style, theme.text_muted);
            self.geometry.search = Some(input);
            y += 2;
        }

        let order = self.display_order();
        let total = order.len();
        self.pagination.clamp(total);
        let page = if self.options.enable_pagination {
            order[self.pagination.range(total)].to_vec()
        } else {
            order
        };
        let show_footer = self.options.enable_pagination && self.pagination.page_count(total) > 1;
        let footer_h = u16::from(show_footer) * 2;
        let table_h = area.bottom().saturating_sub(y).saturating_sub(footer_h);
        if table_h == 0 {
            return;
        }
        let table_area = Rect::new(area.x, y, area.width, table_h);

        let borders = match self.options.variant {
            TableVariant::Default | TableVariant::Striped => Borders::ALL,
            TableVariant::Minimal => Borders::TOP,
        };
        let block = Block::default()
            .borders(borders)
            .border_type(BorderType::Rounded)
            .border_style(theme.border);
        let inner = block.inner(table_area);
        block.render(table_area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let (pad, gap) = match self.options.size {
            TableSize::Default => (1, 2),
            TableSize::Compact => (1, 1),
        };
        let inner = Rect::new(
            inner.x + pad,
            inner.y,
            inner.width.saturating_sub(pad * 2),
            inner.height,
        );
        let visible = self.visible_columns();
        let widths = self.column_widths(&visible, inner.width, gap);
        let mut x = inner.x;
        for (&c, &w) in visible.iter().zip(&widths) {
            let w = w.min(inner.right().saturating_sub(x));
            self.geometry.spans.push((x, w, c));
            x = x.saturating_add(w + gap);
        }

        // Header.
        let header_y = inner.y;
        self.geometry.header_y = Some(header_y);
        let page_ids = self.page_ids(&page);
        let focus_col = self.focus_col.min(visible.len().saturating_sub(1));
        for (slot, &(sx, w, c)) in self.geometry.spans.iter().enumerate() {
            let col = &self.columns[c];
            let mut text = match col.kind {
                ColumnKind::Select => self.selection.check_state(&page_ids).glyph().to_string(),
                _ => col.header.clone(),
            };
            if col.sortable && self.options.enable_sorting {
                let glyph = self.sort.direction(&col.id).map(|d| d.glyph()).unwrap_or("↕");
                text = format!("{text} {glyph}");
            }
            let mut style = theme.text_muted.add_modifier(Modifier::BOLD);
            if slot == focus_col && self.cursor.is_some() {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            let align = if col.right_aligned() { Alignment::Right } else { Alignment::Left };
            let cell = Rect::new(sx, header_y, w, 1);
            render::render_aligned(cell, header_y, buf, &text, style, align);
        }
        if inner.height > 1 {
            let rule = "─".repeat(inner.width as usize);
            render::render_str_clipped(
                inner.x,
                header_y + 1,
                inner.width,
                buf,
                &rule,
                theme.border,
            );
        }

        let body = Rect::new(
            inner.x,
            inner.y + 2.min(inner.height),
            inner.width,
            inner.height.saturating_sub(2),
        );
        self.geometry.body = body;
        if page.is_empty() {
            EmptyState::new(&self.options.empty_message).render(body, buf, theme);
        } else {
            self.viewport.set_viewport(body.width, body.height);
            self.viewport.set_content(body.width as u32, page.len() as u32);
            if let Some(c) = self.cursor {
                let c = c.min(page.len() - 1);
                self.cursor = Some(c);
                self.viewport.ensure_visible(c as u32, 1);
            }
            let start = self.viewport.y as usize;
            for (offset, &data_index) in page.iter().enumerate().skip(start) {
                let ry = body.y + (offset - start) as u16;
                if ry >= body.bottom() {
                    break;
                }
                let row_rect = Rect::new(body.x, ry, body.width, 1);
                let row = &self.rows[data_index];
                let selected = self.selection.is_selected((self.row_id)(row, data_index));
                if self.options.variant == TableVariant::Striped && offset % 2 == 1 {
                    buf.set_style(row_rect, theme.surface_muted);
                }
                if selected {
                    buf.set_style(row_rect, theme.surface_muted.add_modifier(Modifier::BOLD));
                }
                if self.cursor == Some(offset) {
                    buf.set_style(row_rect, theme.focus);
                }
                for &(sx, w, c) in &self.geometry.spans {
                    let col = &self.columns[c];
                    let (text, style, align) = self.cell_text(col, row, data_index);
                    let style = match &col.kind {
                        ColumnKind::Badge(tone) => {
                            let tone =
                                tone.as_ref().map(|f| f(text.trim())).unwrap_or(Tone::Primary);
                            theme.tone_style(tone).add_modifier(Modifier::REVERSED)
                        }
                        _ => theme.text_primary.patch(style),
                    };
                    let cell = Rect::new(sx, ry, w, 1);
                    let text = crate::wrapping::truncate_to_width(&text, w);
                    render::render_aligned(cell, ry, buf, &text, style, align);
                }
            }
        }

        if show_footer {
            let fy = table_area.bottom() + 1;
            if fy < area.bottom() {
                self.geometry.footer_y = Some(fy);
                if self.options.enable_row_selection {
                    render::render_str_clipped(
                        area.x,
                        fy,
                        area.width,
                        buf,
                        &self.selection_summary(),
                        theme.text_muted,
                    );
                }
                let prev = if self.pagination.can_prev() { "‹" } else { " " };
                let next = if self.pagination.can_next(total) { "›" } else { " " };
                let pager = format!(
                    "Page {} of {}  {prev} {next}",
                    self.pagination.page() + 1,
                    self.pagination.page_count(total)
                );
                render::render_aligned(area, fy, buf, &pager, theme.text_primary, Alignment::Right);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::buffer_lines;

    #[derive(Clone, Debug, PartialEq)]
    struct Person {
        id: u64,
        name: String,
        amount: f64,
    }

    impl Record for Person {
        fn values(&self) -> Vec<Value> {
            vec![Value::Int(self.id as i64), self.name.as_str().into(), self.amount.into()]
        }
    }

    fn person(id: u64, name: &str) -> Person {
        Person {
            id,
            name: name.to_string(),
            amount: id as f64 * 1000.5,
        }
    }

    fn columns() -> Vec<TableColumn<Person>> {
        vec![
            TableColumn::select(),
            TableColumn::sortable("name", "Name", |p: &Person| p.name.as_str().into()),
            TableColumn::currency("amount", "Amount", None, |p: &Person| p.amount.into()),
        ]
    }

    fn table(rows: Vec<Person>, options: TableCollectionOptions) -> TableCollection<Person> {
        TableCollection::new(rows, columns(), options).with_row_id(|p, _| RowId(p.id))
    }

    fn names(t: &TableCollection<Person>) -> Vec<String> {
        t.page_rows().iter().map(|&i| t.rows()[i].name.clone()).collect()
    }

    #[test]
    fn sorting_by_name_ascending() {
        let mut t = table(
            vec![person(1, "B"), person(2, "A")],
            TableCollectionOptions {
                enable_sorting: true,
                ..Default::default()
            },
        );
        assert!(t.sort_by("name"));
        assert_eq!(names(&t), vec!["A", "B"]);
        assert!(t.sort_by("name"));
        assert_eq!(names(&t), vec!["B", "A"]);
    }

    #[test]
    fn sorting_requires_sortable_column_and_option() {
        let mut t = table(vec![person(1, "B"), person(2, "A")], TableCollectionOptions::default());
        assert!(!t.sort_by("name"));
        let mut t = table(
            vec![person(1, "B")],
            TableCollectionOptions {
                enable_sorting: true,
                ..Default::default()
            },
        );
        assert!(!t.sort_by("amount"));
    }

    #[test]
    fn search_filters_only_when_enabled() {
        let rows = vec![person(1, "John Doe"), person(2, "Jane Smith")];
        let mut t = table(rows.clone(), TableCollectionOptions::default());
        t.set_query("oe");
        assert_eq!(names(&t).len(), 2);
        let mut t = table(
            rows,
            TableCollectionOptions {
                enable_filtering: true,
                ..Default::default()
            },
        );
        t.set_query("oe");
        assert_eq!(names(&t), vec!["John Doe"]);
    }

    #[test]
    fn pagination_and_summary() {
        let rows: Vec<Person> = (1..=25).map(|i| person(i, &format!("P{i:02}"))).collect();
        let mut t = table(
            rows,
            TableCollectionOptions {
                enable_pagination: true,
                enable_row_selection: true,
                ..Default::default()
            },
        );
        assert_eq!(t.page_count(), 3);
        t.set_page(9);
        assert_eq!(t.page(), 2);
        assert_eq!(names(&t).len(), 5);
        t.handle_event(&InputEvent::key(KeyCode::Down));
        assert_eq!(
            t.handle_event(&InputEvent::key(KeyCode::Char(' '))),
            TableAction::SelectionChanged
        );
        assert_eq!(t.selection_summary(), "1 of 25 row(s) selected.");
    }

    #[test]
    fn selection_follows_rows_not_positions() {
        let mut t = table(
            vec![person(1, "B"), person(2, "A")],
            TableCollectionOptions {
                enable_sorting: true,
                enable_row_selection: true,
                ..Default::default()
            },
        );
        t.handle_event(&InputEvent::key(KeyCode::Down));
        t.handle_event(&InputEvent::key(KeyCode::Char(' ')));
        assert_eq!(t.selected_rows()[0].name, "B");
        t.sort_by("name");
        assert_eq!(t.selected_rows()[0].name, "B");
        assert!(t.selection().is_selected(RowId(1)));
    }

    #[test]
    fn enter_reports_row_click() {
        let mut t = table(
            vec![person(1, "B"), person(2, "A")],
            TableCollectionOptions {
                on_row_click: true,
                ..Default::default()
            },
        );
        t.handle_event(&InputEvent::key(KeyCode::End));
        assert_eq!(t.handle_event(&InputEvent::key(KeyCode::Enter)), TableAction::RowClicked(1));
    }

    #[test]
    fn limit_applies_before_everything() {
        let t = table(
            vec![person(1, "A"), person(2, "B"), person(3, "C")],
            TableCollectionOptions {
                limit: Some(2),
                ..Default::default()
            },
        );
        assert_eq!(names(&t), vec!["A", "B"]);
    }

    #[test]
    fn hidden_columns_are_skipped() {
        let mut t = table(vec![person(1, "A")], TableCollectionOptions::default());
        t.set_column_visible("amount", false);
        assert!(!t.is_column_visible("amount"));
        t.set_column_visible("select", false);
        assert!(t.is_column_visible("select"));
    }

    #[test]
    fn renders_header_rows_and_currency() {
        let mut t = table(vec![person(1, "Ann")], TableCollectionOptions::default());
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        let text = buffer_lines(&buf).join("\n");
        assert!(text.contains("Name"));
        assert!(text.contains("Ann"));
        assert!(text.contains("$1,000.50"));
    }

    #[test]
    fn empty_table_shows_message() {
        let mut t = table(Vec::new(), TableCollectionOptions::default());
        let area = Rect::new(0, 0, 40, 8);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        assert!(buffer_lines(&buf).join("\n").contains("No results."));
    }

    #[test]
    fn footer_shows_page_position() {
        let rows: Vec<Person> = (1..=12).map(|i| person(i, "x")).collect();
        let mut t = table(
            rows,
            TableCollectionOptions {
                enable_pagination: true,
                ..Default::default()
            },
        );
        let area = Rect::new(0, 0, 50, 18);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        assert!(buffer_lines(&buf).join("\n").contains("Page 1 of 2"));
    }
}
