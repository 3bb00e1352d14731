//! Spreadsheet-style editable grid over a working copy of the host's rows.
//!
//! The grid owns its rows. Edits, added rows and deletions replace the working copy and are
//! reported as [`DataGridAction::RowsChanged`]; the host reads the new data from
//! [`DataGrid::rows`]. Calling [`DataGrid::set_data`] resynchronizes the copy from the host.
//!
//! Columns come either from typed accessors ([`DataGridColumn`]) or from loosely typed
//! [`ColumnDefinition`]s that drive a grid of [`DynamicRow`]s.
use crate::collection::EmptyState;
use crate::data::DynamicRow;
use crate::data::Record;
use crate::data::SortColumn;
use crate::data::SortState;
use crate::data::Value;
use crate::data::display_order;
use crate::data::format_date;
use crate::data::format_number;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::input::MouseEventKind;
use crate::line_input::LineInput;
use crate::line_input::LineInputAction;
use crate::render;
use crate::selection::RowId;
use crate::selection::RowSelection;
use crate::selection::SelectionBindings;
use crate::theme::Theme;
use glide_ui_core::datagrid::view::Cell;
use glide_ui_core::datagrid::view::GridAction;
use glide_ui_core::datagrid::view::GridColumn;
use glide_ui_core::datagrid::view::GridView;
use glide_ui_core::datagrid::view::GridViewOptions;
use ratatui::buffer::Buffer;
use ratatui::layout::Alignment;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;
use std::collections::BTreeSet;
use std::sync::Arc;

pub use crate::table::TableSize as DataGridSize;
pub use crate::table::TableVariant as DataGridVariant;

const DEFAULT_COLUMN_WIDTH: u16 = 14;
const SELECT_COLUMN_WIDTH: u16 = 3;
const ROW_NUMBER_KEY: &str = "__row_number__";

pub type Getter<T> = Arc<dyn Fn(&T) -> Value + Send + Sync>;
/// Produces an updated copy of a row with one field replaced.
pub type Setter<T> = Arc<dyn Fn(&T, Value) -> T + Send + Sync>;
pub type RowFactory<T> = Arc<dyn Fn() -> T + Send + Sync>;

/// Cell kind, shared by typed columns and [`ColumnDefinition`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColumnType {
    #[default]
    Text,
    Number,
    Date,
    Select,
}

/// Column description from an external source, e.g. a JSON schema served by an API.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct ColumnDefinition {
    pub key: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "type", default))]
    pub column_type: ColumnType,
    #[cfg_attr(feature = "serde", serde(default))]
    pub editable: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub options: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub width: Option<u16>,
}

impl ColumnDefinition {
    pub fn new(key: impl Into<String>, name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            column_type,
            ..Self::default()
        }
    }

    pub fn editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn options<S: Into<String>>(mut self, options: impl IntoIterator<Item = S>) -> Self {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }
}

pub struct DataGridColumn<T> {
    pub key: String,
    pub name: String,
    pub column_type: ColumnType,
    pub width: Option<u16>,
    /// Choices offered by a select editor.
    pub options: Vec<String>,
    get: Option<Getter<T>>,
    set: Option<Setter<T>>,
}

impl<T> Clone for DataGridColumn<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            name: self.name.clone(),
            column_type: self.column_type,
            width: self.width,
            options: self.options.clone(),
            get: self.get.clone(),
            set: self.set.clone(),
        }
    }
}

impl<T> DataGridColumn<T> {
    fn build(
        key: impl Into<String>,
        name: impl Into<String>,
        column_type: ColumnType,
        get: Option<Getter<T>>,
        set: Option<Setter<T>>,
    ) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            column_type,
            width: None,
            options: Vec::new(),
            get,
            set,
        }
    }

    /// Read-only text column.
    pub fn text(
        key: impl Into<String>,
        name: impl Into<String>,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self::build(key, name, ColumnType::Text, Some(Arc::new(get)), None)
    }

    pub fn editable_text(
        key: impl Into<String>,
        name: impl Into<String>,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
        set: impl Fn(&T, Value) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::build(key, name, ColumnType::Text, Some(Arc::new(get)), Some(Arc::new(set)))
    }

    /// Right-aligned, locale-grouped number. An emptied cell stores `Value::Null`.
    pub fn editable_number(
        key: impl Into<String>,
        name: impl Into<String>,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
        set: impl Fn(&T, Value) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::build(key, name, ColumnType::Number, Some(Arc::new(get)), Some(Arc::new(set)))
    }

    /// `YYYY-MM-DD` values displayed as "Jan 5, 2024".
    pub fn editable_date(
        key: impl Into<String>,
        name: impl Into<String>,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
        set: impl Fn(&T, Value) -> T + Send + Sync + 'static,
    ) -> Self {
        Self::build(key, name, ColumnType::Date, Some(Arc::new(get)), Some(Arc::new(set)))
    }

    pub fn editable_select<S: Into<String>>(
        key: impl Into<String>,
        name: impl Into<String>,
        options: impl IntoIterator<Item = S>,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
        set: impl Fn(&T, Value) -> T + Send + Sync + 'static,
    ) -> Self {
        let mut column =
            Self::build(key, name, ColumnType::Select, Some(Arc::new(get)), Some(Arc::new(set)));
        column.options = options.into_iter().map(Into::into).collect();
        column
    }

    /// Read-only "#" column showing the displayed position, starting at 1.
    pub fn row_number() -> Self {
        let mut column = Self::build(ROW_NUMBER_KEY, "#", ColumnType::Number, None, None);
        column.width = Some(4);
        column
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn is_editable(&self) -> bool {
        self.set.is_some()
    }

    fn is_row_number(&self) -> bool {
        self.get.is_none()
    }

    pub fn value_of(&self, row: &T) -> Value {
        self.get.as_ref().map(|f| f(row)).unwrap_or_default()
    }

    fn display(&self, row: &T, position: usize) -> (String, Alignment) {
        if self.is_row_number() {
            return ((position + 1).to_string(), Alignment::Center);
        }
        let value = self.value_of(row);
        match self.column_type {
            ColumnType::Number => (
                value
                    .as_f64()
                    .map(format_number)
                    .unwrap_or_else(|| value.to_string()),
                Alignment::Right,
            ),
            ColumnType::Date if value.is_null() || value.to_string().is_empty() => {
                (String::new(), Alignment::Left)
            }
            ColumnType::Date => (format_date(&value.to_string()), Alignment::Left),
            ColumnType::Text | ColumnType::Select => (value.to_string(), Alignment::Left),
        }
    }
}

/// Columns for [`DynamicRow`] data. Non-editable definitions become read-only text columns.
pub fn columns_from_definitions(
    definitions: &[ColumnDefinition],
) -> Vec<DataGridColumn<DynamicRow>> {
    definitions
        .iter()
        .map(|def| {
            let key = def.key.clone();
            let get = move |row: &DynamicRow| row.get(&key);
            let key = def.key.clone();
            let set = move |row: &DynamicRow, value: Value| {
                let mut next = row.clone();
                next.set(key.clone(), value);
                next
            };
            let column = if !def.editable {
                DataGridColumn::text(&def.key, &def.name, get)
            } else {
                match def.column_type {
                    ColumnType::Text => {
                        DataGridColumn::editable_text(&def.key, &def.name, get, set)
                    }
                    ColumnType::Number => {
                        DataGridColumn::editable_number(&def.key, &def.name, get, set)
                    }
                    ColumnType::Date => {
                        DataGridColumn::editable_date(&def.key, &def.name, get, set)
                    }
                    ColumnType::Select => DataGridColumn::editable_select(
                        &def.key,
                        &def.name,
                        def.options.iter().cloned(),
                        get,
                        set,
                    ),
                }
            };
            match def.width {
                Some(w) => column.width(w),
                None => column,
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct DataGridOptions {
    pub variant: DataGridVariant,
    pub size: DataGridSize,
    pub enable_row_selection: bool,
    pub enable_add_row: bool,
    pub enable_delete_row: bool,
    pub enable_search: bool,
    pub enable_sorting: bool,
    pub search_placeholder: String,
    pub show_toolbar: bool,
    pub empty_message: String,
    /// Terminal lines per body row.
    pub row_height: u16,
}

impl Default for DataGridOptions {
    fn default() -> Self {
        Self {
            variant: DataGridVariant::Default,
            size: DataGridSize::Default,
            enable_row_selection: false,
            enable_add_row: false,
            enable_delete_row: false,
            enable_search: false,
            enable_sorting: false,
            search_placeholder: "Search...".to_string(),
            show_toolbar: true,
            empty_message: "No data available".to_string(),
            row_height: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataGridAction {
    None,
    Redraw,
    /// The working copy changed; read it back with [`DataGrid::rows`].
    RowsChanged,
    SelectionChanged,
    SortChanged,
    SearchChanged,
    /// TSV text the host should put on the clipboard.
    CopyRequested(String),
}

struct CellEditor {
    data_index: usize,
    column: usize,
    input: LineInput,
    /// Index into `["", options..]` for select columns.
    choice: usize,
}

#[derive(Clone, Copy, Debug, Default)]
struct Geometry {
    search: Option<Rect>,
    add: Option<Rect>,
    delete: Option<Rect>,
    copy: Option<Rect>,
}

pub struct DataGrid<T> {
    rows: Vec<T>,
    columns: Vec<DataGridColumn<T>>,
    options: DataGridOptions,
    row_id: Arc<dyn Fn(&T, usize) -> RowId + Send + Sync>,
    add_row: Option<RowFactory<T>>,
    grid: GridView,
    search: LineInput,
    search_focused: bool,
    sort: SortState,
    selection: RowSelection,
    selection_bindings: SelectionBindings,
    editor: Option<CellEditor>,
    geometry: Geometry,
}

impl DataGrid<DynamicRow> {
    /// A grid whose columns are generated from external definitions.
    pub fn from_definitions(
        rows: Vec<DynamicRow>,
        definitions: &[ColumnDefinition],
        options: DataGridOptions,
    ) -> Self {
        Self::new(rows, columns_from_definitions(definitions), options)
    }
}

impl<T: Record> DataGrid<T> {
    pub fn new(rows: Vec<T>, columns: Vec<DataGridColumn<T>>, options: DataGridOptions) -> Self {
        let col_gap = match options.size {
            DataGridSize::Default => 1,
            DataGridSize::Compact => 0,
        };
        let grid = GridView::with_options(GridViewOptions {
            multi_select: false,
            col_gap,
            row_height: options.row_height.max(1),
            ..GridViewOptions::default()
        });
        let search = LineInput::new().placeholder(options.search_placeholder.clone());
        let mut this = Self {
            rows,
            columns,
            options,
            row_id: Arc::new(|_, i| RowId(i as u64)),
            add_row: None,
            grid,
            search,
            search_focused: false,
            sort: SortState::new(),
            selection: RowSelection::new(),
            selection_bindings: SelectionBindings::default(),
            editor: None,
            geometry: Geometry::default(),
        };
        this.sync_grid();
        this
    }

    /// Identity used for selection. Defaults to the row's position in the working copy.
    pub fn with_row_id(mut self, f: impl Fn(&T, usize) -> RowId + Send + Sync + 'static) -> Self {
        self.row_id = Arc::new(f);
        self
    }

    /// Factory for rows appended by "Add Entry".
    pub fn with_add_row(mut self, f: impl Fn() -> T + Send + Sync + 'static) -> Self {
        self.add_row = Some(Arc::new(f));
        self
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// Replaces the working copy with fresh host data.
    pub fn set_data(&mut self, rows: Vec<T>) {
        tracing::debug!(rows = rows.len(), "data grid resynchronized from host data");
        self.rows = rows;
        self.editor = None;
        let present: BTreeSet<RowId> = self.ids().into_iter().collect();
        self.selection.retain(|id| present.contains(&id));
        self.sync_grid();
    }

    pub fn columns(&self) -> &[DataGridColumn<T>] {
        &self.columns
    }

    pub fn options(&self) -> &DataGridOptions {
        &self.options
    }

    pub fn query(&self) -> &str {
        self.search.text()
    }

    pub fn set_query(&mut self, query: &str) {
        self.search.set_text(query);
        self.sync_grid();
    }

    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Cycles sorting on a column: ascending, descending, off.
    ///
    /// With `multi`, the other sorted columns are kept at lower priority.
    pub fn toggle_sort(&mut self, key: &str, multi: bool) -> bool {
        let known = self.columns.iter().any(|c| c.key == key && !c.is_row_number());
        if !(self.options.enable_sorting && known) {
            return false;
        }
        self.sort.toggle_three_way(key, multi);
        self.sync_grid();
        true
    }

    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    pub fn cursor(&self) -> Option<Cell> {
        self.grid.cursor()
    }

    pub fn set_cursor(&mut self, cell: Option<Cell>) {
        self.grid.set_cursor(cell);
    }

    fn ids(&self) -> Vec<RowId> {
        self.rows
            .iter()
            .enumerate()
            .map(|(i, r)| (self.row_id)(r, i))
            .collect()
    }

    fn is_selected(&self, data_index: usize) -> bool {
        self.rows
            .get(data_index)
            .is_some_and(|r| self.selection.is_selected((self.row_id)(r, data_index)))
    }

    /// Positions into the working copy, after search and sort.
    pub fn display_order(&self) -> Vec<usize> {
        let query = if self.options.enable_search {
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
        display_order(&self.rows, query, sort, |row, key| {
            columns
                .iter()
                .find(|c| c.key == key)
                .map(|c| c.value_of(row))
                .unwrap_or_default()
        })
    }

    /// Offset of the first data column in the grid, after the optional checkbox column.
    fn column_offset(&self) -> usize {
        usize::from(self.options.enable_row_selection)
    }

    fn sync_grid(&mut self) {
        let mut grid_columns = Vec::with_capacity(self.columns.len() + 1);
        if self.options.enable_row_selection {
            let ids = self.ids();
            let glyph = self.selection.check_state(&ids).glyph();
            grid_columns.push(GridColumn::new(glyph, SELECT_COLUMN_WIDTH));
        }
        for column in &self.columns {
            let mut title = column.name.clone();
            if self.options.enable_sorting && !column.is_row_number() {
                let sorted = self.sort.columns();
                if let Some(pos) = sorted.iter().position(|s| s.key == column.key) {
                    title.push(' ');
                    title.push_str(sorted[pos].direction.glyph());
                    if sorted.len() > 1 {
                        title.push_str(&(pos + 1).to_string());
                    }
                }
            }
            let width = column
                .width
                .unwrap_or_else(|| {
                    DEFAULT_COLUMN_WIDTH.max(render::display_width(&title) as u16 + 1)
                });
            grid_columns.push(GridColumn::new(title, width));
        }
        self.grid.set_columns(grid_columns);
        self.grid.set_row_count(self.display_order().len());
    }

    /// Selected rows in working-copy order.
    pub fn selected_rows(&self) -> Vec<&T> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(i, _)| self.is_selected(*i))
            .map(|(_, r)| r)
            .collect()
    }

    /// Rows as tab-separated values with a header row of column names.
    ///
    /// Null values become empty strings; the row-number column is left out.
    pub fn to_tsv<'a>(&'a self, rows: impl IntoIterator<Item = &'a T>) -> String {
        let columns: Vec<&DataGridColumn<T>> =
            self.columns.iter().filter(|c| !c.is_row_number()).collect();
        let mut out = columns
            .iter()
            .map(|c| c.name.as_str())
            .collect::<Vec<_>>()
            .join("\t");
        for row in rows {
            out.push('\n');
            let cells: Vec<String> = columns.iter().map(|c| c.value_of(row).to_string()).collect();
            out.push_str(&cells.join("\t"));
        }
        out
    }

    pub fn copy_selected(&self) -> DataGridAction {
        if self.selection.is_empty() {
            return DataGridAction::None;
        }
        DataGridAction::CopyRequested(self.to_tsv(self.selected_rows()))
    }

    pub fn copy_all(&self) -> DataGridAction {
        DataGridAction::CopyRequested(self.to_tsv(self.rows.iter()))
    }

    /// Appends a row from the factory.
    pub fn add_row(&mut self) -> DataGridAction {
        let Some(factory) = self.add_row.as_ref().filter(|_| self.options.enable_add_row) else {
            return DataGridAction::None;
        };
        let row = factory();
        self.rows.push(row);
        tracing::debug!(rows = self.rows.len(), "data grid row added");
        self.sync_grid();
        DataGridAction::RowsChanged
    }

    /// Removes every selected row and clears the selection.
    pub fn delete_selected(&mut self) -> DataGridAction {
        if !self.options.enable_delete_row || self.selection.is_empty() {
            return DataGridAction::None;
        }
        let before = self.rows.len();
        let keep: Vec<bool> = (0..before).map(|i| !self.is_selected(i)).collect();
        let mut flags = keep.into_iter();
        self.rows.retain(|_| flags.next().unwrap_or(true));
        self.selection.clear();
        self.editor = None;
        tracing::debug!(removed = before - self.rows.len(), "data grid rows deleted");
        self.sync_grid();
        DataGridAction::RowsChanged
    }

    /// Replaces one field through the column setter.
    pub fn edit_cell(&mut self, data_index: usize, key: &str, value: Value) -> DataGridAction {
        let Some(column) = self.columns.iter().find(|c| c.key == key) else {
            return DataGridAction::None;
        };
        let (Some(set), Some(row)) = (column.set.as_ref(), self.rows.get(data_index)) else {
            return DataGridAction::None;
        };
        let next = set(row, value);
        self.rows[data_index] = next;
        tracing::debug!(row = data_index, column = key, "data grid cell edited");
        self.sync_grid();
        DataGridAction::RowsChanged
    }

    fn toggle_row(&mut self, data_index: usize) -> DataGridAction {
        if !self.options.enable_row_selection {
            return DataGridAction::None;
        }
        let Some(row) = self.rows.get(data_index) else {
            return DataGridAction::None;
        };
        self.selection.toggle((self.row_id)(row, data_index));
        self.sync_grid();
        DataGridAction::SelectionChanged
    }

    fn toggle_all(&mut self) -> DataGridAction {
        if !self.options.enable_row_selection {
            return DataGridAction::None;
        }
        let ids: Vec<RowId> = self
            .display_order()
            .into_iter()
            .map(|i| (self.row_id)(&self.rows[i], i))
            .collect();
        self.selection.toggle_all(&ids);
        self.sync_grid();
        DataGridAction::SelectionChanged
    }

    fn has_search(&self) -> bool {
        self.options.show_toolbar && self.options.enable_search
    }

    fn can_add(&self) -> bool {
        self.options.enable_add_row && self.add_row.is_some()
    }

    fn has_toolbar(&self) -> bool {
        self.options.show_toolbar
            && (self.options.enable_search
                || self.can_add()
                || !self.selection.is_empty())
    }

    /// Opens the editor on a grid cell if its column is editable.
    fn begin_edit(&mut self, cell: Cell) -> DataGridAction {
        let Some(column_index) = cell.col.checked_sub(self.column_offset()) else {
            return DataGridAction::None;
        };
        let order = self.display_order();
        let (Some(column), Some(&data_index)) =
            (self.columns.get(column_index), order.get(cell.row))
        else {
            return DataGridAction::None;
        };
        if !column.is_editable() {
            return DataGridAction::None;
        }
        let current = column.value_of(&self.rows[data_index]).to_string();
        let choice = column
            .options
            .iter()
            .position(|o| *o == current)
            .map(|p| p + 1)
            .unwrap_or(0);
        self.editor = Some(CellEditor {
            data_index,
            column: column_index,
            input: LineInput::with_text(current),
            choice,
        });
        DataGridAction::Redraw
    }

    fn commit_edit(&mut self, editor: CellEditor) -> DataGridAction {
        let Some(column) = self.columns.get(editor.column) else {
            return DataGridAction::None;
        };
        let text = editor.input.text().trim().to_string();
        let value = match column.column_type {
            ColumnType::Number if text.is_empty() => Value::Null,
            ColumnType::Number => match parse_number(&text) {
                Some(v) => v,
                None => {
                    tracing::debug!(input = %text, "rejected non-numeric cell edit");
                    self.editor = Some(editor);
                    return DataGridAction::Redraw;
                }
            },
            ColumnType::Select => {
                let choice = editor
                    .choice
                    .checked_sub(1)
                    .and_then(|i| column.options.get(i))
                    .cloned()
                    .unwrap_or_default();
                Value::Text(choice)
            }
            ColumnType::Text | ColumnType::Date => Value::Text(editor.input.text().to_string()),
        };
        let key = column.key.clone();
        self.edit_cell(editor.data_index, &key, value)
    }

    fn handle_editor(&mut self, event: &InputEvent) -> DataGridAction {
        let Some(mut editor) = self.editor.take() else {
            return DataGridAction::None;
        };
        let is_select = self
            .columns
            .get(editor.column)
            .is_some_and(|c| c.column_type == ColumnType::Select);
        if is_select {
            let choices = self.columns[editor.column].options.len() + 1;
            let InputEvent::Key(key) = event else {
                self.editor = Some(editor);
                return DataGridAction::None;
            };
            return match key.code {
                KeyCode::Esc => DataGridAction::Redraw,
                KeyCode::Enter => self.commit_edit(editor),
                KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
                    editor.choice = (editor.choice + 1) % choices;
                    self.editor = Some(editor);
                    DataGridAction::Redraw
                }
                KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
                    editor.choice = (editor.choice + choices - 1) % choices;
                    self.editor = Some(editor);
                    DataGridAction::Redraw
                }
                _ => {
                    self.editor = Some(editor);
                    DataGridAction::None
                }
            };
        }
        match editor.input.input(event.clone()) {
            LineInputAction::Submitted(_) => self.commit_edit(editor),
            LineInputAction::Cancelled => DataGridAction::Redraw,
            LineInputAction::Changed => {
                self.editor = Some(editor);
                DataGridAction::Redraw
            }
            LineInputAction::None => {
                self.editor = Some(editor);
                DataGridAction::None
            }
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> DataGridAction {
        if self.editor.is_some() {
            return self.handle_editor(event);
        }
        if self.search_focused {
            return match self.search.input(event.clone()) {
                LineInputAction::Changed => {
                    self.sync_grid();
                    DataGridAction::SearchChanged
                }
                LineInputAction::Submitted(_) | LineInputAction::Cancelled => {
                    self.search_focused = false;
                    DataGridAction::Redraw
                }
                LineInputAction::None => DataGridAction::Redraw,
            };
        }
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(m) if m.is_click() => {
                if let Some(action) = self.handle_toolbar_click(m.x, m.y) {
                    return action;
                }
                let grid_action = self.grid.handle_event(event);
                let on_checkbox = self.options.enable_row_selection
                    && self.grid.cursor().is_some_and(|c| c.col == 0);
                if grid_action == GridAction::Redraw && on_checkbox {
                    if let Some(cell) = self.grid.cursor() {
                        return self.apply_grid_action(GridAction::Activated(cell), false);
                    }
                }
                self.apply_grid_action(grid_action, m.modifiers.ctrl || m.modifiers.shift)
            }
            InputEvent::Mouse(m)
                if matches!(
                    m.kind,
                    MouseEventKind::ScrollUp | MouseEventKind::ScrollDown
                ) =>
            {
                let grid_action = self.grid.handle_event(event);
                self.apply_grid_action(grid_action, false)
            }
            _ => DataGridAction::None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> DataGridAction {
        if key.code == KeyCode::Char('/') && self.has_search() {
            self.search_focused = true;
            return DataGridAction::Redraw;
        }
        if self.selection_bindings.is_toggle_all(key) {
            return self.toggle_all();
        }
        if self.selection_bindings.is_clear(key) && !self.selection.is_empty() {
            self.selection.clear();
            self.sync_grid();
            return DataGridAction::SelectionChanged;
        }
        if self.selection_bindings.is_toggle(key) && self.options.enable_row_selection {
            let order = self.display_order();
            return match self.grid.cursor().and_then(|c| order.get(c.row)) {
                Some(&i) => self.toggle_row(i),
                None => DataGridAction::None,
            };
        }
        if self.selection_bindings.is_copy(key) {
            return self.copy_selected();
        }
        match key.code {
            KeyCode::Char('Y') => return self.copy_all(),
            KeyCode::Char('n') => return self.add_row(),
            KeyCode::Char('d') | KeyCode::Delete => return self.delete_selected(),
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let multi = key.code == KeyCode::Char('S');
                let Some(column) = self
                    .grid
                    .cursor()
                    .and_then(|c| c.col.checked_sub(self.column_offset()))
                    .and_then(|c| self.columns.get(c))
                else {
                    return DataGridAction::None;
                };
                let key = column.key.clone();
                return if self.toggle_sort(&key, multi) {
                    DataGridAction::SortChanged
                } else {
                    DataGridAction::None
                };
            }
            _ => {}
        }
        if self.grid.cursor().is_none() && self.grid.row_count() > 0 && key.is_activate() {
            self.grid.set_cursor(Some(Cell { row: 0, col: self.column_offset() }));
            return DataGridAction::Redraw;
        }
        let grid_action = self.grid.handle_event(&InputEvent::Key(key.clone()));
        self.apply_grid_action(grid_action, false)
    }

    fn apply_grid_action(&mut self, action: GridAction, multi: bool) -> DataGridAction {
        match action {
            GridAction::None => DataGridAction::None,
            GridAction::Redraw | GridAction::SelectionChanged => DataGridAction::Redraw,
            GridAction::HeaderClicked(col) => match col.checked_sub(self.column_offset()) {
                None => self.toggle_all(),
                Some(c) => {
                    let Some(key) = self.columns.get(c).map(|c| c.key.clone()) else {
                        return DataGridAction::None;
                    };
                    if self.toggle_sort(&key, multi) {
                        DataGridAction::SortChanged
                    } else {
                        DataGridAction::None
                    }
                }
            },
            GridAction::Activated(cell) => {
                if self.options.enable_row_selection && cell.col == 0 {
                    let order = self.display_order();
                    return match order.get(cell.row) {
                        Some(&i) => self.toggle_row(i),
                        None => DataGridAction::None,
                    };
                }
                self.begin_edit(cell)
            }
        }
    }

    fn handle_toolbar_click(&mut self, x: u16, y: u16) -> Option<DataGridAction> {
        let hit = |r: Option<Rect>| r.is_some_and(|r| r.contains((x, y).into()));
        if hit(self.geometry.search) {
            self.search_focused = true;
            return Some(DataGridAction::Redraw);
        }
        if hit(self.geometry.add) {
            return Some(self.add_row());
        }
        if hit(self.geometry.delete) {
            return Some(self.delete_selected());
        }
        if hit(self.geometry.copy) {
            return Some(self.copy_selected());
        }
        None
    }

    fn render_toolbar(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let mut right = area.right();
        let mut button = |label: &str, style, right: &mut u16| -> Option<Rect> {
            let w = render::display_width(label) as u16;
            if w + 1 > right.saturating_sub(area.x) {
                return None;
            }
            *right -= w;
            let rect = Rect::new(*right, area.y, w, 1);
            render::render_str_clipped(rect.x, rect.y, w, buf, label, style);
            *right = right.saturating_sub(1);
            Some(rect)
        };
        let selected = self.selection.len();
        if selected > 0 {
            self.geometry.copy = button("[Copy]", theme.text_primary, &mut right);
        }
        if self.options.enable_delete_row && selected > 0 {
            let label = format!("[Delete ({selected})]");
            self.geometry.delete = button(&label, theme.danger, &mut right);
        }
        if self.can_add() {
            self.geometry.add = button("[+ Add Entry]", theme.accent, &mut right);
        }
        if self.options.enable_search {
            let label = "Search: ";
            let lw = render::display_width(label) as u16;
            render::render_str_clipped(area.x, area.y, area.width, buf, label, theme.text_muted);
            let x = area.x + lw.min(area.width);
            let w = right.saturating_sub(x).saturating_sub(1).min(40);
            let input = Rect::new(x, area.y, w, 1);
            let style = if self.search_focused {
                theme.focus
            } else {
                theme.surface_muted
            };
            self.search.render(input, buf, style, theme.text_muted);
            self.geometry.search = Some(input);
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.geometry = Geometry::default();
        if area.width == 0 || area.height == 0 {
            return;
        }
        let mut y = area.y;
        if self.has_toolbar() {
            self.render_toolbar(Rect::new(area.x, y, area.width, 1), buf, theme);
            y += 2;
        }
        let grid_area = Rect::new(area.x, y, area.width, area.bottom().saturating_sub(y));
        if grid_area.height == 0 {
            return;
        }

        let borders = match self.options.variant {
            DataGridVariant::Default | DataGridVariant::Striped => Borders::ALL,
            DataGridVariant::Minimal => Borders::TOP | Borders::BOTTOM,
        };
        let block = Block::default()
            .borders(borders)
            .border_type(BorderType::Rounded)
            .border_style(theme.border);
        let inner = block.inner(grid_area);
        block.render(grid_area, buf);

        self.sync_grid();
        let order = self.display_order();
        if order.is_empty() {
            EmptyState::new(&self.options.empty_message).render(inner, buf, theme);
            return;
        }

        let rows = &self.rows;
        let columns = &self.columns;
        let row_id = &self.row_id;
        let selection = &self.selection;
        let editor = self.editor.as_mut();
        let offset = usize::from(self.options.enable_row_selection);
        let striped = self.options.variant == DataGridVariant::Striped;
        let pad = u16::from(self.options.size == DataGridSize::Default);
        let grid_columns: Vec<u16> = self.grid.columns().iter().map(|c| c.width).collect();
        let mut editor_slot = editor;

        self.grid.render(inner, buf, theme, |rect, ctx, buf| {
            let Some(&data_index) = order.get(ctx.cell.row) else {
                return;
            };
            let row = &rows[data_index];
            let row_selected = selection.is_selected(row_id(row, data_index));
            if striped && ctx.cell.row % 2 == 1 && !ctx.is_cursor {
                buf.set_style(rect, theme.surface_muted);
            }
            if row_selected && !ctx.is_cursor {
                buf.set_style(rect, theme.surface_muted.add_modifier(Modifier::BOLD));
            }
            let full_width = grid_columns.get(ctx.cell.col).copied().unwrap_or(rect.width);
            if ctx.cell.col < offset {
                let glyph = if row_selected { "[x]" } else { "[ ]" };
                let text = render::slice_by_cols(glyph, ctx.clip_left, rect.width);
                render::render_str_clipped(
                    rect.x,
                    rect.y,
                    rect.width,
                    buf,
                    &text,
                    theme.text_primary,
                );
                return;
            }
            let column_index = ctx.cell.col - offset;
            let Some(column) = columns.get(column_index) else {
                return;
            };

            if let Some(ed) = editor_slot.as_deref_mut() {
                if ed.data_index == data_index && ed.column == column_index {
                    buf.set_style(rect, theme.focus);
                    if column.column_type == ColumnType::Select {
                        let label = ed
                            .choice
                            .checked_sub(1)
                            .and_then(|i| column.options.get(i))
                            .map(String::as_str)
                            .unwrap_or("Select...");
                        let text = format!("‹ {label} ›");
                        render::render_str_clipped(
                            rect.x,
                            rect.y,
                            rect.width,
                            buf,
                            &text,
                            theme.focus,
                        );
                    } else {
                        ed.input.render(
                            Rect::new(rect.x, rect.y, rect.width, 1),
                            buf,
                            theme.focus,
                            theme.text_muted,
                        );
                    }
                    return;
                }
            }

            let (text, align) = column.display(row, ctx.cell.row);
            let inner_w = full_width.saturating_sub(pad * 2);
            let text = crate::wrapping::truncate_to_width(&text, inner_w);
            let text_w = render::display_width(&text) as u16;
            let lead = match align {
                Alignment::Left => 0,
                Alignment::Center => inner_w.saturating_sub(text_w) / 2,
                Alignment::Right => inner_w.saturating_sub(text_w),
            };
            let padded = format!("{}{}", " ".repeat((pad + lead) as usize), text);
            let visible = render::slice_by_cols(&padded, ctx.clip_left, rect.width);
            let style = if column.get.is_none() {
                theme.text_muted
            } else {
                theme.text_primary
            };
            let style = if ctx.is_cursor {
                style.patch(theme.accent).add_modifier(Modifier::REVERSED)
            } else {
                style
            };
            render::render_str_clipped(rect.x, rect.y, rect.width, buf, &visible, style);
        });
    }
}

fn parse_number(text: &str) -> Option<Value> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    if let Ok(i) = cleaned.parse::<i64>() {
        return Some(Value::Int(i));
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(Value::Float)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyModifiers;
    use crate::render::buffer_lines;

    fn people() -> Vec<DynamicRow> {
        vec![
            DynamicRow::new().with("name", "Jane").with("age", 31).with("role", "Admin"),
            DynamicRow::new().with("name", "Joe").with("age", 27).with("role", "User"),
            DynamicRow::new().with("name", "Ann").with("age", Value::Null).with("role", "User"),
        ]
    }

    fn definitions() -> Vec<ColumnDefinition> {
        vec![
            ColumnDefinition::new("name", "Name", ColumnType::Text).editable(true),
            ColumnDefinition::new("age", "Age", ColumnType::Number).editable(true),
            ColumnDefinition::new("role", "Role", ColumnType::Select)
                .editable(true)
                .options(["Admin", "User"]),
        ]
    }

    fn grid(options: DataGridOptions) -> DataGrid<DynamicRow> {
        DataGrid::from_definitions(people(), &definitions(), options)
    }

    fn names(g: &DataGrid<DynamicRow>) -> Vec<String> {
        g.display_order()
            .iter()
            .map(|&i| g.rows()[i].get("name").to_string())
            .collect()
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::key(code)
    }

    fn type_text(g: &mut DataGrid<DynamicRow>, text: &str) {
        for c in text.chars() {
            g.handle_event(&key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn non_editable_definitions_become_read_only_text() {
        let columns = columns_from_definitions(&[
            ColumnDefinition::new("age", "Age", ColumnType::Number),
            ColumnDefinition::new("name", "Name", ColumnType::Text)
                .editable(true)
                .width(20),
        ]);
        assert!(!columns[0].is_editable());
        assert_eq!(columns[0].column_type, ColumnType::Text);
        assert!(columns[1].is_editable());
        assert_eq!(columns[1].width, Some(20));
    }

    #[test]
    fn search_matches_any_field_ignoring_case() {
        let mut g = grid(DataGridOptions {
            enable_search: true,
            ..Default::default()
        });
        g.set_query("OE");
        assert_eq!(names(&g), vec!["Joe"]);
        g.set_query("user");
        assert_eq!(names(&g), vec!["Joe", "Ann"]);
    }

    #[test]
    fn search_is_ignored_when_disabled() {
        let mut g = grid(DataGridOptions::default());
        g.set_query("oe");
        assert_eq!(names(&g).len(), 3);
    }

    #[test]
    fn sort_cycles_and_keeps_nulls_last() {
        let mut g = grid(DataGridOptions {
            enable_sorting: true,
            ..Default::default()
        });
        assert!(g.toggle_sort("age", false));
        assert_eq!(names(&g), vec!["Joe", "Jane", "Ann"]);
        assert!(g.toggle_sort("age", false));
        assert_eq!(names(&g), vec!["Jane", "Joe", "Ann"]);
        assert!(g.toggle_sort("age", false));
        assert!(g.sort_state().is_empty());
        assert_eq!(names(&g), vec!["Jane", "Joe", "Ann"]);
    }

    #[test]
    fn multi_sort_gives_newest_key_priority() {
        let mut g = grid(DataGridOptions {
            enable_sorting: true,
            ..Default::default()
        });
        g.toggle_sort("name", false);
        g.toggle_sort("role", true);
        let keys: Vec<&str> = g.sort_state().columns().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["role", "name"]);
        assert_eq!(names(&g), vec!["Jane", "Ann", "Joe"]);
    }

    #[test]
    fn sorting_disabled_rejects_toggles() {
        let mut g = grid(DataGridOptions::default());
        assert!(!g.toggle_sort("name", false));
    }

    #[test]
    fn editing_a_cell_replaces_the_row() {
        let mut g = grid(DataGridOptions::default());
        g.set_cursor(Some(Cell { row: 0, col: 0 }));
        assert_eq!(g.handle_event(&key(KeyCode::Enter)), DataGridAction::Redraw);
        assert!(g.is_editing());
        g.handle_event(&InputEvent::Key(
            KeyEvent::new(KeyCode::Char('u')).with_modifiers(KeyModifiers::ctrl()),
        ));
        type_text(&mut g, "Janet");
        assert_eq!(g.handle_event(&key(KeyCode::Enter)), DataGridAction::RowsChanged);
        assert!(!g.is_editing());
        assert_eq!(g.rows()[0].get("name"), Value::from("Janet"));
    }

    #[test]
    fn number_edits_parse_or_clear() {
        let mut g = grid(DataGridOptions::default());
        assert_eq!(g.edit_cell(1, "age", Value::Null), DataGridAction::RowsChanged);
        assert!(g.rows()[1].get("age").is_null());

        g.set_cursor(Some(Cell { row: 1, col: 1 }));
        g.handle_event(&key(KeyCode::Enter));
        type_text(&mut g, "abc");
        assert_eq!(g.handle_event(&key(KeyCode::Enter)), DataGridAction::Redraw);
        assert!(g.is_editing());
        g.handle_event(&InputEvent::Key(
            KeyEvent::new(KeyCode::Char('u')).with_modifiers(KeyModifiers::ctrl()),
        ));
        type_text(&mut g, "1,200");
        assert_eq!(g.handle_event(&key(KeyCode::Enter)), DataGridAction::RowsChanged);
        assert_eq!(g.rows()[1].get("age"), Value::Int(1200));
    }

    #[test]
    fn number_parsing_rejects_non_finite_input() {
        assert_eq!(parse_number("2.5"), Some(Value::Float(2.5)));
        assert_eq!(parse_number("-3"), Some(Value::Int(-3)));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-Infinity"), None);
    }

    #[test]
    fn select_editor_cycles_options() {
        let mut g = grid(DataGridOptions::default());
        g.set_cursor(Some(Cell { row: 1, col: 2 }));
        g.handle_event(&key(KeyCode::Enter));
        g.handle_event(&key(KeyCode::Up));
        assert_eq!(g.handle_event(&key(KeyCode::Enter)), DataGridAction::RowsChanged);
        assert_eq!(g.rows()[1].get("role"), Value::from("Admin"));
    }

    #[test]
    fn escape_cancels_an_edit() {
        let mut g = grid(DataGridOptions::default());
        g.set_cursor(Some(Cell { row: 0, col: 0 }));
        g.handle_event(&key(KeyCode::Enter));
        type_text(&mut g, "zzz");
        g.handle_event(&key(KeyCode::Esc));
        assert!(!g.is_editing());
        assert_eq!(g.rows()[0].get("name"), Value::from("Jane"));
    }

    #[test]
    fn read_only_columns_do_not_open_an_editor() {
        let mut g = DataGrid::from_definitions(
            people(),
            &[ColumnDefinition::new("name", "Name", ColumnType::Text)],
            DataGridOptions::default(),
        );
        g.set_cursor(Some(Cell { row: 0, col: 0 }));
        assert_eq!(g.handle_event(&key(KeyCode::Enter)), DataGridAction::None);
        assert!(!g.is_editing());
    }

    #[test]
    fn add_row_appends_from_factory() {
        let mut g = grid(DataGridOptions {
            enable_add_row: true,
            ..Default::default()
        })
        .with_add_row(|| DynamicRow::new().with("name", "New"));
        assert_eq!(g.handle_event(&key(KeyCode::Char('n'))), DataGridAction::RowsChanged);
        assert_eq!(g.rows().len(), 4);
        assert_eq!(g.rows()[3].get("name"), Value::from("New"));
    }

    #[test]
    fn add_row_needs_option_and_factory() {
        let mut g = grid(DataGridOptions::default()).with_add_row(DynamicRow::new);
        assert_eq!(g.add_row(), DataGridAction::None);
        let mut g = grid(DataGridOptions {
            enable_add_row: true,
            ..Default::default()
        });
        assert_eq!(g.add_row(), DataGridAction::None);
    }

    #[test]
    fn delete_removes_selected_rows() {
        let mut g = grid(DataGridOptions {
            enable_row_selection: true,
            enable_delete_row: true,
            ..Default::default()
        });
        g.set_cursor(Some(Cell { row: 1, col: 1 }));
        assert_eq!(g.handle_event(&key(KeyCode::Char(' '))), DataGridAction::SelectionChanged);
        assert_eq!(g.selection().len(), 1);
        assert_eq!(g.handle_event(&key(KeyCode::Char('d'))), DataGridAction::RowsChanged);
        assert_eq!(names(&g), vec!["Jane", "Ann"]);
        assert!(g.selection().is_empty());
    }

    #[test]
    fn copy_emits_tsv_with_headers_and_blank_nulls() {
        let mut g = grid(DataGridOptions {
            enable_row_selection: true,
            ..Default::default()
        });
        assert_eq!(g.copy_selected(), DataGridAction::None);
        g.set_cursor(Some(Cell { row: 2, col: 1 }));
        g.handle_event(&key(KeyCode::Char(' ')));
        assert_eq!(
            g.handle_event(&key(KeyCode::Char('y'))),
            DataGridAction::CopyRequested("Name\tAge\tRole\nAnn\t\tUser".to_string())
        );
        let DataGridAction::CopyRequested(all) = g.copy_all() else {
            panic!("expected copy");
        };
        assert_eq!(all.lines().count(), 4);
        assert_eq!(all.lines().nth(1), Some("Jane\t31\tAdmin"));
    }

    #[test]
    fn set_data_resyncs_and_drops_missing_selection() {
        let mut g = grid(DataGridOptions {
            enable_row_selection: true,
            ..Default::default()
        })
        .with_row_id(|r, _| RowId(r.get("name").to_string().len() as u64));
        g.set_cursor(Some(Cell { row: 0, col: 1 }));
        g.handle_event(&key(KeyCode::Char(' ')));
        assert_eq!(g.selection().len(), 1);
        g.set_data(vec![DynamicRow::new().with("name", "Al")]);
        assert_eq!(g.rows().len(), 1);
        assert!(g.selection().is_empty());
    }

    #[test]
    fn empty_data_shows_message() {
        let mut g =
            DataGrid::from_definitions(Vec::new(), &definitions(), DataGridOptions::default());
        let area = Rect::new(0, 0, 40, 6);
        let mut buf = Buffer::empty(area);
        g.render(area, &mut buf, &Theme::default());
        assert!(buffer_lines(&buf).iter().any(|l| l.contains("No data available")));
    }

    #[test]
    fn renders_headers_and_formatted_cells() {
        let mut g = grid(DataGridOptions {
            enable_sorting: true,
            ..Default::default()
        });
        g.toggle_sort("name", false);
        let area = Rect::new(0, 0, 60, 7);
        let mut buf = Buffer::empty(area);
        g.render(area, &mut buf, &Theme::default());
        let lines = buffer_lines(&buf);
        assert!(lines[1].contains("Name ▲"));
        assert!(lines[1].contains("Age"));
        assert!(lines[2].contains("Ann"));
        assert!(lines.iter().any(|l| l.contains("Jane") && l.contains("31")));
    }

    #[test]
    fn typed_columns_with_row_numbers() {
        struct Item {
            label: String,
        }
        impl Record for Item {
            fn values(&self) -> Vec<Value> {
                vec![self.label.as_str().into()]
            }
        }
        let columns = vec![
            DataGridColumn::row_number(),
            DataGridColumn::editable_text(
                "label",
                "Label",
                |i: &Item| i.label.as_str().into(),
                |_: &Item, v: Value| Item {
                    label: v.to_string(),
                },
            ),
        ];
        let mut g = DataGrid::new(
            vec![
                Item {
                    label: "a".to_string(),
                },
                Item {
                    label: "b".to_string(),
                },
            ],
            columns,
            DataGridOptions::default(),
        );
        assert_eq!(g.edit_cell(1, "label", Value::from("c")), DataGridAction::RowsChanged);
        assert_eq!(g.rows()[1].label, "c");
        assert_eq!(g.to_tsv(g.rows()), "Label\na\nc");
        let area = Rect::new(0, 0, 30, 6);
        let mut buf = Buffer::empty(area);
        g.render(area, &mut buf, &Theme::default());
        let lines = buffer_lines(&buf);
        assert!(lines[2].contains('1'));
        assert!(lines[3].contains('2'));
    }

    #[test]
    fn header_click_on_checkbox_toggles_all() {
        let mut g = grid(DataGridOptions {
            enable_row_selection: true,
            ..Default::default()
        });
        assert_eq!(
            g.apply_grid_action(GridAction::HeaderClicked(0), false),
            DataGridAction::SelectionChanged
        );
        assert_eq!(g.selection().len(), 3);
    }
}
