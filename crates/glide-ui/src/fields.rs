//! Labelled form fields laid out as a grid, a stack or an inline flow.
//!
//! [`FieldItem`] turns one [`FieldItemData`] into an [`ItemView`]; [`Fields`] keeps an ordered
//! working copy of the fields, handles focus and editing, and reports edits, additions, removals
//! and reorders as [`FieldsAction`]s.
use crate::collection::CollectionLayout;
use crate::collection::CollectionState;
use crate::collection::EmptyState;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::item::RenderLines;
use crate::line_input::LineInput;
use crate::line_input::LineInputAction;
use crate::render;
use crate::reorder::DragEnd;
use crate::reorder::Reorderable;
use crate::reorder::array_move;
use crate::reorder::keyboard_drag;
use crate::reorder::resolve_drag_end;
use crate::spacer::BREAKPOINTS;
use crate::theme::Theme;
use crate::variant::Attrs;
use crate::variant::Direction;
use crate::variant::TextScale;
use crate::variant::Tone;
use crate::variant_axis;
use crate::view::ItemView;
use crate::view::Slot;
use crate::view::TextBlock;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use std::fmt;
use std::sync::Arc;

variant_axis! {
    pub enum FieldType default Text {
        Text => "text",
        Number => "number",
        Email => "email",
        Tel => "tel",
        Url => "url",
        Date => "date",
        Textarea => "textarea",
        Select => "select",
    }
}

variant_axis! {
    pub enum FieldVariant default Editable {
        Editable => "editable",
        Readonly => "readonly",
        Compact => "compact",
    }
}

variant_axis! {
    pub enum FieldSize default Default {
        Default => "default",
        Sm => "sm",
        Lg => "lg",
    }
}

variant_axis! {
    pub enum FieldsLayout default Grid {
        Grid => "grid",
        Stack => "stack",
        Inline => "inline",
    }
}

variant_axis! {
    pub enum FieldColumns default Two {
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
        Auto => "auto",
    }
}

variant_axis! {
    pub enum FieldsGap default Md {
        None => "none",
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
    }
}

pub const EMPTY_MESSAGE: &str = "No fields to display";
pub const EMPTY_VALUE: &str = "—";
pub const SELECT_PLACEHOLDER: &str = "Select an option";
pub const DEFAULT_TEXTAREA_ROWS: u16 = 3;

const REMOVE_GLYPH: &str = "✕";
const DRAG_GLYPH: &str = "⠿";

impl FieldColumns {
    /// Columns in use at `width`; narrow areas collapse to one column.
    pub fn at(self, width: u16) -> u16 {
        let [sm, md, lg, xl] = BREAKPOINTS;
        match self {
            FieldColumns::One => 1,
            FieldColumns::Two if width >= md => 2,
            FieldColumns::Three if width >= lg => 3,
            FieldColumns::Four if width >= lg => 4,
            FieldColumns::Three | FieldColumns::Four if width >= md => 2,
            FieldColumns::Auto if width >= xl => 4,
            FieldColumns::Auto if width >= lg => 3,
            FieldColumns::Auto if width >= sm => 2,
            _ => 1,
        }
    }
}

impl FieldsGap {
    /// `(columns, rows)` between neighbouring fields.
    pub fn cells(self) -> (u16, u16) {
        match self {
            FieldsGap::None => (0, 0),
            FieldsGap::Sm => (1, 0),
            FieldsGap::Md => (2, 1),
            FieldsGap::Lg => (3, 1),
            FieldsGap::Xl => (4, 2),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldOption {
    pub label: String,
    pub value: String,
}

impl FieldOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Clone, Default)]
pub struct FieldItemData {
    pub id: Option<String>,
    pub label: Option<String>,
    pub value: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub field_type: FieldType,
    pub required: bool,
    pub disabled: bool,
    pub error: Option<String>,
    pub options: Vec<FieldOption>,
    /// Visible lines for textareas.
    pub rows: Option<u16>,
    /// Replaces the whole default rendering.
    pub render: Option<RenderLines<FieldItemData>>,
}

impl fmt::Debug for FieldItemData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldItemData")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("value", &self.value)
            .field("field_type", &self.field_type)
            .field("disabled", &self.disabled)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl FieldItemData {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn value(mut self, value: impl ToString) -> Self {
        self.value = Some(value.to_string());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn field_type(mut self, field_type: FieldType) -> Self {
        self.field_type = field_type;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    pub fn rows(mut self, rows: u16) -> Self {
        self.rows = Some(rows);
        self
    }

    pub fn render_with(
        mut self,
        f: impl Fn(&FieldItemData, usize) -> Vec<ratatui::text::Line<'static>>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        self.render = Some(Arc::new(f));
        self
    }

    fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    fn label_text(&self) -> Option<String> {
        let label = self.label.as_deref().filter(|l| !l.is_empty())?;
        Some(if self.required {
            format!("{label} *")
        } else {
            label.to_string()
        })
    }

    /// The label of the selected option, if the value matches one.
    fn selected_option(&self) -> Option<&FieldOption> {
        self.options.iter().find(|o| o.value == self.value_str())
    }
}

/// Presentation settings shared by every field in a group.
///
/// Readonly fields show plain values and never edit. Compact fields drop descriptions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FieldItem {
    pub variant: FieldVariant,
    pub size: FieldSize,
    pub orientation: Direction,
}

impl FieldItem {
    fn scale(&self) -> Option<TextScale> {
        match self.size {
            FieldSize::Default => None,
            FieldSize::Sm => Some(TextScale::Sm),
            FieldSize::Lg => Some(TextScale::Lg),
        }
    }

    fn text_attrs(&self) -> Attrs {
        let attrs = Attrs::new();
        match self.scale() {
            Some(scale) => attrs.scale(scale),
            None => attrs,
        }
    }

    fn label_block(&self, field: &FieldItemData) -> Option<TextBlock> {
        let label = field.label_text()?;
        Some(TextBlock::new(label, self.text_attrs().modifier(Modifier::BOLD)).truncate(true))
    }

    /// The value as displayed, before any editing.
    fn value_block(&self, field: &FieldItemData) -> TextBlock {
        let attrs = self.text_attrs();
        if self.variant == FieldVariant::Readonly {
            let value = field.value_str();
            let text = if value.is_empty() { EMPTY_VALUE } else { value };
            return TextBlock::new(text, attrs);
        }
        let muted = attrs.tone(Tone::Muted).modifier(Modifier::ITALIC);
        let input = if field.disabled {
            attrs.tone(Tone::Muted).modifier(Modifier::DIM)
        } else {
            attrs.modifier(Modifier::UNDERLINED)
        };
        if field.field_type == FieldType::Select {
            return match field.selected_option() {
                Some(option) => TextBlock::new(format!("{} ▾", option.label), input),
                None => {
                    let placeholder = field.placeholder.as_deref().unwrap_or(SELECT_PLACEHOLDER);
                    TextBlock::new(format!("{placeholder} ▾"), muted)
                }
            };
        }
        match (field.value_str(), field.placeholder.as_deref()) {
            ("", Some(placeholder)) => TextBlock::new(placeholder, muted),
            ("", None) => TextBlock::new(" ", input),
            (value, _) => TextBlock::new(value, input),
        }
    }

    fn is_textarea(&self, field: &FieldItemData) -> bool {
        self.variant != FieldVariant::Readonly && field.field_type == FieldType::Textarea
    }

    fn value_slot(&self, field: &FieldItemData) -> Slot {
        let block = self.value_block(field);
        if !self.is_textarea(field) {
            return Slot::Text(block);
        }
        let rows = field.rows.unwrap_or(DEFAULT_TEXTAREA_ROWS).max(1);
        let area = ItemView::new(Attrs::new().min_height(rows))
            .slot(Slot::Text(block.clamp(Some(rows as usize))));
        Slot::View(Box::new(area))
    }

    /// Builds the view for one field. `trailing` carries the drag and remove glyphs.
    pub fn view(&self, field: &FieldItemData, index: usize, trailing: Option<String>) -> ItemView {
        let mut view = ItemView::new(Attrs::new()).aria_label(field.label.clone());
        if let Some(trailing) = trailing {
            view = view.trailing(TextBlock::new(trailing, Attrs::new().tone(Tone::Muted)));
        }
        if let Some(render) = &field.render {
            return view.slot(Slot::Lines(render(field, index)));
        }

        let label = self.label_block(field);
        if self.orientation == Direction::Horizontal && !self.is_textarea(field) {
            let mut blocks: Vec<TextBlock> = label.into_iter().collect();
            blocks.push(self.value_block(field));
            view.push(Slot::Inline(blocks));
        } else {
            if let Some(label) = label {
                view.push(Slot::Text(label));
            }
            view.push(self.value_slot(field));
        }

        let show_error = self.variant != FieldVariant::Readonly;
        match (&field.error, &field.description) {
            (Some(error), _) if show_error && !error.is_empty() => {
                view.push(Slot::text(error.clone(), self.text_attrs().tone(Tone::Destructive)));
            }
            (_, Some(description))
                if !description.is_empty() && self.variant != FieldVariant::Compact =>
            {
                let attrs = Attrs::new().scale(TextScale::Sm).tone(Tone::Muted);
                view.push(Slot::text(description.clone(), attrs));
            }
            _ => {}
        }
        view
    }

    /// Offset of the value row from the top-left of the field at `width`.
    fn value_offset(&self, field: &FieldItemData, width: u16) -> (u16, u16) {
        let Some(label) = field.label_text() else {
            return (0, 0);
        };
        let label_w = render::display_width(&label) as u16;
        if self.orientation == Direction::Horizontal && !self.is_textarea(field) {
            let value_w = render::display_width(&self.value_block(field).text) as u16;
            if label_w + 1 + value_w <= width {
                return (label_w + 1, 0);
            }
        }
        (0, 1)
    }
}

pub type FieldFactory = Arc<dyn Fn() -> FieldItemData + Send + Sync>;

#[derive(Clone)]
pub struct FieldsOptions {
    pub layout: FieldsLayout,
    pub columns: FieldColumns,
    pub gap: FieldsGap,
    pub item: FieldItem,
    pub enable_reordering: bool,
    pub enable_add_remove: bool,
    pub show_separators: bool,
    pub add_field_label: String,
    /// Defaults to `enable_add_remove`.
    pub show_toolbar: Option<bool>,
}

impl Default for FieldsOptions {
    fn default() -> Self {
        Self {
            layout: FieldsLayout::default(),
            columns: FieldColumns::default(),
            gap: FieldsGap::default(),
            item: FieldItem::default(),
            enable_reordering: false,
            enable_add_remove: false,
            show_separators: false,
            add_field_label: "Add Field".to_string(),
            show_toolbar: None,
        }
    }
}

impl fmt::Debug for FieldsOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldsOptions")
            .field("layout", &self.layout)
            .field("columns", &self.columns)
            .field("item", &self.item)
            .field("enable_reordering", &self.enable_reordering)
            .field("enable_add_remove", &self.enable_add_remove)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldsAction {
    None,
    Redraw,
    FieldChanged { id: String, value: String },
    /// Sortable ids in their new order.
    Reordered(Vec<String>),
    Added(String),
    Removed(String),
}

struct FieldEditor {
    index: usize,
    input: LineInput,
    /// Index into `["", options..]` for select fields.
    choice: usize,
}

pub struct Fields {
    fields: Vec<FieldItemData>,
    options: FieldsOptions,
    factory: Option<FieldFactory>,
    views: Vec<ItemView>,
    state: CollectionState,
    editor: Option<FieldEditor>,
    add_button: Option<Rect>,
}

impl Fields {
    pub fn new(fields: Vec<FieldItemData>, options: FieldsOptions) -> Self {
        let mut this = Self {
            fields,
            options,
            factory: None,
            views: Vec::new(),
            state: CollectionState::new(),
            editor: None,
            add_button: None,
        };
        this.rebuild();
        this
    }

    /// Supplies new fields for the add button and `n` key.
    pub fn with_factory(
        mut self,
        factory: impl Fn() -> FieldItemData + Send + Sync + 'static,
    ) -> Self {
        self.factory = Some(Arc::new(factory));
        self
    }

    pub fn fields(&self) -> &[FieldItemData] {
        &self.fields
    }

    pub fn options(&self) -> &FieldsOptions {
        &self.options
    }

    pub fn cursor(&self) -> Option<usize> {
        self.state.cursor()
    }

    pub fn set_cursor(&mut self, cursor: Option<usize>) {
        self.state.set_cursor(cursor);
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }

    /// Replaces the working copy with a fresh sequence from the caller.
    pub fn set_fields(&mut self, fields: Vec<FieldItemData>) {
        self.fields = fields;
        self.editor = None;
        self.rebuild();
    }

    /// `id` or a positional fallback, as used for reordering.
    pub fn sortable_id(&self, index: usize) -> Option<String> {
        let field = self.fields.get(index)?;
        Some(field.id.clone().unwrap_or_else(|| format!("field-{index}")))
    }

    fn position(&self, id: &str) -> Option<usize> {
        (0..self.fields.len()).find(|&i| self.sortable_id(i).as_deref() == Some(id))
    }

    fn can_add(&self) -> bool {
        self.options.enable_add_remove && self.factory.is_some()
    }

    fn show_toolbar(&self) -> bool {
        self.options
            .show_toolbar
            .unwrap_or(self.options.enable_add_remove)
    }

    fn trailing(&self, field: &FieldItemData) -> Option<String> {
        let mut glyphs = Vec::new();
        if self.options.enable_reordering {
            glyphs.push(DRAG_GLYPH);
        }
        if self.options.enable_add_remove && field.id.is_some() {
            glyphs.push(REMOVE_GLYPH);
        }
        (!glyphs.is_empty()).then(|| glyphs.join(" "))
    }

    fn rebuild(&mut self) {
        let item = self.options.item;
        self.views = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, f)| item.view(f, i, self.trailing(f)))
            .collect();
    }

    /// Sets a field's value.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> FieldsAction {
        let Some(index) = self.fields.iter().position(|f| f.id.as_deref() == Some(id)) else {
            return FieldsAction::None;
        };
        let value = value.into();
        self.fields[index].value = Some(value.clone());
        self.rebuild();
        FieldsAction::FieldChanged {
            id: id.to_string(),
            value,
        }
    }

    /// Appends a field from the factory.
    pub fn add_field(&mut self) -> FieldsAction {
        let Some(factory) = &self.factory else {
            return FieldsAction::None;
        };
        let field = factory();
        self.fields.push(field);
        self.rebuild();
        let index = self.fields.len() - 1;
        self.state.set_cursor(Some(index));
        let id = self.sortable_id(index).unwrap_or_default();
        tracing::debug!(%id, "field added");
        FieldsAction::Added(id)
    }

    /// Removes every field with `id`.
    pub fn remove_field(&mut self, id: &str) -> FieldsAction {
        let before = self.fields.len();
        self.fields.retain(|f| f.id.as_deref() != Some(id));
        if self.fields.len() == before {
            return FieldsAction::None;
        }
        self.editor = None;
        self.rebuild();
        if let Some(c) = self.state.cursor() {
            let last = self.fields.len().checked_sub(1);
            self.state.set_cursor(last.map(|l| c.min(l)));
        }
        FieldsAction::Removed(id.to_string())
    }

    /// Applies a completed drag between two fields.
    pub fn drag_end(&mut self, drag: &DragEnd<String>) -> FieldsAction {
        if !self.options.enable_reordering {
            return FieldsAction::None;
        }
        let Some((from, to)) = resolve_drag_end(&*self, drag) else {
            return FieldsAction::None;
        };
        array_move(&mut self.fields, from, to);
        self.rebuild();
        if self.state.cursor() == Some(from) {
            self.state.set_cursor(Some(to));
        }
        let ids = (0..self.fields.len()).filter_map(|i| self.sortable_id(i)).collect();
        FieldsAction::Reordered(ids)
    }

    fn begin_edit(&mut self, index: usize) -> FieldsAction {
        let Some(field) = self.fields.get(index) else {
            return FieldsAction::None;
        };
        if self.options.item.variant == FieldVariant::Readonly
            || field.disabled
            || field.render.is_some()
            || field.id.is_none()
        {
            return FieldsAction::None;
        }
        let current = field.value_str().to_string();
        let choice = field
            .options
            .iter()
            .position(|o| o.value == current)
            .map(|p| p + 1)
            .unwrap_or(0);
        let input = LineInput::with_text(current)
            .placeholder(field.placeholder.clone().unwrap_or_default());
        self.editor = Some(FieldEditor {
            index,
            input,
            choice,
        });
        FieldsAction::Redraw
    }

    fn commit_edit(&mut self, editor: FieldEditor) -> FieldsAction {
        let Some(field) = self.fields.get(editor.index) else {
            return FieldsAction::None;
        };
        let value = match field.field_type {
            FieldType::Select => editor
                .choice
                .checked_sub(1)
                .and_then(|i| field.options.get(i))
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            FieldType::Number => {
                let text = editor.input.text().trim().to_string();
                let number = text.replace(',', "").parse::<f64>().ok();
                if !text.is_empty() && !number.is_some_and(f64::is_finite) {
                    tracing::debug!(input = %text, "rejected non-numeric field edit");
                    self.editor = Some(editor);
                    return FieldsAction::Redraw;
                }
                text
            }
            _ => editor.input.text().to_string(),
        };
        match field.id.clone() {
            Some(id) => self.set_value(&id, value),
            None => FieldsAction::None,
        }
    }

    fn handle_editor(&mut self, event: &InputEvent) -> FieldsAction {
        let Some(mut editor) = self.editor.take() else {
            return FieldsAction::None;
        };
        let options = self
            .fields
            .get(editor.index)
            .filter(|f| f.field_type == FieldType::Select)
            .map(|f| f.options.len());
        if let Some(options) = options {
            let choices = options + 1;
            let InputEvent::Key(key) = event else {
                self.editor = Some(editor);
                return FieldsAction::None;
            };
            return match key.code {
                KeyCode::Esc => FieldsAction::Redraw,
                KeyCode::Enter => self.commit_edit(editor),
                KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
                    editor.choice = (editor.choice + 1) % choices;
                    self.editor = Some(editor);
                    FieldsAction::Redraw
                }
                KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
                    editor.choice = (editor.choice + choices - 1) % choices;
                    self.editor = Some(editor);
                    FieldsAction::Redraw
                }
                _ => {
                    self.editor = Some(editor);
                    FieldsAction::None
                }
            };
        }
        match editor.input.input(event.clone()) {
            LineInputAction::Submitted(_) => self.commit_edit(editor),
            LineInputAction::Cancelled => FieldsAction::Redraw,
            LineInputAction::Changed => {
                self.editor = Some(editor);
                FieldsAction::Redraw
            }
            LineInputAction::None => {
                self.editor = Some(editor);
                FieldsAction::None
            }
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> FieldsAction {
        if self.editor.is_some() {
            return self.handle_editor(event);
        }
        match event {
            InputEvent::Key(key) => {
                if let Some(action) = self.handle_key(key) {
                    return action;
                }
            }
            InputEvent::Mouse(m) if m.is_click() => {
                if self.add_button.is_some_and(|r| r.contains((m.x, m.y).into())) {
                    return self.add_field();
                }
                if let Some(id) = self.remove_hit(m.x, m.y) {
                    return self.remove_field(&id);
                }
            }
            _ => {}
        }
        match self.state.handle_event(event, &self.views) {
            crate::collection::CollectionAction::None => FieldsAction::None,
            _ => FieldsAction::Redraw,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Option<FieldsAction> {
        let cursor = self.state.cursor();
        if key.modifiers.alt {
            if !self.options.enable_reordering {
                return Some(FieldsAction::None);
            }
            let id = cursor.and_then(|c| self.sortable_id(c))?;
            let Some(drag) = keyboard_drag(&*self, &id, key) else {
                return Some(FieldsAction::None);
            };
            return Some(self.drag_end(&drag));
        }
        if key.modifiers.ctrl {
            return None;
        }
        match key.code {
            _ if key.is_activate() => cursor.map(|c| self.begin_edit(c)),
            KeyCode::Char('n') if self.can_add() => Some(self.add_field()),
            KeyCode::Char('d') | KeyCode::Delete if self.options.enable_add_remove => {
                let id = cursor
                    .and_then(|c| self.fields.get(c))
                    .and_then(|f| f.id.clone())?;
                Some(self.remove_field(&id))
            }
            _ => None,
        }
    }

    /// Id of the field whose remove glyph sits under a click.
    fn remove_hit(&self, x: u16, y: u16) -> Option<String> {
        if !self.options.enable_add_remove {
            return None;
        }
        let index = self.state.hit_test(x, y)?;
        let area = self.state.item_area(index)?;
        let field = self.fields.get(index)?;
        (x == area.right().saturating_sub(1) && y == area.y).then(|| field.id.clone())?
    }

    fn layout(&self, width: u16) -> CollectionLayout {
        let (col_gap, row_gap) = self.options.gap.cells();
        let columns = match self.options.layout {
            FieldsLayout::Stack => 1,
            FieldsLayout::Grid => self.options.columns.at(width),
            FieldsLayout::Inline => {
                let widest = self
                    .fields
                    .iter()
                    .map(|f| inline_width(&self.options.item, f))
                    .max()
                    .unwrap_or(1);
                ((width + col_gap) / (widest + col_gap).max(1)).max(1)
            }
        };
        let row_gap = if self.options.show_separators {
            row_gap.max(1)
        } else {
            row_gap
        };
        CollectionLayout::new(columns)
            .gaps(col_gap, row_gap)
            .separators(self.options.show_separators)
    }

    fn render_add_button(&mut self, x: u16, y: u16, width: u16, buf: &mut Buffer, theme: &Theme) {
        let label = format!("[+ {}]", self.options.add_field_label);
        let w = render::render_str_clipped(x, y, width, buf, &label, theme.accent);
        self.add_button = Some(Rect::new(x, y, w, 1));
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.add_button = None;
        if area.width == 0 || area.height == 0 {
            return;
        }
        if self.fields.is_empty() {
            let message_h = EmptyState::HEIGHT.min(area.height);
            EmptyState::new(EMPTY_MESSAGE).render(
                Rect::new(area.x, area.y, area.width, message_h),
                buf,
                theme,
            );
            if self.can_add() && area.height > message_h {
                let label_w = render::display_width(&self.options.add_field_label) as u16 + 4;
                let x = render::aligned_x(area, label_w, ratatui::layout::Alignment::Center);
                self.render_add_button(x, area.y + message_h, area.width, buf, theme);
            }
            return;
        }

        let mut body = area;
        if self.show_toolbar() {
            if self.can_add() {
                self.render_add_button(area.x, area.y, area.width, buf, theme);
            }
            let skip = 2.min(area.height);
            body = Rect::new(area.x, area.y + skip, area.width, area.height - skip);
        }
        let layout = self.layout(body.width);
        self.state.render(body, buf, &self.views, layout, theme);

        if let Some(editor) = self.editor.as_mut() {
            let Some(item) = self.state.item_area(editor.index) else {
                return;
            };
            let Some(field) = self.fields.get(editor.index) else {
                return;
            };
            let fi = self.options.item;
            let trailing = self
                .views
                .get(editor.index)
                .and_then(|v| v.trailing.as_ref())
                .map(|t| render::display_width(&t.text) as u16 + 1)
                .unwrap_or(0);
            let width = item.width.saturating_sub(trailing);
            let (dx, dy) = fi.value_offset(field, width);
            if dy >= item.height || dx >= width {
                return;
            }
            let row = Rect::new(item.x + dx, item.y + dy, width - dx, 1);
            buf.set_style(row, theme.focus);
            if field.field_type == FieldType::Select {
                let label = editor
                    .choice
                    .checked_sub(1)
                    .and_then(|i| field.options.get(i))
                    .map(|o| o.label.as_str())
                    .unwrap_or(SELECT_PLACEHOLDER);
                let text = format!("‹ {label} ›");
                render::render_str_clipped(row.x, row.y, row.width, buf, &text, theme.focus);
            } else {
                editor.input.render(row, buf, theme.focus, theme.text_muted);
            }
        }
    }
}

/// Natural width of a field in an inline flow.
fn inline_width(item: &FieldItem, field: &FieldItemData) -> u16 {
    let label = field.label_text().map(|l| render::display_width(&l)).unwrap_or(0);
    let value = render::display_width(&item.value_block(field).text);
    let w = if item.orientation == Direction::Horizontal {
        label + 1 + value
    } else {
        label.max(value)
    };
    (w as u16).saturating_add(4).max(12)
}

impl Reorderable for Fields {
    type Id = String;

    fn sortable_ids(&self) -> Vec<String> {
        (0..self.fields.len()).filter_map(|i| self.sortable_id(i)).collect()
    }

    fn can_drag(&self, id: &String) -> bool {
        self.options.enable_reordering
            && self
                .position(id)
                .is_some_and(|i| !self.fields[i].disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap;
    use crate::render::buffer_lines;

    fn sample() -> Vec<FieldItemData> {
        vec![
            FieldItemData::new("name", "Name").value("Ada").required(true),
            FieldItemData::new("age", "Age").field_type(FieldType::Number),
            FieldItemData::new("role", "Role")
                .field_type(FieldType::Select)
                .options(vec![
                    FieldOption::new("Admin", "admin"),
                    FieldOption::new("User", "user"),
                ]),
        ]
    }

    fn stack(fields: Vec<FieldItemData>) -> Fields {
        Fields::new(
            fields,
            FieldsOptions {
                layout: FieldsLayout::Stack,
                gap: FieldsGap::None,
                ..Default::default()
            },
        )
    }

    fn texts(view: &ItemView) -> Vec<String> {
        view.slots
            .iter()
            .flat_map(|s| match s {
                Slot::Text(t) => vec![t.text.clone()],
                Slot::Inline(blocks) => blocks.iter().map(|b| b.text.clone()).collect(),
                _ => Vec::new(),
            })
            .collect()
    }

    fn press(f: &mut Fields, code: KeyCode) -> FieldsAction {
        f.handle_event(&InputEvent::key(code))
    }

    fn type_str(f: &mut Fields, s: &str) {
        for c in s.chars() {
            press(f, KeyCode::Char(c));
        }
    }

    #[test]
    fn readonly_shows_dash_for_missing_values() {
        let item = FieldItem {
            variant: FieldVariant::Readonly,
            ..Default::default()
        };
        let view = item.view(&FieldItemData::new("x", "Phone").error("bad"), 0, None);
        assert_eq!(texts(&view), vec!["Phone", EMPTY_VALUE]);
    }

    #[test]
    fn required_label_and_error_replace_description() {
        let field = FieldItemData::new("email", "Email")
            .required(true)
            .description("Work address")
            .error("Invalid email");
        let view = FieldItem::default().view(&field, 0, None);
        assert_eq!(texts(&view), vec!["Email *", " ", "Invalid email"]);
    }

    #[test]
    fn select_shows_option_label_or_placeholder() {
        let item = FieldItem::default();
        let role = &sample()[2];
        assert_eq!(texts(&item.view(role, 0, None))[1], "Select an option ▾");
        let chosen = role.clone().value("user");
        assert_eq!(texts(&item.view(&chosen, 0, None))[1], "User ▾");
    }

    #[test]
    fn horizontal_fields_share_a_row() {
        let item = FieldItem {
            orientation: Direction::Horizontal,
            ..Default::default()
        };
        let view = item.view(&FieldItemData::new("a", "Name").value("Ada"), 0, None);
        assert_eq!(view.height(30), 1);
    }

    #[test]
    fn textarea_reserves_rows() {
        let field = FieldItemData::new("bio", "Bio").field_type(FieldType::Textarea).rows(4);
        assert_eq!(FieldItem::default().view(&field, 0, None).height(30), 5);
    }

    #[test]
    fn columns_collapse_on_narrow_areas() {
        assert_eq!(FieldColumns::Two.at(60), 1);
        assert_eq!(FieldColumns::Two.at(90), 2);
        assert_eq!(FieldColumns::Four.at(110), 4);
        assert_eq!(FieldColumns::Four.at(90), 2);
        assert_eq!(FieldColumns::Auto.at(130), 4);
        assert_eq!(FieldColumns::default(), FieldColumns::Two);
        assert_eq!(FieldColumns::from_name("auto"), Some(FieldColumns::Auto));
    }

    #[test]
    fn editing_text_commits_on_enter() {
        let mut f = stack(sample());
        f.set_cursor(Some(0));
        assert_eq!(press(&mut f, KeyCode::Enter), FieldsAction::Redraw);
        assert!(f.is_editing());
        type_str(&mut f, "!");
        assert_eq!(
            press(&mut f, KeyCode::Enter),
            FieldsAction::FieldChanged {
                id: "name".to_string(),
                value: "Ada!".to_string()
            }
        );
        assert_eq!(f.fields()[0].value.as_deref(), Some("Ada!"));
    }

    #[test]
    fn number_fields_reject_text() {
        let mut f = stack(sample());
        f.set_cursor(Some(1));
        press(&mut f, KeyCode::Enter);
        type_str(&mut f, "abc");
        assert_eq!(press(&mut f, KeyCode::Enter), FieldsAction::Redraw);
        assert!(f.is_editing());
        assert_eq!(press(&mut f, KeyCode::Esc), FieldsAction::Redraw);
        assert!(!f.is_editing());
        assert_eq!(f.fields()[1].value, None);
    }

    #[test]
    fn number_fields_reject_non_finite_values() {
        let mut f = stack(sample());
        f.set_cursor(Some(1));
        for text in ["NaN", "inf", "-infinity"] {
            press(&mut f, KeyCode::Enter);
            type_str(&mut f, text);
            assert_eq!(press(&mut f, KeyCode::Enter), FieldsAction::Redraw);
            assert!(f.is_editing());
            press(&mut f, KeyCode::Esc);
        }
        press(&mut f, KeyCode::Enter);
        type_str(&mut f, "1,500");
        assert_eq!(
            press(&mut f, KeyCode::Enter),
            FieldsAction::FieldChanged {
                id: "age".to_string(),
                value: "1,500".to_string()
            }
        );
    }

    #[test]
    fn select_editor_cycles_options() {
        let mut f = stack(sample());
        f.set_cursor(Some(2));
        press(&mut f, KeyCode::Enter);
        press(&mut f, KeyCode::Right);
        press(&mut f, KeyCode::Right);
        assert_eq!(
            press(&mut f, KeyCode::Enter),
            FieldsAction::FieldChanged {
                id: "role".to_string(),
                value: "user".to_string()
            }
        );
    }

    #[test]
    fn readonly_and_disabled_fields_do_not_edit() {
        let mut f = Fields::new(
            sample(),
            FieldsOptions {
                item: FieldItem {
                    variant: FieldVariant::Readonly,
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        f.set_cursor(Some(0));
        assert_eq!(press(&mut f, KeyCode::Enter), FieldsAction::None);
        let mut g = stack(vec![FieldItemData::new("a", "A").disabled(true)]);
        g.set_cursor(Some(0));
        assert_eq!(press(&mut g, KeyCode::Enter), FieldsAction::None);
    }

    #[test]
    fn add_and_remove() {
        let mut f = Fields::new(
            sample(),
            FieldsOptions {
                enable_add_remove: true,
                ..Default::default()
            },
        )
        .with_factory(|| FieldItemData::new("new", "New field"));
        assert_eq!(press(&mut f, KeyCode::Char('n')), FieldsAction::Added("new".to_string()));
        assert_eq!(f.fields().len(), 4);
        assert_eq!(f.cursor(), Some(3));
        assert_eq!(press(&mut f, KeyCode::Char('d')), FieldsAction::Removed("new".to_string()));
        assert_eq!(f.fields().len(), 3);
        assert_eq!(f.remove_field("missing"), FieldsAction::None);
    }

    #[test]
    fn add_without_factory_does_nothing() {
        let mut f = stack(sample());
        assert_eq!(f.add_field(), FieldsAction::None);
    }

    #[test]
    fn alt_arrows_reorder_when_enabled() {
        let mut f = Fields::new(
            sample(),
            FieldsOptions {
                enable_reordering: true,
                ..Default::default()
            },
        );
        f.set_cursor(Some(0));
        let action = f.handle_event(&InputEvent::Key(keymap::key_alt(KeyCode::Down)));
        assert_eq!(
            action,
            FieldsAction::Reordered(vec!["age".into(), "name".into(), "role".into()])
        );
        assert_eq!(f.cursor(), Some(1));

        let mut fixed = stack(sample());
        fixed.set_cursor(Some(0));
        assert_eq!(
            fixed.handle_event(&InputEvent::Key(keymap::key_alt(KeyCode::Down))),
            FieldsAction::None
        );
    }

    #[test]
    fn disabled_fields_cannot_be_dragged() {
        let mut list = sample();
        list[0].disabled = true;
        let mut f = Fields::new(
            list,
            FieldsOptions {
                enable_reordering: true,
                ..Default::default()
            },
        );
        let drag = DragEnd {
            active: "name".to_string(),
            over: Some("role".to_string()),
        };
        assert_eq!(f.drag_end(&drag), FieldsAction::None);
        let onto_disabled = DragEnd {
            active: "role".to_string(),
            over: Some("name".to_string()),
        };
        assert_eq!(f.drag_end(&onto_disabled), FieldsAction::None);

        f.set_cursor(Some(0));
        assert_eq!(
            f.handle_event(&InputEvent::Key(keymap::key_alt(KeyCode::Down))),
            FieldsAction::None
        );
        let ids: Vec<&str> = f.fields().iter().filter_map(|x| x.id.as_deref()).collect();
        assert_eq!(ids, vec!["name", "age", "role"]);

        let drag = DragEnd {
            active: "age".to_string(),
            over: Some("role".to_string()),
        };
        assert_eq!(
            f.drag_end(&drag),
            FieldsAction::Reordered(vec!["name".into(), "role".into(), "age".into()])
        );
    }

    #[test]
    fn fields_without_ids_get_positional_sortable_ids() {
        let f = stack(vec![FieldItemData::default(), FieldItemData::new("b", "B")]);
        assert_eq!(f.sortable_ids(), vec!["field-0".to_string(), "b".to_string()]);
    }

    #[test]
    fn empty_state_offers_add_button() {
        let mut f = Fields::new(
            Vec::new(),
            FieldsOptions {
                enable_add_remove: true,
                ..Default::default()
            },
        )
        .with_factory(|| FieldItemData::new("x", "X"));
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        f.render(area, &mut buf, &Theme::default());
        let lines = buffer_lines(&buf);
        assert!(lines.iter().any(|l| l.contains(EMPTY_MESSAGE)));
        assert!(lines.iter().any(|l| l.contains("[+ Add Field]")));
    }

    #[test]
    fn stack_renders_label_then_value() {
        let mut f = stack(vec![FieldItemData::new("name", "Name").value("Ada")]);
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        f.render(area, &mut buf, &Theme::default());
        assert_eq!(buffer_lines(&buf), vec!["Name", "Ada"]);
    }
}
