//! Rows with a leading image, stacked text and an optional actions menu.
use crate::collection::CollectionLayout;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::interaction::Interaction;
use crate::item::ClickTarget;
use crate::item::Collection;
use crate::item::CollectionProps;
use crate::item::ItemAction;
use crate::item::RenderLines;
use crate::keymap::Binding;
use crate::keymap::key_char;
use crate::media::Media;
use crate::render;
use crate::theme::Theme;
use crate::variant::Attrs;
use crate::variant::Border;
use crate::variant::Direction;
use crate::variant::Recipe;
use crate::variant::TextScale;
use crate::variant::Tone;
use crate::variant::pick;
use crate::variant_axis;
use crate::view::ItemView;
use crate::view::Slot;
use crate::view::TextBlock;
use crate::wrapping::Clamp;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Clear;
use ratatui::widgets::Padding;
use ratatui::widgets::Widget;
use std::sync::Arc;
use std::sync::LazyLock;

pub use crate::card::TitleStyle;

variant_axis! {
    pub enum ListSize default Default {
        Default => "default",
        Compact => "compact",
    }
}

variant_axis! {
    pub enum ListVariant default Default {
        Default => "default",
        Card => "card",
    }
}

variant_axis! {
    pub enum ListImageShape default Square {
        Square => "square",
        Circle => "circle",
    }
}

variant_axis! {
    pub enum ListMetaPosition default AboveTitle {
        AboveTitle => "above-title",
        BelowTitle => "below-title",
    }
}

variant_axis! {
    pub enum ActionVariant default Default {
        Default => "default",
        Destructive => "destructive",
    }
}

pub const DEFAULT_DESCRIPTION_CLAMP: u8 = 2;
pub const DEFAULT_TITLE_CLAMP: u8 = 2;

/// Glyph shown on rows that carry an actions menu.
pub const ACTIONS_GLYPH: &str = "⋮";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListKey {
    pub size: ListSize,
    pub variant: ListVariant,
    pub image_shape: ListImageShape,
    pub title_style: TitleStyle,
}

pub static ROOT: LazyLock<Recipe<ListKey>> = LazyLock::new(|| {
    Recipe::<ListKey>::new(Attrs::new().direction(Direction::Horizontal))
        .axis(|k| match k.variant {
            ListVariant::Default => Attrs::new(),
            ListVariant::Card => Attrs::new().border(Border::Rounded),
        })
        .compound(
            |k| k.size == ListSize::Default && k.variant == ListVariant::Card,
            Attrs::new().padding(Padding::horizontal(2)),
        )
        .compound(
            |k| k.size == ListSize::Compact && k.variant == ListVariant::Card,
            Attrs::new().padding(Padding::horizontal(1)),
        )
});

pub static IMAGE: LazyLock<Recipe<ListKey>> = LazyLock::new(|| {
    Recipe::<ListKey>::new(Attrs::new())
        .axis(|k| match k.image_shape {
            ListImageShape::Square => Attrs::new().border(Border::Plain),
            ListImageShape::Circle => Attrs::new().border(Border::Rounded),
        })
        .axis(|k| match k.size {
            ListSize::Default => Attrs::new().width(10).height(4),
            ListSize::Compact => Attrs::new().width(8).height(3),
        })
});

pub static TITLE: LazyLock<Recipe<ListKey>> = LazyLock::new(|| {
    Recipe::<ListKey>::new(Attrs::new())
        .axis(|k| match k.title_style {
            TitleStyle::Simple => Attrs::new(),
            TitleStyle::Bold => Attrs::new().modifier(Modifier::BOLD),
        })
        .axis(|k| match k.size {
            ListSize::Default => Attrs::new().scale(TextScale::Base),
            ListSize::Compact => Attrs::new().scale(TextScale::Sm),
        })
});

pub static DESCRIPTION: LazyLock<Recipe<ListKey>> = LazyLock::new(|| {
    Recipe::<ListKey>::new(Attrs::new().tone(Tone::Muted)).axis(|k| match k.size {
        ListSize::Default => Attrs::new().scale(TextScale::Sm),
        ListSize::Compact => Attrs::new().scale(TextScale::Xs),
    })
});

static META: LazyLock<Attrs> =
    LazyLock::new(|| Attrs::new().tone(Tone::Muted).scale(TextScale::Xs));

/// Meta shown next to the title: plain text (uppercased when painted) or pre-styled lines.
#[derive(Clone, Debug, PartialEq)]
pub enum ListMeta {
    Text(String),
    Lines(Vec<Line<'static>>),
}

impl From<&str> for ListMeta {
    fn from(s: &str) -> Self {
        ListMeta::Text(s.to_string())
    }
}

impl From<String> for ListMeta {
    fn from(s: String) -> Self {
        ListMeta::Text(s)
    }
}

/// One entry of an item's actions menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub variant: ActionVariant,
}

impl MenuEntry {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variant: ActionVariant::Default,
        }
    }

    pub fn destructive(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variant: ActionVariant::Destructive,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListItem {
    pub title: String,
    pub description: Option<String>,
    pub meta: Option<ListMeta>,
    pub image: Option<String>,
    pub image_alt: Option<String>,
    pub id: Option<String>,
    pub href: Option<String>,
    /// The item has its own click handler; it shadows the collection handler.
    pub on_click: bool,
    pub image_shape: Option<ListImageShape>,
    pub title_style: Option<TitleStyle>,
    pub meta_position: Option<ListMetaPosition>,
    pub actions: Vec<MenuEntry>,
    pub aria_label: Option<String>,
}

impl ListItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, d: impl Into<String>) -> Self {
        self.description = Some(d.into());
        self
    }

    pub fn meta(mut self, meta: impl Into<ListMeta>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn image(mut self, src: impl Into<String>) -> Self {
        self.image = Some(src.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn on_click(mut self) -> Self {
        self.on_click = true;
        self
    }

    pub fn action(mut self, entry: MenuEntry) -> Self {
        self.actions.push(entry);
        self
    }
}

pub type RenderMeta = Arc<dyn Fn(&str, &ListItem) -> Vec<Line<'static>> + Send + Sync>;

#[derive(Clone)]
pub struct ListCollectionProps {
    pub size: ListSize,
    pub variant: ListVariant,
    pub image_shape: ListImageShape,
    pub title_style: TitleStyle,
    pub meta_position: ListMetaPosition,
    pub limit: Option<usize>,
    pub on_item_click: bool,
    /// Applied to text meta only; custom meta lines pass through untouched.
    pub render_meta: Option<RenderMeta>,
    /// Used when the item has no menu entries of its own.
    pub render_actions: Option<RenderLines<ListItem>>,
    pub clamp_title: Clamp,
    pub clamp_description: Clamp,
}

impl Default for ListCollectionProps {
    fn default() -> Self {
        Self {
            size: ListSize::default(),
            variant: ListVariant::default(),
            image_shape: ListImageShape::default(),
            title_style: TitleStyle::default(),
            meta_position: ListMetaPosition::default(),
            limit: None,
            on_item_click: false,
            render_meta: None,
            render_actions: None,
            clamp_title: Clamp::Off,
            clamp_description: Clamp::Default,
        }
    }
}

impl ListCollectionProps {
    fn has_click(&self, item: &ListItem) -> bool {
        item.on_click || self.on_item_click
    }
}

impl CollectionProps for ListCollectionProps {
    type Item = ListItem;

    fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn render_item(&self) -> Option<&crate::item::RenderView<ListItem>> {
        None
    }

    fn item_view(&self, item: &ListItem, index: usize) -> ItemView {
        let key = ListKey {
            size: self.size,
            variant: self.variant,
            image_shape: pick(item.image_shape, Some(self.image_shape)),
            title_style: pick(item.title_style, Some(self.title_style)),
        };
        let meta_position = pick(item.meta_position, Some(self.meta_position));

        let interaction = Interaction::resolve(item.href.as_deref(), self.has_click(item));
        let aria = interaction.aria_label(item.aria_label.as_deref(), Some(item.title.as_str()));
        let alt = item.image_alt.as_deref().unwrap_or(&item.title);
        let media = Media::image_or_placeholder(item.image.as_deref(), Some(alt));

        let meta = match &item.meta {
            Some(ListMeta::Text(text)) if text.is_empty() => None,
            Some(ListMeta::Text(text)) => Some(match &self.render_meta {
                Some(f) => Slot::Lines(f(text, item)),
                None => Slot::Text(TextBlock::new(text.to_uppercase(), *META)),
            }),
            Some(ListMeta::Lines(lines)) => Some(Slot::Lines(lines.clone())),
            None => None,
        };
        // Titles stay on one line unless a clamp is asked for.
        let title_clamp = self.clamp_title.max_lines(DEFAULT_TITLE_CLAMP);
        let title = TextBlock::new(&item.title, TITLE.resolve(&key))
            .clamp(title_clamp)
            .truncate(title_clamp.is_none());

        let mut view = ItemView::new(ROOT.resolve(&key).gap(0))
            .interaction(interaction)
            .aria_label(aria)
            .media(media, IMAGE.resolve(&key));
        if meta_position == ListMetaPosition::AboveTitle {
            view.slots.extend(meta.clone());
        }
        view.push(Slot::Text(title));
        if meta_position == ListMetaPosition::BelowTitle {
            view.slots.extend(meta);
        }
        if let Some(d) = item.description.as_deref().filter(|d| !d.is_empty()) {
            view.push(Slot::Text(
                TextBlock::new(d, DESCRIPTION.resolve(&key))
                    .clamp(self.clamp_description.max_lines(DEFAULT_DESCRIPTION_CLAMP)),
            ));
        }

        if !item.actions.is_empty() {
            view = view.trailing(TextBlock::new(ACTIONS_GLYPH, Attrs::new().tone(Tone::Muted)));
        } else if let Some(f) = &self.render_actions {
            let lines = f(item, index);
            if let Some(first) = lines.first() {
                let muted = Attrs::new().tone(Tone::Muted);
                view = view.trailing(TextBlock::new(first.to_string(), muted));
            }
        }
        view
    }

    fn layout(&self, _width: u16) -> CollectionLayout {
        match self.variant {
            ListVariant::Default => CollectionLayout::new(1).gaps(0, 1).separators(true),
            ListVariant::Card => CollectionLayout::new(1).gaps(0, 1),
        }
    }

    fn click_targets(&self, item: &ListItem) -> Vec<ClickTarget> {
        if item.on_click {
            vec![ClickTarget::Item]
        } else if self.on_item_click {
            vec![ClickTarget::Collection]
        } else {
            Vec::new()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListAction {
    None,
    Redraw,
    Navigate { index: usize, href: String },
    Clicked { index: usize, targets: Vec<ClickTarget> },
    /// A menu entry was chosen; the item click does not fire.
    MenuAction { index: usize, entry: usize },
}

impl From<ItemAction> for ListAction {
    fn from(a: ItemAction) -> Self {
        match a {
            ItemAction::None => ListAction::None,
            ItemAction::Redraw => ListAction::Redraw,
            ItemAction::Navigate { index, href } => ListAction::Navigate { index, href },
            ItemAction::Clicked { index, targets } => ListAction::Clicked { index, targets },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MenuState {
    item: usize,
    cursor: usize,
}

/// A list collection with per-item action menus.
pub struct ListCollection {
    inner: Collection<ListCollectionProps>,
    menu: Option<MenuState>,
    open_menu: Binding,
}

impl ListCollection {
    pub fn new(items: Vec<ListItem>, props: ListCollectionProps) -> Self {
        Self {
            inner: Collection::new(items, props),
            menu: None,
            open_menu: Binding::new("a", "actions", vec![key_char('a')]),
        }
    }

    pub fn items(&self) -> &[ListItem] {
        self.inner.items()
    }

    pub fn set_items(&mut self, items: Vec<ListItem>) {
        self.menu = None;
        self.inner.set_items(items);
    }

    pub fn views(&self) -> &[ItemView] {
        self.inner.views()
    }

    pub fn collection(&self) -> &Collection<ListCollectionProps> {
        &self.inner
    }

    pub fn collection_mut(&mut self) -> &mut Collection<ListCollectionProps> {
        &mut self.inner
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_some()
    }

    pub fn height(&self, width: u16) -> u16 {
        self.inner.height(width)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.inner.render(area, buf, theme);
        let Some(menu) = self.menu else {
            return;
        };
        let Some(item) = self.inner.items().get(menu.item) else {
            return;
        };
        let Some(anchor) = self.inner.state().item_area(menu.item) else {
            return;
        };
        let w = item
            .actions
            .iter()
            .map(|e| render::display_width(&e.label) as u16)
            .max()
            .unwrap_or(0)
            .saturating_add(4)
            .min(area.width);
        let h = (item.actions.len() as u16 + 2).min(area.height);
        let x = anchor.right().saturating_sub(w).max(area.x);
        let y = anchor.y.min(area.bottom().saturating_sub(h));
        let popup = Rect::new(x, y, w, h);
        Clear.render(popup, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme.border);
        let inner = block.inner(popup);
        block.render(popup, buf);
        for (i, entry) in item.actions.iter().enumerate() {
            let row = inner.y + i as u16;
            if row >= inner.bottom() {
                break;
            }
            let mut style = match entry.variant {
                ActionVariant::Default => theme.text_primary,
                ActionVariant::Destructive => theme.danger,
            };
            if i == menu.cursor {
                buf.set_style(Rect::new(inner.x, row, inner.width, 1), theme.focus);
                style = style.patch(theme.focus);
            }
            let width = inner.width.saturating_sub(1);
            render::render_str_clipped(inner.x + 1, row, width, buf, &entry.label, style);
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> ListAction {
        if let Some(menu) = self.menu {
            return self.handle_menu(menu, event);
        }
        if let InputEvent::Key(key) = event {
            if self.open_menu.matches(key) {
                let Some(index) = self.inner.state().cursor() else {
                    return ListAction::None;
                };
                let has_entries = self
                    .inner
                    .items()
                    .get(index)
                    .is_some_and(|i| !i.actions.is_empty());
                if !has_entries {
                    return ListAction::None;
                }
                self.menu = Some(MenuState {
                    item: index,
                    cursor: 0,
                });
                return ListAction::Redraw;
            }
        }
        self.inner.handle_event(event).into()
    }

    fn handle_menu(&mut self, mut menu: MenuState, event: &InputEvent) -> ListAction {
        let len = self
            .inner
            .items()
            .get(menu.item)
            .map(|i| i.actions.len())
            .unwrap_or(0);
        let InputEvent::Key(key) = event else {
            return ListAction::None;
        };
        if len == 0 {
            self.menu = None;
            return ListAction::Redraw;
        }
        match key.code {
            KeyCode::Esc => {
                self.menu = None;
                ListAction::Redraw
            }
            KeyCode::Up | KeyCode::Char('k') => {
                menu.cursor = menu.cursor.checked_sub(1).unwrap_or(len - 1);
                self.menu = Some(menu);
                ListAction::Redraw
            }
            KeyCode::Down | KeyCode::Char('j') => {
                menu.cursor = (menu.cursor + 1) % len;
                self.menu = Some(menu);
                ListAction::Redraw
            }
            _ if key.is_activate() => {
                self.menu = None;
                ListAction::MenuAction {
                    index: menu.item,
                    entry: menu.cursor,
                }
            }
            _ => ListAction::None,
        }
    }
}
