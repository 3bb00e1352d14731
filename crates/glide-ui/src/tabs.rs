//! Tab strip with visibility rules, controlled or uncontrolled selection and reordering.
//!
//! The container keeps an ordered working copy of its tabs. Visibility is evaluated on demand
//! against that copy, and whenever the active tab stops being visible the first visible tab takes
//! over. Reordering moves a tab within the copy and reports the new order; it never changes
//! visibility or the active tab.
use crate::collection::EmptyState;
use crate::container::Container;
use crate::input::InputEvent;
use crate::input::KeyCode;
use crate::input::KeyEvent;
use crate::render;
use crate::reorder::DragEnd;
use crate::reorder::Reorderable;
use crate::reorder::array_move;
use crate::reorder::keyboard_drag;
use crate::reorder::resolve_drag_end;
use crate::theme::Theme;
use crate::variant::Attrs;
use crate::variant_axis;
use crate::view::TextBlock;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use std::fmt;
use std::sync::Arc;

variant_axis! {
    pub enum TabsVariant default Default {
        Default => "default",
        Line => "line",
    }
}

variant_axis! {
    pub enum Orientation default Horizontal {
        Horizontal => "horizontal",
        Vertical => "vertical",
    }
}

pub const EMPTY_MESSAGE: &str = "No tabs available";

pub type VisibleFn = Arc<dyn Fn(&TabItem, &[TabItem]) -> bool + Send + Sync>;
pub type RenderContent = Arc<dyn Fn(Rect, &mut Buffer, &Theme) + Send + Sync>;

/// Whether a tab shows up in the strip.
#[derive(Clone, Default)]
pub enum Visibility {
    #[default]
    Always,
    Flag(bool),
    /// Evaluated against the tab and the full ordered sequence.
    When(VisibleFn),
}

impl fmt::Debug for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Always => f.write_str("Always"),
            Visibility::Flag(b) => f.debug_tuple("Flag").field(b).finish(),
            Visibility::When(_) => f.write_str("When(..)"),
        }
    }
}

impl From<bool> for Visibility {
    fn from(visible: bool) -> Self {
        Visibility::Flag(visible)
    }
}

#[derive(Clone, Default)]
pub struct TabItem {
    pub id: String,
    pub label: String,
    pub content: Option<RenderContent>,
    pub icon: Option<String>,
    pub badge: Option<String>,
    pub disabled: bool,
    pub visible: Visibility,
    pub aria_label: Option<String>,
}

impl fmt::Debug for TabItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabItem")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("disabled", &self.disabled)
            .field("visible", &self.visible)
            .finish_non_exhaustive()
    }
}

impl TabItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn content(
        mut self,
        f: impl Fn(Rect, &mut Buffer, &Theme) + Send + Sync + 'static,
    ) -> Self {
        self.content = Some(Arc::new(f));
        self
    }

    /// Plain wrapped text as the panel content.
    pub fn text(self, text: impl Into<String>) -> Self {
        let block = TextBlock::new(text, Attrs::new());
        self.content(move |area, buf, theme| {
            block.render(area, buf, theme);
        })
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn badge(mut self, badge: impl ToString) -> Self {
        self.badge = Some(badge.to_string());
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn visible(mut self, visible: impl Into<Visibility>) -> Self {
        self.visible = visible.into();
        self
    }

    pub fn visible_when(
        mut self,
        f: impl Fn(&TabItem, &[TabItem]) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.visible = Visibility::When(Arc::new(f));
        self
    }

    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }

    pub fn is_visible(&self, all: &[TabItem]) -> bool {
        match &self.visible {
            Visibility::Always => true,
            Visibility::Flag(b) => *b,
            Visibility::When(f) => f(self, all),
        }
    }

    /// Explicit label, else the visible label.
    pub fn accessible_label(&self) -> &str {
        self.aria_label
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or(&self.label)
    }

    fn trigger_text(&self) -> String {
        let mut text = String::new();
        if let Some(icon) = self.icon.as_deref().filter(|i| !i.is_empty()) {
            text.push_str(icon);
            text.push(' ');
        }
        text.push_str(&self.label);
        if let Some(badge) = &self.badge {
            text.push_str(&format!(" ({badge})"));
        }
        format!(" {text} ")
    }
}

#[derive(Clone, Debug, Default)]
pub struct TabsOptions {
    pub variant: TabsVariant,
    pub orientation: Orientation,
    pub draggable: bool,
    pub show_separators: bool,
    /// Width, padding and background around the strip and panel.
    pub container: Container,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TabsAction {
    None,
    Redraw,
    /// The active tab changed, or should change when the value is controlled.
    ValueChange(String),
    /// Tab ids in their new order.
    Reordered(Vec<String>),
}

pub struct TabsContainer {
    tabs: Vec<TabItem>,
    options: TabsOptions,
    controlled: Option<String>,
    internal: Option<String>,
    triggers: Vec<(Rect, usize)>,
}

impl TabsContainer {
    pub fn new(tabs: Vec<TabItem>, options: TabsOptions) -> Self {
        Self {
            tabs,
            options,
            controlled: None,
            internal: None,
            triggers: Vec::new(),
        }
    }

    /// Initial active tab for an uncontrolled container.
    pub fn default_value(mut self, id: impl Into<String>) -> Self {
        self.internal = Some(id.into());
        self
    }

    /// Makes the active tab dictated by the caller. Changes are only requested through
    /// [`TabsAction::ValueChange`]. `None` hands control back to the container.
    pub fn set_value(&mut self, value: Option<String>) {
        self.controlled = value;
    }

    pub fn is_controlled(&self) -> bool {
        self.controlled.is_some()
    }

    pub fn tabs(&self) -> &[TabItem] {
        &self.tabs
    }

    pub fn options(&self) -> &TabsOptions {
        &self.options
    }

    /// Replaces the tab sequence and reconciles the active tab against it.
    pub fn set_tabs(&mut self, tabs: Vec<TabItem>) -> TabsAction {
        self.tabs = tabs;
        self.reconcile()
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        self.tabs
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_visible(&self.tabs))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn visible_tabs(&self) -> Vec<&TabItem> {
        self.visible_indices()
            .into_iter()
            .map(|i| &self.tabs[i])
            .collect()
    }

    fn current(&self) -> Option<&str> {
        self.controlled.as_deref().or(self.internal.as_deref())
    }

    /// The active tab id, falling back to the first visible tab. `None` when nothing is visible.
    pub fn active(&self) -> Option<&str> {
        let visible = self.visible_indices();
        let first = visible.first().map(|&i| self.tabs[i].id.as_str())?;
        match self.current() {
            Some(id) if visible.iter().any(|&i| self.tabs[i].id == id) => Some(id),
            _ => Some(first),
        }
    }

    /// Moves the active tab to the first visible one when it has been hidden or removed.
    pub fn reconcile(&mut self) -> TabsAction {
        let Some(current) = self.current().map(str::to_string) else {
            return TabsAction::None;
        };
        let visible = self.visible_indices();
        if visible.iter().any(|&i| self.tabs[i].id == current) {
            return TabsAction::None;
        }
        let Some(&first) = visible.first() else {
            return TabsAction::None;
        };
        let first = self.tabs[first].id.clone();
        tracing::debug!(from = %current, to = %first, "active tab no longer visible");
        if self.controlled.is_none() {
            self.internal = Some(first.clone());
        }
        TabsAction::ValueChange(first)
    }

    /// Activates a visible, enabled tab.
    pub fn select(&mut self, id: &str) -> TabsAction {
        let selectable = self
            .visible_tabs()
            .iter()
            .any(|t| t.id == id && !t.disabled);
        if !selectable || self.active() == Some(id) {
            return TabsAction::None;
        }
        if self.controlled.is_none() {
            self.internal = Some(id.to_string());
        }
        TabsAction::ValueChange(id.to_string())
    }

    /// Applies a completed drag. Drops outside the strip, onto self, or involving a disabled tab
    /// are ignored.
    pub fn drag_end(&mut self, drag: &DragEnd<String>) -> TabsAction {
        if !self.options.draggable {
            return TabsAction::None;
        }
        if resolve_drag_end(&*self, drag).is_none() {
            return TabsAction::None;
        }
        let position = |id: &str| self.tabs.iter().position(|t| t.id == id);
        let (Some(from), Some(to)) = (
            position(drag.active.as_str()),
            drag.over.as_deref().and_then(position),
        ) else {
            return TabsAction::None;
        };
        array_move(&mut self.tabs, from, to);
        TabsAction::Reordered(self.tabs.iter().map(|t| t.id.clone()).collect())
    }

    fn step(&mut self, forward: bool) -> TabsAction {
        let enabled: Vec<String> = self
            .visible_tabs()
            .iter()
            .filter(|t| !t.disabled)
            .map(|t| t.id.clone())
            .collect();
        if enabled.is_empty() {
            return TabsAction::None;
        }
        let at = self
            .active()
            .and_then(|a| enabled.iter().position(|id| id == a));
        let next = match (at, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % enabled.len(),
            (Some(i), false) => (i + enabled.len() - 1) % enabled.len(),
        };
        self.select(&enabled[next])
    }

    fn jump(&mut self, last: bool) -> TabsAction {
        let visible = self.visible_tabs();
        let mut enabled = visible.iter().filter(|t| !t.disabled);
        let target = if last { enabled.last() } else { enabled.next() };
        match target.map(|t| t.id.clone()) {
            Some(id) => self.select(&id),
            None => TabsAction::None,
        }
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> TabsAction {
        match event {
            InputEvent::Key(key) => self.handle_key(key),
            InputEvent::Mouse(m) if m.is_click() => {
                let hit = self
                    .triggers
                    .iter()
                    .find(|(r, _)| r.contains((m.x, m.y).into()))
                    .map(|(_, i)| *i);
                match hit.and_then(|i| self.tabs.get(i)).map(|t| t.id.clone()) {
                    Some(id) => self.select(&id),
                    None => TabsAction::None,
                }
            }
            _ => TabsAction::None,
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> TabsAction {
        if key.modifiers.alt {
            if !self.options.draggable {
                return TabsAction::None;
            }
            let Some(active) = self.active().map(str::to_string) else {
                return TabsAction::None;
            };
            return match keyboard_drag(&*self, &active, key) {
                Some(drag) => self.drag_end(&drag),
                None => TabsAction::None,
            };
        }
        let (back, forward) = match self.options.orientation {
            Orientation::Horizontal => (KeyCode::Left, KeyCode::Right),
            Orientation::Vertical => (KeyCode::Up, KeyCode::Down),
        };
        match &key.code {
            code if *code == forward => self.step(true),
            code if *code == back => self.step(false),
            KeyCode::Tab => self.step(true),
            KeyCode::BackTab => self.step(false),
            KeyCode::Home => self.jump(false),
            KeyCode::End => self.jump(true),
            _ => TabsAction::None,
        }
    }

    /// Paints the strip and the active panel; returns the panel area.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) -> Option<Rect> {
        self.triggers.clear();
        let body = self.options.container.render(area, buf, theme).body;
        let visible = self.visible_indices();
        if visible.is_empty() {
            EmptyState::new(EMPTY_MESSAGE).render(body, buf, theme);
            return None;
        }
        let active = self.active().map(str::to_string);
        let panel = match self.options.orientation {
            Orientation::Horizontal => {
                self.render_horizontal(body, buf, theme, &visible, active.as_deref())
            }
            Orientation::Vertical => {
                self.render_vertical(body, buf, theme, &visible, active.as_deref())
            }
        };
        let content = active
            .as_deref()
            .and_then(|id| self.tabs.iter().find(|t| t.id == id))
            .and_then(|t| t.content.clone());
        if let Some(content) = content {
            content(panel, buf, theme);
        }
        Some(panel)
    }

    fn trigger_style(
        &self,
        tab: &TabItem,
        is_active: bool,
        theme: &Theme,
    ) -> ratatui::style::Style {
        if tab.disabled {
            return theme.text_muted.add_modifier(Modifier::DIM);
        }
        match (self.options.variant, is_active) {
            (TabsVariant::Default, true) => theme
                .focus
                .patch(theme.text_primary)
                .add_modifier(Modifier::BOLD),
            (TabsVariant::Line, true) => {
                theme.accent.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
            }
            (_, false) => theme.text_muted,
        }
    }

    fn render_horizontal(
        &mut self,
        body: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        visible: &[usize],
        active: Option<&str>,
    ) -> Rect {
        if body.height == 0 {
            return body;
        }
        if self.options.variant == TabsVariant::Default {
            buf.set_style(Rect::new(body.x, body.y, body.width, 1), theme.surface_muted);
        }
        let mut x = body.x;
        for (pos, &i) in visible.iter().enumerate() {
            let tab = &self.tabs[i];
            let text = tab.trigger_text();
            let style = self.trigger_style(tab, active == Some(tab.id.as_str()), theme);
            let max = body.right().saturating_sub(x);
            let w = render::render_str_clipped(x, body.y, max, buf, &text, style);
            self.triggers.push((Rect::new(x, body.y, w, 1), i));
            x = x.saturating_add(w);
            if self.options.show_separators && pos + 1 < visible.len() && x < body.right() {
                render::render_str_clipped(x, body.y, 1, buf, "│", theme.border);
                x += 1;
            }
        }
        let mut top = body.y + 1;
        if self.options.variant == TabsVariant::Line && body.height > 1 {
            let rule = "─".repeat(body.width as usize);
            render::render_str_clipped(body.x, top, body.width, buf, &rule, theme.border);
            top += 1;
        }
        let top = (top + 1).min(body.bottom());
        Rect::new(body.x, top, body.width, body.bottom() - top)
    }

    fn render_vertical(
        &mut self,
        body: Rect,
        buf: &mut Buffer,
        theme: &Theme,
        visible: &[usize],
        active: Option<&str>,
    ) -> Rect {
        let list_w = visible
            .iter()
            .map(|&i| render::display_width(&self.tabs[i].trigger_text()) as u16)
            .max()
            .unwrap_or(0)
            .min(body.width);
        let mut y = body.y;
        for (pos, &i) in visible.iter().enumerate() {
            if y >= body.bottom() {
                break;
            }
            let tab = &self.tabs[i];
            let style = self.trigger_style(tab, active == Some(tab.id.as_str()), theme);
            let row = Rect::new(body.x, y, list_w, 1);
            buf.set_style(row, style);
            render::render_str_clipped(row.x, y, list_w, buf, &tab.trigger_text(), style);
            self.triggers.push((row, i));
            y += 1;
            if self.options.show_separators && pos + 1 < visible.len() && y < body.bottom() {
                let rule = "─".repeat(list_w as usize);
                render::render_str_clipped(body.x, y, list_w, buf, &rule, theme.border);
                y += 1;
            }
        }
        if self.options.variant == TabsVariant::Line {
            let x = body.x + list_w;
            for dy in 0..body.height {
                render::render_str_clipped(x, body.y + dy, 1, buf, "│", theme.border);
            }
        }
        let left = (list_w + 2).min(body.width);
        Rect::new(body.x + left, body.y, body.width - left, body.height)
    }
}

impl Reorderable for TabsContainer {
    type Id = String;

    fn sortable_ids(&self) -> Vec<String> {
        self.visible_tabs().iter().map(|t| t.id.clone()).collect()
    }

    fn can_drag(&self, id: &String) -> bool {
        self.options.draggable && self.tabs.iter().any(|t| t.id == *id && !t.disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::ContainerPadding;
    use crate::container::ContainerVariant;
    use crate::keymap;
    use crate::render::buffer_lines;

    fn tabs() -> Vec<TabItem> {
        vec![
            TabItem::new("a", "Alpha").text("alpha panel"),
            TabItem::new("b", "Beta").text("beta panel"),
            TabItem::new("c", "Gamma").badge(3),
        ]
    }

    fn bare() -> TabsOptions {
        TabsOptions {
            container: Container::new()
                .variant(ContainerVariant::Full)
                .padding(ContainerPadding::None),
            ..Default::default()
        }
    }

    fn container(tabs: Vec<TabItem>) -> TabsContainer {
        TabsContainer::new(tabs, bare())
    }

    fn key(code: KeyCode) -> InputEvent {
        InputEvent::key(code)
    }

    #[test]
    fn first_visible_tab_is_active_by_default() {
        let t = container(tabs());
        assert_eq!(t.active(), Some("a"));
        let mut hidden = tabs();
        hidden[0].visible = Visibility::Flag(false);
        assert_eq!(container(hidden).active(), Some("b"));
    }

    #[test]
    fn hiding_the_active_tab_moves_to_first_visible() {
        let mut t = container(tabs()).default_value("b");
        assert_eq!(t.active(), Some("b"));
        let mut next = tabs();
        next[1] = next[1].clone().visible(false);
        assert_eq!(t.set_tabs(next), TabsAction::ValueChange("a".to_string()));
        assert_eq!(t.active(), Some("a"));
    }

    #[test]
    fn no_visible_tabs_means_no_active_tab() {
        let mut t = container(tabs()).default_value("b");
        let hidden: Vec<TabItem> = tabs().into_iter().map(|t| t.visible(false)).collect();
        assert_eq!(t.set_tabs(hidden), TabsAction::None);
        assert_eq!(t.active(), None);
        let area = Rect::new(0, 0, 30, 3);
        let mut buf = Buffer::empty(area);
        assert_eq!(t.render(area, &mut buf, &Theme::default()), None);
        assert!(buffer_lines(&buf).iter().any(|l| l.contains(EMPTY_MESSAGE)));
    }

    #[test]
    fn predicates_see_the_whole_sequence() {
        let t = container(vec![
            TabItem::new("a", "A"),
            TabItem::new("more", "More").visible_when(|_, all| all.len() > 2),
        ]);
        assert_eq!(t.visible_tabs().len(), 1);
    }

    #[test]
    fn controlled_value_only_requests_changes() {
        let mut t = container(tabs());
        t.set_value(Some("a".to_string()));
        assert_eq!(t.handle_event(&key(KeyCode::Right)), TabsAction::ValueChange("b".to_string()));
        assert_eq!(t.active(), Some("a"));
        t.set_value(Some("b".to_string()));
        assert_eq!(t.active(), Some("b"));
    }

    #[test]
    fn arrows_skip_disabled_tabs_and_wrap() {
        let mut list = tabs();
        list[1].disabled = true;
        let mut t = container(list);
        assert_eq!(t.handle_event(&key(KeyCode::Right)), TabsAction::ValueChange("c".to_string()));
        assert_eq!(t.handle_event(&key(KeyCode::Right)), TabsAction::ValueChange("a".to_string()));
        assert_eq!(t.handle_event(&key(KeyCode::Left)), TabsAction::ValueChange("c".to_string()));
        assert_eq!(t.select("b"), TabsAction::None);
    }

    #[test]
    fn vertical_orientation_uses_up_and_down() {
        let mut t = TabsContainer::new(
            tabs(),
            TabsOptions {
                orientation: Orientation::Vertical,
                ..bare()
            },
        );
        assert_eq!(t.handle_event(&key(KeyCode::Right)), TabsAction::None);
        assert_eq!(t.handle_event(&key(KeyCode::Down)), TabsAction::ValueChange("b".to_string()));
    }

    #[test]
    fn alt_arrows_reorder_when_draggable() {
        let mut t = TabsContainer::new(
            tabs(),
            TabsOptions {
                draggable: true,
                ..bare()
            },
        );
        let action = t.handle_event(&InputEvent::Key(keymap::key_alt(KeyCode::Right)));
        assert_eq!(
            action,
            TabsAction::Reordered(vec!["b".to_string(), "a".to_string(), "c".to_string()])
        );
        assert_eq!(t.active(), Some("a"));

        let mut fixed = container(tabs());
        assert_eq!(
            fixed.handle_event(&InputEvent::Key(keymap::key_alt(KeyCode::Right))),
            TabsAction::None
        );
    }

    #[test]
    fn drag_moves_rather_than_swaps() {
        let mut t = TabsContainer::new(
            tabs(),
            TabsOptions {
                draggable: true,
                ..bare()
            },
        );
        let drag = DragEnd {
            active: "a".to_string(),
            over: Some("c".to_string()),
        };
        assert_eq!(
            t.drag_end(&drag),
            TabsAction::Reordered(vec!["b".to_string(), "c".to_string(), "a".to_string()])
        );
    }

    #[test]
    fn disabled_tabs_cannot_be_dragged() {
        let mut list = tabs();
        list[2].disabled = true;
        let mut t = TabsContainer::new(
            list,
            TabsOptions {
                draggable: true,
                ..bare()
            },
        );
        let drag = DragEnd {
            active: "a".to_string(),
            over: Some("c".to_string()),
        };
        assert_eq!(t.drag_end(&drag), TabsAction::None);
    }

    #[test]
    fn renders_strip_and_active_panel() {
        let mut t = container(tabs());
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        let panel = t.render(area, &mut buf, &Theme::default());
        assert_eq!(panel, Some(Rect::new(0, 2, 40, 2)));
        let lines = buffer_lines(&buf);
        assert_eq!(lines[0], " Alpha  Beta  Gamma (3)");
        assert_eq!(lines[2], "alpha panel");
    }

    #[test]
    fn clicking_a_trigger_selects_it() {
        let mut t = container(tabs());
        let area = Rect::new(0, 0, 40, 4);
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        let click = InputEvent::Mouse(crate::input::MouseEvent {
            x: 9,
            y: 0,
            kind: crate::input::MouseEventKind::Down(crate::input::MouseButton::Left),
            modifiers: Default::default(),
        });
        assert_eq!(t.handle_event(&click), TabsAction::ValueChange("b".to_string()));
        assert_eq!(t.active(), Some("b"));
    }

    #[test]
    fn aria_label_falls_back_to_label() {
        assert_eq!(TabItem::new("a", "Alpha").accessible_label(), "Alpha");
        assert_eq!(TabItem::new("a", "Alpha").aria_label("First").accessible_label(), "First");
    }
}
