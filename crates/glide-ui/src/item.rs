//! Plumbing shared by the item + collection component pairs.
use crate::collection::CollectionAction;
use crate::collection::CollectionLayout;
use crate::collection::CollectionState;
use crate::collection::EmptyState;
use crate::input::InputEvent;
use crate::interaction::Activation;
use crate::theme::Theme;
use crate::view::ItemView;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::text::Line;
use std::sync::Arc;

/// Custom renderer for one slot of an item. Replaces the default slot rendering entirely.
pub type RenderLines<T> = Arc<dyn Fn(&T, usize) -> Vec<Line<'static>> + Send + Sync>;

/// Custom renderer for a whole item. Bypasses the default item renderer.
pub type RenderView<T> = Arc<dyn Fn(&T, usize) -> ItemView + Send + Sync>;

/// Handler that should run for a click, in invocation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Item,
    Collection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemAction {
    None,
    Redraw,
    Navigate {
        index: usize,
        href: String,
    },
    /// Run the click handlers in `targets`, first to last.
    Clicked {
        index: usize,
        targets: Vec<ClickTarget>,
    },
}

/// The first `limit` items, in their original order.
pub fn limited<T>(items: &[T], limit: Option<usize>) -> &[T] {
    match limit {
        Some(n) => &items[..n.min(items.len())],
        None => items,
    }
}

/// Component-specific half of an item collection.
pub trait CollectionProps {
    type Item;

    /// Message painted when there is nothing to show.
    const EMPTY_MESSAGE: &'static str = "No items to display";

    fn limit(&self) -> Option<usize>;

    fn render_item(&self) -> Option<&RenderView<Self::Item>>;

    fn item_view(&self, item: &Self::Item, index: usize) -> ItemView;

    fn layout(&self, width: u16) -> CollectionLayout;

    /// Handlers to run when a non-link item is activated. Empty means static.
    fn click_targets(&self, item: &Self::Item) -> Vec<ClickTarget>;
}

/// A sequence of items rendered through one item template.
pub struct Collection<P: CollectionProps> {
    items: Vec<P::Item>,
    props: P,
    views: Vec<ItemView>,
    state: CollectionState,
}

impl<P: CollectionProps> Collection<P> {
    pub fn new(items: Vec<P::Item>, props: P) -> Self {
        let mut c = Self {
            items,
            props,
            views: Vec::new(),
            state: CollectionState::new(),
        };
        c.rebuild();
        c
    }

    pub fn items(&self) -> &[P::Item] {
        &self.items
    }

    pub fn props(&self) -> &P {
        &self.props
    }

    pub fn set_items(&mut self, items: Vec<P::Item>) {
        self.items = items;
        self.rebuild();
    }

    pub fn set_props(&mut self, props: P) {
        self.props = props;
        self.rebuild();
    }

    /// The views that will be painted, one per displayed item.
    pub fn views(&self) -> &[ItemView] {
        &self.views
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut CollectionState {
        &mut self.state
    }

    fn rebuild(&mut self) {
        let shown = limited(&self.items, self.props.limit());
        self.views = shown
            .iter()
            .enumerate()
            .map(|(i, item)| match self.props.render_item() {
                Some(custom) => custom(item, i),
                None => self.props.item_view(item, i),
            })
            .collect();
    }

    pub fn height(&self, width: u16) -> u16 {
        if self.views.is_empty() {
            return EmptyState::HEIGHT;
        }
        let layout = self.props.layout(width);
        crate::collection::compute_rects(&self.views, layout, width)
            .iter()
            .map(|r| r.bottom())
            .max()
            .unwrap_or(0)
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if self.views.is_empty() {
            EmptyState::new(P::EMPTY_MESSAGE).render(area, buf, theme);
            return;
        }
        let layout = self.props.layout(area.width);
        self.state.render(area, buf, &self.views, layout, theme);
    }

    pub fn handle_event(&mut self, event: &InputEvent) -> ItemAction {
        match self.state.handle_event(event, &self.views) {
            CollectionAction::None => ItemAction::None,
            CollectionAction::Redraw => ItemAction::Redraw,
            CollectionAction::Activated { index, activation } => match activation {
                Activation::Navigate(href) => ItemAction::Navigate { index, href },
                Activation::Clicked => {
                    let targets = self
                        .items
                        .get(index)
                        .map(|item| self.props.click_targets(item))
                        .unwrap_or_default();
                    ItemAction::Clicked { index, targets }
                }
                Activation::None => ItemAction::Redraw,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limited_keeps_order_and_caps_length() {
        let v = [1, 2, 3];
        assert_eq!(limited(&v, Some(2)), &[1, 2]);
        assert_eq!(limited(&v, Some(10)), &[1, 2, 3]);
        assert_eq!(limited(&v, Some(0)), &[] as &[i32]);
        assert_eq!(limited(&v, None), &[1, 2, 3]);
    }
}
