//! Headline metrics: a large value with a label, description and optional icon.
use crate::collection::CollectionLayout;
use crate::interaction::Interaction;
use crate::item::ClickTarget;
use crate::item::Collection;
use crate::item::CollectionProps;
use crate::item::RenderView;
use crate::variant::Attrs;
use crate::variant::Border;
use crate::variant::Recipe;
use crate::variant::TextAlign;
use crate::variant::TextScale;
use crate::variant::Tone;
use crate::variant::pick;
use crate::variant_axis;
use crate::view::ItemView;
use crate::view::Slot;
use crate::view::TextBlock;
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::widgets::Padding;
use std::sync::Arc;
use std::sync::LazyLock;

variant_axis! {
    pub enum BigNumberSize default Md {
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
    }
}

variant_axis! {
    pub enum BigNumberVariant default Card {
        Card => "card",
        Outline => "outline",
        Ghost => "ghost",
        Minimal => "minimal",
    }
}

variant_axis! {
    pub enum ValueVariant default Default {
        Default => "default",
        Gradient => "gradient",
        Muted => "muted",
        Primary => "primary",
    }
}

variant_axis! {
    pub enum LabelStyle default Muted {
        Simple => "simple",
        Bold => "bold",
        Uppercase => "uppercase",
        Muted => "muted",
    }
}

variant_axis! {
    pub enum Placement default Above {
        Above => "above",
        Below => "below",
    }
}

variant_axis! {
    pub enum Columns default Auto {
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
        Auto => "auto",
    }
}

impl Columns {
    /// Column count at a given width. Narrow areas collapse to fewer columns.
    pub fn resolve(self, width: u16) -> u16 {
        let cap = match width {
            0..40 => 1,
            40..80 => 2,
            80..120 => 3,
            _ => 4,
        };
        let wanted = match self {
            Columns::One => 1,
            Columns::Two => 2,
            Columns::Three => 3,
            Columns::Four | Columns::Auto => 4,
        };
        match self {
            Columns::Auto => cap,
            // Fixed counts only collapse below the two breakpoints.
            _ if width >= 80 => wanted,
            _ => wanted.min(cap),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BigNumberKey {
    pub size: BigNumberSize,
    pub variant: BigNumberVariant,
    pub value_variant: ValueVariant,
    pub alignment: TextAlign,
    pub label_style: LabelStyle,
}

pub static CONTAINER: LazyLock<Recipe<BigNumberKey>> = LazyLock::new(|| {
    Recipe::<BigNumberKey>::new(Attrs::new())
        .axis(|k| match k.variant {
            BigNumberVariant::Card => Attrs::new()
                .border(Border::Rounded)
                .padding(Padding::new(2, 2, 1, 1)),
            BigNumberVariant::Outline => Attrs::new()
                .border(Border::Thick)
                .padding(Padding::new(2, 2, 1, 1)),
            BigNumberVariant::Ghost => Attrs::new().padding(Padding::new(2, 2, 1, 1)),
            BigNumberVariant::Minimal => Attrs::new().padding(Padding::horizontal(1)),
        })
        .axis(|k| Attrs::new().align(k.alignment))
});

pub static VALUE: LazyLock<Recipe<BigNumberKey>> = LazyLock::new(|| {
    Recipe::<BigNumberKey>::new(Attrs::new().modifier(Modifier::BOLD))
        .axis(|k| match k.size {
            BigNumberSize::Sm => Attrs::new().scale(TextScale::X2l),
            BigNumberSize::Md => Attrs::new().scale(TextScale::X3l),
            BigNumberSize::Lg => Attrs::new().scale(TextScale::X4l),
            BigNumberSize::Xl => Attrs::new().scale(TextScale::X4l),
        })
        .axis(|k| match k.value_variant {
            ValueVariant::Default => Attrs::new(),
            ValueVariant::Gradient => Attrs::new().tone(Tone::Primary).modifier(Modifier::ITALIC),
            ValueVariant::Muted => Attrs::new().tone(Tone::Muted),
            ValueVariant::Primary => Attrs::new().tone(Tone::Primary),
        })
        .axis(|k| Attrs::new().align(k.alignment))
});

pub static LABEL: LazyLock<Recipe<BigNumberKey>> = LazyLock::new(|| {
    Recipe::<BigNumberKey>::new(Attrs::new())
        .axis(|k| match k.size {
            BigNumberSize::Sm => Attrs::new().scale(TextScale::Xs),
            BigNumberSize::Md => Attrs::new().scale(TextScale::Sm),
            BigNumberSize::Lg => Attrs::new().scale(TextScale::Base),
            BigNumberSize::Xl => Attrs::new().scale(TextScale::Lg),
        })
        .axis(|k| match k.label_style {
            LabelStyle::Simple | LabelStyle::Uppercase => Attrs::new(),
            LabelStyle::Bold => Attrs::new().modifier(Modifier::BOLD),
            LabelStyle::Muted => Attrs::new().tone(Tone::Muted),
        })
        .axis(|k| Attrs::new().align(k.alignment))
});

pub static DESCRIPTION: LazyLock<Recipe<BigNumberKey>> = LazyLock::new(|| {
    Recipe::<BigNumberKey>::new(Attrs::new().tone(Tone::Muted))
        .axis(|k| match k.size {
            BigNumberSize::Sm => Attrs::new().scale(TextScale::Xs),
            BigNumberSize::Md => Attrs::new().scale(TextScale::Sm),
            BigNumberSize::Lg => Attrs::new().scale(TextScale::Base),
            BigNumberSize::Xl => Attrs::new().scale(TextScale::Lg),
        })
        .axis(|k| Attrs::new().align(k.alignment))
});

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BigNumberItem {
    pub value: String,
    pub label: Option<String>,
    pub description: Option<String>,
    pub id: Option<String>,
    /// Short glyph drawn above the value.
    pub icon: Option<String>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub href: Option<String>,
    pub on_click: bool,
    pub header: Option<Vec<Line<'static>>>,
    pub footer: Option<Vec<Line<'static>>>,
    pub aria_label: Option<String>,
    pub size: Option<BigNumberSize>,
    pub variant: Option<BigNumberVariant>,
    pub value_variant: Option<ValueVariant>,
    pub alignment: Option<TextAlign>,
}

impl BigNumberItem {
    pub fn new(value: impl ToString) -> Self {
        Self {
            value: value.to_string(),
            ..Self::default()
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn description(mut self, d: impl Into<String>) -> Self {
        self.description = Some(d.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn prefix(mut self, p: impl Into<String>) -> Self {
        self.prefix = Some(p.into());
        self
    }

    pub fn suffix(mut self, s: impl Into<String>) -> Self {
        self.suffix = Some(s.into());
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

    /// Prefix, value and suffix as one string.
    pub fn value_text(&self) -> String {
        format!(
            "{}{}{}",
            self.prefix.as_deref().unwrap_or_default(),
            self.value,
            self.suffix.as_deref().unwrap_or_default()
        )
    }

    /// Explicit label, else `"{label}: {value}"` when labelled.
    pub fn accessible_label(&self) -> Option<String> {
        if let Some(a) = &self.aria_label {
            return Some(a.clone());
        }
        self.label
            .as_ref()
            .map(|label| format!("{label}: {}", self.value))
    }
}

pub type RenderValue = Arc<dyn Fn(&BigNumberItem) -> Vec<Line<'static>> + Send + Sync>;
pub type RenderLabel = Arc<dyn Fn(&str, &BigNumberItem) -> Vec<Line<'static>> + Send + Sync>;

#[derive(Clone)]
pub struct BigNumberCollectionProps {
    pub size: BigNumberSize,
    pub variant: BigNumberVariant,
    pub value_variant: ValueVariant,
    pub alignment: TextAlign,
    pub label_style: LabelStyle,
    pub label_position: Placement,
    pub description_position: Placement,
    pub show_icon: bool,
    pub render_value: Option<RenderValue>,
    pub render_label: Option<RenderLabel>,
    pub render_icon: Option<RenderLabel>,
    pub on_item_click: bool,
    pub columns: Columns,
    pub limit: Option<usize>,
    pub render_item: Option<RenderView<BigNumberItem>>,
}

impl Default for BigNumberCollectionProps {
    fn default() -> Self {
        Self {
            size: BigNumberSize::default(),
            variant: BigNumberVariant::default(),
            value_variant: ValueVariant::default(),
            alignment: TextAlign::default(),
            label_style: LabelStyle::default(),
            label_position: Placement::Above,
            description_position: Placement::Below,
            show_icon: true,
            render_value: None,
            render_label: None,
            render_icon: None,
            on_item_click: false,
            columns: Columns::default(),
            limit: None,
            render_item: None,
        }
    }
}

impl CollectionProps for BigNumberCollectionProps {
    type Item = BigNumberItem;

    fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn render_item(&self) -> Option<&RenderView<BigNumberItem>> {
        self.render_item.as_ref()
    }

    fn item_view(&self, item: &BigNumberItem, _index: usize) -> ItemView {
        let key = BigNumberKey {
            size: pick(item.size, Some(self.size)),
            variant: pick(item.variant, Some(self.variant)),
            value_variant: pick(item.value_variant, Some(self.value_variant)),
            alignment: pick(item.alignment, Some(self.alignment)),
            label_style: self.label_style,
        };
        let has_click = item.on_click || self.on_item_click;
        let interaction = Interaction::resolve(item.href.as_deref(), has_click);

        let label = item.label.as_deref().filter(|l| !l.is_empty()).map(|l| {
            match &self.render_label {
                Some(f) => Slot::Lines(f(l, item)),
                None if self.label_style == LabelStyle::Uppercase => {
                    Slot::text(l.to_uppercase(), LABEL.resolve(&key))
                }
                None => Slot::text(l, LABEL.resolve(&key)),
            }
        });
        let description = item
            .description
            .as_deref()
            .filter(|d| !d.is_empty())
            .map(|d| Slot::text(d, DESCRIPTION.resolve(&key)));
        let value = match &self.render_value {
            Some(f) => Slot::Lines(f(item)),
            None => Slot::Text(TextBlock::new(item.value_text(), VALUE.resolve(&key))),
        };

        let mut view = ItemView::new(CONTAINER.resolve(&key))
            .interaction(interaction)
            .aria_label(item.accessible_label());
        if let Some(header) = &item.header {
            view.push(Slot::Lines(header.clone()));
            view.push(Slot::Spacer(1));
        }
        if let Some(icon) = item.icon.as_deref().filter(|_| self.show_icon) {
            view.push(match &self.render_icon {
                Some(f) => Slot::Lines(f(icon, item)),
                None => Slot::text(icon, Attrs::new().tone(Tone::Primary).align(key.alignment)),
            });
        }
        if self.label_position == Placement::Above {
            view.slots.extend(label.clone());
        }
        if self.description_position == Placement::Above {
            view.slots.extend(description.clone());
        }
        view.push(value);
        if self.label_position == Placement::Below {
            view.slots.extend(label);
        }
        if self.description_position == Placement::Below {
            view.slots.extend(description);
        }
        if let Some(footer) = &item.footer {
            view.push(Slot::Spacer(1));
            view.push(Slot::Lines(footer.clone()));
        }
        view
    }

    fn layout(&self, width: u16) -> CollectionLayout {
        CollectionLayout::new(self.columns.resolve(width)).gaps(2, 1)
    }

    /// The item handler runs first, then the collection handler.
    fn click_targets(&self, item: &BigNumberItem) -> Vec<ClickTarget> {
        let mut targets = Vec::new();
        if item.on_click {
            targets.push(ClickTarget::Item);
        }
        if self.on_item_click {
            targets.push(ClickTarget::Collection);
        }
        targets
    }
}

pub type BigNumberCollection = Collection<BigNumberCollectionProps>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputEvent;
    use crate::input::KeyCode;
    use crate::item::ItemAction;
    use crate::render::buffer_lines;
    use crate::theme::Theme;
    use crate::variant::Variant;
    use ratatui::buffer::Buffer;
    use ratatui::layout::Rect;

    fn revenue() -> BigNumberItem {
        BigNumberItem::new("12,400")
            .prefix("$")
            .suffix("/mo")
            .label("Revenue")
            .description("Up 12% from last month")
    }

    fn texts(view: &ItemView) -> Vec<String> {
        view.slots
            .iter()
            .filter_map(|s| match s {
                Slot::Text(t) => Some(t.text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn value_text_joins_prefix_and_suffix() {
        assert_eq!(revenue().value_text(), "$12,400/mo");
        assert_eq!(BigNumberItem::new(42).value_text(), "42");
    }

    #[test]
    fn aria_label_falls_back_to_label_and_value() {
        assert_eq!(revenue().accessible_label().as_deref(), Some("Revenue: 12,400"));
        assert_eq!(BigNumberItem::new(1).accessible_label(), None);
    }

    #[test]
    fn label_above_and_description_below_by_default() {
        let c = BigNumberCollection::new(vec![revenue()], BigNumberCollectionProps::default());
        assert_eq!(
            texts(&c.views()[0]),
            vec!["Revenue", "$12,400/mo", "Up 12% from last month"]
        );
    }

    #[test]
    fn positions_can_flip() {
        let props = BigNumberCollectionProps {
            label_position: Placement::Below,
            description_position: Placement::Above,
            label_style: LabelStyle::Uppercase,
            ..Default::default()
        };
        let c = BigNumberCollection::new(vec![revenue()], props);
        assert_eq!(
            texts(&c.views()[0]),
            vec!["Up 12% from last month", "$12,400/mo", "REVENUE"]
        );
    }

    #[test]
    fn icon_respects_show_icon() {
        let item = revenue().icon("$");
        let c = BigNumberCollection::new(vec![item.clone()], BigNumberCollectionProps::default());
        assert_eq!(texts(&c.views()[0])[0], "$");
        let props = BigNumberCollectionProps {
            show_icon: false,
            ..Default::default()
        };
        let c = BigNumberCollection::new(vec![item], props);
        assert_eq!(texts(&c.views()[0])[0], "Revenue");
    }

    #[test]
    fn item_handler_runs_before_collection_handler() {
        let props = BigNumberCollectionProps {
            on_item_click: true,
            ..Default::default()
        };
        let mut c = BigNumberCollection::new(vec![revenue().on_click()], props);
        c.state_mut().set_cursor(Some(0));
        assert_eq!(
            c.handle_event(&InputEvent::key(KeyCode::Enter)),
            ItemAction::Clicked {
                index: 0,
                targets: vec![ClickTarget::Item, ClickTarget::Collection]
            }
        );
    }

    #[test]
    fn per_item_overrides_win() {
        let mut item = revenue();
        item.variant = Some(BigNumberVariant::Minimal);
        let c =
            BigNumberCollection::new(vec![item, revenue()], BigNumberCollectionProps::default());
        assert_eq!(c.views()[0].attrs.border, None);
        assert_eq!(c.views()[1].attrs.border, Some(Border::Rounded));
    }

    #[test]
    fn columns_collapse_on_narrow_areas() {
        assert_eq!(Columns::Auto.resolve(30), 1);
        assert_eq!(Columns::Auto.resolve(60), 2);
        assert_eq!(Columns::Auto.resolve(100), 3);
        assert_eq!(Columns::Auto.resolve(200), 4);
        assert_eq!(Columns::Four.resolve(60), 2);
        assert_eq!(Columns::Four.resolve(90), 4);
        assert_eq!(Columns::One.resolve(200), 1);
    }

    #[test]
    fn centered_value_renders_in_the_middle() {
        let mut item = BigNumberItem::new("99");
        item.alignment = Some(TextAlign::Center);
        item.variant = Some(BigNumberVariant::Minimal);
        let mut c = BigNumberCollection::new(
            vec![item],
            BigNumberCollectionProps {
                columns: Columns::One,
                ..Default::default()
            },
        );
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        c.render(area, &mut buf, &Theme::default());
        assert_eq!(buffer_lines(&buf)[0], "     99");
    }

    #[test]
    fn every_axis_combination_resolves() {
        for size in BigNumberSize::ALL {
            for variant in BigNumberVariant::ALL {
                for value_variant in ValueVariant::ALL {
                    let key = BigNumberKey {
                        size: *size,
                        variant: *variant,
                        value_variant: *value_variant,
                        ..Default::default()
                    };
                    assert!(VALUE.resolve(&key).scale.is_some());
                    assert!(CONTAINER.resolve(&key).padding.is_some());
                }
            }
        }
    }
}
