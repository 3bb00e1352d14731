//! Cards: image, meta, title and description, laid out in a responsive grid.
use crate::collection::CollectionLayout;
use crate::interaction::Interaction;
use crate::item::ClickTarget;
use crate::item::Collection;
use crate::item::CollectionProps;
use crate::item::RenderLines;
use crate::item::RenderView;
use crate::media::Media;
use crate::variant::Attrs;
use crate::variant::Border;
use crate::variant::Direction;
use crate::variant::Recipe;
use crate::variant::TextAlign;
use crate::variant::TextScale;
use crate::variant::Tone;
use crate::variant_axis;
use crate::view::ItemView;
use crate::view::Slot;
use crate::view::TextBlock;
use crate::wrapping::Clamp;
use ratatui::style::Modifier;
use ratatui::text::Line;
use ratatui::widgets::Padding;
use std::sync::LazyLock;

variant_axis! {
    pub enum CardVariant default Card {
        Card => "card",
        Minimal => "minimal",
    }
}

variant_axis! {
    pub enum AspectRatio default Square {
        Square => "square",
        Video => "video",
        Portrait => "portrait",
    }
}

variant_axis! {
    pub enum ImageShape default Square {
        Square => "square",
        Circle => "circle",
    }
}

variant_axis! {
    pub enum TitleStyle default Simple {
        Simple => "simple",
        Bold => "bold",
    }
}

variant_axis! {
    pub enum MetaPosition default AboveTitle {
        Header => "header",
        Footer => "footer",
        AboveTitle => "above-title",
        BelowTitle => "below-title",
    }
}

variant_axis! {
    /// Collection density; larger cards mean fewer columns.
    pub enum CardSize default M {
        Xs => "xs",
        S => "s",
        M => "m",
        L => "l",
        Xl => "xl",
    }
}

impl CardSize {
    pub fn columns(self) -> u16 {
        match self {
            CardSize::Xs => 6,
            CardSize::S => 5,
            CardSize::M => 4,
            CardSize::L => 3,
            CardSize::Xl => 2,
        }
    }
}

/// Narrowest column the grid will shrink to before dropping columns.
pub const MIN_COLUMN_WIDTH: u16 = 18;

pub const DEFAULT_TITLE_CLAMP: u8 = 2;
pub const DEFAULT_DESCRIPTION_CLAMP: u8 = 3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CardKey {
    pub variant: CardVariant,
    pub orientation: Direction,
    pub aspect_ratio: AspectRatio,
    pub image_shape: ImageShape,
    pub title_style: TitleStyle,
}

pub static ROOT: LazyLock<Recipe<CardKey>> = LazyLock::new(|| {
    Recipe::<CardKey>::new(Attrs::new().gap(1))
        .axis(|k| match k.variant {
            CardVariant::Card => Attrs::new().border(Border::Rounded),
            CardVariant::Minimal => Attrs::new().border(Border::None),
        })
        .axis(|k| Attrs::new().direction(k.orientation))
        .compound(
            |k| k.orientation == Direction::Horizontal && k.variant == CardVariant::Card,
            Attrs::new().padding(Padding::horizontal(1)),
        )
        .compound(
            |k| k.orientation == Direction::Vertical && k.variant == CardVariant::Card,
            Attrs::new().padding(Padding::new(1, 1, 0, 1)),
        )
        .compound(
            |k| k.orientation == Direction::Horizontal && k.variant == CardVariant::Minimal,
            Attrs::new().gap(2),
        )
});

pub static IMAGE: LazyLock<Recipe<CardKey>> = LazyLock::new(|| {
    Recipe::<CardKey>::new(Attrs::new())
        .axis(|k| match k.aspect_ratio {
            AspectRatio::Square => Attrs::new().height(6),
            AspectRatio::Video => Attrs::new().height(4),
            AspectRatio::Portrait => Attrs::new().height(8),
        })
        .axis(|k| match k.orientation {
            Direction::Vertical => Attrs::new(),
            Direction::Horizontal => Attrs::new().width(12).height(4),
        })
        .axis(|k| match k.image_shape {
            ImageShape::Square => Attrs::new().border(Border::None),
            ImageShape::Circle => Attrs::new().border(Border::Rounded).height(6).width(12),
        })
        .compound(
            |k| {
                k.orientation == Direction::Vertical
                    && k.image_shape == ImageShape::Square
                    && k.variant == CardVariant::Minimal
            },
            Attrs::new().border(Border::Rounded),
        )
        .compound(
            |k| k.orientation == Direction::Vertical && k.image_shape == ImageShape::Circle,
            Attrs::new().align(TextAlign::Center),
        )
        .compound(
            |k| k.orientation == Direction::Horizontal && k.image_shape == ImageShape::Square,
            Attrs::new().border(Border::Rounded),
        )
});

pub static TITLE: LazyLock<Recipe<CardKey>> = LazyLock::new(|| {
    Recipe::<CardKey>::new(Attrs::new())
        .axis(|k| match k.title_style {
            TitleStyle::Simple => Attrs::new(),
            TitleStyle::Bold => Attrs::new().modifier(Modifier::BOLD),
        })
        .axis(|k| match k.orientation {
            Direction::Vertical => Attrs::new().scale(TextScale::Lg),
            Direction::Horizontal => Attrs::new().scale(TextScale::Base),
        })
        .compound(
            |k| k.image_shape == ImageShape::Circle && k.orientation == Direction::Vertical,
            Attrs::new().align(TextAlign::Center),
        )
});

pub static DESCRIPTION: LazyLock<Recipe<CardKey>> = LazyLock::new(|| {
    Recipe::<CardKey>::new(Attrs::new().tone(Tone::Muted))
        .axis(|k| match k.orientation {
            Direction::Vertical => Attrs::new().scale(TextScale::Sm),
            Direction::Horizontal => Attrs::new().scale(TextScale::Xs),
        })
        .compound(
            |k| k.image_shape == ImageShape::Circle && k.orientation == Direction::Vertical,
            Attrs::new().align(TextAlign::Center),
        )
});

pub static META: LazyLock<Recipe<CardKey>> =
    LazyLock::new(|| Recipe::<CardKey>::new(Attrs::new().tone(Tone::Muted).scale(TextScale::Xs)));

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CardItem {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub meta: Option<String>,
    pub id: Option<String>,
    pub href: Option<String>,
    pub action: Option<Vec<Line<'static>>>,
    pub footer: Option<Vec<Line<'static>>>,
    pub meta_position: Option<MetaPosition>,
    pub aria_label: Option<String>,
}

impl CardItem {
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

    pub fn image(mut self, src: impl Into<String>) -> Self {
        self.image = Some(src.into());
        self
    }

    pub fn meta(mut self, meta: impl Into<String>) -> Self {
        self.meta = Some(meta.into());
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn action(mut self, lines: Vec<Line<'static>>) -> Self {
        self.action = Some(lines);
        self
    }

    pub fn footer(mut self, lines: Vec<Line<'static>>) -> Self {
        self.footer = Some(lines);
        self
    }

    pub fn meta_position(mut self, p: MetaPosition) -> Self {
        self.meta_position = Some(p);
        self
    }

    pub fn aria_label(mut self, label: impl Into<String>) -> Self {
        self.aria_label = Some(label.into());
        self
    }
}

/// Per-card presentation, shared by every card in a collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardOptions {
    pub variant: CardVariant,
    pub orientation: Direction,
    pub aspect_ratio: AspectRatio,
    pub image_shape: ImageShape,
    pub title_style: TitleStyle,
    pub meta_position: MetaPosition,
    pub show_separators: bool,
    pub clamp_title: Clamp,
    pub clamp_description: Clamp,
    /// A click handler is attached.
    pub clickable: bool,
}

impl CardOptions {
    fn key(&self) -> CardKey {
        CardKey {
            variant: self.variant,
            orientation: self.orientation,
            aspect_ratio: self.aspect_ratio,
            image_shape: self.image_shape,
            title_style: self.title_style,
        }
    }
}

/// Slot overrides computed by the collection before the item renderer runs.
#[derive(Clone, Debug, Default)]
pub struct CardSlots {
    pub meta: Option<Vec<Line<'static>>>,
    pub action: Option<Vec<Line<'static>>>,
    pub footer: Option<Vec<Line<'static>>>,
}

/// Builds the view for one card.
pub fn card_view(item: &CardItem, options: &CardOptions, slots: CardSlots) -> ItemView {
    let key = options.key();
    let horizontal = options.orientation == Direction::Horizontal;
    let meta_position = item.meta_position.unwrap_or(options.meta_position);
    let action = item.action.clone().or(slots.action);
    let footer = item.footer.clone().or(slots.footer);

    let meta_slot = || -> Option<Slot> {
        match &slots.meta {
            Some(lines) if lines.is_empty() => None,
            Some(lines) => Some(Slot::Lines(lines.clone())),
            None => item
                .meta
                .as_deref()
                .filter(|m| !m.is_empty())
                .map(|m| Slot::text(m.to_uppercase(), META.resolve(&key))),
        }
    };
    let title_slot = || {
        Slot::Text(
            TextBlock::new(&item.title, TITLE.resolve(&key))
                .clamp(options.clamp_title.max_lines(DEFAULT_TITLE_CLAMP))
                .truncate(horizontal),
        )
    };
    let description_slot = || {
        item.description.as_deref().filter(|d| !d.is_empty()).map(|d| {
            Slot::Text(
                TextBlock::new(d, DESCRIPTION.resolve(&key))
                    .clamp(options.clamp_description.max_lines(DEFAULT_DESCRIPTION_CLAMP))
                    .truncate(horizontal),
            )
        })
    };

    let interaction = Interaction::resolve(item.href.as_deref(), options.clickable);
    let aria = interaction.aria_label(item.aria_label.as_deref(), Some(item.title.as_str()));
    let media = Media::image_or_placeholder(item.image.as_deref(), Some(item.title.as_str()));

    let mut view = ItemView::new(ROOT.resolve(&key))
        .interaction(interaction)
        .aria_label(aria)
        .media(media, IMAGE.resolve(&key));

    if options.show_separators && !horizontal {
        view.push(Slot::Separator);
    }

    if meta_position == MetaPosition::Header || action.is_some() {
        if meta_position == MetaPosition::Header {
            view.slots.extend(meta_slot());
        }
        view.push(title_slot());
        view.slots.extend(description_slot());
        if let Some(lines) = action {
            view.push(Slot::Lines(lines));
        }
        if options.show_separators {
            view.push(Slot::Separator);
        }
    } else {
        if meta_position == MetaPosition::AboveTitle {
            view.slots.extend(meta_slot());
        }
        view.push(title_slot());
        if meta_position == MetaPosition::BelowTitle {
            view.slots.extend(meta_slot());
        }
        view.slots.extend(description_slot());
    }

    if meta_position == MetaPosition::Footer || footer.is_some() {
        if options.show_separators {
            view.push(Slot::Separator);
        }
        if meta_position == MetaPosition::Footer {
            view.slots.extend(meta_slot());
        }
        if let Some(lines) = footer {
            view.push(Slot::Lines(lines));
        }
    }

    view
}

#[derive(Clone, Default)]
pub struct CardCollectionProps {
    pub card: CardOptions,
    pub size: CardSize,
    pub limit: Option<usize>,
    /// Replaces the meta text. With header placement the result becomes the action slot when the
    /// card has none; with footer placement it is prepended to the footer.
    pub render_meta: Option<RenderLines<CardItem>>,
    pub render_action: Option<RenderLines<CardItem>>,
    pub render_footer: Option<RenderLines<CardItem>>,
    pub render_item: Option<RenderView<CardItem>>,
}

impl CollectionProps for CardCollectionProps {
    type Item = CardItem;

    fn limit(&self) -> Option<usize> {
        self.limit
    }

    fn render_item(&self) -> Option<&RenderView<CardItem>> {
        self.render_item.as_ref()
    }

    fn item_view(&self, item: &CardItem, index: usize) -> ItemView {
        let mut slots = CardSlots {
            meta: None,
            action: item
                .action
                .is_none()
                .then(|| self.render_action.as_ref().map(|f| f(item, index)))
                .flatten(),
            footer: item
                .footer
                .is_none()
                .then(|| self.render_footer.as_ref().map(|f| f(item, index)))
                .flatten(),
        };
        let has_meta = item.meta.as_deref().is_some_and(|m| !m.is_empty());
        if let (Some(render_meta), true) = (&self.render_meta, has_meta) {
            let custom = render_meta(item, index);
            let position = item.meta_position.unwrap_or(self.card.meta_position);
            match position {
                MetaPosition::Header => {
                    if item.action.is_none() && slots.action.is_none() {
                        slots.action = Some(custom);
                    }
                    slots.meta = Some(Vec::new());
                }
                MetaPosition::Footer => {
                    let mut lines = custom;
                    if let Some(existing) = item.footer.clone().or(slots.footer.take()) {
                        lines.extend(existing);
                    }
                    slots.footer = Some(lines);
                    slots.meta = Some(Vec::new());
                }
                MetaPosition::AboveTitle | MetaPosition::BelowTitle => {
                    slots.meta = Some(custom);
                }
            }
        }
        let mut item = item.clone();
        if slots.footer.is_some() {
            item.footer = None;
        }
        card_view(&item, &self.card, slots)
    }

    fn layout(&self, width: u16) -> CollectionLayout {
        let columns = if self.card.orientation == Direction::Horizontal {
            1
        } else {
            self.size
                .columns()
                .min((width / MIN_COLUMN_WIDTH).max(1))
        };
        CollectionLayout::new(columns).gaps(2, 1)
    }

    fn click_targets(&self, _item: &CardItem) -> Vec<ClickTarget> {
        if self.card.clickable {
            vec![ClickTarget::Collection]
        } else {
            Vec::new()
        }
    }
}

pub type CardCollection = Collection<CardCollectionProps>;
