//! Page title block: eyebrow emphasis, heading, subtitle and optional imagery.
use crate::media::Media;
use crate::theme::Theme;
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
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::widgets::Padding;
use std::sync::LazyLock;

variant_axis! {
    pub enum TitleVariant default Simple {
        Simple => "simple",
        Image => "image",
        Cover => "cover",
        Profile => "profile",
    }
}

variant_axis! {
    pub enum TitleSize default Default {
        Default => "default",
        Compact => "compact",
    }
}

variant_axis! {
    pub enum ImageFill default Fill {
        Fill => "fill",
        Fit => "fit",
    }
}

/// Alt text used for a cover image without one.
pub const COVER_ALT_FALLBACK: &str = "Cover image";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TitleKey {
    pub variant: TitleVariant,
    pub size: TitleSize,
    pub image_fill: ImageFill,
}

pub static CONTAINER: LazyLock<Recipe<TitleKey>> = LazyLock::new(|| {
    Recipe::<TitleKey>::new(Attrs::new())
        .axis(|k| match k.variant {
            TitleVariant::Simple => Attrs::new().direction(Direction::Horizontal).gap(2),
            TitleVariant::Image => Attrs::new().direction(Direction::Horizontal).gap(3),
            TitleVariant::Cover => Attrs::new()
                .direction(Direction::Vertical)
                .border(Border::Rounded)
                .min_height(10),
            TitleVariant::Profile => Attrs::new()
                .direction(Direction::Vertical)
                .align(TextAlign::Center)
                .gap(1),
        })
        .compound(
            |k| k.variant == TitleVariant::Simple && k.size == TitleSize::Default,
            Attrs::new().padding(Padding::vertical(1)),
        )
        .compound(
            |k| k.variant == TitleVariant::Cover && k.size == TitleSize::Compact,
            Attrs::new().min_height(8),
        )
        .compound(
            |k| k.variant == TitleVariant::Profile && k.size == TitleSize::Default,
            Attrs::new().padding(Padding::vertical(1)),
        )
});

pub static IMAGE: LazyLock<Recipe<TitleKey>> = LazyLock::new(|| {
    Recipe::<TitleKey>::new(Attrs::new())
        .axis(|k| match k.variant {
            TitleVariant::Simple => Attrs::new().width(12).height(5),
            TitleVariant::Image => Attrs::new().width(28).height(8),
            TitleVariant::Cover => Attrs::new().height(4),
            TitleVariant::Profile => Attrs::new().width(10).height(5),
        })
        .axis(|k| match k.image_fill {
            ImageFill::Fill => Attrs::new(),
            ImageFill::Fit => Attrs::new().padding(Padding::uniform(1)),
        })
        .compound(
            |k| k.variant == TitleVariant::Simple && k.size == TitleSize::Compact,
            Attrs::new().width(7).height(3),
        )
        .compound(
            |k| k.variant == TitleVariant::Image && k.size == TitleSize::Compact,
            Attrs::new().width(20).height(6),
        )
        .compound(
            |k| k.variant == TitleVariant::Profile && k.size == TitleSize::Compact,
            Attrs::new().width(8).height(4),
        )
        .compound(
            |k| k.variant == TitleVariant::Cover && k.size == TitleSize::Compact,
            Attrs::new().height(3),
        )
});

/// Profile image that overlaps the bottom of a cover.
pub static COVER_PROFILE: LazyLock<Recipe<TitleKey>> = LazyLock::new(|| {
    Recipe::<TitleKey>::new(Attrs::new().border(Border::Thick)).axis(|k| match k.size {
        TitleSize::Default => Attrs::new().width(12).height(4),
        TitleSize::Compact => Attrs::new().width(9).height(3),
    })
});

pub static CONTENT: LazyLock<Recipe<TitleKey>> = LazyLock::new(|| {
    Recipe::<TitleKey>::new(Attrs::new().gap(0))
        .axis(|k| match k.variant {
            TitleVariant::Cover => Attrs::new()
                .direction(Direction::Horizontal)
                .padding(Padding::new(2, 2, 1, 1)),
            TitleVariant::Profile => Attrs::new().align(TextAlign::Center),
            _ => Attrs::new(),
        })
        .compound(
            |k| k.variant == TitleVariant::Cover && k.size == TitleSize::Compact,
            Attrs::new().padding(Padding::horizontal(1)),
        )
});

pub static EMPHASIS: LazyLock<Recipe<TitleKey>> = LazyLock::new(|| {
    Recipe::<TitleKey>::new(
        Attrs::new()
            .scale(TextScale::Xs)
            .tone(Tone::Muted)
            .modifier(Modifier::BOLD),
    )
});

pub static TITLE_TEXT: LazyLock<Recipe<TitleKey>> = LazyLock::new(|| {
    Recipe::<TitleKey>::new(Attrs::new().modifier(Modifier::BOLD))
        .axis(|k| match k.variant {
            TitleVariant::Simple | TitleVariant::Cover => Attrs::new().scale(TextScale::X2l),
            TitleVariant::Image | TitleVariant::Profile => Attrs::new().scale(TextScale::X3l),
        })
        .compound(
            |k| k.variant == TitleVariant::Simple && k.size == TitleSize::Compact,
            Attrs::new().scale(TextScale::Lg),
        )
        .compound(
            |k| k.variant == TitleVariant::Image && k.size == TitleSize::Compact,
            Attrs::new().scale(TextScale::X2l),
        )
        .compound(
            |k| k.variant == TitleVariant::Cover && k.size == TitleSize::Compact,
            Attrs::new().scale(TextScale::Xl),
        )
        .compound(
            |k| k.variant == TitleVariant::Profile && k.size == TitleSize::Compact,
            Attrs::new().scale(TextScale::X2l),
        )
});

pub static SUBTITLE_TEXT: LazyLock<Recipe<TitleKey>> = LazyLock::new(|| {
    Recipe::<TitleKey>::new(Attrs::new().tone(Tone::Muted))
        .axis(|k| match (k.variant, k.size) {
            (TitleVariant::Simple | TitleVariant::Cover, TitleSize::Default) => {
                Attrs::new().scale(TextScale::Base)
            }
            (TitleVariant::Simple | TitleVariant::Cover, TitleSize::Compact) => {
                Attrs::new().scale(TextScale::Sm)
            }
            (TitleVariant::Image | TitleVariant::Profile, TitleSize::Default) => {
                Attrs::new().scale(TextScale::Lg)
            }
            (TitleVariant::Image | TitleVariant::Profile, TitleSize::Compact) => {
                Attrs::new().scale(TextScale::Base)
            }
        })
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Title {
    pub title: String,
    pub emphasis: Option<String>,
    pub subtitle: Option<String>,
    pub image_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub image_alt: Option<String>,
    pub cover_image_alt: Option<String>,
    pub variant: TitleVariant,
    pub size: TitleSize,
    pub image_fill: ImageFill,
    pub truncate: bool,
}

impl Title {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn emphasis(mut self, emphasis: impl Into<String>) -> Self {
        self.emphasis = Some(emphasis.into());
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn cover_image(mut self, url: impl Into<String>) -> Self {
        self.cover_image_url = Some(url.into());
        self
    }

    pub fn image_alt(mut self, alt: impl Into<String>) -> Self {
        self.image_alt = Some(alt.into());
        self
    }

    pub fn variant(mut self, variant: TitleVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn size(mut self, size: TitleSize) -> Self {
        self.size = size;
        self
    }

    pub fn image_fill(mut self, fill: ImageFill) -> Self {
        self.image_fill = fill;
        self
    }

    pub fn truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }

    fn key(&self) -> TitleKey {
        TitleKey {
            variant: self.variant,
            size: self.size,
            image_fill: self.image_fill,
        }
    }

    fn profile_media(&self) -> Media {
        let alt = self.image_alt.as_deref().unwrap_or(&self.title);
        Media::image_or_placeholder(self.image_url.as_deref(), Some(alt))
    }

    fn text_slots(&self, key: &TitleKey, align: Option<TextAlign>) -> Vec<Slot> {
        let aligned = |a: Attrs| match align {
            Some(al) => a.align(al),
            None => a,
        };
        let mut slots = Vec::new();
        if let Some(e) = self.emphasis.as_deref().filter(|e| !e.is_empty()) {
            slots.push(Slot::Text(TextBlock::new(
                e.to_uppercase(),
                aligned(EMPHASIS.resolve(key)),
            )));
        }
        if !self.title.is_empty() {
            slots.push(Slot::Text(
                TextBlock::new(&self.title, aligned(TITLE_TEXT.resolve(key)))
                    .truncate(self.truncate),
            ));
        }
        if let Some(s) = self.subtitle.as_deref().filter(|s| !s.is_empty()) {
            slots.push(Slot::Text(
                TextBlock::new(s, aligned(SUBTITLE_TEXT.resolve(key))).truncate(self.truncate),
            ));
        }
        slots
    }

    /// The resolved view for this title.
    pub fn view(&self) -> ItemView {
        let key = self.key();
        let container = CONTAINER.resolve(&key);
        let image = IMAGE.resolve(&key);
        let content = CONTENT.resolve(&key);

        match self.variant {
            TitleVariant::Simple => {
                let mut view = ItemView::new(container);
                if self.image_url.as_deref().is_some_and(|u| !u.is_empty()) {
                    view = view.media(self.profile_media(), image);
                }
                view.slots = self.text_slots(&key, None);
                view
            }
            TitleVariant::Image => {
                let mut view = ItemView::new(container).media(self.profile_media(), image);
                view.slots = self.text_slots(&key, None);
                view
            }
            TitleVariant::Profile => {
                let mut view = ItemView::new(container).media(self.profile_media(), image);
                view.slots = self.text_slots(&key, container.align);
                view
            }
            TitleVariant::Cover => {
                let cover_alt = self
                    .cover_image_alt
                    .as_deref()
                    .unwrap_or(COVER_ALT_FALLBACK);
                let cover =
                    Media::image_or_placeholder(self.cover_image_url.as_deref(), Some(cover_alt));
                let mut row = ItemView::new(content)
                    .media(self.profile_media(), COVER_PROFILE.resolve(&key));
                row.slots = self.text_slots(&key, None);
                ItemView::new(container)
                    .media(cover, image)
                    .slot(Slot::View(Box::new(row)))
            }
        }
    }

    pub fn height(&self, width: u16) -> u16 {
        self.view().height(width)
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.view().render(area, buf, theme, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::buffer_lines;
    use crate::variant::Variant;

    #[test]
    fn simple_without_image_has_no_media() {
        let view = Title::new("Pricing").view();
        assert!(view.media.is_none());
        assert_eq!(view.slots.len(), 1);
    }

    #[test]
    fn image_and_profile_always_show_media() {
        for v in [TitleVariant::Image, TitleVariant::Profile] {
            let view = Title::new("T").variant(v).view();
            let media = view.media.expect("media slot");
            assert!(media.media.is_placeholder());
        }
    }

    #[test]
    fn cover_paints_cover_and_profile_slots() {
        let view = Title::new("Team")
            .variant(TitleVariant::Cover)
            .cover_image("/cover.png")
            .view();
        let cover = view.media.as_ref().expect("cover");
        assert_eq!(
            cover.media,
            Media::Image {
                src: "/cover.png".to_string(),
                alt: COVER_ALT_FALLBACK.to_string()
            }
        );
        let Some(Slot::View(row)) = view.slots.first() else {
            panic!("expected profile row");
        };
        assert!(row.media.as_ref().is_some_and(|m| m.media.is_placeholder()));
    }

    #[test]
    fn image_alt_falls_back_to_title() {
        let view = Title::new("Docs")
            .variant(TitleVariant::Image)
            .image("/d.png")
            .view();
        assert_eq!(
            view.media.map(|m| m.media),
            Some(Media::Image {
                src: "/d.png".to_string(),
                alt: "Docs".to_string()
            })
        );
    }

    #[test]
    fn compact_compound_overrides_heading_scale() {
        let key = TitleKey {
            variant: TitleVariant::Simple,
            size: TitleSize::Compact,
            ..TitleKey::default()
        };
        assert_eq!(TITLE_TEXT.resolve(&key).scale, Some(TextScale::Lg));
        assert_eq!(
            TITLE_TEXT.resolve(&TitleKey::default()).scale,
            Some(TextScale::X2l)
        );
    }

    #[test]
    fn every_combination_renders() {
        for v in TitleVariant::ALL {
            for s in TitleSize::ALL {
                let t = Title::new("Hello")
                    .emphasis("new")
                    .subtitle("World")
                    .variant(*v)
                    .size(*s);
                let area = Rect::new(0, 0, 60, t.height(60));
                let mut buf = Buffer::empty(area);
                t.render(area, &mut buf, &Theme::default());
                assert!(buffer_lines(&buf).iter().any(|l| l.contains("Hello")), "{v} {s}");
            }
        }
    }

    #[test]
    fn emphasis_is_uppercased_above_title() {
        let t = Title::new("Plans").emphasis("pricing");
        let area = Rect::new(0, 0, 30, t.height(30));
        let mut buf = Buffer::empty(area);
        t.render(area, &mut buf, &Theme::default());
        let lines = buffer_lines(&buf);
        let e = lines.iter().position(|l| l.contains("PRICING"));
        let p = lines.iter().position(|l| l.contains("Plans"));
        assert!(e < p);
    }
}
