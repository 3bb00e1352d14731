//! Variant resolution.
//!
//! Every component exposes a handful of named option axes (visual variant, size, direction, ...).
//! A [`Recipe`] maps each axis value to partial presentation [`Attrs`], then applies compound
//! rules that match on combinations of axes. Later layers win field by field, so a compound rule
//! can override a single attribute without restating the rest.
//!
//! Per-item overrides follow one precedence everywhere: the item's own value, then the value the
//! collection was configured with, then the axis default. See [`pick`].
use crate::wrapping::Clamp;
use ratatui::layout::Alignment;
use ratatui::style::Color;
use ratatui::style::Modifier;
use ratatui::style::Style;
use ratatui::widgets::Padding;
use std::fmt;

/// A closed set of named options on one axis.
pub trait Variant: Copy + Eq + Default + fmt::Debug + 'static {
    /// Every value, in declaration order.
    const ALL: &'static [Self];

    /// The stable lowercase name of this value.
    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }
}

/// Returned when parsing an unknown variant name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown {axis} variant '{name}'")]
pub struct UnknownVariant {
    pub axis: &'static str,
    pub name: String,
}

/// Declares a [`Variant`] enum.
///
/// ```
/// glide_ui_core::variant_axis! {
///     /// Card size.
///     pub enum Size default Md {
///         Sm => "sm",
///         Md => "md",
///         Lg => "lg",
///     }
/// }
///
/// use glide_ui_core::variant::Variant;
/// assert_eq!(Size::default(), Size::Md);
/// assert_eq!(Size::from_name("lg"), Some(Size::Lg));
/// assert_eq!(Size::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! variant_axis {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident default $default:ident {
            $($(#[$vmeta:meta])* $variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl ::std::default::Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl $crate::variant::Variant for $name {
            const ALL: &'static [Self] = &[$(Self::$variant),+];

            fn name(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::variant::Variant::name(*self))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::variant::UnknownVariant;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <Self as $crate::variant::Variant>::from_name(s).ok_or_else(|| {
                    $crate::variant::UnknownVariant {
                        axis: stringify!($name),
                        name: s.to_string(),
                    }
                })
            }
        }
    };
}

variant_axis! {
    /// Type scale token.
    pub enum TextScale default Base {
        Xs => "xs",
        Sm => "sm",
        Base => "base",
        Lg => "lg",
        Xl => "xl",
        X2l => "2xl",
        X3l => "3xl",
        X4l => "4xl",
    }
}

variant_axis! {
    /// Semantic color token.
    pub enum Tone default Default {
        Default => "default",
        Muted => "muted",
        Primary => "primary",
        Destructive => "destructive",
        Success => "success",
        Warning => "warning",
    }
}

variant_axis! {
    pub enum Size default Md {
        Xs => "xs",
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
    }
}

variant_axis! {
    pub enum Direction default Vertical {
        Vertical => "vertical",
        Horizontal => "horizontal",
    }
}

variant_axis! {
    pub enum TextAlign default Left {
        Left => "left",
        Center => "center",
        Right => "right",
    }
}

impl From<TextAlign> for Alignment {
    fn from(a: TextAlign) -> Self {
        match a {
            TextAlign::Left => Alignment::Left,
            TextAlign::Center => Alignment::Center,
            TextAlign::Right => Alignment::Right,
        }
    }
}

/// Frame drawn around a resolved element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Border {
    #[default]
    None,
    Plain,
    Rounded,
    Thick,
}

/// Partial presentation attributes.
///
/// `None` fields are unset and leave earlier layers untouched when merged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attrs {
    pub style: Style,
    pub scale: Option<TextScale>,
    pub tone: Option<Tone>,
    pub border: Option<Border>,
    pub padding: Option<Padding>,
    pub gap: Option<u16>,
    pub width: Option<u16>,
    pub height: Option<u16>,
    pub min_height: Option<u16>,
    pub align: Option<TextAlign>,
    pub direction: Option<Direction>,
    pub columns: Option<u16>,
    pub clamp: Option<Clamp>,
}

impl Attrs {
    pub const fn new() -> Self {
        Self {
            style: Style::new(),
            scale: None,
            tone: None,
            border: None,
            padding: None,
            gap: None,
            width: None,
            height: None,
            min_height: None,
            align: None,
            direction: None,
            columns: None,
            clamp: None,
        }
    }

    /// Layers `other` on top of `self`. Set fields in `other` win.
    pub fn merge(self, other: Attrs) -> Attrs {
        Attrs {
            style: self.style.patch(other.style),
            scale: other.scale.or(self.scale),
            tone: other.tone.or(self.tone),
            border: other.border.or(self.border),
            padding: other.padding.or(self.padding),
            gap: other.gap.or(self.gap),
            width: other.width.or(self.width),
            height: other.height.or(self.height),
            min_height: other.min_height.or(self.min_height),
            align: other.align.or(self.align),
            direction: other.direction.or(self.direction),
            columns: other.columns.or(self.columns),
            clamp: other.clamp.or(self.clamp),
        }
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.style = self.style.fg(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.style = self.style.bg(color);
        self
    }

    pub fn modifier(mut self, m: Modifier) -> Self {
        self.style = self.style.add_modifier(m);
        self
    }

    pub fn scale(mut self, scale: TextScale) -> Self {
        self.scale = Some(scale);
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn border(mut self, border: Border) -> Self {
        self.border = Some(border);
        self
    }

    pub fn padding(mut self, padding: Padding) -> Self {
        self.padding = Some(padding);
        self
    }

    pub fn gap(mut self, gap: u16) -> Self {
        self.gap = Some(gap);
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u16) -> Self {
        self.height = Some(height);
        self
    }

    pub fn min_height(mut self, h: u16) -> Self {
        self.min_height = Some(h);
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = Some(align);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn columns(mut self, columns: u16) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn clamp(mut self, clamp: Clamp) -> Self {
        self.clamp = Some(clamp);
        self
    }

    /// The terminal style for text painted with these attributes.
    pub fn text_style(&self, theme: &crate::theme::Theme) -> Style {
        theme
            .tone_style(self.tone.unwrap_or_default())
            .patch(theme.scale_style(self.scale.unwrap_or_default()))
            .patch(self.style)
    }

    pub fn alignment(&self) -> Alignment {
        self.align.unwrap_or_default().into()
    }

    pub fn padding_or_zero(&self) -> Padding {
        self.padding.unwrap_or(Padding::ZERO)
    }

    /// Horizontal plus vertical space consumed by border and padding.
    pub fn chrome(&self) -> (u16, u16) {
        let p = self.padding_or_zero();
        let b = if matches!(self.border.unwrap_or_default(), Border::None) {
            0
        } else {
            2
        };
        (p.left + p.right + b, p.top + p.bottom + b)
    }
}

/// Compound rule: attributes applied when a predicate over the whole key holds.
pub struct Compound<K> {
    pub when: fn(&K) -> bool,
    pub attrs: Attrs,
}

/// Maps a component's option key `K` to resolved [`Attrs`].
///
/// Layers apply in order: base, then each axis in registration order, then each matching
/// compound rule in registration order.
pub struct Recipe<K> {
    base: Attrs,
    axes: Vec<fn(&K) -> Attrs>,
    compounds: Vec<Compound<K>>,
}

impl<K> Recipe<K> {
    pub fn new(base: Attrs) -> Self {
        Self {
            base,
            axes: Vec::new(),
            compounds: Vec::new(),
        }
    }

    pub fn axis(mut self, f: fn(&K) -> Attrs) -> Self {
        self.axes.push(f);
        self
    }

    pub fn compound(mut self, when: fn(&K) -> bool, attrs: Attrs) -> Self {
        self.compounds.push(Compound { when, attrs });
        self
    }

    pub fn resolve(&self, key: &K) -> Attrs {
        let mut out = self.base;
        for axis in &self.axes {
            out = out.merge(axis(key));
        }
        for c in &self.compounds {
            if (c.when)(key) {
                out = out.merge(c.attrs);
            }
        }
        out
    }
}

/// Item value, else collection value, else the axis default.
pub fn pick<T: Default>(item: Option<T>, collection: Option<T>) -> T {
    item.or(collection).unwrap_or_default()
}

/// Every value of the cartesian product of two axes.
pub fn combinations<A: Variant, B: Variant>() -> impl Iterator<Item = (A, B)> {
    A::ALL
        .iter()
        .flat_map(|a| B::ALL.iter().map(move |b| (*a, *b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Key {
        size: Size,
        direction: Direction,
    }

    fn recipe() -> Recipe<Key> {
        Recipe::<Key>::new(Attrs::new().gap(1).border(Border::Rounded))
            .axis(|k| match k.size {
                Size::Xs | Size::Sm => Attrs::new().gap(0),
                Size::Md => Attrs::new(),
                Size::Lg | Size::Xl => Attrs::new().gap(2).scale(TextScale::Lg),
            })
            .axis(|k| Attrs::new().direction(k.direction))
            .compound(
                |k| k.size == Size::Xl && k.direction == Direction::Horizontal,
                Attrs::new().gap(4),
            )
    }

    #[test]
    fn later_layers_win_field_by_field() {
        let r = recipe();
        let a = r.resolve(&Key {
            size: Size::Lg,
            direction: Direction::Vertical,
        });
        assert_eq!(a.gap, Some(2));
        assert_eq!(a.border, Some(Border::Rounded));
        assert_eq!(a.scale, Some(TextScale::Lg));
    }

    #[test]
    fn compound_rule_applies_only_to_matching_combination() {
        let r = recipe();
        let hit = r.resolve(&Key {
            size: Size::Xl,
            direction: Direction::Horizontal,
        });
        let miss = r.resolve(&Key {
            size: Size::Xl,
            direction: Direction::Vertical,
        });
        assert_eq!(hit.gap, Some(4));
        assert_eq!(miss.gap, Some(2));
    }

    #[test]
    fn defaults_resolve_without_options() {
        let a = recipe().resolve(&Key::default());
        assert_eq!(a.gap, Some(1));
        assert_eq!(a.direction, Some(Direction::Vertical));
    }

    #[test]
    fn pick_prefers_item_then_collection() {
        assert_eq!(pick(Some(Size::Sm), Some(Size::Lg)), Size::Sm);
        assert_eq!(pick(None, Some(Size::Lg)), Size::Lg);
        assert_eq!(pick::<Size>(None, None), Size::Md);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for s in Size::ALL {
            assert_eq!(s.name().parse::<Size>(), Ok(*s));
        }
        assert_eq!(TextScale::X2l.to_string(), "2xl");
        let err = "huge".parse::<Size>().unwrap_err();
        assert_eq!(err.to_string(), "unknown Size variant 'huge'");
    }

    #[test]
    fn style_patches_accumulate() {
        let a = Attrs::new()
            .fg(Color::Red)
            .merge(Attrs::new().modifier(Modifier::BOLD));
        assert_eq!(a.style.fg, Some(Color::Red));
        assert!(a.style.add_modifier.contains(Modifier::BOLD));
    }
}
