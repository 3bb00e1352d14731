//! Page section wrapper: width constraint, vertical rhythm, background and an optional header.
//!
//! A container does not own children. [`Container::render`] paints the chrome and returns the
//! [`ContainerLayout`] the caller draws its content into.
use crate::input::InputEvent;
use crate::theme::Theme;
use crate::title::Title;
use crate::title::TitleSize;
use crate::variant_axis;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;

variant_axis! {
    pub enum ContainerVariant default Default {
        Default => "default",
        Narrow => "narrow",
        FullMobile => "full-mobile",
        Full => "full",
    }
}

variant_axis! {
    pub enum ContainerPadding default Md {
        None => "none",
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
    }
}

variant_axis! {
    pub enum Background default None {
        None => "none",
        Card => "card",
        Accent => "accent",
        Dark => "dark",
        Image => "image",
    }
}

variant_axis! {
    pub enum ColumnSplit default Even {
        Even => "1:1",
        Right => "1:2",
        Left => "2:1",
    }
}

/// Width at which two-column splits sit side by side.
pub const SPLIT_BREAKPOINT: u16 = 80;

impl ContainerVariant {
    /// Maximum content width and horizontal padding at a given available width.
    pub fn bounds(self, width: u16) -> (Option<u16>, u16) {
        let gutter = if width >= 100 { 4 } else { 2 };
        match self {
            ContainerVariant::Default => (Some(120), gutter),
            ContainerVariant::Narrow => (Some(72), 2),
            ContainerVariant::FullMobile if width < SPLIT_BREAKPOINT => (None, 0),
            ContainerVariant::FullMobile => (Some(120), 4),
            ContainerVariant::Full => (None, 0),
        }
    }
}

impl ContainerPadding {
    pub fn rows(self) -> u16 {
        match self {
            ContainerPadding::None => 0,
            ContainerPadding::Sm => 1,
            ContainerPadding::Md => 2,
            ContainerPadding::Lg => 3,
            ContainerPadding::Xl => 4,
        }
    }
}

impl ColumnSplit {
    /// Left share of the width, in thirds.
    fn left_thirds(self) -> u16 {
        match self {
            ColumnSplit::Even => 0,
            ColumnSplit::Right => 1,
            ColumnSplit::Left => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ContainerLayout {
    pub header: Option<Rect>,
    /// Everything below the header.
    pub body: Rect,
    /// Left and right column areas when a split is configured.
    pub columns: Option<(Rect, Rect)>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerAction {
    None,
    Clicked,
}

#[derive(Clone, Debug, Default)]
pub struct Container {
    pub variant: ContainerVariant,
    pub padding: ContainerPadding,
    pub background: Background,
    pub background_image_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub columns: Option<ColumnSplit>,
    pub clickable: bool,
    last_area: Rect,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variant(mut self, variant: ContainerVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn padding(mut self, padding: ContainerPadding) -> Self {
        self.padding = padding;
        self
    }

    pub fn background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    pub fn background_image(mut self, url: impl Into<String>) -> Self {
        self.background = Background::Image;
        self.background_image_url = Some(url.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn columns(mut self, split: ColumnSplit) -> Self {
        self.columns = Some(split);
        self
    }

    pub fn clickable(mut self, clickable: bool) -> Self {
        self.clickable = clickable;
        self
    }

    fn header(&self) -> Option<Title> {
        let has_title = self.title.as_deref().is_some_and(|t| !t.is_empty());
        let has_description = self.description.as_deref().is_some_and(|d| !d.is_empty());
        if !(has_title || has_description) {
            return None;
        }
        let mut title = Title::new(self.title.clone().unwrap_or_default()).size(TitleSize::Compact);
        if let Some(d) = self.description.as_deref().filter(|d| !d.is_empty()) {
            title = title.subtitle(d);
        }
        Some(title)
    }

    /// The content box inside width constraint and padding.
    pub fn content_area(&self, area: Rect) -> Rect {
        let (max, gutter) = self.variant.bounds(area.width);
        let width = area.width.saturating_sub(gutter * 2);
        let width = max.map_or(width, |m| width.min(m));
        let x = area.x + (area.width - width) / 2;
        let pad = self.padding.rows();
        Rect::new(
            x,
            area.y.saturating_add(pad),
            width,
            area.height.saturating_sub(pad * 2),
        )
    }

    pub fn layout(&self, area: Rect) -> ContainerLayout {
        let content = self.content_area(area);
        let mut body = content;
        let mut header = None;
        if let Some(title) = self.header() {
            let h = title.height(content.width).min(content.height);
            header = Some(Rect::new(content.x, content.y, content.width, h));
            let skip = (h + 1).min(content.height);
            body = Rect::new(content.x, content.y + skip, content.width, content.height - skip);
        }
        let columns = self.columns.map(|split| split_columns(body, split));
        ContainerLayout {
            header,
            body,
            columns,
        }
    }

    /// Paints background and header, returning where content goes.
    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) -> ContainerLayout {
        self.last_area = area;
        let bg = match self.background {
            Background::None => None,
            Background::Card => Some(theme.surface_muted),
            Background::Accent => Some(theme.focus),
            Background::Dark => Some(theme.surface_dark),
            Background::Image if self.background_image_url.is_some() => Some(theme.surface_dark),
            Background::Image => None,
        };
        if let Some(style) = bg {
            buf.set_style(area, style);
        }
        let layout = self.layout(area);
        if let (Some(rect), Some(title)) = (layout.header, self.header()) {
            title.render(rect, buf, theme);
        }
        layout
    }

    pub fn handle_event(&self, event: &InputEvent) -> ContainerAction {
        if !self.clickable {
            return ContainerAction::None;
        }
        match event {
            InputEvent::Key(key) if key.is_activate() => ContainerAction::Clicked,
            InputEvent::Mouse(m) if m.is_click() && self.last_area.contains((m.x, m.y).into()) => {
                ContainerAction::Clicked
            }
            _ => ContainerAction::None,
        }
    }
}

fn split_columns(body: Rect, split: ColumnSplit) -> (Rect, Rect) {
    const GAP: u16 = 2;
    if body.width < SPLIT_BREAKPOINT {
        let top = body.height / 2;
        return (
            Rect::new(body.x, body.y, body.width, top),
            Rect::new(body.x, body.y + top, body.width, body.height - top),
        );
    }
    let usable = body.width.saturating_sub(GAP);
    let left = match split.left_thirds() {
        0 => usable / 2,
        n => usable * n / 3,
    };
    (
        Rect::new(body.x, body.y, left, body.height),
        Rect::new(body.x + left + GAP, body.y, usable - left, body.height),
    )
}
