//! Blank space between blocks, with optional width breakpoints.
use crate::variant_axis;
use ratatui::layout::Rect;

variant_axis! {
    pub enum SpacerSize default Md {
        Xs => "xs",
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
        X2l => "2xl",
        X3l => "3xl",
    }
}

variant_axis! {
    pub enum SpacerAxis default Both {
        Horizontal => "horizontal",
        Vertical => "vertical",
        Both => "both",
    }
}

/// Minimum widths, in columns, for the `sm`, `md`, `lg` and `xl` overrides.
pub const BREAKPOINTS: [u16; 4] = [40, 80, 100, 120];

impl SpacerSize {
    pub fn rows(self) -> u16 {
        match self {
            SpacerSize::Xs | SpacerSize::Sm => 1,
            SpacerSize::Md => 2,
            SpacerSize::Lg => 3,
            SpacerSize::Xl => 4,
            SpacerSize::X2l => 6,
            SpacerSize::X3l => 8,
        }
    }

    /// Terminal cells are about twice as tall as they are wide.
    pub fn cols(self) -> u16 {
        match self {
            SpacerSize::Xs => 1,
            _ => self.rows() * 2,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Spacer {
    pub size: SpacerSize,
    pub axis: SpacerAxis,
    /// Overrides at the `sm`, `md`, `lg` and `xl` breakpoints.
    pub responsive: [Option<SpacerSize>; 4],
}

impl Spacer {
    pub fn new(size: SpacerSize) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn axis(mut self, axis: SpacerAxis) -> Self {
        self.axis = axis;
        self
    }

    pub fn sm(mut self, size: SpacerSize) -> Self {
        self.responsive[0] = Some(size);
        self
    }

    pub fn md(mut self, size: SpacerSize) -> Self {
        self.responsive[1] = Some(size);
        self
    }

    pub fn lg(mut self, size: SpacerSize) -> Self {
        self.responsive[2] = Some(size);
        self
    }

    pub fn xl(mut self, size: SpacerSize) -> Self {
        self.responsive[3] = Some(size);
        self
    }

    /// Size in effect at `width`: the widest matching override, else the base size.
    pub fn size_at(&self, width: u16) -> SpacerSize {
        BREAKPOINTS
            .iter()
            .zip(self.responsive)
            .filter(|(min, _)| width >= **min)
            .filter_map(|(_, size)| size)
            .last()
            .unwrap_or(self.size)
    }

    /// `(columns, rows)` claimed inside an area `available` columns wide.
    ///
    /// A horizontal spacer spans the full width; a vertical one the full height, reported as
    /// `None` rows.
    pub fn extent(&self, available: u16) -> (u16, Option<u16>) {
        let size = self.size_at(available);
        match self.axis {
            SpacerAxis::Horizontal => (available, Some(size.rows())),
            SpacerAxis::Vertical => (size.cols().min(available), None),
            SpacerAxis::Both => (size.cols().min(available), Some(size.rows())),
        }
    }

    /// Rows consumed in a vertical stack.
    pub fn height(&self, width: u16) -> u16 {
        self.extent(width).1.unwrap_or(0)
    }

    /// Splits `area` into the space taken and what remains below or to the right of it.
    pub fn split(&self, area: Rect) -> (Rect, Rect) {
        let (cols, rows) = self.extent(area.width);
        match rows {
            Some(h) if self.axis != SpacerAxis::Vertical => {
                let h = h.min(area.height);
                (
                    Rect::new(area.x, area.y, cols, h),
                    Rect::new(area.x, area.y + h, area.width, area.height - h),
                )
            }
            _ => (
                Rect::new(area.x, area.y, cols, area.height),
                Rect::new(area.x + cols, area.y, area.width - cols, area.height),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::Variant;

    #[test]
    fn sizes_grow_monotonically() {
        let rows: Vec<u16> = SpacerSize::ALL.iter().map(|s| s.rows()).collect();
        assert!(rows.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(SpacerSize::default(), SpacerSize::Md);
        assert_eq!(SpacerSize::from_name("2xl"), Some(SpacerSize::X2l));
    }

    #[test]
    fn responsive_overrides_pick_the_widest_match() {
        let s = Spacer::new(SpacerSize::Sm).md(SpacerSize::Lg).xl(SpacerSize::X3l);
        assert_eq!(s.size_at(30), SpacerSize::Sm);
        assert_eq!(s.size_at(90), SpacerSize::Lg);
        assert_eq!(s.size_at(130), SpacerSize::X3l);
    }

    #[test]
    fn axis_decides_the_claimed_extent() {
        let area = Rect::new(0, 0, 50, 10);
        let horizontal = Spacer::new(SpacerSize::Md).axis(SpacerAxis::Horizontal);
        assert_eq!(horizontal.split(area).1, Rect::new(0, 2, 50, 8));
        let vertical = Spacer::new(SpacerSize::Md).axis(SpacerAxis::Vertical);
        assert_eq!(vertical.split(area).1, Rect::new(4, 0, 46, 10));
        assert_eq!(vertical.height(50), 0);
        assert_eq!(Spacer::default().extent(50), (4, Some(2)));
    }
}
