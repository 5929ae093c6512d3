//! Coordinate spaces and layout queries.
//!
//! Pointer events arrive in viewport coordinates; block bands live in document
//! coordinates (y measured from the top of the content, independent of scroll).
//! The two are only ever converted through a [`ScrollOffset`], so every
//! mixed-space computation goes through one of the functions here.

use std::ops::RangeInclusive;

use crate::parsing::blocks::Block;

/// A point relative to the visible viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportPoint {
    pub x: f64,
    pub y: f64,
}

/// A point relative to the top of the scrolled content.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DocumentPoint {
    pub x: f64,
    pub y: f64,
}

/// Vertical scroll position of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollOffset {
    pub top: f64,
}

impl ViewportPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_document(self, scroll: ScrollOffset) -> DocumentPoint {
        DocumentPoint {
            x: self.x,
            y: self.y + scroll.top,
        }
    }
}

impl DocumentPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_viewport(self, scroll: ScrollOffset) -> ViewportPoint {
        ViewportPoint {
            x: self.x,
            y: self.y - scroll.top,
        }
    }
}

impl ScrollOffset {
    pub fn new(top: f64) -> Self {
        Self { top }
    }

    /// Scroll by `dy`, clamped to `0..=max`.
    pub fn scrolled_by(self, dy: f64, max: f64) -> Self {
        Self {
            top: (self.top + dy).clamp(0.0, max.max(0.0)),
        }
    }
}

/// An axis-aligned rectangle. Which coordinate space it lives in is up to the
/// caller; constructors never mix spaces.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// The rectangle spanned by two document points, in either order.
    pub fn from_corners(a: DocumentPoint, b: DocumentPoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.left <= x && x <= self.right && self.top <= y && y <= self.bottom
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// The vertical extent of a block in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub top: f64,
    pub bottom: f64,
}

impl Band {
    pub fn contains(&self, y: f64) -> bool {
        self.top <= y && y <= self.bottom
    }

    /// Inclusive overlap with the vertical span of `rect`.
    pub fn overlaps(&self, rect: &Rect) -> bool {
        self.top <= rect.bottom && rect.top <= self.bottom
    }

    pub fn center(&self) -> f64 {
        (self.top + self.bottom) / 2.0
    }
}

/// Geometry the host surface exposes to the overlay and the slash menu.
///
/// Line numbers are 1-based. Line tops are in document coordinates.
pub trait LayoutQuery {
    fn line_top(&self, line: usize) -> f64;
    fn line_height(&self, line: usize) -> f64;
    fn scroll(&self) -> ScrollOffset;
    fn max_scroll(&self) -> f64;
    fn viewport_height(&self) -> f64;
    /// Horizontal extent of the text column (viewport x) and the vertical
    /// extent of the content (document y).
    fn content_box(&self) -> Rect;
    /// Lines at least partly inside the viewport.
    fn visible_lines(&self) -> RangeInclusive<usize>;
    /// Viewport position of the character at `column` (in chars) on `line`.
    fn coords_at(&self, line: usize, column: usize) -> ViewportPoint;

    fn band(&self, block: &Block) -> Band {
        Band {
            top: self.line_top(block.start_line),
            bottom: self.line_top(block.end_line) + self.line_height(block.end_line),
        }
    }

    /// Vertical centre of a line, in viewport coordinates.
    fn line_center(&self, line: usize) -> f64 {
        self.line_top(line) + self.line_height(line) / 2.0 - self.scroll().top
    }

    fn is_line_visible(&self, line: usize) -> bool {
        self.visible_lines().contains(&line)
    }
}

/// A layout with an explicit top and height per line.
///
/// Backs benches, tests and hosts that measure every line up front.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticLayout {
    lines: Vec<Band>,
    scroll: ScrollOffset,
    viewport_height: f64,
    content_left: f64,
    content_right: f64,
    char_width: f64,
}

impl StaticLayout {
    /// `line_count` lines of equal height stacked from y = 0.
    pub fn uniform(line_count: usize, line_height: f64) -> Self {
        let lines = (0..line_count.max(1))
            .map(|i| Band {
                top: i as f64 * line_height,
                bottom: (i + 1) as f64 * line_height,
            })
            .collect();
        Self::from_bands(lines)
    }

    /// One band per line, in line order.
    pub fn from_bands(lines: Vec<Band>) -> Self {
        Self {
            lines,
            scroll: ScrollOffset::default(),
            viewport_height: 0.0,
            content_left: 0.0,
            content_right: 0.0,
            char_width: 1.0,
        }
    }

    pub fn with_viewport(mut self, height: f64) -> Self {
        self.viewport_height = height;
        self
    }

    pub fn with_content_columns(mut self, left: f64, right: f64, char_width: f64) -> Self {
        self.content_left = left;
        self.content_right = right;
        self.char_width = char_width;
        self
    }

    pub fn set_scroll(&mut self, scroll: ScrollOffset) {
        self.scroll = ScrollOffset::new(scroll.top.clamp(0.0, self.max_scroll()));
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
        self.set_scroll(self.scroll);
    }

    fn content_height(&self) -> f64 {
        self.lines.last().map_or(0.0, |b| b.bottom)
    }

    fn band_of(&self, line: usize) -> Band {
        let idx = line.saturating_sub(1).min(self.lines.len().saturating_sub(1));
        self.lines.get(idx).copied().unwrap_or(Band {
            top: 0.0,
            bottom: 0.0,
        })
    }
}

impl LayoutQuery for StaticLayout {
    fn line_top(&self, line: usize) -> f64 {
        self.band_of(line).top
    }

    fn line_height(&self, line: usize) -> f64 {
        let band = self.band_of(line);
        band.bottom - band.top
    }

    fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    fn max_scroll(&self) -> f64 {
        (self.content_height() - self.viewport_height).max(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn content_box(&self) -> Rect {
        Rect::new(
            self.content_left,
            0.0,
            self.content_right,
            self.content_height(),
        )
    }

    fn visible_lines(&self) -> RangeInclusive<usize> {
        let top = self.scroll.top;
        let bottom = top + self.viewport_height;
        let first = self.lines.partition_point(|b| b.bottom <= top);
        let end = self.lines.partition_point(|b| b.top < bottom);
        if end <= first {
            // Nothing visible: an empty inclusive range.
            return 1..=0;
        }
        (first + 1)..=end
    }

    fn coords_at(&self, line: usize, column: usize) -> ViewportPoint {
        ViewportPoint {
            x: self.content_left + column as f64 * self.char_width,
            y: self.line_top(line) - self.scroll.top,
        }
    }
}
