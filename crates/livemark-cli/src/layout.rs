use livemark_engine::geometry::{LayoutQuery, Rect, ScrollOffset, ViewportPoint};
use std::ops::RangeInclusive;

/// Columns left of the text: one free margin column, then `+ ` and `⋮ `.
pub const GUTTER_WIDTH: u16 = 5;
/// Free columns right of the text, for margin drag-selection.
pub const RIGHT_MARGIN: u16 = 2;

/// Terminal geometry: one document line per row, one cell per unit.
#[derive(Debug, Clone)]
pub struct TerminalLayout {
    line_count: usize,
    scroll: ScrollOffset,
    width: u16,
    height: u16,
}

impl TerminalLayout {
    pub fn new(line_count: usize) -> Self {
        Self {
            line_count: line_count.max(1),
            scroll: ScrollOffset::default(),
            width: 80,
            height: 24,
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) -> bool {
        let changed = (width, height) != (self.width, self.height);
        self.width = width;
        self.height = height;
        self.scroll_to(self.scroll);
        changed
    }

    /// Returns whether anything a plugin reads from the layout changed.
    pub fn set_line_count(&mut self, line_count: usize) -> bool {
        let line_count = line_count.max(1);
        let changed = line_count != self.line_count;
        self.line_count = line_count;
        self.scroll_to(self.scroll) || changed
    }

    /// Returns whether the offset moved.
    pub fn scroll_to(&mut self, scroll: ScrollOffset) -> bool {
        let next = ScrollOffset::new(scroll.top.clamp(0.0, self.max_scroll()).round());
        let changed = next != self.scroll;
        self.scroll = next;
        changed
    }

    pub fn scroll_by(&mut self, rows: f64) -> bool {
        self.scroll_to(self.scroll.scrolled_by(rows, self.max_scroll()))
    }

    /// Scrolls the least amount that brings `line` on screen.
    pub fn ensure_visible(&mut self, line: usize) -> bool {
        let row = line.saturating_sub(1) as f64;
        let top = self.scroll.top;
        let height = f64::from(self.height);
        if row < top {
            self.scroll_to(ScrollOffset::new(row))
        } else if row >= top + height {
            self.scroll_to(ScrollOffset::new(row - height + 1.0))
        } else {
            false
        }
    }

    pub fn first_row_line(&self) -> usize {
        self.scroll.top as usize + 1
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn text_width(&self) -> u16 {
        self.width.saturating_sub(GUTTER_WIDTH + RIGHT_MARGIN)
    }
}

impl LayoutQuery for TerminalLayout {
    fn line_top(&self, line: usize) -> f64 {
        line.saturating_sub(1) as f64
    }

    fn line_height(&self, _line: usize) -> f64 {
        1.0
    }

    fn scroll(&self) -> ScrollOffset {
        self.scroll
    }

    fn max_scroll(&self) -> f64 {
        (self.line_count as f64 - f64::from(self.height)).max(0.0)
    }

    fn viewport_height(&self) -> f64 {
        f64::from(self.height)
    }

    fn content_box(&self) -> Rect {
        Rect::new(
            f64::from(GUTTER_WIDTH),
            0.0,
            f64::from(self.width.saturating_sub(RIGHT_MARGIN)),
            self.line_count as f64,
        )
    }

    fn visible_lines(&self) -> RangeInclusive<usize> {
        let first = self.first_row_line();
        let last = (first + usize::from(self.height)).saturating_sub(1).min(self.line_count);
        first..=last
    }

    fn coords_at(&self, line: usize, column: usize) -> ViewportPoint {
        ViewportPoint::new(
            f64::from(GUTTER_WIDTH) + column as f64,
            self.line_top(line) - self.scroll.top,
        )
    }
}
