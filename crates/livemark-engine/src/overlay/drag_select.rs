use crate::{
    geometry::{DocumentPoint, LayoutQuery, Rect, ScrollOffset, ViewportPoint},
    parsing::blocks::Block,
};

use super::options::OverlayOptions;

/// Identifies one auto-scroll timer. Ticks carrying a stale handle are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AutoScrollHandle(pub u64);

/// State of a margin drag-selection, alive from mouse-down to mouse-up.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSelectionSession {
    pub start: DocumentPoint,
    pub last: ViewportPoint,
    /// Blocks whose band intersects the current drag rectangle.
    pub pending: Vec<usize>,
    pub auto_scroll: AutoScrollHandle,
}

impl DragSelectionSession {
    pub fn new(start: ViewportPoint, scroll: ScrollOffset, auto_scroll: AutoScrollHandle) -> Self {
        Self {
            start: start.to_document(scroll),
            last: start,
            pending: Vec::new(),
            auto_scroll,
        }
    }

    /// Moves the live corner and recomputes the pending set against `scroll`.
    /// Returns whether the pending set changed.
    pub fn update(
        &mut self,
        point: ViewportPoint,
        scroll: ScrollOffset,
        blocks: &[Block],
        layout: &dyn LayoutQuery,
    ) -> bool {
        self.last = point;
        let rect = Rect::from_corners(self.start, point.to_document(scroll));
        let next = blocks_in_rect(blocks, layout, &rect);
        let changed = next != self.pending;
        self.pending = next;
        changed
    }
}

/// Indices of every block whose vertical band overlaps `rect`.
pub fn blocks_in_rect(blocks: &[Block], layout: &dyn LayoutQuery, rect: &Rect) -> Vec<usize> {
    blocks
        .iter()
        .enumerate()
        .filter(|(_, b)| layout.band(b).overlaps(rect))
        .map(|(i, _)| i)
        .collect()
}

/// Scroll delta for one auto-scroll tick with the pointer at viewport `y`.
///
/// Zero outside the edge bands; grows linearly to `max_scroll_speed` at the
/// edge and stays there past it.
pub fn auto_scroll_delta(y: f64, viewport_height: f64, options: &OverlayOptions) -> f64 {
    let threshold = options.edge_threshold;
    if threshold <= 0.0 {
        return 0.0;
    }
    if y < threshold {
        let proximity = ((threshold - y) / threshold).min(1.0);
        -options.max_scroll_speed * proximity
    } else if y > viewport_height - threshold {
        let proximity = ((y - (viewport_height - threshold)) / threshold).min(1.0);
        options.max_scroll_speed * proximity
    } else {
        0.0
    }
}
