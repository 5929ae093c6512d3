use crate::{
    geometry::{LayoutQuery, Rect, ViewportPoint},
    parsing::blocks::Block,
};

use super::options::OverlayOptions;

/// The parts of a handle, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlePart {
    /// The handle's own strip; a click selects the block.
    Body,
    /// Inserts an empty line after the block.
    AddButton,
    /// Drags the block on press-and-move. A bare click does nothing.
    Grip,
}

/// A block handle, anchored at the vertical centre of the block's first line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    pub block_index: usize,
    pub line: usize,
    /// Viewport y of the anchor.
    pub anchor_y: f64,
}

/// Outcome of a render pass, by block index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandleReconcile {
    pub added: Vec<usize>,
    pub kept: Vec<usize>,
    pub removed: Vec<usize>,
}

/// Handles for every eligible block whose first line is visible.
#[derive(Debug, Clone, Default)]
pub struct HandleSet {
    handles: Vec<Handle>,
}

impl HandleSet {
    /// Recomputes the handle list, reusing handles whose block index survives.
    pub fn reconcile(&mut self, blocks: &[Block], layout: &dyn LayoutQuery) -> HandleReconcile {
        let visible = layout.visible_lines();
        let next: Vec<Handle> = blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.kind.is_handle_eligible() && visible.contains(&b.start_line))
            .map(|(i, b)| Handle {
                block_index: i,
                line: b.start_line,
                anchor_y: layout.line_center(b.start_line),
            })
            .collect();

        let mut out = HandleReconcile::default();
        for h in &next {
            if self.get(h.block_index).is_some() {
                out.kept.push(h.block_index);
            } else {
                out.added.push(h.block_index);
            }
        }
        for h in &self.handles {
            if !next.iter().any(|n| n.block_index == h.block_index) {
                out.removed.push(h.block_index);
            }
        }
        self.handles = next;
        out
    }

    pub fn get(&self, block_index: usize) -> Option<&Handle> {
        self.handles
            .binary_search_by_key(&block_index, |h| h.block_index)
            .ok()
            .map(|i| &self.handles[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Handle> {
        self.handles.iter()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }

    /// Viewport rectangle of one part of a handle.
    pub fn part_rect(
        handle: &Handle,
        part: HandlePart,
        layout: &dyn LayoutQuery,
        options: &OverlayOptions,
    ) -> Rect {
        let content = layout.content_box();
        let w = options.handle_width;
        let (left, right) = match part {
            HandlePart::Body => (content.left - 2.5 * w, content.left - 2.0 * w),
            HandlePart::AddButton => (content.left - 2.0 * w, content.left - w),
            HandlePart::Grip => (content.left - w, content.left),
        };
        let half = options.handle_height / 2.0;
        Rect::new(left, handle.anchor_y - half, right, handle.anchor_y + half)
    }

    /// Finds the shown handle part under `point`.
    pub fn hit(
        &self,
        point: ViewportPoint,
        shown: impl Fn(usize) -> bool,
        layout: &dyn LayoutQuery,
        options: &OverlayOptions,
    ) -> Option<(usize, HandlePart)> {
        self.handles
            .iter()
            .filter(|h| shown(h.block_index))
            .find_map(|h| {
                [HandlePart::Body, HandlePart::AddButton, HandlePart::Grip]
                    .into_iter()
                    .find(|&part| {
                        Self::part_rect(h, part, layout, options).contains(point.x, point.y)
                    })
                    .map(|part| (h.block_index, part))
            })
    }
}
