use std::ops::Range;

use xi_rope::{Delta, RopeInfo, delta::Transformer};

/// Result of applying a transaction.
pub struct Patch {
    /// Ranges in the new document that received inserted text.
    pub changed: Vec<Range<usize>>,
    pub new_selection: Range<usize>,
    pub version: u64,
    /// Whether the document text changed (as opposed to only the selection).
    pub doc_changed: bool,
    pub selection_changed: bool,
    pub(crate) delta: Delta<RopeInfo>,
}

impl Patch {
    /// Maps an offset in the old document to the new one.
    ///
    /// With `after` set, an insertion exactly at `pos` pushes it forward.
    pub fn map_pos(&self, pos: usize, after: bool) -> usize {
        let mut transformer = Transformer::new(&self.delta);
        transformer.transform(pos.min(self.delta.base_len), after)
    }
}
