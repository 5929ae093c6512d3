//! # Live preview
//!
//! Turns the document, the caret and the overlay's block highlights into a
//! sorted, validated [`DecorationSet`]: markdown syntax is hidden everywhere
//! except the construct the caret is in, and styles, line attachments and
//! widgets (checkbox, horizontal rule) are applied.
//!
//! Candidate ranges are sorted and checked before they reach the
//! [`DecorationSetBuilder`]; a range that still breaks the builder's contract
//! is dropped and logged at debug level, so rendering never fails.

pub mod checkbox;
pub mod decoration;
pub mod engine;
pub mod set;

pub use checkbox::toggle_checkbox;
pub use decoration::{Decoration, DecorationKind, LineKind, MarkKind, Priority, WidgetKind};
pub use engine::{BlockHighlights, render, render_text, render_visible};
pub use set::{DecorationError, DecorationSet, DecorationSetBuilder, build_validated};

use crate::view::{ViewPlugin, ViewUpdate};

/// The decoration plugin: re-renders the visible lines on every update.
#[derive(Debug, Default)]
pub struct LivePreview {
    decorations: DecorationSet,
    /// Render only the viewport's lines instead of the whole document.
    pub viewport_only: bool,
}

impl LivePreview {
    pub fn new(viewport_only: bool) -> Self {
        Self {
            decorations: DecorationSet::default(),
            viewport_only,
        }
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }
}

impl ViewPlugin for LivePreview {
    type Effect = std::convert::Infallible;

    fn update(&mut self, update: &ViewUpdate<'_>) -> Vec<Self::Effect> {
        let visible = self.viewport_only.then(|| update.layout.visible_lines());
        self.decorations = render_visible(
            update.doc.lines(),
            update.doc.len(),
            update.doc.caret(),
            &update.highlights,
            visible,
        );
        log::trace!("preview: {} decorations", self.decorations.len());
        Vec::new()
    }

    fn destroy(&mut self) -> Vec<Self::Effect> {
        self.decorations = DecorationSet::default();
        Vec::new()
    }
}
