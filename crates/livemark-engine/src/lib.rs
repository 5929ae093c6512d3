pub mod editing;
pub mod geometry;
pub mod overlay;
pub mod parsing;
pub mod preview;
pub mod slash;
pub mod view;

// Re-export key types for easier usage
pub use editing::{Change, Cmd, Document, EditError, Patch, Transaction};
pub use geometry::{DocumentPoint, LayoutQuery, Rect, ScrollOffset, StaticLayout, ViewportPoint};
pub use parsing::{
    blocks::{Block, BlockKind, ParseOptions},
    parse,
};
pub use preview::{Decoration, DecorationKind, DecorationSet, LivePreview};
pub use view::{EditorEffect, EditorOptions, EditorOutcome, LiveEditor, ViewPlugin, ViewUpdate};
