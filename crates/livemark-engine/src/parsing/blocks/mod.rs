//! # Block Parsing
//!
//! Two-phase, line-oriented block parsing.
//!
//! ## Parsing Phases
//!
//! 1. **Line Classification** (`classify`): each line is classified into a
//!    `LineClass` holding only local facts (fence signature, heading level,
//!    list marker positions, blank status).
//!
//! 2. **Block Construction** (`builder`): a `BlockBuilder` groups classified
//!    lines into `Block`s: fence and toggle interiors are raw zones, quote and
//!    list runs merge, everything else is one block per line.
//!
//! ## Modules
//!
//! - **`types`**: `Block`, `BlockKind`
//! - **`kinds`**: block-specific types owning their delimiters
//! - **`classify`**: `MarkdownLineClassifier` produces `LineClass` for each line
//! - **`builder`**: `BlockBuilder` state machine and `ParseOptions`
//!
//! ## Key Invariants
//!
//! - Blocks partition the document's lines: contiguous, ordered, no gaps
//! - An unterminated fence consumes the rest of the document
//! - `from`/`to` are byte offsets into the rope

pub mod builder;
pub mod classify;
pub mod kinds;
pub mod types;

pub use builder::{BlockBuilder, ParseOptions};
pub use classify::{LineClass, LineShape, MarkdownLineClassifier};
pub use types::{Block, BlockKind, block_index_at_line};
