//! # Inline Parsing
//!
//! Cursor-based inline parsing with explicit raw zones.
//!
//! The parser runs over one line of text at a time and recognises bold,
//! italic, strikethrough, code spans and `[text](url)` links. Code spans are
//! raw zones: `` `**not bold**` `` parses as a single `CodeSpan`. Everything
//! else nests: the inner text of bold, italic, strike and link text is parsed
//! again.
//!
//! ## Modules
//!
//! - **`types`**: `InlineNode` enum
//! - **`kinds`**: inline-specific types with owned delimiters
//! - **`cursor`**: `Cursor` for byte-by-byte parsing with position tracking
//! - **`parser`**: `parse_inline()` main entry point with `try_parse_*` helpers

pub mod cursor;
pub mod kinds;
pub mod parser;
pub mod types;

pub use parser::parse_inline;
pub use types::{EmphasisKind, InlineNode};
