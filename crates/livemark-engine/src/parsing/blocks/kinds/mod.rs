//! Block kinds own their syntax delimiters; classifier and builder code calls
//! into these types instead of hardcoding `#`, `>` or fences.

pub mod block_quote;
pub mod code_fence;
pub mod heading;
pub mod list;
pub mod paragraph;
pub mod thematic_break;
pub mod toggle;

pub use block_quote::BlockQuote;
pub use code_fence::{CodeFence, FenceKind, FenceSig};
pub use heading::Heading;
pub use list::{ListItem, ListKind, ListLine};
pub use paragraph::Paragraph;
pub use thematic_break::ThematicBreak;
pub use toggle::Toggle;
