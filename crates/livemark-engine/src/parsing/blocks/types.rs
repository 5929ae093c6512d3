use serde::Serialize;

use crate::parsing::rope::span::Span;

use super::kinds::FenceKind;

/// The kind of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BlockKind {
    /// A single paragraph line, or an empty paragraph for a blank line.
    Paragraph,
    /// An ATX heading, level 1 to 6.
    Heading { level: u8 },
    /// One or more consecutive `>` lines.
    Quote,
    /// Consecutive `-`/`*`/`+` items.
    BulletList,
    /// Consecutive `1.` items.
    OrderedList,
    /// Consecutive `- [ ]` / `- [x]` items.
    TaskList,
    /// A fenced code block (``` or ~~~), delimiters included.
    CodeFence { kind: FenceKind },
    /// A horizontal rule.
    Divider,
    /// A `<details>` toggle element.
    Toggle,
}

impl BlockKind {
    /// Whether a block of this kind gets a handle (add button + drag grip).
    pub fn is_handle_eligible(self) -> bool {
        !matches!(self, BlockKind::Divider)
    }

    pub fn is_list(self) -> bool {
        matches!(
            self,
            BlockKind::BulletList | BlockKind::OrderedList | BlockKind::TaskList
        )
    }
}

/// A maximal contiguous line range classified as one markdown construct.
///
/// Blocks are rebuilt from scratch on every document change; their index in
/// the parsed list is only meaningful for the current document snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Block {
    pub kind: BlockKind,
    /// First line, 1-based.
    pub start_line: usize,
    /// Last line, 1-based, inclusive.
    pub end_line: usize,
    /// Byte offset of the first line's start.
    pub from: usize,
    /// Byte offset of the last line's end, excluding its line break.
    pub to: usize,
}

impl Block {
    pub fn span(&self) -> Span {
        Span::new(self.from, self.to)
    }

    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    /// True when `pos` falls on one of the block's lines (line end included).
    pub fn contains_offset(&self, pos: usize) -> bool {
        self.from <= pos && pos <= self.to
    }
}

/// Finds the index of the block that contains `line`.
pub fn block_index_at_line(blocks: &[Block], line: usize) -> Option<usize> {
    blocks.iter().position(|b| b.contains_line(line))
}
