use serde::{Deserialize, Serialize};

use super::{
    classify::{LineClass, LineShape},
    kinds::{CodeFence, FenceKind, ListKind},
    types::{Block, BlockKind},
};

/// Options that change how lines are grouped into blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Merge consecutive list items of the same kind into one block.
    /// When false every list item line is a block of its own. Quotes always merge.
    pub merge_list_items: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            merge_list_items: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Opened {
    start_line: usize,
    from: usize,
    end_line: usize,
    to: usize,
}

#[derive(Debug, Clone, Copy)]
enum LeafState {
    None,
    /// A run of same-kind lines (quotes, list items) that may keep growing.
    Run { kind: BlockKind, at: Opened },
    Fence { kind: FenceKind, at: Opened },
    Toggle { at: Opened },
}

/// Phase 2 of block parsing: groups classified lines into [`Block`]s.
pub struct BlockBuilder {
    options: ParseOptions,
    leaf: LeafState,
    out: Vec<Block>,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self {
            options,
            leaf: LeafState::None,
            out: vec![],
        }
    }

    pub fn push(&mut self, c: &LineClass) {
        if self.consume_raw_line(c) {
            return;
        }

        match c.shape {
            LineShape::Blank => {
                self.flush_run();
                self.emit_single(BlockKind::Paragraph, c);
            }
            LineShape::FenceDelimiter(sig) => {
                self.flush_run();
                self.leaf = LeafState::Fence {
                    kind: CodeFence::kind(sig),
                    at: Self::open(c),
                };
            }
            LineShape::ToggleOpen { self_closing } => {
                self.flush_run();
                if self_closing {
                    self.emit_single(BlockKind::Toggle, c);
                } else {
                    self.leaf = LeafState::Toggle { at: Self::open(c) };
                }
            }
            LineShape::Heading { level, .. } => {
                self.flush_run();
                self.emit_single(BlockKind::Heading { level }, c);
            }
            LineShape::ThematicBreak => {
                self.flush_run();
                self.emit_single(BlockKind::Divider, c);
            }
            LineShape::Quote { .. } => self.extend_run(BlockKind::Quote, c),
            LineShape::List(list) => {
                let kind = match list.kind {
                    ListKind::Bullet => BlockKind::BulletList,
                    ListKind::Ordered => BlockKind::OrderedList,
                    ListKind::Task { .. } => BlockKind::TaskList,
                };
                if self.options.merge_list_items {
                    self.extend_run(kind, c);
                } else {
                    self.flush_run();
                    self.emit_single(kind, c);
                }
            }
            // A stray `</details>` without an opener is plain text.
            LineShape::ToggleClose | LineShape::Paragraph => {
                self.flush_run();
                self.emit_single(BlockKind::Paragraph, c);
            }
        }
    }

    pub fn finish(mut self) -> Vec<Block> {
        // EOF flush; unterminated fences and toggles run to the end.
        self.flush_any();
        self.out
    }

    fn open(c: &LineClass) -> Opened {
        Opened {
            start_line: c.number,
            from: c.line.start,
            end_line: c.number,
            to: c.line.end,
        }
    }

    fn grow(at: Opened, c: &LineClass) -> Opened {
        Opened {
            end_line: c.number,
            to: c.line.end,
            ..at
        }
    }

    /// Fence and toggle interiors are raw: every line joins the open block
    /// until the matching closer.
    fn consume_raw_line(&mut self, c: &LineClass) -> bool {
        match self.leaf {
            LeafState::Fence { kind, at } => {
                let at = Self::grow(at, c);
                let sig = match c.shape {
                    LineShape::FenceDelimiter(sig) => Some(sig),
                    _ => None,
                };
                if CodeFence::closes(kind, sig) {
                    self.push_block(BlockKind::CodeFence { kind }, at);
                    self.leaf = LeafState::None;
                } else {
                    self.leaf = LeafState::Fence { kind, at };
                }
                true
            }
            LeafState::Toggle { at } => {
                let at = Self::grow(at, c);
                if matches!(c.shape, LineShape::ToggleClose) {
                    self.push_block(BlockKind::Toggle, at);
                    self.leaf = LeafState::None;
                } else {
                    self.leaf = LeafState::Toggle { at };
                }
                true
            }
            LeafState::None | LeafState::Run { .. } => false,
        }
    }

    fn extend_run(&mut self, kind: BlockKind, c: &LineClass) {
        match self.leaf {
            LeafState::Run { kind: open, at } if open == kind => {
                self.leaf = LeafState::Run {
                    kind,
                    at: Self::grow(at, c),
                };
            }
            _ => {
                self.flush_run();
                self.leaf = LeafState::Run {
                    kind,
                    at: Self::open(c),
                };
            }
        }
    }

    fn emit_single(&mut self, kind: BlockKind, c: &LineClass) {
        self.push_block(kind, Self::open(c));
    }

    fn flush_run(&mut self) {
        let prev = std::mem::replace(&mut self.leaf, LeafState::None);
        if let LeafState::Run { kind, at } = prev {
            self.push_block(kind, at);
        } else {
            self.leaf = prev; // put back raw leaf (fence, toggle)
        }
    }

    fn flush_any(&mut self) {
        match std::mem::replace(&mut self.leaf, LeafState::None) {
            LeafState::None => {}
            LeafState::Run { kind, at } => self.push_block(kind, at),
            LeafState::Fence { kind, at } => self.push_block(BlockKind::CodeFence { kind }, at),
            LeafState::Toggle { at } => self.push_block(BlockKind::Toggle, at),
        }
    }

    fn push_block(&mut self, kind: BlockKind, at: Opened) {
        self.out.push(Block {
            kind,
            start_line: at.start_line,
            end_line: at.end_line,
            from: at.from,
            to: at.to,
        });
    }
}

impl Default for BlockBuilder {
    fn default() -> Self {
        Self::new()
    }
}
