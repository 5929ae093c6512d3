use std::borrow::Cow;
use std::ops::Range;

use xi_rope::{Rope, delta::Builder};

use crate::editing::{EditError, Patch, Transaction};
use crate::parsing::rope::{LineRef, Span, lines_with_spans};

/// The in-memory document: an xi-rope buffer, its line index and the selection.
///
/// The buffer is the single source of truth. It is only mutated through
/// [`Document::dispatch`], which applies a whole [`Transaction`] atomically.
#[derive(Clone)]
pub struct Document {
    /// xi-rope buffer containing the entire document as UTF-8 bytes
    pub(crate) buffer: Rope,
    /// Line index rebuilt after every change
    lines: Vec<LineRef>,
    /// Current selection/cursor position as byte offsets in buffer
    pub(crate) selection: Range<usize>,
    /// Version counter incremented on each text change (enables change detection)
    pub(crate) version: u64,
}

impl Document {
    /// Creates a document with the caret at the start.
    pub fn new(text: &str) -> Self {
        let buffer = Rope::from(text);
        let lines = lines_with_spans(&buffer);
        Self {
            buffer,
            lines,
            selection: 0..0,
            version: 0,
        }
    }

    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EditError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Get the current text content
    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn rope(&self) -> &Rope {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn selection(&self) -> Range<usize> {
        self.selection.clone()
    }

    /// The caret is the head (end) of the selection.
    pub fn caret(&self) -> usize {
        self.selection.end
    }

    pub fn has_collapsed_selection(&self) -> bool {
        self.selection.start == self.selection.end
    }

    /// Set the selection range, clamped to the document.
    pub fn set_selection(&mut self, selection: Range<usize>) {
        let len = self.len();
        self.selection = selection.start.min(len)..selection.end.min(len);
    }

    pub fn lines(&self) -> &[LineRef] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the 1-based line `number`.
    pub fn line(&self, number: usize) -> Option<&LineRef> {
        number.checked_sub(1).and_then(|i| self.lines.get(i))
    }

    /// Returns the line containing `offset`. Offsets inside a line break belong
    /// to the line the break ends; offsets past the end clamp to the last line.
    pub fn line_at(&self, offset: usize) -> &LineRef {
        let idx = self
            .lines
            .partition_point(|l| l.span.start <= offset)
            .saturating_sub(1);
        &self.lines[idx]
    }

    /// Slice the buffer, clamping the range to document bounds.
    pub fn slice(&self, range: Range<usize>) -> Cow<'_, str> {
        let len = self.len();
        let start = range.start.min(len);
        let end = range.end.min(len).max(start);
        self.buffer.slice_to_cow(start..end)
    }

    pub fn slice_span(&self, span: Span) -> Cow<'_, str> {
        self.slice(span.start..span.end)
    }

    /// The character starting at `pos`, if any.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        let line = self.line_at(pos);
        if pos < line.span.start || pos > line.end_with_break() {
            return None;
        }
        if pos >= line.span.end {
            return self.slice(pos..line.end_with_break()).chars().next();
        }
        line.text.get(pos - line.span.start..)?.chars().next()
    }

    pub fn is_char_boundary(&self, pos: usize) -> bool {
        if pos > self.len() {
            return false;
        }
        let line = self.line_at(pos);
        if pos >= line.span.end {
            // Line breaks are ASCII.
            return true;
        }
        line.text.is_char_boundary(pos - line.span.start)
    }

    /// Applies a transaction atomically.
    ///
    /// Changes are validated (bounds, overlap, char boundaries) and compiled
    /// into a single xi-rope delta. When the transaction carries no selection
    /// the current selection is mapped through the delta.
    pub fn dispatch(&mut self, tx: Transaction) -> Result<Patch, EditError> {
        let len = self.len();
        let changes = tx.normalized(len)?;
        for c in &changes {
            for pos in [c.from, c.to] {
                if !self.is_char_boundary(pos) {
                    return Err(EditError::NotCharBoundary(pos));
                }
            }
        }

        let mut builder = Builder::new(len);
        let mut changed = Vec::with_capacity(changes.len());
        let mut shift: isize = 0;
        for c in &changes {
            if c.insert.is_empty() {
                if c.from != c.to {
                    builder.delete(c.from..c.to);
                }
            } else {
                builder.replace(c.from..c.to, Rope::from(c.insert.as_str()));
            }
            let new_from = (c.from as isize + shift) as usize;
            changed.push(new_from..new_from + c.insert.len());
            shift += c.insert.len() as isize - (c.to - c.from) as isize;
        }
        let delta = builder.build();

        let doc_changed = tx.changes_document();
        if doc_changed {
            self.buffer = delta.apply(&self.buffer);
            self.lines = lines_with_spans(&self.buffer);
        }

        let old_selection = self.selection.clone();
        let new_selection = match tx.selection {
            Some(sel) => sel,
            None => {
                let mut patch_map = xi_rope::delta::Transformer::new(&delta);
                patch_map.transform(old_selection.start.min(len), true)
                    ..patch_map.transform(old_selection.end.min(len), true)
            }
        };
        self.set_selection(new_selection);
        if doc_changed {
            self.version += 1;
        }

        log::trace!(
            "dispatch v{}: {} change(s), selection {:?}",
            self.version,
            changes.len(),
            self.selection
        );

        Ok(Patch {
            changed,
            new_selection: self.selection.clone(),
            version: self.version,
            doc_changed,
            selection_changed: self.selection != old_selection,
            delta,
        })
    }
}
