use std::ops::Range;

/// Errors raised when a transaction cannot be applied to the buffer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("change {from}..{to} is outside the document (length {len})")]
    OutOfBounds { from: usize, to: usize, len: usize },
    #[error("change {from}..{to} is inverted")]
    Inverted { from: usize, to: usize },
    #[error("changes {first:?} and {second:?} overlap")]
    Overlap {
        first: Range<usize>,
        second: Range<usize>,
    },
    #[error("offset {0} is not on a character boundary")]
    NotCharBoundary(usize),
    #[error("document is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// One replacement: the bytes `from..to` of the current document become `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl Change {
    pub fn replace(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    pub fn delete(from: usize, to: usize) -> Self {
        Self::replace(from, to, String::new())
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }
}

/// An atomic batch of changes plus an optional new selection.
///
/// All change offsets refer to the document *before* the transaction, so the
/// order changes are listed in does not matter. The selection, when given, is
/// in the coordinates of the document *after* the transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    pub changes: Vec<Change>,
    pub selection: Option<Range<usize>>,
}

impl Transaction {
    pub fn new(changes: Vec<Change>) -> Self {
        Self {
            changes,
            selection: None,
        }
    }

    pub fn single(change: Change) -> Self {
        Self::new(vec![change])
    }

    /// A selection-only transaction.
    pub fn select(selection: Range<usize>) -> Self {
        Self {
            changes: vec![],
            selection: Some(selection),
        }
    }

    /// Places a collapsed caret at `pos` after the changes apply.
    pub fn with_caret(mut self, pos: usize) -> Self {
        self.selection = Some(pos..pos);
        self
    }

    pub fn changes_document(&self) -> bool {
        self.changes
            .iter()
            .any(|c| c.from != c.to || !c.insert.is_empty())
    }

    /// Returns the changes sorted by position after checking bounds and overlap.
    pub(crate) fn normalized(&self, len: usize) -> Result<Vec<Change>, EditError> {
        let mut changes = self.changes.clone();
        for c in &changes {
            if c.from > c.to {
                return Err(EditError::Inverted {
                    from: c.from,
                    to: c.to,
                });
            }
            if c.to > len {
                return Err(EditError::OutOfBounds {
                    from: c.from,
                    to: c.to,
                    len,
                });
            }
        }
        changes.sort_by_key(|c| (c.from, c.to));
        for pair in changes.windows(2) {
            if pair[0].to > pair[1].from {
                return Err(EditError::Overlap {
                    first: pair[0].range(),
                    second: pair[1].range(),
                });
            }
        }
        Ok(changes)
    }
}
