use std::ops::Range;

use crate::editing::{Change, Document, EditError, Patch, Transaction};
use crate::parsing::blocks::kinds::{ListItem, ListKind};

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText { at: usize, text: String },
    DeleteRange { range: Range<usize> },
    ReplaceRange { range: Range<usize>, text: String },
    /// Remove the character before `at`.
    DeleteBackward { at: usize },
    /// Remove the character starting at `at`.
    DeleteForward { at: usize },
    /// Break the line at `at`, continuing a list marker when the line has one.
    SplitLine { at: usize },
}

/// Compile a command into a transaction against the current document.
///
/// Commands that have nothing to do (backspace at offset 0) compile to a
/// selection-only transaction.
pub fn compile_command(doc: &Document, cmd: &Cmd) -> Transaction {
    match cmd {
        Cmd::InsertText { at, text } => {
            Transaction::single(Change::insert(*at, text.clone())).with_caret(at + text.len())
        }
        Cmd::DeleteRange { range } => {
            Transaction::single(Change::delete(range.start, range.end)).with_caret(range.start)
        }
        Cmd::ReplaceRange { range, text } => {
            Transaction::single(Change::replace(range.start, range.end, text.clone()))
                .with_caret(range.start + text.len())
        }
        Cmd::DeleteBackward { at } => match prev_char_start(doc, *at) {
            Some(start) => Transaction::single(Change::delete(start, *at)).with_caret(start),
            None => Transaction::select(*at..*at),
        },
        Cmd::DeleteForward { at } => match doc.char_at(*at) {
            Some(ch) => Transaction::single(Change::delete(*at, at + ch.len_utf8())).with_caret(*at),
            None => Transaction::select(*at..*at),
        },
        Cmd::SplitLine { at } => {
            let line = doc.line_at(*at);
            let mut insert = String::from("\n");
            if let Some(item) = ListItem::parse(&line.text) {
                let body_start = item.checkbox.map_or(item.marker.1, |(_, end)| end);
                if line.text[body_start..].trim().is_empty() {
                    // Enter on an empty item ends the list.
                    let from = line.span.start;
                    return Transaction::single(Change::delete(from, line.span.end))
                        .with_caret(from);
                }
                insert.push_str(&continuation_marker(&line.text, &item.kind, item.marker));
            }
            let caret = at + insert.len();
            Transaction::single(Change::insert(*at, insert)).with_caret(caret)
        }
    }
}

fn prev_char_start(doc: &Document, at: usize) -> Option<usize> {
    if at == 0 || at > doc.len() {
        return None;
    }
    let line = doc.line_at(at);
    if at == line.span.start {
        // Join with the previous line by removing its break.
        let prev = doc.line(line.number - 1)?;
        return Some(prev.span.end);
    }
    let local = at.min(line.span.end) - line.span.start;
    let ch = line.text[..local].chars().next_back()?;
    Some(line.span.start + local - ch.len_utf8())
}

/// The marker text a new list line should start with.
fn continuation_marker(text: &str, kind: &ListKind, marker: (usize, usize)) -> String {
    let (start, end) = marker;
    let indent = &text[..start];
    match kind {
        ListKind::Bullet => text[..end].to_string(),
        ListKind::Task { .. } => format!("{}[ ] ", &text[..end]),
        ListKind::Ordered => {
            let digits: String = text[start..end]
                .chars()
                .take_while(char::is_ascii_digit)
                .collect();
            let next = digits.parse::<u64>().map(|n| n + 1).unwrap_or(1);
            format!("{indent}{next}. ")
        }
    }
}

impl Document {
    /// Compile and dispatch a command.
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        let tx = compile_command(self, &cmd);
        self.dispatch(tx)
    }
}
