use crate::{
    editing::{Change, Document, Transaction},
    parsing::{blocks::kinds::ListItem, rope::Span},
};

/// Builds the transaction a click on a checkbox widget dispatches: `[ ]`
/// becomes `[x]` and any checked marker becomes `[ ]`.
///
/// Returns `None` when `marker` no longer covers a checkbox, which happens
/// when the click raced an edit.
pub fn toggle_checkbox(doc: &Document, marker: Span) -> Option<Transaction> {
    let current = doc.slice_span(marker);
    let replacement = match current.as_ref() {
        ListItem::UNCHECKED => ListItem::CHECKED,
        "[x]" | "[X]" => ListItem::UNCHECKED,
        _ => return None,
    };
    Some(Transaction::single(Change::replace(
        marker.start,
        marker.end,
        replacement,
    )))
}
