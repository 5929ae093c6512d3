use std::ops::Range;

use crate::{
    editing::{Change, Document, Transaction},
    parsing::blocks::Block,
};

/// The byte range removed when `block` is deleted: the block plus its
/// trailing line break, or the preceding break when it is the last line.
fn deletion_span(doc: &Document, block: &Block) -> Range<usize> {
    let Some(last) = doc.line(block.end_line) else {
        return block.from..block.to;
    };
    if last.break_len > 0 {
        return block.from..last.end_with_break();
    }
    match doc.line(block.start_line.saturating_sub(1)) {
        Some(prev) if block.start_line > 1 => prev.span.end..block.to,
        _ => block.from..block.to,
    }
}

/// One transaction deleting every block in `indices`.
///
/// Overlapping spans are merged and changes are listed in descending
/// position order. The caret lands where the first deleted block started.
pub fn delete_blocks(doc: &Document, blocks: &[Block], indices: &[usize]) -> Option<Transaction> {
    let mut spans: Vec<Range<usize>> = indices
        .iter()
        .filter_map(|&i| blocks.get(i))
        .map(|b| deletion_span(doc, b))
        .collect();
    if spans.is_empty() {
        return None;
    }
    spans.sort_by_key(|r| r.start);

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start <= last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }

    let caret = merged[0].start;
    let changes = merged
        .into_iter()
        .rev()
        .map(|r| Change::delete(r.start, r.end))
        .collect();
    Some(Transaction::new(changes).with_caret(caret))
}

/// Inserts an empty line after `block` and puts the caret on it.
pub fn insert_line_after(block: &Block) -> Transaction {
    Transaction::single(Change::insert(block.to, "\n")).with_caret(block.to + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::parse;
    use pretty_assertions::assert_eq;

    fn delete(text: &str, indices: &[usize]) -> (String, usize) {
        let mut doc = Document::new(text);
        let blocks = parse(text);
        let tx = delete_blocks(&doc, &blocks, indices).unwrap();
        doc.dispatch(tx).unwrap();
        (doc.text(), doc.caret())
    }

    #[test]
    fn deletes_first_and_last_blocks() {
        assert_eq!(delete("A\nB\nC", &[0, 2]), ("B".to_string(), 0));
    }

    #[test]
    fn deletes_middle_block_with_trailing_break() {
        assert_eq!(delete("A\nB\nC", &[1]), ("A\nC".to_string(), 2));
    }

    #[test]
    fn deletes_adjacent_blocks_as_one_span() {
        assert_eq!(delete("A\nB\nC\nD", &[1, 2]), ("A\nD".to_string(), 2));
    }

    #[test]
    fn deleting_everything_leaves_empty_document() {
        assert_eq!(delete("A\nB", &[0, 1]), (String::new(), 0));
    }

    #[test]
    fn changes_are_descending() {
        let doc = Document::new("A\nB\nC");
        let blocks = parse("A\nB\nC");
        let tx = delete_blocks(&doc, &blocks, &[0, 2]).unwrap();
        let starts: Vec<usize> = tx.changes.iter().map(|c| c.from).collect();
        assert_eq!(starts, vec![3, 0]);
    }

    #[test]
    fn multi_line_block_is_removed_whole() {
        assert_eq!(delete("- a\n- b\nend", &[0]), ("end".to_string(), 0));
    }

    #[test]
    fn insert_after_puts_caret_on_new_line() {
        let mut doc = Document::new("# T\nbody");
        let blocks = parse("# T\nbody");
        doc.dispatch(insert_line_after(&blocks[0])).unwrap();
        assert_eq!(doc.text(), "# T\n\nbody");
        assert_eq!(doc.caret(), 4);
    }
}
