//! Runtime checks for parser correctness, used by tests and debug assertions.

use xi_rope::Rope;

use crate::parsing::{blocks::Block, rope::lines_with_spans};

/// Asserts that `blocks` partition the document's lines and that every
/// block's offsets match its first and last line.
pub fn check(rope: &Rope, blocks: &[Block]) {
    let lines = lines_with_spans(rope);
    assert!(!blocks.is_empty(), "a document always has at least one block");

    let mut expected_line = 1;
    for b in blocks {
        assert_eq!(
            b.start_line, expected_line,
            "gap or overlap before block {b:?}"
        );
        assert!(b.start_line <= b.end_line, "inverted block {b:?}");
        let first = &lines[b.start_line - 1];
        let last = &lines[b.end_line - 1];
        assert_eq!(b.from, first.span.start, "block start offset {b:?}");
        assert_eq!(b.to, last.span.end, "block end offset {b:?}");
        expected_line = b.end_line + 1;
    }
    assert_eq!(
        expected_line - 1,
        lines.len(),
        "blocks do not cover the last line"
    );
}
