//! Parser behaviour tests: block grouping over whole documents.

use pretty_assertions::assert_eq;
use rstest::rstest;
use xi_rope::Rope;

use crate::parsing::{
    blocks::{BlockKind, ParseOptions, kinds::FenceKind},
    invariants, parse, parse_document_with,
};

fn kinds(md: &str) -> Vec<BlockKind> {
    parse(md).into_iter().map(|b| b.kind).collect()
}

fn lines(md: &str) -> Vec<(usize, usize)> {
    parse(md)
        .into_iter()
        .map(|b| (b.start_line, b.end_line))
        .collect()
}

#[rstest]
#[case("")]
#[case("\n")]
#[case("# Title\n\nParagraph\n- a\n- b\n\n> q\n> r\n```\ncode\n```\n---\n")]
#[case("```\nunterminated\n# not a heading")]
#[case("<details>\n<summary>S</summary>\nbody\n</details>\ntext")]
#[case("- [ ] a\n- [x] b\n1. c\n2. d\n* e")]
#[case("\r\nwindows\r\nlines\r\n")]
fn blocks_partition_lines(#[case] md: &str) {
    let rope = Rope::from(md);
    for merge_list_items in [true, false] {
        let doc = parse_document_with(&rope, ParseOptions { merge_list_items });
        invariants::check(&rope, &doc.blocks);
    }
}

#[test]
fn every_kind_is_recognised() {
    let md = "# H1\n###### H6\n---\n> quote\n- [ ] task\n- bullet\n1. ordered\n```\nx\n```\n<details>\n</details>\nplain";
    assert_eq!(
        kinds(md),
        vec![
            BlockKind::Heading { level: 1 },
            BlockKind::Heading { level: 6 },
            BlockKind::Divider,
            BlockKind::Quote,
            BlockKind::TaskList,
            BlockKind::BulletList,
            BlockKind::OrderedList,
            BlockKind::CodeFence {
                kind: FenceKind::Backticks
            },
            BlockKind::Toggle,
            BlockKind::Paragraph,
        ]
    );
}

#[test]
fn consecutive_quote_lines_merge() {
    assert_eq!(lines("> a\n> b\n> c\nafter"), vec![(1, 3), (4, 4)]);
}

#[test]
fn consecutive_list_items_of_same_kind_merge() {
    assert_eq!(lines("- a\n- b\n1. c\n2. d"), vec![(1, 2), (3, 4)]);
}

#[test]
fn list_items_split_when_merging_disabled() {
    let rope = Rope::from("- a\n- b");
    let doc = parse_document_with(
        &rope,
        ParseOptions {
            merge_list_items: false,
        },
    );
    assert_eq!(doc.blocks.len(), 2);
}

#[test]
fn blank_line_breaks_a_run() {
    assert_eq!(
        kinds("- a\n\n- b"),
        vec![
            BlockKind::BulletList,
            BlockKind::Paragraph,
            BlockKind::BulletList
        ]
    );
}

#[test]
fn paragraph_lines_are_separate_blocks() {
    assert_eq!(lines("one\ntwo\nthree"), vec![(1, 1), (2, 2), (3, 3)]);
}

#[test]
fn fence_interior_is_raw() {
    let blocks = parse("```\n# not heading\n- not list\n```\nafter");
    assert_eq!(blocks.len(), 2);
    assert_eq!((blocks[0].start_line, blocks[0].end_line), (1, 4));
}

#[test]
fn unterminated_fence_consumes_rest_of_document() {
    let md = "intro\n~~~\ncode\n\n# still code";
    let blocks = parse(md);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[1].end_line, 5);
    assert_eq!(blocks[1].to, md.len());
}

#[test]
fn mismatched_fence_does_not_close() {
    assert_eq!(lines("```\n~~~\n```"), vec![(1, 3)]);
}

#[test]
fn block_offsets_exclude_trailing_break() {
    let blocks = parse("# Title\nbody\n");
    assert_eq!((blocks[0].from, blocks[0].to), (0, 7));
    assert_eq!((blocks[1].from, blocks[1].to), (8, 12));
    // trailing empty line
    assert_eq!((blocks[2].from, blocks[2].to), (13, 13));
}

#[test]
fn single_line_toggle_closes_itself() {
    assert_eq!(
        lines("<details><summary>a</summary></details>\nafter"),
        vec![(1, 1), (2, 2)]
    );
}
