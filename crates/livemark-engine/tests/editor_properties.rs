//! End-to-end behaviour of the editor layers driven through `LiveEditor`.

use livemark_engine::{
    editing::{Cmd, Document, Transaction},
    geometry::{Band, StaticLayout, ViewportPoint},
    overlay::{BlockOverlay, OverlayEffect, OverlayEvent, OverlayKey, OverlayOptions, edits},
    parsing::{
        blocks::{Block, BlockKind},
        invariants, parse,
    },
    preview::{DecorationKind, LineKind, MarkKind, render_text},
    slash::{SlashEffect, SlashKey, SlashMenu, SlashMenuOptions},
    view::{EditorEffect, EditorOptions, LiveEditor},
};
use pretty_assertions::assert_eq;

fn fixture() -> String {
    std::fs::read_to_string(format!(
        "{}/tests/fixtures/tour.md",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap()
}

fn layout(lines: usize) -> StaticLayout {
    StaticLayout::uniform(lines, 20.0)
        .with_viewport(400.0)
        .with_content_columns(50.0, 600.0, 8.0)
}

fn type_text(editor: &mut LiveEditor, text: &str, layout: &StaticLayout) {
    for ch in text.chars() {
        let at = editor.doc().caret();
        editor
            .apply(
                Cmd::InsertText {
                    at,
                    text: ch.to_string(),
                },
                layout,
            )
            .unwrap();
    }
}

#[test]
fn fixture_blocks_partition_lines() {
    let md = fixture();
    let rope = xi_rope::Rope::from(md.as_str());
    invariants::check(&rope, &parse(&md));
}

#[test]
fn hidden_syntax_never_covers_the_caret() {
    let md = fixture();
    for cursor in (0..=md.len()).filter(|&i| md.is_char_boundary(i)) {
        let set = render_text(&md, cursor);
        for d in set.iter().filter(|d| d.is_replacing()) {
            assert!(
                !(d.from < cursor && cursor < d.to),
                "cursor {cursor} inside {d:?}"
            );
        }
    }
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}

fn hides(text: &str, cursor: usize) -> Vec<(usize, usize)> {
    let mut out: Vec<_> = render_text(text, cursor)
        .iter()
        .filter(|d| d.kind == DecorationKind::Mark(MarkKind::Hide))
        .map(|d| (d.from, d.to))
        .collect();
    out.sort();
    out
}

#[test]
fn markers_reveal_only_the_construct_under_the_caret() {
    let text = "# one **a**\n> two **b**\n# three **c**";
    let line_starts = [0, 12, 24];
    let bolds = [(6, 11), (18, 23), (32, 37)];

    for cursor in 0..=text.len() {
        let caret_line = line_of(text, cursor);
        let mut expected = Vec::new();
        for (i, &start) in line_starts.iter().enumerate() {
            if i + 1 != caret_line {
                expected.push((start, start + 2));
            }
        }
        for &(from, to) in &bolds {
            if !(from <= cursor && cursor <= to) {
                expected.push((from, from + 2));
                expected.push((to - 2, to));
            }
        }
        expected.sort();
        assert_eq!(hides(text, cursor), expected, "cursor {cursor}");
    }
}

fn code_lines_from_blocks(blocks: &[Block]) -> Vec<usize> {
    blocks
        .iter()
        .filter(|b| matches!(b.kind, BlockKind::CodeFence { .. }))
        .flat_map(|b| b.start_line..=b.end_line)
        .collect()
}

fn code_lines_from_decorations(text: &str) -> Vec<usize> {
    render_text(text, 0)
        .iter()
        .filter(|d| d.kind == DecorationKind::Line(LineKind::CodeBlock))
        .map(|d| line_of(text, d.from))
        .collect()
}

#[test]
fn parser_and_preview_agree_on_code_lines() {
    let docs = [
        fixture(),
        "<details>\n```\n</details>\nafter **b**".to_string(),
        "```\n<details>\n```\nx".to_string(),
        "<details>\n<summary>T</summary>\n```rust\nlet a = 1;\n```\n</details>\n```\ncode\n```"
            .to_string(),
        "```\nunterminated\n<details>".to_string(),
        "<details>\n```\nnever closed".to_string(),
        "~~~\n```\n~~~\n".to_string(),
    ];
    for text in &docs {
        assert_eq!(
            code_lines_from_decorations(text),
            code_lines_from_blocks(&parse(text)),
            "{text:?}"
        );
    }
}

#[test]
fn text_after_a_toggle_with_a_fence_keeps_inline_styles() {
    let text = "<details>\n```\n</details>\nafter **b**";
    let b = text.find("b**").unwrap();
    assert!(
        render_text(text, 0)
            .iter()
            .any(|d| d.kind == DecorationKind::Mark(MarkKind::Bold) && d.from == b && d.to == b + 1)
    );
}

#[test]
fn dropping_a_block_between_bands_moves_it_in_front_of_the_next() {
    let layout = StaticLayout::from_bands(vec![
        Band { top: 90.0, bottom: 150.0 },
        Band { top: 160.0, bottom: 220.0 },
        Band { top: 400.0, bottom: 450.0 },
    ])
    .with_viewport(500.0)
    .with_content_columns(50.0, 600.0, 8.0);
    let mut editor = LiveEditor::new("a\nb\nc", EditorOptions::default(), &layout);

    // Hover block 2, press its grip, drag into the gap above block 1.
    for event in [
        OverlayEvent::PointerMove(ViewportPoint::new(45.0, 425.0)),
        OverlayEvent::PointerDown(ViewportPoint::new(45.0, 425.0)),
        OverlayEvent::PointerMove(ViewportPoint::new(45.0, 155.0)),
        OverlayEvent::PointerUp(ViewportPoint::new(45.0, 155.0)),
    ] {
        editor.overlay_event(event, &layout).unwrap();
    }
    assert_eq!(editor.doc().text(), "a\nc\nb");
    assert_eq!(editor.doc().caret(), 2);
}

#[test]
fn bold_markers_hide_only_away_from_the_caret() {
    let text = "a **b** c";
    let hides = |cursor| {
        render_text(text, cursor)
            .iter()
            .filter(|d| d.kind == DecorationKind::Mark(MarkKind::Hide))
            .map(|d| (d.from, d.to))
            .collect::<Vec<_>>()
    };
    assert_eq!(hides(0), vec![(2, 4), (5, 7)]);
    assert_eq!(hides(5), vec![]);

    let bold: Vec<_> = render_text(text, 0)
        .iter()
        .filter(|d| d.kind == DecorationKind::Mark(MarkKind::Bold))
        .map(|d| (d.from, d.to))
        .collect();
    assert_eq!(bold, vec![(4, 5)]);
}

#[test]
fn code_block_content_is_not_styled() {
    let md = fixture();
    let code_at = md.find("**not bold**").unwrap();
    let set = render_text(&md, 0);
    assert!(
        set.in_range(code_at, code_at + 12)
            .all(|d| d.kind != DecorationKind::Mark(MarkKind::Bold))
    );
}

#[test]
fn deleting_first_and_last_of_three_blocks_leaves_the_middle() {
    let doc = Document::new("a\nb\nc");
    let blocks = parse("a\nb\nc");
    let tx = edits::delete_blocks(&doc, &blocks, &[0, 2]).unwrap();
    let mut doc = doc;
    doc.dispatch(tx).unwrap();
    assert_eq!(doc.text(), "b");
}

#[test]
fn drag_selection_over_bands_selects_overlapping_blocks() {
    let layout = StaticLayout::from_bands(vec![
        Band { top: 90.0, bottom: 150.0 },
        Band { top: 160.0, bottom: 220.0 },
        Band { top: 400.0, bottom: 450.0 },
    ])
    .with_viewport(500.0)
    .with_content_columns(50.0, 600.0, 8.0);
    let mut editor = LiveEditor::new("a\nb\nc", EditorOptions::default(), &layout);

    for event in [
        OverlayEvent::PointerDown(ViewportPoint::new(10.0, 100.0)),
        OverlayEvent::PointerMove(ViewportPoint::new(10.0, 300.0)),
        OverlayEvent::PointerUp(ViewportPoint::new(10.0, 300.0)),
    ] {
        editor.overlay_event(event, &layout).unwrap();
    }
    assert_eq!(editor.overlay().selection().as_slice(), &[0, 1]);

    let out = editor
        .overlay_event(OverlayEvent::Key(OverlayKey::Delete), &layout)
        .unwrap();
    assert!(out.consumed);
    assert_eq!(editor.doc().text(), "c");
    assert!(editor.overlay().selection().is_empty());
}

#[test]
fn slash_head_commits_second_heading() {
    let layout = layout(10);
    let mut editor = LiveEditor::new("", EditorOptions::default(), &layout);
    type_text(&mut editor, "/head", &layout);

    let labels: Vec<_> = editor.slash().items().iter().map(|c| c.label).collect();
    assert_eq!(labels, vec!["Heading 1", "Heading 2", "Heading 3"]);

    editor.slash_click(1, &layout).unwrap();
    assert_eq!(editor.doc().text(), "## ");
    assert_eq!(editor.doc().caret(), 3);
}

#[test]
fn slash_menu_closes_when_typing_a_space() {
    let layout = layout(10);
    let mut editor = LiveEditor::new("intro\n", EditorOptions::default(), &layout);
    editor
        .dispatch(Transaction::select(6..6), &layout)
        .unwrap();
    type_text(&mut editor, "/", &layout);
    assert!(editor.slash().is_open());
    type_text(&mut editor, "x ", &layout);
    assert!(!editor.slash().is_open());
    assert_eq!(editor.doc().text(), "intro\n/x ");
}

#[test]
fn escape_closes_menu_and_is_consumed() {
    let layout = layout(10);
    let mut editor = LiveEditor::new("", EditorOptions::default(), &layout);
    type_text(&mut editor, "/", &layout);
    let out = editor.slash_key(SlashKey::Escape, &layout).unwrap();
    assert!(out.consumed);
    assert_eq!(out.effects, vec![EditorEffect::Slash(SlashEffect::Closed)]);
}

#[test]
fn clear_close_and_end_are_idempotent() {
    let mut overlay = BlockOverlay::new(OverlayOptions::default());
    assert_eq!(overlay.clear_selection(), Vec::<OverlayEffect>::new());
    assert_eq!(overlay.clear_selection(), Vec::<OverlayEffect>::new());
    assert_eq!(overlay.end_session(), Vec::<OverlayEffect>::new());
    assert_eq!(overlay.end_session(), Vec::<OverlayEffect>::new());

    let mut menu = SlashMenu::new(SlashMenuOptions::default());
    assert_eq!(menu.close(), vec![]);
    assert_eq!(menu.close(), vec![]);
}

#[test]
fn text_edits_drop_block_selection() {
    let layout = layout(10);
    let mut editor = LiveEditor::new("a\nb", EditorOptions::default(), &layout);
    for event in [
        OverlayEvent::PointerDown(ViewportPoint::new(10.0, 5.0)),
        OverlayEvent::PointerMove(ViewportPoint::new(10.0, 6.0)),
        OverlayEvent::PointerUp(ViewportPoint::new(10.0, 6.0)),
    ] {
        editor.overlay_event(event, &layout).unwrap();
    }
    assert_eq!(editor.overlay().selection().as_slice(), &[0]);
    let effects = editor
        .apply(
            Cmd::InsertText {
                at: 3,
                text: "!".into(),
            },
            &layout,
        )
        .unwrap();
    assert!(editor.overlay().selection().is_empty());
    assert_eq!(
        effects,
        vec![EditorEffect::Overlay(OverlayEffect::HighlightsChanged)]
    );
}

#[test]
fn saved_bytes_match_edits_exactly() {
    let md = fixture();
    let layout = layout(60);
    let mut editor = LiveEditor::new(&md, EditorOptions::default(), &layout);
    let at = md.find("- [ ]").unwrap() + 2;
    editor.click_widget(at + 1, &layout).unwrap();
    let expected = md.replacen("- [ ] write", "- [x] write", 1);
    assert_eq!(editor.doc().to_bytes(), expected.as_bytes());
}
