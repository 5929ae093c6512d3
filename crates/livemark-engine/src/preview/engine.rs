use std::ops::RangeInclusive;

use crate::parsing::{
    blocks::{
        Block, LineShape, MarkdownLineClassifier,
        kinds::{CodeFence, FenceKind, ListKind, ListLine, Toggle},
    },
    inline::{EmphasisKind, InlineNode, parse_inline},
    rope::{LineRef, Span},
};

use super::{
    decoration::{Decoration, LineKind, MarkKind, WidgetKind},
    set::{DecorationSet, build_validated},
};

/// Block-level highlight state the overlay contributes to a render.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockHighlights<'a> {
    pub blocks: &'a [Block],
    /// Sorted indices of committed selected blocks.
    pub selected: &'a [usize],
    /// Indices of blocks under an in-progress drag selection.
    pub pending: &'a [usize],
}

impl BlockHighlights<'_> {
    fn kinds_for_line(&self, line: usize) -> impl Iterator<Item = LineKind> + '_ {
        let hit = move |indices: &[usize]| {
            indices
                .iter()
                .filter_map(|&i| self.blocks.get(i))
                .any(|b| b.contains_line(line))
        };
        let selected = hit(self.selected).then_some(LineKind::SelectedBlock);
        let pending = hit(self.pending).then_some(LineKind::PendingBlock);
        selected.into_iter().chain(pending)
    }
}

/// Renders live-preview decorations for every line.
pub fn render(
    lines: &[LineRef],
    doc_len: usize,
    cursor: usize,
    highlights: &BlockHighlights<'_>,
) -> DecorationSet {
    render_visible(lines, doc_len, cursor, highlights, None)
}

/// Convenience for one-off renders of plain text.
pub fn render_text(text: &str, cursor: usize) -> DecorationSet {
    let rope = xi_rope::Rope::from(text);
    let lines = crate::parsing::rope::lines_with_spans(&rope);
    render(&lines, text.len(), cursor, &BlockHighlights::default())
}

/// Fence and toggle interiors, tracked the way the block builder does.
#[derive(Debug, Clone, Copy)]
enum RawZone {
    Fence(FenceKind),
    Toggle,
}

impl RawZone {
    /// Advances the zone past `shape`. Returns `Some(is_delimiter)` for
    /// lines that belong to a code block.
    fn step(zone: &mut Option<RawZone>, shape: LineShape) -> Option<bool> {
        match (*zone, shape) {
            (Some(RawZone::Fence(kind)), shape) => {
                let sig = match shape {
                    LineShape::FenceDelimiter(sig) => Some(sig),
                    _ => None,
                };
                let closes = CodeFence::closes(kind, sig);
                if closes {
                    *zone = None;
                }
                Some(closes)
            }
            // Toggle bodies are raw for the parser; a fence inside one opens nothing.
            (Some(RawZone::Toggle), shape) => {
                if matches!(shape, LineShape::ToggleClose) {
                    *zone = None;
                }
                None
            }
            (None, LineShape::FenceDelimiter(sig)) => {
                *zone = Some(RawZone::Fence(CodeFence::kind(sig)));
                Some(true)
            }
            (None, LineShape::ToggleOpen { self_closing: false }) => {
                *zone = Some(RawZone::Toggle);
                None
            }
            (None, _) => None,
        }
    }
}

/// Renders decorations for the lines in `visible` (all lines when `None`).
///
/// Lines outside the range still advance the raw zone state so a fence
/// opened above the viewport is honoured inside it.
pub fn render_visible(
    lines: &[LineRef],
    doc_len: usize,
    cursor: usize,
    highlights: &BlockHighlights<'_>,
    visible: Option<RangeInclusive<usize>>,
) -> DecorationSet {
    let mut out = Vec::new();
    let mut zone: Option<RawZone> = None;

    for line in lines {
        let shown = visible.as_ref().is_none_or(|r| r.contains(&line.number));
        let shape = MarkdownLineClassifier::shape(&line.text);
        let code_line = RawZone::step(&mut zone, shape);

        if !shown {
            continue;
        }
        let on_line = line.span.touches(cursor);
        for kind in highlights.kinds_for_line(line.number) {
            out.push(Decoration::line(line.span.start, kind));
        }

        match code_line {
            Some(is_delimiter) => decorate_code_line(line, is_delimiter, on_line, &mut out),
            None => decorate_line(line, shape, on_line, cursor, &mut out),
        }
    }

    build_validated(out, doc_len)
}

fn decorate_code_line(line: &LineRef, is_delimiter: bool, on_line: bool, out: &mut Vec<Decoration>) {
    let start = line.span.start;
    out.push(Decoration::line(start, LineKind::CodeBlock));
    if !is_delimiter {
        return;
    }
    out.push(Decoration::line(start, LineKind::CodeFenceDelimiter));
    if !on_line && let Some((a, b)) = CodeFence::marker(&line.text) {
        out.push(Decoration::hide(start + a, start + b));
    }
}

fn decorate_line(
    line: &LineRef,
    shape: LineShape,
    on_line: bool,
    cursor: usize,
    out: &mut Vec<Decoration>,
) {
    let start = line.span.start;
    let hide_prefix = |len: usize, out: &mut Vec<Decoration>| {
        if !on_line && len > 0 {
            out.push(Decoration::hide(start, start + len));
        }
    };

    let content_from = match shape {
        LineShape::Blank => return,
        LineShape::Heading { level, marker_len } => {
            out.push(Decoration::line(start, LineKind::Heading(level)));
            hide_prefix(marker_len, out);
            marker_len
        }
        LineShape::ThematicBreak => {
            if !on_line {
                out.push(Decoration::widget(
                    start,
                    line.span.end,
                    WidgetKind::HorizontalRule,
                ));
            }
            return;
        }
        LineShape::Quote { marker_len, .. } => {
            out.push(Decoration::line(start, LineKind::Quote));
            hide_prefix(marker_len, out);
            marker_len
        }
        LineShape::List(item) => decorate_list_item(line, item, on_line, out),
        LineShape::ToggleOpen { .. } | LineShape::ToggleClose => {
            decorate_toggle(line, on_line, out);
            0
        }
        LineShape::Paragraph if Toggle::is_tag_line(&line.text) => {
            decorate_toggle(line, on_line, out);
            0
        }
        LineShape::Paragraph => 0,
        // Only fence lines inside a toggle body get here; they stay raw.
        LineShape::FenceDelimiter(_) => return,
    };

    let Some(content) = line.text.get(content_from..) else {
        return;
    };
    let nodes = parse_inline(start + content_from, content);
    decorate_inline(&nodes, cursor, out);
}

/// Tags a list line and returns where its content starts.
fn decorate_list_item(
    line: &LineRef,
    item: ListLine,
    on_line: bool,
    out: &mut Vec<Decoration>,
) -> usize {
    let start = line.span.start;
    let (marker_start, marker_end) = item.marker;
    match item.kind {
        ListKind::Bullet => {
            out.push(Decoration::line(start, LineKind::BulletItem));
            marker_end
        }
        ListKind::Ordered => {
            out.push(Decoration::line(start, LineKind::OrderedItem));
            marker_end
        }
        ListKind::Task { checked } => {
            out.push(Decoration::line(start, LineKind::TaskItem));
            let Some((box_start, box_end)) = item.checkbox else {
                return marker_end;
            };
            if !on_line {
                out.push(Decoration::hide(start + marker_start, start + marker_end));
                let marker = Span::new(start + box_start, start + box_end);
                out.push(Decoration::widget(
                    marker.start,
                    marker.end,
                    WidgetKind::Checkbox { checked, marker },
                ));
            }
            box_end
        }
    }
}

fn decorate_toggle(line: &LineRef, on_line: bool, out: &mut Vec<Decoration>) {
    let start = line.span.start;
    out.push(Decoration::line(start, LineKind::Toggle));
    if on_line {
        return;
    }
    for (a, b) in Toggle::tag_ranges(&line.text) {
        out.push(Decoration::hide(start + a, start + b));
    }
}

/// Cursor positions at either end of a construct count as inside it.
fn cursor_in_range(cursor: usize, span: Span) -> bool {
    span.touches(cursor)
}

fn decorate_inline(nodes: &[InlineNode], cursor: usize, out: &mut Vec<Decoration>) {
    for node in nodes {
        match node {
            InlineNode::Text(_) => {}
            InlineNode::CodeSpan { full, inner } => {
                if !cursor_in_range(cursor, *full) {
                    hide_around(*full, *inner, out);
                }
                if !inner.is_empty() {
                    out.push(Decoration::mark(inner.start, inner.end, MarkKind::InlineCode));
                }
            }
            InlineNode::Emphasis {
                kind,
                full,
                inner,
                children,
            } => {
                if !cursor_in_range(cursor, *full) {
                    hide_around(*full, *inner, out);
                }
                let style = match kind {
                    EmphasisKind::Bold => MarkKind::Bold,
                    EmphasisKind::Italic => MarkKind::Italic,
                    EmphasisKind::Strike => MarkKind::Strike,
                };
                out.push(Decoration::mark(inner.start, inner.end, style));
                decorate_inline(children, cursor, out);
            }
            InlineNode::Link {
                full,
                text,
                url,
                children,
            } => {
                if cursor_in_range(cursor, *full) {
                    if !url.is_empty() {
                        out.push(Decoration::mark(url.start, url.end, MarkKind::LinkUrl));
                    }
                } else {
                    hide_around(*full, *text, out);
                }
                if !text.is_empty() {
                    out.push(Decoration::mark(text.start, text.end, MarkKind::LinkText));
                }
                decorate_inline(children, cursor, out);
            }
        }
    }
}

/// Hides the parts of `full` before and after `inner`.
fn hide_around(full: Span, inner: Span, out: &mut Vec<Decoration>) {
    if full.start < inner.start {
        out.push(Decoration::hide(full.start, inner.start));
    }
    if inner.end < full.end {
        out.push(Decoration::hide(inner.end, full.end));
    }
}
