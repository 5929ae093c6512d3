use crate::parsing::rope::span::Span;

use super::{
    cursor::Cursor,
    kinds::{CodeSpan, Emphasis, Link},
    types::{EmphasisKind, InlineNode},
};

/// Parses inline content into a sequence of [`InlineNode`]s.
///
/// # Arguments
/// - `base`: Byte offset in the rope where `s` begins (for absolute span positions)
/// - `s`: The string content to parse (typically one line of a block)
///
/// # Precedence
/// At each position: code span, link, bold / strikethrough, italic. Code spans
/// are raw zones; the inner text of every other construct is parsed again for
/// nested spans.
///
/// # Returns
/// A vector of inline nodes covering the entire input. Text between special
/// constructs is emitted as `InlineNode::Text`.
pub fn parse_inline(base: usize, s: &str) -> Vec<InlineNode> {
    let mut cur = Cursor::new(s, base);
    let mut out = vec![];
    let mut text_start = cur.pos();

    // Helper to flush accumulated text as a Text node
    fn flush_text(out: &mut Vec<InlineNode>, start: usize, end: usize) {
        if end > start {
            out.push(InlineNode::Text(Span { start, end }));
        }
    }

    while !cur.eof() {
        if let Some(node) = try_parse_any(&mut cur) {
            flush_text(&mut out, text_start, node.span().start);
            text_start = node.span().end;
            out.push(node);
            continue;
        }
        cur.bump();
    }

    flush_text(&mut out, text_start, cur.pos());
    out
}

fn try_parse_any(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    if let Some(node) = try_parse_code_span(cur) {
        return Some(node);
    }
    if let Some(node) = try_parse_link(cur) {
        return Some(node);
    }
    if let Some(node) = try_parse_double(cur) {
        return Some(node);
    }
    try_parse_italic(cur)
}

/// Scans forward from local index `from` for the first position accepted by
/// `is_close`, jumping over closed code spans so delimiters inside raw zones
/// never close an outer construct.
fn find_closing(s: &str, from: usize, is_close: impl Fn(usize) -> bool) -> Option<usize> {
    let b = s.as_bytes();
    let mut j = from;
    while j < b.len() {
        if b[j] == CodeSpan::TICK
            && let Some(rel) = b[j + 1..].iter().position(|&c| c == CodeSpan::TICK)
        {
            if rel > 0 && !is_close(j) {
                j += rel + 2;
                continue;
            }
        }
        if is_close(j) {
            return Some(j);
        }
        j += 1;
    }
    None
}

fn is_space(b: Option<u8>) -> bool {
    b.is_none_or(|c| c.is_ascii_whitespace())
}

fn is_word(b: Option<u8>) -> bool {
    b.is_some_and(|c| c.is_ascii_alphanumeric())
}

/// Attempts to parse a code span starting at the current position.
///
/// Returns `None` if not at a backtick, if the span is empty or if it isn't
/// closed. On failure, cursor position is restored.
fn try_parse_code_span(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    if cur.peek() != Some(CodeSpan::TICK) {
        return None;
    }

    let saved = cur.clone();
    let start = cur.pos();
    cur.bump(); // `
    let inner_start = cur.pos();

    while !cur.eof() {
        if cur.peek() == Some(CodeSpan::TICK) {
            break;
        }
        cur.bump();
    }
    let inner_end = cur.pos();

    if cur.peek() != Some(CodeSpan::TICK) || inner_end == inner_start {
        // Not closed (or ``), restore cursor
        *cur = saved;
        return None;
    }
    cur.bump(); // closing `
    let end = cur.pos();

    Some(InlineNode::CodeSpan {
        full: Span { start, end },
        inner: Span {
            start: inner_start,
            end: inner_end,
        },
    })
}

/// Attempts to parse a `[text](url)` link starting at the current position.
fn try_parse_link(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    if cur.peek() != Some(Link::TEXT_OPEN) || cur.prev() == Some(Link::IMAGE_BANG) {
        return None;
    }
    let s = cur.s;
    let b = s.as_bytes();
    let open = cur.i;
    let text_end = find_closing(s, open + 1, |j| b[j] == Link::TEXT_CLOSE)?;
    if text_end == open + 1 || b.get(text_end + 1) != Some(&Link::URL_OPEN) {
        return None;
    }
    let url_start = text_end + 2;
    let url_end = url_start + b[url_start..].iter().position(|&c| c == Link::URL_CLOSE)?;

    let text = Span::new(open + 1, text_end).shift(cur.base);
    let children = parse_inline(text.start, &s[open + 1..text_end]);
    let node = InlineNode::Link {
        full: Span::new(open, url_end + 1).shift(cur.base),
        text,
        url: Span::new(url_start, url_end).shift(cur.base),
        children,
    };
    cur.i = url_end + 1;
    Some(node)
}

/// Attempts to parse `**bold**`, `__bold__` or `~~strike~~`.
fn try_parse_double(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    for (delim, kind) in Emphasis::double_delimiters() {
        if !cur.starts_with(delim.as_bytes()) {
            continue;
        }
        let underscore = delim.as_bytes()[0] == Emphasis::UNDERSCORE;
        if underscore && is_word(cur.prev()) {
            continue;
        }
        let open = cur.i;
        let inner_start = open + delim.len();
        if is_space(cur.peek_at(delim.len())) {
            continue;
        }
        let s = cur.s;
        let b = s.as_bytes();
        let Some(close) = find_closing(s, inner_start + 1, |j| {
            b[j..].starts_with(delim.as_bytes())
                && !b[j - 1].is_ascii_whitespace()
                && !(underscore && is_word(b.get(j + delim.len()).copied()))
        }) else {
            continue;
        };
        return Some(emphasis(cur, kind, open, inner_start, close, delim.len()));
    }
    None
}

/// Attempts to parse `*italic*` / `_italic_`.
///
/// A single delimiter never pairs with a neighbour of the same character, so
/// the halves of `**bold**` are not mistaken for italics.
fn try_parse_italic(cur: &mut Cursor<'_>) -> Option<InlineNode> {
    let c = cur.peek()?;
    if !Emphasis::ITALIC.contains(&c) || cur.prev() == Some(c) || cur.peek_at(1) == Some(c) {
        return None;
    }
    let underscore = c == Emphasis::UNDERSCORE;
    if is_space(cur.peek_at(1)) || (underscore && is_word(cur.prev())) {
        return None;
    }
    let s = cur.s;
    let b = s.as_bytes();
    let open = cur.i;
    let close = find_closing(s, open + 2, |j| {
        b[j] == c
            && b[j - 1] != c
            && b.get(j + 1) != Some(&c)
            && !b[j - 1].is_ascii_whitespace()
            && !(underscore && is_word(b.get(j + 1).copied()))
    })?;
    Some(emphasis(cur, EmphasisKind::Italic, open, open + 1, close, 1))
}

fn emphasis(
    cur: &mut Cursor<'_>,
    kind: EmphasisKind,
    open: usize,
    inner_start: usize,
    close: usize,
    delim_len: usize,
) -> InlineNode {
    let inner = Span::new(inner_start, close).shift(cur.base);
    let children = parse_inline(inner.start, &cur.s[inner_start..close]);
    let node = InlineNode::Emphasis {
        kind,
        full: Span::new(open, close + delim_len).shift(cur.base),
        inner,
        children,
    };
    cur.i = close + delim_len;
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(nodes: &[InlineNode]) -> Vec<&'static str> {
        nodes
            .iter()
            .map(|n| match n {
                InlineNode::Text(_) => "text",
                InlineNode::CodeSpan { .. } => "code",
                InlineNode::Emphasis {
                    kind: EmphasisKind::Bold,
                    ..
                } => "bold",
                InlineNode::Emphasis {
                    kind: EmphasisKind::Italic,
                    ..
                } => "italic",
                InlineNode::Emphasis {
                    kind: EmphasisKind::Strike,
                    ..
                } => "strike",
                InlineNode::Link { .. } => "link",
            })
            .collect()
    }

    #[test]
    fn parse_simple_text() {
        let nodes = parse_inline(0, "hello world");
        assert_eq!(nodes, vec![InlineNode::Text(Span::new(0, 11))]);
    }

    #[test]
    fn parse_bold_between_text() {
        let nodes = parse_inline(0, "a **b** c");
        assert_eq!(kinds(&nodes), vec!["text", "bold", "text"]);
        match &nodes[1] {
            InlineNode::Emphasis { full, inner, .. } => {
                assert_eq!(*full, Span::new(2, 7));
                assert_eq!(*inner, Span::new(4, 5));
            }
            other => panic!("expected bold, got {other:?}"),
        }
    }

    #[test]
    fn spans_are_absolute() {
        let nodes = parse_inline(100, "*x*");
        assert_eq!(nodes[0].span(), Span::new(100, 103));
    }

    #[test]
    fn italic_is_not_bold() {
        assert_eq!(kinds(&parse_inline(0, "*it*")), vec!["italic"]);
        assert_eq!(kinds(&parse_inline(0, "_it_")), vec!["italic"]);
        assert_eq!(kinds(&parse_inline(0, "**b**")), vec!["bold"]);
        assert_eq!(kinds(&parse_inline(0, "__b__")), vec!["bold"]);
    }

    #[test]
    fn nested_italic_inside_bold() {
        let nodes = parse_inline(0, "**a *b* c**");
        assert_eq!(kinds(&nodes), vec!["bold"]);
        match &nodes[0] {
            InlineNode::Emphasis { children, .. } => {
                assert_eq!(kinds(children), vec!["text", "italic", "text"]);
            }
            other => panic!("expected bold, got {other:?}"),
        }
    }

    #[test]
    fn bold_inside_italic() {
        let nodes = parse_inline(0, "*a **b** c*");
        assert_eq!(kinds(&nodes), vec!["italic"]);
    }

    #[test]
    fn strikethrough() {
        assert_eq!(kinds(&parse_inline(0, "~~gone~~ ok")), vec!["strike", "text"]);
    }

    #[test]
    fn link_spans() {
        let nodes = parse_inline(0, "[t](u)");
        assert_eq!(
            nodes,
            vec![InlineNode::Link {
                full: Span::new(0, 6),
                text: Span::new(1, 2),
                url: Span::new(4, 5),
                children: vec![InlineNode::Text(Span::new(1, 2))],
            }]
        );
    }

    #[test]
    fn image_is_not_a_link() {
        assert_eq!(kinds(&parse_inline(0, "![img](x.png)")), vec!["text"]);
    }

    #[test]
    fn bracket_without_url_is_text() {
        assert_eq!(kinds(&parse_inline(0, "[just brackets] here")), vec!["text"]);
    }

    #[test]
    fn code_span_suppresses_emphasis() {
        assert_eq!(kinds(&parse_inline(0, "`**x**`")), vec!["code"]);
    }

    #[test]
    fn delimiter_inside_code_does_not_close_italic() {
        let nodes = parse_inline(0, "*a `*` b*");
        assert_eq!(kinds(&nodes), vec!["italic"]);
        assert_eq!(nodes[0].span(), Span::new(0, 9));
    }

    #[test]
    fn intraword_underscores_are_text() {
        assert_eq!(kinds(&parse_inline(0, "snake_case_name")), vec!["text"]);
    }

    #[test]
    fn spaced_asterisks_are_text() {
        assert_eq!(kinds(&parse_inline(0, "a * b * c")), vec!["text"]);
    }

    #[test]
    fn unclosed_constructs_become_text() {
        assert_eq!(kinds(&parse_inline(0, "*unclosed")), vec!["text"]);
        assert_eq!(kinds(&parse_inline(0, "`unclosed code")), vec!["text"]);
        assert_eq!(kinds(&parse_inline(0, "**nope")), vec!["text"]);
    }

    #[test]
    fn multibyte_text_keeps_boundaries() {
        let nodes = parse_inline(0, "é **ü**");
        assert_eq!(kinds(&nodes), vec!["text", "bold"]);
        assert_eq!(nodes[1].span(), Span::new(3, 9));
    }
}
