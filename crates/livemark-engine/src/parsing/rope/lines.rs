use xi_rope::Rope;

use super::span::Span;

/// A reference to a single line in the rope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRef {
    /// 1-based line number.
    pub number: usize,
    /// Byte span of the line content, excluding the line break.
    pub span: Span,
    /// Length of the trailing line break (0 for the last line, 1 for `\n`, 2 for `\r\n`).
    pub break_len: usize,
    /// The line text without its line break.
    pub text: String,
}

impl LineRef {
    /// Offset just past the line break.
    pub fn end_with_break(&self) -> usize {
        self.span.end + self.break_len
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Returns every line of the rope with its byte span.
///
/// A document ending in a line break has a final empty line, and an empty
/// document has exactly one empty line, matching how an editor counts lines.
pub fn lines_with_spans(rope: &Rope) -> Vec<LineRef> {
    let mut out = Vec::new();
    let mut offset = 0usize;
    let mut ends_with_break = true;

    for raw in rope.lines_raw(..) {
        let start = offset;
        offset += raw.len();

        let without_lf = raw.strip_suffix('\n');
        ends_with_break = without_lf.is_some();
        let content = without_lf.unwrap_or(raw.as_ref());
        let content = content.strip_suffix('\r').unwrap_or(content);

        out.push(LineRef {
            number: out.len() + 1,
            span: Span::new(start, start + content.len()),
            break_len: raw.len() - content.len(),
            text: content.to_string(),
        });
    }

    if ends_with_break {
        out.push(LineRef {
            number: out.len() + 1,
            span: Span::new(offset, offset),
            break_len: 0,
            text: String::new(),
        });
    }
    out
}
