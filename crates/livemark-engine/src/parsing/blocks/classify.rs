use crate::parsing::rope::{lines::LineRef, span::Span};

use super::kinds::{
    BlockQuote, CodeFence, FenceSig, Heading, ListItem, ListLine, Paragraph, ThematicBreak, Toggle,
};

/// The construct a line looks like when read on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineShape {
    Blank,
    FenceDelimiter(FenceSig),
    ToggleOpen { self_closing: bool },
    ToggleClose,
    Heading { level: u8, marker_len: usize },
    ThematicBreak,
    Quote { depth: u8, marker_len: usize },
    List(ListLine),
    Paragraph,
}

/// Classification of a single line containing only local facts.
///
/// This is phase 1 of block parsing: each line is classified independently
/// without reference to surrounding context. Whether a fence line opens or
/// closes a code block is decided by the builder.
#[derive(Debug, Clone)]
pub struct LineClass {
    /// 1-based line number.
    pub number: usize,
    /// Byte span of the line content (line break excluded).
    pub line: Span,
    pub shape: LineShape,
}

impl LineClass {
    pub fn is_blank(&self) -> bool {
        matches!(self.shape, LineShape::Blank)
    }
}

/// Classifies individual lines for the block parsing phase.
///
/// Precedence: fence, toggle, heading, horizontal rule, quote, task item,
/// bullet item, ordered item, paragraph.
pub struct MarkdownLineClassifier;

impl MarkdownLineClassifier {
    pub fn classify(&self, lr: &LineRef) -> LineClass {
        LineClass {
            number: lr.number,
            line: lr.span,
            shape: Self::shape(&lr.text),
        }
    }

    pub fn shape(text: &str) -> LineShape {
        if Paragraph::is_blank(text) {
            return LineShape::Blank;
        }
        if let Some(sig) = CodeFence::sig(text) {
            return LineShape::FenceDelimiter(sig);
        }
        if Toggle::closes(text) {
            return LineShape::ToggleClose;
        }
        if Toggle::opens(text) {
            return LineShape::ToggleOpen {
                self_closing: text.contains(Toggle::CLOSE),
            };
        }
        if let Some((level, marker_len)) = Heading::parse(text) {
            return LineShape::Heading { level, marker_len };
        }
        if ThematicBreak::matches(text) {
            return LineShape::ThematicBreak;
        }
        if BlockQuote::matches(text) {
            let (depth, marker_len) = BlockQuote::strip_prefixes(text);
            return LineShape::Quote { depth, marker_len };
        }
        if let Some(list) = ListItem::parse(text) {
            return LineShape::List(list);
        }
        LineShape::Paragraph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::blocks::kinds::ListKind;
    use rstest::rstest;

    #[rstest]
    #[case("", LineShape::Blank)]
    #[case("   ", LineShape::Blank)]
    #[case("```rust", LineShape::FenceDelimiter(FenceSig::Backticks))]
    #[case("<details>", LineShape::ToggleOpen { self_closing: false })]
    #[case("</details>", LineShape::ToggleClose)]
    #[case("## Title", LineShape::Heading { level: 2, marker_len: 3 })]
    #[case("---", LineShape::ThematicBreak)]
    #[case("> quote", LineShape::Quote { depth: 1, marker_len: 2 })]
    #[case("text", LineShape::Paragraph)]
    fn classify_shapes(#[case] text: &str, #[case] expected: LineShape) {
        assert_eq!(MarkdownLineClassifier::shape(text), expected);
    }

    #[test]
    fn rule_wins_over_bullet() {
        assert_eq!(MarkdownLineClassifier::shape("***"), LineShape::ThematicBreak);
    }

    #[test]
    fn task_wins_over_bullet() {
        match MarkdownLineClassifier::shape("- [x] done") {
            LineShape::List(l) => assert_eq!(l.kind, ListKind::Task { checked: true }),
            other => panic!("expected task item, got {other:?}"),
        }
    }
}
