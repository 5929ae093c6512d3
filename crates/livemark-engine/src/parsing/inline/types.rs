use crate::parsing::rope::span::Span;

/// Emphasis flavours that wrap their content in a delimiter run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisKind {
    Bold,
    Italic,
    Strike,
}

/// A parsed inline node with byte spans into the rope.
///
/// All variants store spans rather than text, enabling lossless round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Plain text that isn't part of any special construct.
    Text(Span),
    /// A code span (backtick-delimited). This is a raw zone: no parsing inside.
    CodeSpan {
        /// Full span including backticks.
        full: Span,
        /// Inner span (content between backticks).
        inner: Span,
    },
    /// Bold, italic or strikethrough text.
    Emphasis {
        kind: EmphasisKind,
        full: Span,
        inner: Span,
        /// Nested inline nodes of the inner text.
        children: Vec<InlineNode>,
    },
    /// A `[text](url)` link.
    Link {
        full: Span,
        /// Link text between the brackets.
        text: Span,
        /// URL between the parentheses.
        url: Span,
        children: Vec<InlineNode>,
    },
}

impl InlineNode {
    /// Extracts the full span from any inline node variant.
    pub fn span(&self) -> Span {
        match self {
            InlineNode::Text(sp) => *sp,
            InlineNode::CodeSpan { full, .. }
            | InlineNode::Emphasis { full, .. }
            | InlineNode::Link { full, .. } => *full,
        }
    }
}
