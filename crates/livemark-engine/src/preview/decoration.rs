use crate::parsing::rope::Span;

/// Inline styles and the hide mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MarkKind {
    /// Collapse the range (markdown syntax that is not being edited).
    Hide,
    Bold,
    Italic,
    Strike,
    InlineCode,
    LinkText,
    LinkUrl,
}

/// Zero-width attachments at a line start that style the whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LineKind {
    Heading(u8),
    Quote,
    BulletItem,
    OrderedItem,
    TaskItem,
    CodeBlock,
    CodeFenceDelimiter,
    Toggle,
    SelectedBlock,
    PendingBlock,
}

/// Widgets drawn in place of the text they cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// A task checkbox; `marker` is the absolute span of `[ ]` / `[x]`.
    Checkbox { checked: bool, marker: Span },
    HorizontalRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecorationKind {
    Mark(MarkKind),
    Line(LineKind),
    Widget(WidgetKind),
}

/// Decorations of the same priority must not overlap each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    Line,
    /// Hide marks and widgets: both take the text away.
    Replace,
    /// One layer per style so nested constructs of different kinds can stack.
    Style(MarkKind),
}

/// A decorated byte range of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn mark(from: usize, to: usize, kind: MarkKind) -> Self {
        Self {
            from,
            to,
            kind: DecorationKind::Mark(kind),
        }
    }

    pub fn hide(from: usize, to: usize) -> Self {
        Self::mark(from, to, MarkKind::Hide)
    }

    /// A zero-width attachment at `line_start`.
    pub fn line(line_start: usize, kind: LineKind) -> Self {
        Self {
            from: line_start,
            to: line_start,
            kind: DecorationKind::Line(kind),
        }
    }

    pub fn widget(from: usize, to: usize, kind: WidgetKind) -> Self {
        Self {
            from,
            to,
            kind: DecorationKind::Widget(kind),
        }
    }

    pub fn priority(&self) -> Priority {
        match self.kind {
            DecorationKind::Line(_) => Priority::Line,
            DecorationKind::Mark(MarkKind::Hide) | DecorationKind::Widget(_) => Priority::Replace,
            DecorationKind::Mark(kind) => Priority::Style(kind),
        }
    }

    /// Whether the decoration removes the text it covers from display.
    pub fn is_replacing(&self) -> bool {
        self.priority() == Priority::Replace
    }

    pub fn span(&self) -> Span {
        Span::new(self.from, self.to)
    }

    /// Non-empty ranges overlap when they share at least one byte. Zero-width
    /// ranges never overlap anything.
    pub fn overlaps(&self, other: &Decoration) -> bool {
        self.from < other.to && other.from < self.to
    }
}
