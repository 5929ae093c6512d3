//! The fixed list of block types the slash menu can insert.

use crate::parsing::blocks::kinds::{CodeFence, ListItem, Toggle};

/// Turns the text after the caret into the markdown for the new block and the
/// caret offset within it.
pub type Transform = fn(&str) -> (String, usize);

#[derive(Debug, Clone, Copy)]
pub struct SlashCommand {
    pub id: &'static str,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub keywords: &'static [&'static str],
    pub transform: Transform,
}

impl SlashCommand {
    /// Case-insensitive substring match against the label or any keyword.
    /// `query` must already be lowercase.
    fn matches(&self, query: &str) -> bool {
        query.is_empty()
            || self.label.to_lowercase().contains(query)
            || self.keywords.iter().any(|k| k.contains(query))
    }

    pub fn apply(&self, content: &str) -> (String, usize) {
        (self.transform)(content)
    }
}

fn prefixed(prefix: &str, content: &str) -> (String, usize) {
    (format!("{prefix}{content}"), prefix.len())
}

fn text(content: &str) -> (String, usize) {
    (content.to_string(), 0)
}

fn heading_1(content: &str) -> (String, usize) {
    prefixed("# ", content)
}

fn heading_2(content: &str) -> (String, usize) {
    prefixed("## ", content)
}

fn heading_3(content: &str) -> (String, usize) {
    prefixed("### ", content)
}

fn bulleted(content: &str) -> (String, usize) {
    prefixed("- ", content)
}

fn numbered(content: &str) -> (String, usize) {
    prefixed("1. ", content)
}

fn todo(content: &str) -> (String, usize) {
    prefixed(&format!("- {} ", ListItem::UNCHECKED), content)
}

fn quote(content: &str) -> (String, usize) {
    prefixed("> ", content)
}

fn code(content: &str) -> (String, usize) {
    let open = format!("{}\n", CodeFence::BACKTICKS);
    let caret = open.len();
    (format!("{open}{content}\n{}", CodeFence::BACKTICKS), caret)
}

/// Typed text is dropped; a rule has no content.
fn divider(_content: &str) -> (String, usize) {
    prefixed("---\n", "")
}

fn toggle(content: &str) -> (String, usize) {
    let head = format!("{}>\n{}{content}", Toggle::OPEN, Toggle::SUMMARY_OPEN);
    let caret = head.len();
    (
        format!("{head}{}\n\n{}", Toggle::SUMMARY_CLOSE, Toggle::CLOSE),
        caret,
    )
}

static CATALOG: [SlashCommand; 11] = [
    SlashCommand {
        id: "text",
        label: "Text",
        description: "Plain paragraph",
        icon: "¶",
        keywords: &["paragraph", "plain"],
        transform: text,
    },
    SlashCommand {
        id: "h1",
        label: "Heading 1",
        description: "Large section heading",
        icon: "H1",
        keywords: &["title", "h1"],
        transform: heading_1,
    },
    SlashCommand {
        id: "h2",
        label: "Heading 2",
        description: "Medium section heading",
        icon: "H2",
        keywords: &["subtitle", "h2"],
        transform: heading_2,
    },
    SlashCommand {
        id: "h3",
        label: "Heading 3",
        description: "Small section heading",
        icon: "H3",
        keywords: &["h3"],
        transform: heading_3,
    },
    SlashCommand {
        id: "bullet",
        label: "Bulleted list",
        description: "Simple bulleted list",
        icon: "•",
        keywords: &["unordered", "ul", "bullet"],
        transform: bulleted,
    },
    SlashCommand {
        id: "numbered",
        label: "Numbered list",
        description: "List with numbering",
        icon: "1.",
        keywords: &["ordered", "ol"],
        transform: numbered,
    },
    SlashCommand {
        id: "todo",
        label: "To-do list",
        description: "Track tasks with a checkbox",
        icon: "☐",
        keywords: &["task", "checkbox", "check"],
        transform: todo,
    },
    SlashCommand {
        id: "quote",
        label: "Quote",
        description: "Capture a quote",
        icon: "❝",
        keywords: &["blockquote", "citation"],
        transform: quote,
    },
    SlashCommand {
        id: "code",
        label: "Code",
        description: "Code block",
        icon: "</>",
        keywords: &["fence", "snippet", "pre"],
        transform: code,
    },
    SlashCommand {
        id: "divider",
        label: "Divider",
        description: "Horizontal rule",
        icon: "—",
        keywords: &["rule", "hr", "separator", "line"],
        transform: divider,
    },
    SlashCommand {
        id: "toggle",
        label: "Toggle",
        description: "Collapsible section",
        icon: "▸",
        keywords: &["details", "collapse", "fold"],
        transform: toggle,
    },
];

pub fn catalog() -> &'static [SlashCommand] {
    &CATALOG
}

/// Catalog entries matching `query`, in catalog order.
pub fn filter(query: &str) -> Vec<&'static SlashCommand> {
    let query = query.to_lowercase();
    CATALOG.iter().filter(|c| c.matches(&query)).collect()
}
