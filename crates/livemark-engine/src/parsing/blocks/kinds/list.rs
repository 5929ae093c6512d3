use std::sync::OnceLock;

use regex::Regex;

/// Which flavour of list item a line opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
    Task { checked: bool },
}

/// A list item line with the byte positions of its syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLine {
    pub kind: ListKind,
    /// `(start, end)` of the marker including the following space (`- `, `12. `).
    pub marker: (usize, usize),
    /// `(start, end)` of the `[ ]` / `[x]` checkbox for task items.
    pub checkbox: Option<(usize, usize)>,
}

/// List item syntax: bullets (`-*+`), ordered (`1.`) and task items (`- [ ]`).
pub struct ListItem;

fn task_regex() -> &'static Regex {
    static TASK: OnceLock<Regex> = OnceLock::new();
    TASK.get_or_init(|| {
        Regex::new(r"^(\s*[-*+]\s)(\[[ xX]\])(?:\s|$)").expect("Invalid task regex")
    })
}

fn bullet_regex() -> &'static Regex {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    BULLET.get_or_init(|| Regex::new(r"^\s*[-*+]\s").expect("Invalid bullet regex"))
}

fn ordered_regex() -> &'static Regex {
    static ORDERED: OnceLock<Regex> = OnceLock::new();
    ORDERED.get_or_init(|| Regex::new(r"^\s*\d+\.\s").expect("Invalid ordered regex"))
}

impl ListItem {
    pub const CHECKED: &'static str = "[x]";
    pub const UNCHECKED: &'static str = "[ ]";

    /// Classifies a line as a list item. Task items win over plain bullets.
    pub fn parse(line: &str) -> Option<ListLine> {
        if let Some(caps) = task_regex().captures(line) {
            let marker = caps.get(1)?;
            let checkbox = caps.get(2)?;
            let checked = checkbox.as_str() != Self::UNCHECKED;
            return Some(ListLine {
                kind: ListKind::Task { checked },
                marker: Self::trimmed(line, marker.start(), marker.end()),
                checkbox: Some((checkbox.start(), checkbox.end())),
            });
        }
        if let Some(m) = bullet_regex().find(line) {
            return Some(ListLine {
                kind: ListKind::Bullet,
                marker: Self::trimmed(line, m.start(), m.end()),
                checkbox: None,
            });
        }
        if let Some(m) = ordered_regex().find(line) {
            return Some(ListLine {
                kind: ListKind::Ordered,
                marker: Self::trimmed(line, m.start(), m.end()),
                checkbox: None,
            });
        }
        None
    }

    // Markers start after any indentation.
    fn trimmed(line: &str, start: usize, end: usize) -> (usize, usize) {
        let indent = line[start..end].len() - line[start..end].trim_start().len();
        (start + indent, end)
    }
}
