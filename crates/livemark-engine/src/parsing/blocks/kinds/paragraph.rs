/// Paragraph block type (marker struct).
///
/// Paragraphs have no delimiters - they are the default block when no other
/// opener matches. Each non-blank paragraph line is its own block, and each
/// blank line is an empty paragraph.
pub struct Paragraph;

impl Paragraph {
    pub fn is_blank(line: &str) -> bool {
        line.trim().is_empty()
    }
}
