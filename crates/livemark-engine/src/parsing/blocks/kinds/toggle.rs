/// Toggle blocks are stored as an HTML `<details>` element:
///
/// ```text
/// <details>
/// <summary>Title</summary>
///
/// Body
/// </details>
/// ```
pub struct Toggle;

impl Toggle {
    pub const OPEN: &'static str = "<details";
    pub const CLOSE: &'static str = "</details>";
    pub const SUMMARY_OPEN: &'static str = "<summary>";
    pub const SUMMARY_CLOSE: &'static str = "</summary>";

    pub fn opens(line: &str) -> bool {
        line.trim_start().starts_with(Self::OPEN)
    }

    pub fn closes(line: &str) -> bool {
        line.trim().starts_with(Self::CLOSE)
    }

    /// True for any of the structural lines of a toggle.
    pub fn is_tag_line(line: &str) -> bool {
        Self::opens(line) || Self::closes(line) || line.trim_start().starts_with(Self::SUMMARY_OPEN)
    }

    /// Byte ranges of the HTML tags on a toggle line, in order.
    pub fn tag_ranges(line: &str) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        let mut i = 0usize;
        while let Some(rel) = line[i..].find('<') {
            let start = i + rel;
            let Some(close_rel) = line[start..].find('>') else {
                break;
            };
            let end = start + close_rel + 1;
            let tag = &line[start..end];
            if tag.starts_with(Self::OPEN)
                || tag == Self::CLOSE
                || tag == Self::SUMMARY_OPEN
                || tag == Self::SUMMARY_CLOSE
            {
                out.push((start, end));
            }
            i = end;
        }
        out
    }
}
