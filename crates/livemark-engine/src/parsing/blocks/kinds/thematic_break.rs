/// Horizontal rule: three or more of the same `-`, `*` or `_` alone on a line.
pub struct ThematicBreak;

impl ThematicBreak {
    pub const CHARS: [char; 3] = ['-', '*', '_'];
    pub const MIN_RUN: usize = 3;

    pub fn matches(line: &str) -> bool {
        let t = line.trim_end();
        let Some(first) = t.chars().next() else {
            return false;
        };
        Self::CHARS.contains(&first)
            && t.chars().all(|c| c == first)
            && t.chars().count() >= Self::MIN_RUN
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("---", true)]
    #[case("***", true)]
    #[case("_____", true)]
    #[case("---   ", true)]
    #[case("--", false)]
    #[case("-*-", false)]
    #[case("- - -", false)]
    #[case(" ---", false)]
    #[case("", false)]
    fn detect_thematic_break(#[case] line: &str, #[case] expected: bool) {
        assert_eq!(ThematicBreak::matches(line), expected);
    }
}
