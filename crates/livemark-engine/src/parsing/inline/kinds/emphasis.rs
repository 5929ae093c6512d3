use crate::parsing::inline::types::EmphasisKind;

/// Delimiters for bold, italic and strikethrough.
pub struct Emphasis;

impl Emphasis {
    pub const BOLD: [&'static str; 2] = ["**", "__"];
    pub const STRIKE: &'static str = "~~";
    pub const ITALIC: [u8; 2] = [b'*', b'_'];
    /// Underscore emphasis may not start or end inside a word.
    pub const UNDERSCORE: u8 = b'_';

    /// Two-character delimiters in the order the parser tries them.
    pub fn double_delimiters() -> [(&'static str, EmphasisKind); 3] {
        [
            (Self::BOLD[0], EmphasisKind::Bold),
            (Self::BOLD[1], EmphasisKind::Bold),
            (Self::STRIKE, EmphasisKind::Strike),
        ]
    }
}
