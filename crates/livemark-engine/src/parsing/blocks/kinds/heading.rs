/// ATX heading syntax: one to six `#` followed by a space or tab.
pub struct Heading;

impl Heading {
    pub const MARKER: u8 = b'#';
    pub const MAX_LEVEL: u8 = 6;

    /// Returns `(level, marker_len)` where `marker_len` covers the hashes and
    /// the single separating whitespace character.
    pub fn parse(line: &str) -> Option<(u8, usize)> {
        let b = line.as_bytes();
        let hashes = b.iter().take_while(|&&c| c == Self::MARKER).count();
        if hashes == 0 || hashes > Self::MAX_LEVEL as usize {
            return None;
        }
        match b.get(hashes) {
            Some(b' ') | Some(b'\t') => Some((hashes as u8, hashes + 1)),
            _ => None,
        }
    }
}
