/// `[text](url)` link delimiters.
pub struct Link;

impl Link {
    pub const TEXT_OPEN: u8 = b'[';
    pub const TEXT_CLOSE: u8 = b']';
    pub const URL_OPEN: u8 = b'(';
    pub const URL_CLOSE: u8 = b')';
    /// `![alt](src)` is an image, not a link.
    pub const IMAGE_BANG: u8 = b'!';
}
