#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FenceSig {
    Backticks,
    Tildes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FenceKind {
    Backticks,
    Tildes,
}

pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";
    pub const TILDES: &'static str = "~~~";

    /// Detects a fence opener/closer, allowing leading indentation.
    pub fn sig(line: &str) -> Option<FenceSig> {
        let t = line.trim_start();
        if t.starts_with(Self::BACKTICKS) {
            Some(FenceSig::Backticks)
        } else if t.starts_with(Self::TILDES) {
            Some(FenceSig::Tildes)
        } else {
            None
        }
    }

    pub fn kind(sig: FenceSig) -> FenceKind {
        match sig {
            FenceSig::Backticks => FenceKind::Backticks,
            FenceSig::Tildes => FenceKind::Tildes,
        }
    }

    pub fn closes(kind: FenceKind, sig: Option<FenceSig>) -> bool {
        matches!(
            (kind, sig),
            (FenceKind::Backticks, Some(FenceSig::Backticks))
                | (FenceKind::Tildes, Some(FenceSig::Tildes))
        )
    }

    /// Byte range `(start, end)` of the fence character run within `line`.
    pub fn marker(line: &str) -> Option<(usize, usize)> {
        let indent = line.len() - line.trim_start().len();
        let fence_char = match Self::sig(line)? {
            FenceSig::Backticks => '`',
            FenceSig::Tildes => '~',
        };
        let run = line[indent..]
            .chars()
            .take_while(|&c| c == fence_char)
            .count();
        Some((indent, indent + run))
    }
}
