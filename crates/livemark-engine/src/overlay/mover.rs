use crate::{
    editing::{Change, Document, Transaction},
    parsing::{blocks::Block, rope::preview},
};

use super::controller::DragStartNotice;

/// Receives block drops and turns them into move transactions.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockMover;

impl BlockMover {
    /// Moves the dragged blocks in front of `target` (or to the end of the
    /// document for `None`) as one transaction, keeping their relative order.
    ///
    /// Returns `None` when the drop is a no-op or the notice was taken on a
    /// different document version.
    pub fn drop_at(
        &self,
        doc: &Document,
        blocks: &[Block],
        notice: &DragStartNotice,
        target: Option<usize>,
    ) -> Option<Transaction> {
        if notice.version != doc.version() || notice.block_indices.is_empty() {
            return None;
        }
        if target.is_some_and(|t| notice.block_indices.contains(&t) || t >= blocks.len()) {
            return None;
        }
        let text = doc.text();
        let newline = if text.contains("\r\n") { "\r\n" } else { "\n" };
        // A block and the line break that follows it; the last block has none.
        let piece = |i: usize| {
            let b = &blocks[i];
            let next = blocks.get(i + 1).map_or(text.len(), |n| n.from);
            (&text[b.from..b.to], &text[b.to..next])
        };

        // A trailing empty line stays last so the file keeps its final newline.
        let trailing_blank = blocks
            .last()
            .filter(|b| blocks.len() > 1 && b.from == b.to && b.from == text.len());
        let target = target.or_else(|| trailing_blank.map(|_| blocks.len() - 1));

        let moved: Vec<(&str, &str)> = notice
            .block_indices
            .iter()
            .filter(|&&i| i < blocks.len())
            .map(|&i| piece(i))
            .collect();

        let mut pieces: Vec<(&str, &str)> = Vec::with_capacity(blocks.len());
        let mut moved_at = None;
        for i in 0..blocks.len() {
            if Some(i) == target {
                moved_at = Some(pieces.len());
                pieces.extend(&moved);
            }
            if !notice.block_indices.contains(&i) {
                pieces.push(piece(i));
            }
        }
        let moved_at = match moved_at {
            Some(at) => at,
            None => {
                let at = pieces.len();
                pieces.extend(&moved);
                at
            }
        };

        let mut rebuilt = String::with_capacity(text.len() + newline.len());
        let mut caret = 0;
        let last = pieces.len().saturating_sub(1);
        for (i, (body, ending)) in pieces.iter().enumerate() {
            if i == moved_at {
                caret = rebuilt.len();
            }
            rebuilt.push_str(body);
            if i < last {
                rebuilt.push_str(if ending.is_empty() { newline } else { ending });
            }
        }
        if rebuilt == text {
            return None;
        }

        if let Some(dragged) = blocks.get(notice.block_index) {
            log::debug!(
                "moving {} block(s) from {:?} in front of {target:?}",
                moved.len(),
                preview(doc.rope(), dragged.span(), 40)
            );
        }
        let (from, to, insert) = minimal_replacement(&text, &rebuilt);
        Some(Transaction::single(Change::replace(from, to, insert)).with_caret(caret))
    }
}

/// The smallest `from..to` of `old` that, replaced by the returned text,
/// turns `old` into `new`. Cuts fall on char boundaries.
fn minimal_replacement(old: &str, new: &str) -> (usize, usize, String) {
    let prefix: usize = old
        .chars()
        .zip(new.chars())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .sum();
    let max_suffix = old.len().min(new.len()) - prefix;
    let suffix: usize = old[prefix..]
        .chars()
        .rev()
        .zip(new[prefix..].chars().rev())
        .take_while(|(a, b)| a == b)
        .map(|(a, _)| a.len_utf8())
        .scan(0usize, |acc, n| {
            *acc += n;
            (*acc <= max_suffix).then_some(n)
        })
        .sum();
    (
        prefix,
        old.len() - suffix,
        new[prefix..new.len() - suffix].to_string(),
    )
}
