pub mod blocks;
pub mod inline;
pub mod invariants;
pub mod rope;

#[cfg(test)]
mod tests;

use xi_rope::Rope;

use blocks::{Block, BlockBuilder, MarkdownLineClassifier, ParseOptions};
use rope::{LineRef, lines_with_spans};

#[derive(Debug)]
pub struct ParsedDoc {
    pub blocks: Vec<Block>,
}

/// Segments the document into blocks with explicit options.
pub fn parse_document_with(rope: &Rope, options: ParseOptions) -> ParsedDoc {
    ParsedDoc {
        blocks: parse_lines(&lines_with_spans(rope), options),
    }
}

/// Segments an already indexed document.
pub fn parse_lines(lines: &[LineRef], options: ParseOptions) -> Vec<Block> {
    let classifier = MarkdownLineClassifier;
    let mut builder = BlockBuilder::with_options(options);

    for lr in lines {
        let lc = classifier.classify(lr);
        builder.push(&lc);
    }

    builder.finish()
}

pub fn parse_document(rope: &Rope) -> ParsedDoc {
    parse_document_with(rope, ParseOptions::default())
}

/// Convenience: parse plain text with default options.
pub fn parse(text: &str) -> Vec<Block> {
    parse_document(&Rope::from(text)).blocks
}
