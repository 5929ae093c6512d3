// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **bold**, *italic* and `code`.\n\n- Bullet point\n- Another [link](https://example.com)\n\n- [ ] open task\n- [x] done task\n\n> quoted\n> text\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n---\n\n<details>\n<summary>More</summary>\n\nHidden body.\n\n</details>\n\n";
    base.repeat(size)
}

#[allow(dead_code)]
pub fn generate_large_document() -> String {
    generate_markdown_content(500)
}
