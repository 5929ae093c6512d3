use criterion::{Criterion, criterion_group, criterion_main};
use livemark_engine::parsing::{
    blocks::ParseOptions, parse_document, parse_document_with, parse_lines, rope::lines_with_spans,
};
use xi_rope::Rope;
mod common;

fn bench_block_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(20);

    for size in [10, 100, 500] {
        let rope = Rope::from(common::generate_markdown_content(size));
        group.bench_function(format!("parse_document/{size}"), |b| {
            b.iter(|| std::hint::black_box(parse_document(std::hint::black_box(&rope))));
        });
    }

    let rope = Rope::from(common::generate_large_document());
    group.bench_function("parse_document/unmerged_lists", |b| {
        let options = ParseOptions {
            merge_list_items: false,
        };
        b.iter(|| std::hint::black_box(parse_document_with(&rope, options)));
    });

    // Reparse cost once the line index already exists.
    let lines = lines_with_spans(&rope);
    group.bench_function("parse_lines/indexed", |b| {
        b.iter(|| std::hint::black_box(parse_lines(&lines, ParseOptions::default())));
    });

    group.finish();
}

criterion_group!(benches, bench_block_parsing);
criterion_main!(benches);
