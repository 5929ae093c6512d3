use criterion::{Criterion, criterion_group, criterion_main};
use livemark_engine::{
    editing::{Cmd, Document},
    geometry::{LayoutQuery, StaticLayout},
    parsing::{blocks::ParseOptions, parse_lines},
    preview::{BlockHighlights, render, render_visible},
    view::{EditorOptions, LiveEditor},
};
mod common;

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview");
    group.sample_size(20);

    let doc = Document::new(&common::generate_large_document());
    let blocks = parse_lines(doc.lines(), ParseOptions::default());
    let highlights = BlockHighlights {
        blocks: &blocks,
        selected: &[0, 1, 2],
        pending: &[],
    };

    group.bench_function("render/full", |b| {
        b.iter(|| {
            std::hint::black_box(render(doc.lines(), doc.len(), 0, &highlights));
        });
    });

    let layout = StaticLayout::uniform(doc.line_count(), 20.0).with_viewport(800.0);
    group.bench_function("render/viewport", |b| {
        b.iter(|| {
            std::hint::black_box(render_visible(
                doc.lines(),
                doc.len(),
                0,
                &highlights,
                Some(layout.visible_lines()),
            ));
        });
    });

    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("preview");
    group.sample_size(10);

    let text = common::generate_markdown_content(100);
    group.bench_function("editor/type_100_chars", |b| {
        b.iter(|| {
            let layout = StaticLayout::uniform(4000, 20.0).with_viewport(800.0);
            let mut editor = LiveEditor::new(&text, EditorOptions::default(), &layout);
            for i in 0..100 {
                let cmd = Cmd::InsertText {
                    at: i,
                    text: "x".to_string(),
                };
                // Inserts at char boundaries of an ASCII prefix never fail.
                let _ = editor.apply(cmd, &layout);
            }
            std::hint::black_box(editor.decorations().len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_typing);
criterion_main!(benches);
