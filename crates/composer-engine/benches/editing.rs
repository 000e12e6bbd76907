use composer_engine::{Editor, EditorMode, FormatCommand, PreviewFormat, render};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_editing(c: &mut Criterion) {
    let mut group = c.benchmark_group("editing");
    group.sample_size(10);

    let content = common::generate_message(50);

    group.bench_function("mode_round_trip", |b| {
        b.iter(|| {
            let mut editor = Editor::new(std::hint::black_box(&content));
            editor.switch_mode(EditorMode::Source);
            editor.switch_mode(EditorMode::Visual);
            std::hint::black_box(editor.get_content());
        });
    });

    group.bench_function("insert_at_cursor", |b| {
        let mut editor = Editor::new(&content);
        editor.select_visual_text(10..10);
        b.iter(|| {
            editor.insert_at_cursor(std::hint::black_box("{{resident.name}}"));
        });
    });

    group.bench_function("bold_selection", |b| {
        b.iter(|| {
            let mut editor = Editor::new(&content);
            editor.select_visual_text(0..200);
            editor.format(&FormatCommand::Bold);
            std::hint::black_box(editor.get_content());
        });
    });

    group.bench_function("render_preview", |b| {
        b.iter(|| {
            let output = render(std::hint::black_box(&content), PreviewFormat::Html);
            std::hint::black_box(output);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_editing);
criterion_main!(benches);
