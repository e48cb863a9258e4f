//! Hot-path performance benchmarks: width calculation, grapheme segmentation,
//! and wrap layout.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use text_engine_core::unicode::{
    WidthMethod, display_width, display_width_char, display_width_with_method, grapheme_info,
    graphemes,
};
use text_engine_core::{EditBuffer, TextBuffer, TextBufferView, WrapMode};

fn width_ascii(c: &mut Criterion) {
    let ascii_text = "Hello, World! This is a test string.";
    c.bench_function("display_width_ascii_short", |b| {
        b.iter(|| display_width(black_box(ascii_text)));
    });

    let ascii_long = "x".repeat(1000);
    c.bench_function("display_width_ascii_1000", |b| {
        b.iter(|| display_width(black_box(&ascii_long)));
    });
}

fn width_unicode(c: &mut Criterion) {
    let mixed = "Hello, 世界! こんにちは";
    c.bench_function("display_width_mixed", |b| {
        b.iter(|| display_width(black_box(mixed)));
    });

    let cjk = "中文测试字符串这是一个很长的中文文本";
    c.bench_function("display_width_cjk", |b| {
        b.iter(|| display_width(black_box(cjk)));
    });

    let emoji = "🎉🎊🎁🎂🎈🎄🎃🎇🎆✨";
    c.bench_function("display_width_emoji", |b| {
        b.iter(|| display_width(black_box(emoji)));
    });

    let combining = "é̃ñ café naïve";
    c.bench_function("display_width_combining", |b| {
        b.iter(|| display_width(black_box(combining)));
    });
}

fn width_char(c: &mut Criterion) {
    c.bench_function("display_width_char_ascii", |b| {
        b.iter(|| display_width_char(black_box('A')));
    });
    c.bench_function("display_width_char_cjk", |b| {
        b.iter(|| display_width_char(black_box('中')));
    });
    c.bench_function("display_width_char_emoji", |b| {
        b.iter(|| display_width_char(black_box('🎉')));
    });
}

fn width_methods(c: &mut Criterion) {
    let mixed = "Hello, 世界! 🎉";
    c.bench_function("display_width_wcwidth", |b| {
        b.iter(|| display_width_with_method(black_box(mixed), WidthMethod::WcWidth));
    });
    c.bench_function("display_width_unicode", |b| {
        b.iter(|| display_width_with_method(black_box(mixed), WidthMethod::Unicode));
    });
    c.bench_function("display_width_no_zwj", |b| {
        b.iter(|| display_width_with_method(black_box(mixed), WidthMethod::NoZwj));
    });
}

fn grapheme_segmentation(c: &mut Criterion) {
    let ascii = "The quick brown fox jumps over the lazy dog.".repeat(20);
    c.bench_function("graphemes_ascii_paragraph", |b| {
        b.iter(|| graphemes(black_box(&ascii)).count());
    });

    let mixed = "Hello 世界 🎉 café naïve ZWJ: 👨\u{200D}👩\u{200D}👧".repeat(20);
    c.bench_function("graphemes_mixed_paragraph", |b| {
        b.iter(|| graphemes(black_box(&mixed)).count());
    });

    c.bench_function("grapheme_info_mixed_line", |b| {
        b.iter(|| grapheme_info(black_box(&mixed), 4, WidthMethod::Unicode));
    });
}

fn wrap_layout(c: &mut Criterion) {
    let line = "The quick brown fox jumps over the lazy dog ".repeat(5);
    let buffer = TextBuffer::with_text(&line);

    c.bench_function("wrap_line_char_80col", |b| {
        b.iter(|| {
            let view = TextBufferView::new(black_box(&buffer))
                .viewport(0, 0, 80, 24)
                .wrap_mode(WrapMode::Char);
            view.line_info()
        });
    });

    c.bench_function("wrap_line_word_80col", |b| {
        b.iter(|| {
            let view = TextBufferView::new(black_box(&buffer))
                .viewport(0, 0, 80, 24)
                .wrap_mode(WrapMode::Word);
            view.line_info()
        });
    });
}

fn buffer_and_view(c: &mut Criterion) {
    let text = "Line of sample text for buffer benchmarks.\n".repeat(500);
    let buffer = TextBuffer::with_text(&text);

    c.bench_function("view_build_virtual_lines_char_wrap", |b| {
        b.iter(|| {
            let view = TextBufferView::new(black_box(&buffer))
                .viewport(0, 0, 80, 24)
                .wrap_mode(WrapMode::Char);
            view.line_info()
        });
    });

    c.bench_function("edit_buffer_insert_line", |b| {
        b.iter(|| {
            let mut edit = EditBuffer::with_text(black_box(&text));
            edit.move_to(250, 0);
            edit.insert("inserted text\n");
        });
    });
}

criterion_group!(
    benches,
    width_ascii,
    width_unicode,
    width_char,
    width_methods,
    grapheme_segmentation,
    wrap_layout,
    buffer_and_view
);
criterion_main!(benches);
