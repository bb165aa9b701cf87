//! Benchmarks for the highlighting pipeline.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use notemark::highlight::{Highlighter, Palette, Recognizer, highlight_uncached};

const SECTION: &str = "## Section

Some **bold** text, some *italic* text and `inline code` with a [link](https://example.com).
- [ ] open task
- [x] done task
  1. nested item with ~~struck~~ words

> [!NOTE]
> A callout with a footnote[^n] and <https://auto.example.com>.

| Name | Value |
| :--- | ---: |
| alpha | 1 |
| beta | 22 |

```rust
fn main() { println!(\"*not emphasis*\"); }
```

";

/// Roughly 100KB of mixed Markdown.
fn large_note() -> String {
    let mut text = String::new();
    while text.len() < 100_000 {
        text.push_str(SECTION);
    }
    text
}

fn bench_pipeline_large(c: &mut Criterion) {
    let text = large_note();
    let palette = Palette::default();
    c.bench_function("highlight_uncached_100kb", |b| {
        b.iter(|| highlight_uncached(black_box(&text), &palette));
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let text = large_note();
    let mut highlighter = Highlighter::default();
    highlighter.highlight(&text);
    c.bench_function("highlight_cache_hit_100kb", |b| {
        b.iter(|| highlighter.highlight(black_box(&text)));
    });
}

fn bench_recognizers(c: &mut Criterion) {
    let text = large_note();
    let palette = Palette::default();
    let mut group = c.benchmark_group("recognizer");
    for recognizer in Recognizer::ALL {
        group.bench_function(recognizer.name(), |b| {
            b.iter(|| recognizer.scan(black_box(&text), &palette));
        });
    }
    group.finish();
}

/// Many short fenced blocks, each followed by inline code.
fn bench_many_fences(c: &mut Criterion) {
    let text = "```\nlet x = 1;\n```\nthen `x` again\n".repeat(5_000);
    let palette = Palette::default();
    c.bench_function("inline_code_many_fences", |b| {
        b.iter(|| Recognizer::InlineCode.scan(black_box(&text), &palette));
    });
}

criterion_group!(
    benches,
    bench_pipeline_large,
    bench_cache_hit,
    bench_recognizers,
    bench_many_fences
);
criterion_main!(benches);
