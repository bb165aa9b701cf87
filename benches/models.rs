//! Benchmarks for the task-list and table models.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use notemark::table;
use notemark::tasks;

fn task_note(items: usize) -> String {
    (0..items)
        .map(|i| {
            let mark = if i % 3 == 0 { 'x' } else { ' ' };
            format!("{}- [{mark}] task number {i}\n", "  ".repeat(i % 3))
        })
        .collect()
}

fn table_note(rows: usize) -> String {
    let mut text = String::from("| Name | Count | Note |\n| :--- | ---: | :---: |\n");
    for i in 0..rows {
        text.push_str(&format!("| row {i} | {} | cell \\| {i} |\n", i * 7));
    }
    text
}

fn bench_tasks(c: &mut Criterion) {
    let text = task_note(2_000);
    c.bench_function("tasks_parse_all_2000", |b| {
        b.iter(|| tasks::parse_all(black_box(&text)));
    });
    c.bench_function("tasks_statistics_2000", |b| {
        b.iter(|| tasks::statistics(black_box(&text)));
    });
}

fn bench_tables(c: &mut Criterion) {
    let text = table_note(1_000);
    c.bench_function("table_parse_all_1000", |b| {
        b.iter(|| table::parse_all(black_box(&text)));
    });
    let parsed = table::parse_all(&text);
    c.bench_function("table_to_aligned_markdown_1000", |b| {
        b.iter(|| black_box(&parsed[0]).to_aligned_markdown());
    });
}

criterion_group!(benches, bench_tasks, bench_tables);
criterion_main!(benches);
