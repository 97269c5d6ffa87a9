//! Benchmarks for the TSV clipboard codec and the paste engine.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(clippy::expect_used, clippy::cast_possible_truncation)]

use cellgrid::clipboard::{matrix_to_text, paste, text_to_matrix, TAB};
use cellgrid::{ColumnSchema, ColumnType, GridSchema, Range, RowMatrixView};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn sample_matrix(rows: usize, cols: usize) -> Vec<Vec<Option<String>>> {
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| match (r + c) % 7 {
                    0 => None,
                    1 => Some(format!("quoted \"{r}\"")),
                    2 => Some(format!("line\nbreak {c}")),
                    _ => Some(format!("r{r}c{c}")),
                })
                .collect()
        })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for rows in [100usize, 1_000, 10_000] {
        let matrix = sample_matrix(rows, 10);
        group.throughput(Throughput::Elements((rows * 10) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &matrix, |b, m| {
            b.iter(|| matrix_to_text(black_box(m), TAB, None));
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for rows in [100usize, 1_000, 10_000] {
        let text = matrix_to_text(&sample_matrix(rows, 10), TAB, None);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &text, |b, t| {
            b.iter(|| text_to_matrix(black_box(t), TAB).expect("rectangular"));
        });
    }
    group.finish();
}

fn bench_tiled_paste(c: &mut Criterion) {
    let schema = GridSchema::new(
        (0..10)
            .map(|i| ColumnSchema::new(format!("c{i}"), ColumnType::String))
            .collect(),
    );
    let source = vec![vec!["a".to_string(), "b".to_string()]; 2];
    let target = Range::new(0, 0, 1_000, 10);

    c.bench_function("paste_tiled_1000x10", |b| {
        b.iter(|| {
            let mut view = RowMatrixView::new(schema.clone(), Vec::new());
            paste(&mut view, black_box(&source), &target).expect("paste")
        });
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_tiled_paste);
criterion_main!(benches);
