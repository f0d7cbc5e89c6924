//! Benchmarks for top-K ranking
//!
//! Run with: cargo bench --package recommender
//!
//! Uses a synthetic matrix about the size of the TMDB 5000 catalog.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::SimilarityMatrix;
use recommender::top_similar;

const SIZE: usize = 4800;

fn synthetic_matrix() -> SimilarityMatrix {
    let rows = (0..SIZE)
        .map(|i| {
            (0..SIZE)
                .map(|j| ((i * 31 + j * 17) % 1000) as f32 / 1000.0)
                .collect()
        })
        .collect();
    SimilarityMatrix::from_rows(rows).expect("Failed to build synthetic matrix")
}

fn bench_top_similar(c: &mut Criterion) {
    let matrix = synthetic_matrix();

    c.bench_function("top_similar_k5", |b| {
        b.iter(|| {
            let result = top_similar(black_box(1234), &matrix, black_box(5)).unwrap();
            black_box(result)
        })
    });

    c.bench_function("top_similar_full_row", |b| {
        b.iter(|| {
            let result = top_similar(black_box(1234), &matrix, black_box(SIZE)).unwrap();
            black_box(result)
        })
    });
}

criterion_group!(benches, bench_top_similar);
criterion_main!(benches);
