//! Benchmarks for dpeval scoring performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks score synthetic text and tables of increasing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dpeval::table::{build_tree, TedsScorer};
use dpeval::{evaluate, nid, Category, Content, Dataset, Document, Element, EvalOptions};

/// Creates pseudo-random lowercase text of the given length.
fn create_text(len: usize, seed: u64) -> String {
    let mut state = seed;
    (0..len)
        .map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let letter = ((state >> 33) % 27) as u8;
            if letter == 26 {
                ' '
            } else {
                (b'a' + letter) as char
            }
        })
        .collect()
}

/// Creates an HTML table with `rows` × `cols` numbered cells.
fn create_table(rows: usize, cols: usize, offset: usize) -> String {
    let mut html = String::from("<table>");
    for r in 0..rows {
        html.push_str("<tr>");
        for c in 0..cols {
            html.push_str(&format!("<td>cell {}</td>", r * cols + c + offset));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}

fn create_dataset(docs: usize, seed: u64) -> Dataset {
    (0..docs)
        .map(|i| {
            let elements = (0..10)
                .map(|j| {
                    let y = j as f64 * 30.0;
                    Element::with_rect(
                        j,
                        Category::Paragraph,
                        1,
                        (0.0, y, 500.0, y + 20.0),
                        Content::text(create_text(80, seed + j as u64)),
                    )
                })
                .collect();
            Document::new(format!("doc_{:03}.pdf", i), elements)
        })
        .collect()
}

fn bench_nid(c: &mut Criterion) {
    let mut group = c.benchmark_group("nid");

    for len in [100, 1_000, 5_000] {
        let reference = create_text(len, 1);
        let prediction = create_text(len, 2);
        group.bench_function(format!("{}_chars", len), |b| {
            b.iter(|| nid(black_box(&reference), black_box(&prediction)))
        });
    }

    group.finish();
}

fn bench_teds(c: &mut Criterion) {
    let mut group = c.benchmark_group("teds");
    let scorer = TedsScorer::new();

    for (rows, cols) in [(5, 5), (20, 8), (50, 10)] {
        let reference = build_tree(&create_table(rows, cols, 0)).unwrap();
        let prediction = build_tree(&create_table(rows, cols, 1)).unwrap();
        group.bench_function(format!("{}x{}", rows, cols), |b| {
            b.iter(|| scorer.score(black_box(&reference), black_box(&prediction)))
        });
    }

    group.finish();
}

fn bench_build_tree(c: &mut Criterion) {
    let html = create_table(50, 10, 0);
    c.bench_function("build_tree_50x10", |b| b.iter(|| build_tree(black_box(&html))));
}

fn bench_evaluate(c: &mut Criterion) {
    let reference = create_dataset(50, 10);
    let prediction = create_dataset(50, 20);
    let parallel = EvalOptions::default();
    let sequential = EvalOptions::new().sequential();

    c.bench_function("evaluate_50_docs_parallel", |b| {
        b.iter(|| evaluate(black_box(&reference), black_box(&prediction), &parallel))
    });
    c.bench_function("evaluate_50_docs_sequential", |b| {
        b.iter(|| evaluate(black_box(&reference), black_box(&prediction), &sequential))
    });
}

criterion_group!(
    benches,
    bench_nid,
    bench_teds,
    bench_build_tree,
    bench_evaluate
);
criterion_main!(benches);
