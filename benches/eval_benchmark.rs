//! Benchmarks for pdfair evaluation and rendering.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic page text and layouts.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pdfair::{
    BoundingBox, Category, Document, EvalOptions, FidelityEvaluator, LayoutElement, Metadata,
    MissDirection, Page, RenderOptions,
};

const WORDS: &[&str] = &[
    "de", "minister", "heeft", "besloten", "het", "verzoek", "gedeeltelijk", "toe", "te",
    "wijzen", "op", "grond", "van", "artikel", "openbaarmaking", "documenten",
];

/// Creates page text with `paragraphs` blocks separated by blank lines.
fn create_page_text(paragraphs: usize, seed: usize) -> String {
    (0..paragraphs)
        .map(|p| {
            (0..40)
                .map(|i| WORDS[(p * 7 + i * 3 + seed) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Creates a document with `page_count` pages of mixed regions.
fn create_document(page_count: u32) -> Document {
    let mut doc = Document::new("bench.pdf", Metadata::undefined());
    for number in 1..=page_count {
        let mut page = Page::new(number, 1240.0, 1754.0);
        for i in 0..20 {
            let category = match i % 4 {
                0 => Category::Heading,
                3 => Category::List,
                _ => Category::Paragraph,
            };
            page.add_element(
                LayoutElement::new(
                    category,
                    create_page_text(1, i),
                    BoundingBox::new(100.0, 80.0 * i as f32, 1000.0, 70.0),
                )
                .with_reading_order((20 - i) as i64),
            );
        }
        doc.add_page(page);
    }
    doc
}

/// Benchmark the full evaluation at various page lengths.
fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");

    for paragraphs in [1, 5, 20].iter() {
        let reference = create_page_text(*paragraphs, 0);
        let generated = create_page_text(*paragraphs, 1);
        let options = EvalOptions::new().with_direction(MissDirection::Both);

        group.bench_function(format!("{}_paragraphs", paragraphs), |b| {
            b.iter(|| {
                FidelityEvaluator::evaluate(&options, black_box(&reference), black_box(&generated))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark RML rendering, sequential and parallel ordering.
fn bench_rml_rendering(c: &mut Criterion) {
    let doc = create_document(50);

    c.bench_function("rml_50_pages", |b| {
        let options = RenderOptions::default();
        b.iter(|| pdfair::render::to_rml(black_box(&doc), &options).unwrap());
    });

    c.bench_function("rml_50_pages_parallel", |b| {
        let options = RenderOptions::default().with_parallel(true);
        b.iter(|| pdfair::render::to_rml(black_box(&doc), &options).unwrap());
    });
}

criterion_group!(benches, bench_evaluation, bench_rml_rendering);
criterion_main!(benches);
