//! Benchmarks for manifest parsing and slide navigation.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::json;
use storyview::navigation::{initial, transition, NavEvent};
use storyview::outline::Outline;
use storyview::parser::parse;
use storyview::{SlideOptions, Story};

/// Manifest with `canvases` canvases of `annotations` annotations each,
/// alternating region and point targets.
fn manifest(canvases: usize, annotations: usize) -> String {
    let items: Vec<_> = (0..canvases)
        .map(|c| {
            let annos: Vec<_> = (0..annotations)
                .map(|a| {
                    let offset = (a * 50) as f64;
                    let target = if a % 2 == 0 {
                        json!(format!("https://example.org/canvas/{c}#xywh={offset},{offset},200,100"))
                    } else {
                        json!({
                            "type": "SpecificResource",
                            "source": format!("https://example.org/canvas/{c}"),
                            "selector": {"type": "PointSelector", "x": offset, "y": offset}
                        })
                    };
                    json!({
                        "id": format!("https://example.org/anno/{c}/{a}"),
                        "type": "Annotation",
                        "motivation": "commenting",
                        "target": target,
                        "body": {"type": "TextualBody", "format": "text/html", "value": "<p>Annotation text</p>"}
                    })
                })
                .collect();
            json!({
                "id": format!("https://example.org/canvas/{c}"),
                "type": "Canvas",
                "width": 8000,
                "height": 6000,
                "items": [{"type": "AnnotationPage", "items": [{
                    "type": "Annotation",
                    "motivation": "painting",
                    "body": {"id": "https://example.org/image/full/full/0/default.jpg", "type": "Image",
                             "service": [{"id": "https://example.org/image", "type": "ImageService3"}]}
                }]}],
                "annotations": [{"type": "AnnotationPage", "items": annos}]
            })
        })
        .collect();

    json!({
        "@context": "http://iiif.io/api/presentation/3/context.json",
        "id": "https://example.org/manifest.json",
        "type": "Manifest",
        "label": {"en": ["Benchmark story"]},
        "items": items
    })
    .to_string()
}

/// Compare parsing performance across manifest sizes
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for annotations in [5, 50, 500] {
        let text = manifest(4, annotations);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(annotations),
            &text,
            |b, text| b.iter(|| parse(black_box(text)).expect("Failed to parse")),
        );
    }

    group.finish();
}

/// Walk every slide of every canvas with `next`
fn bench_walk(c: &mut Criterion) {
    let parsed = parse(&manifest(4, 50)).expect("Failed to parse");
    let story = Story::new(parsed.manifest, SlideOptions::default());
    let total: usize = (0..story.canvas_count())
        .map(|canvas| story.slides(canvas).len())
        .sum();

    c.bench_function("walk_all_slides", |b| {
        b.iter(|| {
            let mut cursor = initial(&story).cursor;
            for _ in 0..total {
                if let Some(next) = transition(&story, cursor, black_box(NavEvent::Next)) {
                    cursor = next.cursor;
                }
            }
            cursor
        })
    });
}

/// Full outline, including markers and route
fn bench_outline(c: &mut Criterion) {
    let text = manifest(4, 50);

    c.bench_function("outline", |b| {
        b.iter(|| {
            let parsed = parse(black_box(&text)).expect("Failed to parse");
            Outline::new(parsed, SlideOptions::default())
        })
    });
}

criterion_group!(benches, bench_parse, bench_walk, bench_outline);

criterion_main!(benches);
