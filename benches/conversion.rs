//! Benchmarks for the capture and conversion pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use patterns_everywhere::css::Stylesheet;
use patterns_everywhere::{CaptureOptions, ConvertOptions, capture_html, convert_html};

const CSS: &str = r#"
:root { --accent: #0b57d0; --gap: 24px }
body { font-family: system-ui, sans-serif; color: #222; line-height: 1.5 }
.grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: var(--gap) }
.card { padding: 16px 20px; border: 1px solid #ddd; border-radius: 8px; background: #fff }
.card h3 { font-size: 20px; margin: 0 0 8px }
.card p { color: #555 }
.card .button { background-color: var(--accent); color: #fff; padding: 8px 12px }
"#;

/// A page with `cards` cards in a grid.
fn page(cards: usize) -> String {
    let mut body = String::from(r#"<main class="grid">"#);
    for i in 0..cards {
        body.push_str(&format!(
            r#"<div class="card"><h3>Card {i}</h3><p>Some <em>text</em> for card {i}.</p>
            <img src="/img/{i}.png" alt="Card {i}"><p><a class="button" href="/cards/{i}">Open</a></p></div>"#
        ));
    }
    body.push_str("</main>");
    format!("<html><head><style>{CSS}</style></head><body>{body}</body></html>")
}

// ============================================================================
// Stylesheet Benchmarks
// ============================================================================

fn bench_parse_stylesheet(c: &mut Criterion) {
    c.bench_function("parse_stylesheet", |b| {
        b.iter(|| Stylesheet::parse(CSS));
    });
}

// ============================================================================
// Pipeline Benchmarks
// ============================================================================

fn bench_capture(c: &mut Criterion) {
    let page = page(50);
    let options = CaptureOptions::default();

    c.bench_function("capture_50_cards", |b| {
        b.iter(|| capture_html(&page, ".grid", &[], &options).unwrap());
    });
}

fn bench_convert(c: &mut Criterion) {
    let wire = capture_html(&page(50), ".grid", &[], &CaptureOptions::default()).unwrap();
    let options = ConvertOptions::default();

    c.bench_function("convert_50_cards", |b| {
        b.iter(|| convert_html(&wire, &options).unwrap());
    });
}

criterion_group!(benches, bench_parse_stylesheet, bench_capture, bench_convert);
criterion_main!(benches);
