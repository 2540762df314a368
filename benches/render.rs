//! Benchmarks for the render pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use chatdown::document::render_message;

fn bench_render_plain(c: &mut Criterion) {
    let md = "Just a short chat message with *some* emphasis.";
    c.bench_function("render_plain", |b| {
        b.iter(|| render_message(black_box(md)))
    });
}

fn bench_render_code_heavy(c: &mut Criterion) {
    let md = "Here is the fix:\n\n```rust\nfn main() {\n    for i in 0..10 {\n        println!(\"{i}\");\n    }\n}\n```\n\nAnd the config:\n\n```yaml\nkey: value\nlist:\n  - a\n  - b\n```\n";
    c.bench_function("render_code_heavy", |b| {
        b.iter(|| render_message(black_box(md)))
    });
}

fn bench_render_adversarial(c: &mut Criterion) {
    let md = "<script>alert(1)</script>".repeat(50);
    c.bench_function("render_adversarial", |b| {
        b.iter(|| render_message(black_box(&md)))
    });
}

criterion_group!(
    benches,
    bench_render_plain,
    bench_render_code_heavy,
    bench_render_adversarial
);
criterion_main!(benches);
