use criterion::{criterion_group, criterion_main, Criterion};
use engine::tokenizer::{TermNormalizer, Tokenizer};

fn bench_normalize(c: &mut Criterion) {
    let text = include_str!("../../README.md");
    let tokenizer = Tokenizer::new();
    c.bench_function("normalize_readme", |b| b.iter(|| tokenizer.normalize(text)));
}

criterion_group!(benches, bench_normalize);
criterion_main!(benches);
