use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ct_resume_hash::{normalize, normalize_vartime, resume_hash, verify};

pub fn criterion_benchmark(c: &mut Criterion) {
    let input = b"   Senior ENGINEER\twith\n   spacing   and CAPS   ";

    c.bench_function("normalize vartime", |b| {
        b.iter(|| normalize_vartime(black_box(input)))
    });
    c.bench_function("normalize constant-time", |b| {
        b.iter(|| normalize(black_box(input)))
    });

    let stored = resume_hash(input, Some(b"bench")).unwrap();
    c.bench_function("resume hash", |b| {
        b.iter(|| resume_hash(black_box(input), Some(b"bench")))
    });
    c.bench_function("verify", |b| {
        b.iter(|| verify(black_box(input), Some(b"bench"), &stored))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
