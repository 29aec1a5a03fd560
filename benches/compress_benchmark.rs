use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ct_resume_hash::compress::{self, BLOCK_SIZE};
use ct_resume_hash::DigestState;
use rand::Rng;

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut rnd = rand::thread_rng();
    let mut block = [0u8; BLOCK_SIZE];
    rnd.fill(&mut block[..]);

    c.bench_function("compress one block", |b| {
        b.iter(|| {
            let mut state = compress::H0;
            compress::compress(&mut state, black_box(&block));
            state
        })
    });

    let mut buf = [0; 600];
    rnd.fill(&mut buf[..]);
    c.bench_function("sha256 600 bytes", |b| {
        b.iter(|| {
            let mut d = DigestState::init();
            d.update(black_box(&buf));
            d.finalize()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
