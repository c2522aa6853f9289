use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn sha256d_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("sha256d_256B", |b| {
        b.iter(|| overlay_crypto::sha256d(black_box(&data)))
    });
}

fn txid_bench(c: &mut Criterion) {
    let tx_bytes = vec![0xFFu8; 512];

    c.bench_function("txid_512B", |b| {
        b.iter(|| overlay_crypto::txid_of(black_box(&tx_bytes)))
    });
}

criterion_group!(benches, sha256d_256_bench, txid_bench);
criterion_main!(benches);
