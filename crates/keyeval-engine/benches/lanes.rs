//! Batch HMAC-SHA1 throughput: scalar backend against lock-step lanes.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use keyeval_core::Salt;
use keyeval_engine::{chain::chain, select, BackendKind, SUPPORTED_WIDTHS};

fn bench_batch_backends(c: &mut Criterion) {
    let mut group = c.benchmark_group("hmac_sha1_batch");
    let salt = Salt::new(b"7oTwG04WUjJ0BTDFFIkTJlgl");

    for width in SUPPORTED_WIDTHS {
        group.throughput(Throughput::Elements(width as u64));
        let keys: Vec<Vec<u8>> = (0..width).map(|i| format!("candidate-{i}").into_bytes()).collect();

        for kind in [BackendKind::Scalar, BackendKind::Lanes] {
            let mut backend = select(kind, width).unwrap();
            backend.set_salt(&salt);
            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}"), width),
                &keys,
                |b, keys| {
                    b.iter(|| {
                        for (lane, key) in keys.iter().enumerate() {
                            backend.set_key(key, lane);
                        }
                        backend.compute_batch();
                        std::hint::black_box(backend.lane_digest(0));
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("iterated_chain");
    for iterations in [1024u32, 4096] {
        group.throughput(Throughput::Elements(u64::from(iterations)));
        group.bench_with_input(
            BenchmarkId::new("sha1", iterations),
            &iterations,
            |b, &n| b.iter(|| chain::<sha1::Sha1>(b"booboo", b"salt", n)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_batch_backends, bench_chain);
criterion_main!(benches);
