use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use merkle_tree::{Blake3Hash, HashFunction, MerklePath, MerkleTree, RawPayload, Sha256Hash};

fn payloads(count: u32) -> Vec<RawPayload> {
    (0..count)
        .map(|i| RawPayload::new(i.to_le_bytes().to_vec()))
        .collect()
}

/// Every `stride`-th payload, so lookups are spread over the leaf layer.
fn sample(payloads: &[RawPayload], stride: usize) -> Vec<RawPayload> {
    payloads.iter().step_by(stride).cloned().collect()
}

fn bench_build<H: HashFunction + Copy>(c: &mut Criterion, name: &str, hasher: H) {
    let mut group = c.benchmark_group(format!("merkle tree build ({})", name));
    for size in [1_001u32, 10_000, 100_001] {
        let input = payloads(size);
        group.bench_with_input(BenchmarkId::new("payloads", size), &input, |b, input| {
            b.iter(|| MerkleTree::new(black_box(input.clone()), hasher).expect("build"));
        });
    }
    group.finish();
}

fn bench(c: &mut Criterion) {
    bench_build(c, "sha256", Sha256Hash);
    bench_build(c, "blake3", Blake3Hash);

    c.bench_function("merkle tree verify", |b| {
        let tree = MerkleTree::new(payloads(100_001), Sha256Hash).expect("build");
        b.iter(|| assert!(tree.verify().expect("verify")));
    });

    c.bench_function("merkle tree verify payload", |b| {
        let input = payloads(10_000);
        let targets = sample(&input, 997);
        let tree = MerkleTree::new(input, Sha256Hash).expect("build");
        let mut cycle = targets.iter().cycle();
        b.iter(|| {
            let target = cycle.next().expect("cycle never ends");
            black_box(tree.verify_payload(target).expect("verify payload"))
        });
    });

    c.bench_function("merkle tree path", |b| {
        let input = payloads(10_000);
        let targets = sample(&input, 997);
        let tree = MerkleTree::new(input, Sha256Hash).expect("build");
        let mut cycle = targets.iter().cycle();
        b.iter(|| {
            let target = cycle.next().expect("cycle never ends");
            black_box(tree.merkle_path(target).expect("path"))
        });
    });

    c.bench_function("merkle path verify", |b| {
        let input = payloads(100_001);
        let targets = sample(&input, 9_973);
        let tree = MerkleTree::new(input, Sha256Hash).expect("build");
        let proofs: Vec<(RawPayload, MerklePath)> = targets
            .into_iter()
            .map(|target| {
                let path = tree.merkle_path(&target).expect("path");
                (target, path)
            })
            .collect();
        let root = tree.root_hash().to_vec();
        let mut cycle = proofs.iter().cycle();
        b.iter(|| {
            let (target, path) = cycle.next().expect("cycle never ends");
            assert!(path.verify(target, &root, &Sha256Hash).expect("verify"));
        });
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default().sample_size(20);
    targets = bench
);
criterion_main!(benches);
