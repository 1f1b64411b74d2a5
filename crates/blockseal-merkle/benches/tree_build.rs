use blockseal_core::{leaf_digest, Digest};
use blockseal_merkle::MerkleTree;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

#[inline]
fn det_leaves(n: usize) -> Vec<Digest> {
    (0..n as u64)
        .map(|i| {
            let mut h = [0u8; 32];
            h[..8].copy_from_slice(&i.wrapping_mul(0x9E37_79B9_7F4A_7C15).to_le_bytes());
            leaf_digest(&h)
        })
        .collect()
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_tree");
    for &n in &[64usize, 1024, 16_384] {
        group.throughput(Throughput::Elements(n as u64));
        let leaves = det_leaves(n);

        group.bench_function(BenchmarkId::new("from_leaves", n), |b| {
            b.iter(|| black_box(MerkleTree::from_leaves(black_box(&leaves))))
        });

        let tree = MerkleTree::from_leaves(&leaves).unwrap();
        group.bench_function(BenchmarkId::new("open_and_verify", n), |b| {
            b.iter(|| {
                let i = n / 3;
                let p = tree.open(black_box(i)).unwrap();
                black_box(tree.verify(&leaves[i], &p))
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tree);
criterion_main!(benches);
