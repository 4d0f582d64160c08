use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use medianwindow::ostree::OsTree;
use medianwindow::store::SortedStore;
use medianwindow::OrderStatistics;

macro_rules! generate_benches {
    ($name:ident, $store:expr) => {
        fn $name(c: &mut Criterion) {
            let mut group = c.benchmark_group(stringify!($name));
            for size in [100u32, 1_000, 10_000].iter() {
                group.bench_with_input(BenchmarkId::new("insert_select", size), size, |b, &size| {
                    b.iter(|| {
                        let mut store = $store;
                        for i in 0..size {
                            store.insert(i.wrapping_mul(2_654_435_761) % size);
                        }
                        black_box(store.select(store.len() / 2 + 1).unwrap());
                    });
                });
            }
            group.finish();
        }
    };
}

generate_benches!(bench_ostree, OsTree::<u32>::new());
generate_benches!(bench_sorted, SortedStore::<u32>::new());

criterion_group!(benches, bench_ostree, bench_sorted);
criterion_main!(benches);
