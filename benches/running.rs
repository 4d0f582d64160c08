use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use medianwindow::util::Xorshift;
use medianwindow::{medfilt, Config, Strategy};

const SAMPLES: usize = 20_000;

fn bench_medfilt(c: &mut Criterion) {
    let mut xshft = Xorshift::new(0xdead_beef);
    let signal = xshft.signal(SAMPLES);

    let mut group = c.benchmark_group("medfilt");
    group.throughput(Throughput::Elements(SAMPLES as u64));

    for window in [3, 8, 31, 255, 1023].iter() {
        for strategy in [Strategy::Tree, Strategy::Sorted].iter() {
            let config = Config::new(*window).with_strategy(*strategy);
            group.bench_with_input(
                BenchmarkId::new(strategy.to_string(), window),
                &config,
                |b, config| {
                    b.iter(|| medfilt(black_box(&signal), config).unwrap());
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, bench_medfilt);
criterion_main!(benches);
