use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use croupier::{catalog, config::BiasConfig, Bet, OutcomeSelector};

fn active_bets(count: usize) -> Vec<Bet> {
    (0..count)
        .map(|i| {
            let n = (i % 36) as u8 + 1;
            catalog::straight(n).unwrap().with_stake(10 * (i as u64 % 5 + 1))
        })
        .chain(std::iter::once(catalog::outside(-11).unwrap().with_stake(20)))
        .collect()
}

fn select_winner(c: &mut Criterion) {
    let mut group = c.benchmark_group("select_winner");
    for count in [1usize, 12, 36] {
        let bets = active_bets(count);

        group.bench_function(BenchmarkId::new("biased", count), |b| {
            let bias = BiasConfig {
                chance: 1.0,
                weight_by_stake: true,
                neighbor_boost: true,
            };
            let mut selector = OutcomeSelector::from_seed(0, 36, bias, 7);
            b.iter(|| black_box(selector.select_winner(None, &bets, 10)))
        });

        group.bench_function(BenchmarkId::new("fair", count), |b| {
            let mut selector = OutcomeSelector::from_seed(0, 36, BiasConfig::fair(), 7);
            b.iter(|| black_box(selector.select_winner(None, &bets, 10)))
        });

        group.bench_function(BenchmarkId::new("weight_map", count), |b| {
            let selector = OutcomeSelector::from_seed(0, 36, BiasConfig::default(), 7);
            b.iter(|| black_box(selector.weight_map(&bets, 10)))
        });
    }
    group.finish();
}

criterion_group!(benches, select_winner);
criterion_main!(benches);
