//! Game simulation benchmarks
//!
//! - One full game per preset
//! - A short series through the parallel runner

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hoops_core::{simulate_game, simulate_series, EngineConfig, Player, Position, Team};

fn team(name: &str, value: f32) -> Team {
    let positions = [Position::PG, Position::SG, Position::SF, Position::PF, Position::C];
    let players = (0..10)
        .map(|i| Player::uniform(format!("{}{}", name, i), positions[i % 5], value))
        .collect();
    Team::with_balanced_tactics(name, players)
}

fn bench_single_game(c: &mut Criterion) {
    let home = team("H", 55.0);
    let away = team("A", 50.0);
    let mut group = c.benchmark_group("single_game");
    for (label, config) in [
        ("realistic", EngineConfig::realistic()),
        ("high_scoring", EngineConfig::high_scoring()),
        ("grind", EngineConfig::grind()),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), &config, |b, config| {
            b.iter(|| simulate_game(home.clone(), away.clone(), black_box(42), config))
        });
    }
    group.finish();
}

fn bench_series(c: &mut Criterion) {
    let home = team("H", 55.0);
    let away = team("A", 50.0);
    let config = EngineConfig::default();
    let seeds: Vec<u64> = (0..32).collect();
    c.bench_function("series_32", |b| {
        b.iter(|| simulate_series(&home, &away, black_box(&seeds), &config))
    });
}

criterion_group!(benches, bench_single_game, bench_series);
criterion_main!(benches);
