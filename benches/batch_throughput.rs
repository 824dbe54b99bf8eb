//! Throughput benchmarks for bulk rating

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skill_ladder::{
    partition_waves, BatchProcessor, EngineConfig, ExecutionStrategy, Game, PlackettLuce,
};
use std::sync::Arc;

/// A dense round-robin league: heavy participant overlap, so the
/// partitioner produces many small waves.
fn league_games(players: usize, rounds: usize) -> Vec<Game> {
    let mut games = Vec::new();
    for round in 0..rounds {
        for i in 0..players {
            for j in (i + 1)..players {
                let (a, b) = (format!("p{i}"), format!("p{j}"));
                let game = if (i + j + round) % 2 == 0 {
                    Game::new(vec![vec![a], vec![b]])
                } else {
                    Game::new(vec![vec![b], vec![a]])
                };
                games.push(game);
            }
        }
    }
    games
}

/// Many independent pools: wide waves, the parallel strategies' best case.
fn pooled_games(pools: usize, games_per_pool: usize) -> Vec<Game> {
    let mut games = Vec::new();
    for round in 0..games_per_pool {
        for pool in 0..pools {
            let a = format!("pool{pool}-a");
            let b = format!("pool{pool}-b{}", round % 4);
            games.push(Game::new(vec![vec![a], vec![b]]));
        }
    }
    games
}

fn processor(strategy: ExecutionStrategy) -> BatchProcessor {
    let mut config = EngineConfig::default();
    config.execution_strategy = strategy;
    BatchProcessor::new(Arc::new(PlackettLuce::default()), config).unwrap()
}

fn bench_partitioning(c: &mut Criterion) {
    let games = league_games(40, 4);
    c.bench_function("partition_league_3120_games", |b| {
        b.iter(|| black_box(partition_waves(black_box(&games))))
    });
}

fn bench_sequential_batch(c: &mut Criterion) {
    let games = league_games(20, 4);
    let proc = processor(ExecutionStrategy::Sequential);
    c.bench_function("sequential_league_760_games", |b| {
        b.iter(|| black_box(proc.process(black_box(&games), None).unwrap()))
    });
}

fn bench_parallel_batch(c: &mut Criterion) {
    let games = pooled_games(64, 16);
    let sequential = processor(ExecutionStrategy::Sequential);
    let parallel = processor(ExecutionStrategy::Parallel);
    let pipelined = processor(ExecutionStrategy::Pipelined);

    let mut group = c.benchmark_group("pooled_1024_games");
    group.bench_function("sequential", |b| {
        b.iter(|| black_box(sequential.process(black_box(&games), None).unwrap()))
    });
    group.bench_function("parallel", |b| {
        b.iter(|| black_box(parallel.process(black_box(&games), None).unwrap()))
    });
    group.bench_function("pipelined", |b| {
        b.iter(|| black_box(pipelined.process(black_box(&games), None).unwrap()))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_partitioning,
    bench_sequential_batch,
    bench_parallel_batch
);
criterion_main!(benches);
