//! Composition, pathfinding and battle benchmarks for battle_core.
//!
//! Run with: `cargo bench -p battle_core`

// Benchmark binaries don't need docs on macro-generated functions
#![allow(missing_docs)]

use battle_core::board::GridPos;
use battle_core::composer::compose_army;
use battle_core::pathfinding::find_unit_path;
use battle_core::simulation::BattleSimulator;
use battle_core::unit::Unit;
use battle_test_utils::fixtures::{frontline_armies, standard_catalog, unit_at};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

pub fn compose_benchmark(c: &mut Criterion) {
    let catalog = standard_catalog();
    let mut group = c.benchmark_group("compose");
    for budget in [50u32, 250, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(budget), &budget, |b, &budget| {
            b.iter(|| compose_army(black_box(&catalog), black_box(budget)));
        });
    }
    group.finish();
}

pub fn pathfinding_benchmark(c: &mut Criterion) {
    let attacker = unit_at("Scout", 0, 0);
    let target = unit_at("Guard", 26, 20);

    c.bench_function("path_open_board", |b| {
        b.iter(|| find_unit_path(black_box(&attacker), black_box(&target), std::iter::empty::<&Unit>()));
    });

    // A wall across column 13 with a single gap at the bottom.
    let wall: Vec<Unit> = (0..20).map(|y| unit_at("Wall", 13, y)).collect();
    c.bench_function("path_around_wall", |b| {
        b.iter(|| find_unit_path(black_box(&attacker), black_box(&target), wall.iter()));
    });

    let start = GridPos::new(0, 10);
    let blocked_target = unit_at("Keep", 26, 10);
    let ring: Vec<Unit> = blocked_target
        .position
        .into_iter()
        .flat_map(GridPos::neighbors)
        .filter(|p| p.in_bounds())
        .map(|p| unit_at("Moat", p.x, p.y))
        .collect();
    let attacker = unit_at("Scout", start.x, start.y);
    c.bench_function("path_unreachable", |b| {
        b.iter(|| find_unit_path(black_box(&attacker), black_box(&blocked_target), ring.iter()));
    });
}

pub fn battle_benchmark(c: &mut Criterion) {
    let catalog = standard_catalog();
    c.bench_function("frontline_battle_200", |b| {
        b.iter_batched(
            || frontline_armies(&catalog, 200),
            |(mut player, mut computer)| {
                BattleSimulator::default().simulate(&mut player, &mut computer, None)
            },
            criterion::BatchSize::SmallInput,
        );
    });
}

criterion_group!(
    benches,
    compose_benchmark,
    pathfinding_benchmark,
    battle_benchmark
);
criterion_main!(benches);
