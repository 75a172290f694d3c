use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use wumpus_agent::core::constants::{RISK_PENALTY_STALE, RISK_PENALTY_UNKNOWN};
use wumpus_agent::core::types::{Coord, Direction, Pose};
use wumpus_agent::inference::{observe, run_to_fixed_point, Observation};
use wumpus_agent::knowledge::{BeliefStore, Signals};
use wumpus_agent::navigation::{find_route, StepCosts};

/// Store with a visited snake through the lower half and a breeze line
fn explored_store(size: u32) -> BeliefStore {
    let mut store = BeliefStore::new(size, 1, None, 1);
    let side = size as i32;
    for y in 0..side / 2 {
        for x in 0..side {
            let breeze = y == side / 2 - 1 && x % 3 == 0;
            let obs = Observation {
                position: Coord::new(x, y),
                signals: Signals::observed(breeze, false, false),
                scream: false,
                shot: None,
                wumpuses_moved: false,
            };
            observe(&mut store, &obs, 0.2).unwrap();
        }
    }
    store
}

fn benchmark_fixed_point(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_point");
    for size in [4u32, 8, 16] {
        let store = explored_store(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| {
                let mut store = store.clone();
                run_to_fixed_point(black_box(&mut store)).unwrap()
            })
        });
    }
    group.finish();
}

fn benchmark_find_route(c: &mut Criterion) {
    let costs = StepCosts {
        risk_penalty: RISK_PENALTY_UNKNOWN,
        stale_penalty: RISK_PENALTY_STALE,
    };
    let mut group = c.benchmark_group("find_route");
    for size in [8u32, 16] {
        let store = explored_store(size);
        let from = Pose::new(Coord::new(0, 0), Direction::East);
        let to = Coord::new(size as i32 - 1, size as i32 - 1);
        group.bench_with_input(BenchmarkId::from_parameter(size), &store, |b, store| {
            b.iter(|| find_route(black_box(store), from, to, true, costs).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_fixed_point, benchmark_find_route);
criterion_main!(benches);
