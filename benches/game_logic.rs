use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tui_2048::core::{terminal, GameSnapshot, GameState, Grid, MoveResolver};
use tui_2048::types::Direction;

fn busy_grid() -> Grid {
    Grid::from_rows(&[
        [2, 2, 4, 8],
        [0, 4, 4, 16],
        [8, 0, 8, 8],
        [2, 4, 0, 2],
    ])
    .unwrap()
}

fn bench_resolve(c: &mut Criterion) {
    let grid = busy_grid();
    let mut resolver = MoveResolver::new();

    c.bench_function("resolve_left", |b| {
        b.iter_batched_ref(
            || grid.clone(),
            |g| resolver.resolve(g, black_box(Direction::Left)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_terminal_check(c: &mut Criterion) {
    let stuck = Grid::from_rows(&[
        [2, 4, 2, 4],
        [4, 2, 4, 2],
        [2, 4, 2, 4],
        [4, 2, 4, 2],
    ])
    .unwrap();
    let mut resolver = MoveResolver::new();

    c.bench_function("terminal_check_stuck", |b| {
        b.iter(|| terminal::is_stuck(&mut resolver, black_box(&stuck)))
    });
}

fn bench_play_turn(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start();
    let mut dirs = Direction::ALL.into_iter().cycle();

    c.bench_function("play_turn", |b| {
        b.iter(|| {
            if state.is_over() {
                let _ = state.restart(None);
            }
            let dir = dirs.next().unwrap_or(Direction::Left);
            state.play(black_box(dir))
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut state = GameState::new(12345);
    state.start();
    let mut snap = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            state.snapshot_into(black_box(&mut snap));
        })
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_terminal_check,
    bench_play_turn,
    bench_snapshot
);
criterion_main!(benches);
