use criterion::{black_box, criterion_group, criterion_main, Criterion};
use match3::core::{apply_move, find_matches, get_all_valid_moves, Board, IdSource, SeededRng};
use match3::engine::{simulate_game_summary, GreedySolver, SimConfig};

fn dealt_board(seed: u32) -> Board {
    let mut ids = IdSource::default();
    let mut rng = SeededRng::new(seed);
    Board::generate(5, 8, &mut ids, &mut rng).unwrap()
}

fn bench_find_matches(c: &mut Criterion) {
    let board = dealt_board(12345);

    c.bench_function("find_matches_8x8", |b| {
        b.iter(|| find_matches(black_box(&board)))
    });
}

fn bench_valid_moves(c: &mut Criterion) {
    let board = dealt_board(12345);

    c.bench_function("valid_moves_8x8", |b| {
        b.iter(|| get_all_valid_moves(black_box(&board)))
    });
}

fn bench_cascade(c: &mut Criterion) {
    let board = dealt_board(12345);
    let mv = get_all_valid_moves(&board)[0];

    c.bench_function("apply_move_8x8", |b| {
        b.iter(|| {
            let mut ids = IdSource::new(1_000);
            let mut rng = SeededRng::new(7);
            apply_move(black_box(&board), mv.a, mv.b, 5, &mut ids, &mut rng)
        })
    });
}

fn bench_full_game(c: &mut Criterion) {
    let config = SimConfig::default();

    c.bench_function("greedy_game_20_turns", |b| {
        b.iter(|| simulate_game_summary(black_box(&config), 42, GreedySolver))
    });
}

criterion_group!(
    benches,
    bench_find_matches,
    bench_valid_moves,
    bench_cascade,
    bench_full_game
);
criterion_main!(benches);
