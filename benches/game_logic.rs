use criterion::{black_box, criterion_group, criterion_main, Criterion};

use blockfall::core::{GameEngine, Board, Piece};
use blockfall::types::{Direction, PieceKind, BOARD_WIDTH};

fn bench_tick(c: &mut Criterion) {
    let mut engine = GameEngine::new(12345);
    engine.start_game();

    c.bench_function("gravity_tick_16ms", |b| {
        b.iter(|| {
            engine.tick(black_box(16));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_rows", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in 26..30 {
                for x in 0..BOARD_WIDTH as i8 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            board.clear_full_rows()
        })
    });
}

fn bench_collision(c: &mut Criterion) {
    let engine = GameEngine::new(12345);
    let piece = Piece::spawn(PieceKind::T);

    c.bench_function("is_collision", |b| {
        b.iter(|| engine.is_collision(black_box(&piece), 0, 1))
    });
}

fn bench_move(c: &mut Criterion) {
    let mut engine = GameEngine::new(12345);

    c.bench_function("move_piece", |b| {
        b.iter(|| {
            engine.move_piece(black_box(Direction::Right));
            engine.move_piece(black_box(Direction::Left));
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            let mut engine = GameEngine::new(black_box(7));
            engine.hard_drop();
        })
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_line_clear,
    bench_collision,
    bench_move,
    bench_hard_drop
);
criterion_main!(benches);
