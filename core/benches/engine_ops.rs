use criterion::{criterion_group, criterion_main, Criterion};
use kulki_core::{find_path, matched_runs, BallColor, Board};
use std::hint::black_box;

/// Serpentine wall layout: the longest route a 9x9 board can force.
fn serpentine_board() -> Board {
    let mut board = Board::new((9, 9));
    for x in (1..9).step_by(2) {
        let gap = if (x / 2) % 2 == 0 { 8 } else { 0 };
        for y in 0..9 {
            if y != gap {
                board.set((x, y), Some(BallColor::Blue)).unwrap();
            }
        }
    }
    board
}

fn striped_board() -> Board {
    let mut board = Board::new((9, 9));
    for y in 0..9 {
        for x in 0..9 {
            let color = if y % 2 == 0 {
                BallColor::Red
            } else {
                BallColor::Green
            };
            board.set((x, y), Some(color)).unwrap();
        }
    }
    board
}

fn bench_find_path(c: &mut Criterion) {
    let board = serpentine_board();
    c.bench_function("find_path serpentine 9x9", |b| {
        b.iter(|| find_path(black_box(&board), (0, 0), (8, 8)))
    });
}

fn bench_matched_runs(c: &mut Criterion) {
    let board = striped_board();
    c.bench_function("matched_runs striped 9x9", |b| {
        b.iter(|| matched_runs(black_box(&board), (4, 4), 5))
    });
}

criterion_group!(benches, bench_find_path, bench_matched_runs);
criterion_main!(benches);
