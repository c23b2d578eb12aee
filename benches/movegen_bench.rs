use criterion::{black_box, criterion_group, criterion_main, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use mytikas::core::{execute_turn, generate_turns, Position};
use mytikas::engine::{perft, random_turn};
use mytikas::utils::make_rng;

/// A crowded midgame position reached by seeded random play.
fn midgame() -> Position {
    let mut position = Position::initial();
    let mut rng = make_rng(Some(3));
    for _ in 0..16 {
        if position.is_almost_over() {
            break;
        }
        if let Some(turn) = random_turn(&position, &mut rng) {
            execute_turn(&mut position, &turn);
        }
    }
    position
}

fn movegen_benchmark(c: &mut Criterion) {
    let initial = Position::initial();
    let midgame = midgame();

    c.bench_function("generate_turns initial", |b| {
        b.iter(|| generate_turns(black_box(&initial)))
    });
    c.bench_function("generate_turns midgame", |b| {
        b.iter(|| generate_turns(black_box(&midgame)))
    });
    c.bench_function("perft 2", |b| b.iter(|| perft(black_box(&initial), 2)));
}

criterion_group! {
    name = benches;
    config = Criterion::default().with_profiler(PProfProfiler::new(100, Output::Flamegraph(None)));
    targets = movegen_benchmark
}
criterion_main!(benches);
