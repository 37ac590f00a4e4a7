//! Perft benchmarks act both as performance and correctness tests.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use tabiya::chess::perft::perft;
use tabiya::chess::position::Position;

fn perft_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    for (position, depth, nodes) in &[
        // Position 1.
        (Position::starting(), 4, 197_281),
        // Position 2 ("kiwipete").
        (
            Position::from_fen(
                "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
            )
            .unwrap(),
            3,
            97_862,
        ),
        // Position 3.
        (
            Position::from_fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1").unwrap(),
            4,
            43_238,
        ),
        // Position 4.
        (
            Position::from_fen("r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1")
                .unwrap(),
            3,
            9_467,
        ),
        // Position 5.
        (
            Position::from_fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8")
                .unwrap(),
            3,
            62_379,
        ),
    ] {
        group.throughput(criterion::Throughput::Elements(*nodes));
        group.bench_with_input(
            BenchmarkId::new(
                "perft",
                format!("position {position}, depth {depth}, nodes {nodes}"),
            ),
            depth,
            |b, &depth| {
                b.iter(|| {
                    assert_eq!(perft(position, depth), *nodes);
                });
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = perft_group;
    config = Criterion::default().sample_size(10);
    targets = perft_bench
}

criterion_main!(perft_group);
