//! Event handling throughput: decision plan vs tree walk, ignored vs applied.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tabletop_engine::conditions::{DestinationIsEmpty, EventCondition, PathIsClear, PieceOwnedByActivePlayer};
use tabletop_engine::game::{GameBuilder, PatternDefinition, PhaseDefinition, PieceDefinition};
use tabletop_engine::rules::{EndTurnEvent, EventRule, MovePiece, MovePieceEvent, NextActivePlayer, RollDiceEvent};
use tabletop_engine::{EngineConfig, GameProgress};

const SIZE: usize = 8;

fn tile(file: usize, rank: usize) -> String {
    format!("{}{}", (b'a' + file as u8) as char, rank + 1)
}

/// 8x8 board, one rook per player, a move phase and a pass phase.
fn game(config: EngineConfig) -> GameProgress {
    let mut builder = GameBuilder::new();
    builder.with_config(config);
    for direction in ["north", "south", "east", "west"] {
        builder.add_direction(direction);
    }
    for file in 0..SIZE {
        for rank in 0..SIZE {
            builder.add_tile(tile(file, rank));
        }
    }
    for file in 0..SIZE {
        for rank in 0..SIZE {
            if rank + 1 < SIZE {
                builder.add_relation(tile(file, rank), tile(file, rank + 1), "north");
                builder.add_relation(tile(file, rank + 1), tile(file, rank), "south");
            }
            if file + 1 < SIZE {
                builder.add_relation(tile(file, rank), tile(file + 1, rank), "east");
                builder.add_relation(tile(file + 1, rank), tile(file, rank), "west");
            }
        }
    }

    let rook = PatternDefinition::directions(["north", "south", "east", "west"]).repeatable();
    builder
        .add_player("white")
        .add_player("black")
        .with_active_player("white")
        .add_piece(PieceDefinition::new("white-rook").owned_by("white").with_pattern(rook.clone()))
        .add_piece(PieceDefinition::new("black-rook").owned_by("black").with_pattern(rook))
        .with_piece_at("white-rook", "a1")
        .with_piece_at("black-rook", "h8")
        .add_phase(PhaseDefinition::leaf(
            "move",
            EventRule::on::<MovePieceEvent>("move")
                .when(EventCondition::predicate(PieceOwnedByActivePlayer))
                .when(EventCondition::predicate(PathIsClear))
                .when(EventCondition::predicate(DestinationIsEmpty))
                .then(MovePiece),
        ))
        .add_phase(PhaseDefinition::leaf(
            "pass",
            EventRule::on::<EndTurnEvent>("pass").then(NextActivePlayer),
        ));
    builder.compile().expect("benchmark game compiles")
}

fn configs() -> [(&'static str, EngineConfig); 3] {
    [
        ("plan", EngineConfig::new()),
        ("plan-unindexed", EngineConfig::new().without_event_type_index()),
        ("tree-walk", EngineConfig::new().tree_walk()),
    ]
}

fn bench_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_piece");
    for (name, config) in configs() {
        let progress = game(config);
        let mv = progress
            .engine()
            .move_event(progress.state(), &"white-rook".into(), &"a8".into())
            .expect("rook reaches a8");
        group.bench_with_input(BenchmarkId::from_parameter(name), &mv, |b, mv| {
            b.iter(|| progress.handle_event(black_box(mv.clone())).expect("legal move"))
        });
    }
    group.finish();
}

fn bench_ignored(c: &mut Criterion) {
    let mut group = c.benchmark_group("ignored_event");
    for (name, config) in configs() {
        let progress = game(config);
        group.bench_function(name, |b| {
            b.iter(|| progress.handle_event(black_box(RollDiceEvent::new())).expect("ignored"))
        });
    }
    group.finish();
}

fn bench_resolve_path(c: &mut Criterion) {
    let progress = game(EngineConfig::new());
    let engine = progress.engine();
    c.bench_function("resolve_path", |b| {
        b.iter(|| engine.resolve_path(&"white-rook".into(), black_box(&"a1".into()), black_box(&"h1".into())))
    });
}

criterion_group!(benches, bench_move, bench_ignored, bench_resolve_path);
criterion_main!(benches);
