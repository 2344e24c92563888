//! End-to-end session benchmarks: submit, replay every tick, render.
//!
//! Run with: cargo bench -p dsviz-orchestrator-core --bench session_replay

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;

use dsviz_animation_core::Config;
use dsviz_api_core::StructureKind;
use dsviz_orchestrator::{InputForm, Session};

fn drain(session: &mut Session) {
    while session.is_busy() {
        black_box(session.update(Duration::from_secs(5)));
    }
}

fn submit(session: &mut Session, kind: StructureKind, op: &str, form: InputForm) {
    if session.submit(kind, op, &form).is_ok() {
        drain(session);
    }
}

fn bench_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    let recorded: serde_json::Value =
        dsviz_test_fixtures::sessions::load("avl-10-20-30").unwrap_or_default();
    let keys: Vec<i64> = recorded["operations"]
        .as_array()
        .map(|ops| ops.iter().filter_map(|op| op["value"].as_i64()).collect())
        .unwrap_or_default();
    group.bench_function("avl_fixture", |b| {
        b.iter(|| {
            let mut s = Session::with_reference_engine(Config::default());
            submit(&mut s, StructureKind::Tree, "init", InputForm::new());
            for k in &keys {
                submit(&mut s, StructureKind::Tree, "insert", InputForm::new().with("value", k));
            }
            black_box(s.frame())
        })
    });

    for n in [16usize, 64] {
        group.bench_with_input(BenchmarkId::new("dijkstra_ring", n), &n, |b, &n| {
            b.iter(|| {
                let mut s = Session::with_reference_engine(Config::default());
                let g = StructureKind::Graph;
                submit(&mut s, g, "init", InputForm::new().with("vertices", n));
                for v in 0..n {
                    let form = InputForm::new()
                        .with("from", v)
                        .with("to", (v + 1) % n)
                        .with("weight", v % 7 + 1);
                    submit(&mut s, g, "add_edge", form);
                }
                submit(&mut s, g, "dijkstra", InputForm::new().with("start", 0));
                black_box(s.frame_for(g))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sessions);
criterion_main!(benches);
