//! Benchmarks for host-driven stepping and replay.
//!
//! Run with: cargo bench -p driftfield-web --bench step_bench

use std::time::Duration;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use driftfield_core::event::{HostEvent, PointerEvent};
use driftfield_runtime::{EngineConfig, Theme};
use driftfield_web::session_record::{SessionRecorder, replay};
use driftfield_web::StepRunner;

const MS: u64 = 1_000_000;

fn bench_step(c: &mut Criterion) {
    c.bench_function("step/pointer_burst", |b| {
        let mut runner = StepRunner::new(EngineConfig::default(), 1920.0, 1080.0);
        runner.mount();
        runner.set_time(Duration::from_millis(100));
        runner.step();
        let mut i = 0u64;
        b.iter(|| {
            i += 1;
            for k in 0..8 {
                runner.pointer_move((i * 7 + k) as f64 % 1920.0, (i * 3) as f64 % 1080.0);
            }
            runner.advance_time(Duration::from_millis(16));
            black_box(runner.step())
        });
    });
}

fn bench_replay(c: &mut Criterion) {
    let mut recorder = SessionRecorder::new(EngineConfig::default(), 1920.0, 1080.0, Theme::Dark);
    recorder.init();
    for i in 0..120u64 {
        let ts = 100 * MS + i * 16 * MS;
        let event = HostEvent::PointerMove(PointerEvent::new(i as f64 * 15.0, 540.0));
        recorder.push_event(ts, event);
        recorder.advance_to(ts);
        recorder.step();
    }
    let trace = recorder.finish();

    c.bench_function("replay/120_frames", |b| {
        b.iter(|| black_box(replay(EngineConfig::default(), &trace)))
    });
}

criterion_group!(benches, bench_step, bench_replay);
criterion_main!(benches);
