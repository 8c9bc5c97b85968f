//! Benchmarks for per-frame evaluation cost.
//!
//! Run with: cargo bench -p driftfield-runtime --bench frame_bench
//!
//! Measures one full frame (sample poll, field evaluation for every element,
//! spring integration, composition) at the stock 44 elements and with a dense
//! star field.

use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use driftfield_core::event::{EventKind, HostEvent, PointerEvent};
use driftfield_runtime::{EngineConfig, EventHost, FieldEngine, Listener, ListenerId};

/// Minimal host that forwards events straight to its listeners.
#[derive(Default)]
struct BenchHost {
    listeners: Vec<(ListenerId, EventKind, Listener)>,
}

impl BenchHost {
    fn pointer(&mut self, x: f64, y: f64, now: Duration) {
        let event = HostEvent::PointerMove(PointerEvent::new(x, y));
        for (_, kind, listener) in &mut self.listeners {
            if *kind == EventKind::PointerMove {
                listener(&event, now);
            }
        }
    }
}

impl EventHost for BenchHost {
    fn add_listener(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        let id = ListenerId(self.listeners.len() as u64 + 1);
        self.listeners.push((id, kind, listener));
        id
    }

    fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _, _)| *lid != id);
        before != self.listeners.len()
    }

    fn viewport_size(&self) -> (f64, f64) {
        (1920.0, 1080.0)
    }
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for stars in [30usize, 300] {
        let mut config = EngineConfig::default();
        config.stars.count = stars;

        group.bench_with_input(BenchmarkId::new("moving_pointer", stars), &config, |b, config| {
            let mut host = BenchHost::default();
            let mut engine = FieldEngine::new(config.clone());
            engine.mount(&mut host, Duration::ZERO);
            let mut t = Duration::from_millis(100);
            let mut x = 0.0;
            b.iter(|| {
                x = (x + 7.0) % 1920.0;
                host.pointer(x, 540.0, t);
                let frame = engine.frame(t);
                t += Duration::from_millis(16);
                black_box(frame)
            });
            engine.unmount(&mut host);
        });
    }

    group.finish();
}

criterion_group!(benches, bench_frame);
criterion_main!(benches);
