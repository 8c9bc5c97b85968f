#![forbid(unsafe_code)]
#![cfg(feature = "tracing")]

//! Listener registration traces from the host window.
//!
//! Run:
//!   cargo test -p driftfield-web --features tracing --test tracing_listeners

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use driftfield_runtime::EngineConfig;
use driftfield_web::StepRunner;
use pretty_assertions::assert_eq;
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    message: String,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let mut fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.remove("message").unwrap_or_default();
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            message,
            fields,
        });
    }
}

fn capture<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(EventCapture {
        events: events.clone(),
    });
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn web_events(events: &[CapturedEvent], message: &str) -> Vec<CapturedEvent> {
    events
        .iter()
        .filter(|e| e.target == "driftfield.web" && e.message == message)
        .cloned()
        .collect()
}

#[test]
fn mount_and_unmount_trace_each_listener() {
    let events = capture(|| {
        let mut runner = StepRunner::new(EngineConfig::default(), 1280.0, 720.0);
        runner.mount();
        runner.unmount();
    });

    let added = web_events(&events, "listener added");
    let removed = web_events(&events, "listener removed");
    assert_eq!(added.len(), 2);
    assert_eq!(removed.len(), 2);

    let mut added_ids: Vec<&str> = added.iter().map(|e| e.fields["id"].as_str()).collect();
    let mut removed_ids: Vec<&str> = removed.iter().map(|e| e.fields["id"].as_str()).collect();
    added_ids.sort_unstable();
    removed_ids.sort_unstable();
    assert_eq!(added_ids, removed_ids);
    assert!(removed.iter().all(|e| e.fields["removed"] == "true"));
}

#[test]
fn drop_after_unmount_removes_nothing_more() {
    let events = capture(|| {
        let mut runner = StepRunner::new(EngineConfig::default(), 800.0, 600.0);
        runner.mount();
        runner.unmount();
        drop(runner);
    });
    assert_eq!(web_events(&events, "listener removed").len(), 2);
}
