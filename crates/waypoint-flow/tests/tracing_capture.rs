#![forbid(unsafe_code)]

//! Structured logging emitted by the coordinator.
//!
//! Captures every event under a TRACE-level registry and checks the levels,
//! messages, fields and the `waypoint.command` parent span.
//!
//! Run:
//!   cargo test -p waypoint-flow --test tracing_capture

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use waypoint_flow::{Coordinator, Flow, Step};
use waypoint_geometry::Rect;

// ============================================================================
// Test Infrastructure
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: tracing::Level,
    message: String,
    fields: HashMap<String, String>,
    parent_span_name: Option<String>,
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

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);

        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned().unwrap_or_default();
        let parent_span_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
            parent_span_name,
        });
    }
}

fn with_captured_events<F: FnOnce()>(f: F) -> Vec<CapturedEvent> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::filter::LevelFilter::TRACE)
        .with(layer);
    tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    captured
}

fn find<'a>(events: &'a [CapturedEvent], message: &str) -> Option<&'a CapturedEvent> {
    events.iter().find(|event| event.message == message)
}

fn tour(n: usize) -> Flow {
    let steps = (0..n)
        .map(|i| Step::new(format!("s{i}"), format!("k{i}"), "title", "body"))
        .collect();
    Flow::new("onboarding", steps)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn start_logs_info_inside_command_span() {
    let events = with_captured_events(|| {
        let mut coordinator = Coordinator::new();
        coordinator.start_flow(tour(3));
    });

    let started = find(&events, "tour started").expect("tour started event");
    assert_eq!(started.level, tracing::Level::INFO);
    assert_eq!(started.fields.get("flow").map(String::as_str), Some("onboarding"));
    assert_eq!(started.fields.get("steps").map(String::as_str), Some("3"));
    assert_eq!(started.parent_span_name.as_deref(), Some("waypoint.command"));

    let step = find(&events, "step started").expect("step started event");
    assert_eq!(step.level, tracing::Level::DEBUG);
    assert_eq!(step.fields.get("step").map(String::as_str), Some("s0"));
}

#[test]
fn ignored_command_logs_debug() {
    let events = with_captured_events(|| {
        let mut coordinator = Coordinator::new();
        coordinator.next_step();
    });
    let ignored = find(&events, "command ignored").expect("command ignored event");
    assert_eq!(ignored.level, tracing::Level::DEBUG);
    assert_eq!(ignored.fields.get("command").map(String::as_str), Some("next"));
}

#[test]
fn completion_and_reset_are_logged() {
    let events = with_captured_events(|| {
        let mut coordinator = Coordinator::new();
        coordinator.start_flow(tour(1));
        coordinator.register_target_frame("k0", Rect::new(0.0, 0.0, 10.0, 10.0));
        coordinator.complete_tutorial();
        coordinator.advance(Duration::from_millis(500));
    });

    let completed = find(&events, "tour completed").expect("tour completed event");
    assert_eq!(completed.level, tracing::Level::INFO);
    assert!(find(&events, "deferred reset scheduled").is_some());
    let applied = find(&events, "deferred reset applied").expect("reset applied event");
    assert_eq!(applied.fields.get("cleared").map(String::as_str), Some("1"));
    assert!(find(&events, "target frame registered").is_some());
}

#[test]
fn stale_reset_is_logged_and_skipped() {
    let events = with_captured_events(|| {
        let mut coordinator = Coordinator::new();
        coordinator.start_flow(tour(1));
        coordinator.skip_tutorial();
        coordinator.start_flow(tour(2));
        coordinator.advance(Duration::from_secs(1));
    });

    let stale = find(&events, "stale deferred reset discarded").expect("stale reset event");
    assert_eq!(stale.fields.get("stale").map(String::as_str), Some("1"));
    assert_eq!(stale.fields.get("live").map(String::as_str), Some("2"));
    assert!(find(&events, "deferred reset applied").is_none());
}

#[test]
fn subscriber_propagation_is_traced() {
    let events = with_captured_events(|| {
        let mut coordinator = Coordinator::new();
        let _subscription = coordinator.subscribe(|_| {});
        coordinator.start_flow(tour(1));
    });
    let propagated = find(&events, "state change propagated").expect("propagation event");
    assert_eq!(propagated.level, tracing::Level::TRACE);
    assert_eq!(propagated.fields.get("subscribers").map(String::as_str), Some("1"));
}
