#![forbid(unsafe_code)]

//! Tracing instrumentation tests.
//!
//! Spans and events enabled:
//!   cargo test -p recyclist-list --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p recyclist-list --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use recyclist_list::{ListConfig, RecyclingList, ScrollMetrics};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span or event with its fields.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct Captured {
    name: String,
    level: tracing::Level,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A tracing Layer that captures spans and events.
struct Capture {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

struct CaptureHandle {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<Captured> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn events(&self) -> Vec<Captured> {
        self.events.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn messages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.fields.get("message").cloned())
            .collect()
    }
}

/// Visitor that extracts fields.
struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());
        self.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            level: *attrs.metadata().level(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let parent_name = ctx
            .event_span(event)
            .map(|span_ref| span_ref.name().to_string());
        self.events.lock().unwrap().push(Captured {
            name: event.metadata().name().to_string(),
            level: *event.metadata().level(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }
}

fn with_captured<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = Capture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

fn scrolled_list() -> RecyclingList<u64, ()> {
    let mut list = RecyclingList::new(ListConfig::new().with_capacity(4), ());
    list.append(0..20);
    list
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn scroll_opens_a_span_per_event() {
    let handle = with_captured(|| {
        let mut list = scrolled_list();
        for top in [20.0, 40.0, 0.0] {
            let _ = list.on_scroll(ScrollMetrics::new(top, 40.0, 20.0));
        }
    });

    let scroll_spans: Vec<_> = handle
        .spans()
        .into_iter()
        .filter(|s| s.name == "list_scroll")
        .collect();
    assert_eq!(scroll_spans.len(), 3);
    assert!(
        scroll_spans.iter().all(|s| s.fields.contains_key("scroll_top")),
        "scroll spans carry the scroll position: {scroll_spans:?}"
    );
}

#[test]
#[cfg(feature = "tracing")]
fn compaction_events_are_nested_in_scroll_span() {
    let handle = with_captured(|| {
        let mut list = scrolled_list();
        let _ = list.on_scroll(ScrollMetrics::new(100.0, 40.0, 20.0));
        let _ = list.on_scroll(ScrollMetrics::new(0.0, 40.0, 20.0));
    });

    let events = handle.events();
    let tail = events
        .iter()
        .find(|e| e.fields.get("message").is_some_and(|m| m == "compacted toward tail"))
        .expect("tail compaction logged");
    assert_eq!(tail.level, tracing::Level::DEBUG);
    assert_eq!(tail.parent_name.as_deref(), Some("list_scroll"));
    assert_eq!(tail.fields.get("moved").map(String::as_str), Some("5"));

    assert!(
        handle
            .messages()
            .iter()
            .any(|m| m == "compacted toward head")
    );
}

#[test]
#[cfg(feature = "tracing")]
fn failed_page_is_a_warning() {
    let handle = with_captured(|| {
        let mut list: RecyclingList<u64, ()> =
            RecyclingList::new(ListConfig::new().with_capacity(4), ());
        list.append(0..4);
        let request = list
            .on_scroll(ScrollMetrics::new(0.0, 100.0, 20.0))
            .load
            .expect("load issued");
        let _ = list.complete_load(request, Err(recyclist_list::FetchError::Timeout));
    });

    let warnings: Vec<_> = handle
        .events()
        .into_iter()
        .filter(|e| e.level == tracing::Level::WARN)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(
        warnings[0].fields.get("error").map(String::as_str),
        Some("provider timed out")
    );
}

#[test]
fn zero_overhead_without_subscriber() {
    let mut list = scrolled_list();
    let outcome = list.on_scroll(ScrollMetrics::new(60.0, 40.0, 20.0));
    assert_eq!(outcome.to_tail, 3);
    assert_eq!(list.window().range(), 3..7);
}

#[test]
fn zero_overhead_capture_is_empty_when_nothing_happens() {
    let handle = with_captured(|| {
        let mut list: RecyclingList<u64, ()> = RecyclingList::new(ListConfig::new(), ());
        let _ = list.on_scroll(ScrollMetrics::new(0.0, 40.0, 20.0));
    });
    assert!(handle.spans().iter().all(|s| s.name != "list_scroll"));
}
