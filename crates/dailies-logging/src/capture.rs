//! In-memory capture of tracing events for tests.
//!
//! Controller failures degrade to empty state and are only visible in the
//! log stream, so tests assert on what was logged through [`capture_logs`].
//! Fields are kept as their display text: `task_id = %id` is recorded as
//! `"7"`, `slot = ?slot` as `"Tasks"`.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

struct Record {
    level: Level,
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Record {
    fn matches(&self, level: Level, message_contains: &str) -> bool {
        self.level == level && self.message.contains(message_contains)
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    fn record(&mut self, field: &Field, value: String) {
        match field.name() {
            "message" => self.message = value,
            name => self.fields.push((name, value)),
        }
    }
}

impl Visit for Record {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.record(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record(field, format!("{value:?}"));
    }
}

/// Events captured on the current thread since [`capture_logs`] was called.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<Record>>>);

impl CapturedLogs {
    /// Whether any event at `level` has a message containing
    /// `message_contains`.
    pub fn has_event(&self, level: Level, message_contains: &str) -> bool {
        self.0
            .lock()
            .iter()
            .any(|r| r.matches(level, message_contains))
    }

    /// Like [`has_event`](Self::has_event), additionally requiring the event
    /// to carry `field` with exactly the given display text, e.g.
    /// `("task_id", "11")` or `("slot", "Versions")`.
    pub fn has_event_with(
        &self,
        level: Level,
        message_contains: &str,
        (field, value): (&str, &str),
    ) -> bool {
        self.0
            .lock()
            .iter()
            .any(|r| r.matches(level, message_contains) && r.field(field) == Some(value))
    }
}

struct CaptureLayer(CapturedLogs);

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut record = Record {
            level: *event.metadata().level(),
            message: String::new(),
            fields: Vec::new(),
        };
        event.record(&mut record);
        self.0.0.lock().push(record);
    }
}

/// Install a capturing subscriber for the current thread.
///
/// Applies only to the current thread, so parallel tests do not see each
/// other. Under `#[tokio::test]` (current-thread runtime) every task of the
/// test is captured. Keep the guard alive for the whole test.
pub fn capture_logs() -> (CapturedLogs, tracing::subscriber::DefaultGuard) {
    let logs = CapturedLogs::default();
    let guard = tracing_subscriber::registry()
        .with(CaptureLayer(logs.clone()))
        .set_default();
    (logs, guard)
}
