use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;

/// Installs the global subscriber: stderr output plus an in-memory buffer of
/// recent events. `RUST_LOG` overrides the verbosity flag.
pub fn init(verbose: u8, buffer: LogBuffer) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(LogLayer::new(buffer))
        .try_init();
}

pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[derive(Clone, Debug)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: Level,
    pub target: String,
    pub fields: Vec<(String, String)>,
}

impl LogEntry {
    pub fn format_compact(&self) -> String {
        let message = self
            .fields
            .iter()
            .find(|(name, _)| name == "message")
            .map(|(_, value)| value.as_str())
            .unwrap_or("");
        let mut extras: Vec<String> = self
            .fields
            .iter()
            .filter(|(name, _)| name != "message")
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        extras.sort();
        let head = format!("{} {:<5} {} {}", self.timestamp, self.level, self.target, message);
        if extras.is_empty() {
            head
        } else {
            format!("{head} | {}", extras.join(" "))
        }
    }
}

/// Bounded ring of recent events, shown by the `:log` command.
#[derive(Clone)]
pub struct LogBuffer {
    entries: Arc<Mutex<VecDeque<LogEntry>>>,
    max_entries: usize,
}

impl LogBuffer {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(Mutex::new(VecDeque::new())),
            max_entries,
        }
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn push(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push_back(entry);
            while entries.len() > self.max_entries {
                entries.pop_front();
            }
        }
    }
}

struct LogLayer {
    buffer: LogBuffer,
}

impl LogLayer {
    fn new(buffer: LogBuffer) -> Self {
        Self { buffer }
    }
}

impl<S> Layer<S> for LogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        self.buffer.push(LogEntry {
            timestamp: format_timestamp(OffsetDateTime::now_utc()),
            level: *metadata.level(),
            target: metadata.target().to_string(),
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    fields: Vec<(String, String)>,
}

impl tracing::field::Visit for FieldVisitor {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.fields.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn Debug) {
        self.fields.push((field.name().to_string(), format!("{value:?}")));
    }
}

fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(format_description!("[hour repr:24]:[minute]:[second]"))
        .unwrap_or_else(|_| timestamp.unix_timestamp().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_compact_includes_fields() {
        let entry = LogEntry {
            timestamp: "12:34:56".to_string(),
            level: Level::WARN,
            target: "picker_core::search".to_string(),
            fields: vec![
                ("message".to_string(), "repository search failed".to_string()),
                ("key".to_string(), "octo".to_string()),
            ],
        };
        let formatted = entry.format_compact();
        assert!(formatted.starts_with("12:34:56"));
        assert!(formatted.contains("WARN"));
        assert!(formatted.contains("picker_core::search repository search failed"));
        assert!(formatted.ends_with("| key=octo"));
    }

    #[test]
    fn buffer_keeps_most_recent_entries() {
        let buffer = LogBuffer::new(2);
        let subscriber = tracing_subscriber::registry().with(LogLayer::new(buffer.clone()));
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(n = 1, "first");
            tracing::warn!(n = 2, "second");
            tracing::warn!(n = 3, "third");
        });
        let messages: Vec<String> = buffer
            .entries()
            .iter()
            .filter_map(|entry| {
                entry
                    .fields
                    .iter()
                    .find(|(name, _)| name == "message")
                    .map(|(_, value)| value.clone())
            })
            .collect();
        assert_eq!(messages, vec!["second".to_string(), "third".to_string()]);
    }

    #[test]
    fn verbosity_maps_to_directive() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(2), "debug");
        assert_eq!(default_directive(9), "trace");
    }
}
