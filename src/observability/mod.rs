//! Observability for the querycast CLI
//!
//! Structured JSON-line logging of typed events. The parsing core never
//! logs; only the binary reports what it did.

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a typed event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
