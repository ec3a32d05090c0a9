//! Observable events of the querycast CLI

use std::fmt;

use super::logger::Severity;

/// Events logged while handling one CLI invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Parser configuration loaded and validated
    ConfigLoaded,
    /// Request received, parsing begins
    ParseStart,
    /// Query options assembled
    ParseComplete,
    /// Request rejected with a query error
    ParseRejected,
    /// Single token typed
    CastComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ParseStart => "PARSE_BEGIN",
            Event::ParseComplete => "PARSE_COMPLETE",
            Event::ParseRejected => "PARSE_REJECTED",
            Event::CastComplete => "CAST_COMPLETE",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::ParseStart => Severity::Trace,
            Event::ParseRejected => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
