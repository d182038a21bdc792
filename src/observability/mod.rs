//! Observability
//!
//! - Structured logging (JSON lines)
//! - Atomic counters per store
//! - Typed store events
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. Logging never fails an operation
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use structhold::observability::{log_event, Event, Logger, Severity};
//!
//! Logger::set_min_severity(Severity::Trace);
//! log_event(Event::QueryExecuted, &[("bucket", "ItemTest"), ("matched", "7")]);
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::ObservationScope;

/// Logs an event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
