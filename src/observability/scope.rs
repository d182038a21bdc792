//! Scoped begin/complete logging
//!
//! - Logs `{name}_BEGIN` at TRACE on creation
//! - Logs `{name}_COMPLETE` at INFO on `complete`
//! - Logs `{name}_FAILED` at ERROR (or FATAL) on `fail`
//! - Logs `{name}_INCOMPLETE` at WARN if dropped unfinished

use std::time::Instant;

use super::logger::{Logger, Severity};

/// Observes one operation from begin to completion or failure
///
/// ```ignore
/// let scope = ObservationScope::new("UPDATE_MATCHING", &[("bucket", "ItemTest")]);
/// // ... do work ...
/// scope.complete(&[("updated", "3")]);
/// ```
pub struct ObservationScope<'a> {
    name: &'a str,
    fields: Vec<(&'a str, String)>,
    started: Instant,
    finished: bool,
}

impl<'a> ObservationScope<'a> {
    pub fn new(name: &'a str, fields: &[(&'a str, &str)]) -> Self {
        Logger::trace(&format!("{}_BEGIN", name), fields);
        Self {
            name,
            fields: fields.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            started: Instant::now(),
            finished: false,
        }
    }

    /// Logs completion with the scope fields plus `extra` and elapsed time
    pub fn complete(mut self, extra: &[(&str, &str)]) {
        self.finished = true;
        self.finish(Severity::Info, "COMPLETE", extra);
    }

    /// Logs failure; fatal errors are logged at FATAL
    pub fn fail(mut self, reason: &str, fatal: bool) {
        self.finished = true;
        let severity = if fatal { Severity::Fatal } else { Severity::Error };
        self.finish(severity, "FAILED", &[("reason", reason)]);
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn finish(&self, severity: Severity, suffix: &str, extra: &[(&str, &str)]) {
        let elapsed = self.started.elapsed().as_micros().to_string();
        let mut fields: Vec<(&str, &str)> =
            self.fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
        fields.extend(extra.iter().copied());
        fields.push(("elapsed_us", elapsed.as_str()));
        Logger::log(severity, &format!("{}_{}", self.name, suffix), &fields);
    }
}

impl Drop for ObservationScope<'_> {
    fn drop(&mut self) {
        if !self.finished {
            Logger::warn(
                &format!("{}_INCOMPLETE", self.name),
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
