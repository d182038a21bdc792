//! Observable store events

use std::fmt;

use super::logger::Severity;

/// Events emitted by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    StoreOpened,
    ConfigLoaded,

    // Queries
    /// Find, count or for-each completed
    QueryExecuted,
    /// Query aborted with an error
    QueryFailed,
    /// Candidates were read through a secondary index
    IndexScan,

    // Matching mutations
    UpdateMatching,
    DeleteMatching,
    /// A write transaction was discarded after a failure
    TransactionRolledBack,

    /// Stored bytes failed validation (FATAL)
    DataCorruption,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::StoreOpened => "STORE_OPENED",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryFailed => "QUERY_FAILED",
            Event::IndexScan => "INDEX_SCAN",
            Event::UpdateMatching => "UPDATE_MATCHING",
            Event::DeleteMatching => "DELETE_MATCHING",
            Event::TransactionRolledBack => "TRANSACTION_ROLLED_BACK",
            Event::DataCorruption => "DATA_CORRUPTION",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::QueryExecuted | Event::IndexScan => Severity::Trace,
            Event::StoreOpened
            | Event::ConfigLoaded
            | Event::UpdateMatching
            | Event::DeleteMatching => Severity::Info,
            Event::TransactionRolledBack => Severity::Warn,
            Event::QueryFailed => Severity::Error,
            Event::DataCorruption => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
