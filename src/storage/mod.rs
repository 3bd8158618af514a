//! Persistence of scoring results and audit events

pub mod database;

use crate::error::Result;
use crate::processing::scorer::ScoreResult;
use crate::processing::verdict::Verdict;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use database::Database;

/// One scored resume as handed to a sink
#[derive(Debug, Clone, Copy)]
pub struct ResultRecord<'a> {
    pub resume_name: &'a str,
    pub jd_name: &'a str,
    pub score: &'a ScoreResult,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    JdUploaded,
    ResultSaved,
    ExtractionFailed,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::JdUploaded => "JD_UPLOADED",
            EventType::ResultSaved => "RESULT_SAVED",
            EventType::ExtractionFailed => "EXTRACTION_FAILED",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub event_type: EventType,
    pub item_name: String,
}

impl AuditEvent {
    pub fn new(event_type: EventType, item_name: impl Into<String>) -> Self {
        Self {
            event_type,
            item_name: item_name.into(),
        }
    }
}

/// Destination for results and audit events.
///
/// Callers never depend on what a sink does with a record; failures are
/// reported so they can be logged.
pub trait ResultSink {
    fn save_result(&self, record: &ResultRecord<'_>) -> Result<()>;
    fn log_event(&self, event: &AuditEvent) -> Result<()>;
}
