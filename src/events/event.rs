//! Diagnostic event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How serious an event is
///
/// Ordered: `Info < Warning < Error < Critical`, so embedders can filter
/// with a simple threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSeverity {
    /// Routine lifecycle progress
    Info,
    /// Something degraded but the session continues
    Warning,
    /// An operation failed
    Error,
    /// The session is faulted or an unrecoverable condition occurred
    Critical,
}

/// A structured diagnostic event
///
/// Immutable once constructed; created per occurrence and handed to every
/// registered observer, never retained by the dispatcher afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderEvent {
    /// When the event was created
    pub timestamp: DateTime<Utc>,

    /// Severity of the occurrence
    pub severity: EventSeverity,

    /// Stable diagnostic code (see [`crate::error::code`]); 0 for success
    pub code: i32,

    /// Human-readable summary
    pub message: String,

    /// Supplementary detail, empty when there is none
    pub details: String,
}

impl RecorderEvent {
    /// Create an event stamped with the current time
    pub fn new(
        severity: EventSeverity,
        code: i32,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            code,
            message: message.into(),
            details: details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(EventSeverity::Info < EventSeverity::Warning);
        assert!(EventSeverity::Warning < EventSeverity::Error);
        assert!(EventSeverity::Error < EventSeverity::Critical);
    }

    #[test]
    fn test_event_serializes_camel_case() {
        let event = RecorderEvent::new(EventSeverity::Warning, 304, "Engine failure", "");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["severity"], "warning");
        assert_eq!(json["code"], 304);
        assert!(json.get("timestamp").is_some());
    }
}
