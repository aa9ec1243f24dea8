//! Recording state and session tracking
//!
//! Defines the lifecycle state enum and the per-segment session records.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current state of the recording lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// No recording in progress
    Idle,
    /// Currently recording
    Recording,
    /// Recording is paused
    Paused,
    /// Recording finished; a new start is accepted
    Stopped,
    /// An internal fault occurred; stop() is required before a new start
    Faulted,
}

impl RecordingState {
    /// Whether a session is active (recording or paused)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// One recorded segment of a session
///
/// A new segment is created each time recording is paused and resumed;
/// total recorded duration is the sum of segments, excluding paused spans.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingSession {
    /// Segment index (0, 1, 2, ...)
    pub index: usize,

    /// Duration of this segment in milliseconds
    pub duration_ms: f64,

    /// Session time when the segment started (relative to start())
    pub session_time_start_ms: f64,

    /// Session time when the segment ended
    pub session_time_end_ms: f64,

    /// Unix timestamp when the segment started
    pub unix_start_ms: u64,

    /// Unix timestamp when the segment ended
    pub unix_end_ms: u64,
}

impl RecordingSession {
    /// Create a new segment starting now
    pub fn new(index: usize, session_time_ms: f64) -> Self {
        let now = Utc::now();
        Self {
            index,
            duration_ms: 0.0,
            session_time_start_ms: session_time_ms,
            session_time_end_ms: session_time_ms,
            unix_start_ms: now.timestamp_millis() as u64,
            unix_end_ms: now.timestamp_millis() as u64,
        }
    }

    /// End the segment
    pub fn end(&mut self, session_time_ms: f64) {
        self.session_time_end_ms = session_time_ms;
        self.duration_ms = self.session_time_end_ms - self.session_time_start_ms;
        self.unix_end_ms = Utc::now().timestamp_millis() as u64;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RecordingState::Faulted).unwrap(),
            "\"faulted\""
        );
        assert_eq!(RecordingState::default(), RecordingState::Idle);
    }

    #[test]
    fn test_active_states() {
        assert!(RecordingState::Recording.is_active());
        assert!(RecordingState::Paused.is_active());
        assert!(!RecordingState::Idle.is_active());
        assert!(!RecordingState::Stopped.is_active());
        assert!(!RecordingState::Faulted.is_active());
    }

    #[test]
    fn test_segment_duration() {
        let mut segment = RecordingSession::new(1, 1000.0);
        segment.end(3500.0);
        assert_eq!(segment.duration_ms, 2500.0);
        assert!(segment.unix_end_ms >= segment.unix_start_ms);
    }
}
