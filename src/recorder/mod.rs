//! Recording control module
//!
//! This module implements the session lifecycle:
//! - RecordingStateMachine owning the state and validated transitions
//! - RecordingState / RecordingSession tracking
//! - Recorder, the facade external callers use

pub mod facade;
pub mod machine;
pub mod state;

pub use facade::Recorder;
pub use machine::RecordingStateMachine;
pub use state::{RecordingSession, RecordingState};
