//! Error types and stable diagnostic codes
//!
//! Every failure the control core reports belongs to one of three classes,
//! each owning a range of stable integer codes so embedders can transmit
//! them across process boundaries without string matching.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::EventSeverity;

/// Stable diagnostic codes, partitioned by error class.
///
/// `0` marks success, `1xx` configuration faults, `2xx` operational
/// (state-machine misuse) faults, `3xx` system/environment faults.
pub mod code {
    /// Operation completed; carried by Info events
    pub const OK: i32 = 0;

    /// Resolution dimensions not positive
    pub const INVALID_RESOLUTION: i32 = 101;
    /// Bitrate not positive
    pub const INVALID_BITRATE: i32 = 102;
    /// Framerate not positive
    pub const INVALID_FRAMERATE: i32 = 103;

    /// Start requested while a session is active
    pub const ALREADY_RECORDING: i32 = 201;
    /// Pause/resume/stop requested without an active session
    pub const NOT_RECORDING: i32 = 202;
    /// Output path cannot be written
    pub const FILE_ACCESS_DENIED: i32 = 203;
    /// Session is faulted and must be stopped before a new start
    pub const SESSION_FAULTED: i32 = 204;
    /// Resolution/framerate changes are rejected mid-session
    pub const CONFIG_LOCKED: i32 = 205;

    /// Encoding engine failed to initialize
    pub const ENGINE_INIT_FAILED: i32 = 301;
    /// Hardware acceleration unavailable or failed
    pub const ACCELERATION_FAILED: i32 = 302;
    /// Resource allocation failed
    pub const ALLOCATION_FAILED: i32 = 303;
    /// Encoding engine failed mid-session
    pub const ENGINE_FAILURE: i32 = 304;
    /// An observer panicked during event dispatch
    pub const OBSERVER_PANIC: i32 = 305;
}

/// Broad classification of a failure, used for severity mapping and
/// code-range partitioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorClass {
    /// Caller supplied an invalid value; retry with valid input
    Configuration,
    /// Caller misused the state machine; query state first
    Operational,
    /// Environment or resource fault; may not be recoverable
    System,
}

/// Control-core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("Invalid resolution: {width}x{height}")]
    InvalidResolution { width: i32, height: i32 },

    #[error("Invalid bitrate: {0} kbps")]
    InvalidBitrate(i32),

    #[error("Invalid framerate: {0} fps")]
    InvalidFramerate(i32),

    #[error("Already recording")]
    AlreadyRecording,

    #[error("Not recording")]
    NotRecording,

    #[error("File access denied: {0}")]
    FileAccessDenied(String),

    #[error("Session faulted; stop it before starting again")]
    SessionFaulted,

    #[error("Configuration is locked while a session is active: {0}")]
    ConfigLocked(String),

    #[error("Engine initialization failed: {0}")]
    EngineInit(String),

    #[error("Hardware acceleration failed: {0}")]
    Acceleration(String),

    #[error("Allocation failed: {0}")]
    Allocation(String),

    #[error("Engine failure: {0}")]
    EngineFailure(String),
}

impl RecorderError {
    /// Stable diagnostic code for this error
    pub fn code(&self) -> i32 {
        match self {
            RecorderError::InvalidResolution { .. } => code::INVALID_RESOLUTION,
            RecorderError::InvalidBitrate(_) => code::INVALID_BITRATE,
            RecorderError::InvalidFramerate(_) => code::INVALID_FRAMERATE,
            RecorderError::AlreadyRecording => code::ALREADY_RECORDING,
            RecorderError::NotRecording => code::NOT_RECORDING,
            RecorderError::FileAccessDenied(_) => code::FILE_ACCESS_DENIED,
            RecorderError::SessionFaulted => code::SESSION_FAULTED,
            RecorderError::ConfigLocked(_) => code::CONFIG_LOCKED,
            RecorderError::EngineInit(_) => code::ENGINE_INIT_FAILED,
            RecorderError::Acceleration(_) => code::ACCELERATION_FAILED,
            RecorderError::Allocation(_) => code::ALLOCATION_FAILED,
            RecorderError::EngineFailure(_) => code::ENGINE_FAILURE,
        }
    }

    /// Class this error belongs to, derived from its code range
    pub fn class(&self) -> ErrorClass {
        match self.code() {
            100..=199 => ErrorClass::Configuration,
            200..=299 => ErrorClass::Operational,
            _ => ErrorClass::System,
        }
    }

    /// Default severity when this error is reported as an event
    ///
    /// System faults are Critical; everything else is Error. Call sites
    /// that want a softer report (the live-bitrate rejection path emits
    /// Warning) pick the severity explicitly.
    pub fn severity(&self) -> EventSeverity {
        match self.class() {
            ErrorClass::System => EventSeverity::Critical,
            _ => EventSeverity::Error,
        }
    }
}

/// Result type alias using RecorderError
pub type RecorderResult<T> = Result<T, RecorderError>;
