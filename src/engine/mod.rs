//! Encoding engine contract
//!
//! The control core never captures or compresses anything itself; it drives
//! an external engine through this lifecycle trait and treats the engine as
//! authoritative on what it can do (notably live bitrate changes).

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Configuration;
use crate::error::RecorderResult;

/// Opaque handle identifying one initialized engine session
///
/// Minted by the engine from [`EncodingEngine::init`] and passed back on
/// every subsequent call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngineHandle {
    id: Uuid,
}

impl EngineHandle {
    /// Mint a fresh handle; called by engine implementations
    pub fn new() -> Self {
        Self { id: Uuid::new_v4() }
    }

    /// Unique id of this engine session
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Default for EngineHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime status reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    /// Current output bitrate in megabits per second
    pub bitrate_mbps: f64,

    /// Average framerate over the engine's measurement window
    pub framerate: f64,

    /// Frames dropped since the session started
    pub frames_dropped: u64,

    /// Engine memory usage in megabytes
    pub memory_mb: u64,
}

impl Default for EngineStatus {
    fn default() -> Self {
        Self {
            bitrate_mbps: 0.0,
            framerate: 0.0,
            frames_dropped: 0,
            memory_mb: 0,
        }
    }
}

/// Lifecycle contract of the external encoding engine
///
/// Calls carry no internal timeout; integrators needing bounded latency
/// should wrap them in their own deadline and treat expiry as a
/// system-class failure.
#[async_trait]
pub trait EncodingEngine: Send + Sync {
    /// Prepare an engine session for the given configuration
    async fn init(&self, config: &Configuration) -> RecorderResult<EngineHandle>;

    /// Begin capturing to the given output path
    async fn start(&self, handle: &EngineHandle, output_path: &Path) -> RecorderResult<()>;

    /// Suspend capture without finalizing the output
    async fn pause(&self, handle: &EngineHandle) -> RecorderResult<()>;

    /// Resume a suspended capture
    async fn resume(&self, handle: &EngineHandle) -> RecorderResult<()>;

    /// Apply a new bitrate to the running session
    ///
    /// The engine is authoritative: it may reject the change, in which case
    /// the previously applied bitrate remains in effect.
    async fn adjust_bitrate(&self, handle: &EngineHandle, bitrate_kbps: u32) -> RecorderResult<()>;

    /// Finalize the output and release engine resources
    async fn stop(&self, handle: &EngineHandle) -> RecorderResult<()>;

    /// Current runtime status; never fails, stale values are acceptable
    async fn query_status(&self, handle: &EngineHandle) -> EngineStatus;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_are_unique() {
        let a = EngineHandle::new();
        let b = EngineHandle::new();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
