//! Recording configuration
//!
//! Holds the mutable encoder parameters for a session and guards them with
//! a single exclusive-access discipline so readers always see a consistent
//! snapshot.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{RecorderError, RecorderResult};

/// Encoder parameters for a recording session
///
/// All numeric fields are positive whenever a configuration is applied;
/// mutation goes through [`ConfigStore`]'s validated setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Target bitrate in kilobits per second
    pub bitrate_kbps: u32,

    /// Target framerate in frames per second
    pub framerate_fps: u32,

    /// Whether the engine should use hardware acceleration
    pub hardware_acceleration: bool,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            bitrate_kbps: 4000,
            framerate_fps: 30,
            hardware_acceleration: true,
        }
    }
}

impl Configuration {
    /// Create a configuration with the default parameters
    /// (1920x1080, 4000 kbps, 30 fps, acceleration on)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output resolution
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the target bitrate in kbps
    pub fn with_bitrate_kbps(mut self, bitrate_kbps: u32) -> Self {
        self.bitrate_kbps = bitrate_kbps;
        self
    }

    /// Set the target framerate in fps
    pub fn with_framerate_fps(mut self, framerate_fps: u32) -> Self {
        self.framerate_fps = framerate_fps;
        self
    }

    /// Enable or disable hardware acceleration
    pub fn with_hardware_acceleration(mut self, enabled: bool) -> Self {
        self.hardware_acceleration = enabled;
        self
    }

    /// Check that every numeric field is positive
    pub fn validate(&self) -> RecorderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RecorderError::InvalidResolution {
                width: self.width as i32,
                height: self.height as i32,
            });
        }
        if self.bitrate_kbps == 0 {
            return Err(RecorderError::InvalidBitrate(0));
        }
        if self.framerate_fps == 0 {
            return Err(RecorderError::InvalidFramerate(0));
        }
        Ok(())
    }
}

/// Thread-safe owner of the session configuration
///
/// Reads and writes are mutually exclusive; a reader never observes a
/// half-written configuration. Setters validate synchronously and leave
/// the stored value untouched on rejection.
pub struct ConfigStore {
    inner: RwLock<Configuration>,
}

impl ConfigStore {
    /// Create a store holding the given initial configuration
    pub fn new(initial: Configuration) -> Self {
        Self {
            inner: RwLock::new(initial),
        }
    }

    /// Get a consistent snapshot of the current configuration
    pub fn get(&self) -> Configuration {
        self.inner.read().clone()
    }

    /// Set the output resolution; both dimensions must be positive
    pub fn set_resolution(&self, width: i32, height: i32) -> RecorderResult<()> {
        if width <= 0 || height <= 0 {
            return Err(RecorderError::InvalidResolution { width, height });
        }
        let mut config = self.inner.write();
        config.width = width as u32;
        config.height = height as u32;
        Ok(())
    }

    /// Set the target bitrate; must be positive
    pub fn set_bitrate(&self, bitrate_kbps: i32) -> RecorderResult<()> {
        if bitrate_kbps <= 0 {
            return Err(RecorderError::InvalidBitrate(bitrate_kbps));
        }
        self.inner.write().bitrate_kbps = bitrate_kbps as u32;
        Ok(())
    }

    /// Set the target framerate; must be positive
    pub fn set_framerate(&self, framerate_fps: i32) -> RecorderResult<()> {
        if framerate_fps <= 0 {
            return Err(RecorderError::InvalidFramerate(framerate_fps));
        }
        self.inner.write().framerate_fps = framerate_fps as u32;
        Ok(())
    }

    /// Enable or disable hardware acceleration
    pub fn set_hardware_acceleration(&self, enabled: bool) {
        self.inner.write().hardware_acceleration = enabled;
    }
}
