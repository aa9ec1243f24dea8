//! Recorder facade
//!
//! The one surface external callers touch. Composes the event dispatcher,
//! configuration store, metrics collector and state machine; every
//! operation reports its outcome both as a return value and as an event.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::config::{ConfigStore, Configuration};
use crate::engine::EncodingEngine;
use crate::error::{code, RecorderError, RecorderResult};
use crate::events::{EventDispatcher, EventSeverity, ObserverHandle, RecorderEvent};
use crate::metrics::{MetricsCollector, RuntimeMetrics};

use super::machine::RecordingStateMachine;
use super::state::RecordingState;

/// Recording session controller
///
/// Construct with an engine (and optionally a configuration), register
/// observers for diagnostics, then drive the lifecycle. Operations return
/// `false` on failure and emit an event carrying the stable code and
/// detail, so callers that ignore return values still see every failure.
///
/// Call [`stop_recording`](Self::stop_recording) before dropping a
/// recorder with an active session; dropping mid-session detaches the
/// metrics sampler instead of joining it.
pub struct Recorder {
    events: Arc<EventDispatcher>,
    config: Arc<ConfigStore>,
    metrics: Arc<MetricsCollector>,
    machine: Arc<Mutex<RecordingStateMachine>>,
    state: Arc<RwLock<RecordingState>>,
}

impl Recorder {
    /// Create a recorder with the default configuration
    /// (1920x1080, 4000 kbps, 30 fps, acceleration on)
    pub fn new(engine: Arc<dyn EncodingEngine>) -> Self {
        Self::with_config(engine, Configuration::default())
    }

    /// Create a recorder with a caller-supplied configuration
    pub fn with_config(engine: Arc<dyn EncodingEngine>, configuration: Configuration) -> Self {
        Self::build(engine, configuration, MetricsCollector::new())
    }

    /// Create a recorder with a custom metrics sampling interval
    pub fn with_sampling_interval(
        engine: Arc<dyn EncodingEngine>,
        configuration: Configuration,
        sample_interval: Duration,
    ) -> Self {
        Self::build(
            engine,
            configuration,
            MetricsCollector::with_interval(sample_interval),
        )
    }

    fn build(
        engine: Arc<dyn EncodingEngine>,
        configuration: Configuration,
        collector: MetricsCollector,
    ) -> Self {
        let events = Arc::new(EventDispatcher::new());
        let config = Arc::new(ConfigStore::new(configuration));
        let metrics = Arc::new(collector);
        let machine = RecordingStateMachine::new(
            engine,
            Arc::clone(&config),
            Arc::clone(&metrics),
            Arc::clone(&events),
        );
        let state = machine.shared_state();

        Self {
            events,
            config,
            metrics,
            machine: Arc::new(Mutex::new(machine)),
            state,
        }
    }

    // --- Lifecycle ---

    /// Start recording to `output_path`; valid from Idle and Stopped
    pub async fn start_recording(&self, output_path: impl AsRef<Path>) -> bool {
        self.machine
            .lock()
            .await
            .start(output_path.as_ref())
            .await
            .is_ok()
    }

    /// Pause the active recording
    pub async fn pause_recording(&self) -> bool {
        self.machine.lock().await.pause().await.is_ok()
    }

    /// Resume a paused recording
    pub async fn resume_recording(&self) -> bool {
        self.machine.lock().await.resume().await.is_ok()
    }

    /// Stop the session; from Faulted this is the explicit reset
    pub async fn stop_recording(&self) -> bool {
        self.machine.lock().await.stop().await.is_ok()
    }

    /// Adjust the bitrate, live while recording
    pub async fn adjust_bitrate(&self, bitrate_kbps: i32) -> bool {
        self.machine
            .lock()
            .await
            .adjust_bitrate(bitrate_kbps)
            .await
            .is_ok()
    }

    // --- Configuration (pre-session only) ---

    /// Set the output resolution; rejected while a session is active
    pub fn set_resolution(&self, width: i32, height: i32) -> bool {
        let result = self
            .config_unlocked("resolution")
            .and_then(|_| self.config.set_resolution(width, height));
        self.report_setter(
            "resolution",
            result,
            format!("Resolution set to {}x{}", width, height),
        )
    }

    /// Set the target bitrate; rejected while a session is active
    /// (use [`adjust_bitrate`](Self::adjust_bitrate) for live changes)
    pub fn set_bitrate(&self, bitrate_kbps: i32) -> bool {
        let result = self
            .config_unlocked("bitrate")
            .and_then(|_| self.config.set_bitrate(bitrate_kbps));
        self.report_setter(
            "bitrate",
            result,
            format!("Bitrate set to {} kbps", bitrate_kbps),
        )
    }

    /// Set the target framerate; rejected while a session is active
    pub fn set_framerate(&self, framerate_fps: i32) -> bool {
        let result = self
            .config_unlocked("framerate")
            .and_then(|_| self.config.set_framerate(framerate_fps));
        self.report_setter(
            "framerate",
            result,
            format!("Framerate set to {} fps", framerate_fps),
        )
    }

    /// Enable or disable hardware acceleration; rejected while a session
    /// is active
    pub fn enable_hardware_acceleration(&self, enabled: bool) -> bool {
        let result = self
            .config_unlocked("hardware acceleration")
            .map(|_| self.config.set_hardware_acceleration(enabled));
        self.report_setter(
            "hardware acceleration",
            result,
            format!(
                "Hardware acceleration {}",
                if enabled { "enabled" } else { "disabled" }
            ),
        )
    }

    fn config_unlocked(&self, field: &str) -> RecorderResult<()> {
        if self.state.read().is_active() {
            return Err(RecorderError::ConfigLocked(field.to_string()));
        }
        Ok(())
    }

    fn report_setter(
        &self,
        field: &str,
        result: RecorderResult<()>,
        success_message: String,
    ) -> bool {
        match result {
            Ok(()) => {
                self.events
                    .dispatch(EventSeverity::Info, code::OK, success_message, "");
                true
            }
            Err(e) => {
                tracing::warn!("Refused {} update: {}", field, e);
                self.events
                    .dispatch_error(&e, format!("{} unchanged", field));
                false
            }
        }
    }

    // --- Observation ---

    /// Register an observer for diagnostic events
    pub fn register_observer<F>(&self, observer: F) -> ObserverHandle
    where
        F: Fn(&RecorderEvent) + Send + Sync + 'static,
    {
        self.events.register(observer)
    }

    /// Remove a previously registered observer
    pub fn unregister_observer(&self, handle: ObserverHandle) -> bool {
        self.events.unregister(handle)
    }

    /// Number of registered observers
    pub fn observer_count(&self) -> usize {
        self.events.observer_count()
    }

    // --- Status ---

    /// Most recent runtime metrics sample
    pub fn current_metrics(&self) -> RuntimeMetrics {
        self.metrics.snapshot()
    }

    /// Whether the lifecycle is in `Recording`
    pub fn is_recording(&self) -> bool {
        *self.state.read() == RecordingState::Recording
    }

    /// Whether the lifecycle is in `Paused`
    pub fn is_paused(&self) -> bool {
        *self.state.read() == RecordingState::Paused
    }

    /// Current lifecycle state
    pub fn state(&self) -> RecordingState {
        *self.state.read()
    }

    /// Whether the metrics sampler is currently running
    pub fn is_sampling(&self) -> bool {
        self.metrics.is_sampling()
    }

    /// Snapshot of the current configuration
    pub fn configuration(&self) -> Configuration {
        self.config.get()
    }

    /// Recorded duration in milliseconds, excluding paused spans
    pub async fn duration_ms(&self) -> f64 {
        self.machine.lock().await.duration_ms()
    }

    /// Output target of the active session, if any
    pub async fn output_path(&self) -> Option<PathBuf> {
        self.machine.lock().await.output_path()
    }
}
