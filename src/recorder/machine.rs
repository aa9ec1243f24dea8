//! Recording state machine
//!
//! Owns the lifecycle state and executes validated transitions, driving the
//! encoding engine and reporting every outcome through the event
//! dispatcher.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::config::ConfigStore;
use crate::engine::{EncodingEngine, EngineHandle};
use crate::error::{code, RecorderError, RecorderResult};
use crate::events::{EventDispatcher, EventSeverity};
use crate::metrics::MetricsCollector;

use super::state::{RecordingSession, RecordingState};

/// Validates and executes lifecycle transitions
///
/// Exactly one transition runs at a time; the facade serializes access
/// through an async mutex. Losers of a transition race observe the
/// post-transition state and fail with the matching operational error.
pub struct RecordingStateMachine {
    /// Current lifecycle state, shared with the facade for lock-free reads
    state: Arc<RwLock<RecordingState>>,

    /// External engine performing the actual capture
    engine: Arc<dyn EncodingEngine>,

    /// Session configuration
    config: Arc<ConfigStore>,

    /// Background status sampler
    metrics: Arc<MetricsCollector>,

    /// Diagnostic event sink
    events: Arc<EventDispatcher>,

    /// Handle of the initialized engine session, present while one exists
    engine_handle: Option<EngineHandle>,

    /// Recorded segments (one per pause/resume cycle)
    sessions: Vec<RecordingSession>,

    /// Current segment index
    current_session: usize,

    /// Output target of the active session
    output_path: Option<PathBuf>,

    /// Time when the session started (for session time calculation)
    start_time: Option<Instant>,
}

impl RecordingStateMachine {
    /// Create a state machine in `Idle`
    pub fn new(
        engine: Arc<dyn EncodingEngine>,
        config: Arc<ConfigStore>,
        metrics: Arc<MetricsCollector>,
        events: Arc<EventDispatcher>,
    ) -> Self {
        Self {
            state: Arc::new(RwLock::new(RecordingState::Idle)),
            engine,
            config,
            metrics,
            events,
            engine_handle: None,
            sessions: Vec::new(),
            current_session: 0,
            output_path: None,
            start_time: None,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> RecordingState {
        *self.state.read()
    }

    /// Shared cell holding the lifecycle state, for lock-free status reads
    pub fn shared_state(&self) -> Arc<RwLock<RecordingState>> {
        Arc::clone(&self.state)
    }

    /// Output target of the active session, if any
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output_path.clone()
    }

    /// Milliseconds elapsed since the session started
    fn session_time_ms(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }

    /// Report a refused operation: log, emit the matching event, hand the
    /// error back for the caller to return
    fn reject(&self, error: RecorderError, details: impl Into<String>) -> RecorderError {
        tracing::warn!("Refused: {}", error);
        self.events.dispatch_error(&error, details);
        error
    }

    /// Enter `Faulted`: Critical event, sampler joined, engine handle kept
    /// so a later stop() can attempt teardown
    async fn fault(&mut self, error: RecorderError) -> RecorderError {
        tracing::error!("Session fault: {}", error);
        *self.state.write() = RecordingState::Faulted;
        self.metrics.stop().await;
        self.events.dispatch(
            EventSeverity::Critical,
            error.code(),
            error.to_string(),
            "session faulted; stop() resets",
        );
        error
    }

    fn active_handle(&self) -> RecorderResult<EngineHandle> {
        self.engine_handle.clone().ok_or_else(|| {
            self.reject(
                RecorderError::EngineFailure("no engine handle for active session".into()),
                "internal state inconsistency",
            )
        })
    }

    /// Start recording to `output_path`
    ///
    /// Valid from `Idle` and `Stopped`. Engine failures here leave the
    /// state untouched; no session began.
    pub async fn start(&mut self, output_path: &Path) -> RecorderResult<()> {
        let current = *self.state.read();
        match current {
            RecordingState::Recording | RecordingState::Paused => {
                return Err(self.reject(
                    RecorderError::AlreadyRecording,
                    format!("start refused in state {:?}", current),
                ));
            }
            RecordingState::Faulted => {
                return Err(self.reject(
                    RecorderError::SessionFaulted,
                    "start refused until the faulted session is stopped",
                ));
            }
            RecordingState::Idle | RecordingState::Stopped => {}
        }

        let config = self.config.get();
        config
            .validate()
            .map_err(|e| self.reject(e, "configuration validation before start"))?;

        tracing::info!("Starting recording to {}", output_path.display());

        let handle = match self.engine.init(&config).await {
            Ok(handle) => handle,
            Err(e) => return Err(self.reject(e, "engine init during start")),
        };
        if let Err(e) = self.engine.start(&handle, output_path).await {
            // Release whatever init allocated.
            if let Err(stop_err) = self.engine.stop(&handle).await {
                tracing::warn!("Engine teardown after failed start also failed: {}", stop_err);
            }
            return Err(self.reject(e, "engine start during start"));
        }

        self.metrics
            .start(Arc::clone(&self.engine), handle.clone())
            .await;
        self.engine_handle = Some(handle);
        self.output_path = Some(output_path.to_path_buf());
        self.start_time = Some(Instant::now());
        self.current_session = 0;
        self.sessions.clear();
        self.sessions.push(RecordingSession::new(0, 0.0));

        *self.state.write() = RecordingState::Recording;
        self.events.dispatch(
            EventSeverity::Info,
            code::OK,
            "Recording started",
            serde_json::json!({
                "output": output_path.display().to_string(),
                "width": config.width,
                "height": config.height,
                "bitrateKbps": config.bitrate_kbps,
                "framerateFps": config.framerate_fps,
                "hardwareAcceleration": config.hardware_acceleration,
            })
            .to_string(),
        );

        tracing::info!("Recording started");
        Ok(())
    }

    /// Pause the active recording
    pub async fn pause(&mut self) -> RecorderResult<()> {
        let current = *self.state.read();
        if current != RecordingState::Recording {
            return Err(self.reject(
                RecorderError::NotRecording,
                format!("pause refused in state {:?}", current),
            ));
        }

        tracing::info!("Pausing recording");

        let handle = self.active_handle()?;
        if let Err(e) = self.engine.pause(&handle).await {
            return Err(self.fault(e).await);
        }

        // Close the current segment; paused time is not recorded.
        let end_time = self.session_time_ms();
        if let Some(session) = self.sessions.last_mut() {
            session.end(end_time);
        }

        *self.state.write() = RecordingState::Paused;
        self.events.dispatch(
            EventSeverity::Info,
            code::OK,
            "Recording paused",
            format!("segment {} closed", self.current_session),
        );

        Ok(())
    }

    /// Resume a paused recording
    pub async fn resume(&mut self) -> RecorderResult<()> {
        let current = *self.state.read();
        if current != RecordingState::Paused {
            return Err(self.reject(
                RecorderError::NotRecording,
                format!("resume refused in state {:?}", current),
            ));
        }

        tracing::info!("Resuming recording");

        let handle = self.active_handle()?;
        if let Err(e) = self.engine.resume(&handle).await {
            return Err(self.fault(e).await);
        }

        self.current_session += 1;
        let session = RecordingSession::new(self.current_session, self.session_time_ms());
        self.sessions.push(session);

        *self.state.write() = RecordingState::Recording;
        self.events.dispatch(
            EventSeverity::Info,
            code::OK,
            "Recording resumed",
            format!("segment {} opened", self.current_session),
        );

        Ok(())
    }

    /// Stop the session
    ///
    /// Valid from `Recording` and `Paused`; from `Faulted` it acts as the
    /// explicit reset required before a new start.
    pub async fn stop(&mut self) -> RecorderResult<()> {
        let current = *self.state.read();
        match current {
            RecordingState::Idle | RecordingState::Stopped => {
                return Err(self.reject(
                    RecorderError::NotRecording,
                    format!("stop refused in state {:?}", current),
                ));
            }
            RecordingState::Faulted => return self.reset_from_fault().await,
            RecordingState::Recording | RecordingState::Paused => {}
        }

        tracing::info!("Stopping recording");

        // Sampler down first so nothing queries the engine mid-finalize.
        self.metrics.stop().await;

        // Close the live segment; from Paused it was closed at pause time.
        if current == RecordingState::Recording {
            let end_time = self.session_time_ms();
            if let Some(session) = self.sessions.last_mut() {
                session.end(end_time);
            }
        }

        let handle = self.active_handle()?;
        if let Err(e) = self.engine.stop(&handle).await {
            return Err(self.fault(e).await);
        }

        let total_duration_ms: f64 = self.sessions.iter().map(|s| s.duration_ms).sum();
        let output = self
            .output_path
            .take()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.engine_handle = None;
        self.start_time = None;

        *self.state.write() = RecordingState::Stopped;
        self.events.dispatch(
            EventSeverity::Info,
            code::OK,
            "Recording stopped",
            format!(
                "output {}; {:.0} ms recorded across {} segment(s)",
                output,
                total_duration_ms,
                self.sessions.len()
            ),
        );

        tracing::info!("Recording stopped, {:.0} ms recorded", total_duration_ms);
        Ok(())
    }

    /// Explicit reset out of `Faulted`
    async fn reset_from_fault(&mut self) -> RecorderResult<()> {
        tracing::info!("Resetting faulted session");

        // Already joined when the fault was entered; harmless to repeat.
        self.metrics.stop().await;

        if let Some(handle) = self.engine_handle.take() {
            if let Err(e) = self.engine.stop(&handle).await {
                tracing::warn!("Engine teardown during fault reset failed: {}", e);
            }
        }

        self.output_path = None;
        self.start_time = None;
        *self.state.write() = RecordingState::Stopped;
        self.events.dispatch(
            EventSeverity::Info,
            code::OK,
            "Faulted session reset",
            "a new start is now accepted",
        );

        Ok(())
    }

    /// Adjust the bitrate, live when recording
    ///
    /// While `Recording`, the engine must accept the change before the
    /// stored configuration is updated; a rejected change leaves the store
    /// untouched and is reported as a Warning. Outside `Recording` the
    /// value is stored and takes effect on the next start.
    pub async fn adjust_bitrate(&mut self, bitrate_kbps: i32) -> RecorderResult<()> {
        if bitrate_kbps <= 0 {
            return Err(self.reject(
                RecorderError::InvalidBitrate(bitrate_kbps),
                "bitrate adjustment refused",
            ));
        }

        let current = *self.state.read();
        match current {
            RecordingState::Faulted => Err(self.reject(
                RecorderError::SessionFaulted,
                "bitrate adjustment refused until the faulted session is stopped",
            )),
            RecordingState::Recording => {
                let handle = self.active_handle()?;
                // Engine confirms before the store commits; a rejected
                // change must never leave an unacknowledged value stored.
                if let Err(e) = self.engine.adjust_bitrate(&handle, bitrate_kbps as u32).await {
                    let kept = self.config.get().bitrate_kbps;
                    tracing::warn!(
                        "Engine rejected bitrate change to {} kbps: {}",
                        bitrate_kbps,
                        e
                    );
                    self.events.dispatch(
                        EventSeverity::Warning,
                        e.code(),
                        format!("Bitrate change rejected by engine: {}", e),
                        format!("keeping {} kbps", kept),
                    );
                    return Err(e);
                }
                self.commit_bitrate(bitrate_kbps, "applied to live session")
            }
            _ => self.commit_bitrate(bitrate_kbps, "takes effect on next start"),
        }
    }

    fn commit_bitrate(&self, bitrate_kbps: i32, details: &str) -> RecorderResult<()> {
        self.config
            .set_bitrate(bitrate_kbps)
            .map_err(|e| self.reject(e, "bitrate commit"))?;
        self.events.dispatch(
            EventSeverity::Info,
            code::OK,
            format!("Bitrate adjusted to {} kbps", bitrate_kbps),
            details,
        );
        tracing::info!("Bitrate adjusted to {} kbps ({})", bitrate_kbps, details);
        Ok(())
    }

    /// Recorded duration in milliseconds, excluding paused spans
    pub fn duration_ms(&self) -> f64 {
        let completed: f64 = self
            .sessions
            .iter()
            .take(self.sessions.len().saturating_sub(1))
            .map(|s| s.duration_ms)
            .sum();

        let current = if *self.state.read() == RecordingState::Recording {
            self.sessions
                .last()
                .map(|s| self.session_time_ms() - s.session_time_start_ms)
                .unwrap_or(0.0)
        } else {
            self.sessions.last().map(|s| s.duration_ms).unwrap_or(0.0)
        };

        completed + current
    }
}
