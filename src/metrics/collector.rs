//! Metrics collector
//!
//! Samples the encoding engine's status on a background task and publishes
//! each sample as an immutable snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::engine::{EncodingEngine, EngineHandle, EngineStatus};

/// How often the sampler queries the engine unless configured otherwise
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(500);

/// One sample of runtime performance
///
/// Handed to callers by value; a snapshot never changes after publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeMetrics {
    /// Output bitrate at the sample instant, in megabits per second
    pub current_bitrate_mbps: f64,

    /// Average framerate reported by the engine
    pub average_framerate: f64,

    /// Frames dropped since the session started
    pub frames_dropped: u64,

    /// Engine memory usage in megabytes
    pub memory_usage_mb: u64,

    /// When this sample was taken
    pub sampled_at: DateTime<Utc>,
}

impl Default for RuntimeMetrics {
    fn default() -> Self {
        Self {
            current_bitrate_mbps: 0.0,
            average_framerate: 0.0,
            frames_dropped: 0,
            memory_usage_mb: 0,
            sampled_at: Utc::now(),
        }
    }
}

impl From<EngineStatus> for RuntimeMetrics {
    fn from(status: EngineStatus) -> Self {
        Self {
            current_bitrate_mbps: status.bitrate_mbps,
            average_framerate: status.framerate,
            frames_dropped: status.frames_dropped,
            memory_usage_mb: status.memory_mb,
            sampled_at: Utc::now(),
        }
    }
}

struct SamplerTask {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// Periodic background sampler of engine status
///
/// `snapshot()` returns the most recently published sample without blocking
/// the sampling task; `stop()` returns only after the task has fully
/// exited, so dependent state can be torn down safely afterwards.
pub struct MetricsCollector {
    latest: Arc<RwLock<RuntimeMetrics>>,
    sample_interval: Duration,
    sampling: Arc<AtomicBool>,
    task: Mutex<Option<SamplerTask>>,
}

impl MetricsCollector {
    /// Create a collector sampling at [`DEFAULT_SAMPLE_INTERVAL`]
    pub fn new() -> Self {
        Self::with_interval(DEFAULT_SAMPLE_INTERVAL)
    }

    /// Create a collector with a custom sampling interval
    pub fn with_interval(sample_interval: Duration) -> Self {
        Self {
            latest: Arc::new(RwLock::new(RuntimeMetrics::default())),
            sample_interval,
            sampling: Arc::new(AtomicBool::new(false)),
            task: Mutex::new(None),
        }
    }

    /// Begin periodic sampling of the given engine session
    ///
    /// Ignored if sampling is already running.
    pub async fn start(&self, engine: Arc<dyn EncodingEngine>, engine_handle: EngineHandle) {
        let mut slot = self.task.lock().await;
        if slot.is_some() {
            tracing::debug!("Metrics sampler already running");
            return;
        }

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let latest = Arc::clone(&self.latest);
        let sampling = Arc::clone(&self.sampling);
        let interval = self.sample_interval;
        sampling.store(true, Ordering::SeqCst);

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {
                        let status = engine.query_status(&engine_handle).await;
                        *latest.write() = RuntimeMetrics::from(status);
                    }
                }
            }
            sampling.store(false, Ordering::SeqCst);
            tracing::debug!("Metrics sampler exited");
        });

        *slot = Some(SamplerTask {
            handle,
            shutdown: shutdown_tx,
        });
        tracing::debug!("Metrics sampler started, interval {:?}", interval);
    }

    /// Halt sampling, returning once the background task has exited
    ///
    /// Idempotent: calling it with no sampler running is a no-op.
    /// Concurrent callers serialize, so every caller returns only after
    /// the task is down.
    pub async fn stop(&self) {
        let mut slot = self.task.lock().await;
        let task = match slot.take() {
            Some(task) => task,
            None => return,
        };

        let _ = task.shutdown.send(true);
        if let Err(e) = task.handle.await {
            tracing::warn!("Metrics sampler join failed: {}", e);
        }
        // Holds even if the task aborted before its own store.
        self.sampling.store(false, Ordering::SeqCst);
    }

    /// Most recently published sample
    pub fn snapshot(&self) -> RuntimeMetrics {
        self.latest.read().clone()
    }

    /// Whether the background sampler is currently running
    pub fn is_sampling(&self) -> bool {
        self.sampling.load(Ordering::SeqCst)
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
