//! Recorder Core - recording session control for embedding applications.
//!
//! Owns a capture session's lifecycle while an external encoding engine
//! does the actual capture and compression: validated state transitions,
//! concurrency-safe configuration, structured diagnostic events, and
//! periodic runtime metrics sampling.
//!
//! ```no_run
//! use std::sync::Arc;
//! use recorder_core::{EncodingEngine, Recorder};
//!
//! # async fn demo(engine: Arc<dyn EncodingEngine>) {
//! let recorder = Recorder::new(engine);
//! recorder.register_observer(|event| {
//!     println!("[{:?}] {} (code {})", event.severity, event.message, event.code);
//! });
//!
//! recorder.set_bitrate(8000);
//! if recorder.start_recording("out.mp4").await {
//!     recorder.adjust_bitrate(3000).await;
//!     recorder.stop_recording().await;
//! }
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod metrics;
pub mod recorder;

pub use config::{ConfigStore, Configuration};
pub use engine::{EncodingEngine, EngineHandle, EngineStatus};
pub use error::{code, ErrorClass, RecorderError, RecorderResult};
pub use events::{EventDispatcher, EventSeverity, ObserverHandle, RecorderEvent};
pub use metrics::{MetricsCollector, RuntimeMetrics, DEFAULT_SAMPLE_INTERVAL};
pub use recorder::{Recorder, RecordingSession, RecordingState};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing output for embedders that have no subscriber of
/// their own
///
/// Respects `RUST_LOG`; safe to call more than once (later calls are
/// no-ops).
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recorder_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
